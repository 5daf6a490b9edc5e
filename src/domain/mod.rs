// Domain layer: reference data model and the store port.

pub mod model;
pub mod ports;
