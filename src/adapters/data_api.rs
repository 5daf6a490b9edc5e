use crate::config::StoreSettings;
use crate::core::query::ValidatedQuery;
use crate::domain::model::ReferenceEntry;
use crate::domain::ports::ReferenceStore;
use crate::utils::error::{LookupError, Result};
use async_trait::async_trait;
use reqwest::{Certificate, Client};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

const API_KEY_HEADER: &str = "apiKey";
const PEM_CERTIFICATE_MARKER: &str = "-----BEGIN CERTIFICATE-----";

/// Document store reached through a MongoDB-compatible HTTP Data API.
///
/// Exact lookups use `findOne` with an anchored case-insensitive regex;
/// partial lookups push the unwind/filter/group work into `aggregate`.
/// The query is embedded verbatim, which is safe only because
/// [`ValidatedQuery`] admits letters, digits and spaces.
pub struct DataApiStore {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    data_source: String,
    database: String,
    collection: String,
}

#[derive(Deserialize)]
struct FindOneResponse {
    document: Option<ReferenceEntry>,
}

#[derive(Deserialize)]
struct AggregateResponse<T> {
    documents: Vec<T>,
}

#[derive(Deserialize)]
struct MatchCount {
    matches: u64,
}

impl DataApiStore {
    pub fn new(settings: &StoreSettings) -> Result<Self> {
        let uri = settings
            .uri
            .as_deref()
            .ok_or_else(|| LookupError::MissingConfigError {
                field: "store.uri".to_string(),
            })?;

        let mut builder = Client::builder().timeout(Duration::from_secs(settings.timeout_seconds));

        if let Some(ca_file) = &settings.ca_file {
            builder = builder.add_root_certificate(Self::load_ca_certificate(ca_file)?);
            tracing::debug!("Added store CA certificate from {}", ca_file);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: Self::normalize_base_url(uri)?,
            api_key: settings.api_key.clone(),
            data_source: settings.data_source.clone(),
            database: settings.database.clone(),
            collection: settings.collection.clone(),
        })
    }

    // rustls 會略過沒有 CERTIFICATE 區塊的 PEM，這裡先擋掉
    fn load_ca_certificate(ca_file: &str) -> Result<Certificate> {
        let pem = std::fs::read(ca_file)?;

        if !String::from_utf8_lossy(&pem).contains(PEM_CERTIFICATE_MARKER) {
            return Err(LookupError::InvalidConfigValueError {
                field: "store.ca_file".to_string(),
                value: ca_file.to_string(),
                reason: "File does not contain a PEM certificate".to_string(),
            });
        }

        Ok(Certificate::from_pem(&pem)?)
    }

    // Url::join 需要結尾斜線才會保留最後一段路徑
    fn normalize_base_url(uri: &str) -> Result<Url> {
        let mut normalized = uri.to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }

        Url::parse(&normalized).map_err(|e| LookupError::InvalidConfigValueError {
            field: "store.uri".to_string(),
            value: uri.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })
    }

    fn action_url(&self, action: &str) -> Result<Url> {
        self.base_url
            .join(&format!("action/{}", action))
            .map_err(|e| LookupError::ConfigError {
                message: format!("Cannot build URL for action '{}': {}", action, e),
            })
    }

    fn request_body(&self, extra: Value) -> Value {
        let mut body = json!({
            "dataSource": self.data_source,
            "database": self.database,
            "collection": self.collection,
        });

        if let (Value::Object(target), Value::Object(fields)) = (&mut body, extra) {
            target.extend(fields);
        }

        body
    }

    async fn post_action<T: DeserializeOwned>(&self, action: &str, extra: Value) -> Result<T> {
        let url = self.action_url(action)?;
        let body = self.request_body(extra);

        tracing::debug!("Calling store action {} at {}", action, url);

        let mut request = self.client.post(url).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.header(API_KEY_HEADER, api_key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!("⚠️ Store action {} failed with {}: {}", action, status, detail);
            return Err(LookupError::StoreError {
                message: format!("{} returned {}", action, status),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| LookupError::InvalidData {
            message: format!("unexpected {} response: {}", action, e),
        })
    }

    async fn count(&self, filter: Value, limit: usize) -> Result<u64> {
        let pipeline = json!([
            { "$match": filter },
            { "$limit": limit },
            { "$count": "matches" }
        ]);

        let response: AggregateResponse<MatchCount> = self
            .post_action("aggregate", json!({ "pipeline": pipeline }))
            .await?;

        Ok(response.documents.first().map(|c| c.matches).unwrap_or(0))
    }
}

fn case_insensitive_regex(pattern: String) -> Value {
    json!({ "$regex": pattern, "$options": "i" })
}

/// `{"organ": /^query$/i}`
pub fn exact_organ_filter(query: &ValidatedQuery) -> Value {
    json!({ "organ": case_insensitive_regex(format!("^{}$", query.as_str())) })
}

/// Matches documents where any pattern name or symptom contains the query.
pub fn partial_match_filter(query: &ValidatedQuery) -> Value {
    json!({
        "$or": [
            { "patterns.pattern": case_insensitive_regex(query.as_str().to_string()) },
            { "patterns.symptoms": case_insensitive_regex(query.as_str().to_string()) }
        ]
    })
}

/// Candidate match, unwind patterns, per-pattern re-match, regroup by document.
pub fn partial_match_pipeline(query: &ValidatedQuery, limit: usize) -> Value {
    json!([
        { "$match": partial_match_filter(query) },
        { "$unwind": "$patterns" },
        { "$match": partial_match_filter(query) },
        {
            "$group": {
                "_id": "$_id",
                "organ": { "$first": "$organ" },
                "patterns": { "$push": "$patterns" }
            }
        },
        { "$sort": { "_id": 1 } },
        { "$project": { "_id": 0 } },
        { "$limit": limit }
    ])
}

#[async_trait]
impl ReferenceStore for DataApiStore {
    async fn find_exact(&self, query: &ValidatedQuery) -> Result<Option<ReferenceEntry>> {
        let response: FindOneResponse = self
            .post_action(
                "findOne",
                json!({
                    "filter": exact_organ_filter(query),
                    "projection": { "_id": 0 }
                }),
            )
            .await?;

        Ok(response.document)
    }

    async fn find_partial(
        &self,
        query: &ValidatedQuery,
        limit: usize,
    ) -> Result<Vec<ReferenceEntry>> {
        let response: AggregateResponse<ReferenceEntry> = self
            .post_action(
                "aggregate",
                json!({ "pipeline": partial_match_pipeline(query, limit) }),
            )
            .await?;

        Ok(response.documents)
    }

    async fn count_exact(&self, query: &ValidatedQuery, limit: usize) -> Result<u64> {
        self.count(exact_organ_filter(query), limit).await
    }

    async fn count_partial(&self, query: &ValidatedQuery, limit: usize) -> Result<u64> {
        self.count(partial_match_filter(query), limit).await
    }
}
