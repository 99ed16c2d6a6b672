use anyhow::*;
use log::{debug, info};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::quiz::row::QuizDocument;
use crate::store::{Collection, DocumentId};

pub mod value;

use self::value::*;


const API_ROOT: &str = "https://firestore.googleapis.com/v1";

#[derive(Clone, Debug)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub database: String,
    pub collection: String,
    pub access_token: String,
    pub timeout: Duration,
}

#[derive(Serialize)]
struct DocumentBody<'a> {
    fields: &'a Fields,
}

#[derive(Debug, Deserialize)]
struct DocumentResponse {
    name: String,
    #[serde(default)]
    fields: Fields,
}

#[derive(Debug, Deserialize)]
struct RunQueryResult {
    document: Option<DocumentResponse>,
}

fn id_from_name(name: &str) -> Result<DocumentId> {
    match name.rsplit('/').next() {
        Some(id) if !id.is_empty() => Ok(DocumentId::new(id)),
        _ => Err(anyhow!("Unexpected document name {:?}", name)),
    }
}

fn equality_query(collection: &str, field: &str, value: &str) -> serde_json::Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": field },
                    "op": "EQUAL",
                    "value": { "stringValue": value },
                }
            }
        }
    })
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(anyhow!("Firestore answered {}: {}", status, body.trim()))
}

/// Collection backed by the Cloud Firestore REST API.
pub struct FirestoreCollection {
    client: Client,
    config: FirestoreConfig,
}

impl FirestoreCollection {
    pub fn connect(config: FirestoreConfig) -> Result<FirestoreCollection> {
        if config.project_id.trim().is_empty() {
            return Err(anyhow!("Firestore project id cannot be blank"));
        }
        if config.access_token.trim().is_empty() {
            return Err(anyhow!("Firestore access token cannot be blank"));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Could not build HTTP client")?;
        info!(
            "Using Firestore collection `{}` in project `{}`",
            config.collection, config.project_id
        );
        Ok(FirestoreCollection { client, config })
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents",
            API_ROOT, self.config.project_id, self.config.database
        )
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.documents_url(), self.config.collection)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .bearer_auth(&self.config.access_token)
            .send()
            .context("Firestore request failed")?;
        check_status(response)
    }
}

impl Collection for FirestoreCollection {
    fn insert(&mut self, document: &QuizDocument) -> Result<DocumentId> {
        let fields = encode_document(document);
        let request = self
            .client
            .post(&self.collection_url())
            .json(&DocumentBody { fields: &fields });
        let created: DocumentResponse = self.send(request)?.json()?;
        debug!("Created {}", created.name);
        id_from_name(&created.name)
    }

    fn find_equal(&self, field: &str, value: &str) -> Result<Vec<(DocumentId, QuizDocument)>> {
        let url = format!("{}:runQuery", self.documents_url());
        let request = self
            .client
            .post(&url)
            .json(&equality_query(&self.config.collection, field, value));
        let results: Vec<RunQueryResult> = self.send(request)?.json()?;
        results
            .into_iter()
            .filter_map(|result| result.document)
            .map(|document| {
                let id = id_from_name(&document.name)?;
                let decoded = decode_document(&document.fields)
                    .with_context(|| format!("Could not decode document {}", document.name))?;
                Ok((id, decoded))
            })
            .collect()
    }

    fn overwrite(&mut self, id: &DocumentId, document: &QuizDocument) -> Result<()> {
        let fields = encode_document(document);
        let url = format!("{}/{}", self.collection_url(), id);
        // No update mask: the stored document is replaced as a whole
        let request = self.client.patch(&url).json(&DocumentBody { fields: &fields });
        self.send(request)?;
        Ok(())
    }
}
