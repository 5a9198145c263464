//! Persisted-model document store — a directory of JSON documents keyed by
//! generated id, append-only from the pipeline's perspective. One document
//! per final confirmation; saving twice creates two documents.

use crate::error::{Result, StrategyError};
use crate::io;
use crate::model::{ModelElement, ModelRelationship};
use crate::paths;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const MODEL_VERSION: &str = "1.0";
pub const MODEL_TYPE: &str = "archimate-motivation";
pub const METHOD_LABEL: &str = "AI-assisted strategy modeling v1.0";
pub const CREATED_BY: &str = "ai + human";
pub const STATUS_CONFIRMED: &str = "confirmed";
pub const DEFAULT_SOURCE: &str = "AI Wizard";

// ---------------------------------------------------------------------------
// Document types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    pub name: String,
    pub source: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub status: String,
    pub method: String,
    pub target_year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedModel {
    pub model_version: String,
    pub model_type: String,
    pub metadata: ModelMetadata,
    pub elements: Vec<ModelElement>,
    pub relationships: Vec<ModelRelationship>,
}

/// Derived summary row for the list operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_year: Option<i32>,
    pub element_count: usize,
    pub relationship_count: usize,
    /// Set when the document on disk could not be parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Save request / receipt
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct SaveRequest {
    pub name: Option<String>,
    pub source: Option<String>,
    pub target_year: Option<i32>,
    pub elements: Vec<ModelElement>,
    pub relationships: Vec<ModelRelationship>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReceipt {
    pub id: String,
    pub element_count: usize,
    pub relationship_count: usize,
    /// Non-fatal findings (dangling relationship endpoints). The document is
    /// written regardless; strict checking belongs to the validate stage.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// ModelStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(root: &Path) -> Self {
        Self {
            dir: paths::models_dir(root),
        }
    }

    /// Persist a new document, stamping metadata and generating a time-based
    /// id unique among stored documents.
    pub fn save(&self, req: SaveRequest) -> Result<SaveReceipt> {
        io::ensure_dir(&self.dir)?;

        let now = Utc::now();
        let id = self.next_id(now);
        let warnings = dangling_endpoints(&req.elements, &req.relationships);

        let model = PersistedModel {
            model_version: MODEL_VERSION.to_string(),
            model_type: MODEL_TYPE.to_string(),
            metadata: ModelMetadata {
                name: req
                    .name
                    .unwrap_or_else(|| format!("Strategy model {}", now.format("%Y-%m-%d"))),
                source: req.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
                created_by: CREATED_BY.to_string(),
                created_at: now,
                status: STATUS_CONFIRMED.to_string(),
                method: METHOD_LABEL.to_string(),
                target_year: req.target_year.unwrap_or_else(|| now.year()),
            },
            elements: req.elements,
            relationships: req.relationships,
        };

        let data = serde_json::to_vec_pretty(&model)?;
        io::atomic_write(&self.dir.join(format!("{id}.json")), &data)?;

        Ok(SaveReceipt {
            id,
            element_count: model.elements.len(),
            relationship_count: model.relationships.len(),
            warnings,
        })
    }

    /// List summaries for all stored documents, oldest first. A document
    /// that fails to parse still yields a row so the collection stays
    /// enumerable.
    pub fn list(&self) -> Result<Vec<ModelSummary>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut summaries = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(id) = name.strip_suffix(".json") else {
                continue;
            };
            let summary = match std::fs::read_to_string(entry.path())
                .map_err(StrategyError::from)
                .and_then(|data| Ok(serde_json::from_str::<PersistedModel>(&data)?))
            {
                Ok(model) => ModelSummary {
                    id: id.to_string(),
                    name: model.metadata.name,
                    source: Some(model.metadata.source),
                    created_at: Some(model.metadata.created_at),
                    status: Some(model.metadata.status),
                    target_year: Some(model.metadata.target_year),
                    element_count: model.elements.len(),
                    relationship_count: model.relationships.len(),
                    error: None,
                },
                Err(_) => ModelSummary {
                    id: id.to_string(),
                    name: name.clone(),
                    source: None,
                    created_at: None,
                    status: None,
                    target_year: None,
                    element_count: 0,
                    relationship_count: 0,
                    error: Some("parse failed".to_string()),
                },
            };
            summaries.push(summary);
        }
        // Time-based ids sort chronologically.
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    /// Read one full document by id.
    pub fn get(&self, id: &str) -> Result<PersistedModel> {
        paths::validate_model_id(id)?;
        let path = self.dir.join(format!("{id}.json"));
        if !path.exists() {
            return Err(StrategyError::ModelNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn next_id(&self, now: DateTime<Utc>) -> String {
        let mut millis = now.timestamp_millis();
        loop {
            let id = format!("model-{millis}");
            if !self.dir.join(format!("{id}.json")).exists() {
                return id;
            }
            millis += 1;
        }
    }
}

/// Relationship endpoints that do not resolve to an element in the same
/// document. Reported, never enforced.
fn dangling_endpoints(
    elements: &[ModelElement],
    relationships: &[ModelRelationship],
) -> Vec<String> {
    let ids: HashSet<&str> = elements.iter().map(|e| e.id.as_str()).collect();
    let mut warnings = Vec::new();
    for rel in relationships {
        for endpoint in [&rel.source_id, &rel.target_id] {
            if !ids.contains(endpoint.as_str()) {
                warnings.push(format!(
                    "relationship '{}' references unknown element '{endpoint}'",
                    rel.id
                ));
            }
        }
    }
    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
