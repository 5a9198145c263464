use crate::types::{ElementType, RelationshipType};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ModelElement
// ---------------------------------------------------------------------------

/// A typed motivation-model node. The required fields are fixed; the model
/// may attach extra attributes, which land in `extra` untouched so the
/// persisted document round-trips whatever the generation produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelElement {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ModelElement {
    pub fn new(
        id: impl Into<String>,
        element_type: ElementType,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            element_type,
            name: name.into(),
            description: description.into(),
            severity: None,
            target: None,
            priority: None,
            extra: serde_json::Map::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// ModelRelationship
// ---------------------------------------------------------------------------

/// A typed directed edge between two elements. Endpoints are ids; whether
/// they resolve is checked only as a non-fatal warning at save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRelationship {
    pub id: String,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
    pub source_id: String,
    pub target_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

// ---------------------------------------------------------------------------
// StageResult
// ---------------------------------------------------------------------------

/// The output of one pipeline stage: elements and relationships scoped to
/// that stage. The validate stage may legitimately produce neither.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    #[serde(default)]
    pub elements: Vec<ModelElement>,
    #[serde(default)]
    pub relationships: Vec<ModelRelationship>,
}

impl StageResult {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.relationships.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CumulativeModel
// ---------------------------------------------------------------------------

/// The union of all confirmed stages' elements and relationships at a point
/// in time. Read-only snapshot passed as context into later generations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CumulativeModel {
    #[serde(default)]
    pub elements: Vec<ModelElement>,
    #[serde(default)]
    pub relationships: Vec<ModelRelationship>,
}

impl CumulativeModel {
    /// Union in stage-execution order; id uniqueness is natural, no dedup.
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a StageResult>) -> Self {
        let mut merged = Self::default();
        for result in results {
            merged.elements.extend(result.elements.iter().cloned());
            merged
                .relationships
                .extend(result.relationships.iter().cloned());
        }
        merged
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.relationships.is_empty()
    }

    pub fn element(&self, id: &str) -> Option<&ModelElement> {
        self.elements.iter().find(|e| e.id == id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
