use crate::types::CheckStatus;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ValidationReport
// ---------------------------------------------------------------------------

/// Structured health report produced by the validate-model sub-skill
/// alongside (or instead of) corrected elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ReportSummary>,
    #[serde(default)]
    pub checks: Vec<ValidationCheck>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ReportIssue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_health: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub name: String,
    pub status: CheckStatus,
    /// Some generations put the explanation under `message` instead.
    #[serde(default, alias = "message", skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportIssue {
    #[serde(default)]
    pub severity: String,
    pub message: String,
}

impl ValidationReport {
    /// Lenient parse from an extracted generation value. Returns `None` when
    /// the value carries no report-shaped content at all.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        if value.get("summary").is_none()
            && value.get("checks").is_none()
            && value.get("issues").is_none()
        {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    pub fn is_healthy(&self) -> bool {
        self.checks.iter().all(|c| c.status == CheckStatus::Pass)
    }

    /// Checks that qualify for a targeted fix call, with their positions.
    pub fn fixable_checks(&self) -> Vec<(usize, &ValidationCheck)> {
        self.checks
            .iter()
            .enumerate()
            .filter(|(_, c)| c.status.needs_fix())
            .collect()
    }
}

impl ValidationCheck {
    /// One-line description embedded into a fix request.
    pub fn describe(&self) -> String {
        match &self.detail {
            Some(detail) => format!("{} - {}", self.name, detail),
            None => self.name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
