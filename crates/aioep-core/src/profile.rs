//! Company profile — read-mostly settings used to pre-fill the wizard's
//! vision input and default the target year. Stored as JSON at
//! `.aioep/settings.json`; a missing file yields the defaults.

use crate::error::Result;
use crate::io;
use crate::paths;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// CompanyProfile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyProfile {
    pub company_name: String,
    pub industry: String,
    pub annual_revenue: String,
    pub employee_count: String,
    pub description: String,
    pub strategic_cycle: String,
    pub current_year: i32,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            industry: String::new(),
            annual_revenue: String::new(),
            employee_count: String::new(),
            description: String::new(),
            strategic_cycle: "annual".to_string(),
            current_year: Utc::now().year(),
        }
    }
}

impl CompanyProfile {
    /// Load the profile; defaults when the file is absent or unreadable.
    pub fn load(root: &Path) -> Self {
        let path = paths::settings_path(root);
        std::fs::read_to_string(&path)
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::settings_path(root);
        let data = serde_json::to_vec_pretty(self)?;
        io::atomic_write(&path, &data)
    }

    /// Shallow-merge a JSON patch over the current profile (PUT semantics:
    /// unknown keys are dropped, present keys overwrite, absent keys keep
    /// their current value).
    pub fn merged(&self, patch: serde_json::Value) -> Result<Self> {
        let mut current = serde_json::to_value(self)?;
        if let (Some(base), Some(overlay)) = (current.as_object_mut(), patch.as_object()) {
            for (key, value) in overlay {
                base.insert(key.clone(), value.clone());
            }
        }
        Ok(serde_json::from_value(current)?)
    }

    /// Pre-fill text for the wizard's vision input: a background block from
    /// whatever profile fields are set, plus a scaffold for the vision
    /// itself. `None` when nothing is filled in.
    pub fn prefill(&self) -> Option<String> {
        let mut parts = Vec::new();
        if !self.company_name.is_empty() {
            parts.push(format!("Company: {}", self.company_name));
        }
        if !self.industry.is_empty() {
            parts.push(format!("Industry: {}", self.industry));
        }
        if !self.annual_revenue.is_empty() {
            parts.push(format!("Annual revenue: {}", self.annual_revenue));
        }
        if !self.employee_count.is_empty() {
            parts.push(format!("Employees: {}", self.employee_count));
        }
        if !self.description.is_empty() {
            parts.push(format!("About: {}", self.description));
        }
        if parts.is_empty() {
            return None;
        }
        Some(format!(
            "[Company background] {}\n\n[Strategic vision and pain points]\n",
            parts.join("; ")
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_defaults_when_absent() {
        let dir = TempDir::new().unwrap();
        let profile = CompanyProfile::load(dir.path());
        assert_eq!(profile.strategic_cycle, "annual");
        assert!(profile.company_name.is_empty());
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let profile = CompanyProfile {
            company_name: "Acme Logistics".to_string(),
            industry: "logistics".to_string(),
            current_year: 2027,
            ..CompanyProfile::default()
        };
        profile.save(dir.path()).unwrap();

        let loaded = CompanyProfile::load(dir.path());
        assert_eq!(loaded, profile);
    }

    #[test]
    fn wire_format_is_camel_case() {
        let value = serde_json::to_value(CompanyProfile::default()).unwrap();
        assert!(value.get("companyName").is_some());
        assert!(value.get("currentYear").is_some());
        assert!(value.get("strategicCycle").is_some());
    }

    #[test]
    fn merged_overwrites_present_keys_only() {
        let profile = CompanyProfile {
            company_name: "Acme".to_string(),
            industry: "retail".to_string(),
            ..CompanyProfile::default()
        };
        let updated = profile
            .merged(serde_json::json!({"industry": "logistics", "currentYear": 2030}))
            .unwrap();
        assert_eq!(updated.company_name, "Acme");
        assert_eq!(updated.industry, "logistics");
        assert_eq!(updated.current_year, 2030);
    }

    #[test]
    fn prefill_none_when_empty() {
        assert_eq!(CompanyProfile::default().prefill(), None);
    }

    #[test]
    fn prefill_joins_set_fields() {
        let profile = CompanyProfile {
            company_name: "Acme".to_string(),
            employee_count: "1200".to_string(),
            ..CompanyProfile::default()
        };
        let text = profile.prefill().unwrap();
        assert!(text.starts_with("[Company background] Company: Acme; Employees: 1200"));
        assert!(text.ends_with("[Strategic vision and pain points]\n"));
    }
}
