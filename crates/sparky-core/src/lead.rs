//! Lead capture domain model.

use serde::{Deserialize, Serialize};

/// Fixed confirmation appended to the transcript when a lead is submitted.
pub const CONFIRMATION: &str = "Thank you! Your project details have been received. A specialist from the firesites.tech team will review your information and contact you at your email within 24 business hours to discuss the next steps.";

/// A qualified project lead.
///
/// Created once from the lead form, submitted, and never mutated after
/// submission; delivery to a human is an external collaborator concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub full_name: String,
    pub email: String,
    pub project_description: String,
    /// Budget bracket label, e.g. "$15k - $30k".
    pub budget: String,
}

impl Lead {
    /// Checks required-field presence.
    ///
    /// Returns the names of the fields that are empty; an empty vector means
    /// the record is valid.
    pub fn validate(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.full_name.trim().is_empty() {
            missing.push("full_name");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if self.project_description.trim().is_empty() {
            missing.push("project_description");
        }
        if self.budget.trim().is_empty() {
            missing.push("budget");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_lead_validates() {
        let lead = Lead {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            project_description: "AI scheduling tool".to_string(),
            budget: "$5k - $15k".to_string(),
        };
        assert!(lead.validate().is_empty());
    }

    #[test]
    fn test_empty_fields_block_submission() {
        let lead = Lead {
            full_name: String::new(),
            email: "jane@example.com".to_string(),
            project_description: String::new(),
            budget: "$5k - $15k".to_string(),
        };
        assert_eq!(lead.validate(), vec!["full_name", "project_description"]);
    }
}
