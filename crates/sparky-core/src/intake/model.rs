//! Intake form domain model.

use serde::{Deserialize, Serialize};

/// The accepted intake record for one conversation.
///
/// Read-only after submission until a new conversation is explicitly
/// started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeData {
    pub full_name: String,
    pub job_title: String,
    pub industry: String,
    /// Experience level bracket, e.g. "3-5".
    pub experience: String,
    pub project_idea: String,
    /// Primary goal, e.g. "Launch a New Product".
    pub goal: String,
    /// Budget bracket label, e.g. "$5k - $15k".
    pub budget: String,
}

impl IntakeData {
    /// Checks required-field presence.
    ///
    /// Returns the names of the fields that are empty; an empty vector means
    /// the record is valid.
    pub fn validate(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.full_name.trim().is_empty() {
            missing.push("full_name");
        }
        if self.job_title.trim().is_empty() {
            missing.push("job_title");
        }
        if self.industry.trim().is_empty() {
            missing.push("industry");
        }
        if self.experience.trim().is_empty() {
            missing.push("experience");
        }
        if self.project_idea.trim().is_empty() {
            missing.push("project_idea");
        }
        if self.goal.trim().is_empty() {
            missing.push("goal");
        }
        if self.budget.trim().is_empty() {
            missing.push("budget");
        }
        missing
    }
}

/// An in-progress, partial intake record.
///
/// Every field is optional; a draft never fails validation. The slider
/// position is kept alongside the bracket label so re-opening the form
/// restores the control exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_idea: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    /// Raw slider position backing the budget bracket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<u32>,
}

impl IntakeDraft {
    /// Builds the submittable record if every required field is present.
    pub fn into_data(self) -> Option<IntakeData> {
        let data = IntakeData {
            full_name: self.full_name?,
            job_title: self.job_title?,
            industry: self.industry?,
            experience: self.experience?,
            project_idea: self.project_idea?,
            goal: self.goal?,
            budget: self.budget.unwrap_or_else(|| budget_label(5_000).to_string()),
        };
        if data.validate().is_empty() {
            Some(data)
        } else {
            None
        }
    }

    /// Seeds a draft from an accepted record (used when editing).
    pub fn from_data(data: &IntakeData) -> Self {
        Self {
            full_name: Some(data.full_name.clone()),
            job_title: Some(data.job_title.clone()),
            industry: Some(data.industry.clone()),
            experience: Some(data.experience.clone()),
            project_idea: Some(data.project_idea.clone()),
            goal: Some(data.goal.clone()),
            budget: Some(data.budget.clone()),
            budget_range: None,
        }
    }
}

/// Maps a raw budget slider position to its bracket label.
pub fn budget_label(amount: u32) -> &'static str {
    if amount < 5_000 {
        "< $5k"
    } else if amount < 15_000 {
        "$5k - $15k"
    } else if amount < 30_000 {
        "$15k - $30k"
    } else {
        "$30k+"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_data() -> IntakeData {
        IntakeData {
            full_name: "Jane Doe".to_string(),
            job_title: "Founder".to_string(),
            industry: "tech".to_string(),
            experience: "3-5".to_string(),
            project_idea: "AI scheduling tool".to_string(),
            goal: "Launch a New Product".to_string(),
            budget: "$5k - $15k".to_string(),
        }
    }

    #[test]
    fn test_complete_record_validates() {
        assert!(complete_data().validate().is_empty());
    }

    #[test]
    fn test_missing_fields_are_reported_by_name() {
        let mut data = complete_data();
        data.job_title = String::new();
        data.goal = "   ".to_string();
        assert_eq!(data.validate(), vec!["job_title", "goal"]);
    }

    #[test]
    fn test_budget_label_boundaries() {
        assert_eq!(budget_label(4_999), "< $5k");
        assert_eq!(budget_label(5_000), "$5k - $15k");
        assert_eq!(budget_label(14_999), "$5k - $15k");
        assert_eq!(budget_label(15_000), "$15k - $30k");
        assert_eq!(budget_label(30_000), "$30k+");
    }

    #[test]
    fn test_draft_into_data_requires_all_fields() {
        let mut draft = IntakeDraft::from_data(&complete_data());
        assert!(draft.clone().into_data().is_some());

        draft.industry = None;
        assert!(draft.into_data().is_none());
    }

    #[test]
    fn test_draft_serializes_only_present_fields() {
        let draft = IntakeDraft {
            full_name: Some("Jane".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&draft).unwrap();
        assert!(json.contains("fullName"));
        assert!(!json.contains("jobTitle"));
    }
}
