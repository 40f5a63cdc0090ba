//! Application flow state.
//!
//! A single enumerated value is the source of truth for which top-level
//! surface is active and which user actions are available. Each variant
//! carries only the data valid in that state.

use crate::lead::Lead;
use serde::{Deserialize, Serialize};

/// The active top-level surface of the application.
///
/// Exactly one state is active at a time. Transitions are synchronous and
/// total: a navigation request whose precondition is unmet leaves the state
/// unchanged instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum FlowState {
    /// Startup: the bootstrapper has not yet decided where to land.
    Loading,
    /// Marketing landing page.
    Landing,
    /// Intake form; required before a conversation can start.
    Intake,
    /// Active conversation with the model.
    Chatting,
    /// The model asked for the lead form; waiting for the user to submit it.
    Qualifying,
    /// A lead has been submitted; terminal state of the conversation funnel.
    Qualified {
        /// The submitted lead record.
        lead: Lead,
    },
    /// Cost calculators, part of the chat shell.
    Calculators,
    /// Services marketing page.
    Services,
    /// Pricing marketing page.
    Pricing,
    /// Case studies marketing page.
    CaseStudies,
    /// About marketing page.
    About,
    /// Contact marketing page.
    Contact,
}

/// User-navigable destinations.
///
/// Transitions driven by the conversation itself (sentinel detection, lead
/// submission, intake submission, reset) are not navigation and are applied
/// by the chat service directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    Landing,
    Intake,
    /// Resume the persisted conversation; requires accepted intake data.
    ResumeChat,
    Services,
    Pricing,
    CaseStudies,
    About,
    Contact,
    Calculators,
}

impl FlowState {
    /// Returns `true` for the freely navigable marketing pages.
    pub fn is_marketing_page(&self) -> bool {
        matches!(
            self,
            FlowState::Landing
                | FlowState::Services
                | FlowState::Pricing
                | FlowState::CaseStudies
                | FlowState::About
                | FlowState::Contact
        )
    }

    /// Returns `true` when the chat shell (conversation surfaces) is active.
    pub fn is_chat_shell(&self) -> bool {
        matches!(
            self,
            FlowState::Chatting
                | FlowState::Qualifying
                | FlowState::Qualified { .. }
                | FlowState::Calculators
        )
    }

    /// Returns `true` when chat input submission is meaningful.
    pub fn accepts_chat_input(&self) -> bool {
        matches!(self, FlowState::Chatting)
    }

    /// Applies a navigation request, returning the next state.
    ///
    /// `has_intake` reports whether accepted intake data exists; resuming a
    /// conversation is gated on it. Unmet preconditions return the current
    /// state unchanged.
    pub fn navigate(&self, target: NavTarget, has_intake: bool) -> FlowState {
        match target {
            NavTarget::Landing if self.is_marketing_page() => FlowState::Landing,
            NavTarget::Intake if matches!(self, FlowState::Landing) => FlowState::Intake,
            NavTarget::ResumeChat
                if has_intake
                    && (matches!(self, FlowState::Landing | FlowState::Calculators)) =>
            {
                FlowState::Chatting
            }
            NavTarget::Services if self.is_marketing_page() => FlowState::Services,
            NavTarget::Pricing if self.is_marketing_page() => FlowState::Pricing,
            NavTarget::CaseStudies if self.is_marketing_page() => FlowState::CaseStudies,
            NavTarget::About if self.is_marketing_page() => FlowState::About,
            NavTarget::Contact if self.is_marketing_page() => FlowState::Contact,
            NavTarget::Calculators
                if matches!(self, FlowState::Chatting | FlowState::Qualified { .. }) =>
            {
                FlowState::Calculators
            }
            _ => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead() -> Lead {
        Lead {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            project_description: "AI scheduling tool".to_string(),
            budget: "$5k - $15k".to_string(),
        }
    }

    #[test]
    fn test_marketing_pages_navigate_freely() {
        let state = FlowState::Services;
        assert_eq!(
            state.navigate(NavTarget::Pricing, false),
            FlowState::Pricing
        );
        assert_eq!(
            state.navigate(NavTarget::Landing, false),
            FlowState::Landing
        );
        assert_eq!(
            FlowState::Landing.navigate(NavTarget::About, false),
            FlowState::About
        );
    }

    #[test]
    fn test_intake_only_from_landing() {
        assert_eq!(
            FlowState::Landing.navigate(NavTarget::Intake, false),
            FlowState::Intake
        );
        assert_eq!(
            FlowState::Pricing.navigate(NavTarget::Intake, false),
            FlowState::Pricing
        );
    }

    #[test]
    fn test_resume_requires_intake_data() {
        assert_eq!(
            FlowState::Landing.navigate(NavTarget::ResumeChat, false),
            FlowState::Landing
        );
        assert_eq!(
            FlowState::Landing.navigate(NavTarget::ResumeChat, true),
            FlowState::Chatting
        );
    }

    #[test]
    fn test_calculators_gated_to_chat_shell() {
        assert_eq!(
            FlowState::Landing.navigate(NavTarget::Calculators, true),
            FlowState::Landing
        );
        assert_eq!(
            FlowState::Chatting.navigate(NavTarget::Calculators, true),
            FlowState::Calculators
        );
        assert_eq!(
            FlowState::Qualified { lead: lead() }.navigate(NavTarget::Calculators, true),
            FlowState::Calculators
        );
        // Mid-form qualification is not interruptible by navigation
        assert_eq!(
            FlowState::Qualifying.navigate(NavTarget::Calculators, true),
            FlowState::Qualifying
        );
    }

    #[test]
    fn test_calculators_returns_to_chat() {
        assert_eq!(
            FlowState::Calculators.navigate(NavTarget::ResumeChat, true),
            FlowState::Chatting
        );
    }

    #[test]
    fn test_chat_input_only_while_chatting() {
        assert!(FlowState::Chatting.accepts_chat_input());
        assert!(!FlowState::Qualifying.accepts_chat_input());
        assert!(!FlowState::Qualified { lead: lead() }.accepts_chat_input());
        assert!(!FlowState::Landing.accepts_chat_input());
    }

    #[test]
    fn test_qualified_state_carries_the_lead() {
        let state = FlowState::Qualified { lead: lead() };
        if let FlowState::Qualified { lead } = state {
            assert_eq!(lead.full_name, "Jane Doe");
        } else {
            panic!("expected qualified state");
        }
    }
}
