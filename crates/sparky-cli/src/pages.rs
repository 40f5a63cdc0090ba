//! Placeholder copy for the marketing surfaces.
//!
//! Page content and layout belong to the web shell; the terminal shell only
//! proves out navigation and gating, so each page renders a short fixed
//! blurb.

use colored::Colorize;
use sparky_core::flow::FlowState;

/// Renders the active page, if the state is a renderable surface.
pub fn render(state: &FlowState) {
    match state {
        FlowState::Landing => {
            println!("{}", "firesites.tech — We build AI-native applications.".bold());
            println!("Explore: /services /pricing /cases /about /contact");
            println!("Start a project: /intake   Resume your conversation: /chat");
        }
        FlowState::Services => {
            println!("{}", "Services".bold());
            println!("1. AI-Native SaaS & MVP Development — idea to launch-ready product.");
            println!("2. AI Upgrade & Integration — add AI to your existing app.");
            println!("3. Real-Time & Interactive Platforms — dashboards and communities.");
        }
        FlowState::Pricing => {
            println!("{}", "Pricing".bold());
            println!("Ignite AI Package    — from $5,000  (AI upgrades)");
            println!("Blaze Platform       — from $15,000 (real-time platforms)");
            println!("Inferno Studio       — from $30,000 (AI-native SaaS/MVPs)");
        }
        FlowState::CaseStudies => {
            println!("{}", "Case Studies".bold());
            println!("Selected client work is published on the website.");
        }
        FlowState::About => {
            println!("{}", "About".bold());
            println!("A development agency running on the F.I.R.E. stack.");
        }
        FlowState::Contact => {
            println!("{}", "Contact".bold());
            println!("hello@firesites.tech — or talk to Sparky via /chat.");
        }
        FlowState::Calculators => {
            println!("{}", "Project Cost Calculator".bold());
            println!("The interactive calculators live in the web shell.");
            println!("Return to your conversation with /chat.");
        }
        _ => {}
    }
}

/// Prompt label for the current state.
pub fn prompt(state: &FlowState) -> String {
    match state {
        FlowState::Chatting => ">> ".to_string(),
        FlowState::Qualified { .. } => "[qualified] >> ".to_string(),
        FlowState::Landing => "[landing] >> ".to_string(),
        FlowState::Services => "[services] >> ".to_string(),
        FlowState::Pricing => "[pricing] >> ".to_string(),
        FlowState::CaseStudies => "[cases] >> ".to_string(),
        FlowState::About => "[about] >> ".to_string(),
        FlowState::Contact => "[contact] >> ".to_string(),
        FlowState::Calculators => "[calculators] >> ".to_string(),
        _ => ">> ".to_string(),
    }
}
