//! Intake domain module.
//!
//! The intake record is collected once per conversation and seeds the
//! model's context; a partial draft is kept while the form is being filled
//! so a reload never loses the user's answers.

mod model;
mod repository;

pub use model::{budget_label, IntakeData, IntakeDraft};
pub use repository::IntakeRepository;
