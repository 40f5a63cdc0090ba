//! File-backed infrastructure for Sparky.
//!
//! Implements the core repository and service traits on top of the local
//! filesystem: atomic JSON files under the user's config directory stand in
//! for the browser-local persistent store of the original product.

pub mod config_service;
pub mod json_intake_repository;
pub mod json_transcript_repository;
pub mod paths;
pub mod secret_service;
pub mod storage;

pub use config_service::ConfigService;
pub use json_intake_repository::JsonIntakeRepository;
pub use json_transcript_repository::JsonTranscriptRepository;
pub use paths::SparkyPaths;
pub use secret_service::SecretServiceImpl;
