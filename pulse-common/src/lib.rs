//! # Pulse Common Library
//!
//! Shared code for the Pulse survey platform:
//! - Error taxonomy
//! - Configuration loading
//! - Database schema initialization
//! - Domain model types (surveys, versions, questions, campaigns, responses)
//! - Skip-logic validation and evaluation
//! - Submission validation
//! - Analytics aggregation

pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod registry;
pub mod skiplogic;
pub mod submission;
pub mod value;

pub use error::{Error, Result};
pub use registry::QuestionRegistry;
