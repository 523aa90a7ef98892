//! HTTP API handlers

pub mod analytics;
pub mod auth;
pub mod campaigns;
pub mod error;
pub mod health;
pub mod responses;
pub mod surveys;

pub use error::ApiError;
