//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate engine calls and repository writes into host-level APIs.
//! - Keep CLI and request handlers decoupled from storage details.

pub mod linking_service;

pub use linking_service::{BatchReport, LinkingService, LinkingServiceError};
