//! Domain layer for the camera manager backend.
//!
//! This crate contains:
//! - Domain models (User, Local, Product, list filters)
//! - Storage and collaborator ports
//! - Use cases and the permission layer that guards them
//! - Domain error types

pub mod error;
pub mod models;
pub mod ports;
pub mod services;

pub use error::{DomainError, DomainResult};
