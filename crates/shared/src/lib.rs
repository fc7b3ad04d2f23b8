//! Shared utilities for the camera manager backend.
//!
//! - Session token signing and validation (HS256)
//! - Password hashing with Argon2id
//! - Login and text normalisation helpers
//! - Offset pagination arithmetic

pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
