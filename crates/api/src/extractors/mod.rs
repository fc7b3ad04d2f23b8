//! Custom Axum extractors.

mod current_user;
