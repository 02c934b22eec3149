//! # Model
//!
//! Persistence collaborators. Repositories are thin pass-throughs over SQL;
//! they report `sqlx::Error` and leave classification to the web layer.

pub mod store;
