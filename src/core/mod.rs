//! Core types shared across minpin.
//!
//! This module hosts the crate-wide error type and its display helpers.
//! Everything else in the crate reports failures through [`MinpinError`]
//! (directly or wrapped in [`anyhow::Error`] with added context).

pub mod error;

pub use error::{MinpinError, user_friendly_error};
