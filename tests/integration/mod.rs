//! Integration test suite for minpin.
//!
//! End-to-end tests that exercise the resolver against real metadata files
//! on disk and the CLI binary itself.
//!
//! # Running
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **scenarios**: resolver behavior against the fixture setup.cfg and
//!   pyproject.toml (marker selection, platform conditionals, extras
//!   closure, warning diagnostics, merge determinism)
//! - **cli**: the `minpin generate` command surface (output path selection,
//!   override layering, error reporting)

mod cli;
mod scenarios;
