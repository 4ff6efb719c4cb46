//! minpin - minimum dependency version pinning for Python projects
//!
//! A tool that computes the minimum allowable versions of a Python project's
//! declared dependencies and pins them into a constraints file, so that test
//! runs can verify the project still works with the oldest supported version
//! of every dependency.
//!
//! # How It Works
//!
//! A Python project declares lower bounds on its dependencies (`numpy>=1.16.0`)
//! but CI almost always installs the newest release, so the declared minimums
//! rot silently. minpin reads the project's declared dependency metadata,
//! extracts the lower bound of every requirement that applies to the target
//! environment, and writes a pip constraints file (`numpy==1.16.0`) that forces
//! the installer to use exactly those minimums.
//!
//! Two metadata formats are supported:
//! - `setup.cfg` - the legacy declarative setuptools format, where
//!   `install_requires` and `options.extras_require` hold one requirement
//!   per line
//! - `pyproject.toml` - the modern PEP 621 format, with `project.dependencies`
//!   and `project.optional-dependencies` tables
//!
//! Requirements carry PEP 508 environment markers
//! (`numpy>=1.16.0; python_version < "3.8"`) which are evaluated against a
//! caller-supplied target environment, and optional-dependency groups can
//! reference each other through self-referential extras
//! (`myproject[docs]`), which minpin resolves transitively.
//!
//! # Core Modules
//!
//! - [`requirement`] - PEP 508 requirement specifier parsing and lower-bound
//!   extraction, including environment marker evaluation
//! - [`metadata`] - setup.cfg / pyproject.toml readers and the transitive
//!   extras closure
//! - [`constraints`] - the resolved name-to-version mapping and the
//!   constraints file writer
//! - [`version`] - dotted-release version ordering used by marker evaluation
//! - [`core`] - error types shared across the crate
//! - [`cli`] - command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use minpin_cli::metadata;
//! use minpin_cli::requirement::MarkerEnvironment;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let env = MarkerEnvironment::new("3.10", "3.10.1");
//! let resolved = metadata::parse_pyproject_toml(
//!     Path::new("pyproject.toml"),
//!     &env,
//!     &["test".to_string()],
//! )?;
//! for (name, version) in resolved.constraints.iter() {
//!     println!("{name}=={version}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Pin the minimums of the project in the current directory
//! minpin generate --python-version 3.10
//!
//! # Include optional-dependency groups and write to a specific file
//! minpin generate --python-version 3.8 --extra test --extra docs \
//!     --output constraints.txt
//!
//! # Layer ad-hoc overrides on top of the metadata-derived set
//! minpin generate --python-version 3.10 --constraint "numpy==1.20.0"
//! ```

// Core functionality modules
pub mod constraints;
pub mod core;
pub mod metadata;
pub mod requirement;
pub mod version;

// Command-line interface
pub mod cli;
