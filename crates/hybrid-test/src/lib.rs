//! Hybrid Test - shared fixtures and mock collaborators for testing the
//! hybrid inference execution core across crate boundaries.
//!
//! Add as a dev-dependency:
//!
//! ```toml
//! [dev-dependencies]
//! hybrid-test.workspace = true
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
