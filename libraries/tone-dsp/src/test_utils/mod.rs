//! Test utilities for tone control testing
//!
//! Signal generators and simple measurements used by unit and integration
//! tests. Enabled in-crate for tests, and for other crates through the
//! `test-utils` feature.

pub mod analysis;
pub mod signals;

pub use analysis::*;
pub use signals::*;
