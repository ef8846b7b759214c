//! Shared helpers for the integration tests
//!
//! The fixtures are the ones the unit tests build, compiled into this test
//! crate as well.

#[allow(dead_code)]
#[path = "../../src/test_support.rs"]
mod fixtures;

pub(crate) use fixtures::{create_test_pdf, page_labels};
