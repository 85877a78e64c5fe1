//! Test suite for group membership management.

mod invariant_tests;
mod lifecycle_tests;
mod support;
