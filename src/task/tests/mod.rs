//! Test suite for group task tracking.

mod support;
