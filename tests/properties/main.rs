//! Property-based tests for matcher invariants.

mod matcher_properties;
