//! Integration test suite entry point.

mod api_backend_tests;
mod concurrency_tests;
mod fixture;
mod loader_tests;
mod scenario_tests;
mod shipped_data_tests;
