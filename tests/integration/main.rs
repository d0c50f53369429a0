//! Live-server integration tests
//!
//! Start the server against PostgreSQL, then run:
//! `cargo test --test integration -- --ignored`

mod api_tests;
