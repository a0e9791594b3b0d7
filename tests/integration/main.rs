//! Integration tests
//!
//! `library_tests` run against a throwaway database created by `sqlx::test`
//! (needs DATABASE_URL). `api_tests` talk to a running server.
//! Both are ignored by default: `cargo test -- --ignored`

mod api_tests;
mod library_tests;
