//! Integration tests for Lemma-Search
//!
//! These tests use wiremock to serve small sites and exercise crawling,
//! single-page indexing and search end-to-end against a SQLite database.

mod common;
mod crawl_tests;
mod index_tests;
mod search_tests;
