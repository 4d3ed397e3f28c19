//! Integration test suite

mod config_tests;
mod crawl_tests;
mod support;
