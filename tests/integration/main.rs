//! Integration tests for the harvest pipeline

mod harvest_tests;
