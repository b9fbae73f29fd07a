//! Unit tests for domain entities.

mod brute_force_tests;
