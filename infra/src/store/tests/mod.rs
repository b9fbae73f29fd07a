//! Tests for the in-memory store.
