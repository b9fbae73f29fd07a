//! Tests for delivery adapters.
