//! Caller-side resilience policies.

pub mod retry;
