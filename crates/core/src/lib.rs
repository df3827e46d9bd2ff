//! Evaluation, match aggregation and role-scoped projections for the
//! challenge marketplace.
//!
//! The crate is storage agnostic: everything that touches persisted records
//! goes through [`store::EvaluationStore`].

pub mod domain;
pub mod engine;
pub mod memory;
pub mod store;
