//! Flow Narrowing Utilities Module
//!
//! Thin wrappers for flow narrowing queries, delegating to solver.
//! The actual narrowing implementation lives in `control_flow_narrowing.rs`
//! and the solver's narrowing module.
