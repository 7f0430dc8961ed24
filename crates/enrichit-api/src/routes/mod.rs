//! Route modules.

pub mod enrichment;
pub mod health;
pub mod journals;
pub mod rule_groups;
