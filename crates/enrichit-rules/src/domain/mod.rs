//! Domain model for the enrichment context.

pub mod commands;
pub mod enricher;
pub mod groups;
pub mod options;
pub mod patterns;
pub mod pipeline;
pub mod references;
pub mod rule;
