//! Application services for the enrichment context.

pub mod command_handlers;
pub mod query_handlers;
