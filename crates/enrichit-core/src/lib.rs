//! Enrich It Core: shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that the enrichment
//! context and its adapters depend on. It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod document;
pub mod error;
pub mod vocabulary;
