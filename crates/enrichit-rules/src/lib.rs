//! Enrich It: journal enrichment bounded context.
//!
//! Responsible for rewriting narrative rules text into roll and reference
//! directives: the rule catalog and its fixed application order, the
//! reference annotator, the rule group toggle tree, and the batch pipeline
//! that computes the minimal set of changed pages.

pub mod application;
pub mod domain;
