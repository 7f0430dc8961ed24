//! Single-occurrence reference annotation.
//!
//! Appends ` (See &Reference[<key>])` after the first qualifying occurrence
//! of each referenceable label. A label is annotated at most once per
//! document: keys already anchored anywhere in the document, in either the
//! raw `&Reference[` or the HTML-escaped `&amp;Reference[` form, are never
//! annotated again.

use std::collections::HashSet;
use std::sync::LazyLock;

use enrichit_core::error::DomainError;
use enrichit_core::vocabulary::VocabularyEntry;
use regex::{Captures, Regex, RegexBuilder};

/// Existing back-reference anchors.
static EXISTING_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(\s*See\s+&(?:amp;)?Reference\[([^\]]*)\]\s*\)")
        .expect("reference anchor pattern is valid")
});

/// Formats the annotation appended after a label.
#[must_use]
pub fn reference_annotation(label: &str) -> String {
    format!(" (See &Reference[{}])", label.to_lowercase())
}

/// Tags referenceable terms of one dataset.
#[derive(Debug, Clone)]
pub struct ReferenceAnnotator {
    /// Whole-word alternation of every referenceable label, or `None` when
    /// the dataset has no referenceable entries.
    pattern: Option<Regex>,
    /// Lower-cased labels; a label's lower-cased form is its reference key.
    keys: HashSet<String>,
}

impl ReferenceAnnotator {
    /// Builds an annotator from the referenceable entries of a dataset.
    /// Entries not flagged referenceable are ignored.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the label alternation cannot be
    /// compiled.
    pub fn new<'a>(
        entries: impl IntoIterator<Item = &'a VocabularyEntry>,
    ) -> Result<Self, DomainError> {
        let mut labels: Vec<&str> = Vec::new();
        let mut keys = HashSet::new();
        for entry in entries.into_iter().filter(|e| e.is_referenceable) {
            let label = entry.display_label.trim();
            if label.is_empty() {
                continue;
            }
            if keys.insert(label.to_lowercase()) {
                labels.push(label);
            }
        }

        if labels.is_empty() {
            return Ok(Self {
                pattern: None,
                keys,
            });
        }

        // Longest first so multi-word labels win over their prefixes.
        labels.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = labels
            .iter()
            .map(|label| regex::escape(label))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
            .case_insensitive(true)
            .build()
            .map_err(|e| DomainError::Validation(format!("invalid reference labels: {e}")))?;

        Ok(Self {
            pattern: Some(pattern),
            keys,
        })
    }

    /// Annotates the first qualifying occurrence of every label not yet
    /// annotated in `content`.
    ///
    /// An occurrence does not qualify when it sits inside an open
    /// parenthetical or is directly followed by one. Occurrences inside an
    /// HTML tag, such as attribute values, are skipped.
    #[must_use]
    pub fn annotate(&self, content: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return content.to_owned();
        };

        let mut annotated: HashSet<String> = EXISTING_ANCHOR
            .captures_iter(content)
            .map(|caps| caps[1].trim().to_lowercase())
            .collect();

        pattern
            .replace_all(content, |caps: &Captures<'_>| {
                let term = &caps[0];
                let Some(whole) = caps.get(0) else {
                    return term.to_owned();
                };
                let key = term.to_lowercase();
                if !self.keys.contains(&key)
                    || annotated.contains(&key)
                    || is_inside_tag(&content[..whole.start()])
                    || is_parenthesized(&content[whole.end()..])
                {
                    return term.to_owned();
                }

                let annotation = reference_annotation(&key);
                annotated.insert(key);
                format!("{term}{annotation}")
            })
            .into_owned()
    }
}

/// Whether the text following a match closes a parenthetical before opening
/// one, or starts with a parenthetical.
fn is_parenthesized(rest: &str) -> bool {
    if rest.trim_start().starts_with('(') {
        return true;
    }
    rest.chars()
        .find(|c| matches!(c, '(' | ')'))
        .is_some_and(|c| c == ')')
}

/// Whether the text before a match leaves an HTML tag open.
fn is_inside_tag(before: &str) -> bool {
    match (before.rfind('<'), before.rfind('>')) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        _ => false,
    }
}
