//! Domain vocabulary and the resolver that maps free text onto it.
//!
//! The vocabulary is an externally supplied, read-only dataset of abilities,
//! skills, tools, damage types, currencies and reference terms. It is built
//! once at startup and shared by every rule.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A vocabulary category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    /// Ability scores (Strength, Dexterity, ...).
    Abilities,
    /// Skills (Athletics, Stealth, ...).
    Skills,
    /// Tool proficiencies (Thieves' Tools, ...).
    Tools,
    /// Damage types (fire, piercing, ...).
    DamageTypes,
    /// Currency denominations (gp, sp, ...).
    Currencies,
    /// Conditions (Blinded, Prone, ...).
    Conditions,
    /// Creature types (Beast, Humanoid, ...).
    CreatureTypes,
    /// Area-of-effect target shapes (Cone, Sphere, ...).
    AreaTargetTypes,
    /// Schools of magic (Evocation, ...).
    SpellSchools,
    /// Spell components (Verbal, Somatic, Material).
    SpellComponents,
    /// Spell tags (Concentration, Ritual).
    SpellTags,
    /// Free-standing rule terms. Label-only and always referenceable.
    Rules,
}

impl Category {
    /// The dataset key for this category.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Abilities => "abilities",
            Self::Skills => "skills",
            Self::Tools => "tools",
            Self::DamageTypes => "damageTypes",
            Self::Currencies => "currencies",
            Self::Conditions => "conditions",
            Self::CreatureTypes => "creatureTypes",
            Self::AreaTargetTypes => "areaTargetTypes",
            Self::SpellSchools => "spellSchools",
            Self::SpellComponents => "spellComponents",
            Self::SpellTags => "spellTags",
            Self::Rules => "rules",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One canonical domain concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// Stable identifier emitted into directives.
    pub canonical_key: String,
    /// Human-facing label as it appears in narrative text.
    pub display_label: String,
    /// Whether reference-style rules may annotate this entry.
    pub is_referenceable: bool,
}

impl VocabularyEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(
        canonical_key: impl Into<String>,
        display_label: impl Into<String>,
        is_referenceable: bool,
    ) -> Self {
        Self {
            canonical_key: canonical_key.into(),
            display_label: display_label.into(),
            is_referenceable,
        }
    }
}

/// Strips apostrophes (straight and curly) and whitespace, then lowercases.
///
/// `"Thieves' Tools"`, `"thieves tools"` and `"THIEVESTOOLS"` all normalize
/// to `"thievestools"`.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\u{2019}' | '\u{2018}' | '\'') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Default, Clone)]
struct CategoryTable {
    entries: Vec<VocabularyEntry>,
    by_key: HashMap<String, usize>,
    by_label: HashMap<String, usize>,
}

impl CategoryTable {
    fn insert(&mut self, category: Category, entry: VocabularyEntry) -> Result<(), DomainError> {
        let key = normalize_text(&entry.canonical_key);
        if key.is_empty() {
            return Err(DomainError::Validation(format!(
                "{category} entry has an empty canonical key"
            )));
        }
        if self.by_key.contains_key(&key) {
            return Err(DomainError::Validation(format!(
                "duplicate canonical key '{}' in {category}",
                entry.canonical_key
            )));
        }

        let index = self.entries.len();
        self.by_key.entry(key).or_insert(index);
        let label = normalize_text(&entry.display_label);
        if !label.is_empty() {
            self.by_label.entry(label).or_insert(index);
        }
        self.entries.push(entry);
        Ok(())
    }
}

/// Read-only vocabulary, keyed by category.
#[derive(Debug, Default, Clone)]
pub struct Vocabulary {
    tables: HashMap<Category, CategoryTable>,
}

impl Vocabulary {
    /// Builds a vocabulary from `(category, entry)` pairs.
    ///
    /// Entries of [`Category::Rules`] are always referenceable.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a canonical key is empty or
    /// appears twice within one category.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (Category, VocabularyEntry)>,
    ) -> Result<Self, DomainError> {
        let mut tables: HashMap<Category, CategoryTable> = HashMap::new();
        for (category, mut entry) in entries {
            if category == Category::Rules {
                entry.is_referenceable = true;
            }
            tables.entry(category).or_default().insert(category, entry)?;
        }
        Ok(Self { tables })
    }

    /// Parses a JSON dataset.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the document is malformed or
    /// violates a category invariant.
    pub fn from_json(source: &str) -> Result<Self, DomainError> {
        let raw: RawDataset = serde_json::from_str(source)
            .map_err(|e| DomainError::Validation(format!("invalid vocabulary JSON: {e}")))?;
        Self::from_raw(raw)
    }

    /// Parses a YAML dataset.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the document is malformed or
    /// violates a category invariant.
    pub fn from_yaml(source: &str) -> Result<Self, DomainError> {
        let raw: RawDataset = serde_yaml::from_str(source)
            .map_err(|e| DomainError::Validation(format!("invalid vocabulary YAML: {e}")))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawDataset) -> Result<Self, DomainError> {
        let entries = raw
            .into_iter()
            .flat_map(|(category, raw_category)| {
                raw_category
                    .into_entries(category)
                    .into_iter()
                    .map(move |entry| (category, entry))
            });
        Self::from_entries(entries)
    }

    /// Looks up the entry whose canonical key or display label matches
    /// `free_text` after normalization. Canonical keys take precedence.
    #[must_use]
    pub fn resolve(&self, category: Category, free_text: &str) -> Option<&VocabularyEntry> {
        let table = self.tables.get(&category)?;
        let needle = normalize_text(free_text);
        if needle.is_empty() {
            return None;
        }
        table
            .by_key
            .get(&needle)
            .or_else(|| table.by_label.get(&needle))
            .map(|&index| &table.entries[index])
    }

    /// Returns every entry of a category, in insertion order.
    #[must_use]
    pub fn entries(&self, category: Category) -> &[VocabularyEntry] {
        self.tables
            .get(&category)
            .map(|table| table.entries.as_slice())
            .unwrap_or_default()
    }

    /// Returns the referenceable entries across the given categories.
    #[must_use]
    pub fn referenceable(&self, categories: &[Category]) -> Vec<&VocabularyEntry> {
        categories
            .iter()
            .flat_map(|&category| self.entries(category))
            .filter(|entry| entry.is_referenceable)
            .collect()
    }

    /// Returns `true` if no category holds any entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.values().all(|table| table.entries.is_empty())
    }
}

type RawDataset = BTreeMap<Category, RawCategory>;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCategory {
    Entries(BTreeMap<String, RawEntry>),
    Labels(Vec<String>),
}

impl RawCategory {
    fn into_entries(self, category: Category) -> Vec<VocabularyEntry> {
        match self {
            Self::Entries(map) => map
                .into_iter()
                .map(|(key, raw)| VocabularyEntry {
                    canonical_key: raw.canonical_key.unwrap_or(key),
                    display_label: raw.label,
                    is_referenceable: raw.reference.is_some_and(|r| r.is_set()),
                })
                .collect(),
            Self::Labels(labels) => labels
                .into_iter()
                .map(|label| VocabularyEntry {
                    canonical_key: label.clone(),
                    display_label: label,
                    is_referenceable: category == Category::Rules,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    canonical_key: Option<String>,
    #[serde(alias = "displayLabel")]
    label: String,
    reference: Option<RawReference>,
}

/// A reference marker: either a flag or a compendium link.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawReference {
    Flag(bool),
    Link(String),
}

impl RawReference {
    fn is_set(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Link(link) => !link.trim().is_empty(),
        }
    }
}
