//! A small, realistic vocabulary for tests.

use enrichit_core::vocabulary::{Category, Vocabulary, VocabularyEntry};

fn plain(category: Category, rows: &[(&str, &str)]) -> Vec<(Category, VocabularyEntry)> {
    rows.iter()
        .map(|(key, label)| (category, VocabularyEntry::new(*key, *label, false)))
        .collect()
}

fn referenceable(category: Category, rows: &[(&str, &str)]) -> Vec<(Category, VocabularyEntry)> {
    rows.iter()
        .map(|(key, label)| (category, VocabularyEntry::new(*key, *label, true)))
        .collect()
}

/// Builds the fixture vocabulary shared by the test suites.
///
/// Abilities, skills and tools use short canonical keys (`str`, `prc`,
/// `thief`) so tests can tell key and label resolution apart. Every
/// reference category is referenceable except the `exhaustion` condition.
///
/// # Panics
///
/// Panics if the fixture itself violates a vocabulary invariant.
#[must_use]
pub fn fixture_vocabulary() -> Vocabulary {
    let mut entries = Vec::new();
    entries.extend(plain(
        Category::Abilities,
        &[
            ("str", "Strength"),
            ("dex", "Dexterity"),
            ("con", "Constitution"),
            ("int", "Intelligence"),
            ("wis", "Wisdom"),
            ("cha", "Charisma"),
        ],
    ));
    entries.extend(plain(
        Category::Skills,
        &[
            ("acr", "Acrobatics"),
            ("ath", "Athletics"),
            ("prc", "Perception"),
            ("ste", "Stealth"),
            ("ins", "Insight"),
            ("inv", "Investigation"),
        ],
    ));
    entries.extend(plain(
        Category::Tools,
        &[("thief", "Thieves' Tools"), ("herb", "Herbalism Kit")],
    ));
    entries.extend(plain(
        Category::DamageTypes,
        &[
            ("fire", "Fire"),
            ("cold", "Cold"),
            ("piercing", "Piercing"),
            ("slashing", "Slashing"),
            ("bludgeoning", "Bludgeoning"),
            ("necrotic", "Necrotic"),
            ("poison", "Poison"),
        ],
    ));
    entries.extend(plain(
        Category::Currencies,
        &[
            ("cp", "Copper"),
            ("sp", "Silver"),
            ("ep", "Electrum"),
            ("gp", "Gold"),
            ("pp", "Platinum"),
        ],
    ));
    entries.extend(referenceable(
        Category::Conditions,
        &[
            ("blinded", "Blinded"),
            ("prone", "Prone"),
            ("frightened", "Frightened"),
            ("poisoned", "Poisoned"),
        ],
    ));
    entries.extend(plain(Category::Conditions, &[("exhaustion", "Exhaustion")]));
    entries.extend(referenceable(
        Category::CreatureTypes,
        &[("beast", "Beast"), ("humanoid", "Humanoid"), ("undead", "Undead")],
    ));
    entries.extend(referenceable(
        Category::AreaTargetTypes,
        &[("cone", "Cone"), ("sphere", "Sphere"), ("cube", "Cube")],
    ));
    entries.extend(referenceable(
        Category::SpellSchools,
        &[("evo", "Evocation"), ("nec", "Necromancy")],
    ));
    entries.extend(referenceable(
        Category::SpellComponents,
        &[("vocal", "Verbal"), ("somatic", "Somatic"), ("material", "Material")],
    ));
    entries.extend(referenceable(
        Category::SpellTags,
        &[("concentration", "Concentration"), ("ritual", "Ritual")],
    ));
    entries.extend(plain(
        Category::Rules,
        &[
            ("advantage", "Advantage"),
            ("disadvantage", "Disadvantage"),
            ("difficultTerrain", "Difficult Terrain"),
        ],
    ));

    Vocabulary::from_entries(entries).expect("fixture vocabulary is valid")
}
