//! Seed file loading and a built-in starter set.

use std::path::Path;

use bunpo_core::{GrammarSeed, Level, TutorError, TutorResult};

/// Load grammar seeds from a JSON file (an array of seed objects).
pub fn load_seed_file(path: impl AsRef<Path>) -> TutorResult<Vec<GrammarSeed>> {
    let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        TutorError::validation(format!(
            "Cannot read seed file {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    let seeds: Vec<GrammarSeed> = serde_json::from_str(&raw)
        .map_err(|e| TutorError::parse(format!("Invalid seed file: {}", e)))?;
    if seeds.is_empty() {
        return Err(TutorError::validation("Seed file contains no entries"));
    }
    Ok(seeds)
}

/// A small built-in starter set, used when no seed file is given.
pub fn starter_seeds() -> Vec<GrammarSeed> {
    let entries: [(&str, &str, &str, Level); 10] = [
        (
            "〜たい",
            "want to do something",
            "verb stem + たい",
            Level::N5,
        ),
        (
            "〜てもいい",
            "permission; it is okay to",
            "te-form + もいい",
            Level::N5,
        ),
        (
            "〜なければならない",
            "must; have to",
            "negative stem + なければならない",
            Level::N5,
        ),
        (
            "〜そうだ (hearsay)",
            "I heard that; it is said that",
            "plain form + そうだ",
            Level::N4,
        ),
        (
            "〜ば〜ほど",
            "the more ... the more",
            "ba-form + dictionary form + ほど",
            Level::N4,
        ),
        (
            "〜ばかりでなく",
            "not only ... but also",
            "plain form + ばかりでなく",
            Level::N3,
        ),
        (
            "〜うちに",
            "while; before a state changes",
            "dictionary form / ない form + うちに",
            Level::N3,
        ),
        (
            "〜ざるを得ない",
            "cannot help doing; have no choice but to",
            "negative stem + ざるを得ない",
            Level::N2,
        ),
        (
            "〜かねない",
            "might well; is capable of (something bad)",
            "verb stem + かねない",
            Level::N2,
        ),
        (
            "〜を皮切りに",
            "starting with; to be the first of",
            "noun + を皮切りに",
            Level::N1,
        ),
    ];

    entries
        .into_iter()
        .map(|(concept, meaning, structure, level)| GrammarSeed {
            level,
            concept: concept.to_string(),
            meaning: meaning.to_string(),
            structure: structure.to_string(),
            explanation: String::new(),
            tags: vec![],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_seeds_cover_all_levels() {
        let seeds = starter_seeds();
        for level in [Level::N5, Level::N4, Level::N3, Level::N2, Level::N1] {
            assert!(seeds.iter().any(|s| s.level == level));
        }
    }

    #[test]
    fn test_load_seed_file_rejects_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seeds.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(load_seed_file(&path).is_err());
    }

    #[test]
    fn test_load_seed_file_parses_minimal_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seeds.json");
        std::fs::write(&path, r#"[{"level":"N3","concept":"〜うちに"}]"#).unwrap();
        let seeds = load_seed_file(&path).unwrap();
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].level, Level::N3);
    }
}
