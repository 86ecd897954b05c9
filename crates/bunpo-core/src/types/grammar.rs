//! Grammar point reference content.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TutorError;

/// JLPT proficiency level of a grammar point.
///
/// Ordered by difficulty: N5 is introductory, N1 is the most advanced.
/// `rank()` gives the numeric difficulty used for batch ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    N5,
    N4,
    N3,
    N2,
    N1,
}

impl Level {
    /// Numeric difficulty rank; higher means more advanced (N1 = 5).
    pub fn rank(&self) -> u8 {
        match self {
            Level::N5 => 1,
            Level::N4 => 2,
            Level::N3 => 3,
            Level::N2 => 4,
            Level::N1 => 5,
        }
    }

    /// String form as stored in the database ("N5".."N1").
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::N5 => "N5",
            Level::N4 => "N4",
            Level::N3 => "N3",
            Level::N2 => "N2",
            Level::N1 => "N1",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = TutorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N5" => Ok(Level::N5),
            "N4" => Ok(Level::N4),
            "N3" => Ok(Level::N3),
            "N2" => Ok(Level::N2),
            "N1" => Ok(Level::N1),
            other => Err(TutorError::validation(format!(
                "Unknown JLPT level: '{}'",
                other
            ))),
        }
    }
}

/// A grammar point - the immutable reference content a learner practices.
///
/// Seeded once and never mutated by the review flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarPoint {
    /// Database identifier.
    pub id: i64,
    /// JLPT level.
    pub level: Level,
    /// The grammar pattern itself (e.g. 「〜ばかりでなく」).
    pub concept: String,
    /// Core meaning in the learner's language.
    pub meaning: String,
    /// Formation / attachment rules.
    pub structure: String,
    /// Longer usage explanation.
    pub explanation: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Seed form of a grammar point, before it has a database id.
///
/// This is the shape of entries in JSON seed files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarSeed {
    pub level: Level,
    pub concept: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub structure: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_rank_ordering() {
        assert!(Level::N1.rank() > Level::N2.rank());
        assert!(Level::N2.rank() > Level::N3.rank());
        assert!(Level::N5.rank() < Level::N4.rank());
    }

    #[test]
    fn test_level_roundtrip() {
        for s in ["N5", "N4", "N3", "N2", "N1"] {
            let level: Level = s.parse().unwrap();
            assert_eq!(level.as_str(), s);
        }
    }

    #[test]
    fn test_level_parse_lenient() {
        assert_eq!(" n2 ".parse::<Level>().unwrap(), Level::N2);
        assert!("N6".parse::<Level>().is_err());
    }

    #[test]
    fn test_seed_deserializes_with_defaults() {
        let seed: GrammarSeed =
            serde_json::from_str(r#"{"level":"N3","concept":"〜ばかりでなく"}"#).unwrap();
        assert_eq!(seed.level, Level::N3);
        assert!(seed.meaning.is_empty());
        assert!(seed.tags.is_empty());
    }
}
