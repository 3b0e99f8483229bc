//! # Duration Categories
//!
//! A fixed classification of games by play length. Categories partition
//! both the proposals of a round and each voter's vote allowance, and each
//! category produces at most one winner when a round closes.
//!
//! Spanish labels (`largo`/`corto`) are accepted on input as well;
//! only the English ones are emitted.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Play-length classification of a proposed game.
///
/// The derived `Ord` is the listing order: `Long` sorts before `Short`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationCategory {
    /// Long games; an evening's main event.
    #[serde(alias = "largo")]
    Long,
    /// Short games; fillers and openers.
    #[serde(alias = "corto")]
    Short,
}

impl DurationCategory {
    /// Every category, in listing order.
    pub const ALL: [DurationCategory; 2] = [DurationCategory::Long, DurationCategory::Short];

    /// Canonical lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Long => "long",
            Self::Short => "short",
        }
    }
}

impl std::fmt::Display for DurationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DurationCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" => Err(ValidationError::EmptyField("duration")),
            "long" | "largo" => Ok(Self::Long),
            "short" | "corto" => Ok(Self::Short),
            other => Err(ValidationError::UnknownCategory(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_english_and_spanish_labels() {
        assert_eq!("long".parse::<DurationCategory>().unwrap(), DurationCategory::Long);
        assert_eq!("Largo".parse::<DurationCategory>().unwrap(), DurationCategory::Long);
        assert_eq!(" short ".parse::<DurationCategory>().unwrap(), DurationCategory::Short);
        assert_eq!("corto".parse::<DurationCategory>().unwrap(), DurationCategory::Short);
    }

    #[test]
    fn rejects_unknown_and_blank() {
        assert_eq!(
            "medium".parse::<DurationCategory>(),
            Err(ValidationError::UnknownCategory("medium".to_string()))
        );
        assert_eq!(
            "".parse::<DurationCategory>(),
            Err(ValidationError::EmptyField("duration"))
        );
    }

    #[test]
    fn serde_uses_lowercase_and_accepts_aliases() {
        assert_eq!(serde_json::to_string(&DurationCategory::Short).unwrap(), "\"short\"");
        let parsed: DurationCategory = serde_json::from_str("\"largo\"").unwrap();
        assert_eq!(parsed, DurationCategory::Long);
    }

    #[test]
    fn listing_order_is_long_then_short() {
        let mut all = vec![DurationCategory::Short, DurationCategory::Long];
        all.sort();
        assert_eq!(all, DurationCategory::ALL.to_vec());
    }
}
