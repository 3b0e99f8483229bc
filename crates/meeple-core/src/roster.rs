//! # Participant Roster
//!
//! The static set of people who propose and vote. The roster has no
//! lifecycle: it is loaded once at startup, either from the built-in group
//! or from a YAML file of the form
//!
//! ```yaml
//! - id: "1"
//!   name: Mako
//!   contact: "whatsapp:+5215500000001"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::ParticipantId;

/// A member of the game group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// Display name.
    pub name: String,
    /// Messaging handle used by the notification relay. Empty when unknown.
    #[serde(default)]
    pub contact: String,
}

/// Error loading a roster file.
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("failed to read roster file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse roster: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("roster lists participant '{0}' more than once")]
    Duplicate(String),
    #[error("roster is empty")]
    Empty,
}

/// Immutable mapping of participant identifiers to participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    members: BTreeMap<ParticipantId, Participant>,
}

/// (id, display name) of the group the tool was written for.
const DEFAULT_GROUP: [(&str, &str); 6] = [
    ("1", "Mako"),
    ("2", "Fercho"),
    ("3", "Leo Gómez"),
    ("4", "Leo Villa"),
    ("5", "Zulu"),
    ("6", "Junes"),
];

impl Roster {
    /// Build a roster, rejecting empty lists and duplicate identifiers.
    pub fn new(participants: Vec<Participant>) -> Result<Self, RosterError> {
        if participants.is_empty() {
            return Err(RosterError::Empty);
        }
        let mut members = BTreeMap::new();
        for p in participants {
            let id = p.id.clone();
            if members.insert(id.clone(), p).is_some() {
                return Err(RosterError::Duplicate(id.to_string()));
            }
        }
        Ok(Self { members })
    }

    /// The built-in six-member group. Contact handles are blank.
    pub fn default_group() -> Self {
        let members = DEFAULT_GROUP
            .iter()
            .filter_map(|(id, name)| {
                ParticipantId::new(id).ok().map(|id| {
                    (
                        id.clone(),
                        Participant {
                            id,
                            name: (*name).to_string(),
                            contact: String::new(),
                        },
                    )
                })
            })
            .collect();
        Self { members }
    }

    /// Parse a YAML list of participants.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RosterError> {
        let participants: Vec<Participant> = serde_yaml::from_str(yaml)?;
        Self::new(participants)
    }

    /// Load a YAML roster file.
    pub fn load(path: &Path) -> Result<Self, RosterError> {
        let raw = std::fs::read_to_string(path).map_err(|source| RosterError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&Participant> {
        self.members.get(id)
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.members.contains_key(id)
    }

    /// Resolve a messaging handle back to a participant.
    pub fn by_contact(&self, handle: &str) -> Option<&Participant> {
        let handle = handle.trim();
        if handle.is_empty() {
            return None;
        }
        self.members.values().find(|p| p.contact == handle)
    }

    /// Display name for an identifier, falling back to the raw identifier.
    pub fn display_name<'a>(&'a self, id: &'a ParticipantId) -> &'a str {
        self.members
            .get(id)
            .map(|p| p.name.as_str())
            .unwrap_or_else(|| id.as_str())
    }

    /// Participants ordered by identifier.
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.members.values()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::default_group()
    }
}
