//! Person identifiers and the derived family node.
//!
//! A `FamilyNode` is the graph-side view of one person. It carries:
//! - A stable identifier taken from the input record
//! - Resolved parent, child and spouse identifier lists
//! - A generation level plus where that level came from
//! - Display attributes passed through untouched for rendering

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generation given to members the traversal never reached.
pub const DEFAULT_GENERATION: i32 = 1;

/// Stable person identifier.
///
/// Wraps the identifier string from the input record. An empty identifier
/// means "absent" wherever a reference is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub String);

impl PersonId {
    /// Create a new PersonId.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The empty identifier, used for "no root".
    #[inline]
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Get the raw identifier.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this is the empty identifier.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PersonId {
    #[inline]
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for PersonId {
    #[inline]
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Recorded sex of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Sex {
    /// Parse the loose spellings found in member records.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" | "m" | "man" => Self::Male,
            "female" | "f" | "woman" => Self::Female,
            _ => Self::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for Sex {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Sex::parse).unwrap_or_default())
    }
}

/// A birth or death marker: either a bare year or a free-form date string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LifeDate {
    Year(i32),
    Date(String),
}

impl LifeDate {
    /// Extract the year, if one can be read.
    ///
    /// Dates are scanned for the first run of four digits, which covers
    /// `1931`, `1931-04-02` and `02/04/1931`.
    pub fn year(&self) -> Option<i32> {
        match self {
            Self::Year(year) => Some(*year),
            Self::Date(text) => {
                let bytes = text.as_bytes();
                bytes
                    .windows(4)
                    .enumerate()
                    .find(|(i, w)| {
                        w.iter().all(u8::is_ascii_digit)
                            && bytes.get(i + 4).is_none_or(|b| !b.is_ascii_digit())
                            && (*i == 0 || !bytes[i - 1].is_ascii_digit())
                    })
                    .and_then(|(i, _)| text[i..i + 4].parse().ok())
            }
        }
    }
}

/// Display attributes carried through the pipeline unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDetails {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth: Option<LifeDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death: Option<LifeDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
}

/// Where a node's generation value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GenerationSource {
    /// Not yet finalized by the generation assigner.
    #[default]
    Unassigned,
    /// Stamped by the breadth-first traversal from the root.
    Traversal,
    /// Unreached; the input hint was preserved.
    Hint,
    /// Unreached and unhinted; given `DEFAULT_GENERATION`.
    Default,
}

/// One person in the family graph.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyNode {
    pub id: PersonId,
    pub sex: Sex,
    /// Parent identifiers (normally 0-2), in input order of the parents.
    pub parents: Vec<PersonId>,
    /// Child identifiers, in input order of the children.
    pub children: Vec<PersonId>,
    /// Spouse identifiers, in input order of the spouses.
    pub spouses: Vec<PersonId>,
    /// Generation level; only meaningful once `generation_source` is set.
    pub generation: i32,
    pub generation_source: GenerationSource,
    /// Generation supplied by the input record, if any.
    pub generation_hint: Option<i32>,
    pub details: PersonDetails,
}

impl FamilyNode {
    /// Create a node with no relations.
    pub fn new(id: PersonId) -> Self {
        Self {
            id,
            sex: Sex::Unknown,
            parents: Vec::new(),
            children: Vec::new(),
            spouses: Vec::new(),
            generation: DEFAULT_GENERATION,
            generation_source: GenerationSource::Unassigned,
            generation_hint: None,
            details: PersonDetails::default(),
        }
    }

    /// Check whether the node has any recorded parent, resolvable or not.
    #[inline]
    pub fn has_parents(&self) -> bool {
        !self.parents.is_empty()
    }

    /// Check whether `other` is one of this node's spouses.
    #[inline]
    pub fn is_spouse_of(&self, other: &PersonId) -> bool {
        self.spouses.contains(other)
    }

    /// Check whether `other` is one of this node's parents.
    #[inline]
    pub fn is_child_of(&self, other: &PersonId) -> bool {
        self.parents.contains(other)
    }
}

/// Push an identifier unless it is empty or already present.
pub(crate) fn push_unique(list: &mut Vec<PersonId>, id: &PersonId) -> bool {
    if id.is_empty() || list.contains(id) {
        return false;
    }
    list.push(id.clone());
    true
}
