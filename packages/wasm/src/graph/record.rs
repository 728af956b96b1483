//! Flat person records as delivered by the persistence layer.
//!
//! Records link to each other only through identifier references. Field
//! names follow the camelCase wire format, with aliases for the spellings
//! older member documents use.

use serde::{Deserialize, Deserializer};

use super::node::{LifeDate, PersonId, Sex};
use crate::error::{PedigreeError, Result};

/// One family member as stored.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    #[serde(alias = "_id", deserialize_with = "required_id")]
    pub id: PersonId,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "gender")]
    pub sex: Sex,
    #[serde(default, alias = "birthYear", alias = "birthDate")]
    pub birth: Option<LifeDate>,
    #[serde(default, alias = "deathYear", alias = "deathDate")]
    pub death: Option<LifeDate>,
    #[serde(default, alias = "father", deserialize_with = "optional_id")]
    pub father_id: Option<PersonId>,
    #[serde(default, alias = "mother", deserialize_with = "optional_id")]
    pub mother_id: Option<PersonId>,
    /// Legacy single-parent field from older documents.
    #[serde(default, alias = "parent", deserialize_with = "optional_id")]
    pub parent_id: Option<PersonId>,
    #[serde(default, alias = "spouse", deserialize_with = "optional_id")]
    pub spouse_id: Option<PersonId>,
    /// Explicit children list; `None` when the record carries none.
    #[serde(default, alias = "childrenIds", deserialize_with = "optional_id_list")]
    pub children: Option<Vec<PersonId>>,
    #[serde(default)]
    pub generation: Option<i32>,
    #[serde(default, alias = "photo")]
    pub image: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
}

impl PersonRecord {
    /// Create a bare record with only an identifier and a name.
    pub fn new(id: impl Into<PersonId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the father reference.
    pub fn with_father(mut self, id: impl Into<PersonId>) -> Self {
        self.father_id = Some(id.into());
        self
    }

    /// Set the mother reference.
    pub fn with_mother(mut self, id: impl Into<PersonId>) -> Self {
        self.mother_id = Some(id.into());
        self
    }

    /// Set the legacy parent reference.
    pub fn with_parent(mut self, id: impl Into<PersonId>) -> Self {
        self.parent_id = Some(id.into());
        self
    }

    /// Set the spouse reference.
    pub fn with_spouse(mut self, id: impl Into<PersonId>) -> Self {
        self.spouse_id = Some(id.into());
        self
    }

    /// Set the explicit children list.
    pub fn with_children<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PersonId>,
    {
        self.children = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Set the generation hint.
    pub fn with_generation(mut self, generation: i32) -> Self {
        self.generation = Some(generation);
        self
    }

    /// Set the recorded sex.
    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = sex;
        self
    }

    /// All parent candidates: father, mother and the legacy parent field,
    /// de-duplicated and with empty identifiers dropped.
    pub fn parent_refs(&self) -> impl Iterator<Item = &PersonId> {
        let father = self.father_id.as_ref();
        let mother = self.mother_id.as_ref().filter(|m| Some(*m) != father);
        let legacy = self
            .parent_id
            .as_ref()
            .filter(|p| Some(*p) != father && Some(*p) != mother);
        [father, mother, legacy]
            .into_iter()
            .flatten()
            .filter(|id| !id.is_empty())
    }

    /// Check whether this record names `id` as father, mother or parent.
    pub fn references_parent(&self, id: &PersonId) -> bool {
        self.parent_refs().any(|p| p == id)
    }
}

/// Decode a JSON document holding an array of person records.
///
/// Anything other than an array of record-shaped objects is a programming
/// error on the caller's side and is reported as such.
pub fn parse_records(json: &str) -> Result<Vec<PersonRecord>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let kind = match &value {
        serde_json::Value::Array(_) => None,
        serde_json::Value::Null => Some("null"),
        serde_json::Value::Bool(_) => Some("a boolean"),
        serde_json::Value::Number(_) => Some("a number"),
        serde_json::Value::String(_) => Some("a string"),
        serde_json::Value::Object(_) => Some("an object"),
    };
    if let Some(kind) = kind {
        return Err(PedigreeError::NotAnArray(kind));
    }
    Ok(serde_json::from_value(value)?)
}

/// Identifier as it appears on the wire: a string or an integer.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for PersonId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => PersonId(text.trim().to_owned()),
            RawId::Number(n) => PersonId(n.to_string()),
        }
    }
}

fn required_id<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<PersonId, D::Error> {
    RawId::deserialize(deserializer).map(PersonId::from)
}

fn optional_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<PersonId>, D::Error> {
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw.map(PersonId::from).filter(|id| !id.is_empty()))
}

fn optional_id_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Vec<PersonId>>, D::Error> {
    let raw = Option::<Vec<RawId>>::deserialize(deserializer)?;
    Ok(raw.map(|ids| {
        ids.into_iter()
            .map(PersonId::from)
            .filter(|id| !id.is_empty())
            .collect()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_names() {
        let json = r#"[{
            "id": "c1", "name": "Ada", "sex": "female",
            "birthYear": 1950, "deathDate": "2020-01-05",
            "fatherId": "f", "motherId": "m", "spouseId": "",
            "childrenIds": ["x", 7], "generation": 3, "photo": "ada.png"
        }]"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records.len(), 1);

        let ada = &records[0];
        assert_eq!(ada.id, PersonId::new("c1"));
        assert_eq!(ada.sex, Sex::Female);
        assert_eq!(ada.birth, Some(LifeDate::Year(1950)));
        assert_eq!(ada.death.as_ref().and_then(LifeDate::year), Some(2020));
        assert_eq!(ada.father_id, Some(PersonId::new("f")));
        assert_eq!(ada.spouse_id, None);
        assert_eq!(
            ada.children,
            Some(vec![PersonId::new("x"), PersonId::new("7")])
        );
        assert_eq!(ada.generation, Some(3));
        assert_eq!(ada.image.as_deref(), Some("ada.png"));
    }

    #[test]
    fn test_numeric_ids() {
        let records = parse_records(r#"[{"_id": 1, "father": 2}]"#).unwrap();
        assert_eq!(records[0].id, PersonId::new("1"));
        assert_eq!(records[0].father_id, Some(PersonId::new("2")));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = parse_records(r#"{"id": "a"}"#).unwrap_err();
        assert!(matches!(err, PedigreeError::NotAnArray("an object")));

        let err = parse_records("not json").unwrap_err();
        assert!(matches!(err, PedigreeError::Decode(_)));
    }

    #[test]
    fn test_parse_rejects_shapeless_records() {
        let err = parse_records(r#"[1, 2, 3]"#).unwrap_err();
        assert!(matches!(err, PedigreeError::Decode(_)));
    }

    #[test]
    fn test_empty_array() {
        assert!(parse_records("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parent_refs_dedupe_legacy() {
        let record = PersonRecord::new("c", "C")
            .with_father("f")
            .with_mother("m")
            .with_parent("f");
        let parents: Vec<_> = record.parent_refs().map(PersonId::as_str).collect();
        assert_eq!(parents, vec!["f", "m"]);

        let legacy_only = PersonRecord::new("d", "D").with_parent("p");
        assert!(legacy_only.references_parent(&PersonId::new("p")));
    }
}
