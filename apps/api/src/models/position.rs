use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};

/// Identifier of a position. The HR API hands these out as integers but some
/// older payloads carry them as numeric strings; both decode to the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PositionId(pub i64);

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

impl RawId {
    fn into_id<E: de::Error>(self) -> Result<PositionId, E> {
        match self {
            RawId::Int(n) => Ok(PositionId(n)),
            RawId::Text(s) => s
                .trim()
                .parse::<i64>()
                .map(PositionId)
                .map_err(|_| E::custom(format!("invalid position id '{s}'"))),
        }
    }
}

impl<'de> Deserialize<'de> for PositionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawId::deserialize(deserializer)?.into_id()
    }
}

/// `null`, a missing field and `""` all mean "reports to nobody".
fn deserialize_parent<'de, D>(deserializer: D) -> Result<Option<PositionId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(raw) => raw.into_id().map(Some),
    }
}

fn deserialize_description<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|d| !d.trim().is_empty()))
}

/// A job position as served by the positions store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionRecord {
    pub id: PositionId,
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(
        default,
        alias = "descripcion",
        deserialize_with = "deserialize_description"
    )]
    pub description: Option<String>,
    #[serde(default, alias = "jefe_id", deserialize_with = "deserialize_parent")]
    pub parent_id: Option<PositionId>,
}

#[cfg(test)]
impl PositionRecord {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: PositionId(id),
            name: name.into(),
            description: None,
            parent_id: None,
        }
    }

    pub fn with_parent(mut self, parent: i64) -> Self {
        self.parent_id = Some(PositionId(parent));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.trim().is_empty()).then_some(description);
        self
    }
}

impl PositionRecord {
    /// Display label: the name, followed by ` - description` when there is one.
    pub fn label(&self) -> String {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => format!("{} - {}", self.name, d),
            _ => self.name.clone(),
        }
    }
}

/// Create/update payload for a position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionInput {
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(
        default,
        alias = "descripcion",
        deserialize_with = "deserialize_description"
    )]
    pub description: Option<String>,
    #[serde(default, alias = "jefe_id", deserialize_with = "deserialize_parent")]
    pub parent_id: Option<PositionId>,
}

impl PositionInput {
    pub fn into_record(self, id: PositionId) -> PositionRecord {
        PositionRecord {
            id,
            name: self.name.trim().to_string(),
            description: self.description,
            parent_id: self.parent_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_hr_api_field_names() {
        let record: PositionRecord = serde_json::from_value(json!({
            "id": 2,
            "nombre": "CTO",
            "descripcion": "Technology",
            "jefe_id": 1
        }))
        .unwrap();
        assert_eq!(record.name, "CTO");
        assert_eq!(record.description.as_deref(), Some("Technology"));
        assert_eq!(record.parent_id, Some(PositionId(1)));
    }

    #[test]
    fn test_string_ids_are_coerced_to_integers() {
        let record: PositionRecord =
            serde_json::from_value(json!({"id": "7", "name": "Eng", "parent_id": "3"})).unwrap();
        assert_eq!(record.id, PositionId(7));
        assert_eq!(record.parent_id, Some(PositionId(3)));
    }

    #[test]
    fn test_empty_parent_and_description_mean_none() {
        let record: PositionRecord = serde_json::from_value(
            json!({"id": 1, "nombre": "CEO", "descripcion": "", "jefe_id": ""}),
        )
        .unwrap();
        assert_eq!(record.parent_id, None);
        assert_eq!(record.description, None);

        let record: PositionRecord =
            serde_json::from_value(json!({"id": 1, "nombre": "CEO", "jefe_id": null})).unwrap();
        assert_eq!(record.parent_id, None);
    }

    #[test]
    fn test_non_numeric_id_is_rejected() {
        let result: Result<PositionRecord, _> =
            serde_json::from_value(json!({"id": "abc", "name": "X"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_label_appends_description() {
        assert_eq!(PositionRecord::new(1, "CEO").label(), "CEO");
        assert_eq!(
            PositionRecord::new(1, "CEO").with_description("Board").label(),
            "CEO - Board"
        );
    }
}
