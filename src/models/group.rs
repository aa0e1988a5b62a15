//! Group is a named set of flashcards
use super::Flashcard;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "name_group", default)]
    pub name: String,
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
    /// Keys this version does not know about, written back unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Group {
    pub fn new(name: impl Into<String>, flashcards: Vec<Flashcard>) -> Self {
        Self {
            name: name.into(),
            flashcards,
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_uses_name_group_field() {
        let group = Group::new("Capitals", vec![Flashcard::new("France?", "Paris")]);
        let json = serde_json::to_value(&group).unwrap();

        assert_eq!(json["name_group"], "Capitals");
        assert!(json.get("name").is_none());
        assert_eq!(json["flashcards"][0]["answer"], "Paris");
    }

    #[test]
    fn test_missing_flashcards_defaults_to_empty() {
        let group: Group = serde_json::from_str(r#"{"name_group": "Empty"}"#).unwrap();

        assert_eq!(group.name, "Empty");
        assert!(group.flashcards.is_empty());
    }

    #[test]
    fn test_missing_name_defaults_to_empty() {
        let groups: Vec<Group> =
            serde_json::from_str(r#"[{"flashcards": []}, {"name_group": "A"}]"#).unwrap();

        assert_eq!(groups[0].name, "");
        assert_eq!(groups[1].name, "A");
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let group: Group =
            serde_json::from_str(r#"{"name_group": "B", "flashcards": [], "color": "red"}"#)
                .unwrap();
        assert_eq!(group.extra["color"], "red");

        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["color"], "red");
    }
}
