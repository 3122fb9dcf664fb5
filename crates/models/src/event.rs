use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

/// Fixed category label set. Labels outside the set collapse to
/// [`Category::Autres`], the catch-all, instead of failing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Football,
    Volleyball,
    Running,
    Tennis,
    Basketball,
    Natation,
    Escalade,
    #[default]
    Autres,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Football,
        Category::Volleyball,
        Category::Running,
        Category::Tennis,
        Category::Basketball,
        Category::Natation,
        Category::Escalade,
        Category::Autres,
    ];

    /// Parse a label as the clients send it; unknown labels become `Autres`.
    pub fn parse(label: &str) -> Self {
        match label {
            "Football" => Category::Football,
            "Volleyball" => Category::Volleyball,
            "Running" => Category::Running,
            "Tennis" => Category::Tennis,
            "Basketball" => Category::Basketball,
            "Natation" => Category::Natation,
            "Escalade" => Category::Escalade,
            _ => Category::Autres,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Football => "Football",
            Category::Volleyball => "Volleyball",
            Category::Running => "Running",
            Category::Tennis => "Tennis",
            Category::Basketball => "Basketball",
            Category::Natation => "Natation",
            Category::Escalade => "Escalade",
            Category::Autres => "Autres",
        }
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Category::parse(&label)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A community event. After creation the only mutation is voting, which
/// grows `voters` and keeps `votes` equal to its size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub category: Category,
    pub votes: u32,
    pub voters: HashSet<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Fresh event id, `evt-` prefixed to stay compatible with ids already
    /// persisted by earlier deployments.
    pub fn new_id() -> String {
        format!("evt-{}", Uuid::new_v4())
    }

    /// The vote counter must mirror the voter set at all times.
    pub fn counts_are_consistent(&self) -> bool {
        self.votes as usize == self.voters.len()
    }
}

pub fn validate_required(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_parse_to_themselves() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), category);
        }
    }

    #[test]
    fn unknown_labels_collapse_to_autres() {
        assert_eq!(Category::parse("Chess"), Category::Autres);
        assert_eq!(Category::parse(""), Category::Autres);
        assert_eq!(Category::default(), Category::Autres);
    }

    #[test]
    fn category_round_trips_through_json_strings() {
        let json = serde_json::to_string(&Category::Natation).unwrap();
        assert_eq!(json, "\"Natation\"");
        let back: Category = serde_json::from_str("\"Escalade\"").unwrap();
        assert_eq!(back, Category::Escalade);
        let fallback: Category = serde_json::from_str("\"Quidditch\"").unwrap();
        assert_eq!(fallback, Category::Autres);
    }

    #[test]
    fn event_ids_carry_the_evt_prefix() {
        let id = Event::new_id();
        assert!(id.starts_with("evt-"));
        assert_ne!(id, Event::new_id());
    }

    #[test]
    fn event_serializes_camel_case_with_voter_set() {
        let mut voters = HashSet::new();
        voters.insert(Uuid::new_v4());
        let event = Event {
            id: Event::new_id(),
            title: "5v5".into(),
            description: "friendly match".into(),
            location: "Park".into(),
            date: "2024-06-01".into(),
            time: "18:00".into(),
            category: Category::Football,
            votes: 1,
            voters,
            created_at: Utc::now(),
        };
        assert!(event.counts_are_consistent());
        let value = serde_json::to_value(&event).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("createdAt"));
        assert_eq!(obj["category"], "Football");
        assert_eq!(obj["voters"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn required_fields_must_be_non_blank() {
        assert!(validate_required("title", "5v5").is_ok());
        assert!(validate_required("title", "   ").is_err());
    }
}
