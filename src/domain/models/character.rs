//! Character records and the working roster.
//!
//! Characters are created by user input or parsed out of LLM output.
//! LLM output is an untrusted external format: parsing validates the
//! shape field-by-field and rejects the entire batch on any violation.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// A story character.
///
/// Identity is the `id`; uniqueness is by convention, not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub personality: String,
}

impl Character {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        description: impl Into<String>,
        personality: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            personality: personality.into(),
        }
    }
}

/// Strictly parse completion-model output as a JSON array of characters.
///
/// All-or-nothing: a malformed array, or any element missing a numeric `id`
/// or a string `name`/`description`/`personality`, rejects the whole batch.
/// Markdown code fences around the JSON are tolerated since models often
/// wrap their answers in them.
pub fn parse_character_array(raw: &str) -> DomainResult<Vec<Character>> {
    let trimmed = strip_code_fences(raw.trim());

    serde_json::from_str::<Vec<Character>>(trimmed)
        .map_err(|e| DomainError::InvalidCharacterData(e.to_string()))
}

/// Strip a single surrounding markdown code fence, if present.
fn strip_code_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    // Drop an optional language tag on the fence line.
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };

    rest.strip_suffix("```").map_or(rest, str::trim)
}

/// The in-memory working collection of characters.
///
/// Lives for one session; there is no durable storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRoster {
    characters: Vec<Character>,
}

impl CharacterRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a character to the roster.
    pub fn add(&mut self, character: Character) {
        self.characters.push(character);
    }

    /// Remove every character with the given id. Returns true if any was removed.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.characters.len();
        self.characters.retain(|c| c.id != id);
        self.characters.len() != before
    }

    /// Replace the whole roster in place (parsed extraction results).
    pub fn replace_all(&mut self, characters: Vec<Character>) {
        self.characters = characters;
    }

    pub fn get(&self, id: i64) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sofia() -> Character {
        Character::new(
            2,
            "Sofia",
            "A successful chef who can't cook when she's in love",
            "Confident and witty, but becomes hilariously awkward around her crush",
        )
    }

    #[test]
    fn test_parse_valid_array() {
        let raw = r#"[{"id":1,"name":"Alice","description":"Explorer","personality":"brave"}]"#;
        let characters = parse_character_array(raw).unwrap();
        assert_eq!(characters.len(), 1);
        assert_eq!(characters[0].id, 1);
        assert_eq!(characters[0].name, "Alice");
        assert_eq!(characters[0].personality, "brave");
    }

    #[test]
    fn test_parse_rejects_non_numeric_id() {
        let raw = r#"[{"id":"1","name":"Alice","description":"d","personality":"p"}]"#;
        let err = parse_character_array(raw).unwrap_err();
        assert!(matches!(err, DomainError::InvalidCharacterData(_)));
    }

    #[test]
    fn test_parse_rejects_null_field() {
        let raw = r#"[{"id":1,"name":null,"description":"d","personality":"p"}]"#;
        assert!(parse_character_array(raw).is_err());
    }

    #[test]
    fn test_parse_is_all_or_nothing() {
        // Second element is malformed; the valid first element must not leak through.
        let raw = r#"[
            {"id":1,"name":"Alice","description":"d","personality":"p"},
            {"id":2,"name":"Bob","description":"d"}
        ]"#;
        assert!(parse_character_array(raw).is_err());
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let raw = r#"{"id":1,"name":"Alice","description":"d","personality":"p"}"#;
        assert!(parse_character_array(raw).is_err());
    }

    #[test]
    fn test_parse_tolerates_code_fences() {
        let raw = "```json\n[{\"id\":1,\"name\":\"Alice\",\"description\":\"d\",\"personality\":\"p\"}]\n```";
        let characters = parse_character_array(raw).unwrap();
        assert_eq!(characters.len(), 1);
    }

    #[test]
    fn test_parse_empty_array() {
        let characters = parse_character_array("[]").unwrap();
        assert!(characters.is_empty());
    }

    #[test]
    fn test_roster_add_remove_round_trip() {
        let mut roster = CharacterRoster::new();
        roster.add(sofia());
        let baseline = roster.clone();

        roster.add(Character::new(7, "Extra", "d", "p"));
        assert_eq!(roster.len(), 2);

        assert!(roster.remove(7));
        assert_eq!(roster, baseline);
    }

    #[test]
    fn test_roster_remove_missing_id() {
        let mut roster = CharacterRoster::new();
        roster.add(sofia());
        assert!(!roster.remove(99));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_roster_replace_all() {
        let mut roster = CharacterRoster::new();
        roster.add(sofia());

        roster.replace_all(vec![Character::new(1, "Alice", "d", "brave")]);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.get(1).unwrap().name, "Alice");
        assert!(roster.get(2).is_none());
    }
}
