//! Entity ID type and the name-to-identifier derivation rule

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for invalid entity IDs
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntityIdError {
    #[error("entity_id must contain exactly one '.' separator")]
    InvalidFormat,

    #[error("domain must be non-empty lowercase alphanumeric with underscores")]
    InvalidDomain,

    #[error("object_id cannot be empty")]
    EmptyObjectId,

    #[error("object_id cannot contain '.' or whitespace")]
    InvalidObjectId,
}

/// An entity identifier of the form `domain.object_id` (e.g. "enhanced_input.notes").
///
/// Object IDs are derived from human-readable names with [`EntityId::from_name`],
/// and the derivation round-trips through [`EntityId::display_name`]: deriving
/// from the display form of an already-derived identifier reproduces it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId {
    domain: String,
    object_id: String,
}

impl EntityId {
    /// Create an EntityId from already-normalized parts
    pub fn new(
        domain: impl Into<String>,
        object_id: impl Into<String>,
    ) -> Result<Self, EntityIdError> {
        let domain = domain.into();
        let object_id = object_id.into();

        if !Self::is_valid_domain(&domain) {
            return Err(EntityIdError::InvalidDomain);
        }
        if object_id.is_empty() {
            return Err(EntityIdError::EmptyObjectId);
        }
        if !Self::is_valid_object_id(&object_id) {
            return Err(EntityIdError::InvalidObjectId);
        }

        Ok(Self { domain, object_id })
    }

    /// Derive an EntityId from a human-readable name.
    ///
    /// The object_id is `name.trim().to_lowercase()` with spaces replaced by
    /// underscores, so "My Notes" becomes `<domain>.my_notes`.
    pub fn from_name(domain: &str, name: &str) -> Result<Self, EntityIdError> {
        let object_id = name.trim().to_lowercase().replace(' ', "_");
        Self::new(domain, object_id)
    }

    /// Get the domain part of the entity ID
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Get the object_id part of the entity ID
    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    /// Human-readable form of the object_id: underscores become spaces and
    /// each word is capitalized ("my_notes" -> "My Notes").
    ///
    /// Feeding the result back through [`EntityId::from_name`] reproduces
    /// this identifier.
    pub fn display_name(&self) -> String {
        self.object_id
            .split('_')
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn is_valid_domain(s: &str) -> bool {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    }

    /// Object IDs may carry any character the derivation rule can produce,
    /// but never a separator, whitespace, or uppercase.
    fn is_valid_object_id(s: &str) -> bool {
        !s.contains('.')
            && !s
                .chars()
                .any(|c| c.is_whitespace() || c.is_uppercase())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl FromStr for EntityId {
    type Err = EntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 2 {
            return Err(EntityIdError::InvalidFormat);
        }
        Self::new(parts[0], parts[1])
    }
}

impl TryFrom<String> for EntityId {
    type Error = EntityIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> String {
        id.to_string()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.domain, self.object_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_normalizes() {
        let id = EntityId::from_name("enhanced_input", "My Notes").unwrap();
        assert_eq!(id.domain(), "enhanced_input");
        assert_eq!(id.object_id(), "my_notes");
        assert_eq!(id.to_string(), "enhanced_input.my_notes");
    }

    #[test]
    fn test_from_name_trims() {
        let id = EntityId::from_name("enhanced_input", "  Notes ").unwrap();
        assert_eq!(id.object_id(), "notes");
    }

    #[test]
    fn test_from_name_is_deterministic() {
        let a = EntityId::from_name("enhanced_input", "Grocery List").unwrap();
        let b = EntityId::from_name("enhanced_input", "Grocery List").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_derivation_round_trips_through_display_name() {
        for name in ["Notes", "My Notes", "a b c", "already_derived", "x__y"] {
            let id = EntityId::from_name("enhanced_input", name).unwrap();
            let again = EntityId::from_name("enhanced_input", &id.display_name()).unwrap();
            assert_eq!(again, id, "round-trip failed for {name:?}");
        }
    }

    #[test]
    fn test_display_name() {
        let id: EntityId = "enhanced_input.my_notes".parse().unwrap();
        assert_eq!(id.display_name(), "My Notes");
    }

    #[test]
    fn test_empty_name_rejected() {
        assert_eq!(
            EntityId::from_name("enhanced_input", "   ").unwrap_err(),
            EntityIdError::EmptyObjectId
        );
    }

    #[test]
    fn test_parse_entity_id() {
        let id: EntityId = "enhanced_input.notes".parse().unwrap();
        assert_eq!(id.domain(), "enhanced_input");
        assert_eq!(id.object_id(), "notes");
    }

    #[test]
    fn test_invalid_format() {
        assert_eq!(
            "no_separator".parse::<EntityId>().unwrap_err(),
            EntityIdError::InvalidFormat
        );
        assert_eq!(
            "too.many.parts".parse::<EntityId>().unwrap_err(),
            EntityIdError::InvalidFormat
        );
    }

    #[test]
    fn test_invalid_parts() {
        assert_eq!(
            "UPPER.notes".parse::<EntityId>().unwrap_err(),
            EntityIdError::InvalidDomain
        );
        assert_eq!(
            "enhanced_input.".parse::<EntityId>().unwrap_err(),
            EntityIdError::EmptyObjectId
        );
        assert_eq!(
            "enhanced_input.Notes".parse::<EntityId>().unwrap_err(),
            EntityIdError::InvalidObjectId
        );
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = EntityId::from_name("enhanced_input", "Notes").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"enhanced_input.notes\"");

        let parsed: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
