use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Whether a script needs an external key to run.
///
/// Stored as `"yes"` / `"no"`. Older clients sent booleans, so the JSON form
/// accepts both; anything else is rejected at the boundary instead of being
/// silently defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Keyless {
    #[default]
    Keyed,
    Keyless,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid keyless value: {0:?} (expected \"yes\" or \"no\")")]
pub struct InvalidKeyless(pub String);

impl Keyless {
    /// The stored form, matching the `scripts.keyless` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyless::Keyless => "yes",
            Keyless::Keyed => "no",
        }
    }

    /// The user-facing badge text.
    pub fn label(self) -> &'static str {
        match self {
            Keyless::Keyless => "Keyless",
            Keyless::Keyed => "Keyed",
        }
    }

    pub fn from_stored(value: &str) -> Result<Self, InvalidKeyless> {
        match value {
            "yes" => Ok(Keyless::Keyless),
            "no" => Ok(Keyless::Keyed),
            other => Err(InvalidKeyless(other.to_string())),
        }
    }
}

impl Serialize for Keyless {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Keyless {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeylessVisitor;

        impl Visitor<'_> for KeylessVisitor {
            type Value = Keyless;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("\"yes\", \"no\", or a boolean")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Keyless, E> {
                Ok(if v { Keyless::Keyless } else { Keyless::Keyed })
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Keyless, E> {
                Keyless::from_stored(v).map_err(|e| E::custom(e.to_string()))
            }
        }

        deserializer.deserialize_any(KeylessVisitor)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    pub id: Uuid,
    pub title: String,
    pub code: String,
    pub game: Option<String>,
    pub icon: Option<String>,
    pub keyless: Keyless,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// The mirrored profile row, distinct from the auth identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyless_accepts_both_legacy_forms() {
        let from_str: Keyless = serde_json::from_str("\"yes\"").unwrap();
        let from_bool: Keyless = serde_json::from_str("true").unwrap();
        assert_eq!(from_str, Keyless::Keyless);
        assert_eq!(from_bool, Keyless::Keyless);

        let keyed: Keyless = serde_json::from_str("\"no\"").unwrap();
        assert_eq!(keyed, Keyless::Keyed);
        assert_eq!(
            serde_json::from_str::<Keyless>("false").unwrap(),
            Keyless::Keyed
        );
    }

    #[test]
    fn keyless_rejects_unknown_values() {
        assert!(serde_json::from_str::<Keyless>("\"maybe\"").is_err());
        assert!(Keyless::from_stored("1").is_err());
    }

    #[test]
    fn keyless_serializes_to_stored_form() {
        assert_eq!(serde_json::to_string(&Keyless::Keyless).unwrap(), "\"yes\"");
        assert_eq!(serde_json::to_string(&Keyless::Keyed).unwrap(), "\"no\"");
    }
}
