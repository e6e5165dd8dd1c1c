use md5::{Digest, Md5};
use serde::{de::Visitor, Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Serialize, Debug, PartialEq, Eq, Clone)]
pub struct Username(String);

struct UsernameVisitor;

impl<'de> Visitor<'de> for UsernameVisitor {
    type Value = Username;

    fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Username::new(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Username {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(UsernameVisitor)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("The username cannot be empty")]
    InvalidUsername,
}

impl Username {
    /// Surrounding whitespace is trimmed, the rest of the name is kept as typed.
    pub fn new(s: impl AsRef<str>) -> Result<Self, ValidationError> {
        let s = s.as_ref().trim();
        if s.is_empty() {
            return Err(ValidationError::InvalidUsername);
        }
        Ok(Username(s.to_owned()))
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }

    /// Deterministic offline identity, used as both the player UUID and the access token.
    pub fn offline_uuid(&self) -> Uuid {
        offline_uuid(&self.0)
    }
}

/// Name-based (version 3) UUID of `"OfflinePlayer:" + username`.
pub fn offline_uuid(username: &str) -> Uuid {
    let digest = Md5::digest(format!("OfflinePlayer:{username}").as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest);

    bytes[6] = (bytes[6] & 0x0f) | 0x30;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Uuid::from_bytes(bytes)
}
