//! Shared serde helper functions used across multiple modules.

/// Serde default function that returns `true`.
///
/// Used for boolean fields that should default to enabled/active.
pub fn default_true() -> bool {
    true
}

/// Serialize/deserialize an `Option<chrono::Duration>` as whole seconds.
///
/// Intervals cross the wire as plain integers so any caller can produce them
/// without depending on chrono's own formats.
pub mod opt_duration_secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_some(&d.num_seconds()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<i64> = Option::deserialize(deserializer)?;
        Ok(secs.map(Duration::seconds))
    }
}
