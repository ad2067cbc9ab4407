//! Read-only entities sourced from the short.io APIs.

mod domain;
mod link;
mod stats;

pub use domain::ShortDomain;
pub use link::{Link, LinkPage};
pub use stats::{BreakdownEntry, ClickPoint, StatsPayload};

/// Serde helper for identifiers the upstream sends as either a JSON number
/// or a string. Stored as an opaque `String` either way.
pub(crate) mod opaque_id {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(id: &str, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n.to_string(),
            Raw::Text(s) => s,
        })
    }
}
