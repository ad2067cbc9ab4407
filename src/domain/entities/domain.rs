//! Short domain entity.

use serde::{Deserialize, Serialize};

/// A domain registered with the shortening service.
///
/// Sourced read-only from the `list-domains` call; the id is what every
/// stats and link-listing call keys on. Ids are kept opaque — the upstream
/// sends them as numbers, but nothing here does arithmetic on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortDomain {
    #[serde(with = "super::opaque_id")]
    pub id: String,
    pub hostname: String,
}
