//! Gateway actions and their wire names.

use std::fmt;

/// The query actions recognized by the forwarding endpoint.
///
/// Each action maps to exactly one upstream short.io call; the wire name is
/// what travels in the `action` query parameter and what cache keys are
/// derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ListDomains,
    GetDomainStats,
    ListDomainLinks,
    GetLinkStats,
    GetLinkInfo,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ListDomains => "list-domains",
            Action::GetDomainStats => "get-domain-stats",
            Action::ListDomainLinks => "list-domain-links",
            Action::GetLinkStats => "get-link-stats",
            Action::GetLinkInfo => "get-link-info",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "list-domains" => Action::ListDomains,
            "get-domain-stats" => Action::GetDomainStats,
            "list-domain-links" => Action::ListDomainLinks,
            "get-link-stats" => Action::GetLinkStats,
            "get-link-info" => Action::GetLinkInfo,
            _ => return None,
        })
    }

    /// Identifier parameter this action cannot work without, if any.
    pub fn required_param(&self) -> Option<&'static str> {
        match self {
            Action::ListDomains => None,
            Action::GetDomainStats | Action::ListDomainLinks => Some("domainId"),
            Action::GetLinkStats | Action::GetLinkInfo => Some("linkId"),
        }
    }

    /// Whether the reporting period participates in this action's request
    /// and cache key.
    pub fn is_stats(&self) -> bool {
        matches!(self, Action::GetDomainStats | Action::GetLinkStats)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
