//! View state machine and breadcrumb projection.

use serde::{Deserialize, Serialize};

/// The four dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    ApiKeyEntry,
    DomainList,
    DomainDetail,
    LinkDetail,
}

/// Currently selected domain, carried by `DomainDetail` and `LinkDetail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedDomain {
    pub id: String,
    pub hostname: String,
}

/// Currently selected link. The display path starts as `ID: <id>` and is
/// upgraded once link metadata arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedLink {
    pub id: String,
    pub display_path: String,
}

/// The minimum state needed to reconstruct breadcrumbs and to know what a
/// refresh or filter change should re-fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub view: View,
    pub domain: Option<SelectedDomain>,
    pub link: Option<SelectedLink>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            view: View::ApiKeyEntry,
            domain: None,
            link: None,
        }
    }
}

/// One breadcrumb segment. `Jump` crumbs navigate; the `Current` crumb is
/// plain text for the view being shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Crumb {
    Jump { target: View, label: String },
    Current { label: String },
}

impl Crumb {
    pub fn label(&self) -> &str {
        match self {
            Crumb::Jump { label, .. } | Crumb::Current { label } => label,
        }
    }
}

impl NavigationState {
    pub fn select_domain(&mut self, id: impl Into<String>, hostname: impl Into<String>) {
        self.view = View::DomainDetail;
        self.domain = Some(SelectedDomain {
            id: id.into(),
            hostname: hostname.into(),
        });
        // Any previously selected link belongs to the old context.
        self.link = None;
    }

    pub fn select_link(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.view = View::LinkDetail;
        self.link = Some(SelectedLink {
            display_path: format!("ID: {id}"),
            id,
        });
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Pure projection of the current state into breadcrumb segments.
    ///
    /// The root credential crumb is always present; the domain-list crumb
    /// appears whenever authenticated and not already there; the hostname
    /// appears in both detail views; the link path only in `LinkDetail`.
    pub fn breadcrumbs(&self, authenticated: bool) -> Vec<Crumb> {
        let mut crumbs = Vec::new();

        if self.view == View::ApiKeyEntry {
            crumbs.push(Crumb::Current {
                label: "API Key".to_string(),
            });
            return crumbs;
        }

        crumbs.push(Crumb::Jump {
            target: View::ApiKeyEntry,
            label: "API Key".to_string(),
        });

        if authenticated {
            if self.view == View::DomainList {
                crumbs.push(Crumb::Current {
                    label: "Domains".to_string(),
                });
            } else {
                crumbs.push(Crumb::Jump {
                    target: View::DomainList,
                    label: "Domains".to_string(),
                });
            }
        }

        if let Some(domain) = &self.domain {
            match self.view {
                View::DomainDetail => crumbs.push(Crumb::Current {
                    label: domain.hostname.clone(),
                }),
                View::LinkDetail => crumbs.push(Crumb::Jump {
                    target: View::DomainDetail,
                    label: domain.hostname.clone(),
                }),
                _ => {}
            }
        }

        if self.view == View::LinkDetail {
            if let Some(link) = &self.link {
                crumbs.push(Crumb::Current {
                    label: link.display_path.clone(),
                });
            }
        }

        crumbs
    }
}
