//! FILENAME: wire/src/provider.rs
//! PURPOSE: Identity of the provider family behind a session.
//! CONTEXT: Filter grammars, filter defaults and a few preference elements
//! differ between provider families. That variation is carried as a plain
//! tag and dispatched by the crates that care about it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Financial Management
    Hfm,
    /// Analytic Services
    Essbase,
    Unknown,
}

impl ProviderKind {
    /// Classifies the provider description returned by ConnectToProvider.
    pub fn from_description(description: &str) -> Self {
        if description.contains("Financial Management") {
            ProviderKind::Hfm
        } else if description.contains("Analytic Services") {
            ProviderKind::Essbase
        } else {
            ProviderKind::Unknown
        }
    }
}

impl Default for ProviderKind {
    fn default() -> Self {
        ProviderKind::Unknown
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Hfm => write!(f, "HFM"),
            ProviderKind::Essbase => write!(f, "Essbase"),
            ProviderKind::Unknown => write!(f, "Unknown"),
        }
    }
}
