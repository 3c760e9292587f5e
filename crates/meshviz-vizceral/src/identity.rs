//! Identity keys and display labels for topology entities.

use meshviz_error::{Error, Result};

/// Key and label of the synthetic boundary node.
pub const INTERNET: &str = "INTERNET";

/// Name and version the query collaborator gives to traffic from outside
/// the observed services.
pub const UNKNOWN: &str = "unknown";

/// The `unknown/unknown` root that stands for outside traffic.
pub fn is_sentinel(name: &str, version: &str) -> bool {
    name == UNKNOWN && version == UNKNOWN
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeIdentity {
    /// `"<name> (<version>)"`, or `INTERNET` for the sentinel.
    pub key: String,
    /// Like `key`, with the name cut at its first `.`.
    pub display_name: String,
}

impl NodeIdentity {
    pub fn internet() -> Self {
        Self {
            key: INTERNET.to_string(),
            display_name: INTERNET.to_string(),
        }
    }

    /// Derive the identity of an entity, rejecting names and versions that
    /// would make the key ambiguous.
    pub fn of(name: &str, version: &str) -> Result<Self> {
        if is_sentinel(name, version) {
            return Ok(Self::internet());
        }

        check_segment(name, version, "name", name)?;
        check_segment(name, version, "version", version)?;

        let short = name.split('.').next().unwrap_or(name);
        Ok(Self {
            key: format!("{} ({})", name, version),
            display_name: format!("{} ({})", short, version),
        })
    }

    pub fn is_internet(&self) -> bool {
        self.key == INTERNET
    }
}

fn check_segment(name: &str, version: &str, field: &'static str, value: &str) -> Result<()> {
    let reason = if value.is_empty() {
        Some(format!("{} is empty", field))
    } else if value.trim() != value {
        Some(format!("{} has surrounding whitespace", field))
    } else if value.contains(['(', ')']) {
        Some(format!("{} contains a parenthesis", field))
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::malformed_entity(
            format!("{} ({})", name, version),
            reason,
        )
        .with_context("field", field)
        .with_operation("vizceral::identity")),
        None => Ok(()),
    }
}
