use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Unique key for a repository on the hosting service: `owner/name`.
///
/// Immutable once collected; every downstream record (snapshot, dataset,
/// forecast) is keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoIdentity {
    owner: String,
    name: String,
}

impl RepoIdentity {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Filesystem-safe identifier used in dataset file names.
    pub fn slug(&self) -> String {
        format!("{}_{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoIdentity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self::new(owner, name))
            }
            _ => Err(DomainError::invalid_input(format!(
                "expected OWNER/NAME, got '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_owner_and_name() {
        let id: RepoIdentity = "pytorch/pytorch".parse().unwrap();
        assert_eq!(id.owner(), "pytorch");
        assert_eq!(id.name(), "pytorch");
        assert_eq!(id.full_name(), "pytorch/pytorch");
        assert_eq!(id.slug(), "pytorch_pytorch");
    }

    #[test]
    fn rejects_malformed_identifiers() {
        assert!("pytorch".parse::<RepoIdentity>().is_err());
        assert!("/pytorch".parse::<RepoIdentity>().is_err());
        assert!("pytorch/".parse::<RepoIdentity>().is_err());
        assert!("a/b/c".parse::<RepoIdentity>().is_err());
    }
}
