use std::fmt;

use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DestinationRepository {
    pub owner: String,
    pub name: String,
}

impl DestinationRepository {
    pub fn new(owner: &str, name: &str) -> Self {
        DestinationRepository {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for DestinationRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// One source -> destination migration unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MigrationTask {
    pub source_url: String,
    pub destination: DestinationRepository,
}

impl MigrationTask {
    pub fn new(source_url: &str, owner: &str, name: &str) -> Self {
        MigrationTask {
            source_url: source_url.to_string(),
            destination: DestinationRepository::new(owner, name),
        }
    }
}

impl fmt::Display for MigrationTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source_url, self.destination)
    }
}
