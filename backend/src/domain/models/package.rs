use serde::{Deserialize, Serialize};

/// Domain model representing a service package (plan) offered to customers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub rate: f64,
}

impl Package {
    /// Convert to the DTO shared with the presentation layer and backup file
    pub fn to_dto(&self) -> shared::Package {
        shared::Package {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            rate: self.rate,
        }
    }

    /// Build a domain package from a backup/DTO row
    pub fn from_dto(dto: &shared::Package) -> Self {
        Self {
            id: dto.id,
            name: dto.name.clone(),
            description: dto.description.clone(),
            rate: dto.rate,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PackageValidationError {
    #[error("Package name cannot be empty")]
    EmptyName,
    #[error("Monthly rate cannot be negative")]
    NegativeRate,
    #[error("A package named '{0}' already exists")]
    DuplicateName(String),
}
