use anyhow::Result;
use log::{info, warn};

use crate::domain::commands::packages::{
    CreatePackageCommand, CreatePackageResult, DeletePackageResult, GetPackageResult,
    ListPackagesResult, UpdatePackageCommand, UpdatePackageResult,
};
use crate::domain::models::{Package, PackageValidationError};
use crate::storage::sqlite::PackageRepository;
use crate::storage::traits::PackageStorage;

/// Service for managing the service plans offered to customers
#[derive(Clone)]
pub struct PackageService {
    package_repository: PackageRepository,
}

impl PackageService {
    /// Create a new PackageService
    pub fn new(package_repository: PackageRepository) -> Self {
        Self { package_repository }
    }

    /// Create a new package
    pub async fn create_package(&self, command: CreatePackageCommand) -> Result<CreatePackageResult> {
        info!("Creating package: name={}, rate={}", command.name, command.rate);

        let name = command.name.trim().to_string();
        self.validate_fields(&name, command.rate)?;

        // Uniqueness check before any write
        if self.package_repository.get_package_by_name(&name).await?.is_some() {
            warn!("Rejected duplicate package name: {}", name);
            return Err(PackageValidationError::DuplicateName(name).into());
        }

        let package = Package {
            id: 0,
            name,
            description: command.description.trim().to_string(),
            rate: command.rate,
        };

        let package = self.package_repository.store_package(&package).await?;

        info!("Created package: {} with id: {}", package.name, package.id);

        Ok(CreatePackageResult { package })
    }

    /// List all packages, ordered by name
    pub async fn list_packages(&self) -> Result<ListPackagesResult> {
        let packages = self.package_repository.list_packages().await?;

        info!("Found {} packages", packages.len());

        Ok(ListPackagesResult { packages })
    }

    /// Get a package by id. A missing package is a normal empty result, not
    /// an error; display joins fall back to "Unknown".
    pub async fn get_package(&self, id: i64) -> Result<GetPackageResult> {
        let package = self.package_repository.get_package(id).await?;

        if package.is_none() {
            warn!("Package not found: {}", id);
        }

        Ok(GetPackageResult { package })
    }

    /// Update an existing package
    pub async fn update_package(&self, command: UpdatePackageCommand) -> Result<UpdatePackageResult> {
        info!("Updating package: {}", command.id);

        let existing = self
            .package_repository
            .get_package(command.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Package not found: {}", command.id))?;

        let name = command.name.trim().to_string();
        self.validate_fields(&name, command.rate)?;

        // The new name must not collide with a different package
        if let Some(other) = self.package_repository.get_package_by_name(&name).await? {
            if other.id != existing.id {
                warn!("Rejected duplicate package name on update: {}", name);
                return Err(PackageValidationError::DuplicateName(name).into());
            }
        }

        let package = Package {
            id: existing.id,
            name,
            description: command.description.trim().to_string(),
            rate: command.rate,
        };

        self.package_repository.update_package(&package).await?;

        info!("Updated package: {} with id: {}", package.name, package.id);

        Ok(UpdatePackageResult { package })
    }

    /// Delete a package. Deleting a missing id is a no-op; customers linked
    /// to the deleted package keep their (now dangling) link and display
    /// "Unknown".
    pub async fn delete_package(&self, id: i64) -> Result<DeletePackageResult> {
        info!("Deleting package: {}", id);

        let existing = self.package_repository.get_package(id).await?;

        self.package_repository.delete_package(id).await?;

        let success_message = match existing {
            Some(package) => format!("Package '{}' deleted successfully", package.name),
            None => format!("Package {} was already gone", id),
        };

        Ok(DeletePackageResult { success_message })
    }

    fn validate_fields(&self, name: &str, rate: f64) -> Result<()> {
        if name.is_empty() {
            return Err(PackageValidationError::EmptyName.into());
        }
        if rate < 0.0 {
            return Err(PackageValidationError::NegativeRate.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;

    async fn setup_test_service() -> PackageService {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        PackageService::new(PackageRepository::new(db))
    }

    fn create_command(name: &str, rate: f64) -> CreatePackageCommand {
        CreatePackageCommand {
            name: name.to_string(),
            description: format!("{} plan", name),
            rate,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_packages() {
        let service = setup_test_service().await;

        service.create_package(create_command("Premium", 45.0)).await.expect("Failed to create");
        service.create_package(create_command("Basic", 15.0)).await.expect("Failed to create");

        let result = service.list_packages().await.expect("Failed to list");
        let names: Vec<&str> = result.packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Basic", "Premium"]);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let service = setup_test_service().await;

        let result = service.create_package(create_command("   ", 10.0)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_create_rejects_negative_rate() {
        let service = setup_test_service().await;

        let result = service.create_package(create_command("Basic", -1.0)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name_and_keeps_original() {
        let service = setup_test_service().await;

        let original = service
            .create_package(create_command("Basic", 15.0))
            .await
            .expect("Failed to create");

        let duplicate = service.create_package(create_command("Basic", 99.0)).await;
        assert!(duplicate.is_err());

        let fetched = service
            .get_package(original.package.id)
            .await
            .expect("Query failed")
            .package
            .expect("Original should still exist");
        assert_eq!(fetched.rate, 15.0);
    }

    #[tokio::test]
    async fn test_update_can_keep_own_name() {
        let service = setup_test_service().await;

        let created = service
            .create_package(create_command("Basic", 15.0))
            .await
            .expect("Failed to create");

        let updated = service
            .update_package(UpdatePackageCommand {
                id: created.package.id,
                name: "Basic".to_string(),
                description: "New description".to_string(),
                rate: 16.0,
            })
            .await
            .expect("Update keeping own name should succeed");

        assert_eq!(updated.package.rate, 16.0);
    }

    #[tokio::test]
    async fn test_update_rejects_name_of_other_package() {
        let service = setup_test_service().await;

        service.create_package(create_command("Basic", 15.0)).await.expect("Failed to create");
        let other = service
            .create_package(create_command("Gold", 30.0))
            .await
            .expect("Failed to create");

        let result = service
            .update_package(UpdatePackageCommand {
                id: other.package.id,
                name: "Basic".to_string(),
                description: "Collides".to_string(),
                rate: 30.0,
            })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_get_missing_package_is_empty_result() {
        let service = setup_test_service().await;

        let result = service.get_package(404).await.expect("Lookup should not error");
        assert!(result.package.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_package_is_noop() {
        let service = setup_test_service().await;

        let result = service.delete_package(404).await.expect("Delete should not error");
        assert!(result.success_message.contains("already gone"));
    }
}
