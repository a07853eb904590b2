//! SQLite-backed package repository.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::db::DbConnection;
use crate::domain::models::Package;
use crate::storage::traits::PackageStorage;

/// Package repository over the shared SQLite pool
#[derive(Clone)]
pub struct PackageRepository {
    db: DbConnection,
}

impl PackageRepository {
    /// Create a new package repository
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_package(row: &SqliteRow) -> Package {
        Package {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            rate: row.get("rate"),
        }
    }
}

#[async_trait]
impl PackageStorage for PackageRepository {
    async fn store_package(&self, package: &Package) -> Result<Package> {
        let result = sqlx::query("INSERT INTO packages (name, description, rate) VALUES (?, ?, ?)")
            .bind(&package.name)
            .bind(&package.description)
            .bind(package.rate)
            .execute(self.db.pool())
            .await
            .with_context(|| format!("Failed to insert package '{}'", package.name))?;

        debug!("Inserted package '{}' with id {}", package.name, result.last_insert_rowid());

        Ok(Package {
            id: result.last_insert_rowid(),
            name: package.name.clone(),
            description: package.description.clone(),
            rate: package.rate,
        })
    }

    async fn get_package(&self, id: i64) -> Result<Option<Package>> {
        let row = sqlx::query("SELECT id, name, description, rate FROM packages WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await
            .context("Failed to query package by id")?;

        Ok(row.as_ref().map(Self::row_to_package))
    }

    async fn get_package_by_name(&self, name: &str) -> Result<Option<Package>> {
        let row = sqlx::query("SELECT id, name, description, rate FROM packages WHERE name = ?")
            .bind(name)
            .fetch_optional(self.db.pool())
            .await
            .context("Failed to query package by name")?;

        Ok(row.as_ref().map(Self::row_to_package))
    }

    async fn list_packages(&self) -> Result<Vec<Package>> {
        let rows = sqlx::query("SELECT id, name, description, rate FROM packages ORDER BY name ASC")
            .fetch_all(self.db.pool())
            .await
            .context("Failed to list packages")?;

        Ok(rows.iter().map(Self::row_to_package).collect())
    }

    async fn update_package(&self, package: &Package) -> Result<()> {
        sqlx::query("UPDATE packages SET name = ?, description = ?, rate = ? WHERE id = ?")
            .bind(&package.name)
            .bind(&package.description)
            .bind(package.rate)
            .bind(package.id)
            .execute(self.db.pool())
            .await
            .with_context(|| format!("Failed to update package {}", package.id))?;

        Ok(())
    }

    async fn delete_package(&self, id: i64) -> Result<()> {
        // Deleting a missing id is a no-op, not an error
        sqlx::query("DELETE FROM packages WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await
            .with_context(|| format!("Failed to delete package {}", id))?;

        Ok(())
    }
}
