//! Backup service domain logic.
//!
//! Export gathers both tables into the JSON backup document; import replaces
//! the whole store from such a document. The document is parsed and every
//! row validated *before* the restore transaction begins, so a malformed
//! file leaves the store untouched. How the file travels (share sheet,
//! file picker) is the presentation layer's concern.

use anyhow::{Context, Result};
use chrono::Utc;
use log::{error, info};
use std::fs;
use std::path::Path;

use shared::{BackupExportResponse, BackupFile};

use crate::domain::commands::backup::ImportBackupResult;
use crate::domain::models::{Customer, Package};
use crate::storage::sqlite::{BackupRepository, CustomerRepository, PackageRepository};
use crate::storage::traits::{BackupStorage, CustomerStorage, PackageStorage};

/// Service that exports and restores the whole store
#[derive(Clone)]
pub struct BackupService {
    customer_repository: CustomerRepository,
    package_repository: PackageRepository,
    backup_repository: BackupRepository,
}

impl BackupService {
    /// Create a new BackupService
    pub fn new(
        customer_repository: CustomerRepository,
        package_repository: PackageRepository,
        backup_repository: BackupRepository,
    ) -> Self {
        Self {
            customer_repository,
            package_repository,
            backup_repository,
        }
    }

    /// Export all customers and packages as a JSON backup document
    pub async fn export_backup(&self) -> Result<BackupExportResponse> {
        let customers = self.customer_repository.list_customers().await?;
        let packages = self.package_repository.list_packages().await?;

        let document = BackupFile {
            customers: customers.iter().map(Customer::to_dto).collect(),
            packages: packages.iter().map(Package::to_dto).collect(),
        };

        let json_content =
            serde_json::to_string_pretty(&document).context("Failed to serialize backup")?;

        let filename = format!("ispbill_backup_{}.json", Utc::now().format("%Y%m%d"));

        info!(
            "Exported backup: {} customers, {} packages ({} bytes) as {}",
            document.customers.len(),
            document.packages.len(),
            json_content.len(),
            filename
        );

        Ok(BackupExportResponse {
            json_content,
            filename,
            customer_count: document.customers.len(),
            package_count: document.packages.len(),
        })
    }

    /// Restore the store wholesale from a backup document.
    ///
    /// Parsing and row validation happen before the transaction begins; any
    /// failure up to that point aborts the import with the store unchanged.
    pub async fn import_backup(&self, json_content: &str) -> Result<ImportBackupResult> {
        let document: BackupFile = serde_json::from_str(json_content).map_err(|e| {
            error!("Backup import rejected: {}", e);
            anyhow::anyhow!(e).context("Backup file is not a valid backup document")
        })?;

        let packages: Vec<Package> = document.packages.iter().map(Package::from_dto).collect();
        let customers = document
            .customers
            .iter()
            .map(Customer::from_dto)
            .collect::<Result<Vec<Customer>>>()
            .context("Backup file contains an invalid customer row")?;

        self.backup_repository.replace_all(&packages, &customers).await?;

        let success_message = format!(
            "Restored {} customers and {} packages",
            customers.len(),
            packages.len()
        );

        info!("{}", success_message);

        Ok(ImportBackupResult {
            customer_count: customers.len(),
            package_count: packages.len(),
            success_message,
        })
    }

    /// Export the backup document and write it to `path`
    pub async fn export_to_path(&self, path: &Path) -> Result<BackupExportResponse> {
        let response = self.export_backup().await?;

        fs::write(path, &response.json_content)
            .with_context(|| format!("Failed to write backup to {}", path.display()))?;

        info!("Wrote backup to {}", path.display());

        Ok(response)
    }

    /// Read a backup document from `path` and restore from it
    pub async fn import_from_path(&self, path: &Path) -> Result<ImportBackupResult> {
        let json_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read backup from {}", path.display()))?;

        self.import_backup(&json_content).await
    }
}
