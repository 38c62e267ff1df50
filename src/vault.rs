use std::fs::{read_to_string, write};
use std::io::ErrorKind;
use std::path::PathBuf;

#[cfg(test)]
use mockall::automock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::amounts::NumberConvention;
use crate::invoices::{Invoice, InvoiceRecord};
use crate::projects::{BackendProjectRow, LocalProjectRecord, Project, ProjectOrigin, ProjectSource};

const VAULT_FILE: &str = "config.json";

/// Where the back office keeps its records: a directory holding a `config.json` object,
/// one top-level key per collection.
pub trait Vault {
    /// None when the key is absent
    fn read_vault_values<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, String>;

    fn write_vault_values<T: Serialize>(&self, key: &str, values: &T) -> Result<(), String>;
}

pub trait VaultReadable: DeserializeOwned + Default {
    const KEY: &'static str;

    fn from_vault<V: Vault>(vault: &V) -> Result<Self, String> {
        Ok(vault.read_vault_values(Self::KEY)?.unwrap_or_default())
    }
}

pub trait VaultWritable: VaultReadable + Serialize {
    fn to_vault<V: Vault>(&self, vault: &V) -> Result<(), String> {
        vault.write_vault_values(Self::KEY, self)
    }
}

pub type BackendProjectRows = Vec<BackendProjectRow>;
impl VaultReadable for BackendProjectRows {
    const KEY: &'static str = "projects";
}
impl VaultWritable for BackendProjectRows {}

pub type LocalProjectRecords = Vec<LocalProjectRecord>;
impl VaultReadable for LocalProjectRecords {
    const KEY: &'static str = "local_projects";
}
impl VaultWritable for LocalProjectRecords {}

pub type InvoiceRecords = Vec<InvoiceRecord>;
impl VaultReadable for InvoiceRecords {
    const KEY: &'static str = "invoices";
}
impl VaultWritable for InvoiceRecords {}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct VaultSettings {
    #[serde(default)]
    pub number_convention: NumberConvention,
}

impl VaultReadable for VaultSettings {
    const KEY: &'static str = "settings";
}

pub struct VaultImpl {
    pub path: PathBuf,
}

impl VaultImpl {
    fn file(&self) -> PathBuf {
        self.path.join(VAULT_FILE)
    }

    fn read_document(&self) -> Result<Option<Map<String, Value>>, String> {
        let file = self.file();
        let content = match read_to_string(&file) {
            Ok(content) => content,
            Err(why) if why.kind() == ErrorKind::NotFound => return Ok(None),
            Err(why) => return Err(format!("Could not read vault file {}: {}", file.display(), why)),
        };

        match serde_json::from_str(&content) {
            Ok(Value::Object(document)) => Ok(Some(document)),
            Ok(_) => Err(format!("Vault file {} is not a JSON object", file.display())),
            Err(why) => Err(format!("Could not parse vault file {}: {}", file.display(), why)),
        }
    }
}

impl Vault for VaultImpl {
    fn read_vault_values<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, String> {
        let document = self
            .read_document()?
            .ok_or(format!("No vault found in {}", self.path.display()))?;

        match document.get(key) {
            None | Some(Value::Null) => {
                debug!(key, "vault key absent");
                Ok(None)
            }
            Some(values) => {
                debug!(key, "reading vault values");
                T::deserialize(values)
                    .map(Some)
                    .map_err(|why| format!("Could not decode vault values for {}: {}", key, why))
            }
        }
    }

    fn write_vault_values<T: Serialize>(&self, key: &str, values: &T) -> Result<(), String> {
        let mut document = self.read_document()?.unwrap_or_default();
        let values = serde_json::to_value(values)
            .map_err(|why| format!("Could not encode vault values for {}: {}", key, why))?;
        document.insert(key.to_string(), values);

        let content = serde_json::to_string_pretty(&Value::Object(document))
            .map_err(|why| format!("Could not encode vault: {}", why))?;
        let file = self.file();
        debug!(key, file = %file.display(), "writing vault values");
        write(&file, content).map_err(|why| format!("Could not write vault file {}: {}", file.display(), why))
    }
}

/* Repositories */

#[cfg_attr(test, automock)]
pub trait ProjectRepository {
    fn projects(&self) -> Result<Vec<Project>, String>;

    fn project(&self, id: &str) -> Result<Option<Project>, String> {
        Ok(self.projects()?.into_iter().find(|project| project.id == id))
    }

    /// Inserts the project, or replaces the stored project with the same id
    fn save_project(&self, project: &Project) -> Result<(), String>;

    /// Returns whether a project was removed
    fn delete_project(&self, id: &str) -> Result<bool, String>;
}

#[cfg_attr(test, automock)]
pub trait InvoiceRepository {
    fn invoices(&self) -> Result<Vec<Invoice>, String>;

    fn save_invoice(&self, invoice: &Invoice) -> Result<(), String>;

    fn delete_invoice(&self, id: &str) -> Result<bool, String>;
}

impl VaultImpl {
    pub fn number_convention(&self) -> Result<NumberConvention, String> {
        Ok(VaultSettings::from_vault(self)?.number_convention)
    }
}

impl ProjectRepository for VaultImpl {
    fn projects(&self) -> Result<Vec<Project>, String> {
        let convention = self.number_convention()?;
        let backend = BackendProjectRows::from_vault(self)?
            .into_iter()
            .map(ProjectSource::Backend);
        let local = LocalProjectRecords::from_vault(self)?
            .into_iter()
            .map(ProjectSource::Local);

        Ok(backend
            .chain(local)
            .map(|source| source.into_project(convention))
            .collect())
    }

    fn save_project(&self, project: &Project) -> Result<(), String> {
        let convention = self.number_convention()?;
        match project.origin {
            ProjectOrigin::Backend => {
                let mut rows = BackendProjectRows::from_vault(self)?;
                let row = BackendProjectRow::from_project(project, convention);
                match rows.iter_mut().find(|stored| stored.id == project.id) {
                    Some(stored) => *stored = row,
                    None => rows.push(row),
                }
                rows.to_vault(self)
            }
            ProjectOrigin::Local => {
                let mut records = LocalProjectRecords::from_vault(self)?;
                match records.iter_mut().find(|stored| stored.id == project.id) {
                    Some(stored) => stored.update_from(project, convention),
                    None => {
                        let mut record = LocalProjectRecord {
                            id: project.id.clone(),
                            ..LocalProjectRecord::default()
                        };
                        record.update_from(project, convention);
                        records.push(record);
                    }
                }
                records.to_vault(self)
            }
        }
    }

    fn delete_project(&self, id: &str) -> Result<bool, String> {
        let mut rows = BackendProjectRows::from_vault(self)?;
        let mut records = LocalProjectRecords::from_vault(self)?;
        let (rows_before, records_before) = (rows.len(), records.len());

        rows.retain(|row| row.id != id);
        records.retain(|record| record.id != id);

        if rows.len() != rows_before {
            rows.to_vault(self)?;
        }
        if records.len() != records_before {
            records.to_vault(self)?;
        }
        Ok(rows.len() != rows_before || records.len() != records_before)
    }
}

impl InvoiceRepository for VaultImpl {
    fn invoices(&self) -> Result<Vec<Invoice>, String> {
        let convention = self.number_convention()?;
        Ok(InvoiceRecords::from_vault(self)?
            .into_iter()
            .map(|record| record.into_invoice(convention))
            .collect())
    }

    fn save_invoice(&self, invoice: &Invoice) -> Result<(), String> {
        let mut records = InvoiceRecords::from_vault(self)?;
        let record = InvoiceRecord::from_invoice(invoice, self.number_convention()?);
        match records.iter_mut().find(|stored| stored.id == invoice.id) {
            Some(stored) => *stored = record,
            None => records.push(record),
        }
        records.to_vault(self)
    }

    fn delete_invoice(&self, id: &str) -> Result<bool, String> {
        let mut records = InvoiceRecords::from_vault(self)?;
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            return Ok(false);
        }
        records.to_vault(self)?;
        Ok(true)
    }
}
