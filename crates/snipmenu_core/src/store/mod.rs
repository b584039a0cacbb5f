//! Persistent key-value store for templates and the remote source URL.

/// Table definitions.
pub mod tables;


use crate::constants::{KEY_REMOTE_SOURCE_URL, KEY_TEMPLATES, STORE_FILE_NAME};
use crate::error::AppError;
use crate::models::template::{
    apply_update_request, CreateTemplateRequest, Template, UpdateTemplateRequest,
};
use redb::{ReadableDatabase, ReadableTable};
use std::path::Path;
use std::sync::Arc;

use self::tables::SETTINGS;

fn decode_templates(raw: &str) -> Result<Vec<Template>, AppError> {
    Ok(serde_json::from_str(raw)?)
}

/// Store handle over the underlying redb database.
pub struct Store {
    db: Arc<redb::Database>,
}

impl Store {
    /// Open (or create) the store inside `dir` and initialize tables.
    ///
    /// # Returns
    /// A fully initialized [`Store`].
    ///
    /// # Errors
    /// Returns an error if redb cannot open the database or tables.
    pub fn open(dir: &str) -> Result<Self, AppError> {
        std::fs::create_dir_all(dir).ok();
        let path = Path::new(dir).join(STORE_FILE_NAME);
        let db = Arc::new(redb::Database::create(path)?);

        let write_txn = db.begin_write()?;
        write_txn.open_table(SETTINGS)?;
        write_txn.commit()?;

        Ok(Self { db })
    }

    fn read_key(&self, key: &str) -> Result<Option<String>, AppError> {
        let read_txn = self.db.begin_read()?;
        let settings = read_txn.open_table(SETTINGS)?;
        Ok(settings.get(key)?.map(|guard| guard.value().to_string()))
    }

    fn write_key(&self, key: &str, value: &str) -> Result<(), AppError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut settings = write_txn.open_table(SETTINGS)?;
            settings.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Load the user-defined template list.
    ///
    /// # Returns
    /// The stored records in storage order; an absent key yields an empty list.
    ///
    /// # Errors
    /// Returns an error when storage access fails or the stored value is not
    /// a JSON array of records.
    pub fn load_templates(&self) -> Result<Vec<Template>, AppError> {
        match self.read_key(KEY_TEMPLATES)? {
            Some(raw) => decode_templates(&raw),
            None => Ok(Vec::new()),
        }
    }

    /// Replace the full user-defined template list.
    ///
    /// This is the raw key write; it performs no per-record validation.
    ///
    /// # Errors
    /// Returns an error when serialization or the commit fails.
    pub fn save_templates(&self, templates: &[Template]) -> Result<(), AppError> {
        let encoded = serde_json::to_string(templates)?;
        self.write_key(KEY_TEMPLATES, &encoded)
    }

    /// The configured remote template source URL; empty when unset.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn remote_source_url(&self) -> Result<String, AppError> {
        match self.read_key(KEY_REMOTE_SOURCE_URL)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(String::new()),
        }
    }

    /// Persist the remote template source URL (empty clears it).
    ///
    /// # Errors
    /// Returns an error when serialization or the commit fails.
    pub fn set_remote_source_url(&self, url: &str) -> Result<(), AppError> {
        let encoded = serde_json::to_string(url)?;
        self.write_key(KEY_REMOTE_SOURCE_URL, &encoded)
    }

    /// Validate and append a new user-defined template.
    ///
    /// # Returns
    /// The created record as persisted.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] for empty name/content, an error when
    /// the generated id already exists, and storage errors otherwise.
    pub fn create_template(&self, request: CreateTemplateRequest) -> Result<Template, AppError> {
        let template = request.into_template()?;
        let write_txn = self.db.begin_write()?;
        {
            let mut settings = write_txn.open_table(SETTINGS)?;
            let mut templates = match settings.get(KEY_TEMPLATES)? {
                Some(guard) => decode_templates(guard.value())?,
                None => Vec::new(),
            };
            if templates.iter().any(|t| t.id == template.id) {
                return Err(AppError::StorageMessage(format!(
                    "Template id '{}' already exists",
                    template.id
                )));
            }
            templates.push(template.clone());
            let encoded = serde_json::to_string(&templates)?;
            settings.insert(KEY_TEMPLATES, encoded.as_str())?;
        }
        write_txn.commit()?;
        Ok(template)
    }

    /// Apply a partial update to a user-defined template.
    ///
    /// # Returns
    /// `Ok(Some(template))` when updated, `Ok(None)` when the id is not in
    /// the user list.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn update_template(
        &self,
        id: &str,
        update: UpdateTemplateRequest,
    ) -> Result<Option<Template>, AppError> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut settings = write_txn.open_table(SETTINGS)?;
            let mut templates = match settings.get(KEY_TEMPLATES)? {
                Some(guard) => decode_templates(guard.value())?,
                None => Vec::new(),
            };
            let Some(template) = templates.iter_mut().find(|t| t.id == id) else {
                return Ok(None);
            };
            apply_update_request(template, &update);
            let updated = template.clone();
            let encoded = serde_json::to_string(&templates)?;
            settings.insert(KEY_TEMPLATES, encoded.as_str())?;
            Some(updated)
        };
        write_txn.commit()?;
        Ok(updated)
    }

    /// Delete a user-defined template by id.
    ///
    /// # Returns
    /// `Ok(true)` if a record was removed, `Ok(false)` when the id is not in
    /// the user list.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn delete_template(&self, id: &str) -> Result<bool, AppError> {
        let write_txn = self.db.begin_write()?;
        let deleted = {
            let mut settings = write_txn.open_table(SETTINGS)?;
            let mut templates = match settings.get(KEY_TEMPLATES)? {
                Some(guard) => decode_templates(guard.value())?,
                None => Vec::new(),
            };
            let before = templates.len();
            templates.retain(|t| t.id != id);
            if templates.len() == before {
                return Ok(false);
            }
            let encoded = serde_json::to_string(&templates)?;
            settings.insert(KEY_TEMPLATES, encoded.as_str())?;
            true
        };
        write_txn.commit()?;
        Ok(deleted)
    }
}
