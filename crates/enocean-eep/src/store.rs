use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::catalog::{CatalogDocument, ProfileKey};
use crate::config::CatalogConfig;
use crate::error::{EepError, Result};
use crate::profile::Profile;

const EMBEDDED_CATALOG: &str = include_str!("../profiles/eep.json");

/// Read-only index of EEP profiles keyed by RORG/FUNC/TYPE.
///
/// Built once, then shared (by reference or `Arc`) with everything that
/// decodes or encodes telegrams.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    profiles: BTreeMap<ProfileKey, Arc<Profile>>,
    config: CatalogConfig,
    version: Option<String>,
}

impl ProfileStore {
    /// Create an empty store with default config.
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    /// Create an empty store with explicit config.
    pub fn with_config(config: CatalogConfig) -> Self {
        Self {
            profiles: BTreeMap::new(),
            config,
            version: None,
        }
    }

    /// Load the catalog compiled into the crate.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Load a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut store = Self::new();
        store.register_json(json)?;
        Ok(store)
    }

    /// Load a catalog file.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_file_with_config(path, CatalogConfig::default())
    }

    /// Load a catalog file with explicit config.
    pub fn from_file_with_config(path: &Path, config: CatalogConfig) -> Result<Self> {
        let mut store = Self::with_config(config);
        let content = read_limited(path, config.max_catalog_bytes)?;
        let added = store.register_json(&content)?;
        info!(path = %path.display(), profiles = added, "loaded EEP catalog");
        Ok(store)
    }

    /// Load every `*.json` catalog in a directory, merged into one store.
    pub fn from_directory(path: &Path) -> Result<Self> {
        Self::from_directory_with_config(path, CatalogConfig::default())
    }

    /// Load every `*.json` catalog in a directory with explicit config.
    pub fn from_directory_with_config(path: &Path, config: CatalogConfig) -> Result<Self> {
        let mut store = Self::with_config(config);

        let entries = std::fs::read_dir(path)
            .map_err(|err| EepError::LoadFailed(format!("{}: {err}", path.display())))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| EepError::LoadFailed(err.to_string()))?;
            let entry_path = entry.path();
            let file_type = std::fs::symlink_metadata(&entry_path)
                .map_err(|err| EepError::LoadFailed(err.to_string()))?
                .file_type();
            let is_catalog = entry_path.extension().is_some_and(|ext| ext == "json");

            if file_type.is_symlink() && is_catalog {
                return Err(EepError::LoadFailed(format!(
                    "refusing to load catalog symlink: {}",
                    entry_path.display()
                )));
            }
            if file_type.is_file() && is_catalog {
                files.push(entry_path);
            }
        }

        if files.len() > config.max_catalog_files {
            return Err(EepError::LoadFailed(format!(
                "catalog count exceeds configured max ({}): {}",
                config.max_catalog_files,
                files.len()
            )));
        }

        // Deterministic merge order.
        files.sort();
        for file in files {
            let content = read_limited(&file, config.max_catalog_bytes)?;
            let added = store.register_json(&content)?;
            debug!(path = %file.display(), profiles = added, "merged EEP catalog");
        }

        info!(path = %path.display(), profiles = store.len(), "loaded EEP catalog directory");
        Ok(store)
    }

    /// Merge a JSON catalog into this store. Returns the number of profiles added.
    pub fn register_json(&mut self, json: &str) -> Result<usize> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        self.register_document(document)
    }

    /// Merge a parsed catalog document into this store.
    pub fn register_document(&mut self, document: CatalogDocument) -> Result<usize> {
        let mut added = 0usize;
        for telegram in document.telegrams {
            for function in telegram.functions {
                for spec in function.profiles {
                    let key = ProfileKey::new(telegram.rorg, function.func, spec.type_);
                    let profile = Profile::from_spec(key, &function.description, spec)?;
                    if self.profiles.contains_key(&key) && self.config.reject_duplicates {
                        return Err(EepError::DuplicateProfile(key.to_string()));
                    }
                    self.profiles.insert(key, Arc::new(profile));
                    added += 1;
                }
            }
        }

        if document.version.is_some() {
            self.version = document.version;
        }
        Ok(added)
    }

    /// Look up a profile. A miss is not an error: receivers rarely know every profile.
    pub fn find(&self, rorg: u8, func: u8, type_: u8) -> Option<&Arc<Profile>> {
        let key = ProfileKey::new(rorg, func, type_);
        let profile = self.profiles.get(&key);
        if profile.is_none() {
            debug!(profile = %key, "EEP profile not in catalog");
        }
        profile
    }

    /// Check if a profile is known.
    pub fn contains(&self, rorg: u8, func: u8, type_: u8) -> bool {
        self.profiles
            .contains_key(&ProfileKey::new(rorg, func, type_))
    }

    /// All profiles, ordered by key.
    pub fn profiles(&self) -> impl Iterator<Item = &Arc<Profile>> {
        self.profiles.values()
    }

    /// All keys, ordered.
    pub fn keys(&self) -> Vec<ProfileKey> {
        self.profiles.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Catalog version string, when the document declares one.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Get store configuration.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

fn read_limited(path: &Path, max_bytes: usize) -> Result<String> {
    let file = std::fs::File::open(path)
        .map_err(|err| EepError::LoadFailed(format!("{}: {err}", path.display())))?;
    let metadata = file
        .metadata()
        .map_err(|err| EepError::LoadFailed(err.to_string()))?;
    if metadata.len() > max_bytes as u64 {
        return Err(EepError::LoadFailed(format!(
            "catalog file too large ({} bytes): {}",
            metadata.len(),
            path.display()
        )));
    }

    let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
    let mut content = String::new();
    file.take(read_limit)
        .read_to_string(&mut content)
        .map_err(|err| EepError::LoadFailed(format!("{}: {err}", path.display())))?;
    if content.len() > max_bytes {
        return Err(EepError::LoadFailed(format!(
            "catalog file too large while reading: {}",
            path.display()
        )));
    }
    Ok(content)
}
