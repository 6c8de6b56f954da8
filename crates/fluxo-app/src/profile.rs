//! # Business Profile
//!
//! The "Meu perfil" screen data, persisted through an injected key-value
//! store instead of global browser storage.
//!
//! ```text
//! ProfileStore<K> ── save(profile) ──► serde_json ──► K::set("fluxo.profile", json)
//!                 ◄─ load() ───────── serde_json ◄── K::get("fluxo.profile")
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use fluxo_core::document::{format_cpf_or_cnpj, format_phone, Document};
use fluxo_core::ValidationError;

use crate::error::{AppError, AppResult};

/// Key under which the profile is stored.
pub const PROFILE_KEY: &str = "fluxo.profile";

// =============================================================================
// Key-Value Store
// =============================================================================

/// Synchronous string key-value collaborator (browser storage, a file, ...).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: String) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}

/// In-memory `KeyValueStore`. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| AppError::Store("key-value store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> AppResult<()> {
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

// =============================================================================
// Business Profile
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    pub business_name: String,
    #[serde(default)]
    pub owner_name: String,
    /// CPF/CNPJ, stored masked.
    #[serde(default)]
    pub document: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Phone, stored masked.
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
}

impl BusinessProfile {
    /// Checks the profile and returns it with document and phone masked.
    pub fn normalized(mut self) -> AppResult<Self> {
        self.business_name = self.business_name.trim().to_string();
        if self.business_name.is_empty() {
            return Err(ValidationError::Required {
                field: "nomeEmpresa".to_string(),
            }
            .into());
        }

        if !self.document.trim().is_empty() {
            let document = Document::parse(&self.document)?;
            if !document.has_valid_check_digits() {
                return Err(ValidationError::InvalidFormat {
                    field: "documento".to_string(),
                    reason: "check digits do not match".to_string(),
                }
                .into());
            }
            self.document = format_cpf_or_cnpj(document.digits());
        }

        self.phone = self
            .phone
            .as_deref()
            .map(format_phone)
            .filter(|p| !p.is_empty());

        Ok(self)
    }
}

// =============================================================================
// Profile Store
// =============================================================================

/// Reads and writes the [`BusinessProfile`] through a [`KeyValueStore`].
pub struct ProfileStore<K> {
    kv: K,
}

impl<K: KeyValueStore> ProfileStore<K> {
    pub fn new(kv: K) -> Self {
        ProfileStore { kv }
    }

    /// The saved profile, or `None` if nothing usable is stored.
    ///
    /// A corrupt entry is logged and treated as absent.
    pub fn load(&self) -> AppResult<Option<BusinessProfile>> {
        let Some(json) = self.kv.get(PROFILE_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str(&json) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable business profile");
                Ok(None)
            }
        }
    }

    /// Validates, masks and stores `profile`, returning what was stored.
    pub fn save(&self, profile: BusinessProfile) -> AppResult<BusinessProfile> {
        let profile = profile.normalized()?;
        self.kv.set(PROFILE_KEY, serde_json::to_string(&profile)?)?;
        debug!(business = %profile.business_name, "Business profile saved");
        Ok(profile)
    }

    pub fn clear(&self) -> AppResult<()> {
        self.kv.remove(PROFILE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxo_core::CoreError;

    fn profile() -> BusinessProfile {
        BusinessProfile {
            business_name: "  Padaria Central ".to_string(),
            owner_name: "Maria".to_string(),
            document: "11222333000181".to_string(),
            email: Some("contato@padaria.com.br".to_string()),
            phone: Some("11987654321".to_string()),
            sector: None,
        }
    }

    #[test]
    fn test_save_and_load() {
        let kv = MemoryKeyValueStore::new();
        let store = ProfileStore::new(kv.clone());
        assert_eq!(store.load().unwrap(), None);

        let saved = store.save(profile()).unwrap();
        assert_eq!(saved.business_name, "Padaria Central");
        assert_eq!(saved.document, "11.222.333/0001-81");
        assert_eq!(saved.phone.as_deref(), Some("(11) 98765-4321"));

        assert_eq!(store.load().unwrap(), Some(saved));
        assert!(kv.get(PROFILE_KEY).unwrap().is_some());

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_rejects_bad_document() {
        let store = ProfileStore::new(MemoryKeyValueStore::new());
        let mut bad = profile();
        bad.document = "11222333000100".to_string();

        let err = store.save(bad).unwrap_err();
        assert!(matches!(
            err,
            AppError::Core(CoreError::Validation(ValidationError::InvalidFormat { .. }))
        ));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_requires_business_name() {
        let store = ProfileStore::new(MemoryKeyValueStore::new());
        let mut empty = profile();
        empty.business_name = " ".to_string();
        assert!(store.save(empty).is_err());
    }

    #[test]
    fn test_corrupt_entry_is_ignored() {
        let kv = MemoryKeyValueStore::new();
        kv.set(PROFILE_KEY, "{not json".to_string()).unwrap();
        let store = ProfileStore::new(kv);
        assert_eq!(store.load().unwrap(), None);
    }
}
