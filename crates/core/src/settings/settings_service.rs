//! In-memory settings store and typed accessors for the engine's keys.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

use super::{AccountSettingsMap, SettingsListener, SettingsStore, SubscriptionId};
use crate::constants::{ACCOUNT_SETTINGS_KEY, FX_OVERRIDES_KEY};
use crate::errors::{Error, Result};
use crate::fx::{FxOverride, FxOverridesMap};
use crate::portfolio::ItemKind;

/// Process-local [`SettingsStore`]. Values are lost when it is dropped.
#[derive(Default)]
pub struct InMemorySettingsStore {
    values: RwLock<HashMap<String, String>>,
    listeners: Mutex<Vec<(SubscriptionId, SettingsListener)>>,
    next_id: AtomicU64,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn listeners_snapshot(&self) -> Vec<SettingsListener> {
        match self.listeners.lock() {
            Ok(listeners) => listeners.iter().map(|(_, l)| l.clone()).collect(),
            Err(poisoned) => poisoned
                .into_inner()
                .iter()
                .map(|(_, l)| l.clone())
                .collect(),
        }
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|e| Error::Store(format!("settings lock poisoned: {}", e)))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        {
            let mut values = self
                .values
                .write()
                .map_err(|e| Error::Store(format!("settings lock poisoned: {}", e)))?;
            values.insert(key.to_string(), value.to_string());
        }

        // Listeners run without any lock held so they may read the store
        let listeners = self.listeners_snapshot();
        debug!("Setting '{}' changed, notifying {} listeners", key, listeners.len());
        for listener in listeners {
            listener(key);
        }
        Ok(())
    }

    fn subscribe(&self, listener: SettingsListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        match self.listeners.lock() {
            Ok(mut listeners) => listeners.push((id, listener)),
            Err(poisoned) => poisoned.into_inner().push((id, listener)),
        }
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = match self.listeners.lock() {
            Ok(listeners) => listeners,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}

fn load_json<T>(store: &dyn SettingsStore, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match store.get(key)? {
        Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw).map_err(|e| {
            warn!("Setting '{}' holds malformed JSON: {}", key, e);
            Error::from(e)
        }),
        _ => Ok(T::default()),
    }
}

fn save_json<T: Serialize>(store: &dyn SettingsStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

pub fn load_fx_overrides(store: &dyn SettingsStore) -> Result<FxOverridesMap> {
    load_json(store, FX_OVERRIDES_KEY)
}

pub fn save_fx_overrides(store: &dyn SettingsStore, overrides: &FxOverridesMap) -> Result<()> {
    save_json(store, FX_OVERRIDES_KEY, overrides)
}

/// Sets (or with `None`, clears) the override for one account and item kind.
pub fn set_fx_override(
    store: &dyn SettingsStore,
    account_id: &str,
    kind: ItemKind,
    value: Option<FxOverride>,
) -> Result<()> {
    let mut overrides = load_fx_overrides(store)?;
    let key = kind.override_key(account_id);
    match value {
        Some(fx_override) => {
            overrides.insert(key, fx_override);
        }
        None => {
            if overrides.remove(&key).is_none() {
                return Ok(());
            }
        }
    }
    save_fx_overrides(store, &overrides)
}

pub fn load_account_settings(store: &dyn SettingsStore) -> Result<AccountSettingsMap> {
    load_json(store, ACCOUNT_SETTINGS_KEY)
}

pub fn save_account_settings(store: &dyn SettingsStore, settings: &AccountSettingsMap) -> Result<()> {
    save_json(store, ACCOUNT_SETTINGS_KEY, settings)
}
