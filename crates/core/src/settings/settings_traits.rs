//! Key-value store trait for persisted user settings.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::Result;

/// Callback invoked with the key that changed.
pub type SettingsListener = Arc<dyn Fn(&str) + Send + Sync>;

/// Handle returned by [`SettingsStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

/// Store holding user settings such as FX overrides and account settings.
///
/// The engine never reads a store directly; callers load plain maps from it
/// and pass them in.
pub trait SettingsStore: Send + Sync {
    /// Raw value for `key`, if set.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key` and notifies every listener.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn subscribe(&self, listener: SettingsListener) -> SubscriptionId;

    /// Returns false if `id` was not subscribed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
