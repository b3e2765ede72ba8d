//! Settings module - account settings overlay, engine config and the settings store.

mod settings_model;
mod settings_service;
mod settings_traits;

#[cfg(test)]
mod settings_service_tests;

pub use settings_model::{
    effective_class, effective_name, AccountSettings, AccountSettingsMap, EngineConfig,
    SignificanceThresholds,
};
pub use settings_service::{
    load_account_settings, load_fx_overrides, save_account_settings, save_fx_overrides,
    set_fx_override, InMemorySettingsStore,
};
pub use settings_traits::{SettingsListener, SettingsStore, SubscriptionId};
