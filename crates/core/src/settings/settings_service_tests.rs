#[cfg(test)]
mod tests {
    use crate::accounts::{AccountClass, AccountKind};
    use crate::constants::FX_OVERRIDES_KEY;
    use crate::fx::{FxFamily, FxOverride, FxSide};
    use crate::portfolio::ItemKind;
    use crate::settings::{
        effective_class, effective_name, load_account_settings, load_fx_overrides,
        save_account_settings, set_fx_override, AccountSettings, AccountSettingsMap, EngineConfig,
        InMemorySettingsStore, SettingsStore,
    };
    use crate::test_fixtures::account;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    // ==================== Store Tests ====================

    #[test]
    fn test_get_returns_none_for_unknown_key() {
        let store = InMemorySettingsStore::new();
        assert_eq!(store.get("missing").unwrap(), None);

        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme").unwrap(), Some("dark".to_string()));
    }

    #[test]
    fn test_listeners_receive_changed_key_until_unsubscribed() {
        let store = InMemorySettingsStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let id = store.subscribe(Arc::new(move |key: &str| {
            sink.lock().unwrap().push(key.to_string());
        }));

        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set("c", "3").unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_listener_can_read_store_during_notification() {
        let store = Arc::new(InMemorySettingsStore::new());
        let reader = store.clone();
        let observed = Arc::new(Mutex::new(None));
        let slot = observed.clone();
        store.subscribe(Arc::new(move |key: &str| {
            *slot.lock().unwrap() = reader.get(key).unwrap();
        }));

        store.set("k", "v").unwrap();

        assert_eq!(*observed.lock().unwrap(), Some("v".to_string()));
    }

    // ==================== Typed Accessor Tests ====================

    #[test]
    fn test_fx_override_set_and_clear() {
        let store = InMemorySettingsStore::new();
        assert!(load_fx_overrides(&store).unwrap().is_empty());

        let mep_buy = FxOverride {
            family: FxFamily::Mep,
            side: FxSide::Buy,
        };
        set_fx_override(&store, "acc-1", ItemKind::CashUsd, Some(mep_buy)).unwrap();

        let overrides = load_fx_overrides(&store).unwrap();
        assert_eq!(overrides.get("acc-1:cash_usd"), Some(&mep_buy));

        set_fx_override(&store, "acc-1", ItemKind::CashUsd, None).unwrap();
        assert!(load_fx_overrides(&store).unwrap().is_empty());
    }

    #[test]
    fn test_fx_overrides_wire_format() {
        let store = InMemorySettingsStore::new();
        store
            .set(
                FX_OVERRIDES_KEY,
                r#"{"w1:cash_ars":{"family":"CRIPTO","side":"sell"}}"#,
            )
            .unwrap();

        let overrides = load_fx_overrides(&store).unwrap();
        assert_eq!(overrides["w1:cash_ars"].family, FxFamily::Cripto);
        assert_eq!(overrides["w1:cash_ars"].side, FxSide::Sell);
    }

    #[test]
    fn test_malformed_override_json_is_an_error() {
        let store = InMemorySettingsStore::new();
        store.set(FX_OVERRIDES_KEY, "{not json").unwrap();
        assert!(load_fx_overrides(&store).is_err());
    }

    #[test]
    fn test_account_settings_round_trip_through_store() {
        let store = InMemorySettingsStore::new();
        let mut settings = AccountSettingsMap::new();
        settings.insert(
            "w1".to_string(),
            AccountSettings {
                display_name: Some("Ahorros".to_string()),
                rubro_override: Some(AccountClass::Frasco),
                tna_override: Some(dec!(38)),
            },
        );

        save_account_settings(&store, &settings).unwrap();

        assert_eq!(load_account_settings(&store).unwrap(), settings);
    }

    // ==================== Model Tests ====================

    #[test]
    fn test_effective_class_honours_override() {
        let wallet = account("w1", AccountKind::Bank);
        assert_eq!(effective_class(&wallet, None), AccountClass::Wallet);

        let jar = AccountSettings {
            rubro_override: Some(AccountClass::Frasco),
            ..Default::default()
        };
        assert_eq!(effective_class(&wallet, Some(&jar)), AccountClass::Frasco);
    }

    #[test]
    fn test_effective_name_ignores_blank_override() {
        let broker = account("b1", AccountKind::Broker);
        let blank = AccountSettings {
            display_name: Some("  ".to_string()),
            ..Default::default()
        };
        let renamed = AccountSettings {
            display_name: Some("IOL".to_string()),
            ..Default::default()
        };

        assert_eq!(effective_name(&broker, Some(&blank)), "Account b1");
        assert_eq!(effective_name(&broker, Some(&renamed)), "IOL");
    }

    #[test]
    fn test_engine_config_defaults_and_partial_json() {
        let defaults = EngineConfig::default();
        assert_eq!(defaults.thresholds.min_cash_ars, dec!(1));
        assert_eq!(defaults.thresholds.min_cash_usd_qty, dec!(0.01));
        assert_eq!(defaults.upstream_drift_pct, dec!(1));

        let partial: EngineConfig = serde_json::from_str(r#"{"upstreamDriftPct": 5}"#).unwrap();
        assert_eq!(partial.upstream_drift_pct, dec!(5));
        assert_eq!(partial.thresholds, defaults.thresholds);
    }
}
