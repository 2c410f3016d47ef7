#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use crate::settings_overlay::journal::OverrideJournal;
    use crate::settings_overlay::override_engine::OverrideEngine;
    use crate::settings_overlay::store_iface::ConfigStore;
    use crate::settings_overlay::test_fixtures::{
        memory_store, overlay_config, FlakyStore, EXT_SCHEMA, JOURNAL_KEY, MUTTER, MUTTER_KEYBINDINGS,
    };
    use crate::settings_overlay::typed_value::TypedValue;

    fn engine_on(store: Arc<dyn ConfigStore>) -> OverrideEngine {
        OverrideEngine::from_config(store, &overlay_config())
    }

    fn persisted_journal(store: &dyn ConfigStore) -> OverrideJournal {
        match store.get(EXT_SCHEMA, JOURNAL_KEY).unwrap() {
            TypedValue::String(text) => OverrideJournal::decode(&text).unwrap(),
            other => panic!("journal key holds {:?}", other),
        }
    }

    #[test]
    fn example_enabled_scenario() {
        let store = memory_store();
        let mut engine = engine_on(store.clone());

        assert_eq!(engine.override_setting("example", "enabled", true.into()), Some(TypedValue::Boolean(false)));
        assert_eq!(store.get("example", "enabled").unwrap(), TypedValue::Boolean(true));
        assert_eq!(engine.original_value("example", "enabled"), Some(&TypedValue::Boolean(false)));
        assert_eq!(
            store.get(EXT_SCHEMA, JOURNAL_KEY).unwrap(),
            TypedValue::String(r#"{"example":{"enabled":"false"}}"#.into())
        );

        // The intermediate `true` must not become the original.
        assert_eq!(engine.override_setting("example", "enabled", false.into()), Some(TypedValue::Boolean(false)));
        assert_eq!(store.get("example", "enabled").unwrap(), TypedValue::Boolean(false));

        assert_eq!(engine.restore_key("example", "enabled"), Some(TypedValue::Boolean(false)));
        assert_eq!(store.get("example", "enabled").unwrap(), TypedValue::Boolean(false));
        assert!(engine.journal().is_empty());
        assert!(persisted_journal(store.as_ref()).is_empty());
    }

    #[test]
    fn repeated_overrides_restore_pre_first_value() {
        let store = memory_store();
        let mut engine = engine_on(store.clone());
        let original = TypedValue::StringList(vec!["<Super>Left".into()]);

        engine.override_setting(MUTTER_KEYBINDINGS, "toggle-tiled-left", TypedValue::StringList(vec![]));
        let previous = engine.override_setting(
            MUTTER_KEYBINDINGS,
            "toggle-tiled-left",
            TypedValue::StringList(vec!["<Super>h".into()]),
        );
        assert_eq!(previous, Some(original.clone()));
        assert_eq!(engine.journal().len(), 1);

        assert_eq!(engine.restore_key(MUTTER_KEYBINDINGS, "toggle-tiled-left"), Some(original.clone()));
        assert_eq!(store.get(MUTTER_KEYBINDINGS, "toggle-tiled-left").unwrap(), original);
    }

    #[test]
    fn second_restore_is_a_no_op() {
        let store = memory_store();
        let mut engine = engine_on(store.clone());
        engine.override_setting(MUTTER, "edge-tiling", false.into());

        assert!(engine.restore_key(MUTTER, "edge-tiling").is_some());
        store.set(MUTTER, "edge-tiling", &TypedValue::Boolean(false));
        assert_eq!(engine.restore_key(MUTTER, "edge-tiling"), None);
        assert_eq!(store.get(MUTTER, "edge-tiling").unwrap(), TypedValue::Boolean(false));
    }

    #[test]
    fn rejected_write_leaves_journal_untouched() {
        let store = memory_store();
        let mut engine = engine_on(store.clone());

        assert_eq!(engine.override_setting(MUTTER, "edge-tiling", TypedValue::Int32(1)), None);
        assert_eq!(
            engine.override_setting(MUTTER, "experimental-features", TypedValue::StringList(vec![])),
            None
        );
        assert_eq!(engine.override_setting("org.nowhere", "x", true.into()), None);
        assert!(engine.journal().is_empty());
        assert!(store.is_default(EXT_SCHEMA, JOURNAL_KEY));
    }

    #[test]
    fn journal_key_cannot_be_overridden() {
        let store = memory_store();
        let mut engine = engine_on(store.clone());
        assert_eq!(engine.override_setting(EXT_SCHEMA, JOURNAL_KEY, "{}".into()), None);
        assert!(!engine.is_overridden(EXT_SCHEMA, JOURNAL_KEY));
    }

    #[test]
    fn failed_restore_keeps_entry_for_retry() {
        let flaky = Arc::new(FlakyStore::new(memory_store()));
        let mut engine = engine_on(flaky.clone());
        engine.override_setting(MUTTER, "edge-tiling", false.into());

        flaky.reject_writes(MUTTER, "edge-tiling");
        assert_eq!(engine.restore_key(MUTTER, "edge-tiling"), None);
        assert!(engine.is_overridden(MUTTER, "edge-tiling"));

        flaky.accept_writes(MUTTER, "edge-tiling");
        assert_eq!(engine.restore_key(MUTTER, "edge-tiling"), Some(TypedValue::Boolean(true)));
        assert!(!engine.is_overridden(MUTTER, "edge-tiling"));
    }

    #[test]
    fn unpersisted_journal_undoes_the_override() {
        let flaky = Arc::new(FlakyStore::new(memory_store()));
        flaky.reject_writes(EXT_SCHEMA, JOURNAL_KEY);
        let mut engine = engine_on(flaky.clone());

        assert_eq!(engine.override_setting(MUTTER, "edge-tiling", false.into()), None);
        assert_eq!(flaky.get(MUTTER, "edge-tiling").unwrap(), TypedValue::Boolean(true));
        assert!(engine.journal().is_empty());

        let restarted = engine_on(flaky.clone());
        assert!(restarted.journal().is_empty());
        assert_eq!(flaky.get(MUTTER, "edge-tiling").unwrap(), TypedValue::Boolean(true));
        assert!(flaky.inner.is_default(EXT_SCHEMA, JOURNAL_KEY));

        flaky.accept_writes(EXT_SCHEMA, JOURNAL_KEY);
        assert_eq!(engine.override_setting(MUTTER, "edge-tiling", false.into()), Some(TypedValue::Boolean(true)));
        assert_eq!(persisted_journal(flaky.as_ref()).get(MUTTER, "edge-tiling"), Some(&TypedValue::Boolean(true)));
    }

    #[test]
    fn journal_survives_a_restart() {
        let store = memory_store();
        {
            let mut engine = engine_on(store.clone());
            engine.override_setting(MUTTER, "edge-tiling", false.into());
            engine.override_setting(MUTTER_KEYBINDINGS, "toggle-tiled-right", TypedValue::StringList(vec![]));
        }

        let mut engine = engine_on(store.clone());
        assert_eq!(engine.journal().len(), 2);
        assert_eq!(engine.original_value(MUTTER, "edge-tiling"), Some(&TypedValue::Boolean(true)));

        let summary = engine.restore_all();
        assert!(summary.is_complete());
        assert_eq!(summary.restored.len(), 2);
        assert_eq!(store.get(MUTTER, "edge-tiling").unwrap(), TypedValue::Boolean(true));
        assert_eq!(
            store.get(MUTTER_KEYBINDINGS, "toggle-tiled-right").unwrap(),
            TypedValue::StringList(vec!["<Super>Right".into()])
        );
    }

    #[test]
    fn malformed_persisted_journal_starts_empty() {
        let store = memory_store();
        store.set(EXT_SCHEMA, JOURNAL_KEY, &TypedValue::String("{broken".into()));
        let engine = engine_on(store.clone());
        assert!(engine.journal().is_empty());
    }

    #[test]
    fn missing_journal_key_starts_empty() {
        let store = memory_store();
        let engine = OverrideEngine::new(store, EXT_SCHEMA, "no-such-key");
        assert!(engine.journal().is_empty());
    }

    #[test]
    fn restore_all_persists_once_and_retains_failures() {
        let flaky = Arc::new(FlakyStore::new(memory_store()));
        let mut engine = engine_on(flaky.clone());
        engine.override_setting(MUTTER, "edge-tiling", false.into());
        engine.override_setting(MUTTER_KEYBINDINGS, "toggle-tiled-left", TypedValue::StringList(vec![]));
        engine.override_setting(MUTTER_KEYBINDINGS, "toggle-tiled-right", TypedValue::StringList(vec![]));
        assert_eq!(flaky.journal_writes(), 3);

        flaky.reject_writes(MUTTER_KEYBINDINGS, "toggle-tiled-left");
        let summary = engine.restore_all();
        assert_eq!(flaky.journal_writes(), 4);
        assert_eq!(summary.retained, vec![(MUTTER_KEYBINDINGS.to_string(), "toggle-tiled-left".to_string())]);
        assert_eq!(summary.restored.len(), 2);

        let persisted = persisted_journal(flaky.as_ref());
        assert_eq!(&persisted, engine.journal());
        assert!(persisted.contains(MUTTER_KEYBINDINGS, "toggle-tiled-left"));
    }

    #[test]
    fn restore_all_twice_matches_once() {
        let store = memory_store();
        let mut engine = engine_on(store.clone());
        engine.override_setting(MUTTER, "edge-tiling", false.into());
        engine.override_setting("example", "enabled", true.into());

        engine.restore_all();
        let after_first = store.dump_namespace("/").unwrap();
        let second = engine.restore_all();
        assert_eq!(second, Default::default());
        assert_eq!(store.dump_namespace("/").unwrap(), after_first);
    }

    #[test]
    fn journal_round_trips_through_store() {
        let store = memory_store();
        let mut engine = engine_on(store.clone());
        engine.override_setting(MUTTER, "edge-tiling", false.into());
        engine.override_setting(EXT_SCHEMA, "inner-gaps", TypedValue::UInt32(0));
        engine.override_setting(EXT_SCHEMA, "excluded-applications", TypedValue::StringList(vec!["a'b".into()]));

        let reloaded = engine_on(store.clone());
        assert_eq!(reloaded.journal(), engine.journal());
    }
}
