//! Typed engine configuration
//!
//! GREEN when:
//! - No layers at all gives the default engine configuration.
//! - An overlay switching the none policy is reflected in the typed view
//!   while untouched sections keep their defaults.

use anx_config::{load_layered_yaml_from_strings, EngineConfig};
use anx_selection::NonePolicy;

#[test]
fn no_layers_is_default() {
    let loaded = load_layered_yaml_from_strings(&[]).unwrap();
    assert_eq!(loaded.canonical_json, "{}");
    assert_eq!(loaded.engine().unwrap(), EngineConfig::default());
}

#[test]
fn overlay_switches_policy_only() {
    let loaded = load_layered_yaml_from_strings(&[
        "catalog:\n  pbod_leg_fallback: false\n",
        "selection:\n  none_policy: collapse_redundant\n",
    ])
    .unwrap();
    let cfg = loaded.engine().unwrap();
    assert_eq!(cfg.selection.none_policy, NonePolicy::CollapseRedundant);
    assert!(!cfg.catalog.pbod_leg_fallback);
    assert_eq!(cfg.reconcile.none_label, "-");
    assert!(cfg.reconcile.display_names.is_empty());
}
