//! Typed engine configuration.

use std::collections::BTreeMap;

use anx_selection::NonePolicy;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub selection: SelectionSection,
    pub catalog: CatalogSection,
    pub reconcile: ReconcileSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSection {
    /// How an explicit "none" write interacts with the draft layer.
    pub none_policy: NonePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    /// Offer PBOD options whose flight number does not match the leg.
    pub pbod_leg_fallback: bool,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            pbod_leg_fallback: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileSection {
    pub none_label: String,
    /// Per-code display names; take precedence over built-in names.
    pub display_names: BTreeMap<String, String>,
    /// `legIndex` of the first itinerary leg in hold payloads: 0 or 1.
    pub leg_index_base: i64,
}

impl Default for ReconcileSection {
    fn default() -> Self {
        Self {
            none_label: "-".to_string(),
            display_names: BTreeMap::new(),
            leg_index_base: 0,
        }
    }
}

impl EngineConfig {
    /// Read the typed view out of a merged config document. Sections and keys
    /// that are absent take their defaults; a present key of the wrong type is
    /// an error.
    pub fn from_config_json(config_json: &Value) -> Result<Self> {
        if config_json.is_null() {
            return Ok(Self::default());
        }
        let cfg: Self =
            serde_json::from_value(config_json.clone()).context("invalid engine configuration")?;
        if !matches!(cfg.reconcile.leg_index_base, 0 | 1) {
            bail!(
                "invalid engine configuration: reconcile.leg_index_base must be 0 or 1, got {}",
                cfg.reconcile.leg_index_base
            );
        }
        Ok(cfg)
    }
}
