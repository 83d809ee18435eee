use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;

use anx_catalog::LookupPolicy;
use anx_config::{EngineConfig, UnusedKeyPolicy};
use anx_reconcile::{IdMapping, ReconcileOptions};
use anx_schemas::{Category, LegKey, PassengerId, SelectionKey};
use anx_selection::{KeyState, PanelView, SelectionStore, StoreAction};

#[derive(Parser)]
#[command(name = "anx")]
#[command(about = "Ancillary selection and booking reconciliation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> environment -> overrides)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// List catalog options offered for one leg and category
    Candidates {
        /// Service catalog response (JSON)
        #[arg(long)]
        catalog: String,

        /// Flight number of the leg (e.g. FD3435)
        #[arg(long)]
        flight: Option<String>,

        /// SEAT | BAGGAGE | MEAL_BEVERAGE | PRIORITY_BOARDING
        #[arg(long, value_parser = parse_category)]
        category: Category,

        /// Only options that apply to this passenger type (e.g. ADT)
        #[arg(long = "pax-type")]
        pax_type: Option<String>,

        /// Layered config paths in merge order
        #[arg(long = "config")]
        config_paths: Vec<String>,
    },

    /// Apply a session script of store actions and print the resulting panels
    Replay {
        /// JSON list of store actions
        #[arg(long)]
        session: String,

        #[arg(long = "config")]
        config_paths: Vec<String>,
    },

    /// Compare a session's confirmed selections with a held booking
    Reconcile {
        /// JSON list of store actions
        #[arg(long)]
        session: String,

        /// Post-hold booking response (JSON)
        #[arg(long)]
        hold: String,

        /// Leg keys in itinerary order, used to resolve legs by legIndex
        #[arg(long)]
        itinerary: Vec<String>,

        /// Payload paxNumber to store passenger id, e.g. `1=P1` (repeatable)
        #[arg(long = "passenger", value_parser = parse_passenger_mapping)]
        passengers: Vec<(PassengerId, PassengerId)>,

        #[arg(long = "config")]
        config_paths: Vec<String>,

        /// Exit non-zero when any category mismatches or a confirmed
        /// selection is missing from the held booking
        #[arg(long, default_value_t = false)]
        fail_on_mismatch: bool,
    },
}

fn parse_category(raw: &str) -> std::result::Result<Category, String> {
    Category::parse(raw).ok_or_else(|| format!("unknown category: {raw}"))
}

fn parse_passenger_mapping(raw: &str) -> std::result::Result<(PassengerId, PassengerId), String> {
    let (payload, store) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PAX=ID, got {raw:?}"))?;
    let payload = PassengerId::parse(payload).ok_or_else(|| format!("invalid paxNumber: {payload:?}"))?;
    let store = PassengerId::parse(store).ok_or_else(|| format!("invalid passenger id: {store:?}"))?;
    Ok((payload, store))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn main() -> Result<()> {
    // dev convenience; absent file is fine
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = anx_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Candidates {
            catalog,
            flight,
            category,
            pax_type,
            config_paths,
        } => {
            let cfg = load_engine_config(&config_paths)?;
            let raw = read_file(&catalog)?;
            let catalogs = anx_catalog::normalize_json(&raw)
                .with_context(|| format!("invalid service catalog: {catalog}"))?;
            let entries = anx_catalog::Catalog::flatten(&catalogs);

            let policy = LookupPolicy {
                pbod_leg_fallback: cfg.catalog.pbod_leg_fallback,
            };
            let found: Vec<_> = policy
                .candidates_for(&entries, flight.as_deref(), category)
                .into_iter()
                .filter(|e| pax_type.as_deref().map_or(true, |p| e.applies_to(p)))
                .collect();
            tracing::info!(count = found.len(), category = category.as_str(), "candidates");
            print_json(&found)?;
        }

        Commands::Replay {
            session,
            config_paths,
        } => {
            let cfg = load_engine_config(&config_paths)?;
            let actions = read_session(&session)?;
            let keys = touched_keys(&actions);
            let mut store = SelectionStore::with_policy(cfg.selection.none_policy);
            let dropped = store.apply_all(actions);
            if dropped > 0 {
                tracing::warn!(dropped, "session actions with malformed ids were dropped");
            }

            let panels: Vec<PanelLine> = keys
                .into_iter()
                .map(|key| PanelLine {
                    state: store.key_state(&key),
                    panel: store.panel(&key),
                    key,
                })
                .collect();
            print_json(&ReplayOutput { dropped, panels })?;
        }

        Commands::Reconcile {
            session,
            hold,
            itinerary,
            passengers,
            config_paths,
            fail_on_mismatch,
        } => {
            let cfg = load_engine_config(&config_paths)?;
            let mut store = SelectionStore::with_policy(cfg.selection.none_policy);
            store.apply_all(read_session(&session)?);

            let raw = read_file(&hold)?;
            let snapshot = anx_reconcile::normalize_json(&raw)
                .with_context(|| format!("invalid hold response: {hold}"))?;

            let itinerary = itinerary
                .iter()
                .map(|k| LegKey::parse(k).with_context(|| format!("invalid itinerary leg key: {k:?}")))
                .collect::<Result<Vec<_>>>()?;

            let mapping = passengers
                .into_iter()
                .fold(IdMapping::new().with_itinerary(itinerary), |m, (payload, store)| {
                    m.with_passenger(payload, store)
                });

            let opts = ReconcileOptions {
                none_label: cfg.reconcile.none_label.clone(),
                ..ReconcileOptions::default()
            }
            .with_display_names(cfg.reconcile.display_names.clone())
            .with_leg_index_base(cfg.reconcile.leg_index_base);

            let report = anx_reconcile::reconcile_with(&store, &snapshot, &mapping, &opts);
            print_json(&report)?;

            if fail_on_mismatch && !report.is_clean() {
                bail!(
                    "RECONCILE_MISMATCH: {} mismatched categories, {} unchecked confirmed selections",
                    report.mismatches().len(),
                    report.unmatched_confirmed.len()
                );
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct PanelLine {
    key: SelectionKey,
    state: KeyState,
    panel: PanelView,
}

#[derive(Serialize)]
struct ReplayOutput {
    dropped: usize,
    panels: Vec<PanelLine>,
}

fn read_file(path: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {path}"))
}

fn read_session(path: &str) -> Result<Vec<StoreAction>> {
    let raw = read_file(path)?;
    serde_json::from_str(&raw).with_context(|| format!("invalid session script: {path}"))
}

/// Keys addressed by the script, first appearance order, malformed ids skipped.
fn touched_keys(actions: &[StoreAction]) -> Vec<SelectionKey> {
    let mut out: Vec<SelectionKey> = Vec::new();
    for key in actions.iter().filter_map(StoreAction::key) {
        if !out.contains(&key) {
            out.push(key);
        }
    }
    out
}

/// Typed config from layered files; no files means defaults. Unused keys warn.
fn load_engine_config(paths: &[String]) -> Result<EngineConfig> {
    if paths.is_empty() {
        return Ok(EngineConfig::default());
    }
    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    let loaded = anx_config::load_layered_yaml(&path_refs)?;
    anx_config::report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)?;
    tracing::info!(config_hash = %loaded.config_hash, "config loaded");
    loaded.engine()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{s}");
    Ok(())
}
