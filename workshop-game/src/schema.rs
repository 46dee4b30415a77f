//! Save-blob decoding and the additive migration chain.
//!
//! Blobs carry a `schemaVersion` (absent means version 0). Each migration
//! step only inserts missing keys, so data written by older or newer code
//! paths is never dropped; unknown keys ride along in `GameState::extra`.

use log::{debug, info};
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::constants::{SCHEMA_VERSION, STARTING_MAX_ASSISTANTS};
use crate::state::{DailyActions, DailyBonus, GameState, Tool, ToolId};

const VERSION_KEY: &str = "schemaVersion";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("save data is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("save data must be a JSON object")]
    NotAnObject,
    #[error("save data has an unreadable schema version")]
    InvalidVersion,
    #[error("save data has schema version {found}, newer than supported version {supported}")]
    FutureVersion { found: u64, supported: u32 },
}

/// A decoded state plus the version it was stored at.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub state: GameState,
    pub stored_version: u32,
}

impl Decoded {
    #[must_use]
    pub const fn was_migrated(&self) -> bool {
        self.stored_version < SCHEMA_VERSION
    }
}

type Migration = fn(&mut Map<String, Value>);

/// `MIGRATIONS[n]` upgrades a version-`n` blob to version `n + 1`.
const MIGRATIONS: [Migration; SCHEMA_VERSION as usize] = [v0_to_v1, v1_to_v2];

fn insert_missing(map: &mut Map<String, Value>, key: &str, value: impl FnOnce() -> Value) {
    if !map.contains_key(key) {
        debug!("backfilling `{key}`");
        map.insert(key.to_string(), value());
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn v0_to_v1(map: &mut Map<String, Value>) {
    insert_missing(map, "dailyBonus", || to_value(&DailyBonus::default()));
    insert_missing(map, "tools", || Value::Object(Map::new()));
    if let Some(Value::Object(tools)) = map.get_mut("tools") {
        for id in ToolId::ALL {
            if !tools.contains_key(id.key()) {
                tools.insert(id.key().to_string(), to_value(&Tool::unbuilt(id)));
            }
        }
    }
}

fn v1_to_v2(map: &mut Map<String, Value>) {
    let legacy_level = map.get("masteryLevel").cloned();
    insert_missing(map, "workshopLevel", || legacy_level.unwrap_or_else(|| json!(0)));
    insert_missing(map, "pendingEvent", || Value::Null);
    insert_missing(map, "dailyActions", || to_value(&DailyActions::default()));
    insert_missing(map, "maxAssistants", || json!(STARTING_MAX_ASSISTANTS));
    insert_missing(map, "manualDayAdvances", || json!(0));

    let minigame = map.get("minigameState").cloned().unwrap_or(Value::Null);
    map.insert("minigameState".to_string(), upgrade_minigame(minigame));
}

/// Older saves stored the circuit puzzle untagged, or `{}` when idle.
fn upgrade_minigame(value: Value) -> Value {
    let Value::Object(mut fields) = value else {
        return Value::Null;
    };
    if fields.contains_key("kind") {
        return Value::Object(fields);
    }
    let is_circuit = fields.get("connections").is_some_and(Value::is_array)
        && fields.get("solution").is_some_and(Value::is_array);
    if !is_circuit {
        return Value::Null;
    }
    fields.insert("kind".to_string(), json!("circuit_board"));
    insert_missing(&mut fields, "phase", || json!("awaiting_input"));
    insert_missing(&mut fields, "score", || json!(0));
    Value::Object(fields)
}

fn stored_version(map: &Map<String, Value>) -> Result<u32, LoadError> {
    let Some(raw) = map.get(VERSION_KEY) else {
        return Ok(0);
    };
    let version = raw.as_u64().ok_or(LoadError::InvalidVersion)?;
    if version > u64::from(SCHEMA_VERSION) {
        return Err(LoadError::FutureVersion {
            found: version,
            supported: SCHEMA_VERSION,
        });
    }
    u32::try_from(version).map_err(|_| LoadError::InvalidVersion)
}

/// Run every migration from `from` up to the current version.
pub fn migrate(map: &mut Map<String, Value>, from: u32) {
    for (version, step) in MIGRATIONS.iter().enumerate().skip(from as usize) {
        debug!("migrating save data from schema v{version}");
        step(map);
    }
    map.insert(VERSION_KEY.to_string(), json!(SCHEMA_VERSION));
}

/// Decode a blob, reporting the version it was stored at.
///
/// # Errors
///
/// Returns [`LoadError`] if the blob is not a JSON object, carries a future
/// or unreadable schema version, or has a field of the wrong shape.
pub fn decode_with_report(blob: &str) -> Result<Decoded, LoadError> {
    let value: Value = serde_json::from_str(blob)?;
    let Value::Object(mut map) = value else {
        return Err(LoadError::NotAnObject);
    };
    let stored_version = stored_version(&map)?;
    if stored_version < SCHEMA_VERSION {
        info!("upgrading save data from schema v{stored_version} to v{SCHEMA_VERSION}");
    }
    migrate(&mut map, stored_version);

    let mut state: GameState = serde_json::from_value(Value::Object(map))?;
    state.backfill();
    Ok(Decoded {
        state,
        stored_version,
    })
}

/// Decode a blob into the current schema.
///
/// # Errors
///
/// See [`decode_with_report`].
pub fn decode(blob: &str) -> Result<GameState, LoadError> {
    decode_with_report(blob).map(|decoded| decoded.state)
}

/// Serialize a state for storage.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(state: &GameState) -> Result<String, serde_json::Error> {
    serde_json::to_string(state)
}
