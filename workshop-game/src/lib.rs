//! Workshop Game Engine
//!
//! Platform-agnostic core for a date-driven incremental workshop game.
//! One logical day passes per real calendar day; randomness is seeded from the
//! date so every player shares the same draws. This crate provides all game
//! mechanics without UI or platform-specific dependencies.

pub mod actions;
pub mod constants;
pub mod content;
pub mod daily;
pub mod data;
pub mod grammar;
pub mod minigame;
pub mod numbers;
pub mod rng;
pub mod schema;
pub mod selector;
pub mod session;
pub mod state;
pub mod storage;

// Re-export commonly used types
pub use actions::{ActionId, ActionOutcome, ActionParams, resolve_action, upgrade_cost};
pub use content::{ContentError, ScenarioTable};
pub use daily::{DailyEventId, DailyReport, DayPhase, check_game_over, run_daily_pass};
pub use data::{Choice, Effects, Scenario};
pub use grammar::{comitative_particle, object_particle};
pub use minigame::{
    CircuitBoard, InputResult, Minigame, MinigameKind, MinigamePhase, MinigameState, Reward,
    SequenceRecall, calculate_reward,
};
pub use rng::{Mulberry32, daily_seed};
pub use schema::{Decoded, LoadError};
pub use selector::{Condition, DecisionTrace, Selection, Weighted, pick_by_roll, pick_or_first};
pub use session::{SessionError, Workshop};
pub use state::{
    Assistant, DailyActions, DailyBonus, GameOverCause, GameState, PendingEvent, ResourceKind,
    Resources, StatKind, StateChanges, Stats, Tool, ToolId, TradeOffer,
};
pub use storage::{FixedClock, MemoryStore, SystemClock};

/// Trait for abstracting save blob storage
/// Platform-specific implementations should provide this
pub trait BlobStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the blob stored under `key`, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Replace the blob stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be written.
    fn write(&self, key: &str, blob: &str) -> Result<(), Self::Error>;

    /// Delete the blob stored under `key`; missing keys are not an error
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be removed.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

/// Trait for abstracting the calendar
/// Hosts decide which date counts as "today"
pub trait Clock {
    fn today(&self) -> chrono::NaiveDate;
}
