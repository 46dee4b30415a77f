//! A running workshop: state, random source, content and the host seams.
//!
//! Every mutation goes through [`Workshop`], which persists after each change.
//! Opening a session performs the date rollover and the daily pass.

use chrono::NaiveDate;
use log::{debug, info, warn};
use thiserror::Error;

use crate::actions::{ActionId, ActionParams, resolve_action};
use crate::constants::{
    MAX_MANUAL_DAY_ADVANCES, MSG_GAME_OVER, MSG_LOW_ACTION_POINTS, MSG_MANUAL_ADVANCE_LIMIT,
    SCENARIO_INTRO, STORE_KEY,
};
use crate::content::ScenarioTable;
use crate::daily::{DailyReport, run_daily_pass};
use crate::data::{Choice, Scenario};
use crate::rng::Mulberry32;
use crate::schema;
use crate::state::{GameState, StateChanges};
use crate::{BlobStore, Clock};

#[derive(Debug, Error)]
pub enum SessionError<E>
where
    E: std::error::Error + 'static,
{
    #[error("save storage failed: {0}")]
    Storage(#[source] E),
    #[error("could not encode save data: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One player's workshop bound to a store and a clock.
pub struct Workshop<S, C>
where
    S: BlobStore,
    C: Clock,
{
    state: GameState,
    rng: Mulberry32,
    content: ScenarioTable,
    store: S,
    clock: C,
    last_message: String,
    last_report: Option<DailyReport>,
}

impl<S, C> Workshop<S, C>
where
    S: BlobStore,
    C: Clock,
{
    /// Open the saved workshop with the built-in scenario table.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn open(store: S, clock: C) -> Result<Self, SessionError<S::Error>> {
        Self::with_content(store, clock, ScenarioTable::builtin())
    }

    /// Open the saved workshop against a custom scenario table.
    ///
    /// A missing blob starts a fresh game; an unreadable one is discarded
    /// with a warning. The state is written back only when loading changed
    /// it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn with_content(
        store: S,
        clock: C,
        content: ScenarioTable,
    ) -> Result<Self, SessionError<S::Error>> {
        let today = clock.today();
        let (state, dirty) = match store.read(STORE_KEY).map_err(SessionError::Storage)? {
            None => {
                info!("no saved workshop found, starting fresh");
                (GameState::fresh(today), true)
            }
            Some(blob) => match schema::decode_with_report(&blob) {
                Ok(decoded) => {
                    let migrated = decoded.was_migrated();
                    (decoded.state, migrated)
                }
                Err(err) => {
                    warn!("discarding unreadable save: {err}");
                    (GameState::fresh(today), true)
                }
            },
        };

        let rng = Mulberry32::for_day(today, state.day);
        let mut workshop = Self {
            state,
            rng,
            content,
            store,
            clock,
            last_message: String::new(),
            last_report: None,
        };
        let mut dirty = dirty | workshop.normalize_scenario();

        if workshop.state.last_played_date != today {
            info!(
                "calendar moved from {} to {today}, starting day {}",
                workshop.state.last_played_date,
                workshop.state.day.saturating_add(1)
            );
            workshop.state.begin_calendar_day(today);
            dirty = true;
        }
        dirty |= workshop.run_daily(today);

        if dirty {
            workshop.persist()?;
        }
        Ok(workshop)
    }

    /// Unknown scenario ids and orphaned minigame screens fall back to the intro.
    fn normalize_scenario(&mut self) -> bool {
        let id = &self.state.current_scenario_id;
        let orphaned = self.state.in_minigame() && self.state.minigame_state.is_none();
        if self.content.contains(id) && !orphaned {
            return false;
        }
        debug!("scenario `{id}` cannot be shown, returning to intro");
        self.state.current_scenario_id = SCENARIO_INTRO.to_string();
        true
    }

    fn run_daily(&mut self, today: NaiveDate) -> bool {
        let report = run_daily_pass(&mut self.state, &mut self.rng, today);
        let ran = report.ran();
        if ran {
            self.last_message = report.summary();
        }
        self.last_report = Some(report);
        ran
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn content(&self) -> &ScenarioTable {
        &self.content
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The scenario currently on screen.
    #[must_use]
    pub fn scenario(&self) -> &Scenario {
        self.content.resolve(&self.state.current_scenario_id)
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.content.text_for(&self.state)
    }

    #[must_use]
    pub fn choices(&self) -> Vec<Choice> {
        self.content.choices_for(&self.state)
    }

    #[must_use]
    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    /// Report from the most recent daily pass attempt, if any.
    #[must_use]
    pub const fn last_report(&self) -> Option<&DailyReport> {
        self.last_report.as_ref()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.game_over().is_some()
    }

    /// Dispatch an action by its wire name, as stored in scenario choices.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting state cannot be saved.
    pub fn dispatch_named(
        &mut self,
        name: &str,
        params: ActionParams,
    ) -> Result<String, SessionError<S::Error>> {
        match resolve_action(name, params) {
            Some((action, params)) => self.dispatch(action, &params),
            None => {
                debug!("ignoring unknown action `{name}`");
                Ok(self.note(format!("Nothing happens. (`{name}` is not an action.)")))
            }
        }
    }

    /// Run one player action: check the terminal state and action points,
    /// resolve the handler, apply its changes and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting state cannot be saved.
    pub fn dispatch(
        &mut self,
        action: ActionId,
        params: &ActionParams,
    ) -> Result<String, SessionError<S::Error>> {
        if self.is_game_over() {
            return Ok(self.note(MSG_GAME_OVER));
        }
        let Some(handler) = action.handler() else {
            return self.advance_day();
        };
        let cost = action.cost();
        if cost > 0 && !self.state.spend_action_points(cost) {
            return Ok(self.note(MSG_LOW_ACTION_POINTS));
        }

        debug!(
            "dispatching {action} | day {} ap {}",
            self.state.day, self.state.action_points
        );
        let outcome = handler(&self.state, &mut self.rng, params);
        self.commit(outcome.changes, outcome.message)
    }

    /// Skip to the next logical day without waiting for the calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting state cannot be saved.
    pub fn advance_day(&mut self) -> Result<String, SessionError<S::Error>> {
        if self.is_game_over() {
            return Ok(self.note(MSG_GAME_OVER));
        }
        if self.state.manual_day_advances >= MAX_MANUAL_DAY_ADVANCES {
            return Ok(self.note(MSG_MANUAL_ADVANCE_LIMIT));
        }
        self.state.manual_day_advances += 1;
        self.state.day = self.state.day.saturating_add(1);
        self.state.daily_event_triggered = false;
        info!(
            "manual advance {}/{MAX_MANUAL_DAY_ADVANCES} to day {}",
            self.state.manual_day_advances, self.state.day
        );

        let today = self.clock.today();
        self.run_daily(today);
        self.persist()?;
        Ok(self.last_message.clone())
    }

    /// Delete the save and start over as of today.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be cleared or written.
    pub fn reset(&mut self) -> Result<String, SessionError<S::Error>> {
        self.store.remove(STORE_KEY).map_err(SessionError::Storage)?;
        let today = self.clock.today();
        info!("resetting workshop as of {today}");
        self.state = GameState::fresh(today);
        self.rng = Mulberry32::for_day(today, self.state.day);
        self.run_daily(today);
        self.persist()?;
        Ok(self.last_message.clone())
    }

    /// Apply a change set, persist, and record `message` as the latest result.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting state cannot be saved.
    pub fn commit(
        &mut self,
        changes: StateChanges,
        message: impl Into<String>,
    ) -> Result<String, SessionError<S::Error>> {
        self.state.apply_changes(changes);
        self.state.backfill();
        self.persist()?;
        Ok(self.note(message))
    }

    fn persist(&self) -> Result<(), SessionError<S::Error>> {
        let blob = schema::encode(&self.state)?;
        self.store
            .write(STORE_KEY, &blob)
            .map_err(SessionError::Storage)
    }

    fn note(&mut self, message: impl Into<String>) -> String {
        self.last_message = message.into();
        self.last_message.clone()
    }
}
