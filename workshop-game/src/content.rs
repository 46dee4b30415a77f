//! Scenario content: narrative text and menus keyed by scenario id.
//!
//! The table is plain JSON so writers can extend it without touching game
//! logic. Lookups never fail: unknown ids resolve to the intro screen.

use log::warn;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::actions::{ActionId, ActionParams, upgrade_cost};
use crate::constants::{
    MAX_WORKSHOP_LEVEL, REPAIR_ENERGY_COST, REPAIR_MATERIALS_COST, SCENARIO_INTRO,
    SCENARIO_TOOL_MANAGEMENT, TOOL_DURABILITY_MAX,
};
use crate::data::{Choice, Scenario, ScenarioData};
use crate::minigame::MinigamePhase;
use crate::state::{GameState, PendingEvent, ToolId};

/// Built-in scenario table shipped with the crate.
pub const DEFAULT_SCENARIOS: &str = include_str!("../assets/scenarios.json");

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("scenario table is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scenario table has no `intro` entry")]
    MissingIntro,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioTable {
    intro: Scenario,
    scenarios: BTreeMap<String, Scenario>,
}

impl Default for ScenarioTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ScenarioTable {
    /// Parse a table; it must contain an intro scenario.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError`] when the JSON is malformed or lacks `intro`.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let ScenarioData { mut scenarios } = ScenarioData::from_json(json)?;
        let intro = scenarios
            .remove(SCENARIO_INTRO)
            .ok_or(ContentError::MissingIntro)?;
        Ok(Self { intro, scenarios })
    }

    /// The embedded default table.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_json(DEFAULT_SCENARIOS).unwrap_or_else(|err| {
            warn!("built-in scenario table rejected: {err}");
            Self {
                intro: Scenario {
                    text: String::new(),
                    choices: Vec::new(),
                    is_final: false,
                },
                scenarios: BTreeMap::new(),
            }
        })
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        id == SCENARIO_INTRO || self.scenarios.contains_key(id)
    }

    /// Scenario for `id`, or the intro when the id is unknown.
    #[must_use]
    pub fn resolve(&self, id: &str) -> &Scenario {
        self.scenarios.get(id).unwrap_or(&self.intro)
    }

    #[must_use]
    pub fn is_final(&self, id: &str) -> bool {
        self.resolve(id).is_final
    }

    /// Narrative text for the state's current screen.
    #[must_use]
    pub fn text_for(&self, state: &GameState) -> String {
        if let Some(game) = state.minigame_state.as_ref().filter(|_| state.in_minigame()) {
            return game.game().prompt();
        }
        let text = self.resolve(&state.current_scenario_id).text.clone();
        match &state.pending_event {
            Some(event) if event.scenario() == state.current_scenario_id => {
                format!("{text} {}", describe_pending(event))
            }
            _ => text,
        }
    }

    /// Choices for the state's current screen. Terminal screens offer none.
    #[must_use]
    pub fn choices_for(&self, state: &GameState) -> Vec<Choice> {
        if state.game_over().is_some() || self.is_final(&state.current_scenario_id) {
            return Vec::new();
        }
        if state.in_minigame() {
            return minigame_choices(state);
        }
        if state.current_scenario_id == SCENARIO_TOOL_MANAGEMENT {
            return tool_management_choices(state);
        }
        self.resolve(&state.current_scenario_id).choices.clone()
    }
}

fn describe_pending(event: &PendingEvent) -> String {
    match event {
        PendingEvent::Recruit { assistant } => format!(
            "{} is {}, skilled in {}, with starting trust {}.",
            assistant.name, assistant.personality, assistant.specialty, assistant.reliability
        ),
        PendingEvent::Trade { offer } => format!(
            "They want {} {} for {} {}.",
            offer.give_amount,
            offer.give.label(),
            offer.receive_amount,
            offer.receive.label()
        ),
        PendingEvent::EquipmentFailure { tool } => {
            format!("The {} took a beating.", tool.spec().name)
        }
    }
}

fn tool_management_choices(state: &GameState) -> Vec<Choice> {
    let mut choices = Vec::new();
    for id in ToolId::ALL {
        let spec = id.spec();
        let Some(tool) = state.tool(id) else {
            continue;
        };
        if !tool.built {
            let unlocked = spec.requires.is_none_or(|required| state.is_built(required));
            if unlocked {
                choices.push(
                    Choice::new(
                        format!("Build {} ({})", spec.name, spec.cost.describe()),
                        ActionId::BuildTool.as_str(),
                    )
                    .with_params(ActionParams::tool(id)),
                );
            }
        } else if tool.durability < TOOL_DURABILITY_MAX as i32 {
            choices.push(
                Choice::new(
                    format!(
                        "Repair {} ({}%, energy {REPAIR_ENERGY_COST}, materials {REPAIR_MATERIALS_COST})",
                        tool.name, tool.durability
                    ),
                    ActionId::MaintainTool.as_str(),
                )
                .with_params(ActionParams::tool(id)),
            );
        }
    }
    if state.workshop_level < MAX_WORKSHOP_LEVEL {
        choices.push(Choice::new(
            format!(
                "Upgrade the workshop to level {} ({})",
                state.workshop_level + 1,
                upgrade_cost(state.workshop_level).describe()
            ),
            ActionId::UpgradeWorkshop.as_str(),
        ));
    }
    choices.push(Choice::new("Back", ActionId::ReturnToIntro.as_str()));
    choices
}

fn minigame_choices(state: &GameState) -> Vec<Choice> {
    let mut choices = Vec::new();
    if let Some(game) = &state.minigame_state {
        let game = game.game();
        if game.phase() == MinigamePhase::Presenting {
            choices.push(Choice::new("I'm ready", ActionId::MinigameReady.as_str()));
        }
        for (label, value) in game.inputs() {
            choices.push(
                Choice::new(label, ActionId::MinigameInput.as_str())
                    .with_params(ActionParams::value(value)),
            );
        }
    }
    choices.push(Choice::new("Give up", ActionId::MinigameQuit.as_str()));
    choices
}
