use std::fmt;

use clap::ValueEnum;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use workshop_game::constants::{
    PATCH_ENERGY_COST, REPAIR_ENERGY_COST, REPAIR_MATERIALS_COST, SCENARIO_CRAFTING_MENU,
    SCENARIO_EQUIPMENT_FAILURE, SCENARIO_INTRO, SCENARIO_NEW_RECRUIT, SCENARIO_RESOURCE_GATHERING,
    SCENARIO_TOOL_MANAGEMENT, SCENARIO_TRADE_OFFER,
};
use workshop_game::{
    ActionId, Choice, GameState, MinigamePhase, MinigameState, PendingEvent, Resources, ToolId,
    upgrade_cost,
};

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Select one of the offered choices, or `None` to end the day.
    fn pick_choice(&mut self, state: &GameState, choices: &[Choice]) -> Option<usize>;
}

/// Built-in strategies for scripted playtests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum Strategy {
    /// Keeps stats healthy, builds tools when affordable
    Balanced,
    /// Uniformly random choices from a seeded generator
    Random,
}

impl Strategy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Balanced => "Balanced",
            Self::Random => "Random",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy> {
        match self {
            Self::Balanced => Box::new(BalancedPolicy),
            Self::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct BalancedPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        Strategy::Random.label()
    }

    fn pick_choice(&mut self, state: &GameState, choices: &[Choice]) -> Option<usize> {
        if choices.is_empty() || (state.action_points == 0 && !state.in_minigame()) {
            return None;
        }
        Some(self.rng.gen_range(0..choices.len()))
    }
}

fn position(choices: &[Choice], action: ActionId) -> Option<usize> {
    choices
        .iter()
        .position(|choice| choice.action == action.as_str())
}

fn position_where(
    choices: &[Choice],
    action: ActionId,
    matches: impl Fn(&Choice) -> bool,
) -> Option<usize> {
    choices
        .iter()
        .position(|choice| choice.action == action.as_str() && matches(choice))
}

fn repair_cost() -> Resources {
    Resources {
        energy: REPAIR_ENERGY_COST,
        materials: REPAIR_MATERIALS_COST,
        ..Resources::default()
    }
}

fn buildable(state: &GameState, id: ToolId) -> bool {
    let spec = id.spec();
    !state.is_built(id)
        && spec.requires.is_none_or(|required| state.is_built(required))
        && state.resources.covers(&spec.cost)
}

fn needs_repair(state: &GameState, id: ToolId) -> bool {
    state
        .tool(id)
        .is_some_and(|tool| tool.built && tool.durability < 50)
        && state.resources.covers(&repair_cost())
}

fn workshop_chores(state: &GameState) -> bool {
    ToolId::ALL
        .into_iter()
        .any(|id| buildable(state, id) || needs_repair(state, id))
}

/// The input that moves the running minigame towards a solution.
fn minigame_move(game: &MinigameState) -> Option<u32> {
    match game {
        MinigameState::CircuitBoard(board) => board
            .connections
            .iter()
            .zip(&board.solution)
            .position(|(current, wanted)| current != wanted)
            .and_then(|idx| u32::try_from(idx).ok()),
        MinigameState::SequenceRecall(recall) => {
            recall.current_sequence().get(recall.position).copied()
        }
    }
}

impl BalancedPolicy {
    fn minigame(state: &GameState, choices: &[Choice]) -> Option<usize> {
        let Some(game) = &state.minigame_state else {
            return position(choices, ActionId::MinigameQuit);
        };
        if game.game().phase() == MinigamePhase::Presenting {
            return position(choices, ActionId::MinigameReady);
        }
        minigame_move(game)
            .and_then(|value| {
                position_where(choices, ActionId::MinigameInput, |choice| {
                    choice.params.value == Some(value)
                })
            })
            .or_else(|| position(choices, ActionId::MinigameQuit))
    }

    fn pending(state: &GameState, choices: &[Choice]) -> Option<usize> {
        let accept = match &state.pending_event {
            Some(PendingEvent::Recruit { .. }) => state.has_room_for_assistant(),
            Some(PendingEvent::Trade { offer }) => state.resources.covers(&offer.price()),
            Some(PendingEvent::EquipmentFailure { .. }) => {
                state.resources.energy >= PATCH_ENERGY_COST
            }
            None => false,
        };
        let (yes, no) = match state.current_scenario_id.as_str() {
            SCENARIO_NEW_RECRUIT => (ActionId::AcceptRecruit, ActionId::DeclineRecruit),
            SCENARIO_TRADE_OFFER => (ActionId::AcceptTrade, ActionId::DeclineTrade),
            _ => (ActionId::PatchEquipment, ActionId::IgnoreEquipment),
        };
        if accept && state.action_points > 0 {
            position(choices, yes)
        } else {
            position(choices, no)
        }
    }

    fn tools(state: &GameState, choices: &[Choice]) -> Option<usize> {
        let build = position_where(choices, ActionId::BuildTool, |choice| {
            choice.params.tool.is_some_and(|id| buildable(state, id))
        });
        let repair = || {
            position_where(choices, ActionId::MaintainTool, |choice| {
                choice.params.tool.is_some_and(|id| needs_repair(state, id))
            })
        };
        let upgrade = || {
            state
                .resources
                .covers(&upgrade_cost(state.workshop_level))
                .then(|| position(choices, ActionId::UpgradeWorkshop))
                .flatten()
        };
        build
            .or_else(repair)
            .or_else(upgrade)
            .or_else(|| position(choices, ActionId::ReturnToIntro))
    }

    fn gathering(state: &GameState, choices: &[Choice]) -> Option<usize> {
        let resources = state.resources;
        let action = if resources.parts < 20 {
            ActionId::GatherParts
        } else if resources.energy * 2 < resources.materials {
            ActionId::ChargeEnergy
        } else {
            ActionId::ProcessMaterials
        };
        position(choices, action)
    }

    fn crafting(state: &GameState, choices: &[Choice]) -> Option<usize> {
        let action = if state.stats.logic < state.stats.skill {
            ActionId::CraftUselessMachine
        } else {
            ActionId::ModifyDrone
        };
        position(choices, action)
    }

    fn intro(state: &GameState, choices: &[Choice]) -> Option<usize> {
        let stats = &state.stats;
        let action = if !state.daily_actions.minigame_played {
            ActionId::PlayMinigame
        } else if workshop_chores(state) {
            ActionId::ShowToolManagementOptions
        } else if stats.logic < 40 || stats.skill < 40 {
            ActionId::ShowImpromptuCraftingOptions
        } else if stats.efficiency < 40 && !state.daily_actions.reviewed {
            ActionId::ReviewProject
        } else if state.daily_actions.chatted_with.is_empty() {
            ActionId::ChatWithAssistant
        } else if stats.concentration > 60 && !state.daily_actions.tinkered {
            ActionId::Tinker
        } else {
            ActionId::ShowResourceGatheringOptions
        };
        position(choices, action)
    }
}

impl PlayerPolicy for BalancedPolicy {
    fn name(&self) -> &'static str {
        Strategy::Balanced.label()
    }

    fn pick_choice(&mut self, state: &GameState, choices: &[Choice]) -> Option<usize> {
        if state.in_minigame() {
            return Self::minigame(state, choices);
        }
        match state.current_scenario_id.as_str() {
            SCENARIO_NEW_RECRUIT | SCENARIO_TRADE_OFFER | SCENARIO_EQUIPMENT_FAILURE => {
                Self::pending(state, choices)
            }
            _ if state.action_points == 0 => None,
            SCENARIO_TOOL_MANAGEMENT => Self::tools(state, choices),
            SCENARIO_RESOURCE_GATHERING => Self::gathering(state, choices),
            SCENARIO_CRAFTING_MENU => Self::crafting(state, choices),
            SCENARIO_INTRO => Self::intro(state, choices),
            _ => position(choices, ActionId::ReturnToIntro),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use workshop_game::{ResourceKind, ScenarioTable, SequenceRecall, TradeOffer};

    fn fresh() -> GameState {
        GameState::fresh(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap())
    }

    fn picked(state: &GameState) -> Option<String> {
        let choices = ScenarioTable::builtin().choices_for(state);
        BalancedPolicy
            .pick_choice(state, &choices)
            .map(|idx| choices[idx].action.clone())
    }

    #[test]
    fn balanced_starts_with_the_daily_challenge() {
        assert_eq!(picked(&fresh()).as_deref(), Some("play_minigame"));
    }

    #[test]
    fn balanced_solves_sequence_recall() {
        let mut state = fresh();
        state.current_scenario_id = "minigame_sequence_recall".to_string();
        let mut recall = SequenceRecall::with_target(vec![2, 0, 1, 3, 3, 2, 1]);
        state.minigame_state = Some(MinigameState::SequenceRecall(recall.clone()));
        assert_eq!(picked(&state).as_deref(), Some("minigame_ready"));

        recall.phase = MinigamePhase::AwaitingInput;
        recall.position = 1;
        state.minigame_state = Some(MinigameState::SequenceRecall(recall));
        let choices = ScenarioTable::builtin().choices_for(&state);
        let idx = BalancedPolicy.pick_choice(&state, &choices).unwrap();
        assert_eq!(choices[idx].params.value, Some(0));
    }

    #[test]
    fn balanced_declines_trades_it_cannot_pay_for() {
        let mut state = fresh();
        state.current_scenario_id = SCENARIO_TRADE_OFFER.to_string();
        state.pending_event = Some(PendingEvent::Trade {
            offer: TradeOffer {
                give: ResourceKind::Parts,
                give_amount: 500,
                receive: ResourceKind::RareParts,
                receive_amount: 1,
            },
        });
        assert_eq!(picked(&state).as_deref(), Some("decline_trade"));
    }

    #[test]
    fn tired_players_stop_for_the_day() {
        let mut state = fresh();
        state.daily_actions.minigame_played = true;
        state.action_points = 0;
        assert_eq!(picked(&state), None);
        assert_eq!(
            RandomPolicy::new(3).pick_choice(&state, &ScenarioTable::builtin().choices_for(&state)),
            None
        );
    }

    #[test]
    fn random_policy_is_seeded() {
        let state = fresh();
        let choices = ScenarioTable::builtin().choices_for(&state);
        let mut first = Strategy::Random.create_policy(11);
        let mut second = Strategy::Random.create_policy(11);
        for _ in 0..20 {
            assert_eq!(
                first.pick_choice(&state, &choices),
                second.pick_choice(&state, &choices)
            );
        }
        assert_eq!(first.name(), "Random");
    }
}
