//! Player actions.
//!
//! Every action is a handler `fn(&GameState, &mut Mulberry32, &ActionParams)`
//! returning the changes to commit and a message for the player. Handlers
//! never mutate the state directly; the session spends action points, runs
//! the handler and applies its [`StateChanges`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    DRONE_BASE_CHANCE, MAX_WORKSHOP_LEVEL, MSG_INSUFFICIENT_RESOURCES, MSG_NOTHING_PENDING,
    PATCH_DURABILITY_RESTORE, PATCH_ENERGY_COST, REPAIR_ENERGY_COST, REPAIR_MATERIALS_COST,
    SCENARIO_CRAFTING_MENU, SCENARIO_INTRO, SCENARIO_RESOURCE_GATHERING, SCENARIO_TOOL_MANAGEMENT,
    UPGRADE_ENERGY_STEP, UPGRADE_MATERIALS_STEP, USELESS_MACHINE_RARE_CHANCE,
};
use crate::data::Effects;
use crate::minigame::{InputResult, MinigameKind, MinigameState, calculate_reward};
use crate::rng::Mulberry32;
use crate::selector::{Condition, Weighted, pick_or_first};
use crate::state::{
    Assistant, GameState, PendingEvent, ResourceKind, Resources, StatKind, StateChanges, ToolId,
};

/// Optional arguments carried by a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<ToolId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
}

impl ActionParams {
    #[must_use]
    pub const fn tool(tool: ToolId) -> Self {
        Self {
            tool: Some(tool),
            value: None,
        }
    }

    #[must_use]
    pub const fn value(value: u32) -> Self {
        Self {
            tool: None,
            value: Some(value),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tool.is_none() && self.value.is_none()
    }
}

/// Result of running a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub changes: StateChanges,
    pub message: String,
}

impl ActionOutcome {
    #[must_use]
    pub fn new(changes: StateChanges, message: impl Into<String>) -> Self {
        Self {
            changes,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message_only(message: impl Into<String>) -> Self {
        Self::new(StateChanges::none(), message)
    }
}

pub type Handler = fn(&GameState, &mut Mulberry32, &ActionParams) -> ActionOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionId {
    Tinker,
    ChatWithAssistant,
    ReviewProject,
    GatherParts,
    ProcessMaterials,
    ChargeEnergy,
    CraftUselessMachine,
    ModifyDrone,
    BuildTool,
    MaintainTool,
    UpgradeWorkshop,
    ShowResourceGatheringOptions,
    ShowToolManagementOptions,
    ShowImpromptuCraftingOptions,
    ReturnToIntro,
    AcceptRecruit,
    DeclineRecruit,
    AcceptTrade,
    DeclineTrade,
    PatchEquipment,
    IgnoreEquipment,
    PlayMinigame,
    MinigameReady,
    MinigameInput,
    MinigameQuit,
    AdvanceDay,
}

impl ActionId {
    pub const ALL: [Self; 26] = [
        Self::Tinker,
        Self::ChatWithAssistant,
        Self::ReviewProject,
        Self::GatherParts,
        Self::ProcessMaterials,
        Self::ChargeEnergy,
        Self::CraftUselessMachine,
        Self::ModifyDrone,
        Self::BuildTool,
        Self::MaintainTool,
        Self::UpgradeWorkshop,
        Self::ShowResourceGatheringOptions,
        Self::ShowToolManagementOptions,
        Self::ShowImpromptuCraftingOptions,
        Self::ReturnToIntro,
        Self::AcceptRecruit,
        Self::DeclineRecruit,
        Self::AcceptTrade,
        Self::DeclineTrade,
        Self::PatchEquipment,
        Self::IgnoreEquipment,
        Self::PlayMinigame,
        Self::MinigameReady,
        Self::MinigameInput,
        Self::MinigameQuit,
        Self::AdvanceDay,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tinker => "tinker",
            Self::ChatWithAssistant => "chat_with_assistant",
            Self::ReviewProject => "review_project",
            Self::GatherParts => "gather_parts",
            Self::ProcessMaterials => "process_materials",
            Self::ChargeEnergy => "charge_energy",
            Self::CraftUselessMachine => "craft_useless_machine",
            Self::ModifyDrone => "modify_drone",
            Self::BuildTool => "build_tool",
            Self::MaintainTool => "maintain_tool",
            Self::UpgradeWorkshop => "upgrade_workshop",
            Self::ShowResourceGatheringOptions => "show_resource_gathering_options",
            Self::ShowToolManagementOptions => "show_tool_management_options",
            Self::ShowImpromptuCraftingOptions => "show_impromptu_crafting_options",
            Self::ReturnToIntro => "return_to_intro",
            Self::AcceptRecruit => "accept_recruit",
            Self::DeclineRecruit => "decline_recruit",
            Self::AcceptTrade => "accept_trade",
            Self::DeclineTrade => "decline_trade",
            Self::PatchEquipment => "patch_equipment",
            Self::IgnoreEquipment => "ignore_equipment",
            Self::PlayMinigame => "play_minigame",
            Self::MinigameReady => "minigame_ready",
            Self::MinigameInput => "minigame_input",
            Self::MinigameQuit => "minigame_quit",
            Self::AdvanceDay => "advance_day",
        }
    }

    /// Action points consumed before the handler runs.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::ShowResourceGatheringOptions
            | Self::ShowToolManagementOptions
            | Self::ShowImpromptuCraftingOptions
            | Self::ReturnToIntro
            | Self::DeclineRecruit
            | Self::DeclineTrade
            | Self::IgnoreEquipment
            | Self::MinigameReady
            | Self::MinigameInput
            | Self::MinigameQuit
            | Self::AdvanceDay => 0,
            _ => 1,
        }
    }

    /// Dispatch table. `None` for day control, which the session owns.
    #[must_use]
    pub fn handler(self) -> Option<Handler> {
        let handler: Handler = match self {
            Self::Tinker => tinker,
            Self::ChatWithAssistant => chat_with_assistant,
            Self::ReviewProject => review_project,
            Self::GatherParts => gather_parts,
            Self::ProcessMaterials => process_materials,
            Self::ChargeEnergy => charge_energy,
            Self::CraftUselessMachine => craft_useless_machine,
            Self::ModifyDrone => modify_drone,
            Self::BuildTool => build_tool,
            Self::MaintainTool => maintain_tool,
            Self::UpgradeWorkshop => upgrade_workshop,
            Self::ShowResourceGatheringOptions => show_resource_gathering_options,
            Self::ShowToolManagementOptions => show_tool_management_options,
            Self::ShowImpromptuCraftingOptions => show_impromptu_crafting_options,
            Self::ReturnToIntro => return_to_intro,
            Self::AcceptRecruit => accept_recruit,
            Self::DeclineRecruit => decline_recruit,
            Self::AcceptTrade => accept_trade,
            Self::DeclineTrade => decline_trade,
            Self::PatchEquipment => patch_equipment,
            Self::IgnoreEquipment => ignore_equipment,
            Self::PlayMinigame => play_minigame,
            Self::MinigameReady => minigame_ready,
            Self::MinigameInput => minigame_input,
            Self::MinigameQuit => minigame_quit,
            Self::AdvanceDay => return None,
        };
        Some(handler)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "manualNextDay" {
            return Ok(Self::AdvanceDay);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or(())
    }
}

/// Map an action name to its id, accepting the per-tool `build_<tool>` spelling.
#[must_use]
pub fn resolve_action(name: &str, params: ActionParams) -> Option<(ActionId, ActionParams)> {
    if let Ok(id) = name.parse::<ActionId>() {
        return Some((id, params));
    }
    let tool = name.strip_prefix("build_")?.parse::<ToolId>().ok()?;
    Some((
        ActionId::BuildTool,
        ActionParams {
            tool: Some(tool),
            ..params
        },
    ))
}

/// Materials and energy needed to raise the workshop from `level`.
#[must_use]
pub const fn upgrade_cost(level: u32) -> Resources {
    let step = level as i32 + 1;
    Resources {
        parts: 0,
        materials: UPGRADE_MATERIALS_STEP * step,
        energy: UPGRADE_ENERGY_STEP * step,
        rare_parts: 0,
    }
}

fn negate(cost: &Resources) -> Effects {
    ResourceKind::ALL
        .iter()
        .fold(Effects::default(), |effects, kind| {
            effects.plus(Effects::resource(*kind, -cost.get(*kind)))
        })
}

// Randomized outcome tables -------------------------------------------------

type Resolve = fn(&GameState, Option<&Assistant>, &mut Mulberry32) -> ActionOutcome;

struct Outcome {
    id: &'static str,
    weight: u32,
    condition: Condition,
    resolve: Resolve,
}

impl Weighted for Outcome {
    fn weight(&self) -> u32 {
        self.weight
    }

    fn label(&self) -> &str {
        self.id
    }
}

fn stat_gain(kind: StatKind, delta: i32, message: &str) -> ActionOutcome {
    ActionOutcome::new(
        StateChanges::from_effects(Effects::stat(kind, delta)),
        format!("{message} ({kind} {delta:+})"),
    )
}

static TINKER_OUTCOMES: [Outcome; 4] = [
    Outcome {
        id: "tinker.new_technique",
        weight: 30,
        condition: Condition::StatAbove(StatKind::Concentration, 60),
        resolve: |_, _, rng| {
            let v = rng.roll_around(10, 5);
            stat_gain(StatKind::Skill, v, "Poking around the workshop, you polished a new technique!")
        },
    },
    Outcome {
        id: "tinker.improvised_fix",
        weight: 25,
        condition: Condition::Always,
        resolve: |_, _, rng| {
            let v = rng.roll_around(5, 2);
            stat_gain(StatKind::Adaptation, v, "You worked through an unexpected problem.")
        },
    },
    Outcome {
        id: "tinker.lost_parts",
        weight: 20,
        condition: Condition::Always,
        resolve: |_, _, rng| {
            let v = rng.roll_around(5, 2);
            ActionOutcome::new(
                StateChanges::from_effects(Effects::resource(ResourceKind::Parts, -v)),
                format!("You misplaced some parts. (parts -{v})"),
            )
        },
    },
    Outcome {
        id: "tinker.distracted",
        weight: 15,
        condition: Condition::StatBelow(StatKind::Concentration, 40),
        resolve: |_, _, rng| {
            let v = rng.roll_around(5, 2);
            stat_gain(StatKind::Efficiency, -v, "Your focus drifts and your work slows down.")
        },
    },
];

static CHAT_OUTCOMES: [Outcome; 3] = [
    Outcome {
        id: "chat.rapport",
        weight: 40,
        condition: Condition::TrustBelow(80),
        resolve: |_, assistant, rng| {
            let v = rng.roll_around(10, 5);
            let (id, name) = assistant.map_or(("", ""), |a| (a.id.as_str(), a.name.as_str()));
            ActionOutcome::new(
                StateChanges::none().with_trust(id, v),
                format!("A practical talk with {name} built some trust. (trust +{v})"),
            )
        },
    },
    Outcome {
        id: "chat.insight",
        weight: 30,
        condition: Condition::Always,
        resolve: |_, assistant, rng| {
            let v = rng.roll_around(5, 2);
            let name = assistant.map_or("your assistant", |a| a.name.as_str());
            stat_gain(StatKind::Logic, v, &format!("{name} gave you a lead on the problem."))
        },
    },
    Outcome {
        id: "chat.complaint",
        weight: 20,
        condition: Condition::StatBelow(StatKind::Efficiency, 40),
        resolve: |_, assistant, rng| {
            let v = rng.roll_around(10, 3);
            let (id, name) = assistant.map_or(("", ""), |a| (a.id.as_str(), a.name.as_str()));
            ActionOutcome::new(
                StateChanges::none().with_trust(id, -v),
                format!("{name} grumbles about your muddled instructions. (trust -{v})"),
            )
        },
    },
];

static REVIEW_OUTCOMES: [Outcome; 3] = [
    Outcome {
        id: "review.logic_gap",
        weight: 40,
        condition: Condition::StatAbove(StatKind::Logic, 60),
        resolve: |_, _, rng| {
            let v = rng.roll_around(10, 3);
            stat_gain(StatKind::Efficiency, v, "You found a logical gap in the project and streamlined it.")
        },
    },
    Outcome {
        id: "review.new_skill",
        weight: 30,
        condition: Condition::Always,
        resolve: |_, _, rng| {
            let v = rng.roll_around(10, 3);
            stat_gain(StatKind::Skill, v, "Reviewing the project taught you something new.")
        },
    },
    Outcome {
        id: "review.missed_detail",
        weight: 20,
        condition: Condition::StatBelow(StatKind::Concentration, 40),
        resolve: |_, _, rng| {
            let v = rng.roll_around(10, 4);
            stat_gain(StatKind::Adaptation, -v, "You lost focus and missed a crucial part of the project.")
        },
    },
];

fn run_table(
    pool_id: &str,
    table: &[Outcome],
    state: &GameState,
    assistant: Option<&Assistant>,
    rng: &mut Mulberry32,
) -> ActionOutcome {
    match pick_or_first(
        pool_id,
        table,
        |outcome| outcome.condition.evaluate(state, assistant),
        rng,
    ) {
        Some(selection) => (selection.entry.resolve)(state, assistant, rng),
        None => ActionOutcome::message_only("Nothing happens."),
    }
}

// Randomized actions --------------------------------------------------------

fn tinker(state: &GameState, rng: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    let mut outcome = run_table("actions.tinker", &TINKER_OUTCOMES, state, None, rng);
    let mut daily = state.daily_actions.clone();
    daily.tinkered = true;
    outcome.changes = outcome.changes.with_daily_actions(daily);
    outcome
}

fn chat_with_assistant(state: &GameState, rng: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    let Some(assistant) = rng
        .index(state.assistants.len())
        .and_then(|idx| state.assistants.get(idx))
    else {
        return ActionOutcome::message_only("There is nobody around to talk to.");
    };
    let mut outcome = run_table("actions.chat", &CHAT_OUTCOMES, state, Some(assistant), rng);
    let mut daily = state.daily_actions.clone();
    if !daily.chatted_with.contains(&assistant.id) {
        daily.chatted_with.push(assistant.id.clone());
    }
    outcome.changes = outcome.changes.with_daily_actions(daily);
    outcome
}

fn review_project(state: &GameState, rng: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    let mut outcome = run_table("actions.review", &REVIEW_OUTCOMES, state, None, rng);
    let mut daily = state.daily_actions.clone();
    daily.reviewed = true;
    outcome.changes = outcome.changes.with_daily_actions(daily);
    outcome
}

// Gathering -----------------------------------------------------------------

fn gather(
    state: &GameState,
    rng: &mut Mulberry32,
    kind: ResourceKind,
    (base, variance): (i32, i32),
    verb: &str,
) -> ActionOutcome {
    if !rng.chance(state.gather_chance()) {
        return ActionOutcome::message_only(format!("You tried to {verb}, but came back empty-handed."));
    }
    let gain = rng.roll_around(base, variance);
    ActionOutcome::new(
        StateChanges::from_effects(Effects::resource(kind, gain)),
        format!("You managed to {verb}. ({} +{gain})", kind.label()),
    )
}

fn gather_parts(state: &GameState, rng: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    gather(state, rng, ResourceKind::Parts, (10, 4), "scavenge some parts")
}

fn process_materials(state: &GameState, rng: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    gather(state, rng, ResourceKind::Materials, (10, 4), "process a batch of materials")
}

fn charge_energy(state: &GameState, rng: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    gather(state, rng, ResourceKind::Energy, (5, 2), "charge the energy cells")
}

// Impromptu crafting --------------------------------------------------------

fn craft_useless_machine(_: &GameState, rng: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    if rng.next_unit() < USELESS_MACHINE_RARE_CHANCE {
        let v = rng.roll_around(1, 1);
        return ActionOutcome::new(
            StateChanges::from_effects(Effects::resource(ResourceKind::RareParts, v)),
            format!("Your useless machine turned up a rare part after all! (rare parts +{v})"),
        );
    }
    let v = rng.roll_around(10, 5);
    stat_gain(
        StatKind::Logic,
        v,
        "Building a useless machine taught you something about paradoxes.",
    )
}

fn modify_drone(state: &GameState, rng: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    if rng.next_unit() < state.success_chance(DRONE_BASE_CHANCE) {
        let v = rng.roll_around(10, 5);
        return stat_gain(StatKind::Skill, v, "The drone modification worked.");
    }
    ActionOutcome::message_only("The drone exploded. It was fun, though.")
}

// Construction and upkeep ---------------------------------------------------

fn build_tool(state: &GameState, rng: &mut Mulberry32, params: &ActionParams) -> ActionOutcome {
    let Some(id) = params.tool else {
        return ActionOutcome::message_only("Choose a tool to build.");
    };
    let Some(tool) = state.tool(id) else {
        return ActionOutcome::message_only("That tool does not exist.");
    };
    let spec = id.spec();
    if tool.built {
        return ActionOutcome::message_only(format!("The {} is already built.", spec.name));
    }
    if let Some(required) = spec.requires.filter(|required| !state.is_built(*required)) {
        return ActionOutcome::message_only(format!(
            "The {} needs a {} first.",
            spec.name,
            required.spec().name
        ));
    }
    if !state.resources.covers(&spec.cost) {
        return ActionOutcome::message_only(MSG_INSUFFICIENT_RESOURCES);
    }

    let bonus = rng.roll_around(spec.bonus_base, spec.bonus_variance);
    let mut built = tool.clone();
    built.construct();
    ActionOutcome::new(
        StateChanges::from_effects(negate(&spec.cost))
            .with_effects(Effects::stat(spec.bonus_stat, bonus))
            .with_tool(id, built),
        format!("You set up the {}! ({} {bonus:+})", spec.name, spec.bonus_stat),
    )
}

fn maintain_tool(state: &GameState, _: &mut Mulberry32, params: &ActionParams) -> ActionOutcome {
    let Some((id, tool)) = params.tool.and_then(|id| state.tool(id).map(|tool| (id, tool))) else {
        return ActionOutcome::message_only("Choose a tool to repair.");
    };
    if !tool.built {
        return ActionOutcome::message_only(format!(
            "The {} has to be built before it can be repaired.",
            tool.name
        ));
    }
    let cost = Resources {
        energy: REPAIR_ENERGY_COST,
        materials: REPAIR_MATERIALS_COST,
        ..Resources::default()
    };
    if !state.resources.covers(&cost) {
        return ActionOutcome::message_only(MSG_INSUFFICIENT_RESOURCES);
    }
    let mut repaired = tool.clone();
    repaired.repair();
    ActionOutcome::new(
        StateChanges::from_effects(negate(&cost)).with_tool(id, repaired),
        format!("You repaired the {}.", tool.name),
    )
}

fn upgrade_workshop(state: &GameState, _: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    if state.workshop_level >= MAX_WORKSHOP_LEVEL {
        return ActionOutcome::message_only("The workshop cannot be improved any further.");
    }
    let cost = upgrade_cost(state.workshop_level);
    if !state.resources.covers(&cost) {
        return ActionOutcome::message_only(MSG_INSUFFICIENT_RESOURCES);
    }
    let level = state.workshop_level + 1;
    ActionOutcome::new(
        StateChanges::from_effects(negate(&cost)).with_workshop_level(level),
        format!("The workshop is now level {level}. Your odds of success improve."),
    )
}

// Navigation ----------------------------------------------------------------

fn navigate(scenario: &str) -> ActionOutcome {
    ActionOutcome::new(StateChanges::none().with_scenario(scenario), String::new())
}

fn show_resource_gathering_options(_: &GameState, _: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    navigate(SCENARIO_RESOURCE_GATHERING)
}

fn show_tool_management_options(_: &GameState, _: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    navigate(SCENARIO_TOOL_MANAGEMENT)
}

fn show_impromptu_crafting_options(_: &GameState, _: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    navigate(SCENARIO_CRAFTING_MENU)
}

fn return_to_intro(_: &GameState, _: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    navigate(SCENARIO_INTRO)
}

// Pending events ------------------------------------------------------------

fn settle(changes: StateChanges) -> StateChanges {
    changes.with_pending_event(None).with_scenario(SCENARIO_INTRO)
}

fn nothing_pending() -> ActionOutcome {
    ActionOutcome::new(StateChanges::none().with_scenario(SCENARIO_INTRO), MSG_NOTHING_PENDING)
}

fn accept_recruit(state: &GameState, _: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    let Some(PendingEvent::Recruit { assistant }) = &state.pending_event else {
        return nothing_pending();
    };
    if !state.has_room_for_assistant() {
        return ActionOutcome::new(
            settle(StateChanges::none()),
            format!("There is no room for {} in the workshop.", assistant.name),
        );
    }
    let mut roster = state.assistants.clone();
    roster.push(assistant.clone());
    ActionOutcome::new(
        settle(StateChanges::none().with_assistants(roster)),
        format!(
            "{} the {} joins the workshop as your {} specialist.",
            assistant.name, assistant.personality, assistant.specialty
        ),
    )
}

fn decline_recruit(state: &GameState, _: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    match &state.pending_event {
        Some(PendingEvent::Recruit { assistant }) => ActionOutcome::new(
            settle(StateChanges::none()),
            format!("You politely turn {} away.", assistant.name),
        ),
        _ => nothing_pending(),
    }
}

fn accept_trade(state: &GameState, _: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    let Some(PendingEvent::Trade { offer }) = &state.pending_event else {
        return nothing_pending();
    };
    if !state.resources.covers(&offer.price()) {
        return ActionOutcome::message_only(MSG_INSUFFICIENT_RESOURCES);
    }
    let effects = Effects::resource(offer.give, -offer.give_amount)
        .plus(Effects::resource(offer.receive, offer.receive_amount));
    ActionOutcome::new(
        settle(StateChanges::from_effects(effects)),
        format!("Deal done. ({})", effects.describe()),
    )
}

fn decline_trade(state: &GameState, _: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    match &state.pending_event {
        Some(PendingEvent::Trade { .. }) => {
            ActionOutcome::new(settle(StateChanges::none()), "The dealer shrugs and moves on.")
        }
        _ => nothing_pending(),
    }
}

fn patch_equipment(state: &GameState, _: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    let Some(PendingEvent::EquipmentFailure { tool: id }) = &state.pending_event else {
        return nothing_pending();
    };
    if state.resources.energy < PATCH_ENERGY_COST {
        return ActionOutcome::message_only(MSG_INSUFFICIENT_RESOURCES);
    }
    let mut changes = StateChanges::from_effects(Effects::resource(ResourceKind::Energy, -PATCH_ENERGY_COST));
    let name = id.spec().name;
    if let Some(tool) = state.tool(*id).filter(|tool| tool.built) {
        let mut patched = tool.clone();
        patched.restore(PATCH_DURABILITY_RESTORE);
        changes = changes.with_tool(*id, patched);
    }
    ActionOutcome::new(settle(changes), format!("You patched up the {name}."))
}

fn ignore_equipment(state: &GameState, _: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    match &state.pending_event {
        Some(PendingEvent::EquipmentFailure { tool }) => ActionOutcome::new(
            settle(StateChanges::none()),
            format!("You leave the {} rattling for another day.", tool.spec().name),
        ),
        _ => nothing_pending(),
    }
}

// Minigames -----------------------------------------------------------------

fn no_minigame() -> ActionOutcome {
    ActionOutcome::new(
        StateChanges::none().with_scenario(SCENARIO_INTRO),
        "No challenge is in progress.",
    )
}

fn finish_minigame(game: &MinigameState) -> ActionOutcome {
    let reward = calculate_reward(game.game().kind(), game.game().score());
    ActionOutcome::new(
        StateChanges::from_effects(reward.effects)
            .with_minigame(None)
            .with_scenario(SCENARIO_INTRO),
        reward.message,
    )
}

fn play_minigame(state: &GameState, rng: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    if state.daily_actions.minigame_played {
        return ActionOutcome::message_only("You already took on today's challenge.");
    }
    let kind = MinigameKind::pick(rng);
    let game = kind.start(rng);
    let prompt = game.game().prompt();
    let mut daily = state.daily_actions.clone();
    daily.minigame_played = true;
    ActionOutcome::new(
        StateChanges::none()
            .with_daily_actions(daily)
            .with_minigame(Some(game))
            .with_scenario(&kind.scenario_id()),
        format!("{}: {prompt}", kind.title()),
    )
}

fn minigame_ready(state: &GameState, _: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    let Some(mut game) = state.minigame_state.clone() else {
        return no_minigame();
    };
    if !game.game_mut().ready() {
        return ActionOutcome::message_only(game.game().prompt());
    }
    let prompt = game.game().prompt();
    ActionOutcome::new(StateChanges::none().with_minigame(Some(game)), prompt)
}

fn minigame_input(state: &GameState, _: &mut Mulberry32, params: &ActionParams) -> ActionOutcome {
    let Some(mut game) = state.minigame_state.clone() else {
        return no_minigame();
    };
    let Some(value) = params.value else {
        return ActionOutcome::message_only("Pick an input first.");
    };
    match game.game_mut().input(value) {
        InputResult::Rejected => ActionOutcome::message_only("That input does not fit right now."),
        InputResult::Finished => finish_minigame(&game),
        InputResult::Continue => {
            let prompt = game.game().prompt();
            ActionOutcome::new(StateChanges::none().with_minigame(Some(game)), prompt)
        }
    }
}

fn minigame_quit(state: &GameState, _: &mut Mulberry32, _: &ActionParams) -> ActionOutcome {
    state
        .minigame_state
        .as_ref()
        .map_or_else(no_minigame, finish_minigame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fresh() -> GameState {
        GameState::fresh(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap())
    }

    fn run(action: ActionId, state: &GameState, params: ActionParams, seed: u32) -> ActionOutcome {
        let handler = action.handler().unwrap();
        handler(state, &mut Mulberry32::new(seed), &params)
    }

    #[test]
    fn action_ids_roundtrip_and_accept_legacy_names() {
        for action in ActionId::ALL {
            assert_eq!(action.as_str().parse::<ActionId>(), Ok(action));
        }
        assert_eq!("manualNextDay".parse::<ActionId>(), Ok(ActionId::AdvanceDay));
        assert!("dance".parse::<ActionId>().is_err());

        let (id, params) = resolve_action("build_cncMachine", ActionParams::default()).unwrap();
        assert_eq!(id, ActionId::BuildTool);
        assert_eq!(params.tool, Some(ToolId::CncMachine));
        assert!(resolve_action("build_rocket", ActionParams::default()).is_none());
    }

    #[test]
    fn navigation_and_declines_are_free() {
        assert_eq!(ActionId::ReturnToIntro.cost(), 0);
        assert_eq!(ActionId::DeclineTrade.cost(), 0);
        assert_eq!(ActionId::MinigameInput.cost(), 0);
        assert_eq!(ActionId::Tinker.cost(), 1);
        assert_eq!(ActionId::BuildTool.cost(), 1);
        assert!(ActionId::AdvanceDay.handler().is_none());
    }

    #[test]
    fn tinker_respects_concentration_conditions() {
        let mut state = fresh();
        state.stats.concentration = 50;
        for seed in 0..200 {
            let outcome = run(ActionId::Tinker, &state, ActionParams::default(), seed);
            let effects = outcome.changes.effects;
            assert_eq!(effects.skill, 0, "skill outcome needs concentration > 60");
            assert_eq!(effects.efficiency, 0, "efficiency loss needs concentration < 40");
            assert!(outcome.changes.daily_actions.unwrap().tinkered);
        }
    }

    #[test]
    fn chat_records_assistant_and_adjusts_trust() {
        let state = fresh();
        let outcome = run(ActionId::ChatWithAssistant, &state, ActionParams::default(), 9);
        let daily = outcome.changes.daily_actions.clone().unwrap();
        assert_eq!(daily.chatted_with.len(), 1);
        assert!(state.assistant(&daily.chatted_with[0]).is_some());
        for (id, delta) in &outcome.changes.trust {
            assert_eq!(id, &daily.chatted_with[0]);
            assert!(*delta > 0, "complaints need efficiency below 40");
        }

        let mut empty = fresh();
        empty.assistants.clear();
        let outcome = run(ActionId::ChatWithAssistant, &empty, ActionParams::default(), 9);
        assert!(outcome.changes.is_empty());
    }

    #[test]
    fn gathering_chance_rises_with_level() {
        let mut novice_hits = 0;
        let mut expert_hits = 0;
        let novice = fresh();
        let mut expert = fresh();
        expert.workshop_level = 4;
        for seed in 0..400 {
            if run(ActionId::GatherParts, &novice, ActionParams::default(), seed).changes.effects.parts > 0 {
                novice_hits += 1;
            }
            if run(ActionId::GatherParts, &expert, ActionParams::default(), seed).changes.effects.parts > 0 {
                expert_hits += 1;
            }
        }
        assert!(expert_hits >= novice_hits);
        assert!(novice_hits > 200 && novice_hits < 400);
    }

    #[test]
    fn build_tool_with_exact_resources() {
        let mut state = fresh();
        state.resources.materials = 50;
        state.resources.energy = 20;
        let outcome = run(ActionId::BuildTool, &state, ActionParams::tool(ToolId::Toolbox), 1);
        state.apply_changes(outcome.changes);

        let toolbox = state.tool(ToolId::Toolbox).unwrap();
        assert!(toolbox.built);
        assert_eq!(toolbox.durability, 100);
        assert_eq!(state.resources.materials, 0);
        assert_eq!(state.resources.energy, 0);
        assert!((57..=63).contains(&state.stats.skill));
    }

    #[test]
    fn build_tool_rejects_short_resources_and_missing_prerequisite() {
        let mut state = fresh();
        state.resources.materials = 49;
        state.resources.energy = 20;
        let outcome = run(ActionId::BuildTool, &state, ActionParams::tool(ToolId::Toolbox), 1);
        assert!(outcome.changes.is_empty());
        assert_eq!(outcome.message, MSG_INSUFFICIENT_RESOURCES);

        state.resources.energy = 500;
        state.resources.rare_parts = 10;
        let outcome = run(ActionId::BuildTool, &state, ActionParams::tool(ToolId::CncMachine), 1);
        assert!(outcome.changes.is_empty());
        assert!(outcome.message.contains("Workbench"));
    }

    #[test]
    fn repair_requires_a_built_tool() {
        let mut state = fresh();
        state.resources.energy = 50;
        state.resources.materials = 50;
        let outcome = run(ActionId::MaintainTool, &state, ActionParams::tool(ToolId::Workbench), 1);
        assert!(outcome.changes.is_empty());

        if let Some(tool) = state.tools.get_mut(&ToolId::Workbench) {
            tool.construct();
            tool.durability = 35;
        }
        let outcome = run(ActionId::MaintainTool, &state, ActionParams::tool(ToolId::Workbench), 1);
        state.apply_changes(outcome.changes);
        assert_eq!(state.tool(ToolId::Workbench).unwrap().durability, 100);
        assert_eq!(state.resources.energy, 40);
        assert_eq!(state.resources.materials, 40);
    }

    #[test]
    fn upgrade_costs_scale_with_level() {
        assert_eq!(upgrade_cost(0).materials, 40);
        assert_eq!(upgrade_cost(2).energy, 60);

        let mut state = fresh();
        state.resources.materials = 40;
        state.resources.energy = 20;
        let outcome = run(ActionId::UpgradeWorkshop, &state, ActionParams::default(), 1);
        state.apply_changes(outcome.changes);
        assert_eq!(state.workshop_level, 1);
        assert_eq!(state.resources.materials, 0);

        let outcome = run(ActionId::UpgradeWorkshop, &state, ActionParams::default(), 1);
        assert_eq!(outcome.message, MSG_INSUFFICIENT_RESOURCES);
    }

    #[test]
    fn recruit_and_trade_responses_clear_the_pending_event() {
        let mut state = fresh();
        state.pending_event = Some(PendingEvent::Recruit {
            assistant: Assistant::new("ada", "Ada", "meticulous", "programming", 40),
        });
        let outcome = run(ActionId::AcceptRecruit, &state, ActionParams::default(), 1);
        state.apply_changes(outcome.changes);
        assert_eq!(state.assistants.len(), 3);
        assert!(state.pending_event.is_none());
        assert_eq!(state.current_scenario_id, SCENARIO_INTRO);

        state.pending_event = Some(PendingEvent::Trade {
            offer: crate::state::TradeOffer {
                give: ResourceKind::Energy,
                give_amount: 5,
                receive: ResourceKind::Materials,
                receive_amount: 12,
            },
        });
        let outcome = run(ActionId::AcceptTrade, &state, ActionParams::default(), 1);
        state.apply_changes(outcome.changes);
        assert_eq!(state.resources.energy, 0);
        assert_eq!(state.resources.materials, 22);
        assert!(state.pending_event.is_none());

        let outcome = run(ActionId::DeclineTrade, &state, ActionParams::default(), 1);
        assert_eq!(outcome.message, MSG_NOTHING_PENDING);
    }

    #[test]
    fn minigame_runs_once_per_day_and_pays_out() {
        let mut state = fresh();
        let outcome = run(ActionId::PlayMinigame, &state, ActionParams::default(), 5);
        state.apply_changes(outcome.changes);
        assert!(state.in_minigame());
        assert!(state.daily_actions.minigame_played);
        assert!(state.minigame_state.is_some());

        let again = run(ActionId::PlayMinigame, &state, ActionParams::default(), 5);
        assert!(again.changes.is_empty());

        let logic_before = state.stats.logic;
        let concentration_before = state.stats.concentration;
        let outcome = run(ActionId::MinigameQuit, &state, ActionParams::default(), 5);
        state.apply_changes(outcome.changes);
        assert!(state.minigame_state.is_none());
        assert_eq!(state.current_scenario_id, SCENARIO_INTRO);
        assert!(
            state.stats.logic > logic_before || state.stats.concentration > concentration_before,
            "quitting still pays the consolation reward"
        );
    }

    #[test]
    fn circuit_input_completes_the_board() {
        let mut state = fresh();
        state.minigame_state = Some(MinigameState::CircuitBoard(
            crate::minigame::CircuitBoard::with_solution(vec![false, true, false]),
        ));
        let outcome = run(ActionId::MinigameInput, &state, ActionParams::value(1), 1);
        state.apply_changes(outcome.changes);
        assert!(state.minigame_state.is_none());
        assert_eq!(state.stats.logic, 65);
        assert_eq!(state.stats.skill, 60);
    }
}
