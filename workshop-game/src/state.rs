use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    GATHER_BASE_CHANCE, LEVEL_CHANCE_STEP, MINIGAME_SCENARIO_PREFIX, SCENARIO_EQUIPMENT_FAILURE,
    SCENARIO_INTRO, SCENARIO_NEW_RECRUIT, SCENARIO_TRADE_OFFER, SCHEMA_VERSION, STARTING_ACTION_POINTS,
    STARTING_ENERGY, STARTING_MATERIALS, STARTING_MAX_ASSISTANTS, STARTING_PARTS, STARTING_STAT,
    SUCCESS_CHANCE_CAP, TOOL_DURABILITY_MAX, TRUST_MAX,
};
use crate::data::Effects;
use crate::minigame::MinigameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    Logic,
    Efficiency,
    Skill,
    Adaptation,
    Concentration,
}

impl StatKind {
    pub const ALL: [Self; 5] = [
        Self::Logic,
        Self::Efficiency,
        Self::Skill,
        Self::Adaptation,
        Self::Concentration,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Logic => "logic",
            Self::Efficiency => "efficiency",
            Self::Skill => "skill",
            Self::Adaptation => "adaptation",
            Self::Concentration => "concentration",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const fn default_stat() -> i32 {
    STARTING_STAT
}

/// Player attributes. Zero is a game-over floor; there is no hard ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default = "default_stat")]
    pub logic: i32,
    #[serde(default = "default_stat")]
    pub efficiency: i32,
    #[serde(default = "default_stat")]
    pub skill: i32,
    #[serde(default = "default_stat")]
    pub adaptation: i32,
    #[serde(default = "default_stat")]
    pub concentration: i32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            logic: STARTING_STAT,
            efficiency: STARTING_STAT,
            skill: STARTING_STAT,
            adaptation: STARTING_STAT,
            concentration: STARTING_STAT,
        }
    }
}

impl Stats {
    #[must_use]
    pub const fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Logic => self.logic,
            StatKind::Efficiency => self.efficiency,
            StatKind::Skill => self.skill,
            StatKind::Adaptation => self.adaptation,
            StatKind::Concentration => self.concentration,
        }
    }

    pub fn add(&mut self, kind: StatKind, delta: i32) {
        let slot = match kind {
            StatKind::Logic => &mut self.logic,
            StatKind::Efficiency => &mut self.efficiency,
            StatKind::Skill => &mut self.skill,
            StatKind::Adaptation => &mut self.adaptation,
            StatKind::Concentration => &mut self.concentration,
        };
        *slot = slot.saturating_add(delta);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Parts,
    Materials,
    Energy,
    RareParts,
}

impl ResourceKind {
    pub const ALL: [Self; 4] = [Self::Parts, Self::Materials, Self::Energy, Self::RareParts];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Parts => "parts",
            Self::Materials => "materials",
            Self::Energy => "energy",
            Self::RareParts => "rare parts",
        }
    }
}

/// Named resource counters. Also used as a cost vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default)]
    pub parts: i32,
    #[serde(default)]
    pub materials: i32,
    #[serde(default)]
    pub energy: i32,
    #[serde(default)]
    pub rare_parts: i32,
}

impl Resources {
    #[must_use]
    pub const fn starting() -> Self {
        Self {
            parts: STARTING_PARTS,
            materials: STARTING_MATERIALS,
            energy: STARTING_ENERGY,
            rare_parts: 0,
        }
    }

    #[must_use]
    pub const fn get(&self, kind: ResourceKind) -> i32 {
        match kind {
            ResourceKind::Parts => self.parts,
            ResourceKind::Materials => self.materials,
            ResourceKind::Energy => self.energy,
            ResourceKind::RareParts => self.rare_parts,
        }
    }

    const fn slot_mut(&mut self, kind: ResourceKind) -> &mut i32 {
        match kind {
            ResourceKind::Parts => &mut self.parts,
            ResourceKind::Materials => &mut self.materials,
            ResourceKind::Energy => &mut self.energy,
            ResourceKind::RareParts => &mut self.rare_parts,
        }
    }

    /// Apply a delta, flooring the counter at zero.
    pub fn add(&mut self, kind: ResourceKind, delta: i32) {
        let slot = self.slot_mut(kind);
        *slot = slot.saturating_add(delta).max(0);
    }

    /// True when every counter meets or exceeds the matching cost.
    #[must_use]
    pub fn covers(&self, cost: &Self) -> bool {
        ResourceKind::ALL
            .iter()
            .all(|kind| self.get(*kind) >= cost.get(*kind))
    }

    /// Deduct a cost. Callers check [`Resources::covers`] first.
    pub fn deduct(&mut self, cost: &Self) {
        for kind in ResourceKind::ALL {
            self.add(kind, -cost.get(kind));
        }
    }

    pub fn clamp_non_negative(&mut self) {
        for kind in ResourceKind::ALL {
            let slot = self.slot_mut(kind);
            *slot = (*slot).max(0);
        }
    }

    /// Human-readable cost list, e.g. `materials 50, energy 20`.
    #[must_use]
    pub fn describe(&self) -> String {
        ResourceKind::ALL
            .iter()
            .filter(|kind| self.get(**kind) != 0)
            .map(|kind| format!("{} {}", kind.label(), self.get(*kind)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A workshop assistant; `reliability` is the trust score in `0..=100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assistant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub personality: String,
    #[serde(default, rename = "skill")]
    pub specialty: String,
    #[serde(default)]
    pub reliability: i32,
}

impl Assistant {
    #[must_use]
    pub fn new(id: &str, name: &str, personality: &str, specialty: &str, reliability: i32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            personality: personality.to_string(),
            specialty: specialty.to_string(),
            reliability: reliability.clamp(0, TRUST_MAX),
        }
    }

    pub fn adjust_trust(&mut self, delta: i32) {
        self.reliability = self.reliability.saturating_add(delta).clamp(0, TRUST_MAX);
    }
}

fn starting_assistants() -> Vec<Assistant> {
    vec![
        Assistant::new("macgyver", "MacGyver", "curious", "circuit analysis", 70),
        Assistant::new("neo", "Neo", "calm", "machine assembly", 60),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolId {
    Toolbox,
    Workbench,
    BlueprintStorage,
    WeldingMachine,
    CncMachine,
}

/// Static catalog entry for a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub effect: &'static str,
    pub cost: Resources,
    pub bonus_stat: StatKind,
    pub bonus_base: i32,
    pub bonus_variance: i32,
    pub requires: Option<ToolId>,
}

const fn cost(materials: i32, energy: i32, rare_parts: i32) -> Resources {
    Resources {
        parts: 0,
        materials,
        energy,
        rare_parts,
    }
}

impl ToolId {
    pub const ALL: [Self; 5] = [
        Self::Toolbox,
        Self::Workbench,
        Self::BlueprintStorage,
        Self::WeldingMachine,
        Self::CncMachine,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Toolbox => "toolbox",
            Self::Workbench => "workbench",
            Self::BlueprintStorage => "blueprintStorage",
            Self::WeldingMachine => "weldingMachine",
            Self::CncMachine => "cncMachine",
        }
    }

    #[must_use]
    pub const fn spec(self) -> ToolSpec {
        match self {
            Self::Toolbox => ToolSpec {
                name: "Toolbox",
                description: "The essential kit for basic repairs.",
                effect: "Produces spare parts every day and sharpens your skill.",
                cost: cost(50, 20, 0),
                bonus_stat: StatKind::Skill,
                bonus_base: 10,
                bonus_variance: 3,
                requires: None,
            },
            Self::Workbench => ToolSpec {
                name: "Workbench",
                description: "Where real fabrication and teardown work begins.",
                effect: "Produces materials every day and improves efficiency.",
                cost: cost(30, 30, 0),
                bonus_stat: StatKind::Efficiency,
                bonus_base: 10,
                bonus_variance: 3,
                requires: None,
            },
            Self::BlueprintStorage => ToolSpec {
                name: "Blueprint Storage",
                description: "Keeps the plans for complicated inventions safe.",
                effect: "Attracts new assistants and strengthens logic.",
                cost: cost(100, 50, 0),
                bonus_stat: StatKind::Logic,
                bonus_base: 15,
                bonus_variance: 5,
                requires: None,
            },
            Self::WeldingMachine => ToolSpec {
                name: "Welding Machine",
                description: "Joins metal parts into sturdier devices.",
                effect: "Opens trade with scrap dealers and boosts skill.",
                cost: cost(40, 80, 0),
                bonus_stat: StatKind::Skill,
                bonus_base: 15,
                bonus_variance: 5,
                requires: None,
            },
            Self::CncMachine => ToolSpec {
                name: "CNC Machine",
                description: "Machines precise parts under computer control.",
                effect: "Turns up rare parts and unlocks advanced work.",
                cost: cost(0, 150, 5),
                bonus_stat: StatKind::Adaptation,
                bonus_base: 20,
                bonus_variance: 5,
                requires: Some(Self::Workbench),
            },
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ToolId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "toolbox" => Ok(Self::Toolbox),
            "workbench" => Ok(Self::Workbench),
            "blueprintStorage" | "blueprint_storage" => Ok(Self::BlueprintStorage),
            "weldingMachine" | "welding_machine" => Ok(Self::WeldingMachine),
            "cncMachine" | "cnc_machine" => Ok(Self::CncMachine),
            _ => Err(()),
        }
    }
}

const fn default_durability() -> i32 {
    TOOL_DURABILITY_MAX as i32
}

/// A facility in the workshop. Durability 0 on a built tool un-builds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    #[serde(default)]
    pub built: bool,
    #[serde(default = "default_durability")]
    pub durability: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub effect_description: String,
}

impl Tool {
    #[must_use]
    pub fn unbuilt(id: ToolId) -> Self {
        let spec = id.spec();
        Self {
            built: false,
            durability: default_durability(),
            name: spec.name.to_string(),
            description: spec.description.to_string(),
            effect_description: spec.effect.to_string(),
        }
    }

    pub fn construct(&mut self) {
        self.built = true;
        self.durability = default_durability();
    }

    pub fn repair(&mut self) {
        self.durability = default_durability();
    }

    /// Wear a built tool down. Returns `true` when the tool broke and is no longer built.
    pub fn wear(&mut self, amount: u32) -> bool {
        if !self.built {
            return false;
        }
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.durability = self.durability.saturating_sub(amount).max(0);
        if self.durability == 0 {
            self.built = false;
            return true;
        }
        false
    }

    /// Restore some durability without exceeding the maximum.
    pub fn restore(&mut self, amount: u32) {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.durability = self
            .durability
            .saturating_add(amount)
            .min(default_durability());
    }
}

fn default_tools() -> BTreeMap<ToolId, Tool> {
    ToolId::ALL
        .iter()
        .map(|id| (*id, Tool::unbuilt(*id)))
        .collect()
}

/// One-day bonuses; cleared at every day boundary.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBonus {
    #[serde(default)]
    pub craft_success: f64,
}

/// Flags for things already done today; cleared at every day boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActions {
    #[serde(default)]
    pub tinkered: bool,
    #[serde(default)]
    pub reviewed: bool,
    #[serde(default)]
    pub chatted_with: Vec<String>,
    #[serde(default)]
    pub minigame_played: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOffer {
    pub give: ResourceKind,
    pub give_amount: i32,
    pub receive: ResourceKind,
    pub receive_amount: i32,
}

impl TradeOffer {
    #[must_use]
    pub fn price(&self) -> Resources {
        let mut price = Resources::default();
        price.add(self.give, self.give_amount);
        price
    }
}

/// An event waiting on a player response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingEvent {
    Recruit { assistant: Assistant },
    Trade { offer: TradeOffer },
    EquipmentFailure { tool: ToolId },
}

impl PendingEvent {
    #[must_use]
    pub const fn scenario(&self) -> &'static str {
        match self {
            Self::Recruit { .. } => SCENARIO_NEW_RECRUIT,
            Self::Trade { .. } => SCENARIO_TRADE_OFFER,
            Self::EquipmentFailure { .. } => SCENARIO_EQUIPMENT_FAILURE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverCause {
    Logic,
    Efficiency,
    Skill,
    Resources,
}

impl GameOverCause {
    #[must_use]
    pub const fn scenario(self) -> &'static str {
        match self {
            Self::Logic => "game_over_logic",
            Self::Efficiency => "game_over_efficiency",
            Self::Skill => "game_over_skill",
            Self::Resources => "game_over_resources",
        }
    }

    #[must_use]
    pub fn from_scenario(id: &str) -> Option<Self> {
        [Self::Logic, Self::Efficiency, Self::Skill, Self::Resources]
            .into_iter()
            .find(|cause| cause.scenario() == id)
    }
}

const fn default_max_assistants() -> u32 {
    STARTING_MAX_ASSISTANTS
}

fn default_scenario() -> String {
    SCENARIO_INTRO.to_string()
}

/// The whole persisted world. Keys serialize in the legacy camelCase layout
/// with the five stats flattened at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(default)]
    pub schema_version: u32,
    pub day: u32,
    #[serde(flatten)]
    pub stats: Stats,
    pub action_points: u32,
    pub max_action_points: u32,
    pub resources: Resources,
    pub assistants: Vec<Assistant>,
    #[serde(default = "default_max_assistants")]
    pub max_assistants: u32,
    #[serde(default = "default_tools")]
    pub tools: BTreeMap<ToolId, Tool>,
    #[serde(default = "default_scenario")]
    pub current_scenario_id: String,
    pub last_played_date: NaiveDate,
    #[serde(default)]
    pub manual_day_advances: u32,
    #[serde(default)]
    pub daily_event_triggered: bool,
    #[serde(default)]
    pub daily_bonus: DailyBonus,
    #[serde(default)]
    pub daily_actions: DailyActions,
    #[serde(default)]
    pub workshop_level: u32,
    #[serde(default)]
    pub minigame_state: Option<MinigameState>,
    #[serde(default)]
    pub pending_event: Option<PendingEvent>,
    /// Keys written by other schema revisions; carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GameState {
    /// Brand-new workshop as of `today`.
    #[must_use]
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            day: 1,
            stats: Stats::default(),
            action_points: STARTING_ACTION_POINTS,
            max_action_points: STARTING_ACTION_POINTS,
            resources: Resources::starting(),
            assistants: starting_assistants(),
            max_assistants: STARTING_MAX_ASSISTANTS,
            tools: default_tools(),
            current_scenario_id: default_scenario(),
            last_played_date: today,
            manual_day_advances: 0,
            daily_event_triggered: false,
            daily_bonus: DailyBonus::default(),
            daily_actions: DailyActions::default(),
            workshop_level: 0,
            minigame_state: None,
            pending_event: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub const fn stat(&self, kind: StatKind) -> i32 {
        self.stats.get(kind)
    }

    #[must_use]
    pub fn tool(&self, id: ToolId) -> Option<&Tool> {
        self.tools.get(&id)
    }

    #[must_use]
    pub fn is_built(&self, id: ToolId) -> bool {
        self.tool(id).is_some_and(|tool| tool.built)
    }

    #[must_use]
    pub fn any_tool_built(&self) -> bool {
        self.tools.values().any(|tool| tool.built)
    }

    #[must_use]
    pub fn has_room_for_assistant(&self) -> bool {
        self.assistants.len() < self.max_assistants as usize
    }

    #[must_use]
    pub fn assistant(&self, id: &str) -> Option<&Assistant> {
        self.assistants.iter().find(|assistant| assistant.id == id)
    }

    /// Terminal cause when the current scenario is a game-over screen.
    #[must_use]
    pub fn game_over(&self) -> Option<GameOverCause> {
        GameOverCause::from_scenario(&self.current_scenario_id)
    }

    #[must_use]
    pub fn in_minigame(&self) -> bool {
        self.current_scenario_id.starts_with(MINIGAME_SCENARIO_PREFIX)
    }

    /// Success probability for a roll-gated action with the given base chance.
    #[must_use]
    pub fn success_chance(&self, base: f64) -> f64 {
        let level_bonus = f64::from(self.workshop_level) * LEVEL_CHANCE_STEP;
        (base + level_bonus + self.daily_bonus.craft_success).clamp(0.0, SUCCESS_CHANCE_CAP)
    }

    #[must_use]
    pub fn gather_chance(&self) -> f64 {
        self.success_chance(GATHER_BASE_CHANCE)
    }

    /// Spend action points. Returns `false` without mutating when short.
    pub fn spend_action_points(&mut self, cost: u32) -> bool {
        if self.action_points < cost {
            return false;
        }
        self.action_points -= cost;
        true
    }

    /// Roll the calendar forward after a real-date change.
    pub fn begin_calendar_day(&mut self, today: NaiveDate) {
        self.day = self.day.saturating_add(1);
        self.last_played_date = today;
        self.manual_day_advances = 0;
        self.daily_event_triggered = false;
    }

    /// Clear per-day scratch state.
    pub fn reset_daily_scratch(&mut self) {
        self.daily_bonus = DailyBonus::default();
        self.daily_actions = DailyActions::default();
    }

    /// Restore structural invariants after a load or a batch of changes.
    pub fn backfill(&mut self) {
        for id in ToolId::ALL {
            self.tools.entry(id).or_insert_with(|| Tool::unbuilt(id));
        }
        for (id, tool) in &mut self.tools {
            if tool.name.is_empty() {
                tool.name = id.spec().name.to_string();
            }
            tool.durability = tool.durability.clamp(0, default_durability());
            if tool.built && tool.durability == 0 {
                tool.built = false;
            }
        }
        if self.current_scenario_id.is_empty() {
            self.current_scenario_id = default_scenario();
        }
        self.action_points = self.action_points.min(self.max_action_points);
        self.assistants.truncate(self.max_assistants as usize);
        for assistant in &mut self.assistants {
            assistant.adjust_trust(0);
        }
        self.resources.clamp_non_negative();
    }

    /// The single mutation path used by player actions.
    pub fn apply_changes(&mut self, changes: StateChanges) {
        let StateChanges {
            effects,
            trust,
            tools,
            scenario,
            assistants,
            daily_actions,
            pending_event,
            minigame_state,
            workshop_level,
        } = changes;

        if let Some(assistants) = assistants {
            self.assistants = assistants;
        }
        for (id, delta) in trust {
            if let Some(assistant) = self.assistants.iter_mut().find(|a| a.id == id) {
                assistant.adjust_trust(delta);
            }
        }
        effects.apply(self);
        for (id, tool) in tools {
            self.tools.insert(id, tool);
        }
        if let Some(actions) = daily_actions {
            self.daily_actions = actions;
        }
        if let Some(pending) = pending_event {
            self.pending_event = pending;
        }
        if let Some(minigame) = minigame_state {
            self.minigame_state = minigame;
        }
        if let Some(level) = workshop_level {
            self.workshop_level = level;
        }
        if let Some(scenario) = scenario {
            self.current_scenario_id = scenario;
        }
        self.assistants.truncate(self.max_assistants as usize);
        self.action_points = self.action_points.min(self.max_action_points);
    }
}

/// Typed partial update produced by actions and applied by [`GameState::apply_changes`].
///
/// Deltas merge field by field; `Some(..)` replacements overwrite wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateChanges {
    pub effects: Effects,
    pub trust: Vec<(String, i32)>,
    pub tools: Vec<(ToolId, Tool)>,
    pub scenario: Option<String>,
    pub assistants: Option<Vec<Assistant>>,
    pub daily_actions: Option<DailyActions>,
    pub pending_event: Option<Option<PendingEvent>>,
    pub minigame_state: Option<Option<MinigameState>>,
    pub workshop_level: Option<u32>,
}

impl StateChanges {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_effects(effects: Effects) -> Self {
        Self {
            effects,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_effects(mut self, effects: Effects) -> Self {
        self.effects = self.effects.plus(effects);
        self
    }

    #[must_use]
    pub fn with_trust(mut self, assistant_id: &str, delta: i32) -> Self {
        self.trust.push((assistant_id.to_string(), delta));
        self
    }

    #[must_use]
    pub fn with_tool(mut self, id: ToolId, tool: Tool) -> Self {
        self.tools.push((id, tool));
        self
    }

    #[must_use]
    pub fn with_scenario(mut self, scenario: &str) -> Self {
        self.scenario = Some(scenario.to_string());
        self
    }

    #[must_use]
    pub fn with_assistants(mut self, assistants: Vec<Assistant>) -> Self {
        self.assistants = Some(assistants);
        self
    }

    #[must_use]
    pub fn with_daily_actions(mut self, actions: DailyActions) -> Self {
        self.daily_actions = Some(actions);
        self
    }

    #[must_use]
    pub fn with_pending_event(mut self, pending: Option<PendingEvent>) -> Self {
        self.pending_event = Some(pending);
        self
    }

    #[must_use]
    pub fn with_minigame(mut self, minigame: Option<MinigameState>) -> Self {
        self.minigame_state = Some(minigame);
        self
    }

    #[must_use]
    pub const fn with_workshop_level(mut self, level: u32) -> Self {
        self.workshop_level = Some(level);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
