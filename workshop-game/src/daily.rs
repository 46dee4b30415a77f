//! The once-per-logical-day pass: reseed, upkeep, stat thresholds, game-over
//! checks and one weighted daily event.

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::constants::{
    CNC_RARE_PARTS_YIELD, EQUIPMENT_FAILURE_WEAR, LOGIC_CRAFT_BONUS, MAX_ACTION_POINTS_CAP,
    MSG_NEW_MORNING, SCENARIO_INTRO, STAT_HIGH_THRESHOLD, STAT_LOW_THRESHOLD, TOOL_DAILY_DECAY,
    TOOL_NEGLECT_DECAY, TOOLBOX_PARTS_YIELD, WORKBENCH_MATERIALS_YIELD,
};
use crate::data::Effects;
use crate::rng::Mulberry32;
use crate::selector::{Condition, Weighted, pick_by_roll};
use crate::state::{
    Assistant, GameOverCause, GameState, PendingEvent, ResourceKind, StatKind, ToolId, TradeOffer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPhase {
    /// The latch was already set; nothing ran.
    AwaitingDayBoundary,
    /// Upkeep and thresholds ran but no event fired.
    StatEffectsApplied,
    EventSelected,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyEventId {
    MaterialDefect,
    EnergyShortage,
    NewToolIdea,
    NewRecruit,
    TradeOffer,
    EquipmentFailure,
    RareFind,
}

impl DailyEventId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MaterialDefect => "material_defect",
            Self::EnergyShortage => "energy_shortage",
            Self::NewToolIdea => "new_tool_idea",
            Self::NewRecruit => "new_recruit",
            Self::TradeOffer => "trade_offer",
            Self::EquipmentFailure => "equipment_failure",
            Self::RareFind => "rare_find",
        }
    }
}

/// What a daily pass did.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReport {
    pub phase: DayPhase,
    pub event: Option<DailyEventId>,
    pub game_over: Option<GameOverCause>,
    pub messages: Vec<String>,
}

impl DailyReport {
    fn idle() -> Self {
        Self {
            phase: DayPhase::AwaitingDayBoundary,
            event: None,
            game_over: None,
            messages: Vec::new(),
        }
    }

    #[must_use]
    pub fn ran(&self) -> bool {
        self.phase != DayPhase::AwaitingDayBoundary
    }

    #[must_use]
    pub fn summary(&self) -> String {
        self.messages.join(" ")
    }
}

type Trigger = fn(&mut GameState, &mut Mulberry32) -> String;

struct DailyEvent {
    id: DailyEventId,
    weight: u32,
    condition: Condition,
    trigger: Trigger,
}

impl Weighted for DailyEvent {
    fn weight(&self) -> u32 {
        self.weight
    }

    fn label(&self) -> &str {
        self.id.as_str()
    }
}

static DAILY_EVENTS: [DailyEvent; 7] = [
    DailyEvent {
        id: DailyEventId::MaterialDefect,
        weight: 10,
        condition: Condition::StatBelow(StatKind::Efficiency, 40),
        trigger: material_defect,
    },
    DailyEvent {
        id: DailyEventId::EnergyShortage,
        weight: 5,
        condition: Condition::Always,
        trigger: energy_shortage,
    },
    DailyEvent {
        id: DailyEventId::NewToolIdea,
        weight: 15,
        condition: Condition::Always,
        trigger: new_tool_idea,
    },
    DailyEvent {
        id: DailyEventId::NewRecruit,
        weight: 8,
        condition: Condition::All(&[
            Condition::ToolBuilt(ToolId::BlueprintStorage),
            Condition::RoomForAssistant,
            Condition::NoPendingEvent,
        ]),
        trigger: new_recruit,
    },
    DailyEvent {
        id: DailyEventId::TradeOffer,
        weight: 8,
        condition: Condition::All(&[
            Condition::ToolBuilt(ToolId::Workbench),
            Condition::NoPendingEvent,
        ]),
        trigger: trade_offer,
    },
    DailyEvent {
        id: DailyEventId::EquipmentFailure,
        weight: 6,
        condition: Condition::All(&[Condition::AnyToolBuilt, Condition::NoPendingEvent]),
        trigger: equipment_failure,
    },
    DailyEvent {
        id: DailyEventId::RareFind,
        weight: 4,
        condition: Condition::ToolBuilt(ToolId::CncMachine),
        trigger: rare_find,
    },
];

/// Candidates who may knock on the door once blueprint storage exists.
const RECRUITS: [(&str, &str, &str, &str); 6] = [
    ("tesla", "Tesla", "eccentric", "power systems"),
    ("ada", "Ada", "meticulous", "programming"),
    ("gus", "Gus", "cheerful", "welding"),
    ("hedy", "Hedy", "inventive", "signal processing"),
    ("otto", "Otto", "stubborn", "engines"),
    ("rosie", "Rosie", "diligent", "riveting"),
];

/// `(give, give base, give variance, receive, receive base, receive variance)`
const TRADE_OFFERS: [(ResourceKind, i32, i32, ResourceKind, i32, i32); 4] = [
    (ResourceKind::Parts, 10, 3, ResourceKind::Materials, 14, 4),
    (ResourceKind::Materials, 10, 3, ResourceKind::Energy, 8, 2),
    (ResourceKind::Energy, 6, 2, ResourceKind::Parts, 12, 4),
    (ResourceKind::Parts, 25, 5, ResourceKind::RareParts, 1, 0),
];

fn material_defect(state: &mut GameState, rng: &mut Mulberry32) -> String {
    let v = rng.roll_around(10, 3);
    Effects::stat(StatKind::Efficiency, -v).apply(state);
    format!("A batch of defective material turned up. (efficiency -{v})")
}

fn energy_shortage(state: &mut GameState, rng: &mut Mulberry32) -> String {
    let v = rng.roll_around(15, 5);
    Effects::resource(ResourceKind::Energy, -v)
        .plus(Effects::stat(StatKind::Concentration, -5))
        .apply(state);
    format!("An energy shortage halted work. (energy -{v}, concentration -5)")
}

fn new_tool_idea(state: &mut GameState, rng: &mut Mulberry32) -> String {
    let v = rng.roll_around(10, 5);
    Effects::stat(StatKind::Adaptation, v).apply(state);
    format!("An idea for a new tool struck you! (adaptation +{v})")
}

fn new_recruit(state: &mut GameState, rng: &mut Mulberry32) -> String {
    let available: Vec<_> = RECRUITS
        .iter()
        .filter(|(id, ..)| state.assistant(id).is_none())
        .collect();
    let Some((id, name, personality, specialty)) = rng
        .index(available.len())
        .and_then(|idx| available.get(idx).copied())
    else {
        return "Word of your workshop is spreading around town.".to_string();
    };
    let trust = rng.roll_around(40, 10);
    let assistant = Assistant::new(id, name, personality, specialty, trust);
    state.pending_event = Some(PendingEvent::Recruit { assistant });
    format!("{name} saw your blueprints and wants to join the workshop.")
}

fn trade_offer(state: &mut GameState, rng: &mut Mulberry32) -> String {
    let Some((give, give_base, give_var, receive, receive_base, receive_var)) = rng
        .index(TRADE_OFFERS.len())
        .and_then(|idx| TRADE_OFFERS.get(idx).copied())
    else {
        return String::new();
    };
    let offer = TradeOffer {
        give,
        give_amount: rng.roll_around(give_base, give_var),
        receive,
        receive_amount: rng.roll_around(receive_base, receive_var),
    };
    state.pending_event = Some(PendingEvent::Trade { offer });
    format!(
        "A scrap dealer offers {} {} for {} {}.",
        offer.receive_amount,
        offer.receive.label(),
        offer.give_amount,
        offer.give.label()
    )
}

fn equipment_failure(state: &mut GameState, rng: &mut Mulberry32) -> String {
    let built: Vec<ToolId> = ToolId::ALL
        .into_iter()
        .filter(|id| state.is_built(*id))
        .collect();
    let Some(id) = rng.index(built.len()).and_then(|idx| built.get(idx).copied()) else {
        return String::new();
    };
    let name = id.spec().name;
    let broke = state
        .tools
        .get_mut(&id)
        .is_some_and(|tool| tool.wear(EQUIPMENT_FAILURE_WEAR));
    if broke {
        info!("equipment failure destroyed {id}");
        return format!("The {name} broke down completely and must be rebuilt.");
    }
    state.pending_event = Some(PendingEvent::EquipmentFailure { tool: id });
    format!("The {name} is malfunctioning.")
}

fn rare_find(state: &mut GameState, rng: &mut Mulberry32) -> String {
    let v = rng.roll_around(2, 1);
    Effects::resource(ResourceKind::RareParts, v).apply(state);
    format!("The CNC machine turned up something unusual. (rare parts +{v})")
}

fn tool_upkeep(state: &mut GameState, messages: &mut Vec<String>) {
    let yields = [
        (ToolId::Toolbox, ResourceKind::Parts, TOOLBOX_PARTS_YIELD),
        (ToolId::Workbench, ResourceKind::Materials, WORKBENCH_MATERIALS_YIELD),
        (ToolId::CncMachine, ResourceKind::RareParts, CNC_RARE_PARTS_YIELD),
    ];
    for (id, kind, amount) in yields {
        if state.is_built(id) {
            state.resources.add(kind, amount);
        }
    }
    wear_built_tools(state, TOOL_DAILY_DECAY, messages);
}

fn wear_built_tools(state: &mut GameState, amount: u32, messages: &mut Vec<String>) {
    for (id, tool) in &mut state.tools {
        if tool.wear(amount) {
            info!("{id} wore out and is no longer built");
            messages.push(format!("The {} wore out and has to be rebuilt.", tool.name));
        }
    }
}

fn adjust_all_trust(state: &mut GameState, delta: i32) {
    for assistant in &mut state.assistants {
        assistant.adjust_trust(delta);
    }
}

fn apply_stat_effects(state: &mut GameState, rng: &mut Mulberry32, messages: &mut Vec<String>) {
    if state.stats.logic >= STAT_HIGH_THRESHOLD {
        state.daily_bonus.craft_success = LOGIC_CRAFT_BONUS;
        messages.push("Sharp logic raises your odds of success today.".to_string());
    }
    if state.stats.efficiency >= STAT_HIGH_THRESHOLD {
        let v = rng.roll_around(5, 2);
        state.resources.add(ResourceKind::Materials, v);
        messages.push(format!("Efficient habits saved you some materials. (materials +{v})"));
    }
    if state.stats.skill >= STAT_HIGH_THRESHOLD {
        let v = rng.roll_around(2, 1);
        adjust_all_trust(state, v);
        messages.push(format!("Your assistants admire your skill. (trust +{v})"));
    }
    if state.stats.adaptation >= STAT_HIGH_THRESHOLD && state.max_action_points < MAX_ACTION_POINTS_CAP {
        state.max_action_points += 1;
        messages.push("You adapt quickly and can handle a little more each day. (max action points +1)".to_string());
    }
    if state.stats.adaptation < STAT_LOW_THRESHOLD {
        state.action_points = state.action_points.saturating_sub(1);
        messages.push("Struggling to adapt costs you an action point.".to_string());
    }
    if state.stats.concentration < STAT_LOW_THRESHOLD {
        messages.push("Poor concentration wears down your tools.".to_string());
        wear_built_tools(state, TOOL_NEGLECT_DECAY, messages);
    }
    if state.stats.efficiency < STAT_LOW_THRESHOLD {
        let v = rng.roll_around(2, 1);
        adjust_all_trust(state, -v);
        messages.push(format!("Your assistants are losing faith in your methods. (trust -{v})"));
    }
}

fn clamp(state: &mut GameState) {
    state.resources.clamp_non_negative();
    adjust_all_trust(state, 0);
    state.action_points = state.action_points.min(state.max_action_points);
}

/// Game-over predicates in priority order.
#[must_use]
pub fn check_game_over(state: &GameState) -> Option<GameOverCause> {
    if state.stats.logic <= 0 {
        Some(GameOverCause::Logic)
    } else if state.stats.efficiency <= 0 {
        Some(GameOverCause::Efficiency)
    } else if state.stats.skill <= 0 {
        Some(GameOverCause::Skill)
    } else if state.resources.parts <= 0 && state.day > 1 {
        Some(GameOverCause::Resources)
    } else {
        None
    }
}

/// Run the daily pass for the state's current logical day.
///
/// Guarded by `dailyEventTriggered`: a second call on the same logical day
/// returns [`DayPhase::AwaitingDayBoundary`] without touching anything. The
/// generator is reseeded for `(today, day)` before any draw.
pub fn run_daily_pass(state: &mut GameState, rng: &mut Mulberry32, today: NaiveDate) -> DailyReport {
    if state.daily_event_triggered {
        debug!("daily pass already ran for day {}", state.day);
        return DailyReport::idle();
    }

    state.daily_event_triggered = true;
    *rng = Mulberry32::for_day(today, state.day);
    state.action_points = state.max_action_points;
    state.reset_daily_scratch();
    state.minigame_state = None;

    let mut report = DailyReport {
        phase: DayPhase::StatEffectsApplied,
        event: None,
        game_over: None,
        messages: vec![MSG_NEW_MORNING.to_string()],
    };

    if let Some(cause) = state.game_over() {
        report.phase = DayPhase::GameOver;
        report.game_over = Some(cause);
        return report;
    }

    tool_upkeep(state, &mut report.messages);
    apply_stat_effects(state, rng, &mut report.messages);
    clamp(state);

    if let Some(cause) = check_game_over(state) {
        info!("game over on day {}: {cause:?}", state.day);
        state.current_scenario_id = cause.scenario().to_string();
        report.phase = DayPhase::GameOver;
        report.game_over = Some(cause);
        return report;
    }

    let roll = rng.next_unit();
    let chosen = pick_by_roll(
        "daily.events",
        &DAILY_EVENTS,
        |event| event.condition.evaluate(state, None),
        roll,
    )
    .map(|selection| selection.entry);
    if let Some(event) = chosen {
        let message = (event.trigger)(state, rng);
        if !message.is_empty() {
            report.messages.push(message);
        }
        report.event = Some(event.id);
        report.phase = DayPhase::EventSelected;
    }

    state.current_scenario_id = state
        .pending_event
        .as_ref()
        .map_or(SCENARIO_INTRO, PendingEvent::scenario)
        .to_string();
    clamp(state);
    info!("day {} began: {}", state.day, report.phase_label());
    report
}

impl DailyReport {
    fn phase_label(&self) -> &'static str {
        match (self.phase, self.event) {
            (_, Some(event)) => event.as_str(),
            (DayPhase::GameOver, None) => "game over",
            _ => "quiet morning",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn fresh() -> GameState {
        GameState::fresh(today())
    }

    fn build(state: &mut GameState, id: ToolId) {
        if let Some(tool) = state.tools.get_mut(&id) {
            tool.construct();
        }
    }

    #[test]
    fn latch_makes_the_pass_idempotent() {
        let mut state = fresh();
        let mut rng = Mulberry32::new(0);
        let first = run_daily_pass(&mut state, &mut rng, today());
        assert!(first.ran());
        let snapshot = state.clone();
        let second = run_daily_pass(&mut state, &mut rng, today());
        assert_eq!(second.phase, DayPhase::AwaitingDayBoundary);
        assert_eq!(state, snapshot);
    }

    #[test]
    fn pass_restores_action_points_and_clears_scratch() {
        let mut state = fresh();
        state.action_points = 2;
        state.daily_actions.tinkered = true;
        state.daily_bonus.craft_success = 0.4;
        state.current_scenario_id = "impromptu_crafting_menu".to_string();
        run_daily_pass(&mut state, &mut Mulberry32::new(0), today());
        assert_eq!(state.action_points, state.max_action_points);
        assert!(!state.daily_actions.tinkered);
        assert!(state.daily_bonus.craft_success.abs() < f64::EPSILON);
        assert_eq!(state.current_scenario_id, SCENARIO_INTRO);
    }

    #[test]
    fn game_over_priority_is_fixed() {
        let mut state = fresh();
        state.day = 3;
        state.stats.efficiency = 0;
        state.stats.skill = -4;
        state.resources.parts = 0;
        let report = run_daily_pass(&mut state, &mut Mulberry32::new(0), today());
        assert_eq!(report.phase, DayPhase::GameOver);
        assert_eq!(report.game_over, Some(GameOverCause::Efficiency));
        assert_eq!(state.current_scenario_id, "game_over_efficiency");
    }

    #[test]
    fn empty_parts_only_end_the_game_after_day_one() {
        let mut state = fresh();
        state.resources.parts = 0;
        assert_eq!(check_game_over(&state), None);
        state.day = 2;
        assert_eq!(check_game_over(&state), Some(GameOverCause::Resources));
    }

    #[test]
    fn terminal_state_is_absorbing() {
        let mut state = fresh();
        state.current_scenario_id = GameOverCause::Logic.scenario().to_string();
        state.stats.logic = 80;
        let before = state.resources;
        let report = run_daily_pass(&mut state, &mut Mulberry32::new(0), today());
        assert_eq!(report.phase, DayPhase::GameOver);
        assert_eq!(state.resources, before);
        assert_eq!(state.current_scenario_id, "game_over_logic");
    }

    #[test]
    fn tools_yield_then_decay_until_unbuilt() {
        let mut state = fresh();
        build(&mut state, ToolId::Toolbox);
        let mut days = 0;
        while state.is_built(ToolId::Toolbox) {
            state.daily_event_triggered = false;
            state.day += 1;
            state.resources.parts = 50;
            state.stats.concentration = 50;
            state.pending_event = None;
            run_daily_pass(&mut state, &mut Mulberry32::new(0), today());
            days += 1;
            assert!(days <= 20, "toolbox never wore out");
        }
        let toolbox = state.tool(ToolId::Toolbox).unwrap();
        assert_eq!(toolbox.durability, 0);
    }

    #[test]
    fn stat_thresholds_apply_bonuses_and_penalties() {
        let mut state = fresh();
        state.stats.logic = 75;
        state.stats.adaptation = 20;
        state.stats.concentration = 10;
        build(&mut state, ToolId::Workbench);
        run_daily_pass(&mut state, &mut Mulberry32::new(0), today());

        assert!((state.daily_bonus.craft_success - LOGIC_CRAFT_BONUS).abs() < f64::EPSILON);
        assert_eq!(state.action_points, state.max_action_points - 1);
        let bench = state.tool(ToolId::Workbench).unwrap();
        assert!(bench.durability <= 100 - (TOOL_DAILY_DECAY + TOOL_NEGLECT_DECAY) as i32);
    }

    #[test]
    fn high_adaptation_raises_max_action_points_up_to_cap() {
        let mut state = fresh();
        state.stats.adaptation = 90;
        state.max_action_points = MAX_ACTION_POINTS_CAP - 1;
        run_daily_pass(&mut state, &mut Mulberry32::new(0), today());
        assert_eq!(state.max_action_points, MAX_ACTION_POINTS_CAP);

        state.daily_event_triggered = false;
        state.day += 1;
        run_daily_pass(&mut state, &mut Mulberry32::new(0), today());
        assert_eq!(state.max_action_points, MAX_ACTION_POINTS_CAP);
    }

    #[test]
    fn resources_stay_non_negative() {
        for day in 1..60 {
            let mut state = fresh();
            state.day = day;
            state.resources.energy = 1;
            state.resources.parts = 5;
            run_daily_pass(&mut state, &mut Mulberry32::new(0), today());
            assert!(state.resources.energy >= 0);
            assert!(state.resources.materials >= 0);
        }
    }

    #[test]
    fn same_day_and_date_give_same_result() {
        let mut a = fresh();
        let mut b = fresh();
        build(&mut a, ToolId::BlueprintStorage);
        build(&mut b, ToolId::BlueprintStorage);
        let ra = run_daily_pass(&mut a, &mut Mulberry32::new(1), today());
        let rb = run_daily_pass(&mut b, &mut Mulberry32::new(999), today());
        assert_eq!(ra, rb);
        assert_eq!(a, b);
    }

    #[test]
    fn event_table_respects_prerequisites() {
        let state = fresh();
        for roll in [0.0, 0.25, 0.5, 0.75, 0.999] {
            let pick = pick_by_roll(
                "test",
                &DAILY_EVENTS,
                |event| event.condition.evaluate(&state, None),
                roll,
            )
            .unwrap();
            assert!(matches!(
                pick.entry.id,
                DailyEventId::EnergyShortage | DailyEventId::NewToolIdea
            ));
        }
    }

    #[test]
    fn recruit_event_creates_pending_recruit() {
        let mut state = fresh();
        let message = new_recruit(&mut state, &mut Mulberry32::new(2));
        let Some(PendingEvent::Recruit { assistant }) = &state.pending_event else {
            panic!("expected a pending recruit");
        };
        assert!(message.contains(&assistant.name));
        assert!(state.assistant(&assistant.id).is_none());
        assert!((30..=50).contains(&assistant.reliability));
    }

    #[test]
    fn equipment_failure_targets_a_built_tool() {
        let mut state = fresh();
        build(&mut state, ToolId::WeldingMachine);
        equipment_failure(&mut state, &mut Mulberry32::new(5));
        assert_eq!(
            state.pending_event,
            Some(PendingEvent::EquipmentFailure {
                tool: ToolId::WeldingMachine
            })
        );
        assert_eq!(state.tool(ToolId::WeldingMachine).unwrap().durability, 80);
    }
}
