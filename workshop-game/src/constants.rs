//! Centralized balance and tuning constants for the workshop simulation.
//!
//! These values define the deterministic math for the core loop. Keeping
//! them together means gameplay can only be retuned through reviewed code
//! changes, not through the external content table.

// Persistence --------------------------------------------------------------
pub const STORE_KEY: &str = "workshop.save";
pub const SCHEMA_VERSION: u32 = 2;

// Scenario ids --------------------------------------------------------------
pub const SCENARIO_INTRO: &str = "intro";
pub const SCENARIO_RESOURCE_GATHERING: &str = "action_resource_gathering";
pub const SCENARIO_TOOL_MANAGEMENT: &str = "action_tool_management";
pub const SCENARIO_CRAFTING_MENU: &str = "impromptu_crafting_menu";
pub const SCENARIO_NEW_RECRUIT: &str = "event_new_recruit";
pub const SCENARIO_TRADE_OFFER: &str = "event_trade_offer";
pub const SCENARIO_EQUIPMENT_FAILURE: &str = "event_equipment_failure";
pub const MINIGAME_SCENARIO_PREFIX: &str = "minigame_";

// Fixed messages ------------------------------------------------------------
pub const MSG_LOW_ACTION_POINTS: &str = "You are too drained to focus on anything else today.";
pub const MSG_INSUFFICIENT_RESOURCES: &str = "Not enough resources.";
pub const MSG_GAME_OVER: &str = "The workshop is closed. Reset to start over.";
pub const MSG_MANUAL_ADVANCE_LIMIT: &str = "You cannot skip ahead any further today.";
pub const MSG_NEW_MORNING: &str = "A new morning dawns over the workshop.";
pub const MSG_NOTHING_PENDING: &str = "There is nothing waiting for a response.";

// Starting state ------------------------------------------------------------
pub const STARTING_STAT: i32 = 50;
pub const STARTING_ACTION_POINTS: u32 = 10;
pub const STARTING_MAX_ASSISTANTS: u32 = 5;
pub const STARTING_PARTS: i32 = 10;
pub const STARTING_MATERIALS: i32 = 10;
pub const STARTING_ENERGY: i32 = 5;

// Day control ---------------------------------------------------------------
pub const MAX_MANUAL_DAY_ADVANCES: u32 = 5;

// Stat thresholds -----------------------------------------------------------
pub const STAT_HIGH_THRESHOLD: i32 = 70;
pub const STAT_LOW_THRESHOLD: i32 = 30;
pub const LOGIC_CRAFT_BONUS: f64 = 0.1;
pub const MAX_ACTION_POINTS_CAP: u32 = 15;

// Trust ---------------------------------------------------------------------
pub const TRUST_MAX: i32 = 100;

// Tools ---------------------------------------------------------------------
pub const TOOL_DURABILITY_MAX: u32 = 100;
pub const TOOL_DAILY_DECAY: u32 = 5;
pub const TOOL_NEGLECT_DECAY: u32 = 1;
pub const TOOLBOX_PARTS_YIELD: i32 = 2;
pub const WORKBENCH_MATERIALS_YIELD: i32 = 2;
pub const CNC_RARE_PARTS_YIELD: i32 = 1;
pub const REPAIR_ENERGY_COST: i32 = 10;
pub const REPAIR_MATERIALS_COST: i32 = 10;
pub const EQUIPMENT_FAILURE_WEAR: u32 = 20;
pub const PATCH_ENERGY_COST: i32 = 5;
pub const PATCH_DURABILITY_RESTORE: u32 = 15;

// Success rolls -------------------------------------------------------------
pub const GATHER_BASE_CHANCE: f64 = 0.75;
pub const LEVEL_CHANCE_STEP: f64 = 0.05;
pub const SUCCESS_CHANCE_CAP: f64 = 0.95;
pub const USELESS_MACHINE_RARE_CHANCE: f64 = 0.3;
pub const DRONE_BASE_CHANCE: f64 = 0.6;

// Workshop upgrades ---------------------------------------------------------
pub const UPGRADE_MATERIALS_STEP: i32 = 40;
pub const UPGRADE_ENERGY_STEP: i32 = 20;
pub const MAX_WORKSHOP_LEVEL: u32 = 5;

// Minigames -----------------------------------------------------------------
pub const SEQUENCE_SYMBOLS: u32 = 4;
pub const SEQUENCE_BASE_LENGTH: usize = 3;
pub const SEQUENCE_STAGES: u32 = 5;
pub const SEQUENCE_STAGE_POINTS: u32 = 20;
pub const CIRCUIT_MIN_WIRES: usize = 3;
pub const CIRCUIT_MAX_WIRES: usize = 5;
pub const MINIGAME_PERFECT_SCORE: u32 = 100;
