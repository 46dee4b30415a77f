//! Daily minigames.
//!
//! Each minigame is a small state machine behind the [`Minigame`] trait. The
//! persisted [`MinigameState`] is a tagged enum so a suspended game survives
//! a reload on the same day. All generated content comes from the session's
//! daily generator, so everyone sees the same puzzle on the same date.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    CIRCUIT_MAX_WIRES, CIRCUIT_MIN_WIRES, MINIGAME_PERFECT_SCORE, MINIGAME_SCENARIO_PREFIX,
    SEQUENCE_BASE_LENGTH, SEQUENCE_STAGE_POINTS, SEQUENCE_STAGES, SEQUENCE_SYMBOLS,
};
use crate::data::Effects;
use crate::rng::Mulberry32;
use crate::state::StatKind;

const SYMBOL_NAMES: [&str; SEQUENCE_SYMBOLS as usize] = ["gear", "bolt", "spring", "wire"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinigamePhase {
    NotStarted,
    Presenting,
    AwaitingInput,
    Scored,
}

/// Outcome of feeding one input to a running minigame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    /// Accepted; the game continues.
    Continue,
    /// Accepted; the game reached [`MinigamePhase::Scored`].
    Finished,
    /// Not valid in the current phase or out of range.
    Rejected,
}

/// Behaviour shared by every minigame.
pub trait Minigame {
    fn kind(&self) -> MinigameKind;
    fn phase(&self) -> MinigamePhase;
    fn score(&self) -> u32;
    /// Leave the presentation phase. Returns `false` when not presenting.
    fn ready(&mut self) -> bool;
    fn input(&mut self, value: u32) -> InputResult;
    /// Text describing what the player should do right now.
    fn prompt(&self) -> String;
    /// Inputs the player may submit right now, as `(label, value)` pairs.
    fn inputs(&self) -> Vec<(String, u32)>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinigameKind {
    CircuitBoard,
    SequenceRecall,
}

impl MinigameKind {
    pub const ALL: [Self; 2] = [Self::CircuitBoard, Self::SequenceRecall];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::CircuitBoard => "circuit_board",
            Self::SequenceRecall => "sequence_recall",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::CircuitBoard => "Circuit Board",
            Self::SequenceRecall => "Sequence Recall",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::CircuitBoard => "Reconnect the broken circuit so the device powers on.",
            Self::SequenceRecall => "Memorize the assembly order and repeat it back.",
        }
    }

    /// Scenario id shown while this minigame is running.
    #[must_use]
    pub fn scenario_id(self) -> String {
        format!("{MINIGAME_SCENARIO_PREFIX}{}", self.key())
    }

    /// Choose today's minigame.
    pub fn pick(rng: &mut Mulberry32) -> Self {
        rng.index(Self::ALL.len())
            .and_then(|idx| Self::ALL.get(idx).copied())
            .unwrap_or(Self::CircuitBoard)
    }

    /// Generate a fresh game of this kind.
    pub fn start(self, rng: &mut Mulberry32) -> MinigameState {
        match self {
            Self::CircuitBoard => MinigameState::CircuitBoard(CircuitBoard::generate(rng)),
            Self::SequenceRecall => MinigameState::SequenceRecall(SequenceRecall::generate(rng)),
        }
    }
}

/// Persisted payload of a running minigame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MinigameState {
    CircuitBoard(CircuitBoard),
    SequenceRecall(SequenceRecall),
}

impl MinigameState {
    #[must_use]
    pub fn game(&self) -> &dyn Minigame {
        match self {
            Self::CircuitBoard(game) => game,
            Self::SequenceRecall(game) => game,
        }
    }

    pub fn game_mut(&mut self) -> &mut dyn Minigame {
        match self {
            Self::CircuitBoard(game) => game,
            Self::SequenceRecall(game) => game,
        }
    }
}

/// Toggle wires until the board matches the hidden solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitBoard {
    pub connections: Vec<bool>,
    pub solution: Vec<bool>,
    pub phase: MinigamePhase,
    pub score: u32,
}

impl CircuitBoard {
    /// Random board with at least one wire to connect.
    pub fn generate(rng: &mut Mulberry32) -> Self {
        let wires = rng.gen_range(CIRCUIT_MIN_WIRES..=CIRCUIT_MAX_WIRES);
        let mut solution: Vec<bool> = (0..wires).map(|_| rng.gen_bool(0.5)).collect();
        if !solution.iter().any(|wire| *wire) {
            let idx = rng.index(wires).unwrap_or(0);
            solution[idx] = true;
        }
        Self::with_solution(solution)
    }

    #[must_use]
    pub fn with_solution(solution: Vec<bool>) -> Self {
        Self {
            connections: vec![false; solution.len()],
            solution,
            phase: MinigamePhase::AwaitingInput,
            score: 0,
        }
    }
}

impl Minigame for CircuitBoard {
    fn kind(&self) -> MinigameKind {
        MinigameKind::CircuitBoard
    }

    fn phase(&self) -> MinigamePhase {
        self.phase
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn ready(&mut self) -> bool {
        false
    }

    fn input(&mut self, value: u32) -> InputResult {
        if self.phase != MinigamePhase::AwaitingInput {
            return InputResult::Rejected;
        }
        let Some(wire) = usize::try_from(value)
            .ok()
            .and_then(|idx| self.connections.get_mut(idx))
        else {
            return InputResult::Rejected;
        };
        *wire = !*wire;
        if self.connections == self.solution {
            self.score = MINIGAME_PERFECT_SCORE;
            self.phase = MinigamePhase::Scored;
            return InputResult::Finished;
        }
        InputResult::Continue
    }

    fn prompt(&self) -> String {
        let board: String = self
            .connections
            .iter()
            .map(|connected| if *connected { '=' } else { '-' })
            .collect();
        format!("{} [{board}]", MinigameKind::CircuitBoard.description())
    }

    fn inputs(&self) -> Vec<(String, u32)> {
        if self.phase != MinigamePhase::AwaitingInput {
            return Vec::new();
        }
        (0..self.connections.len())
            .filter_map(|idx| u32::try_from(idx).ok())
            .map(|value| (format!("Toggle wire {}", value + 1), value))
            .collect()
    }
}

/// Repeat a growing sequence of symbols; one mistake ends the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecall {
    /// Full sequence for the last stage; stage `n` uses its prefix.
    pub target: Vec<u32>,
    /// One-based stage number.
    pub stage: u32,
    pub position: usize,
    pub phase: MinigamePhase,
    pub score: u32,
}

impl SequenceRecall {
    pub fn generate(rng: &mut Mulberry32) -> Self {
        let length = SEQUENCE_BASE_LENGTH + SEQUENCE_STAGES as usize - 1;
        let target = (0..length)
            .map(|_| rng.gen_range(0..SEQUENCE_SYMBOLS))
            .collect();
        Self::with_target(target)
    }

    #[must_use]
    pub const fn with_target(target: Vec<u32>) -> Self {
        Self {
            target,
            stage: 1,
            position: 0,
            phase: MinigamePhase::Presenting,
            score: 0,
        }
    }

    /// Symbols the player must repeat in the current stage.
    #[must_use]
    pub fn current_sequence(&self) -> &[u32] {
        let len = (SEQUENCE_BASE_LENGTH + self.stage.saturating_sub(1) as usize).min(self.target.len());
        &self.target[..len]
    }

    fn symbol_name(symbol: u32) -> &'static str {
        usize::try_from(symbol)
            .ok()
            .and_then(|idx| SYMBOL_NAMES.get(idx).copied())
            .unwrap_or("?")
    }
}

impl Minigame for SequenceRecall {
    fn kind(&self) -> MinigameKind {
        MinigameKind::SequenceRecall
    }

    fn phase(&self) -> MinigamePhase {
        self.phase
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn ready(&mut self) -> bool {
        if self.phase != MinigamePhase::Presenting {
            return false;
        }
        self.phase = MinigamePhase::AwaitingInput;
        self.position = 0;
        true
    }

    fn input(&mut self, value: u32) -> InputResult {
        if self.phase != MinigamePhase::AwaitingInput || value >= SEQUENCE_SYMBOLS {
            return InputResult::Rejected;
        }
        let expected = self.current_sequence().get(self.position).copied();
        if expected != Some(value) {
            self.phase = MinigamePhase::Scored;
            return InputResult::Finished;
        }
        self.position += 1;
        if self.position < self.current_sequence().len() {
            return InputResult::Continue;
        }
        self.score += SEQUENCE_STAGE_POINTS;
        if self.stage >= SEQUENCE_STAGES {
            self.phase = MinigamePhase::Scored;
            return InputResult::Finished;
        }
        self.stage += 1;
        self.position = 0;
        self.phase = MinigamePhase::Presenting;
        InputResult::Continue
    }

    fn prompt(&self) -> String {
        match self.phase {
            MinigamePhase::Presenting => {
                let shown = self
                    .current_sequence()
                    .iter()
                    .map(|symbol| Self::symbol_name(*symbol))
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("Stage {}: memorize the order: {shown}", self.stage)
            }
            MinigamePhase::AwaitingInput => format!(
                "Stage {}: repeat the order ({} of {})",
                self.stage,
                self.position + 1,
                self.current_sequence().len()
            ),
            MinigamePhase::NotStarted | MinigamePhase::Scored => {
                MinigameKind::SequenceRecall.description().to_string()
            }
        }
    }

    fn inputs(&self) -> Vec<(String, u32)> {
        if self.phase != MinigamePhase::AwaitingInput {
            return Vec::new();
        }
        (0..SEQUENCE_SYMBOLS)
            .map(|symbol| (Self::symbol_name(symbol).to_string(), symbol))
            .collect()
    }
}

/// Effects granted when a minigame ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reward {
    pub effects: Effects,
    pub message: String,
}

#[must_use]
pub fn calculate_reward(kind: MinigameKind, score: u32) -> Reward {
    let effects = match kind {
        MinigameKind::CircuitBoard if score >= MINIGAME_PERFECT_SCORE => {
            Effects::stat(StatKind::Logic, 15).plus(Effects::stat(StatKind::Skill, 10))
        }
        MinigameKind::CircuitBoard => Effects::stat(StatKind::Logic, 5),
        MinigameKind::SequenceRecall if score >= MINIGAME_PERFECT_SCORE => {
            Effects::stat(StatKind::Concentration, 10).plus(Effects::stat(StatKind::Skill, 5))
        }
        MinigameKind::SequenceRecall if score >= 60 => Effects::stat(StatKind::Concentration, 6),
        MinigameKind::SequenceRecall if score >= 20 => Effects::stat(StatKind::Concentration, 3),
        MinigameKind::SequenceRecall => Effects::stat(StatKind::Concentration, 1),
    };
    let headline = match kind {
        MinigameKind::CircuitBoard if score >= MINIGAME_PERFECT_SCORE => "A flawless circuit!".to_string(),
        MinigameKind::CircuitBoard => "You patched the circuit together.".to_string(),
        MinigameKind::SequenceRecall => format!("You recalled the sequence for {score} points."),
    };
    Reward {
        message: format!("{headline} ({})", effects.describe()),
        effects,
    }
}
