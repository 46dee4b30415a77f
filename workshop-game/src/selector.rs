//! Weighted outcome selection over declarative tables.
//!
//! Selection is pure: callers supply a uniform draw (or the generator) and get
//! back the chosen entry plus a [`DecisionTrace`] for debugging.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::rng::Mulberry32;
use crate::state::{Assistant, GameState, StatKind, ToolId};

/// An entry in a weighted table.
pub trait Weighted {
    fn weight(&self) -> u32;
    fn label(&self) -> &str;
}

/// Eligibility predicate evaluated against the state and an optional assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Always,
    StatAtLeast(StatKind, i32),
    StatAbove(StatKind, i32),
    StatBelow(StatKind, i32),
    ToolBuilt(ToolId),
    AnyToolBuilt,
    RoomForAssistant,
    NoPendingEvent,
    /// Assistant reliability strictly below the bound; false without an assistant.
    TrustBelow(i32),
    All(&'static [Condition]),
}

impl Condition {
    #[must_use]
    pub fn evaluate(&self, state: &GameState, assistant: Option<&Assistant>) -> bool {
        match *self {
            Self::Always => true,
            Self::StatAtLeast(kind, bound) => state.stat(kind) >= bound,
            Self::StatAbove(kind, bound) => state.stat(kind) > bound,
            Self::StatBelow(kind, bound) => state.stat(kind) < bound,
            Self::ToolBuilt(id) => state.is_built(id),
            Self::AnyToolBuilt => state.any_tool_built(),
            Self::RoomForAssistant => state.has_room_for_assistant(),
            Self::NoPendingEvent => state.pending_event.is_none(),
            Self::TrustBelow(bound) => assistant.is_some_and(|a| a.reliability < bound),
            Self::All(conditions) => conditions
                .iter()
                .all(|condition| condition.evaluate(state, assistant)),
        }
    }
}

/// Candidate weight captured during selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedCandidate {
    pub id: String,
    pub weight: u32,
}

/// Explainability record for one weighted draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTrace {
    /// Identifier for the table drawn from (e.g. `daily.events`).
    pub pool_id: String,
    /// Uniform draw in `[0, 1)` used for the pick.
    pub roll: f64,
    /// Eligible candidates in table order.
    pub candidates: Vec<WeightedCandidate>,
    pub chosen_id: String,
    /// Set when nothing was eligible and the first entry was returned.
    pub fallback: bool,
}

/// Result of a weighted draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a, T> {
    pub entry: &'a T,
    pub index: usize,
    pub roll: f64,
    pub fallback: bool,
    pub trace: DecisionTrace,
}

/// Pick from the eligible entries of `pool` with a caller-supplied uniform roll.
///
/// The roll is scaled by the total eligible weight and the first entry whose
/// running cumulative weight reaches it wins (inclusive upper bound). Returns
/// `None` when no eligible entry carries weight.
pub fn pick_by_roll<'a, T, F>(
    pool_id: &str,
    pool: &'a [T],
    eligible: F,
    unit_roll: f64,
) -> Option<Selection<'a, T>>
where
    T: Weighted,
    F: Fn(&T) -> bool,
{
    let weighted: Vec<(usize, &T)> = pool
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.weight() > 0 && eligible(*entry))
        .collect();
    let total: u32 = weighted.iter().map(|(_, entry)| entry.weight()).sum();
    if total == 0 {
        return None;
    }

    let target = unit_roll.clamp(0.0, 1.0) * f64::from(total);
    let mut cumulative = 0.0;
    let mut chosen = weighted.last().copied();
    for (idx, entry) in &weighted {
        cumulative += f64::from(entry.weight());
        if cumulative >= target {
            chosen = Some((*idx, *entry));
            break;
        }
    }

    let (index, entry) = chosen?;
    let trace = DecisionTrace {
        pool_id: pool_id.to_string(),
        roll: unit_roll,
        candidates: weighted
            .iter()
            .map(|(_, candidate)| WeightedCandidate {
                id: candidate.label().to_string(),
                weight: candidate.weight(),
            })
            .collect(),
        chosen_id: entry.label().to_string(),
        fallback: false,
    };
    debug!(
        "weighted pick | pool {} roll {:.4} chosen {} of {} candidates",
        trace.pool_id,
        trace.roll,
        trace.chosen_id,
        trace.candidates.len()
    );
    Some(Selection {
        entry,
        index,
        roll: unit_roll,
        fallback: false,
        trace,
    })
}

/// Draw once from `rng` and pick; when nothing is eligible fall back to the
/// first entry in table order. `None` only for an empty pool.
pub fn pick_or_first<'a, T, F>(
    pool_id: &str,
    pool: &'a [T],
    eligible: F,
    rng: &mut Mulberry32,
) -> Option<Selection<'a, T>>
where
    T: Weighted,
    F: Fn(&T) -> bool,
{
    let roll = rng.next_unit();
    if let Some(selection) = pick_by_roll(pool_id, pool, eligible, roll) {
        return Some(selection);
    }
    let entry = pool.first()?;
    debug!(
        "weighted pick | pool {pool_id} had no eligible entries, falling back to {}",
        entry.label()
    );
    Some(Selection {
        entry,
        index: 0,
        roll,
        fallback: true,
        trace: DecisionTrace {
            pool_id: pool_id.to_string(),
            roll,
            candidates: Vec::new(),
            chosen_id: entry.label().to_string(),
            fallback: true,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct Entry(&'static str, u32);

    impl Weighted for Entry {
        fn weight(&self) -> u32 {
            self.1
        }
        fn label(&self) -> &str {
            self.0
        }
    }

    const TINKER: [Entry; 4] = [
        Entry("skill_up", 30),
        Entry("adapt", 25),
        Entry("lose_parts", 20),
        Entry("efficiency_down", 15),
    ];

    fn label_for(roll: f64) -> &'static str {
        pick_by_roll("test", &TINKER, |_| true, roll).unwrap().entry.0
    }

    #[test]
    fn bands_follow_cumulative_weights() {
        assert_eq!(label_for(0.0), "skill_up");
        assert_eq!(label_for(0.5), "adapt");
        assert_eq!(label_for(0.7), "lose_parts");
        assert_eq!(label_for(0.99), "efficiency_down");
    }

    #[test]
    fn upper_bound_is_inclusive() {
        let pool = [Entry("a", 1), Entry("b", 1), Entry("c", 2)];
        let pick = |roll| pick_by_roll("test", &pool, |_| true, roll).unwrap().entry.0;
        assert_eq!(pick(0.25), "a");
        assert_eq!(pick(0.5), "b");
        assert_eq!(pick(0.75), "c");
    }

    #[test]
    fn ineligible_entries_are_skipped() {
        let selection = pick_by_roll("test", &TINKER, |entry| entry.0 != "skill_up", 0.0).unwrap();
        assert_eq!(selection.entry.0, "adapt");
        assert_eq!(selection.index, 1);
        assert_eq!(selection.trace.candidates.len(), 3);
        assert!(pick_by_roll("test", &TINKER, |_| false, 0.3).is_none());
    }

    #[test]
    fn pick_or_first_falls_back_in_table_order() {
        let mut rng = Mulberry32::new(3);
        let selection = pick_or_first("test", &TINKER, |_| false, &mut rng).unwrap();
        assert!(selection.fallback);
        assert_eq!(selection.entry.0, "skill_up");

        let empty: [Entry; 0] = [];
        assert!(pick_or_first("test", &empty, |_| true, &mut rng).is_none());
    }

    #[test]
    fn pick_or_first_consumes_exactly_one_draw() {
        let mut rng = Mulberry32::new(11);
        let mut expected = Mulberry32::new(11);
        let roll = expected.next_unit();
        let selection = pick_or_first("test", &TINKER, |_| true, &mut rng).unwrap();
        assert!((selection.roll - roll).abs() < f64::EPSILON);
        assert_eq!(rng, expected);
    }

    #[test]
    fn conditions_read_state_and_assistant() {
        let mut state = GameState::fresh(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        state.stats.concentration = 61;
        assert!(Condition::StatAbove(StatKind::Concentration, 60).evaluate(&state, None));
        assert!(!Condition::StatBelow(StatKind::Concentration, 40).evaluate(&state, None));
        assert!(Condition::StatAtLeast(StatKind::Logic, 50).evaluate(&state, None));
        assert!(!Condition::AnyToolBuilt.evaluate(&state, None));
        assert!(Condition::RoomForAssistant.evaluate(&state, None));

        let neo = state.assistant("neo").cloned();
        assert!(Condition::TrustBelow(80).evaluate(&state, neo.as_ref()));
        assert!(!Condition::TrustBelow(80).evaluate(&state, None));

        const BOTH: &[Condition] = &[Condition::NoPendingEvent, Condition::ToolBuilt(ToolId::Toolbox)];
        assert!(!Condition::All(BOTH).evaluate(&state, None));
        if let Some(tool) = state.tools.get_mut(&ToolId::Toolbox) {
            tool.construct();
        }
        assert!(Condition::All(BOTH).evaluate(&state, None));
    }
}
