use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::actions::ActionParams;
use crate::state::{GameState, ResourceKind, StatKind};

/// Stat and resource deltas shared by actions, daily events and minigame rewards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Effects {
    #[serde(default)]
    pub logic: i32,
    #[serde(default)]
    pub efficiency: i32,
    #[serde(default)]
    pub skill: i32,
    #[serde(default)]
    pub adaptation: i32,
    #[serde(default)]
    pub concentration: i32,
    #[serde(default)]
    pub parts: i32,
    #[serde(default)]
    pub materials: i32,
    #[serde(default)]
    pub energy: i32,
    #[serde(default)]
    pub rare_parts: i32,
}

impl Effects {
    #[must_use]
    pub fn stat(kind: StatKind, delta: i32) -> Self {
        let mut effects = Self::default();
        *effects.stat_slot(kind) = delta;
        effects
    }

    #[must_use]
    pub fn resource(kind: ResourceKind, delta: i32) -> Self {
        let mut effects = Self::default();
        *effects.resource_slot(kind) = delta;
        effects
    }

    #[must_use]
    pub const fn stat_delta(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Logic => self.logic,
            StatKind::Efficiency => self.efficiency,
            StatKind::Skill => self.skill,
            StatKind::Adaptation => self.adaptation,
            StatKind::Concentration => self.concentration,
        }
    }

    #[must_use]
    pub const fn resource_delta(&self, kind: ResourceKind) -> i32 {
        match kind {
            ResourceKind::Parts => self.parts,
            ResourceKind::Materials => self.materials,
            ResourceKind::Energy => self.energy,
            ResourceKind::RareParts => self.rare_parts,
        }
    }

    const fn stat_slot(&mut self, kind: StatKind) -> &mut i32 {
        match kind {
            StatKind::Logic => &mut self.logic,
            StatKind::Efficiency => &mut self.efficiency,
            StatKind::Skill => &mut self.skill,
            StatKind::Adaptation => &mut self.adaptation,
            StatKind::Concentration => &mut self.concentration,
        }
    }

    const fn resource_slot(&mut self, kind: ResourceKind) -> &mut i32 {
        match kind {
            ResourceKind::Parts => &mut self.parts,
            ResourceKind::Materials => &mut self.materials,
            ResourceKind::Energy => &mut self.energy,
            ResourceKind::RareParts => &mut self.rare_parts,
        }
    }

    /// Field-wise sum of two effect sets.
    #[must_use]
    pub fn plus(mut self, other: Self) -> Self {
        for kind in StatKind::ALL {
            let slot = self.stat_slot(kind);
            *slot = slot.saturating_add(other.stat_delta(kind));
        }
        for kind in ResourceKind::ALL {
            let slot = self.resource_slot(kind);
            *slot = slot.saturating_add(other.resource_delta(kind));
        }
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply to a state. Resources floor at zero; stats are left unclamped.
    pub fn apply(&self, state: &mut GameState) {
        for kind in StatKind::ALL {
            let delta = self.stat_delta(kind);
            if delta != 0 {
                state.stats.add(kind, delta);
            }
        }
        for kind in ResourceKind::ALL {
            let delta = self.resource_delta(kind);
            if delta != 0 {
                state.resources.add(kind, delta);
            }
        }
    }

    /// Compact summary such as `logic +5, parts -3`.
    #[must_use]
    pub fn describe(&self) -> String {
        let stats = StatKind::ALL
            .iter()
            .map(|kind| (kind.as_str(), self.stat_delta(*kind)));
        let resources = ResourceKind::ALL
            .iter()
            .map(|kind| (kind.label(), self.resource_delta(*kind)));
        stats
            .chain(resources)
            .filter(|(_, delta)| *delta != 0)
            .map(|(label, delta)| format!("{label} {delta:+}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A choice offered on a scenario screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "ActionParams::is_empty")]
    pub params: ActionParams,
}

impl Choice {
    #[must_use]
    pub fn new(label: impl Into<String>, action: &str) -> Self {
        Self {
            label: label.into(),
            action: action.to_string(),
            params: ActionParams::default(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: ActionParams) -> Self {
        self.params = params;
        self
    }
}

/// A narrative screen with its static menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub text: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default, rename = "final")]
    pub is_final: bool,
}

/// Raw container for the scenario content file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScenarioData {
    pub scenarios: BTreeMap<String, Scenario>,
}

impl ScenarioData {
    /// Load scenario data from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid scenario data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ToolId;
    use chrono::NaiveDate;

    #[test]
    fn test_scenario_data_from_json() {
        let json = r#"{
            "scenarios": {
                "intro": {
                    "text": "The workshop hums.",
                    "choices": [
                        { "label": "Tinker", "action": "tinker" },
                        { "label": "Build", "action": "build_tool", "params": { "tool": "toolbox" } }
                    ]
                },
                "game_over_logic": { "text": "Done.", "final": true }
            }
        }"#;

        let data = ScenarioData::from_json(json).unwrap();
        assert_eq!(data.scenarios.len(), 2);
        let intro = &data.scenarios["intro"];
        assert_eq!(intro.choices[0].action, "tinker");
        assert_eq!(intro.choices[1].params.tool, Some(ToolId::Toolbox));
        assert!(data.scenarios["game_over_logic"].is_final);
    }

    #[test]
    fn effects_merge_and_describe() {
        let effects = Effects::stat(StatKind::Logic, 5)
            .plus(Effects::resource(ResourceKind::Parts, -3))
            .plus(Effects::stat(StatKind::Logic, 1));
        assert_eq!(effects.logic, 6);
        assert_eq!(effects.describe(), "logic +6, parts -3");
        assert!(Effects::default().is_empty());
    }

    #[test]
    fn applying_effects_floors_resources_only() {
        let mut state = GameState::fresh(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        let effects = Effects {
            skill: -80,
            energy: -40,
            ..Effects::default()
        };
        effects.apply(&mut state);
        assert_eq!(state.stats.skill, -30);
        assert_eq!(state.resources.energy, 0);
    }
}
