use bevy::prelude::*;
use enum_map::{Enum, EnumMap};
use strum::{Display, EnumIter};

use crate::{
    agent::AgentState,
    behaviors::{alignment, cohesion, separation},
    neighbors::Roster,
    parameters::SwarmParameters,
};

/// Enum representing the three flocking rules.
#[derive(Debug, Copy, Clone, Enum, Hash, PartialEq, Eq, Display, EnumIter)]
pub enum FlockingRule {
    Separation,
    Alignment,
    Cohesion,
}

impl FlockingRule {
    fn steer(self, agent: &AgentState, roster: &Roster, params: &SwarmParameters) -> Vec3 {
        match self {
            FlockingRule::Separation => separation::steer(agent, roster, params),
            FlockingRule::Alignment => alignment::steer(agent, roster, params),
            FlockingRule::Cohesion => cohesion::steer(agent, roster, params),
        }
    }
}

/// The weighted displacement each flocking rule produced for an agent
/// on its last active tick.
#[derive(Component, Default, Debug, Copy, Clone, PartialEq)]
pub struct SteeringOutputs {
    values: EnumMap<FlockingRule, Vec3>,
}

impl SteeringOutputs {
    /// Run every rule for `agent` against this tick's roster.
    pub fn compute(agent: &AgentState, roster: &Roster, params: &SwarmParameters) -> Self {
        Self {
            values: EnumMap::from_fn(|rule: FlockingRule| rule.steer(agent, roster, params)),
        }
    }

    pub fn get(&self, rule: FlockingRule) -> Vec3 {
        self.values[rule]
    }

    /// The combined steering displacement. Each rule already carries its
    /// own weight, so this is a plain sum.
    pub fn net(&self) -> Vec3 {
        self.values.values().copied().sum()
    }
}

/// Debug visualization for the per-rule steering vectors.
pub(crate) fn debug_steering_outputs(
    mut gizmos: Gizmos,
    query: Query<(&GlobalTransform, &SteeringOutputs)>,
) {
    for (transform, outputs) in query.iter() {
        let position = transform.translation();
        for (rule, vector) in outputs.values.iter() {
            let color = match rule {
                FlockingRule::Separation => Color::srgb(1.0, 0.0, 0.0),
                FlockingRule::Alignment => Color::srgb(0.0, 0.0, 1.0),
                FlockingRule::Cohesion => Color::srgb(0.0, 1.0, 0.0),
            };
            gizmos.arrow(position, position + *vector, color);
        }
    }
}
