use bevy::prelude::*;

use crate::{agent::AgentState, neighbors::Roster, parameters::SwarmParameters};

/// Move toward the center of mass of all peers within communication
/// range.
pub(crate) fn steer(agent: &AgentState, roster: &Roster, params: &SwarmParameters) -> Vec3 {
    roster
        .neighbors(agent, params.comm_distance)
        .mean(|neighbor| neighbor.state.position)
        .map_or(Vec3::ZERO, |center| (center - agent.position) * params.cohesion_factor)
}
