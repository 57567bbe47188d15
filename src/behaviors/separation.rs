use bevy::prelude::*;

use crate::{agent::AgentState, neighbors::Roster, parameters::SwarmParameters};

/// Push away from peers closer than the desired separation. Each
/// neighbor contributes its offset scaled by `(desired / distance)²`;
/// the contributions are averaged and weighted by the separation factor.
pub(crate) fn steer(agent: &AgentState, roster: &Roster, params: &SwarmParameters) -> Vec3 {
    let desired = params.desired_separation;
    roster
        .neighbors(agent, desired)
        .mean(|neighbor| neighbor.offset * (desired / neighbor.distance).powi(2))
        .map_or(Vec3::ZERO, |away| away * params.separation_factor)
}
