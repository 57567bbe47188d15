use bevy::prelude::*;

use crate::{agent::AgentState, neighbors::Roster, parameters::SwarmParameters};

/// Match the average velocity of all peers within communication range.
pub(crate) fn steer(agent: &AgentState, roster: &Roster, params: &SwarmParameters) -> Vec3 {
    roster
        .neighbors(agent, params.comm_distance)
        .mean(|neighbor| neighbor.state.velocity)
        .map_or(Vec3::ZERO, |velocity| velocity * params.alignment_factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{agent::PeerKind, parameters::Distance};

    fn peer(world: &mut World, position: Vec3, velocity: Vec3) -> AgentState {
        AgentState {
            entity: world.spawn_empty().id(),
            kind: PeerKind::Uav,
            position,
            velocity,
        }
    }

    #[test]
    fn test_simple_alignment() {
        let mut world = World::new();
        let me = peer(&mut world, Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0));
        let a = peer(&mut world, Vec3::new(300.0, 0.0, 0.0), Vec3::new(40.0, 0.0, 0.0));
        let b = peer(&mut world, Vec3::new(0.0, 300.0, 0.0), Vec3::new(0.0, 20.0, 0.0));
        let roster = Roster::new([me, a, b]);

        let result = steer(&me, &roster, &SwarmParameters::default());
        // Own velocity does not count
        assert_eq!(result, Vec3::new(20.0, 10.0, 0.0));
    }

    #[test]
    fn test_out_of_range_peers_are_ignored() {
        let mut world = World::new();
        let me = peer(&mut world, Vec3::ZERO, Vec3::ZERO);
        let near = peer(&mut world, Vec3::new(100.0, 0.0, 0.0), Vec3::X * 30.0);
        let far = peer(&mut world, Vec3::new(5000.0, 0.0, 0.0), Vec3::Y * 30.0);
        let roster = Roster::new([me, near, far]);

        let params = SwarmParameters::default().with_comm_distance(Distance::meters(5000.0));
        assert_eq!(steer(&me, &roster, &params), Vec3::X * 30.0);
    }

    #[test]
    fn test_doubling_factor_doubles_alignment() {
        let mut world = World::new();
        let me = peer(&mut world, Vec3::ZERO, Vec3::ZERO);
        let a = peer(&mut world, Vec3::new(100.0, 0.0, 0.0), Vec3::new(3.0, 4.0, 0.0));
        let roster = Roster::new([me, a]);

        let base = steer(&me, &roster, &SwarmParameters::default());
        let doubled = steer(
            &me,
            &roster,
            &SwarmParameters::default().with_alignment_factor(2.0),
        );
        assert_eq!(doubled, base * 2.0);
        assert_eq!(doubled.length(), 2.0 * base.length());
    }
}
