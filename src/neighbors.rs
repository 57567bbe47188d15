use avian3d::prelude::LinearVelocity;
use bevy::{ecs::query::QueryData, prelude::*};
use itertools::Itertools;

use crate::{
    agent::{AgentState, Peer, SwarmController},
    parameters::SwarmParameters,
};

/// Every [Peer] in the world, captured once per tick before any agent
/// steers. Agents read this snapshot instead of each other's components,
/// so no agent sees a peer half way through an update. Entries are
/// ordered by entity.
#[derive(Resource, Debug, Default, Clone)]
pub struct Roster {
    peers: Vec<AgentState>,
}

impl Roster {
    pub fn new(peers: impl IntoIterator<Item = AgentState>) -> Self {
        Self {
            peers: peers.into_iter().sorted_by_key(|peer| peer.entity).collect(),
        }
    }

    pub fn peers(&self) -> &[AgentState] {
        &self.peers
    }

    pub fn get(&self, entity: Entity) -> Option<&AgentState> {
        self.peers.iter().find(|peer| peer.entity == entity)
    }

    /// Peers of the same kind as `agent`, other than itself, strictly
    /// closer than `threshold`. Peers sharing its exact position are
    /// skipped.
    pub fn neighbors(&self, agent: &AgentState, threshold: f32) -> NeighborSet<'_> {
        let neighbors = self
            .peers
            .iter()
            .filter(|peer| peer.kind == agent.kind && peer.entity != agent.entity)
            .filter_map(|peer| {
                let offset = agent.position - peer.position;
                let distance = offset.length();
                (distance > 0.0 && distance < threshold).then_some(ComputedNeighbor {
                    state: peer,
                    offset,
                    distance,
                })
            })
            .collect();
        NeighborSet { neighbors }
    }
}

/// A peer within range of an agent, with the offset pointing from the
/// peer to the agent.
#[derive(Debug, Copy, Clone)]
pub struct ComputedNeighbor<'a> {
    pub state: &'a AgentState,
    pub offset: Vec3,
    pub distance: f32,
}

/// The neighbors of one agent within one radius.
#[derive(Debug, Default, Clone)]
pub struct NeighborSet<'a> {
    neighbors: Vec<ComputedNeighbor<'a>>,
}

impl<'a> NeighborSet<'a> {
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComputedNeighbor<'a>> {
        self.neighbors.iter()
    }

    /// Mean of `value` over all neighbors, or `None` if there are none.
    pub(crate) fn mean(&self, value: impl Fn(&ComputedNeighbor<'a>) -> Vec3) -> Option<Vec3> {
        if self.is_empty() {
            return None;
        }
        let sum: Vec3 = self.neighbors.iter().map(value).sum();
        Some(sum / self.len() as f32)
    }
}

#[derive(QueryData)]
pub(crate) struct UpdateRosterPeerQuery {
    entity: Entity,
    peer: &'static Peer,
    transform: &'static GlobalTransform,
    velocity: Option<&'static LinearVelocity>,
}

pub(crate) fn update_roster(mut roster: ResMut<Roster>, peers: Query<UpdateRosterPeerQuery>) {
    *roster = Roster::new(peers.iter().map(|peer| AgentState {
        entity: peer.entity,
        kind: peer.peer.kind,
        position: peer.transform.translation(),
        velocity: peer.velocity.map(|v| v.0).unwrap_or_default(),
    }));
}

/// Draw gizmos in the scene to visualize each agent's communication and
/// separation radii.
pub(crate) fn debug_neighborhoods(
    mut gizmos: Gizmos,
    agent_query: Query<(&SwarmController, &GlobalTransform)>,
) {
    const COMM_COLOR: Color = Color::srgba(0.0, 1.0, 1.0, 0.3);
    const SEPARATION_COLOR: Color = Color::srgb(1.0, 1.0, 0.0);

    for (controller, transform) in agent_query.iter() {
        let SwarmParameters {
            comm_distance,
            desired_separation,
            ..
        } = controller.parameters;
        let position = transform.translation();
        gizmos.sphere(position, comm_distance, COMM_COLOR);
        gizmos.sphere(position, desired_separation, SEPARATION_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::PeerKind;
    use bevy::{
        MinimalPlugins, ecs::system::RunSystemOnce, prelude::App, transform::TransformPlugin,
    };

    fn state(world: &mut World, position: Vec3) -> AgentState {
        AgentState {
            entity: world.spawn_empty().id(),
            kind: PeerKind::Uav,
            position,
            velocity: Vec3::ZERO,
        }
    }

    #[test]
    fn test_neighbors_exclude_self_and_far_peers() {
        let mut world = World::new();
        let me = state(&mut world, Vec3::ZERO);
        let near = state(&mut world, Vec3::new(100.0, 0.0, 0.0));
        let far = state(&mut world, Vec3::new(0.0, 2000.0, 0.0));
        let roster = Roster::new([me, near, far]);

        let neighbors = roster.neighbors(&me, 1000.0);
        assert_eq!(neighbors.len(), 1);
        let neighbor = neighbors.iter().next().unwrap();
        assert_eq!(neighbor.state.entity, near.entity);
        assert_eq!(neighbor.distance, 100.0);
        assert_eq!(neighbor.offset, Vec3::new(-100.0, 0.0, 0.0));
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut world = World::new();
        let me = state(&mut world, Vec3::ZERO);
        let on_edge = state(&mut world, Vec3::new(1000.0, 0.0, 0.0));
        let inside = state(&mut world, Vec3::new(0.0, 999.9, 0.0));
        let roster = Roster::new([me, on_edge, inside]);

        let neighbors = roster.neighbors(&me, 1000.0);
        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors.iter().next().unwrap().state.entity, inside.entity);
    }

    #[test]
    fn test_coincident_peer_is_skipped() {
        let mut world = World::new();
        let me = state(&mut world, Vec3::new(5.0, 5.0, -100.0));
        let twin = state(&mut world, Vec3::new(5.0, 5.0, -100.0));
        let roster = Roster::new([me, twin]);
        assert!(roster.neighbors(&me, 1000.0).is_empty());
    }

    #[test]
    fn test_other_kinds_are_ignored() {
        let mut world = World::new();
        let me = state(&mut world, Vec3::ZERO);
        let mut airliner = state(&mut world, Vec3::new(10.0, 0.0, 0.0));
        airliner.kind = PeerKind::Aircraft;
        let roster = Roster::new([me, airliner]);
        assert!(roster.neighbors(&me, 1000.0).is_empty());
    }

    #[test]
    fn test_mean_of_empty_set() {
        let neighbors = NeighborSet::default();
        assert_eq!(neighbors.mean(|n| n.offset), None);
    }

    #[test]
    fn test_update_roster() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, TransformPlugin));
        app.init_resource::<Roster>();
        let uav = app
            .world_mut()
            .spawn((
                Peer::new(PeerKind::Uav),
                Transform::from_xyz(1.0, 2.0, -300.0),
                LinearVelocity(Vec3::new(50.0, 0.0, 0.0)),
            ))
            .id();
        let tower = app
            .world_mut()
            .spawn((Peer::new(PeerKind::GroundVehicle), Transform::default()))
            .id();
        // Not a peer, never in the roster
        app.world_mut().spawn(Transform::default());
        app.update();

        app.world_mut()
            .run_system_once(update_roster)
            .expect("Failed to run update_roster system");

        let roster = app.world().resource::<Roster>();
        assert_eq!(roster.peers().len(), 2);
        let uav_state = roster.get(uav).unwrap();
        assert_eq!(uav_state.position, Vec3::new(1.0, 2.0, -300.0));
        assert_eq!(uav_state.velocity, Vec3::new(50.0, 0.0, 0.0));
        assert_eq!(uav_state.altitude(), 300.0);
        let tower_state = roster.get(tower).unwrap();
        assert_eq!(tower_state.kind, PeerKind::GroundVehicle);
        assert_eq!(tower_state.velocity, Vec3::ZERO);
        assert!(
            roster
                .peers()
                .windows(2)
                .all(|pair| pair[0].entity < pair[1].entity)
        );
    }
}
