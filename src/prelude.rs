pub use crate::{
    agent::{AgentState, Autopilot, Peer, PeerKind, SwarmController, SwarmMode},
    control::{FlockingRule, SteeringOutputs},
    navigation::{Navigation, Route},
    neighbors::{ComputedNeighbor, NeighborSet, Roster},
    parameters::{
        Distance, DistanceUnit, OptionValue, ParameterError, SwarmOption, SwarmParameters,
    },
    plugin::{DebugSwarmPlugin, DebugSwarmSystem, SwarmPlugin, SwarmSystemSet},
    waypoint::{Waypoint, WaypointTarget},
};
