use bevy::prelude::*;

/// The navigation system of a player. Holds the primary route the
/// autopilot follows.
#[derive(Component, Debug, Default, Clone, Reflect)]
#[reflect(Component)]
pub struct Navigation {
    route: Option<Route>,
}

impl Navigation {
    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn route_mut(&mut self) -> Option<&mut Route> {
        self.route.as_mut()
    }

    pub fn set_route(&mut self, route: Route) {
        self.route = Some(route);
    }

    /// The primary route, created empty if there is none yet.
    pub(crate) fn route_or_default(&mut self) -> &mut Route {
        self.route.get_or_insert_default()
    }
}

/// An ordered list of waypoint entities. The route owns the waypoints
/// inserted into it; whoever else holds a handle must delete it from the
/// route before despawning it.
#[derive(Debug, Default, Clone, PartialEq, Reflect)]
pub struct Route {
    waypoints: Vec<Entity>,
    active: Option<Entity>,
}

impl Route {
    pub fn waypoints(&self) -> &[Entity] {
        &self.waypoints
    }

    /// The waypoint currently being navigated to.
    pub fn active(&self) -> Option<Entity> {
        self.active
    }

    /// Append a waypoint. Inserting a waypoint twice has no effect.
    pub fn insert_waypoint(&mut self, waypoint: Entity) {
        if !self.waypoints.contains(&waypoint) {
            self.waypoints.push(waypoint);
        }
    }

    /// Remove a waypoint, clearing it as the active one if needed.
    /// Returns false if the route did not hold it.
    pub fn delete_waypoint(&mut self, waypoint: Entity) -> bool {
        let Some(index) = self.waypoints.iter().position(|w| *w == waypoint) else {
            return false;
        };
        self.waypoints.remove(index);
        if self.active == Some(waypoint) {
            self.active = None;
        }
        true
    }

    /// Navigate directly to a waypoint on this route, skipping any before
    /// it. Returns false if the route does not hold it.
    pub fn direct_to(&mut self, waypoint: Entity) -> bool {
        if !self.waypoints.contains(&waypoint) {
            return false;
        }
        self.active = Some(waypoint);
        true
    }
}
