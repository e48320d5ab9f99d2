//! Patrol routes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Ordered, cyclic list of waypoints.
///
/// An empty route is valid; an agent on it holds position and scans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatrolRoute {
    waypoints: Vec<Vec3>,
}

impl PatrolRoute {
    /// Creates a route from waypoints.
    #[must_use]
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        Self { waypoints }
    }

    /// Creates a route with no waypoints.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the route has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Waypoint at `index`, wrapping around the route.
    #[must_use]
    pub fn waypoint(&self, index: usize) -> Option<Vec3> {
        if self.waypoints.is_empty() {
            return None;
        }
        Some(self.waypoints[index % self.waypoints.len()])
    }

    /// Index following `index`, wrapping around the route.
    #[must_use]
    pub fn next_index(&self, index: usize) -> usize {
        if self.waypoints.is_empty() {
            0
        } else {
            (index + 1) % self.waypoints.len()
        }
    }

    /// All waypoints in order.
    #[must_use]
    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }
}

impl From<Vec<Vec3>> for PatrolRoute {
    fn from(waypoints: Vec<Vec3>) -> Self {
        Self::new(waypoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_wraps() {
        let route = PatrolRoute::new(vec![Vec3::ZERO, Vec3::X, Vec3::Z]);
        assert_eq!(route.waypoint(4), Some(Vec3::X));
        assert_eq!(route.next_index(2), 0);
        assert_eq!(route.next_index(0), 1);
    }

    #[test]
    fn test_empty_route() {
        let route = PatrolRoute::empty();
        assert!(route.is_empty());
        assert_eq!(route.waypoint(3), None);
        assert_eq!(route.next_index(3), 0);
    }
}
