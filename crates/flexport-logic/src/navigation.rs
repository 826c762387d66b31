//! Movement integrator - advance a vessel along its waypoints on the sphere.
//!
//! Algorithm per tick:
//! 1. Target = waypoint at the cursor, or the destination once the list is used up
//! 2. Arc distance to target on the vessel's shell
//! 3. Within the arrival threshold → consume the waypoint (or arrive)
//! 4. Otherwise slerp `step / distance` of the way, re-project onto the shell
//! 5. Sea vessels that ended up over land are snapped to the nearest water
//! 6. Heading toward the target is refreshed for rendering

use serde::{Deserialize, Serialize};

use crate::geo::{heading, project_to_shell, slerp, surface_distance, Vec3};
use crate::water::WaterMap;

/// Navigation state carried by a vessel while it is under way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavState {
    pub position: Vec3,
    /// Destination on the vessel's shell. Arrival copies it verbatim.
    pub destination: Vec3,
    pub waypoints: Vec<Vec3>,
    /// Index of the waypoint currently being steered toward.
    pub cursor: usize,
    /// Compass heading in radians, render-only.
    pub heading: f64,
}

impl NavState {
    pub fn new(position: Vec3, destination: Vec3, waypoints: Vec<Vec3>) -> Self {
        let mut nav = Self {
            position,
            destination,
            waypoints,
            cursor: 0,
            heading: 0.0,
        };
        nav.heading = heading(nav.position, nav.target());
        nav
    }

    /// Current steering target.
    pub fn target(&self) -> Vec3 {
        self.waypoints
            .get(self.cursor)
            .copied()
            .unwrap_or(self.destination)
    }

    /// True once every waypoint has been consumed or the cursor sits on the last one.
    pub fn on_final_leg(&self) -> bool {
        self.cursor + 1 >= self.waypoints.len()
    }
}

/// Physical parameters for one advance call.
#[derive(Debug, Clone, Copy)]
pub struct MotionParams {
    /// World units per second.
    pub speed: f64,
    /// Radius of the vessel's shell (`WORLD_RADIUS + altitude`).
    pub shell_radius: f64,
    /// Air cargo skips the water correction.
    pub airborne: bool,
    /// Distance under which a waypoint counts as reached.
    pub arrival_threshold: f64,
}

/// What happened during one advance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Still travelling toward the current target.
    Moving { travelled: f64 },
    /// An intermediate waypoint was reached and the cursor advanced.
    WaypointReached,
    /// The destination was reached; position snapped exactly to it.
    Arrived,
}

/// Advance `nav` by one tick.
pub fn advance(
    nav: &mut NavState,
    params: &MotionParams,
    delta_seconds: f64,
    game_speed: f64,
    water: &dyn WaterMap,
) -> StepOutcome {
    let radius = params.shell_radius;
    let target = nav.target();
    let distance = surface_distance(nav.position, target, radius);

    if distance < params.arrival_threshold {
        if !nav.on_final_leg() {
            nav.position = project_to_shell(target, radius);
            nav.cursor += 1;
            nav.heading = heading(nav.position, nav.target());
            return StepOutcome::WaypointReached;
        }
        nav.position = nav.destination;
        nav.cursor = nav.waypoints.len();
        return StepOutcome::Arrived;
    }

    let step = (params.speed * delta_seconds * game_speed).max(0.0);
    if step <= 0.0 {
        return StepOutcome::Moving { travelled: 0.0 };
    }
    let fraction = (step / distance).min(1.0);
    let mut next = slerp(nav.position, target, fraction, radius);

    if !params.airborne && !water.is_over_water(next) {
        next = project_to_shell(water.nearest_water(next), radius);
    }

    let travelled = surface_distance(nav.position, next, radius);
    nav.heading = heading(next, target);
    nav.position = next;
    StepOutcome::Moving { travelled }
}
