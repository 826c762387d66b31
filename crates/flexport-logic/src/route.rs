//! Route planning over water.
//!
//! A route is an ordered list of waypoints on a shell: the first entry is
//! the start, the last entry is the destination.
//!
//! Algorithm:
//! 1. If the great-circle arc between the endpoints never touches land, the
//!    direct two-point route is returned
//! 2. Otherwise A* runs over a coarse lat/lon grid of water cells, linking
//!    the endpoints to nearby cells they can see
//! 3. The cell path is string-pulled (keep the farthest visible waypoint)
//!    and thinned toward the waypoint budget without uncovering land
//!
//! Every search is bounded by the grid size; an impossible route degrades to
//! the direct route rather than looping.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::geo::{central_angle, lat_lon_to_position, project_to_shell, slerp, Vec3};
use crate::water::WaterMap;

/// Grid cell size in degrees.
const GRID_CELL_DEG: f64 = 5.0;
/// Maximum arc (degrees) between two water checks along a leg.
const ARC_SAMPLE_DEG: f64 = 0.5;
/// Endpoints link to visible water cells within this arc (degrees).
const LINK_RADIUS_DEG: f64 = 10.0;

/// Direct two-point route (used for air cargo and as the fallback).
pub fn plan_direct_route(start: Vec3, end: Vec3, radius: f64) -> Vec<Vec3> {
    vec![project_to_shell(start, radius), project_to_shell(end, radius)]
}

/// Air cargo ignores the water predicate entirely.
pub fn plan_air_route(start: Vec3, end: Vec3, radius: f64) -> Vec<Vec3> {
    plan_direct_route(start, end, radius)
}

/// Plan a sea route from `start` to `end` on the shell of `radius`.
///
/// `max_waypoints` is a soft bound on the length of the returned list: the
/// route is shortened only while every leg stays clear of land. When both
/// endpoints are over water and a path exists, every waypoint and every
/// leg is over water.
pub fn plan_route(
    start: Vec3,
    end: Vec3,
    radius: f64,
    max_waypoints: usize,
    water: &dyn WaterMap,
) -> Vec<Vec3> {
    let start = project_to_shell(start, radius);
    let end = project_to_shell(end, radius);
    let max_waypoints = max_waypoints.max(2);

    // Land at either end: nothing sensible to search for
    if !water.is_over_water(start) || !water.is_over_water(end) {
        return plan_direct_route(start, end, radius);
    }
    if arc_is_clear(start, end, radius, water) {
        return plan_direct_route(start, end, radius);
    }

    let grid = OceanGrid::build(radius, water);
    match grid.find_path(start, end, radius, water) {
        Some(path) => {
            let mut route = string_pull(&path, radius, water);
            thin(&mut route, max_waypoints, radius, water);
            route
        }
        None => plan_direct_route(start, end, radius),
    }
}

/// True if the great-circle arc from `a` to `b` stays over water.
pub fn arc_is_clear(a: Vec3, b: Vec3, radius: f64, water: &dyn WaterMap) -> bool {
    let arc_deg = central_angle(a, b).to_degrees();
    let samples = (arc_deg / ARC_SAMPLE_DEG).ceil().max(1.0) as usize;
    (1..samples).all(|i| {
        let t = i as f64 / samples as f64;
        water.is_over_water(slerp(a, b, t, radius))
    })
}

/// Total great-circle length of a route on `radius`.
pub fn route_length(waypoints: &[Vec3], radius: f64) -> f64 {
    waypoints
        .windows(2)
        .map(|w| central_angle(w[0], w[1]) * radius)
        .sum()
}

// ── Grid search ─────────────────────────────────────────────────────────

/// Coarse lat/lon grid; each cell is represented by its centre.
struct OceanGrid {
    rows: usize,
    cols: usize,
    centres: Vec<Vec3>,
    wet: Vec<bool>,
}

/// Search node: a grid cell, or one of the two route endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Node {
    Start,
    Cell(usize),
    Goal,
}

/// Min-heap entry ordered by estimated total cost.
struct Frontier {
    estimate: f64,
    node: Node,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.estimate.total_cmp(&other.estimate) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap
        other.estimate.total_cmp(&self.estimate)
    }
}

impl OceanGrid {
    fn build(radius: f64, water: &dyn WaterMap) -> Self {
        let rows = (180.0 / GRID_CELL_DEG) as usize;
        let cols = (360.0 / GRID_CELL_DEG) as usize;
        let mut centres = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let lat = -90.0 + GRID_CELL_DEG * (row as f64 + 0.5);
                let lon = -180.0 + GRID_CELL_DEG * (col as f64 + 0.5);
                centres.push(lat_lon_to_position(lat, lon, radius));
            }
        }
        let wet = centres.iter().map(|c| water.is_over_water(*c)).collect();
        Self {
            rows,
            cols,
            centres,
            wet,
        }
    }

    /// Eight-connected neighbours; longitude wraps, latitude does not.
    fn neighbours(&self, cell: usize) -> Vec<usize> {
        let row = (cell / self.cols) as i64;
        let col = (cell % self.cols) as i64;
        let mut out = Vec::with_capacity(8);
        for dr in -1..=1i64 {
            for dc in -1..=1i64 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let r = row + dr;
                if r < 0 || r >= self.rows as i64 {
                    continue;
                }
                let c = (col + dc).rem_euclid(self.cols as i64);
                out.push(r as usize * self.cols + c as usize);
            }
        }
        out
    }

    /// Wet cells within the link radius that `point` can see directly.
    fn visible_cells(&self, point: Vec3, radius: f64, water: &dyn WaterMap) -> Vec<usize> {
        let link = LINK_RADIUS_DEG.to_radians();
        (0..self.centres.len())
            .filter(|&i| {
                self.wet[i]
                    && central_angle(point, self.centres[i]) <= link
                    && arc_is_clear(point, self.centres[i], radius, water)
            })
            .collect()
    }

    /// A* from `start` to `end` through wet cells. Returns the full point
    /// path including both endpoints.
    fn find_path(
        &self,
        start: Vec3,
        end: Vec3,
        radius: f64,
        water: &dyn WaterMap,
    ) -> Option<Vec<Vec3>> {
        let start_links = self.visible_cells(start, radius, water);
        let goal_links = self.visible_cells(end, radius, water);
        if start_links.is_empty() || goal_links.is_empty() {
            return None;
        }

        let n = self.centres.len();
        // Index n = Start, n + 1 = Goal
        let index = |node: Node| match node {
            Node::Start => n,
            Node::Goal => n + 1,
            Node::Cell(i) => i,
        };
        let position = |node: Node| match node {
            Node::Start => start,
            Node::Goal => end,
            Node::Cell(i) => self.centres[i],
        };
        let mut goal_link = vec![false; n];
        for &i in &goal_links {
            goal_link[i] = true;
        }

        let mut cost = vec![f64::INFINITY; n + 2];
        let mut came_from: Vec<Option<Node>> = vec![None; n + 2];
        let mut closed = vec![false; n + 2];
        let mut frontier = BinaryHeap::new();

        cost[index(Node::Start)] = 0.0;
        frontier.push(Frontier {
            estimate: central_angle(start, end),
            node: Node::Start,
        });

        while let Some(Frontier { node, .. }) = frontier.pop() {
            if node == Node::Goal {
                break;
            }
            let here = index(node);
            if closed[here] {
                continue;
            }
            closed[here] = true;

            let successors: Vec<Node> = match node {
                Node::Start => start_links.iter().map(|&i| Node::Cell(i)).collect(),
                Node::Cell(i) => {
                    let mut s: Vec<Node> = self
                        .neighbours(i)
                        .into_iter()
                        .filter(|&j| self.wet[j])
                        .map(Node::Cell)
                        .collect();
                    if goal_link[i] {
                        s.push(Node::Goal);
                    }
                    s
                }
                Node::Goal => Vec::new(),
            };

            for next in successors {
                let there = index(next);
                if closed[there] {
                    continue;
                }
                // Endpoint links were checked when gathered
                if let (Node::Cell(_), Node::Cell(_)) = (node, next) {
                    if !arc_is_clear(position(node), position(next), radius, water) {
                        continue;
                    }
                }
                let step = central_angle(position(node), position(next));
                let candidate = cost[here] + step;
                if candidate < cost[there] {
                    cost[there] = candidate;
                    came_from[there] = Some(node);
                    frontier.push(Frontier {
                        estimate: candidate + central_angle(position(next), end),
                        node: next,
                    });
                }
            }
        }

        came_from[index(Node::Goal)]?;

        // Reconstruct path
        let mut nodes = vec![Node::Goal];
        let mut current = Node::Goal;
        while let Some(prev) = came_from[index(current)] {
            nodes.push(prev);
            current = prev;
        }
        nodes.reverse();
        Some(nodes.into_iter().map(position).collect())
    }
}

/// Greedy line-of-sight smoothing: from each kept point jump to the farthest
/// later point with a clear arc.
fn string_pull(path: &[Vec3], radius: f64, water: &dyn WaterMap) -> Vec<Vec3> {
    if path.len() <= 2 {
        return path.to_vec();
    }
    let mut out = vec![path[0]];
    let mut i = 0;
    while i < path.len() - 1 {
        let mut j = path.len() - 1;
        while j > i + 1 && !arc_is_clear(path[i], path[j], radius, water) {
            j -= 1;
        }
        out.push(path[j]);
        i = j;
    }
    out
}

/// Drop interior waypoints until the route fits `max_waypoints`.
///
/// A waypoint is only removed when the leg that replaces it stays over
/// water; the cheapest detour goes first. A route that cannot shrink any
/// further is returned over budget.
fn thin(route: &mut Vec<Vec3>, max_waypoints: usize, radius: f64, water: &dyn WaterMap) {
    let detour = |route: &[Vec3], i: usize| {
        central_angle(route[i - 1], route[i]) + central_angle(route[i], route[i + 1])
            - central_angle(route[i - 1], route[i + 1])
    };

    while route.len() > max_waypoints.max(2) {
        let legs: &[Vec3] = route;
        let removable = (1..legs.len() - 1)
            .filter(|&i| arc_is_clear(legs[i - 1], legs[i + 1], radius, water))
            .min_by(|&a, &b| detour(legs, a).total_cmp(&detour(legs, b)));
        match removable {
            Some(i) => {
                route.remove(i);
            }
            None => break,
        }
    }
}
