//! Integration tests for route planning and movement over the built-in map.
//!
//! Exercises: PORTS → plan_route → advance, checking the shell and water
//! invariants along the way.
//!
//! All tests are pure logic: no ECS, no rendering.

use flexport_logic::catalog::{ShipType, PORTS};
use flexport_logic::geo::{lat_lon_to_position, shell_radius, surface_distance, Vec3};
use flexport_logic::navigation::{advance, MotionParams, NavState, StepOutcome};
use flexport_logic::route::{arc_is_clear, plan_air_route, plan_route};
use flexport_logic::water::{RectLandMap, WaterMap};

// ── Helpers ────────────────────────────────────────────────────────────

fn port_position(name: &str, radius: f64) -> Vec3 {
    let p = PORTS
        .iter()
        .find(|p| p.name == name)
        .unwrap_or_else(|| panic!("no port named {}", name));
    lat_lon_to_position(p.lat, p.lon, radius)
}

fn sail(from: &str, to: &str, map: &RectLandMap) -> (NavState, usize) {
    sail_with_budget(from, to, 20, map)
}

fn sail_with_budget(
    from: &str,
    to: &str,
    max_waypoints: usize,
    map: &RectLandMap,
) -> (NavState, usize) {
    let ship = ShipType::Container;
    let radius = shell_radius(ship.altitude());
    let start = port_position(from, radius);
    let end = port_position(to, radius);
    let route = plan_route(start, end, radius, max_waypoints, map);
    let mut nav = NavState::new(start, end, route);
    let params = MotionParams {
        speed: ship.spec().speed,
        shell_radius: radius,
        airborne: false,
        arrival_threshold: 2.0,
    };

    for tick in 0..200_000 {
        let outcome = advance(&mut nav, &params, 0.1, 10.0, map);
        assert!(
            (nav.position.length() - radius).abs() < 1e-6,
            "left the shell at tick {}",
            tick
        );
        assert!(map.is_over_water(nav.position), "on land at tick {}", tick);
        if outcome == StepOutcome::Arrived {
            return (nav, tick);
        }
    }
    panic!("{} -> {} never arrived", from, to);
}

// ── Route shape ────────────────────────────────────────────────────────

#[test]
fn every_port_pair_routes_over_water() {
    let map = RectLandMap::earth();
    let radius = shell_radius(ShipType::Container.altitude());

    for a in PORTS {
        for b in PORTS {
            if a.name == b.name {
                continue;
            }
            let start = lat_lon_to_position(a.lat, a.lon, radius);
            let end = lat_lon_to_position(b.lat, b.lon, radius);
            let route = plan_route(start, end, radius, 20, &map);

            assert!(!route.is_empty());
            let last = route.last().copied().unwrap_or(start);
            assert!(last.distance(&end) < 1e-6, "{} -> {} ends elsewhere", a.name, b.name);
            for wp in &route {
                assert!(map.is_over_water(*wp), "{} -> {} crosses land", a.name, b.name);
                assert!((wp.length() - radius).abs() < 1e-6);
            }
            for leg in route.windows(2) {
                assert!(
                    arc_is_clear(leg[0], leg[1], radius, &map),
                    "{} -> {} leg crosses land",
                    a.name,
                    b.name
                );
            }
        }
    }
}

#[test]
fn tight_budget_keeps_every_leg_over_water() {
    let map = RectLandMap::earth();
    let radius = shell_radius(ShipType::Container.altitude());

    for budget in [2, 3, 4, 6] {
        for a in PORTS {
            for b in PORTS {
                if a.name == b.name {
                    continue;
                }
                let start = lat_lon_to_position(a.lat, a.lon, radius);
                let end = lat_lon_to_position(b.lat, b.lon, radius);
                let route = plan_route(start, end, radius, budget, &map);
                for leg in route.windows(2) {
                    assert!(
                        arc_is_clear(leg[0], leg[1], radius, &map),
                        "{} -> {} at budget {} crosses land",
                        a.name,
                        b.name,
                        budget
                    );
                }
            }
        }
    }
}

#[test]
fn air_routes_ignore_land() {
    let radius = shell_radius(ShipType::CargoPlane.altitude());
    let start = port_position("Rotterdam", radius);
    let end = port_position("Singapore", radius);
    let route = plan_air_route(start, end, radius);
    assert_eq!(route.len(), 2);
    assert!(route[1].distance(&end) < 1e-9);
}

// ── Sailing ────────────────────────────────────────────────────────────

#[test]
fn pacific_crossing_arrives_on_water() {
    let map = RectLandMap::earth();
    let (nav, _) = sail("Los Angeles", "Shanghai", &map);
    let radius = shell_radius(ShipType::Container.altitude());
    assert_eq!(nav.position, port_position("Shanghai", radius));
}

#[test]
fn every_port_pair_arrives_at_minimum_budget() {
    let map = RectLandMap::earth();
    let radius = shell_radius(ShipType::Container.altitude());

    for a in PORTS {
        for b in PORTS {
            if a.name == b.name {
                continue;
            }
            let (nav, _) = sail_with_budget(a.name, b.name, 2, &map);
            assert_eq!(nav.position, port_position(b.name, radius));
        }
    }
}

#[test]
fn short_hop_arrives_quickly() {
    let map = RectLandMap::earth();
    let (_, ticks) = sail("Hong Kong", "Shanghai", &map);
    let radius = shell_radius(ShipType::Container.altitude());
    let direct = surface_distance(
        port_position("Hong Kong", radius),
        port_position("Shanghai", radius),
        radius,
    );
    // 2 units/s × 0.1 s × 10 = 2 units per tick, plus waypoint ticks
    assert!((ticks as f64) < direct / 2.0 + 40.0);
}
