//! Movement system - advances sailing ships along their routes

use flexport_logic::config::SimConfig;
use flexport_logic::geo::surface_distance;
use flexport_logic::navigation::{advance, MotionParams, NavState, StepOutcome};
use flexport_logic::route::{plan_air_route, plan_route};
use flexport_logic::water::WaterMap;
use hecs::{Entity, World};
use log::debug;

use crate::components::{Docked, Port, PortId, Position, Ship, ShipState, Status, Voyage};
use crate::systems::ship_radius;

/// A ship that reached the end of its route this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    pub entity: Entity,
    pub port: PortId,
}

/// Advance every sailing ship by one tick. Returns the ships that arrived.
///
/// Wear and fuel burn are charged for the distance actually covered.
pub fn movement_system(
    world: &mut World,
    water: &dyn WaterMap,
    config: &SimConfig,
    delta_seconds: f64,
    game_speed: f64,
) -> Vec<Arrival> {
    let mut updates: Vec<(Entity, NavState, f64)> = Vec::new();
    let mut arrivals = Vec::new();

    // Collect updates (can't mutate while iterating)
    for (entity, (ship, voyage, status)) in world.query::<(&Ship, &Voyage, &Status)>().iter() {
        if status.state != ShipState::Sailing {
            continue;
        }
        let radius = ship_radius(config, ship.ship_type);
        let params = MotionParams {
            speed: ship.effective_speed(),
            shell_radius: radius,
            airborne: ship.ship_type.is_air(),
            arrival_threshold: config.arrival_threshold,
        };

        let mut nav = voyage.nav.clone();
        let before = nav.position;
        let outcome = advance(&mut nav, &params, delta_seconds, game_speed, water);
        let travelled = surface_distance(before, nav.position, radius);

        if outcome == StepOutcome::Arrived {
            arrivals.push(Arrival {
                entity,
                port: voyage.destination,
            });
        }
        updates.push((entity, nav, travelled));
    }

    // Apply updates
    for (entity, nav, travelled) in updates {
        if let Ok(mut pos) = world.get::<&mut Position>(entity) {
            pos.pos = nav.position;
            pos.heading = nav.heading;
        }
        if let Ok(mut ship) = world.get::<&mut Ship>(entity) {
            ship.wear(travelled * config.wear_per_unit);
            ship.burn_fuel(travelled * config.fuel_per_unit);
        }
        if let Ok(mut voyage) = world.get::<&mut Voyage>(entity) {
            voyage.nav = nav;
        }
    }

    arrivals
}

/// Plan a route to `destination` and set the ship sailing.
///
/// Air cargo flies direct; sea vessels get a water route. Returns `false`
/// if the entity is not a ship or the port does not exist.
pub fn dispatch_ship(
    world: &mut World,
    entity: Entity,
    destination: PortId,
    ports: &[Port],
    water: &dyn WaterMap,
    config: &SimConfig,
) -> bool {
    let Some(port) = ports.get(destination.index()) else {
        return false;
    };
    let (ship_type, start) = match world.query_one_mut::<(&Ship, &Position)>(entity) {
        Ok((ship, pos)) => (ship.ship_type, pos.pos),
        Err(_) => return false,
    };

    let radius = ship_radius(config, ship_type);
    let end = port.position_at(radius);
    let route = if ship_type.is_air() {
        plan_air_route(start, end, radius)
    } else {
        plan_route(start, end, radius, config.max_waypoints, water)
    };
    debug!(
        "dispatching {:?} to {} with {} waypoints",
        entity,
        port.name,
        route.len()
    );

    let nav = NavState::new(start, end, route);
    if let Ok(mut pos) = world.get::<&mut Position>(entity) {
        pos.heading = nav.heading;
    }
    if let Ok(mut status) = world.get::<&mut Status>(entity) {
        status.enter(ShipState::Sailing);
    }
    let _ = world.remove_one::<Docked>(entity);
    let _ = world.insert_one(entity, Voyage { destination, nav });
    true
}
