//! Fleet queries shared by systems and commands.

use flexport_logic::catalog::ShipType;
use flexport_logic::config::SimConfig;
use hecs::{Entity, World};

use crate::components::{Cargo, Owner, Ship, ShipId};

/// Radius of the shell a ship of `ship_type` travels on.
pub fn ship_radius(config: &SimConfig, ship_type: ShipType) -> f64 {
    config.world_radius + ship_type.altitude()
}

/// Entity carrying the ship with `id`, if it still exists.
pub fn find_ship(world: &World, id: ShipId) -> Option<Entity> {
    world
        .query::<&Ship>()
        .iter()
        .find(|(_, ship)| ship.id == id)
        .map(|(entity, _)| entity)
}

/// Aggregate numbers for one owner's fleet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FleetStats {
    pub ships: u32,
    pub capacity: u32,
    pub containers: u32,
    pub value: f64,
}

pub fn fleet_stats(world: &World, owner: Owner) -> FleetStats {
    let mut stats = FleetStats::default();
    for (_, (ship, cargo)) in world.query::<(&Ship, &Cargo)>().iter() {
        if ship.owner != owner {
            continue;
        }
        stats.ships += 1;
        stats.capacity += ship.capacity;
        stats.containers += cargo.len() as u32;
        stats.value += ship.value;
    }
    stats
}
