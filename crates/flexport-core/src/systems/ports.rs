//! Port bookkeeping - berth occupancy, staged load and open contracts

use hecs::World;

use crate::components::{Cargo, Docked, Port, Ship};
use crate::systems::ContractBoard;

/// Recompute each port's derived operational state from the world.
pub fn refresh_ports(world: &World, ports: &mut [Port], board: &ContractBoard) {
    for port in ports.iter_mut() {
        port.docked_ships.clear();
        port.contracts.clear();
        port.current_load = 0;
    }

    for (_, (ship, docked, cargo)) in world.query::<(&Ship, &Docked, &Cargo)>().iter() {
        if let Some(port) = ports.get_mut(docked.port.index()) {
            port.docked_ships.push(ship.id);
            port.current_load += cargo.len() as u32;
        }
    }

    for contract in board.iter().filter(|c| c.is_available()) {
        if let Some(port) = ports.get_mut(contract.origin.index()) {
            port.contracts.push(contract.id);
        }
    }

    for port in ports.iter_mut() {
        port.docked_ships.sort();
        port.current_load = port.current_load.min(port.capacity);
        port.available_berths = port.berths.saturating_sub(port.docked_ships.len() as u32);
    }
}
