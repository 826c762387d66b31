//! Ship components: identity, kinematics, lifecycle state and cargo.

use flexport_logic::catalog::{CargoType, ShipType};
use flexport_logic::geo::Vec3;
use flexport_logic::navigation::NavState;
use serde::{Deserialize, Serialize};

use super::{ContractId, Owner, PortId, ShipId};

/// Ship identity and physical attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub id: ShipId,
    pub name: String,
    pub ship_type: ShipType,
    pub owner: Owner,
    /// Hold size in containers.
    pub capacity: u32,
    /// World units per second at game speed 1.
    pub speed: f64,
    pub fuel: f64,
    pub fuel_capacity: f64,
    /// Hull condition (0-100).
    pub condition: f64,
    /// Current market value in dollars.
    pub value: f64,
    pub upgrades: u32,
}

impl Ship {
    pub fn new(id: ShipId, name: impl Into<String>, ship_type: ShipType, owner: Owner) -> Self {
        let spec = ship_type.spec();
        Self {
            id,
            name: name.into(),
            ship_type,
            owner,
            capacity: spec.capacity,
            speed: spec.speed,
            fuel: spec.fuel_capacity,
            fuel_capacity: spec.fuel_capacity,
            condition: 100.0,
            value: spec.price,
            upgrades: 0,
        }
    }

    /// Sailing speed after fuel starvation.
    pub fn effective_speed(&self) -> f64 {
        if self.fuel > 0.0 {
            self.speed
        } else {
            self.speed * 0.5
        }
    }

    pub fn wear(&mut self, amount: f64) {
        self.condition = (self.condition - amount).max(0.0);
    }

    pub fn burn_fuel(&mut self, amount: f64) {
        self.fuel = (self.fuel - amount).max(0.0);
    }

    pub fn refuel(&mut self) {
        self.fuel = self.fuel_capacity;
    }
}

/// Position on the ship's shell plus render heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub pos: Vec3,
    /// Radians clockwise from north. Render-only.
    pub heading: f64,
}

impl Position {
    pub fn new(pos: Vec3) -> Self {
        Self { pos, heading: 0.0 }
    }
}

/// Present only while a ship is under way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voyage {
    pub destination: PortId,
    pub nav: NavState,
}

/// Present only while a ship is tied up at a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Docked {
    pub port: PortId,
}

/// Lifecycle state of a ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipState {
    /// Docked with an empty hold.
    Idle,
    Sailing,
    Loading,
    /// Docked with cargo aboard, ready to sail.
    Loaded,
    Unloading,
    Maintenance,
}

impl ShipState {
    /// States in which a ship accepts a move order.
    pub fn can_sail(&self) -> bool {
        matches!(self, ShipState::Idle | ShipState::Loaded)
    }
}

/// Current state and time spent in it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub state: ShipState,
    /// Real seconds (capped per tick) since entering `state`.
    pub elapsed_in_state: f64,
}

impl Status {
    pub fn new(state: ShipState) -> Self {
        Self {
            state,
            elapsed_in_state: 0.0,
        }
    }

    pub fn enter(&mut self, state: ShipState) {
        self.state = state;
        self.elapsed_in_state = 0.0;
    }
}

/// A single container of contract cargo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: u32,
    pub cargo_type: CargoType,
    /// Tonnes.
    pub weight: f64,
    /// Dollars paid to the carrier on delivery.
    pub value: f64,
    pub origin: PortId,
    pub destination: PortId,
    pub contract: ContractId,
}

/// Containers aboard. Always present; empty when the hold is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cargo {
    pub containers: Vec<Container>,
}

impl Cargo {
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn total_value(&self) -> f64 {
        self.containers.iter().map(|c| c.value).sum()
    }
}

/// Contract the ship is working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub contract: ContractId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ship_uses_catalog_spec() {
        let ship = Ship::new(ShipId(1), "Test", ShipType::Tanker, Owner::Player);
        let spec = ShipType::Tanker.spec();
        assert_eq!(ship.capacity, spec.capacity);
        assert_eq!(ship.value, spec.price);
        assert_eq!(ship.fuel, spec.fuel_capacity);
        assert_eq!(ship.condition, 100.0);
    }

    #[test]
    fn test_wear_and_fuel_floor_at_zero() {
        let mut ship = Ship::new(ShipId(1), "Test", ShipType::Container, Owner::Player);
        ship.wear(250.0);
        ship.burn_fuel(1.0e9);
        assert_eq!(ship.condition, 0.0);
        assert_eq!(ship.fuel, 0.0);
        assert!((ship.effective_speed() - ship.speed * 0.5).abs() < 1e-12);
        ship.refuel();
        assert_eq!(ship.fuel, ship.fuel_capacity);
    }

    #[test]
    fn test_status_enter_resets_timer() {
        let mut status = Status::new(ShipState::Loading);
        status.elapsed_in_state = 2.5;
        status.enter(ShipState::Loaded);
        assert_eq!(status.state, ShipState::Loaded);
        assert_eq!(status.elapsed_in_state, 0.0);
    }
}
