//! Player commands.
//!
//! Every command validates fully before touching state: an `Err` means
//! nothing changed. Successful commands publish a new snapshot.

use flexport_logic::catalog::ShipType;
use flexport_logic::economy::{sell_refund, upgrade_cost};
use hecs::Entity;
use log::{debug, info};
use thiserror::Error;

use crate::components::*;
use crate::engine::GameEngine;
use crate::generation::{generate_ship_name, player_home_port, spawn_ship};
use crate::systems::dispatch_ship;

/// Capacity multiplier applied by one upgrade.
const UPGRADE_CAPACITY_FACTOR: f64 = 1.2;
/// Speed multiplier applied by one upgrade.
const UPGRADE_SPEED_FACTOR: f64 = 1.1;

/// Why a command was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("insufficient funds: need ${needed:.0}, have ${available:.0}")]
    InsufficientFunds { needed: f64, available: f64 },
    #[error("no such ship: {0}")]
    UnknownShip(ShipId),
    #[error("no such port: {0}")]
    UnknownPort(PortId),
    #[error("no such contract: {0}")]
    UnknownContract(ContractId),
    #[error("{ship} is busy ({state:?})")]
    ShipBusy { ship: ShipId, state: ShipState },
    #[error("{0} cannot be taken")]
    ContractUnavailable(ContractId),
    #[error("{ship} holds {capacity} containers, contract needs {required}")]
    InsufficientCapacity {
        ship: ShipId,
        capacity: u32,
        required: u32,
    },
    #[error("game speed {0} is out of range")]
    InvalidGameSpeed(f64),
    #[error("the game is over")]
    GameOver,
    #[error("no game has been started")]
    NotStarted,
}

impl GameEngine {
    fn ensure_playing(&self) -> Result<(), CommandError> {
        if !self.state.started {
            return Err(CommandError::NotStarted);
        }
        if self.state.is_over() {
            return Err(CommandError::GameOver);
        }
        Ok(())
    }

    fn ensure_funds(&self, needed: f64) -> Result<(), CommandError> {
        if self.state.money < needed {
            return Err(CommandError::InsufficientFunds {
                needed,
                available: self.state.money,
            });
        }
        Ok(())
    }

    fn owned_ship(&self, id: ShipId) -> Result<Entity, CommandError> {
        self.player_ship(id).ok_or(CommandError::UnknownShip(id))
    }

    fn ship_state(&self, entity: Entity) -> ShipState {
        self.world
            .get::<&Status>(entity)
            .map(|s| s.state)
            .unwrap_or(ShipState::Idle)
    }

    /// Pause the simulation. Voyages and timers are kept.
    pub fn pause(&mut self) {
        if !self.state.paused {
            self.state.paused = true;
            debug!("paused at {:.1}s", self.state.game_time);
            self.publish();
        }
    }

    pub fn resume(&mut self) -> Result<(), CommandError> {
        self.ensure_playing()?;
        self.state.paused = false;
        self.publish();
        Ok(())
    }

    pub fn set_game_speed(&mut self, speed: f64) -> Result<(), CommandError> {
        self.ensure_playing()?;
        if !self.config.is_valid_game_speed(speed) {
            return Err(CommandError::InvalidGameSpeed(speed));
        }
        self.state.game_speed = speed;
        self.publish();
        Ok(())
    }

    /// Buy a ship; it spawns idle at the player's home port.
    ///
    /// An empty `name` gets a generated one.
    pub fn purchase_ship(&mut self, ship_type: ShipType, name: &str) -> Result<ShipId, CommandError> {
        self.ensure_playing()?;
        let price = ship_type.spec().price;
        self.ensure_funds(price)?;
        let Some(home) = player_home_port(&self.ports).cloned() else {
            return Err(CommandError::UnknownPort(PortId(0)));
        };

        let name = if name.trim().is_empty() {
            generate_ship_name(&mut self.rng)
        } else {
            name.to_string()
        };
        self.state.money -= price;
        let id = spawn_ship(
            &mut self.world,
            &mut self.state,
            name,
            ship_type,
            Owner::Player,
            &home,
            &self.config,
        );
        info!("purchased {} {} for ${:.0}", ship_type.label(), id, price);
        self.after_fleet_change();
        Ok(id)
    }

    /// Sell a ship for a fraction of its value. Any contract it was working
    /// returns to the market and its cargo is lost.
    pub fn sell_ship(&mut self, id: ShipId) -> Result<f64, CommandError> {
        self.ensure_playing()?;
        let entity = self.owned_ship(id)?;

        let value = self.world.get::<&Ship>(entity).map(|s| s.value).unwrap_or(0.0);
        let contract = self.world.get::<&Assignment>(entity).ok().map(|a| a.contract);
        if let Some(contract) = contract {
            self.contracts.release(contract);
        }
        let refund = sell_refund(value, self.config.sell_refund_fraction);
        self.state.money += refund;
        let _ = self.world.despawn(entity);
        info!("sold {} for ${:.0}", id, refund);
        self.after_fleet_change();
        Ok(refund)
    }

    /// Send an idle ship to the yard; it returns at full condition.
    pub fn repair_ship(&mut self, id: ShipId) -> Result<(), CommandError> {
        self.ensure_playing()?;
        let entity = self.owned_ship(id)?;
        let state = self.ship_state(entity);
        if state != ShipState::Idle {
            return Err(CommandError::ShipBusy { ship: id, state });
        }
        self.ensure_funds(self.config.repair_cost)?;

        self.state.money -= self.config.repair_cost;
        if let Ok(mut status) = self.world.get::<&mut Status>(entity) {
            status.enter(ShipState::Maintenance);
        }
        debug!("{} in maintenance", id);
        self.publish();
        Ok(())
    }

    /// Improve capacity and speed of an idle ship. Returns the price paid.
    pub fn upgrade_ship(&mut self, id: ShipId) -> Result<f64, CommandError> {
        self.ensure_playing()?;
        let entity = self.owned_ship(id)?;
        let state = self.ship_state(entity);
        if state != ShipState::Idle {
            return Err(CommandError::ShipBusy { ship: id, state });
        }
        let value = self.world.get::<&Ship>(entity).map(|s| s.value).unwrap_or(0.0);
        let cost = upgrade_cost(value, self.config.upgrade_cost_fraction);
        self.ensure_funds(cost)?;

        self.state.money -= cost;
        if let Ok(mut ship) = self.world.get::<&mut Ship>(entity) {
            ship.capacity = (ship.capacity as f64 * UPGRADE_CAPACITY_FACTOR).round() as u32;
            ship.speed *= UPGRADE_SPEED_FACTOR;
            ship.value += cost;
            ship.upgrades += 1;
        }
        info!("upgraded {} for ${:.0}", id, cost);
        self.publish();
        Ok(cost)
    }

    /// Sail an idle or loaded ship to `port`.
    pub fn move_ship(&mut self, id: ShipId, port: PortId) -> Result<(), CommandError> {
        self.ensure_playing()?;
        let entity = self.owned_ship(id)?;
        if self.ports.get(port.index()).is_none() {
            return Err(CommandError::UnknownPort(port));
        }
        let state = self.ship_state(entity);
        if !state.can_sail() {
            return Err(CommandError::ShipBusy { ship: id, state });
        }

        dispatch_ship(
            &mut self.world,
            entity,
            port,
            &self.ports,
            self.water.as_ref(),
            &self.config,
        );
        self.after_fleet_change();
        Ok(())
    }

    /// Take an available contract for the player without assigning a ship.
    pub fn accept_contract(&mut self, id: ContractId) -> Result<(), CommandError> {
        self.ensure_playing()?;
        if self.contracts.get(id).is_none() {
            return Err(CommandError::UnknownContract(id));
        }
        if !self.contracts.accept(id, Owner::Player) {
            return Err(CommandError::ContractUnavailable(id));
        }
        info!("accepted {}", id);
        self.publish();
        Ok(())
    }

    /// Put a ship to work on a contract.
    ///
    /// Available contracts are accepted on the spot. An idle ship heads for
    /// the contract's origin (or starts loading if already there); a ship
    /// loaded for this contract heads for its destination.
    pub fn assign_ship_to_contract(
        &mut self,
        ship_id: ShipId,
        contract_id: ContractId,
    ) -> Result<(), CommandError> {
        self.ensure_playing()?;
        let entity = self.owned_ship(ship_id)?;
        let contract = self
            .contracts
            .get(contract_id)
            .cloned()
            .ok_or(CommandError::UnknownContract(contract_id))?;
        for port in [contract.origin, contract.destination] {
            if self.ports.get(port.index()).is_none() {
                return Err(CommandError::UnknownPort(port));
            }
        }

        let takeable = match contract.status {
            ContractStatus::Available => true,
            ContractStatus::Active => {
                contract.holder == Some(Owner::Player)
                    && contract.assigned_ship.map_or(true, |s| s == ship_id)
            }
            ContractStatus::Completed | ContractStatus::Expired => false,
        };
        if !takeable {
            return Err(CommandError::ContractUnavailable(contract_id));
        }

        let state = self.ship_state(entity);
        let current = self.world.get::<&Assignment>(entity).ok().map(|a| a.contract);
        let docked_at = self.world.get::<&Docked>(entity).ok().map(|d| d.port);
        let capacity = self.world.get::<&Ship>(entity).map(|s| s.capacity).unwrap_or(0);

        match state {
            ShipState::Loaded => {
                if current != Some(contract_id) {
                    return Err(CommandError::ShipBusy { ship: ship_id, state });
                }
                dispatch_ship(
                    &mut self.world,
                    entity,
                    contract.destination,
                    &self.ports,
                    self.water.as_ref(),
                    &self.config,
                );
            }
            ShipState::Idle => {
                if capacity < contract.required_capacity {
                    return Err(CommandError::InsufficientCapacity {
                        ship: ship_id,
                        capacity,
                        required: contract.required_capacity,
                    });
                }

                if let Some(previous) = current.filter(|c| *c != contract_id) {
                    self.contracts.unassign(previous, ship_id);
                }
                if contract.is_available() {
                    self.contracts.accept(contract_id, Owner::Player);
                }
                if let Some(c) = self.contracts.get_mut(contract_id) {
                    c.assigned_ship = Some(ship_id);
                }
                let _ = self.world.insert_one(
                    entity,
                    Assignment {
                        contract: contract_id,
                    },
                );

                if docked_at == Some(contract.origin) {
                    if let Ok(mut status) = self.world.get::<&mut Status>(entity) {
                        status.enter(ShipState::Loading);
                    }
                } else {
                    dispatch_ship(
                        &mut self.world,
                        entity,
                        contract.origin,
                        &self.ports,
                        self.water.as_ref(),
                        &self.config,
                    );
                }
            }
            _ => return Err(CommandError::ShipBusy { ship: ship_id, state }),
        }

        info!("{} assigned to {}", ship_id, contract_id);
        self.after_fleet_change();
        Ok(())
    }

    fn after_fleet_change(&mut self) {
        crate::systems::refresh_ports(&self.world, &mut self.ports, &self.contracts);
        self.publish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexport_logic::catalog::CargoType;
    use flexport_logic::config::{GameMode, SimConfig};

    fn started() -> GameEngine {
        let mut engine = GameEngine::new(SimConfig::seeded(7));
        engine.start_game(GameMode::Quick);
        engine
    }

    fn starter(engine: &GameEngine) -> ShipId {
        engine.snapshot().player_fleet().next().unwrap().id
    }

    #[test]
    fn test_commands_before_start_fail() {
        let mut engine = GameEngine::new(SimConfig::seeded(1));
        assert_eq!(
            engine.purchase_ship(ShipType::Bulk, "X"),
            Err(CommandError::NotStarted)
        );
        assert_eq!(engine.resume(), Err(CommandError::NotStarted));
        let speed = engine.state.game_speed;
        assert_eq!(engine.set_game_speed(2.0), Err(CommandError::NotStarted));
        assert_eq!(engine.state.game_speed, speed);
    }

    #[test]
    fn test_purchase_deducts_price() {
        let mut engine = started();
        let before = engine.state.money;
        let id = engine.purchase_ship(ShipType::Bulk, "Bulky").unwrap();
        assert_eq!(engine.state.money, before - ShipType::Bulk.spec().price);
        let view = engine.snapshot().ship(id).cloned().unwrap();
        assert_eq!(view.name, "Bulky");
        assert_eq!(view.status, ShipState::Idle);
    }

    #[test]
    fn test_purchase_without_funds_changes_nothing() {
        let mut engine = started();
        engine.state.money = 1_000.0;
        let ships = engine.ship_count(Owner::Player);
        let err = engine.purchase_ship(ShipType::CargoPlane, "").unwrap_err();
        assert!(matches!(err, CommandError::InsufficientFunds { .. }));
        assert_eq!(engine.state.money, 1_000.0);
        assert_eq!(engine.ship_count(Owner::Player), ships);
    }

    #[test]
    fn test_empty_name_is_generated() {
        let mut engine = started();
        let id = engine.purchase_ship(ShipType::Tanker, "  ").unwrap();
        let name = engine.snapshot().ship(id).unwrap().name.clone();
        assert!(!name.trim().is_empty());
    }

    #[test]
    fn test_sell_refunds_and_removes() {
        let mut engine = started();
        let id = starter(&engine);
        let before = engine.state.money;
        let refund = engine.sell_ship(id).unwrap();
        assert_eq!(refund, 14_000_000.0);
        assert_eq!(engine.state.money, before + refund);
        assert_eq!(engine.ship_count(Owner::Player), 0);
        assert_eq!(engine.sell_ship(id), Err(CommandError::UnknownShip(id)));
    }

    #[test]
    fn test_cannot_command_rival_ships() {
        let mut engine = started();
        let rival = engine
            .snapshot()
            .fleet
            .iter()
            .find(|s| !s.owner.is_player())
            .unwrap()
            .id;
        assert_eq!(engine.sell_ship(rival), Err(CommandError::UnknownShip(rival)));
        assert_eq!(
            engine.move_ship(rival, PortId(0)),
            Err(CommandError::UnknownShip(rival))
        );
    }

    #[test]
    fn test_repair_requires_idle_and_funds() {
        let mut engine = started();
        let id = starter(&engine);
        engine.move_ship(id, PortId(7)).unwrap();
        assert!(matches!(
            engine.repair_ship(id),
            Err(CommandError::ShipBusy { .. })
        ));

        let mut engine = started();
        let id = starter(&engine);
        engine.state.money = 10.0;
        assert!(matches!(
            engine.repair_ship(id),
            Err(CommandError::InsufficientFunds { .. })
        ));

        engine.state.money = 1_000_000.0;
        engine.repair_ship(id).unwrap();
        assert_eq!(engine.state.money, 500_000.0);
        assert_eq!(
            engine.snapshot().ship(id).unwrap().status,
            ShipState::Maintenance
        );
    }

    #[test]
    fn test_upgrade_improves_ship() {
        let mut engine = started();
        let id = starter(&engine);
        let cost = engine.upgrade_ship(id).unwrap();
        assert_eq!(cost, 5_000_000.0);
        let view = engine.snapshot().ship(id).cloned().unwrap();
        assert_eq!(view.capacity, 240);
        assert!((view.speed - 2.2).abs() < 1e-9);
        assert_eq!(view.value, 25_000_000.0);
    }

    #[test]
    fn test_move_to_unknown_port() {
        let mut engine = started();
        let id = starter(&engine);
        assert_eq!(
            engine.move_ship(id, PortId(999)),
            Err(CommandError::UnknownPort(PortId(999)))
        );
    }

    #[test]
    fn test_invalid_game_speed() {
        let mut engine = started();
        assert_eq!(
            engine.set_game_speed(0.0),
            Err(CommandError::InvalidGameSpeed(0.0))
        );
        assert!(engine.set_game_speed(11.0).is_err());
        assert!(engine.set_game_speed(f64::NAN).is_err());
        engine.set_game_speed(10.0).unwrap();
        assert_eq!(engine.state.game_speed, 10.0);
    }

    #[test]
    fn test_accept_contract_once() {
        let mut engine = started();
        let id = engine.contracts.iter().next().unwrap().id;
        engine.accept_contract(id).unwrap();
        assert_eq!(
            engine.accept_contract(id),
            Err(CommandError::ContractUnavailable(id))
        );
        assert_eq!(
            engine.accept_contract(ContractId(9_999)),
            Err(CommandError::UnknownContract(ContractId(9_999)))
        );
    }

    #[test]
    fn test_assign_checks_capacity() {
        let mut engine = started();
        engine.state.money = 100_000_000.0;
        let plane = engine.purchase_ship(ShipType::CargoPlane, "Jet").unwrap();
        let big = engine
            .contracts
            .iter()
            .find(|c| c.required_capacity > 40)
            .map(|c| c.id);
        if let Some(contract) = big {
            let err = engine.assign_ship_to_contract(plane, contract).unwrap_err();
            assert!(matches!(err, CommandError::InsufficientCapacity { .. }));
            assert!(engine.contracts.get(contract).unwrap().is_available());
        }
    }

    #[test]
    fn test_assign_rejects_contract_with_unknown_port() {
        let mut engine = started();
        let ship = starter(&engine);
        let bad = ContractId(5_000);
        engine.contracts.insert(Contract {
            id: bad,
            client: "Nowhere Freight".to_string(),
            origin: PortId(0),
            destination: PortId(999),
            cargo_type: CargoType::Food,
            quantity: 10,
            payment: 50_000.0,
            deadline: 1.0e9,
            required_capacity: 1,
            status: ContractStatus::Available,
            holder: None,
            assigned_ship: None,
        });

        assert_eq!(
            engine.assign_ship_to_contract(ship, bad),
            Err(CommandError::UnknownPort(PortId(999)))
        );
        let contract = engine.contracts.get(bad).unwrap();
        assert_eq!(contract.status, ContractStatus::Available);
        assert_eq!(contract.assigned_ship, None);
        let entity = engine.owned_ship(ship).unwrap();
        assert!(engine.world.get::<&Assignment>(entity).is_err());
        assert_eq!(engine.ship_state(entity), ShipState::Idle);
    }

    #[test]
    fn test_sell_releases_contract() {
        let mut engine = started();
        let id = starter(&engine);
        let contract = engine.contracts.iter().next().unwrap().id;
        engine.assign_ship_to_contract(id, contract).unwrap();
        assert!(engine.contracts.get(contract).unwrap().is_active());

        engine.sell_ship(id).unwrap();

        let c = engine.contracts.get(contract).unwrap();
        assert!(c.is_available());
        assert_eq!(c.assigned_ship, None);
    }

    #[test]
    fn test_pause_keeps_commands_working() {
        let mut engine = started();
        engine.pause();
        assert!(engine.purchase_ship(ShipType::Bulk, "While Paused").is_ok());
        engine.resume().unwrap();
        assert!(!engine.state.paused);
    }
}
