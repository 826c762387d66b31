//! Cargo state machine - docking, loading, unloading and repairs
//!
//! ```text
//! Idle ──move/assign──▶ Sailing ──arrive at origin, empty──▶ Loading ──▶ Loaded
//!   ▲                      │                                              │
//!   │                      └──arrive at destination, loaded──▶ Unloading ─┤
//!   └──── Maintenance ◀──repair── Idle          Loaded ──move/assign──▶ Sailing
//! ```
//!
//! Loading, unloading and repairs complete after a fixed number of real
//! seconds counted in `Status::elapsed_in_state`.

use flexport_logic::config::SimConfig;
use flexport_logic::economy::{containers_for_quantity, reputation_after_delivery, split_payment};
use hecs::{Entity, World};
use log::{debug, info};

use crate::components::{
    Assignment, Cargo, Competitor, Container, Contract, Docked, GameState, Owner, PortId, Ship,
    ShipId, ShipState, Status, Voyage,
};
use crate::systems::{credit, Arrival, ContractBoard};

/// State a ship enters when it docks at `port`.
pub fn state_on_arrival(
    ship: ShipId,
    port: PortId,
    cargo_empty: bool,
    contract: Option<&Contract>,
) -> ShipState {
    if let Some(c) = contract {
        if c.is_active() && c.assigned_ship == Some(ship) {
            if cargo_empty && c.origin == port {
                return ShipState::Loading;
            }
            if !cargo_empty && c.destination == port {
                return ShipState::Unloading;
            }
        }
    }
    if cargo_empty {
        ShipState::Idle
    } else {
        ShipState::Loaded
    }
}

/// Dock every arrived ship and pick its next state.
pub fn handle_arrivals(world: &mut World, arrivals: &[Arrival], board: &ContractBoard) {
    for arrival in arrivals {
        let next = {
            let Ok((ship, cargo, assignment)) = world
                .query_one_mut::<(&Ship, &Cargo, Option<&Assignment>)>(arrival.entity)
            else {
                continue;
            };
            let contract = assignment.and_then(|a| board.get(a.contract));
            state_on_arrival(ship.id, arrival.port, cargo.is_empty(), contract)
        };

        if let Ok(mut ship) = world.get::<&mut Ship>(arrival.entity) {
            ship.refuel();
            debug!("{} docked at {} -> {:?}", ship.id, arrival.port, next);
        }
        if let Ok(mut status) = world.get::<&mut Status>(arrival.entity) {
            status.enter(next);
        }
        let _ = world.remove_one::<Voyage>(arrival.entity);
        let _ = world.insert_one(arrival.entity, Docked { port: arrival.port });
    }
}

/// Fill the hold of a ship docked at its contract's origin.
///
/// Containers are the contract quantity split into fixed-size units; their
/// values are whole dollars summing exactly to the contract payment.
pub fn load_cargo(
    world: &mut World,
    entity: Entity,
    board: &ContractBoard,
    state: &mut GameState,
    config: &SimConfig,
) -> bool {
    let Ok((ship, docked, assignment, cargo)) =
        world.query_one_mut::<(&Ship, &Docked, &Assignment, &mut Cargo)>(entity)
    else {
        return false;
    };
    let Some(contract) = board.get(assignment.contract) else {
        return false;
    };
    if !contract.is_active() || contract.assigned_ship != Some(ship.id) {
        return false;
    }
    if docked.port != contract.origin || !cargo.is_empty() {
        return false;
    }

    let count = containers_for_quantity(contract.quantity, config.container_unit_size);
    let weight = contract.cargo_type.container_weight();
    for value in split_payment(contract.payment, count) {
        cargo.containers.push(Container {
            id: state.next_container_id,
            cargo_type: contract.cargo_type,
            weight,
            value,
            origin: contract.origin,
            destination: contract.destination,
            contract: contract.id,
        });
        state.next_container_id += 1;
    }
    debug!("{} loaded {} containers for {}", ship.id, count, contract.id);
    true
}

/// Pay out a delivered contract and empty the hold.
///
/// Returns the amount paid. Completing an already completed contract pays
/// nothing and leaves reputation untouched.
pub fn settle_delivery(
    world: &mut World,
    entity: Entity,
    board: &mut ContractBoard,
    state: &mut GameState,
    competitors: &mut [Competitor],
    config: &SimConfig,
) -> Option<f64> {
    let (owner, contract_id, delivered) = {
        let Ok((ship, cargo, assignment)) =
            world.query_one_mut::<(&Ship, &Cargo, &Assignment)>(entity)
        else {
            return None;
        };
        let delivered: f64 = cargo
            .containers
            .iter()
            .filter(|c| c.contract == assignment.contract)
            .map(|c| c.value)
            .sum();
        if !cargo.containers.iter().any(|c| c.contract == assignment.contract) {
            return None;
        }
        (ship.owner, assignment.contract, delivered)
    };

    board.complete(contract_id)?;

    credit(state, competitors, owner, delivered);
    match owner {
        Owner::Player => {
            state.contracts_completed += 1;
            state.reputation =
                reputation_after_delivery(state.reputation, config.reputation_per_delivery);
            info!("{} delivered, earned ${:.0}", contract_id, delivered);
        }
        Owner::Competitor(id) => {
            if let Some(c) = competitors.get_mut(id.index()) {
                c.contracts_completed += 1;
                debug!("{} delivered {} for ${:.0}", c.name, contract_id, delivered);
            }
        }
    }

    if let Ok(mut cargo) = world.get::<&mut Cargo>(entity) {
        cargo.containers.clear();
    }
    let _ = world.remove_one::<Assignment>(entity);
    Some(delivered)
}

enum Completion {
    Load,
    Unload,
    Repair,
}

/// Count time in state and complete loading, unloading and repairs.
pub fn cargo_system(
    world: &mut World,
    board: &mut ContractBoard,
    state: &mut GameState,
    competitors: &mut [Competitor],
    config: &SimConfig,
    delta_seconds: f64,
) {
    let mut done: Vec<(Entity, Completion)> = Vec::new();

    for (entity, status) in world.query_mut::<&mut Status>() {
        status.elapsed_in_state += delta_seconds;
        let finished = match status.state {
            ShipState::Loading if status.elapsed_in_state >= config.loading_seconds => {
                Some(Completion::Load)
            }
            ShipState::Unloading if status.elapsed_in_state >= config.unloading_seconds => {
                Some(Completion::Unload)
            }
            ShipState::Maintenance if status.elapsed_in_state >= config.repair_seconds => {
                Some(Completion::Repair)
            }
            _ => None,
        };
        if let Some(kind) = finished {
            done.push((entity, kind));
        }
    }

    for (entity, kind) in done {
        let next = match kind {
            Completion::Load => {
                if load_cargo(world, entity, board, state, config) {
                    ShipState::Loaded
                } else {
                    // Contract vanished mid-load
                    drop_assignment(world, entity, board);
                    ShipState::Idle
                }
            }
            Completion::Unload => {
                if settle_delivery(world, entity, board, state, competitors, config).is_some() {
                    ShipState::Idle
                } else {
                    ShipState::Loaded
                }
            }
            Completion::Repair => {
                if let Ok(mut ship) = world.get::<&mut Ship>(entity) {
                    ship.condition = 100.0;
                    debug!("{} repaired", ship.id);
                }
                ShipState::Idle
            }
        };
        if let Ok(mut status) = world.get::<&mut Status>(entity) {
            status.enter(next);
        }
    }
}

fn drop_assignment(world: &mut World, entity: Entity, board: &mut ContractBoard) {
    let Ok((ship, assignment)) = world.query_one_mut::<(&Ship, &Assignment)>(entity) else {
        return;
    };
    board.unassign(assignment.contract, ship.id);
    let _ = world.remove_one::<Assignment>(entity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ContractId, ContractStatus, Position};
    use flexport_logic::catalog::{CargoType, ShipType};
    use flexport_logic::geo::Vec3;

    fn contract(origin: u32, destination: u32, ship: ShipId) -> Contract {
        Contract {
            id: ContractId(1),
            client: "Client".into(),
            origin: PortId(origin),
            destination: PortId(destination),
            cargo_type: CargoType::Electronics,
            quantity: 1_050,
            payment: 2_000_003.0,
            deadline: 1.0e9,
            required_capacity: 11,
            status: ContractStatus::Active,
            holder: Some(Owner::Player),
            assigned_ship: Some(ship),
        }
    }

    fn setup(state: ShipState, port: u32) -> (World, Entity, ContractBoard) {
        let mut world = World::new();
        let entity = world.spawn((
            Ship::new(ShipId(1), "Test", ShipType::Container, Owner::Player),
            Position::new(Vec3::new(102.0, 0.0, 0.0)),
            Status::new(state),
            Cargo::default(),
            Docked { port: PortId(port) },
            Assignment {
                contract: ContractId(1),
            },
        ));
        let mut board = ContractBoard::new();
        board.insert(contract(0, 1, ShipId(1)));
        (world, entity, board)
    }

    fn running() -> GameState {
        let mut state = GameState::new("Test Co");
        state.started = true;
        state.paused = false;
        state.reputation = 50.0;
        state
    }

    #[test]
    fn test_arrival_state_decisions() {
        let c = contract(0, 1, ShipId(1));
        assert_eq!(state_on_arrival(ShipId(1), PortId(0), true, Some(&c)), ShipState::Loading);
        assert_eq!(state_on_arrival(ShipId(1), PortId(1), false, Some(&c)), ShipState::Unloading);
        assert_eq!(state_on_arrival(ShipId(1), PortId(2), false, Some(&c)), ShipState::Loaded);
        assert_eq!(state_on_arrival(ShipId(1), PortId(1), true, Some(&c)), ShipState::Idle);
        assert_eq!(state_on_arrival(ShipId(1), PortId(0), true, None), ShipState::Idle);
        // Someone else's contract
        assert_eq!(state_on_arrival(ShipId(2), PortId(0), true, Some(&c)), ShipState::Idle);
    }

    #[test]
    fn test_loading_completes_after_delay() {
        let (mut world, entity, mut board) = setup(ShipState::Loading, 0);
        let mut state = running();
        let config = SimConfig::default();

        cargo_system(&mut world, &mut board, &mut state, &mut [], &config, 1.0);
        assert_eq!(world.get::<&Status>(entity).unwrap().state, ShipState::Loading);

        for _ in 0..3 {
            cargo_system(&mut world, &mut board, &mut state, &mut [], &config, 1.0);
        }

        assert_eq!(world.get::<&Status>(entity).unwrap().state, ShipState::Loaded);
        let cargo = world.get::<&Cargo>(entity).unwrap();
        assert_eq!(cargo.len(), 11);
        assert_eq!(cargo.total_value(), 2_000_003.0);
    }

    #[test]
    fn test_unloading_pays_and_raises_reputation() {
        let (mut world, entity, mut board) = setup(ShipState::Loading, 0);
        let mut state = running();
        let config = SimConfig::default();
        assert!(load_cargo(&mut world, entity, &board, &mut state, &config));

        // Move the ship to the destination and unload
        world.get::<&mut Docked>(entity).unwrap().port = PortId(1);
        world.get::<&mut Status>(entity).unwrap().enter(ShipState::Unloading);
        for _ in 0..40 {
            cargo_system(&mut world, &mut board, &mut state, &mut [], &config, 0.1);
        }

        assert_eq!(world.get::<&Status>(entity).unwrap().state, ShipState::Idle);
        assert!(world.get::<&Cargo>(entity).unwrap().is_empty());
        assert!(world.get::<&Assignment>(entity).is_err());
        assert_eq!(state.money, 2_000_003.0);
        assert_eq!(state.reputation, 55.0);
        assert_eq!(state.contracts_completed, 1);
        assert_eq!(board.get(ContractId(1)).unwrap().status, ContractStatus::Completed);
    }

    #[test]
    fn test_settle_twice_pays_once() {
        let (mut world, entity, mut board) = setup(ShipState::Unloading, 1);
        let mut state = running();
        let config = SimConfig::default();
        // Pretend the cargo was loaded at the origin
        world.get::<&mut Docked>(entity).unwrap().port = PortId(0);
        assert!(load_cargo(&mut world, entity, &board, &mut state, &config));
        // Keep a copy of the hold to simulate a duplicate unload
        let hold: Cargo = (*world.get::<&Cargo>(entity).unwrap()).clone();

        let first = settle_delivery(&mut world, entity, &mut board, &mut state, &mut [], &config);
        let _ = world.insert(entity, (hold, Assignment { contract: ContractId(1) }));
        let second = settle_delivery(&mut world, entity, &mut board, &mut state, &mut [], &config);

        assert_eq!(first, Some(2_000_003.0));
        assert_eq!(second, None);
        assert_eq!(state.money, 2_000_003.0);
        assert_eq!(state.reputation, 55.0);
    }

    #[test]
    fn test_load_fails_away_from_origin() {
        let (mut world, entity, mut board) = setup(ShipState::Loading, 5);
        let mut state = running();
        let config = SimConfig::default();

        for _ in 0..5 {
            cargo_system(&mut world, &mut board, &mut state, &mut [], &config, 1.0);
        }

        assert_eq!(world.get::<&Status>(entity).unwrap().state, ShipState::Idle);
        assert!(world.get::<&Assignment>(entity).is_err());
        assert_eq!(board.get(ContractId(1)).unwrap().assigned_ship, None);
    }

    #[test]
    fn test_repair_restores_condition() {
        let (mut world, entity, mut board) = setup(ShipState::Maintenance, 0);
        world.get::<&mut Ship>(entity).unwrap().condition = 12.0;
        let mut state = running();
        let config = SimConfig::default();

        for _ in 0..6 {
            cargo_system(&mut world, &mut board, &mut state, &mut [], &config, 1.0);
        }

        assert_eq!(world.get::<&Status>(entity).unwrap().state, ShipState::Idle);
        assert_eq!(world.get::<&Ship>(entity).unwrap().condition, 100.0);
    }

    #[test]
    fn test_arrival_docks_and_refuels() {
        let (mut world, entity, board) = setup(ShipState::Sailing, 0);
        let _ = world.remove_one::<Docked>(entity);
        world.get::<&mut Ship>(entity).unwrap().fuel = 1.0;

        handle_arrivals(
            &mut world,
            &[Arrival {
                entity,
                port: PortId(0),
            }],
            &board,
        );

        assert_eq!(world.get::<&Docked>(entity).unwrap().port, PortId(0));
        assert_eq!(world.get::<&Status>(entity).unwrap().state, ShipState::Loading);
        let ship = world.get::<&Ship>(entity).unwrap();
        assert_eq!(ship.fuel, ship.fuel_capacity);
    }
}
