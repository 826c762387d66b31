//! Competitor AI - fleet purchases, contract bidding and passive growth

use flexport_logic::catalog::ShipType;
use flexport_logic::config::SimConfig;
use flexport_logic::economy::{competitor_efficiency_gain, passive_income};
use flexport_logic::water::WaterMap;
use hecs::{Entity, World};
use log::info;
use rand::Rng;

use crate::components::{
    Assignment, Competitor, CompetitorId, Docked, GameState, Owner, Port, PortId, Ship, ShipId,
    ShipState, Status,
};
use crate::generation::{generate_ship_name, spawn_ship};
use crate::systems::{dispatch_ship, ContractBoard};

/// Ship classes a competitor buys.
const AI_FLEET_TYPES: &[ShipType] = &[ShipType::Container, ShipType::Bulk, ShipType::Tanker];

/// Run every competitor's decision loop for one tick.
#[allow(clippy::too_many_arguments)]
pub fn competitor_system(
    world: &mut World,
    state: &mut GameState,
    competitors: &mut [Competitor],
    board: &mut ContractBoard,
    ports: &[Port],
    water: &dyn WaterMap,
    config: &SimConfig,
    rng: &mut impl Rng,
    delta_seconds: f64,
) {
    let scaled = delta_seconds * state.game_speed;

    for competitor in competitors.iter_mut() {
        if rng.gen::<f64>() < config.competitor_purchase_rate * scaled {
            try_purchase(world, state, competitor, ports, config, rng);
        }
        if rng.gen::<f64>() < config.competitor_assign_rate * scaled {
            try_assign(world, competitor.id, board, ports, water, config);
        }

        let income = passive_income(competitor.ships_owned, config.competitor_income_per_ship, scaled);
        competitor.money += income;
        competitor.total_revenue += income;
        competitor.efficiency = (competitor.efficiency
            + competitor_efficiency_gain(
                config.competitor_efficiency_growth,
                state.ai_development,
                scaled,
            ))
        .min(100.0);
    }

    sail_loaded_ai_ships(world, board, ports, water, config);
}

fn try_purchase(
    world: &mut World,
    state: &mut GameState,
    competitor: &mut Competitor,
    ports: &[Port],
    config: &SimConfig,
    rng: &mut impl Rng,
) {
    if competitor.ships_owned >= config.competitor_max_ships {
        return;
    }
    let ship_type = AI_FLEET_TYPES[rng.gen_range(0..AI_FLEET_TYPES.len())];
    let price = ship_type.spec().price;
    if competitor.money < price {
        return;
    }
    let Some(port) = ports.get(competitor.home_port.index()) else {
        return;
    };

    let name = generate_ship_name(rng);
    spawn_ship(
        world,
        state,
        name,
        ship_type,
        Owner::Competitor(competitor.id),
        port,
        config,
    );
    competitor.money -= price;
    competitor.ships_owned += 1;
    info!(
        "{} bought a {} ({} ships)",
        competitor.name,
        ship_type.label(),
        competitor.ships_owned
    );
}

/// Put one idle ship on the best-paying contract it can carry.
fn try_assign(
    world: &mut World,
    id: CompetitorId,
    board: &mut ContractBoard,
    ports: &[Port],
    water: &dyn WaterMap,
    config: &SimConfig,
) -> bool {
    let owner = Owner::Competitor(id);
    if board.active_for(owner) >= config.competitor_max_assignments {
        return false;
    }

    let mut idle: Vec<(Entity, ShipId, u32, PortId)> = world
        .query::<(&Ship, &Status, &Docked)>()
        .without::<&Assignment>()
        .iter()
        .filter(|(_, (ship, status, _))| ship.owner == owner && status.state == ShipState::Idle)
        .map(|(e, (ship, _, docked))| (e, ship.id, ship.capacity, docked.port))
        .collect();
    idle.sort_by_key(|(_, ship_id, _, _)| *ship_id);

    for (entity, ship_id, capacity, docked_at) in idle {
        let Some(contract) = board.best_available(capacity) else {
            continue;
        };
        let (contract_id, origin) = (contract.id, contract.origin);

        board.accept(contract_id, owner);
        if let Some(c) = board.get_mut(contract_id) {
            c.assigned_ship = Some(ship_id);
        }
        let _ = world.insert_one(
            entity,
            Assignment {
                contract: contract_id,
            },
        );
        if docked_at == origin {
            if let Ok(mut status) = world.get::<&mut Status>(entity) {
                status.enter(ShipState::Loading);
            }
        } else {
            dispatch_ship(world, entity, origin, ports, water, config);
        }
        return true;
    }
    false
}

/// AI ships head for the destination as soon as they finish loading.
fn sail_loaded_ai_ships(
    world: &mut World,
    board: &ContractBoard,
    ports: &[Port],
    water: &dyn WaterMap,
    config: &SimConfig,
) {
    let departures: Vec<(Entity, PortId)> = world
        .query::<(&Ship, &Status, &Assignment)>()
        .iter()
        .filter(|(_, (ship, status, _))| {
            !ship.owner.is_player() && status.state == ShipState::Loaded
        })
        .filter_map(|(e, (_, _, a))| board.get(a.contract).map(|c| (e, c.destination)))
        .collect();

    for (entity, destination) in departures {
        dispatch_ship(world, entity, destination, ports, water, config);
    }
}
