//! World generation - ports, seed fleets, competitors and opening contracts

use flexport_logic::catalog::{ShipType, COMPETITORS, PLAYER_HOME_PORT, PORTS};
use flexport_logic::config::{GameMode, SimConfig};
use hecs::World;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::{
    Cargo, Competitor, CompetitorId, Docked, GameState, Owner, Port, PortId, Position, Ship,
    ShipId, ShipState, Status,
};
use crate::generation::generate_ship_name;
use crate::systems::{ship_radius, ContractBoard};

/// Class of the ship every company starts with.
const STARTER_SHIP_TYPE: ShipType = ShipType::Container;

/// Everything created at game start apart from the ships themselves.
pub struct GeneratedWorld {
    pub ports: Vec<Port>,
    pub competitors: Vec<Competitor>,
    pub contracts: ContractBoard,
}

/// Spawn an idle, docked ship at `port` and return its id.
pub fn spawn_ship(
    world: &mut World,
    state: &mut GameState,
    name: String,
    ship_type: ShipType,
    owner: Owner,
    port: &Port,
    config: &SimConfig,
) -> ShipId {
    let id = ShipId(state.next_ship_id);
    state.next_ship_id += 1;

    let pos = port.position_at(ship_radius(config, ship_type));
    world.spawn((
        Ship::new(id, name, ship_type, owner),
        Position::new(pos),
        Status::new(ShipState::Idle),
        Cargo::default(),
        Docked { port: port.id },
    ));
    id
}

/// Build the port table from the catalogue. The player's home port starts
/// player-owned.
pub fn generate_ports() -> Vec<Port> {
    PORTS
        .iter()
        .enumerate()
        .map(|(i, seed)| {
            let mut port = Port::from_seed(PortId(i as u32), seed);
            port.player_owned = i == PLAYER_HOME_PORT;
            port
        })
        .collect()
}

/// The port new player ships spawn at.
pub fn player_home_port(ports: &[Port]) -> Option<&Port> {
    ports
        .iter()
        .find(|p| p.player_owned)
        .or_else(|| ports.get(PLAYER_HOME_PORT))
}

/// Create `count` competitors, each homed at a distinct non-player port.
pub fn generate_competitors(
    count: usize,
    ports: &[Port],
    config: &SimConfig,
    rng: &mut impl Rng,
) -> Vec<Competitor> {
    let mut homes: Vec<PortId> = ports
        .iter()
        .filter(|p| !p.player_owned)
        .map(|p| p.id)
        .collect();
    homes.shuffle(rng);

    COMPETITORS
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, (name, color))| Competitor {
            id: CompetitorId(i as u32),
            name: name.to_string(),
            color: color.to_string(),
            money: config.competitor_starting_money,
            efficiency: rng
                .gen_range(config.competitor_efficiency_min..=config.competitor_efficiency_max),
            ships_owned: 0,
            contracts_completed: 0,
            total_revenue: 0.0,
            home_port: homes.get(i % homes.len().max(1)).copied().unwrap_or(PortId(0)),
        })
        .collect()
}

/// Populate a fresh world for `mode`: ports, one starter ship per company
/// and the opening contracts.
pub fn generate_world(
    world: &mut World,
    state: &mut GameState,
    mode: GameMode,
    config: &SimConfig,
    rng: &mut impl Rng,
) -> GeneratedWorld {
    let settings = mode.settings();
    let ports = generate_ports();
    let mut competitors = generate_competitors(settings.competitor_count, &ports, config, rng);

    if let Some(home) = player_home_port(&ports) {
        spawn_ship(
            world,
            state,
            format!("{} Pioneer", config.company_name),
            STARTER_SHIP_TYPE,
            Owner::Player,
            home,
            config,
        );
    }
    for competitor in competitors.iter_mut() {
        if let Some(home) = ports.get(competitor.home_port.index()) {
            let name = generate_ship_name(rng);
            spawn_ship(
                world,
                state,
                name,
                STARTER_SHIP_TYPE,
                Owner::Competitor(competitor.id),
                home,
                config,
            );
            competitor.ships_owned += 1;
        }
    }

    let mut contracts = ContractBoard::new();
    for _ in 0..config.initial_contracts {
        contracts.spawn(rng, ports.len(), config, 0.0);
    }

    GeneratedWorld {
        ports,
        competitors,
        contracts,
    }
}
