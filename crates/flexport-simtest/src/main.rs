//! FlexPort Headless Simulation Harness
//!
//! Plays whole games in-process and checks the simulation invariants.
//! No renderer, no UI, no network.
//!
//! Usage:
//!   cargo run -p flexport-simtest
//!   cargo run -p flexport-simtest -- --verbose
//!   cargo run -p flexport-simtest -- --seed 7 --mode campaign
//!   cargo run -p flexport-simtest -- --config tuning.json
//!
//! Set `RUST_LOG=debug` to see engine logging.

use flexport_core::prelude::*;
use flexport_logic::catalog::{CargoType, ShipType, PORTS};
use flexport_logic::config::{GameMode, SimConfig};
use flexport_logic::geo::{lat_lon_to_position, shell_radius};
use flexport_logic::route::{arc_is_clear, plan_route};
use flexport_logic::water::{RectLandMap, WaterMap};
use log::{error, info};

const TICK: f64 = 0.1;
/// Ticks in the soak run (≈ 1 hour of game time at full speed).
const SOAK_TICKS: usize = 36_000;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Options {
    verbose: bool,
    mode: GameMode,
    config: SimConfig,
}

fn main() {
    pretty_env_logger::init();

    let options = match parse_args() {
        Ok(options) => options,
        Err(message) => {
            error!("{}", message);
            eprintln!("{}", message);
            std::process::exit(2);
        }
    };
    let verbose = options.verbose;
    println!("=== FlexPort Simulation Harness ===\n");
    info!(
        "mode {:?}, seed {:?}",
        options.mode, options.config.seed
    );

    let mut results = Vec::new();

    // 1. Configuration
    results.extend(validate_config(&options.config));

    // 2. Route planning over the built-in map
    results.extend(validate_routes(verbose));

    // 3. Game start and purchases
    results.extend(validate_game_start(&options));

    // 4. Contract delivery lifecycle
    results.extend(validate_delivery(&options.config, verbose));

    // 5. Long soak run with invariant checks
    results.extend(validate_soak(&options));

    // 6. Singularity ending
    results.extend(validate_singularity(&options.config));

    // 7. Save and load
    results.extend(validate_persistence(&options));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn parse_args() -> Result<Options, String> {
    let mut verbose = false;
    let mut mode = GameMode::Quick;
    let mut config_path: Option<String> = None;
    let mut seed: Option<u64> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--verbose" | "-v" => verbose = true,
            "--seed" => {
                let value = args.next().ok_or("--seed needs a value")?;
                seed = Some(
                    value
                        .parse()
                        .map_err(|_| format!("invalid seed: {}", value))?,
                );
            }
            "--mode" => {
                let value = args.next().ok_or("--mode needs a value")?;
                mode = match value.to_lowercase().as_str() {
                    "quick" => GameMode::Quick,
                    "campaign" => GameMode::Campaign,
                    "sandbox" => GameMode::Sandbox,
                    other => return Err(format!("unknown mode: {}", other)),
                };
            }
            "--config" => {
                config_path = Some(args.next().ok_or("--config needs a path")?);
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
    }

    let mut config = match config_path {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .map_err(|e| format!("cannot read {}: {}", path, e))?;
            SimConfig::from_json_str(&json).map_err(|e| format!("{}: {}", path, e))?
        }
        None => SimConfig::default(),
    };
    // Reproducible unless a config or flag says otherwise
    config.seed = seed.or(config.seed).or(Some(42));

    Ok(Options {
        verbose,
        mode,
        config,
    })
}

fn new_engine(config: &SimConfig, mode: GameMode) -> GameEngine {
    let mut engine = GameEngine::new(config.clone());
    engine.start_game(mode);
    let speed = config.max_game_speed;
    if let Err(e) = engine.set_game_speed(speed) {
        error!("cannot set game speed {}: {}", speed, e);
    }
    engine
}

fn starter(engine: &GameEngine) -> Option<ShipId> {
    engine.snapshot().player_fleet().next().map(|s| s.id)
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_config(config: &SimConfig) -> Vec<TestResult> {
    println!("--- Configuration ---");
    let mut results = Vec::new();

    let valid = config.validate();
    results.push(TestResult {
        name: "config_valid".into(),
        passed: valid.is_ok(),
        detail: match valid {
            Ok(()) => format!("seed {:?}", config.seed),
            Err(e) => e.to_string(),
        },
    });

    let bad = SimConfig::from_json_str(r#"{ "min_game_speed": 5.0, "max_game_speed": 1.0 }"#);
    results.push(TestResult {
        name: "config_rejects_inverted_speeds".into(),
        passed: bad.is_err(),
        detail: "min_game_speed above max_game_speed".into(),
    });

    results.push(TestResult {
        name: "config_clamps_delta".into(),
        passed: config.clamp_delta(30.0) == config.max_delta_seconds
            && config.clamp_delta(f64::NAN) == 0.0
            && config.clamp_delta(-1.0) == 0.0,
        detail: format!("deltas capped at {}s", config.max_delta_seconds),
    });

    results
}

// ── 2. Route Planning ───────────────────────────────────────────────────

fn validate_routes(verbose: bool) -> Vec<TestResult> {
    println!("--- Route Planning ---");
    let mut results = Vec::new();
    let map = RectLandMap::earth();
    let radius = shell_radius(ShipType::Container.altitude());

    let ports_on_water = PORTS
        .iter()
        .filter(|p| !map.is_over_water(lat_lon_to_position(p.lat, p.lon, radius)))
        .map(|p| p.name)
        .collect::<Vec<_>>();
    results.push(TestResult {
        name: "ports_on_water".into(),
        passed: ports_on_water.is_empty(),
        detail: if ports_on_water.is_empty() {
            format!("all {} ports over water", PORTS.len())
        } else {
            format!("ports on land: {}", ports_on_water.join(", "))
        },
    });

    let mut bad_routes = Vec::new();
    let mut longest = 0;
    for a in PORTS {
        for b in PORTS {
            if a.name == b.name {
                continue;
            }
            let start = lat_lon_to_position(a.lat, a.lon, radius);
            let end = lat_lon_to_position(b.lat, b.lon, radius);
            for budget in [20, 2] {
                let route = plan_route(start, end, radius, budget, &map);
                if budget == 20 {
                    longest = longest.max(route.len());
                }

                let ends_right = route.last().is_some_and(|p| p.distance(&end) < 1e-6);
                let wet = route.iter().all(|p| map.is_over_water(*p));
                let clear = route
                    .windows(2)
                    .all(|leg| arc_is_clear(leg[0], leg[1], radius, &map));
                if !ends_right || !wet || !clear {
                    bad_routes.push(format!("{}->{} (budget {})", a.name, b.name, budget));
                }
            }
        }
    }
    results.push(TestResult {
        name: "routes_over_water".into(),
        passed: bad_routes.is_empty(),
        detail: if bad_routes.is_empty() {
            format!("all port pairs routed, longest {} waypoints", longest)
        } else {
            format!("{} bad routes: {}", bad_routes.len(), bad_routes.join(", "))
        },
    });

    if verbose {
        println!("  Route waypoints from Los Angeles:");
        let la = lat_lon_to_position(PORTS[3].lat, PORTS[3].lon, radius);
        for p in PORTS.iter().filter(|p| p.name != "Los Angeles") {
            let end = lat_lon_to_position(p.lat, p.lon, radius);
            println!("    {:12}: {}", p.name, plan_route(la, end, radius, 20, &map).len());
        }
    }

    results
}

// ── 3. Game Start ───────────────────────────────────────────────────────

fn validate_game_start(options: &Options) -> Vec<TestResult> {
    println!("--- Game Start ---");
    let mut results = Vec::new();

    for mode in [GameMode::Quick, GameMode::Campaign, GameMode::Sandbox] {
        let engine = new_engine(&options.config, mode);
        let snap = engine.snapshot();
        let settings = mode.settings();
        let available = snap
            .contracts
            .iter()
            .filter(|c| c.status == ContractStatus::Available)
            .count();
        results.push(TestResult {
            name: format!("start_{:?}", mode).to_lowercase(),
            passed: snap.money == settings.starting_money
                && snap.competitors.len() == settings.competitor_count
                && available > 0
                && snap.player_fleet().count() == 1,
            detail: format!(
                "${:.0}, {} rivals, {} contracts",
                snap.money,
                snap.competitors.len(),
                available
            ),
        });
    }

    // Exact-funds purchase
    let mut engine = new_engine(&options.config, options.mode);
    let price = ShipType::Container.spec().price;
    engine.state.money = price;
    let bought = engine.purchase_ship(ShipType::Container, "Exact Change");
    let snap = engine.snapshot();
    let docked_home = bought
        .as_ref()
        .ok()
        .and_then(|id| snap.ship(*id))
        .is_some_and(|s| {
            s.status == ShipState::Idle
                && s.docked_at.is_some()
                && snap.ports.iter().any(|p| p.player_owned && Some(p.id) == s.docked_at)
        });
    results.push(TestResult {
        name: "purchase_exact_funds".into(),
        passed: bought.is_ok() && snap.money == 0.0 && docked_home,
        detail: format!("money after purchase ${:.0}", snap.money),
    });

    let refused = engine.purchase_ship(ShipType::Bulk, "");
    results.push(TestResult {
        name: "purchase_refused_when_broke".into(),
        passed: matches!(refused, Err(CommandError::InsufficientFunds { .. }))
            && engine.state.money == 0.0,
        detail: match refused {
            Err(e) => e.to_string(),
            Ok(id) => format!("unexpectedly bought {}", id),
        },
    });

    results
}

// ── 4. Delivery ─────────────────────────────────────────────────────────

fn validate_delivery(config: &SimConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Contract Delivery ---");
    let mut results = Vec::new();

    let mut engine = new_engine(config, GameMode::Sandbox);
    let Some(ship) = starter(&engine) else {
        results.push(TestResult {
            name: "delivery_starter_ship".into(),
            passed: false,
            detail: "no player ship".into(),
        });
        return results;
    };

    let contract = ContractId(10_000);
    let payment = 3_000_000.0;
    engine.contracts.insert(Contract {
        id: contract,
        client: "Harness Freight".into(),
        origin: PortId(5),
        destination: PortId(0),
        cargo_type: CargoType::Machinery,
        quantity: 800,
        payment,
        deadline: f64::MAX,
        required_capacity: 8,
        status: ContractStatus::Active,
        holder: Some(Owner::Player),
        assigned_ship: None,
    });

    let assigned = engine.assign_ship_to_contract(ship, contract);
    let heading_to_origin = engine
        .snapshot()
        .ship(ship)
        .is_some_and(|s| s.status == ShipState::Sailing && s.destination == Some(PortId(5)));
    results.push(TestResult {
        name: "delivery_sails_to_origin".into(),
        passed: assigned.is_ok() && heading_to_origin,
        detail: format!("{:?}", assigned),
    });

    let loaded_after = tick_until(&mut engine, 20_000, |s| {
        s.ship(ship).is_some_and(|v| v.status == ShipState::Loaded)
    });
    let containers = engine.snapshot().ship(ship).map(|s| s.containers).unwrap_or(0);
    results.push(TestResult {
        name: "delivery_loads_at_origin".into(),
        passed: loaded_after.is_some() && containers == 8,
        detail: format!("{} containers after {:?} ticks", containers, loaded_after),
    });

    let money_before = engine.state.money;
    let reassigned = engine.assign_ship_to_contract(ship, contract);
    let delivered_after = tick_until(&mut engine, 20_000, |s| {
        s.contract(contract)
            .is_some_and(|c| c.status == ContractStatus::Completed)
    });
    let earned = engine.state.money - money_before;
    results.push(TestResult {
        name: "delivery_pays_once".into(),
        passed: reassigned.is_ok()
            && delivered_after.is_some()
            && (earned - payment).abs() < 1e-6
            && engine.state.contracts_completed == 1,
        detail: format!("earned ${:.0} after {:?} ticks", earned, delivered_after),
    });

    for _ in 0..200 {
        engine.update(TICK);
    }
    results.push(TestResult {
        name: "delivery_not_repaid".into(),
        passed: (engine.state.money - money_before - payment).abs() < 1e-6,
        detail: format!("money ${:.0}", engine.state.money),
    });

    if verbose {
        if let Ok(json) = engine.snapshot().to_json() {
            println!("  Snapshot after delivery: {} bytes of JSON", json.len());
        }
    }

    results
}

fn tick_until(
    engine: &mut GameEngine,
    max_ticks: usize,
    done: impl Fn(&GameSnapshot) -> bool,
) -> Option<usize> {
    for tick in 0..max_ticks {
        if done(engine.snapshot().as_ref()) {
            return Some(tick);
        }
        engine.update(TICK);
    }
    None
}

// ── 5. Soak Run ─────────────────────────────────────────────────────────

fn validate_soak(options: &Options) -> Vec<TestResult> {
    println!("--- Soak Run ({:?}) ---", options.mode);
    let mut results = Vec::new();
    let config = &options.config;
    let water = RectLandMap::earth();

    let mut engine = new_engine(config, options.mode);
    // Give the player something to do
    let _ = engine.purchase_ship(ShipType::CargoPlane, "");
    let fleet: Vec<ShipId> = engine.snapshot().player_fleet().map(|s| s.id).collect();
    for (i, id) in fleet.iter().enumerate() {
        let _ = engine.move_ship(*id, PortId(((i * 4 + 1) % PORTS.len()) as u32));
    }

    let mut off_shell = 0;
    let mut on_land = 0;
    let mut pause_violations = 0;
    let mut ticks = 0;

    for tick in 0..SOAK_TICKS {
        engine.update(TICK);
        ticks = tick + 1;
        let snap = engine.snapshot();

        for ship in &snap.fleet {
            let radius = config.world_radius + ship.ship_type.altitude();
            if (ship.position.length() - radius).abs() > 1e-6 {
                off_shell += 1;
            }
            if !ship.ship_type.is_air() && !water.is_over_water(ship.position) {
                on_land += 1;
            }
        }

        // Periodic pause check
        if tick % 1_000 == 0 && snap.result.is_none() {
            engine.pause();
            let paused = engine.snapshot();
            for _ in 0..10 {
                engine.update(TICK);
            }
            if *engine.snapshot() != *paused {
                pause_violations += 1;
            }
            let _ = engine.resume();
        }

        // Keep idle player ships busy
        if tick % 500 == 0 && snap.result.is_none() {
            let idle: Vec<ShipId> = snap
                .player_fleet()
                .filter(|s| s.status == ShipState::Idle)
                .map(|s| s.id)
                .collect();
            for (i, id) in idle.into_iter().enumerate() {
                let port = PortId(((tick / 500 + i * 3) % PORTS.len()) as u32);
                let _ = engine.move_ship(id, port);
            }
        }

        if snap.result.is_some() {
            break;
        }
    }

    let snap = engine.snapshot();
    results.push(TestResult {
        name: "soak_shell_invariant".into(),
        passed: off_shell == 0,
        detail: format!("{} off-shell samples over {} ticks", off_shell, ticks),
    });
    results.push(TestResult {
        name: "soak_water_invariant".into(),
        passed: on_land == 0,
        detail: format!("{} sea-vessel samples over land", on_land),
    });
    results.push(TestResult {
        name: "soak_pause_conservation".into(),
        passed: pause_violations == 0,
        detail: format!("{} pauses changed state", pause_violations),
    });
    results.push(TestResult {
        name: "soak_money_finite".into(),
        passed: snap.money.is_finite()
            && snap.competitors.iter().all(|c| c.money.is_finite() && c.money >= 0.0),
        detail: format!(
            "player ${:.0}, rivals {:?}",
            snap.money,
            snap.competitors
                .iter()
                .map(|c| format!("{} ${:.0}", c.name, c.money))
                .collect::<Vec<_>>()
        ),
    });
    results.push(TestResult {
        name: "soak_efficiency_bounded".into(),
        passed: (0.0..=100.0).contains(&snap.player_efficiency)
            && snap
                .competitors
                .iter()
                .all(|c| (0.0..=100.0).contains(&c.efficiency)),
        detail: format!("player efficiency {:.1}", snap.player_efficiency),
    });

    let ended = match &snap.result {
        Some(result) => format!(
            "{:?} after {:.0}s, winner {}",
            result.reason, result.duration_seconds, result.winner
        ),
        None => format!("still running at day {}", snap.game_day),
    };
    results.push(TestResult {
        name: "soak_outcome".into(),
        passed: snap.result.is_some() || options.mode == GameMode::Sandbox,
        detail: ended,
    });

    if options.verbose {
        if let Some(result) = &snap.result {
            match serde_json::to_string_pretty(result) {
                Ok(json) => println!("  Final result:\n{}", json),
                Err(e) => error!("cannot serialize result: {}", e),
            }
        }
    }

    results
}

// ── 6. Singularity ──────────────────────────────────────────────────────

fn validate_singularity(config: &SimConfig) -> Vec<TestResult> {
    println!("--- Singularity ---");
    let mut results = Vec::new();

    let config = SimConfig {
        ai_development_rate: 1.0,
        singularity_margin: 1_000.0,
        ..config.clone()
    };
    let mut engine = new_engine(&config, GameMode::Sandbox);

    let mut activations = 0;
    let mut was_active = false;
    for _ in 0..2_000 {
        engine.update(TICK);
        let active = engine.snapshot().singularity_active;
        if active && !was_active {
            activations += 1;
        }
        was_active = active;
    }
    results.push(TestResult {
        name: "singularity_fires_once".into(),
        passed: activations == 1,
        detail: format!("{} activations", activations),
    });

    let frozen = engine.snapshot();
    for _ in 0..100 {
        engine.update(TICK);
    }
    results.push(TestResult {
        name: "singularity_freezes_world".into(),
        passed: *engine.snapshot() == *frozen
            && matches!(engine.resume(), Err(CommandError::GameOver)),
        detail: format!(
            "{:?}",
            frozen.result.as_ref().map(|r| (r.reason, r.winner.clone()))
        ),
    });

    results
}

// ── 7. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(options: &Options) -> Vec<TestResult> {
    println!("--- Save / Load ---");
    let mut results = Vec::new();

    let mut engine = new_engine(&options.config, options.mode);
    if let Some(ship) = starter(&engine) {
        let _ = engine.move_ship(ship, PortId(0));
    }
    for _ in 0..500 {
        engine.update(TICK);
    }

    let mut buffer = Vec::new();
    let saved = engine.save(&mut buffer);
    let mut a = GameEngine::default();
    let mut b = GameEngine::default();
    let loaded = a.load(&buffer[..]).and_then(|_| b.load(&buffer[..]));

    results.push(TestResult {
        name: "save_load_roundtrip".into(),
        passed: saved.is_ok() && loaded.is_ok() && *a.snapshot() == *engine.snapshot(),
        detail: format!("{} bytes", buffer.len()),
    });

    for _ in 0..500 {
        a.update(TICK);
        b.update(TICK);
    }
    results.push(TestResult {
        name: "save_load_deterministic".into(),
        passed: *a.snapshot() == *b.snapshot(),
        detail: format!("both at {:.0}s", a.snapshot().game_time),
    });

    results
}
