//! Economic tick - clock, AI development, contract flow and end conditions

use flexport_logic::config::SimConfig;
use flexport_logic::economy::{player_efficiency, EfficiencyInputs};
use hecs::World;
use log::{debug, info};
use rand::Rng;

use crate::components::{Competitor, EndReason, FinalScore, GameResult, GameState, Owner};
use crate::systems::{fleet_stats, ContractBoard};

/// Pay `amount` to whoever `owner` is.
pub fn credit(state: &mut GameState, competitors: &mut [Competitor], owner: Owner, amount: f64) {
    match owner {
        Owner::Player => {
            state.money += amount;
            state.total_revenue += amount;
        }
        Owner::Competitor(id) => {
            if let Some(c) = competitors.get_mut(id.index()) {
                c.money += amount;
                c.total_revenue += amount;
            }
        }
    }
}

/// Advance the clock and AI development, run the contract market and
/// refresh the player's efficiency score.
pub fn economy_system(
    world: &World,
    state: &mut GameState,
    board: &mut ContractBoard,
    port_count: usize,
    config: &SimConfig,
    rng: &mut impl Rng,
    delta_seconds: f64,
) {
    let scaled = delta_seconds * state.game_speed;
    state.game_time += scaled;
    state.ai_development = (state.ai_development + config.ai_development_rate * scaled).min(100.0);

    // Contract market
    if board.available_count() < config.max_available_contracts
        && rng.gen::<f64>() < config.contract_spawn_rate * scaled
    {
        board.spawn(rng, port_count, config, state.game_time);
    }
    let expired = board.expire(state.game_time);
    if expired > 0 {
        debug!("{} contracts expired", expired);
    }

    let fleet = fleet_stats(world, Owner::Player);
    state.player_efficiency = player_efficiency(&EfficiencyInputs {
        cargo_carried: fleet.containers,
        fleet_capacity: fleet.capacity,
        contracts_completed: state.contracts_completed,
        fleet_size: fleet.ships,
    });
}

/// Decide whether the game is over. Returns the result the first time an
/// end condition holds; callers record it and stop ticking.
pub fn check_game_end(
    world: &World,
    state: &GameState,
    competitors: &[Competitor],
    config: &SimConfig,
) -> Option<GameResult> {
    if state.is_over() {
        return None;
    }

    let dominant = competitors
        .iter()
        .filter(|c| c.efficiency > state.player_efficiency + config.singularity_margin)
        .max_by(|a, b| a.efficiency.total_cmp(&b.efficiency));

    let (reason, winner) = if state.ai_development >= 100.0 {
        (EndReason::Singularity, "The Singularity".to_string())
    } else if let Some(rival) = dominant {
        (EndReason::CompetitorDominance, rival.name.clone())
    } else if state.duration.is_some_and(|d| state.game_time >= d) {
        (EndReason::TimeLimit, String::new())
    } else {
        return None;
    };

    let scores = final_scores(world, state, competitors);
    let winner = if reason == EndReason::TimeLimit {
        scores
            .iter()
            .max_by(|a, b| a.net_worth.total_cmp(&b.net_worth))
            .map(|s| s.name.clone())
            .unwrap_or_default()
    } else {
        winner
    };

    info!(
        "game over after {:.0}s: {:?}, winner {}",
        state.game_time, reason, winner
    );
    Some(GameResult {
        winner,
        reason,
        scores,
        duration_seconds: state.game_time,
    })
}

/// Net worth and efficiency of every company, player first.
pub fn final_scores(world: &World, state: &GameState, competitors: &[Competitor]) -> Vec<FinalScore> {
    let mut scores = vec![FinalScore {
        name: state.company_name.clone(),
        net_worth: state.money + fleet_stats(world, Owner::Player).value,
        efficiency: state.player_efficiency,
    }];
    for c in competitors {
        scores.push(FinalScore {
            name: c.name.clone(),
            net_worth: c.money + fleet_stats(world, Owner::Competitor(c.id)).value,
            efficiency: c.efficiency,
        });
    }
    scores
}
