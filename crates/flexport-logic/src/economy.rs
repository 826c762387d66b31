//! Pure economy logic - efficiency scores, cargo splitting, trade-in values.

/// Inputs to the player's efficiency score.
#[derive(Debug, Clone, Copy, Default)]
pub struct EfficiencyInputs {
    /// Containers currently aboard across the fleet.
    pub cargo_carried: u32,
    /// Total hold size across the fleet.
    pub fleet_capacity: u32,
    pub contracts_completed: u32,
    pub fleet_size: u32,
}

/// Weights for the three efficiency terms (sum to 100).
const UTILIZATION_WEIGHT: f64 = 40.0;
const CONTRACTS_WEIGHT: f64 = 40.0;
const FLEET_WEIGHT: f64 = 20.0;
/// Completed contracts at which the contracts term saturates.
const CONTRACTS_SATURATION: f64 = 20.0;
/// Fleet size at which the fleet term saturates.
const FLEET_SATURATION: f64 = 10.0;

fn safe_ratio(current: f64, cap: f64) -> f64 {
    if cap <= 0.0 {
        0.0
    } else {
        (current / cap).clamp(0.0, 1.0)
    }
}

/// Player efficiency in `0..=100`.
///
/// Each term is clamped to `[0, 1]` before weighting.
pub fn player_efficiency(inputs: &EfficiencyInputs) -> f64 {
    let utilization = safe_ratio(inputs.cargo_carried as f64, inputs.fleet_capacity as f64);
    let contracts = safe_ratio(inputs.contracts_completed as f64, CONTRACTS_SATURATION);
    let fleet = safe_ratio(inputs.fleet_size as f64, FLEET_SATURATION);
    (UTILIZATION_WEIGHT * utilization + CONTRACTS_WEIGHT * contracts + FLEET_WEIGHT * fleet)
        .clamp(0.0, 100.0)
}

/// Efficiency gained by a competitor over `scaled_seconds`.
///
/// Growth accelerates with the global AI development level (up to 2× at 100).
pub fn competitor_efficiency_gain(base_rate: f64, ai_development: f64, scaled_seconds: f64) -> f64 {
    let boost = 1.0 + ai_development.clamp(0.0, 100.0) / 100.0;
    base_rate * boost * scaled_seconds
}

/// Passive income for a competitor with `ships` over `scaled_seconds`.
pub fn passive_income(ships: u32, income_per_ship: f64, scaled_seconds: f64) -> f64 {
    ships as f64 * income_per_ship * scaled_seconds
}

/// Number of containers needed for `quantity` cargo units.
pub fn containers_for_quantity(quantity: u32, unit_size: u32) -> u32 {
    if unit_size == 0 {
        return quantity;
    }
    quantity.div_ceil(unit_size).max(1)
}

/// Split a whole-dollar payment across `count` containers.
///
/// Every share is a whole number of dollars and the shares sum exactly to
/// `payment`; the last container absorbs the remainder.
pub fn split_payment(payment: f64, count: u32) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let total = payment.max(0.0).round();
    let share = (total / count as f64).floor();
    let mut shares = vec![share; count as usize];
    let allocated = share * (count - 1) as f64;
    if let Some(last) = shares.last_mut() {
        *last = total - allocated;
    }
    shares
}

/// Refund for selling a ship.
pub fn sell_refund(value: f64, refund_fraction: f64) -> f64 {
    (value * refund_fraction).round()
}

/// Price of the next upgrade for a ship worth `value`.
pub fn upgrade_cost(value: f64, cost_fraction: f64) -> f64 {
    (value * cost_fraction).round()
}

/// Reputation after a successful delivery, capped at 100.
pub fn reputation_after_delivery(current: f64, gain: f64) -> f64 {
    (current + gain).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_efficiency_empty_fleet() {
        assert_eq!(player_efficiency(&EfficiencyInputs::default()), 0.0);
    }

    #[test]
    fn test_efficiency_saturates_at_100() {
        let e = player_efficiency(&EfficiencyInputs {
            cargo_carried: 10_000,
            fleet_capacity: 100,
            contracts_completed: 500,
            fleet_size: 50,
        });
        assert!((e - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_efficiency_weights() {
        let e = player_efficiency(&EfficiencyInputs {
            cargo_carried: 100,
            fleet_capacity: 200,
            contracts_completed: 0,
            fleet_size: 5,
        });
        // 40 * 0.5 + 20 * 0.5
        assert!((e - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_competitor_growth_scales_with_ai_level() {
        let slow = competitor_efficiency_gain(0.01, 0.0, 10.0);
        let fast = competitor_efficiency_gain(0.01, 100.0, 10.0);
        assert!((slow - 0.1).abs() < 1e-12);
        assert!((fast - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_containers_for_quantity_rounds_up() {
        assert_eq!(containers_for_quantity(500, 100), 5);
        assert_eq!(containers_for_quantity(501, 100), 6);
        assert_eq!(containers_for_quantity(1, 100), 1);
    }

    #[test]
    fn test_split_payment_sums_exactly() {
        let shares = split_payment(1_234_567.0, 7);
        assert_eq!(shares.len(), 7);
        let sum: f64 = shares.iter().sum();
        assert_eq!(sum, 1_234_567.0);
        assert!(shares.iter().all(|s| s.fract() == 0.0));
    }

    #[test]
    fn test_split_payment_zero_count() {
        assert!(split_payment(100.0, 0).is_empty());
    }

    #[test]
    fn test_reputation_capped() {
        assert_eq!(reputation_after_delivery(98.0, 5.0), 100.0);
        assert_eq!(reputation_after_delivery(50.0, 5.0), 55.0);
    }

    #[test]
    fn test_refund_and_upgrade() {
        assert_eq!(sell_refund(20_000_000.0, 0.7), 14_000_000.0);
        assert_eq!(upgrade_cost(20_000_000.0, 0.25), 5_000_000.0);
    }
}
