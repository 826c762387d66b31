//! Contract board - spawning, acceptance, completion and expiry

use flexport_logic::catalog::{CargoType, CLIENT_NAMES};
use flexport_logic::config::SimConfig;
use flexport_logic::economy::containers_for_quantity;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{Contract, ContractId, ContractStatus, Owner, PortId, ShipId};

/// Every contract ever offered, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractBoard {
    contracts: Vec<Contract>,
    next_id: u32,
}

impl ContractBoard {
    pub fn new() -> Self {
        Self {
            contracts: Vec::new(),
            next_id: 1,
        }
    }

    /// Synthesize a new `Available` contract between two distinct ports.
    ///
    /// Returns `None` when fewer than two ports exist.
    pub fn spawn(
        &mut self,
        rng: &mut impl Rng,
        port_count: usize,
        config: &SimConfig,
        now: f64,
    ) -> Option<ContractId> {
        if port_count < 2 {
            return None;
        }
        let origin = rng.gen_range(0..port_count);
        // Shift by 1..n so the destination never equals the origin
        let destination = (origin + rng.gen_range(1..port_count)) % port_count;

        let cargo_types = CargoType::all();
        let cargo_type = cargo_types[rng.gen_range(0..cargo_types.len())];
        let quantity = rng.gen_range(config.contract_quantity_min..=config.contract_quantity_max);
        let base = rng.gen_range(config.contract_payment_min..=config.contract_payment_max);
        let payment = (base * cargo_type.value_factor()).round();
        let days =
            rng.gen_range(config.contract_deadline_days_min..=config.contract_deadline_days_max);
        let client = CLIENT_NAMES[rng.gen_range(0..CLIENT_NAMES.len())];

        let id = ContractId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.contracts.push(Contract {
            id,
            client: client.to_string(),
            origin: PortId(origin as u32),
            destination: PortId(destination as u32),
            cargo_type,
            quantity,
            payment,
            deadline: now + days as f64 * config.seconds_per_game_day,
            required_capacity: containers_for_quantity(quantity, config.container_unit_size),
            status: ContractStatus::Available,
            holder: None,
            assigned_ship: None,
        });
        debug!("{} offered: {} pays ${:.0}", id, client, payment);
        Some(id)
    }

    /// Add a contract built elsewhere (used by tests and save/load).
    pub fn insert(&mut self, contract: Contract) {
        self.next_id = self.next_id.max(contract.id.0 + 1);
        self.contracts.push(contract);
    }

    pub fn get(&self, id: ContractId) -> Option<&Contract> {
        self.contracts.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: ContractId) -> Option<&mut Contract> {
        self.contracts.iter_mut().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contract> {
        self.contracts.iter()
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    pub fn available_count(&self) -> usize {
        self.contracts.iter().filter(|c| c.is_available()).count()
    }

    /// `Available -> Active` for `holder`. Returns `false` otherwise.
    pub fn accept(&mut self, id: ContractId, holder: Owner) -> bool {
        match self.get_mut(id) {
            Some(c) if c.is_available() => {
                c.status = ContractStatus::Active;
                c.holder = Some(holder);
                true
            }
            _ => false,
        }
    }

    /// `Active -> Completed`. Returns the payment the first time only.
    pub fn complete(&mut self, id: ContractId) -> Option<f64> {
        match self.get_mut(id) {
            Some(c) if c.is_active() => {
                c.status = ContractStatus::Completed;
                c.assigned_ship = None;
                Some(c.payment)
            }
            _ => None,
        }
    }

    /// Return an active contract to the market, e.g. when its ship is sold.
    pub fn release(&mut self, id: ContractId) {
        if let Some(c) = self.get_mut(id) {
            if c.is_active() {
                c.status = ContractStatus::Available;
                c.holder = None;
                c.assigned_ship = None;
            }
        }
    }

    /// Drop the ship reference without changing the holder.
    pub fn unassign(&mut self, id: ContractId, ship: ShipId) {
        if let Some(c) = self.get_mut(id) {
            if c.assigned_ship == Some(ship) {
                c.assigned_ship = None;
            }
        }
    }

    /// Expire contracts whose deadline has passed and that no ship is
    /// working on: `Available` ones, and `Active` ones with no ship assigned.
    /// The holder is kept for the record.
    pub fn expire(&mut self, now: f64) -> usize {
        let mut expired = 0;
        for c in self.contracts.iter_mut() {
            let idle = c.is_available() || (c.is_active() && c.assigned_ship.is_none());
            if idle && now > c.deadline {
                c.status = ContractStatus::Expired;
                expired += 1;
            }
        }
        expired
    }

    /// Highest-paying available contract that fits in `capacity` containers.
    pub fn best_available(&self, capacity: u32) -> Option<&Contract> {
        self.contracts
            .iter()
            .filter(|c| c.is_available() && c.required_capacity <= capacity)
            .max_by(|a, b| a.payment.total_cmp(&b.payment))
    }

    /// Active contracts held by `holder`.
    pub fn active_for(&self, holder: Owner) -> usize {
        self.contracts
            .iter()
            .filter(|c| c.is_active() && c.holder == Some(holder))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::CompetitorId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn board_with(n: usize, seed: u64) -> ContractBoard {
        let mut rng = StdRng::seed_from_u64(seed);
        let config = SimConfig::default();
        let mut board = ContractBoard::new();
        for _ in 0..n {
            board.spawn(&mut rng, 12, &config, 0.0);
        }
        board
    }

    #[test]
    fn test_spawned_contracts_are_well_formed() {
        let config = SimConfig::default();
        let board = board_with(200, 7);
        assert_eq!(board.len(), 200);
        for c in board.iter() {
            assert_ne!(c.origin, c.destination);
            assert!(c.origin.index() < 12 && c.destination.index() < 12);
            assert!(c.quantity >= config.contract_quantity_min);
            assert!(c.quantity <= config.contract_quantity_max);
            assert_eq!(c.payment.fract(), 0.0);
            assert!(c.deadline >= 7.0 * config.seconds_per_game_day);
            assert!(c.deadline <= 30.0 * config.seconds_per_game_day);
            assert_eq!(c.status, ContractStatus::Available);
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let board = board_with(50, 3);
        let mut ids: Vec<u32> = board.iter().map(|c| c.id.0).collect();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_spawn_needs_two_ports() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut board = ContractBoard::new();
        assert!(board.spawn(&mut rng, 1, &SimConfig::default(), 0.0).is_none());
    }

    #[test]
    fn test_accept_only_available() {
        let mut board = board_with(1, 1);
        let id = board.iter().next().unwrap().id;
        assert!(board.accept(id, Owner::Player));
        assert!(!board.accept(id, Owner::Player));
        assert_eq!(board.get(id).unwrap().holder, Some(Owner::Player));
    }

    #[test]
    fn test_complete_pays_once() {
        let mut board = board_with(1, 1);
        let id = board.iter().next().unwrap().id;
        assert!(board.complete(id).is_none());
        board.accept(id, Owner::Player);
        let payment = board.get(id).unwrap().payment;
        assert_eq!(board.complete(id), Some(payment));
        assert_eq!(board.complete(id), None);
    }

    #[test]
    fn test_expire_skips_contracts_with_a_ship() {
        let mut board = board_with(2, 9);
        let ids: Vec<ContractId> = board.iter().map(|c| c.id).collect();
        board.accept(ids[0], Owner::Player);
        board.get_mut(ids[0]).unwrap().assigned_ship = Some(ShipId(1));

        let expired = board.expire(1.0e9);

        assert_eq!(expired, 1);
        assert_eq!(board.get(ids[0]).unwrap().status, ContractStatus::Active);
        assert_eq!(board.get(ids[1]).unwrap().status, ContractStatus::Expired);
    }

    #[test]
    fn test_expire_accepted_contract_without_ship() {
        let mut board = board_with(1, 9);
        let id = board.iter().next().unwrap().id;
        board.accept(id, Owner::Competitor(CompetitorId(0)));
        let deadline = board.get(id).unwrap().deadline;

        assert_eq!(board.expire(deadline), 0);
        assert_eq!(board.expire(deadline + 1.0), 1);

        let c = board.get(id).unwrap();
        assert_eq!(c.status, ContractStatus::Expired);
        assert_eq!(c.holder, Some(Owner::Competitor(CompetitorId(0))));
        assert_eq!(board.active_for(Owner::Competitor(CompetitorId(0))), 0);
        assert_eq!(board.complete(id), None);
    }

    #[test]
    fn test_release_returns_contract_to_market() {
        let mut board = board_with(1, 4);
        let id = board.iter().next().unwrap().id;
        board.accept(id, Owner::Player);
        board.get_mut(id).unwrap().assigned_ship = Some(ShipId(3));

        board.release(id);

        let c = board.get(id).unwrap();
        assert!(c.is_available());
        assert_eq!(c.holder, None);
        assert_eq!(c.assigned_ship, None);
    }

    #[test]
    fn test_best_available_respects_capacity() {
        let board = board_with(30, 11);
        let best = board.best_available(u32::MAX).unwrap();
        assert!(board.iter().all(|c| c.payment <= best.payment));
        assert!(board.best_available(0).is_none());
    }
}
