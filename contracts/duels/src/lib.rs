#![no_std]

//! # Duels
//!
//! A two-party token wager. A host escrows a stake and opens a duel; a guest
//! escrows a counter-stake within ±30% of the host's stake to join. The
//! winner is drawn on the spot, weighted by each side's share of the pool,
//! and may later withdraw the pool minus the platform fee.
//!
//! ## Duel lifecycle
//! ```text
//! create ──► AwaitingGuest ──join──► WithdrawAvailable ──withdraw──► Withdrawn
//!                  │
//!                  └──expire (admin, after join window)──► Expired
//! ```
//!
//! ## Custody
//! The contract's token balance always equals the sum of every duel's
//! `pool`. Each mutating call validates, writes the new duel state, and only
//! then talks to the token contract. A failed transfer returns
//! `TransferFailed`, which rolls back every write made by the call.

mod custody;
mod fee;
mod outcome;
mod registry;

use soroban_sdk::{
    contract, contracterror, contractevent, contractimpl, contracttype, panic_with_error,
    Address, Env, Vec,
};

pub use fee::BPS_DENOMINATOR;
pub use outcome::Side;

// ═══════════════════════════════════════════════════════════════════════════════
//  Contract Events
// ═══════════════════════════════════════════════════════════════════════════════

#[contractevent]
pub struct EvDuelCreated {
    pub duel_id: u32,
    pub host: Address,
    pub stake: i128,
}

#[contractevent]
pub struct EvDuelJoined {
    pub duel_id: u32,
    pub guest: Address,
    pub stake: i128,
    pub pool: i128,
}

/// Emitted right after `EvDuelJoined`, once the winner is drawn.
#[contractevent]
pub struct EvDuelSettled {
    pub duel_id: u32,
    pub winner: Address,
    pub host_won: bool,
}

#[contractevent]
pub struct EvDuelWithdrawn {
    pub duel_id: u32,
    pub winner: Address,
    pub payout: i128,
    pub fee: i128,
}

#[contractevent]
pub struct EvDuelExpired {
    pub duel_id: u32,
    pub host: Address,
    pub refund: i128,
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Errors
// ═══════════════════════════════════════════════════════════════════════════════

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum DuelsError {
    InvalidConfiguration = 1,
    InvalidStake = 2,
    InvalidJoinStake = 3,
    DuelNotFound = 4,
    DuelAlreadyPlayed = 5,
    DuelExpired = 6,
    NotExpirable = 7,
    NotYetExpired = 8,
    NotWithdrawable = 9,
    SelfJoin = 10,
    NotWinner = 11,
    NotOwner = 12,
    TransferFailed = 13,
    ConfigNotSet = 14,
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Duel state & storage keys
// ═══════════════════════════════════════════════════════════════════════════════

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum DuelStatus {
    AwaitingGuest = 0,
    WithdrawAvailable = 1,
    Withdrawn = 2,
    Expired = 3,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Duel {
    pub host: Address,
    pub host_stake: i128,
    pub guest: Option<Address>,
    pub guest_stake: i128,
    /// Undistributed value held for this duel. Zero once withdrawn or expired.
    pub pool: i128,
    pub winner: Option<Address>,
    pub status: DuelStatus,
    /// Ledger timestamp (seconds) at creation.
    pub created_at: u64,
}

/// Deployment-time economics. Written once by the constructor.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DuelsConfig {
    pub token: Address,
    pub min_amount: i128,
    pub fee_bps: u32,
    /// Seconds after creation during which a guest may join.
    pub join_window: u64,
}

#[contracttype]
#[derive(Clone)]
pub(crate) enum DataKey {
    Admin,
    Config,
    DuelCount,
    Duel(u32),
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Customary join window: 12 hours.
pub const DEFAULT_JOIN_WINDOW_SECS: u64 = 12 * 60 * 60;

/// Guest stake bounds, in tenths of the host stake.
const JOIN_LOW_TENTHS: i128 = 7;
const JOIN_HIGH_TENTHS: i128 = 13;

// ═══════════════════════════════════════════════════════════════════════════════
//  Contract
// ═══════════════════════════════════════════════════════════════════════════════

#[contract]
pub struct DuelsContract;

#[contractimpl]
impl DuelsContract {
    // ───────────────────────────────────────────────────────────────────────────
    //  Public: Constructor
    // ───────────────────────────────────────────────────────────────────────────

    pub fn __constructor(
        env: Env,
        admin: Address,
        token: Address,
        min_amount: i128,
        fee_bps: u32,
        join_window: u64,
    ) {
        if min_amount <= 0 || fee_bps == 0 || fee_bps >= BPS_DENOMINATOR || join_window == 0 {
            panic_with_error!(&env, DuelsError::InvalidConfiguration);
        }

        let config = DuelsConfig {
            token,
            min_amount,
            fee_bps,
            join_window,
        };
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Config, &config);
        env.storage().instance().set(&DataKey::DuelCount, &0u32);
    }

    // ───────────────────────────────────────────────────────────────────────────
    //  Public: Lifecycle
    // ───────────────────────────────────────────────────────────────────────────

    /// Open a new duel by escrowing `amount` from `host`. Returns the duel index.
    pub fn create(env: Env, host: Address, amount: i128) -> Result<u32, DuelsError> {
        host.require_auth();

        let config = Self::load_config(&env)?;
        if amount < config.min_amount {
            return Err(DuelsError::InvalidStake);
        }

        let duel = Duel {
            host: host.clone(),
            host_stake: amount,
            guest: None,
            guest_stake: 0,
            pool: amount,
            winner: None,
            status: DuelStatus::AwaitingGuest,
            created_at: env.ledger().timestamp(),
        };
        let duel_id = registry::append(&env, &duel);

        EvDuelCreated {
            duel_id,
            host: host.clone(),
            stake: amount,
        }.publish(&env);

        custody::escrow(&env, &config.token, &host, amount)?;
        Ok(duel_id)
    }

    /// Join an open duel with a counter-stake. The winner is drawn immediately.
    ///
    /// `amount` must be at least the configured minimum and lie within
    /// `[0.7 × host_stake, 1.3 × host_stake]`, both ends inclusive.
    pub fn join(env: Env, guest: Address, duel_id: u32, amount: i128) -> Result<(), DuelsError> {
        guest.require_auth();

        let config = Self::load_config(&env)?;
        let mut duel = registry::read(&env, duel_id)?;

        if duel.status != DuelStatus::AwaitingGuest {
            return Err(DuelsError::DuelAlreadyPlayed);
        }
        if env.ledger().timestamp() >= Self::expires_at(&duel, &config) {
            return Err(DuelsError::DuelExpired);
        }
        if guest == duel.host {
            return Err(DuelsError::SelfJoin);
        }

        let (low, high) = Self::join_bounds(duel.host_stake, config.min_amount)?;
        if amount < low || amount > high {
            return Err(DuelsError::InvalidJoinStake);
        }

        duel.guest = Some(guest.clone());
        duel.guest_stake = amount;
        duel.pool = duel
            .pool
            .checked_add(amount)
            .ok_or(DuelsError::InvalidJoinStake)?;

        let seed = outcome::draw_seed(&env, duel_id, &duel.host, &guest, duel.host_stake, amount);
        let side = outcome::pick_winner(&seed, duel.host_stake, amount);
        let winner = match side {
            Side::Host => duel.host.clone(),
            Side::Guest => guest.clone(),
        };
        duel.winner = Some(winner.clone());
        duel.status = DuelStatus::WithdrawAvailable;

        registry::write(&env, duel_id, &duel);

        EvDuelJoined {
            duel_id,
            guest: guest.clone(),
            stake: amount,
            pool: duel.pool,
        }.publish(&env);
        EvDuelSettled {
            duel_id,
            winner,
            host_won: side == Side::Host,
        }.publish(&env);

        custody::escrow(&env, &config.token, &guest, amount)?;
        Ok(())
    }

    /// Pay the pool out to the winner, minus the platform fee sent to the admin.
    /// Returns the amount paid to the winner.
    pub fn withdraw(env: Env, caller: Address, duel_id: u32) -> Result<i128, DuelsError> {
        caller.require_auth();

        let config = Self::load_config(&env)?;
        let admin = Self::load_admin(&env)?;
        let mut duel = registry::read(&env, duel_id)?;

        if duel.status != DuelStatus::WithdrawAvailable {
            return Err(DuelsError::NotWithdrawable);
        }
        let winner = duel.winner.clone().ok_or(DuelsError::NotWithdrawable)?;
        if caller != winner {
            return Err(DuelsError::NotWinner);
        }

        let (payout, fee) = fee::split(duel.pool, config.fee_bps);
        duel.pool = 0;
        duel.status = DuelStatus::Withdrawn;
        registry::write(&env, duel_id, &duel);

        EvDuelWithdrawn {
            duel_id,
            winner: winner.clone(),
            payout,
            fee,
        }.publish(&env);

        custody::release(&env, &config.token, &winner, payout)?;
        if fee > 0 {
            custody::release(&env, &config.token, &admin, fee)?;
        }
        Ok(payout)
    }

    /// Admin-only: refund the host of a duel nobody joined within the window.
    pub fn expire(env: Env, caller: Address, duel_id: u32) -> Result<(), DuelsError> {
        caller.require_auth();

        let admin = Self::load_admin(&env)?;
        if caller != admin {
            return Err(DuelsError::NotOwner);
        }

        let config = Self::load_config(&env)?;
        let mut duel = registry::read(&env, duel_id)?;

        if duel.status != DuelStatus::AwaitingGuest {
            return Err(DuelsError::NotExpirable);
        }
        if env.ledger().timestamp() < Self::expires_at(&duel, &config) {
            return Err(DuelsError::NotYetExpired);
        }

        let refund = duel.host_stake;
        duel.pool = 0;
        duel.status = DuelStatus::Expired;
        registry::write(&env, duel_id, &duel);

        EvDuelExpired {
            duel_id,
            host: duel.host.clone(),
            refund,
        }.publish(&env);

        custody::release(&env, &config.token, &duel.host, refund)?;
        Ok(())
    }

    // ───────────────────────────────────────────────────────────────────────────
    //  Public: Read
    // ───────────────────────────────────────────────────────────────────────────

    pub fn duel_count(env: Env) -> u32 {
        registry::count(&env)
    }

    pub fn get_duel(env: Env, duel_id: u32) -> Result<Duel, DuelsError> {
        registry::read(&env, duel_id)
    }

    /// Up to `limit` duels starting at index `start`, in creation order.
    pub fn get_duels(env: Env, start: u32, limit: u32) -> Vec<Duel> {
        registry::page(&env, start, limit)
    }

    pub fn get_admin(env: Env) -> Result<Address, DuelsError> {
        Self::load_admin(&env)
    }

    pub fn get_config(env: Env) -> Result<DuelsConfig, DuelsError> {
        Self::load_config(&env)
    }

    pub fn get_token(env: Env) -> Result<Address, DuelsError> {
        Ok(Self::load_config(&env)?.token)
    }

    /// Token balance held by this contract. Matches the sum of all pools.
    pub fn escrowed_balance(env: Env) -> Result<i128, DuelsError> {
        let config = Self::load_config(&env)?;
        Ok(custody::held_balance(&env, &config.token))
    }

    /// Inclusive `(low, high)` guest stake range `join` accepts for a duel.
    pub fn quote_join_bounds(env: Env, duel_id: u32) -> Result<(i128, i128), DuelsError> {
        let config = Self::load_config(&env)?;
        let duel = registry::read(&env, duel_id)?;
        Self::join_bounds(duel.host_stake, config.min_amount)
    }

    /// `(payout, fee)` for a pool under the deployed fee rate.
    pub fn quote_fee(env: Env, pool: i128) -> Result<(i128, i128), DuelsError> {
        if pool < 0 {
            return Err(DuelsError::InvalidStake);
        }
        let config = Self::load_config(&env)?;
        Ok(fee::split(pool, config.fee_bps))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    //  Internal: Rules
    // ═══════════════════════════════════════════════════════════════════════════

    fn expires_at(duel: &Duel, config: &DuelsConfig) -> u64 {
        duel.created_at.saturating_add(config.join_window)
    }

    /// `low = max(ceil(0.7 × host_stake), min_amount)`, `high = floor(1.3 × host_stake)`.
    /// Integer stakes make these exactly equivalent to
    /// `10 × stake ≥ 7 × host_stake` and `10 × stake ≤ 13 × host_stake`.
    fn join_bounds(host_stake: i128, min_amount: i128) -> Result<(i128, i128), DuelsError> {
        let low = host_stake
            .checked_mul(JOIN_LOW_TENTHS)
            .and_then(|v| v.checked_add(9))
            .ok_or(DuelsError::InvalidJoinStake)?
            / 10;
        let high = host_stake
            .checked_mul(JOIN_HIGH_TENTHS)
            .ok_or(DuelsError::InvalidJoinStake)?
            / 10;
        Ok((low.max(min_amount), high))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    //  Internal: Storage
    // ═══════════════════════════════════════════════════════════════════════════

    fn load_admin(env: &Env) -> Result<Address, DuelsError> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(DuelsError::ConfigNotSet)
    }

    fn load_config(env: &Env) -> Result<DuelsConfig, DuelsError> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(DuelsError::ConfigNotSet)
    }
}
