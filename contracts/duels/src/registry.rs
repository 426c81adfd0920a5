//! Append-only duel registry. Indices are handed out sequentially from zero
//! and never reused; records are never removed.

use soroban_sdk::{Env, Vec};

use crate::{DataKey, Duel, DuelsError};

// Ledger rate is approximately 5 seconds per ledger on Stellar
const LEDGER_RATE_SECS: u32 = 5;

// Duels hold funds, so keep them well past any realistic claim delay (120 days)
const DUEL_TTL_SECONDS: u32 = 120 * 24 * 60 * 60;
const DUEL_TTL_LEDGERS: u32 = DUEL_TTL_SECONDS / LEDGER_RATE_SECS;

pub(crate) fn count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::DuelCount)
        .unwrap_or(0)
}

/// Store `duel` under the next free index and return that index.
pub(crate) fn append(env: &Env, duel: &Duel) -> u32 {
    let duel_id = count(env);
    write(env, duel_id, duel);
    env.storage()
        .instance()
        .set(&DataKey::DuelCount, &(duel_id + 1));
    duel_id
}

pub(crate) fn read(env: &Env, duel_id: u32) -> Result<Duel, DuelsError> {
    env.storage()
        .persistent()
        .get(&DataKey::Duel(duel_id))
        .ok_or(DuelsError::DuelNotFound)
}

pub(crate) fn write(env: &Env, duel_id: u32, duel: &Duel) {
    let key = DataKey::Duel(duel_id);
    env.storage().persistent().set(&key, duel);
    env.storage()
        .persistent()
        .extend_ttl(&key, DUEL_TTL_LEDGERS, DUEL_TTL_LEDGERS);
    // Keep instance storage (admin, config, count) alive with the duels
    env.storage()
        .instance()
        .extend_ttl(DUEL_TTL_LEDGERS, DUEL_TTL_LEDGERS);
}

pub(crate) fn page(env: &Env, start: u32, limit: u32) -> Vec<Duel> {
    let end = start.saturating_add(limit).min(count(env));
    let mut result = Vec::new(env);
    let mut i = start;
    while i < end {
        if let Ok(duel) = read(env, i) {
            result.push_back(duel);
        }
        i += 1;
    }
    result
}
