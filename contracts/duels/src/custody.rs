//! Token escrow against the configured Stellar token contract.
//!
//! Transfers go through the generated `try_transfer` so a rejected transfer
//! (insufficient balance, missing authorization, frozen account) surfaces as
//! `TransferFailed` instead of trapping. The caller returns that error, and
//! the host discards everything the invocation wrote.

use soroban_sdk::{token::TokenClient, Address, Env};

use crate::DuelsError;

/// Move `amount` from `from` into the contract.
pub(crate) fn escrow(
    env: &Env,
    token: &Address,
    from: &Address,
    amount: i128,
) -> Result<(), DuelsError> {
    let client = TokenClient::new(env, token);
    match client.try_transfer(from, &env.current_contract_address(), &amount) {
        Ok(Ok(_)) => Ok(()),
        _ => Err(DuelsError::TransferFailed),
    }
}

/// Move `amount` held by the contract out to `to`.
pub(crate) fn release(
    env: &Env,
    token: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), DuelsError> {
    let client = TokenClient::new(env, token);
    match client.try_transfer(&env.current_contract_address(), to, &amount) {
        Ok(Ok(_)) => Ok(()),
        _ => Err(DuelsError::TransferFailed),
    }
}

pub(crate) fn held_balance(env: &Env, token: &Address) -> i128 {
    TokenClient::new(env, token).balance(&env.current_contract_address())
}
