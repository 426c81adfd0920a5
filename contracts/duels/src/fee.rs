//! Platform cut taken from a pool on withdrawal.

/// Fee rates are expressed in basis points of the pool.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Split a non-negative `pool` into `(payout, fee)`.
///
/// `fee = floor(pool × fee_bps / 10_000)`, computed as
/// `q × fee_bps + floor(r × fee_bps / 10_000)` with `pool = q × 10_000 + r`
/// so large pools cannot overflow. `payout + fee == pool` always holds.
pub(crate) fn split(pool: i128, fee_bps: u32) -> (i128, i128) {
    let denom = BPS_DENOMINATOR as i128;
    let bps = fee_bps.min(BPS_DENOMINATOR) as i128;
    let fee = (pool / denom) * bps + (pool % denom) * bps / denom;
    (pool - fee, fee)
}
