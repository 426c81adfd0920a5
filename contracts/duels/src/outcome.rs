//! Stake-weighted winner selection.
//!
//! The draw is split in two so the weighting can be checked with fixed seeds:
//!
//! * [`draw_seed`] gathers call-time entropy and hashes it:
//!   `keccak256(prng_u64 || timestamp || sequence || duel_id || host_stake ||
//!   guest_stake || host || guest)`. `prng_u64` comes from the host PRNG,
//!   which the network seeds per transaction, so the guest cannot compute
//!   the seed before the join executes.
//! * [`pick_winner`] reads the first 16 bytes of the seed as a big-endian
//!   `u128`, reduces it modulo `pool = host_stake + guest_stake`, and gives the
//!   host the win iff `roll < host_stake`. The host wins with probability
//!   `host_stake / pool`, the guest with `guest_stake / pool`.

use soroban_sdk::{Address, Bytes, Env};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Side {
    Host,
    Guest,
}

pub(crate) fn draw_seed(
    env: &Env,
    duel_id: u32,
    host: &Address,
    guest: &Address,
    host_stake: i128,
    guest_stake: i128,
) -> [u8; 32] {
    let nonce: u64 = env.prng().gen();

    let mut data = Bytes::from_array(env, &nonce.to_be_bytes());
    data.append(&Bytes::from_array(env, &env.ledger().timestamp().to_be_bytes()));
    data.append(&Bytes::from_array(env, &env.ledger().sequence().to_be_bytes()));
    data.append(&Bytes::from_array(env, &duel_id.to_be_bytes()));
    data.append(&Bytes::from_array(env, &host_stake.to_be_bytes()));
    data.append(&Bytes::from_array(env, &guest_stake.to_be_bytes()));
    data.append(&host.to_string().to_bytes());
    data.append(&guest.to_string().to_bytes());

    env.crypto().keccak256(&data).to_array()
}

/// Both stakes must be positive.
pub(crate) fn pick_winner(seed: &[u8; 32], host_stake: i128, guest_stake: i128) -> Side {
    let pool = (host_stake as u128) + (guest_stake as u128);
    let mut head = [0u8; 16];
    head.copy_from_slice(&seed[..16]);
    let roll = u128::from_be_bytes(head) % pool;

    if roll < host_stake as u128 {
        Side::Host
    } else {
        Side::Guest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_with_roll(roll: u128) -> [u8; 32] {
        let mut seed = [0u8; 32];
        seed[..16].copy_from_slice(&roll.to_be_bytes());
        seed
    }

    /// splitmix64, only used to spread test seeds.
    fn next(state: &mut u64) -> u64 {
        *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = *state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn random_seed(state: &mut u64) -> [u8; 32] {
        let mut seed = [0u8; 32];
        for chunk in seed.chunks_mut(8) {
            chunk.copy_from_slice(&next(state).to_be_bytes());
        }
        seed
    }

    #[test]
    fn roll_threshold_splits_at_host_stake() {
        assert_eq!(pick_winner(&seed_with_roll(0), 100, 130), Side::Host);
        assert_eq!(pick_winner(&seed_with_roll(99), 100, 130), Side::Host);
        assert_eq!(pick_winner(&seed_with_roll(100), 100, 130), Side::Guest);
        assert_eq!(pick_winner(&seed_with_roll(229), 100, 130), Side::Guest);
        // Wraps modulo the pool
        assert_eq!(pick_winner(&seed_with_roll(230), 100, 130), Side::Host);
        assert_eq!(pick_winner(&seed_with_roll(330), 100, 130), Side::Guest);
    }

    #[test]
    fn same_seed_same_winner() {
        let mut state = 7u64;
        let seed = random_seed(&mut state);
        let first = pick_winner(&seed, 40_000_000, 52_000_000);
        for _ in 0..10 {
            assert_eq!(pick_winner(&seed, 40_000_000, 52_000_000), first);
        }
    }

    #[test]
    fn win_rate_tracks_stake_share() {
        const TRIALS: u32 = 4_000;
        let cases: [(i128, i128); 3] = [(100, 130), (100, 70), (1_000, 1_000)];

        for (host_stake, guest_stake) in cases {
            let mut state = 0xD0E1_5EED_u64 ^ (host_stake as u64) ^ ((guest_stake as u64) << 20);
            let mut host_wins = 0u32;
            for _ in 0..TRIALS {
                if pick_winner(&random_seed(&mut state), host_stake, guest_stake) == Side::Host {
                    host_wins += 1;
                }
            }

            // Expected share in per-mille, tolerance ±30 (about 4 standard deviations)
            let expected = (host_stake * 1_000 / (host_stake + guest_stake)) as u32;
            let observed = host_wins * 1_000 / TRIALS;
            assert!(
                observed + 30 >= expected && observed <= expected + 30,
                "host {} guest {}: expected ~{}‰, observed {}‰",
                host_stake,
                guest_stake,
                expected,
                observed
            );
        }
    }
}
