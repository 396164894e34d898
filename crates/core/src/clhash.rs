//! CLHash mixer for the V2 family
//!
//! An 8832-byte key is expanded from 32 bytes of chain state by chaining
//! Haraka-256. The mixer then walks the key for [`MIX_ROUNDS`] rounds: the
//! low bits of the accumulator pick one of eight operations, which buffer
//! word to read and two key words to mutate. The key is modified in place
//! and the final Haraka-512 of the V2 cores reads its constants from the
//! mutated key, so callers must hand in a fresh key per digest.
//!
//! Offsets are in 128-bit words. Every read stays below [`KEY_WORDS`]:
//! selected words are masked to the 8 KiB window and the widest excursion
//! past a selected word is 40 words, covered by the spare constant set.

use crate::haraka::{aes2_mix2, haraka256};
use crate::params::{KEY_MASK_WORDS, KEY_WORDS, MIX_ROUNDS};
use crate::primitives::{clmul, clmul_halves, load, mulhrs_epi16};
use crate::setup::Backend;

/// CLHash key as 128-bit words
pub type Key = [u128; KEY_WORDS];

/// Mixer revision, one per V2 generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Revision {
    /// V2: the multi-round branch tests its round bit with a 32-bit shift,
    /// so rounds 4..=7 never take the carry-less branch and round 3 tests
    /// the sign-extended high half
    Initial,
    /// V2b: the round bit is a proper 64-bit shift
    WideShift,
    /// V2b1: wide shift, and the 0x18 operation becomes a second multi-round
    /// loop mixing in a signed remainder
    DivisionLoop,
}

/// Fill `key` by chaining Haraka-256 from `seed`
pub fn expand_key(backend: Backend, rc: &[u128], seed: &[u8; 32], key: &mut Key) {
    let mut chain = *seed;
    for pair in key.chunks_exact_mut(2) {
        chain = haraka256(backend, rc, &chain);
        pair[0] = load(&chain[..16]);
        pair[1] = load(&chain[16..]);
    }
}

/// Fold a 64-byte buffer into 64 bits, mutating `key`
pub fn clhash(
    backend: Backend,
    revision: Revision,
    key: &mut Key,
    buf: &[u8; 64],
    length_hash: u128,
) -> u64 {
    let acc = mix(backend, revision, key, &fold_words(buf)) ^ length_hash;
    reduce64(backend, acc)
}

/// The mixer's view of the buffer: the upper two words folded into the
/// lower two, followed by the upper two unchanged
#[inline(always)]
fn fold_words(buf: &[u8; 64]) -> [u128; 4] {
    let upper = [load(&buf[32..48]), load(&buf[48..])];
    [
        load(&buf[..16]) ^ upper[0],
        load(&buf[16..32]) ^ upper[1],
        upper[0],
        upper[1],
    ]
}

/// Bit tested in round `round` of the multi-round operations
#[inline(always)]
fn round_bit(revision: Revision, round: u64) -> u64 {
    match revision {
        Revision::Initial => match round {
            0..=2 => 0x1000_0000 << round,
            3 => 0xffff_ffff_8000_0000,
            _ => 0,
        },
        Revision::WideShift | Revision::DivisionLoop => 0x1000_0000u64 << round,
    }
}

/// Signed remainder of the low 64 bits by the low 32 bits of the selector,
/// placed in the low 32-bit lane
#[inline(always)]
fn remainder_lane(value: u128, selector: u64) -> u128 {
    // selector & 0x1c != 0 on every path that gets here, so the divisor is non-zero
    let divisor = selector as u32 as i32 as i64;
    let dividend = value as u64 as i64;
    dividend.wrapping_rem(divisor) as i32 as u32 as u128
}

fn mix(backend: Backend, revision: Revision, key: &mut Key, buf: &[u128; 4]) -> u128 {
    let mut acc = key[KEY_MASK_WORDS as usize + 2];

    for _ in 0..MIX_ROUNDS {
        let selector = acc as u64;

        let prand = ((selector >> 5) & KEY_MASK_WORDS) as usize;
        let prandex = ((selector >> 32) & KEY_MASK_WORDS) as usize;

        // `near` starts the buffer walk, `far` is its neighbour in the same pair
        let near = (selector & 3) as usize;
        let far = if selector & 1 == 1 { near - 1 } else { near + 1 };

        match selector & 0x1c {
            0x00 => {
                let temp1 = key[prandex];
                acc ^= clmul_halves(backend, temp1 ^ buf[far]);

                let tempa2 = mulhrs_epi16(acc, temp1) ^ temp1;

                let temp12 = key[prand];
                key[prand] = tempa2;

                acc ^= clmul_halves(backend, temp12 ^ buf[near]);

                key[prandex] = mulhrs_epi16(acc, temp12) ^ temp12;
            }
            0x04 => {
                let temp1 = key[prand];
                let temp2 = buf[near];
                acc ^= clmul_halves(backend, temp1 ^ temp2);
                acc ^= clmul_halves(backend, temp2);

                let tempa2 = mulhrs_epi16(acc, temp1) ^ temp1;

                let temp12 = key[prandex];
                key[prandex] = tempa2;

                acc ^= temp12 ^ buf[far];

                key[prand] = mulhrs_epi16(acc, temp12) ^ temp12;
            }
            0x08 => {
                let temp1 = key[prandex];
                acc ^= temp1 ^ buf[near];

                let tempa2 = mulhrs_epi16(acc, temp1) ^ temp1;

                let temp12 = key[prand];
                key[prand] = tempa2;

                let temp22 = buf[far];
                acc ^= clmul_halves(backend, temp12 ^ temp22);
                acc ^= clmul_halves(backend, temp22);

                key[prandex] = mulhrs_epi16(acc, temp12) ^ temp12;
            }
            0x0c => {
                let temp1 = key[prand];
                acc ^= temp1 ^ buf[far];

                let dividend = acc as u64;
                acc ^= remainder_lane(acc, selector);

                let tempa2 = mulhrs_epi16(acc, temp1) ^ temp1;

                if dividend & 1 == 1 {
                    let temp12 = key[prandex];
                    key[prandex] = tempa2;

                    let temp22 = buf[near];
                    acc ^= clmul_halves(backend, temp12 ^ temp22);
                    acc ^= clmul_halves(backend, temp22);

                    key[prand] = mulhrs_epi16(acc, temp12) ^ temp12;
                } else {
                    let tempb3 = key[prandex];
                    key[prandex] = tempa2;
                    key[prand] = tempb3;
                }
            }
            0x10 => {
                // three Haraka-style double rounds keyed from the key at prand
                let mut lanes = [buf[far], buf[near]];
                aes2_mix2(backend, &mut lanes, &key[prand..]);
                aes2_mix2(backend, &mut lanes, &key[prand + 4..]);
                aes2_mix2(backend, &mut lanes, &key[prand + 8..]);

                acc ^= lanes[0] ^ lanes[1];

                swap_mutated(key, prand, prandex, acc);
            }
            0x14 => {
                let rounds = selector >> 61;
                let mut rc = prand;
                let mut aes_round = 0usize;

                for round in (0..=rounds).rev() {
                    let onekey = key[rc];
                    rc += 1;

                    if selector & round_bit(revision, round) != 0 {
                        let temp2 = if round & 1 == 1 { buf[near] } else { buf[far] };
                        acc ^= clmul_halves(backend, onekey ^ temp2);
                    } else {
                        let temp2 = if round & 1 == 1 { buf[far] } else { buf[near] };
                        let mut lanes = [onekey, temp2];
                        aes2_mix2(backend, &mut lanes, &key[rc + (aes_round << 2)..]);
                        aes_round += 1;

                        acc ^= lanes[0] ^ lanes[1];
                    }
                }

                swap_mutated(key, prand, prandex, acc);
            }
            0x18 if revision == Revision::DivisionLoop => {
                let rounds = selector >> 61;
                let mut rc = prand;

                for round in (0..=rounds).rev() {
                    let onekey = key[rc];
                    rc += 1;

                    if selector & round_bit(revision, round) != 0 {
                        let temp2 = if round & 1 == 1 { buf[near] } else { buf[far] };
                        acc ^= remainder_lane(onekey ^ temp2, selector);
                    } else {
                        let temp2 = if round & 1 == 1 { buf[far] } else { buf[near] };
                        let clprod = clmul_halves(backend, onekey ^ temp2);
                        acc ^= mulhrs_epi16(acc, clprod);
                    }
                }

                let tempa3 = key[prandex];
                key[prandex] = tempa3 ^ acc;
                key[prand] = tempa3;
            }
            0x18 => {
                let temp2 = key[prand];
                acc ^= clmul_halves(backend, buf[far] ^ temp2);

                let tempa2 = mulhrs_epi16(acc, temp2) ^ temp2;

                let tempb3 = key[prandex];
                key[prandex] = tempa2;
                key[prand] = tempb3;
            }
            _ => {
                let temp2 = key[prandex];
                acc ^= clmul_halves(backend, buf[near] ^ temp2);

                let tempa2 = mulhrs_epi16(acc, temp2) ^ temp2;

                let tempa3 = key[prand];
                key[prand] = tempa2;

                acc ^= tempa3;

                key[prandex] = mulhrs_epi16(acc, tempa3) ^ tempa3;
            }
        }
    }

    acc
}

/// Mutate the word at `prand` with the accumulator and swap it into `prandex`
#[inline(always)]
fn swap_mutated(key: &mut Key, prand: usize, prandex: usize, acc: u128) {
    let tempa1 = key[prand];
    let tempa3 = tempa1 ^ mulhrs_epi16(acc, tempa1);

    let tempa4 = key[prandex];
    key[prandex] = tempa3;
    key[prand] = tempa4;
}

/// GF(2) multiples of 0x1b for each nibble, used by the final reduction
const REDUCTION_TABLE: [u8; 16] = [
    0, 27, 54, 45, 108, 119, 90, 65, 216, 195, 238, 245, 180, 175, 130, 153,
];

/// Reduce the 128-bit accumulator to 64 bits modulo x^64 + x^4 + x^3 + x + 1
fn reduce64(backend: Backend, a: u128) -> u64 {
    let q2 = clmul(backend, (a >> 64) as u64, 0x1b);

    let overflow = (q2 >> 64) as u64;
    let mut q3 = 0u64;
    for byte in 0..8 {
        let index = (overflow >> (8 * byte)) as u8;
        if index & 0x80 == 0 {
            q3 |= (REDUCTION_TABLE[(index & 0x0f) as usize] as u64) << (8 * byte);
        }
    }

    q3 ^ (q2 as u64) ^ (a as u64)
}
