//! Haraka v2 short-input hashes
//!
//! Haraka-256 (32 -> 32 bytes) expands the CLHash key, Haraka-512
//! (64 -> 32 bytes) is the chaining function of every version. The keyed
//! form of Haraka-512 takes its 40 round constants from a caller-provided
//! window instead of [`ROUND_CONSTANTS`]. The V1 chain runs Haraka-512 with
//! [`ZERO_ROUND_CONSTANTS`].

use crate::params::{DIGEST_SIZE, HARAKA_CONSTANTS, HARAKA_ROUNDS};
use crate::primitives::{aesenc, load, unpackhi_epi32, unpacklo_epi32};
use crate::setup::Backend;

/// Haraka v2 round constants, one AES round key per entry
pub const ROUND_CONSTANTS: [u128; HARAKA_CONSTANTS] = [
    0x0684704c_e620c00a_b2c5fef0_75817b9d,
    0x8b66b4e1_88f3a06b_640f6ba4_2f08f717,
    0x3402de2d_53f28498_cf029d60_9f029114,
    0x0ed6eae6_2e7b4f08_bbf3bcaf_fd5b4f79,
    0xcbcfb0cb_4872448b_79eecd1c_be397044,
    0x7eeacdee_6e9032b7_8d5335ed_2b8a057b,
    0x67c28f43_5e2e7cd0_e2412761_da4fef1b,
    0x2924d9b0_afcacc07_675ffde2_1fc70b3b,
    0xab4d63f1_e6867fe9_ecdb8fca_b9d465ee,
    0x1c30bf84_d4b7cd64_5b2a404f_ad037e33,
    0xb2cc0bb9_941723bf_69028b2e_8df69800,
    0xfa0478a6_de6f5572_4aaa9ec8_5c9d2d8a,
    0xdfb49f2b_6b772a12_0efa4f2e_29129fd4,
    0x1ea10344_f449a236_32d611ae_bb6a12ee,
    0xaf044988_4b050084_5f9600c9_9ca8eca6,
    0x21025ed8_9d199c4f_78a2c7e3_27e593ec,
    0xbf3aaaf8_a759c9b7_b9282ecd_82d40173,
    0x6260700d_6186b017_37f2efd9_10307d6b,
    0x5aca45c2_21300443_81c29153_f6fc9ac6,
    0x9223973c_226b68bb_2caf92e8_36d1943a,
    0xd3bf9238_225886eb_6cbab958_e51071b4,
    0xdb863ce5_aef0c677_933dfddd_24e1128d,
    0xbb606268_ffeba09c_83e48de3_cb2212b1,
    0x734bd3dc_e2e4d19c_2db91a4e_c72bf77d,
    0x43bb47c3_61301b43_4b1415c4_2cb3924e,
    0xdba775a8_e707eff6_03b231dd_16eb6899,
    0x6df3614b_3c755977_8e5e2302_7eca472c,
    0xcda75a17_d6de7d77_6d1be5b9_b88617f9,
    0xec6b43f0_6ba8e9aa_9d6c069d_a946ee5d,
    0xcb1e6950_f957332b_a2531159_3bf327c1,
    0x2cee0c75_00da619c_e4ed0353_600ed0d9,
    0xf0b1a5a1_96e90cab_80bbbabc_63a4a350,
    0xae3db102_5e962988_ab0dde30_938dca39,
    0x17bb8f38_d554a40b_8814f3a8_2e75b442,
    0x34bb8a5b_5f427fd7_aeb6b779_360a16f6,
    0x26f65241_cbe55438_43ce5918_ffbaafde,
    0x4ce99a54_b9f3026a_a2ca9cf7_839ec978,
    0xae51a51a_1bdff7be_40c06e28_22901235,
    0xa0c1613c_ba7ed22b_c173bc0f_48a659cf,
    0x756acc03_02288288_4ad6bdfd_e9c59da1,
];

/// Round constants of the V1 chain: every round key is zero
pub const ZERO_ROUND_CONSTANTS: [u128; HARAKA_CONSTANTS] = [0; HARAKA_CONSTANTS];

/// Two AES rounds on each of two lanes, interleaved
#[inline(always)]
fn aes2(backend: Backend, s: &mut [u128; 2], rc: &[u128]) {
    s[0] = aesenc(backend, s[0], rc[0]);
    s[1] = aesenc(backend, s[1], rc[1]);
    s[0] = aesenc(backend, s[0], rc[2]);
    s[1] = aesenc(backend, s[1], rc[3]);
}

/// Two AES rounds on each of four lanes, interleaved
#[inline(always)]
fn aes4(backend: Backend, s: &mut [u128; 4], rc: &[u128]) {
    for (i, key) in rc[..8].iter().enumerate() {
        s[i & 3] = aesenc(backend, s[i & 3], *key);
    }
}

#[inline(always)]
pub(crate) fn mix2(s: &mut [u128; 2]) {
    let tmp = unpacklo_epi32(s[0], s[1]);
    s[1] = unpackhi_epi32(s[0], s[1]);
    s[0] = tmp;
}

#[inline(always)]
fn mix4(s: &mut [u128; 4]) {
    let tmp = unpacklo_epi32(s[0], s[1]);
    s[0] = unpackhi_epi32(s[0], s[1]);
    s[1] = unpacklo_epi32(s[2], s[3]);
    s[2] = unpackhi_epi32(s[2], s[3]);
    s[3] = unpacklo_epi32(s[0], s[2]);
    s[0] = unpackhi_epi32(s[0], s[2]);
    s[2] = unpackhi_epi32(s[1], tmp);
    s[1] = unpacklo_epi32(s[1], tmp);
}

/// Two AES rounds per lane with `rc[0..4]`, used by the CLHash mixer
#[inline(always)]
pub(crate) fn aes2_mix2(backend: Backend, s: &mut [u128; 2], rc: &[u128]) {
    aes2(backend, s, rc);
    mix2(s);
}

/// Haraka-256 v2
pub fn haraka256(backend: Backend, rc: &[u128], input: &[u8; 32]) -> [u8; 32] {
    let feed = [load(&input[..16]), load(&input[16..])];
    let mut s = feed;

    for round in 0..HARAKA_ROUNDS {
        aes2(backend, &mut s, &rc[4 * round..]);
        mix2(&mut s);
    }

    let mut out = [0u8; 32];
    out[..16].copy_from_slice(&(s[0] ^ feed[0]).to_le_bytes());
    out[16..].copy_from_slice(&(s[1] ^ feed[1]).to_le_bytes());
    out
}

/// Haraka-512 v2 with the round constants in `rc` (at least 40 entries).
/// Standard Haraka-512 passes [`ROUND_CONSTANTS`].
pub fn haraka512(backend: Backend, rc: &[u128], input: &[u8; 64]) -> [u8; DIGEST_SIZE] {
    let feed = [
        load(&input[..16]),
        load(&input[16..32]),
        load(&input[32..48]),
        load(&input[48..]),
    ];
    let mut s = feed;

    for round in 0..HARAKA_ROUNDS {
        aes4(backend, &mut s, &rc[8 * round..]);
        mix4(&mut s);
    }

    for (lane, f) in s.iter_mut().zip(feed) {
        *lane ^= f;
    }

    // truncate: high halves of lanes 0 and 1, low halves of lanes 2 and 3
    let mut out = [0u8; DIGEST_SIZE];
    out[..8].copy_from_slice(&((s[0] >> 64) as u64).to_le_bytes());
    out[8..16].copy_from_slice(&((s[1] >> 64) as u64).to_le_bytes());
    out[16..24].copy_from_slice(&(s[2] as u64).to_le_bytes());
    out[24..].copy_from_slice(&(s[3] as u64).to_le_bytes());
    out
}
