//! Raw primitives for Haraka and the CLHash mixer
//!
//! 128-bit values are carried as `u128` in little-endian lane order, so
//! byte `i` of an XMM register is bits `8*i..8*i+8`. Each primitive has a
//! software form and an x86_64 intrinsic form; the [`Backend`] chosen at
//! setup decides which runs. Both must agree bit for bit.

use crate::setup::Backend;

/// Single AESENC round: SubBytes + ShiftRows + MixColumns + AddRoundKey
#[inline(always)]
pub fn aesenc(backend: Backend, state: u128, round_key: u128) -> u128 {
    match backend {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: setup only selects AesNi after cpuid reports AES and PCLMULQDQ
        Backend::AesNi => unsafe { x86::aesenc(state, round_key) },
        _ => aesenc_soft(state, round_key),
    }
}

/// 64x64 -> 128 carry-less multiply (PCLMULQDQ)
#[inline(always)]
pub fn clmul(backend: Backend, a: u64, b: u64) -> u128 {
    match backend {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: see `aesenc`
        Backend::AesNi => unsafe { x86::clmul(a, b) },
        _ => clmul_soft(a, b),
    }
}

/// Carry-less product of the low and high halves of `x`
/// (PCLMULQDQ with selector 0x10 and both operands equal)
#[inline(always)]
pub fn clmul_halves(backend: Backend, x: u128) -> u128 {
    clmul(backend, x as u64, (x >> 64) as u64)
}

/// Signed 16-bit lanes multiplied, rounded and scaled down by 2^15 (PMULHRSW)
#[inline(always)]
pub fn mulhrs_epi16(a: u128, b: u128) -> u128 {
    let mut out = 0u128;
    for lane in 0..8 {
        let shift = lane * 16;
        let x = (a >> shift) as u16 as i16 as i32;
        let y = (b >> shift) as u16 as i16 as i32;
        let r = (((x * y) >> 14) + 1) >> 1;
        out |= ((r as u16) as u128) << shift;
    }
    out
}

#[inline(always)]
fn lanes32(x: u128) -> [u32; 4] {
    [x as u32, (x >> 32) as u32, (x >> 64) as u32, (x >> 96) as u32]
}

#[inline(always)]
fn from_lanes32(l: [u32; 4]) -> u128 {
    (l[0] as u128) | ((l[1] as u128) << 32) | ((l[2] as u128) << 64) | ((l[3] as u128) << 96)
}

/// Interleave the low 32-bit lanes: `[a0, b0, a1, b1]`
#[inline(always)]
pub fn unpacklo_epi32(a: u128, b: u128) -> u128 {
    let (a, b) = (lanes32(a), lanes32(b));
    from_lanes32([a[0], b[0], a[1], b[1]])
}

/// Interleave the high 32-bit lanes: `[a2, b2, a3, b3]`
#[inline(always)]
pub fn unpackhi_epi32(a: u128, b: u128) -> u128 {
    let (a, b) = (lanes32(a), lanes32(b));
    from_lanes32([a[2], b[2], a[3], b[3]])
}

/// Load 16 bytes as a little-endian lane value
#[inline(always)]
pub fn load(bytes: &[u8]) -> u128 {
    let mut block = [0u8; 16];
    block.copy_from_slice(&bytes[..16]);
    u128::from_le_bytes(block)
}

fn aesenc_soft(state: u128, round_key: u128) -> u128 {
    let state = state.to_le_bytes();

    // SubBytes
    let mut s = [0u8; 16];
    for i in 0..16 {
        s[i] = SBOX[state[i] as usize];
    }

    // ShiftRows (state viewed as a 4x4 column-major matrix)
    let t = s;
    s[1] = t[5];
    s[5] = t[9];
    s[9] = t[13];
    s[13] = t[1];

    s[2] = t[10];
    s[6] = t[14];
    s[10] = t[2];
    s[14] = t[6];

    s[3] = t[15];
    s[7] = t[3];
    s[11] = t[7];
    s[15] = t[11];

    // MixColumns
    let mut out = [0u8; 16];
    for col in 0..4 {
        let i = col * 4;
        let a0 = s[i];
        let a1 = s[i + 1];
        let a2 = s[i + 2];
        let a3 = s[i + 3];

        out[i] = gf_mul2(a0) ^ gf_mul3(a1) ^ a2 ^ a3;
        out[i + 1] = a0 ^ gf_mul2(a1) ^ gf_mul3(a2) ^ a3;
        out[i + 2] = a0 ^ a1 ^ gf_mul2(a2) ^ gf_mul3(a3);
        out[i + 3] = gf_mul3(a0) ^ a1 ^ a2 ^ gf_mul2(a3);
    }

    // AddRoundKey
    u128::from_le_bytes(out) ^ round_key
}

fn clmul_soft(a: u64, b: u64) -> u128 {
    let a = a as u128;
    let mut product = 0u128;
    for bit in 0..64 {
        if (b >> bit) & 1 == 1 {
            product ^= a << bit;
        }
    }
    product
}

/// Multiply by 2 in GF(2^8) with reduction polynomial x^8 + x^4 + x^3 + x + 1
#[inline(always)]
fn gf_mul2(x: u8) -> u8 {
    let hi = x >> 7;
    (x << 1) ^ (hi * 0x1b)
}

#[inline(always)]
fn gf_mul3(x: u8) -> u8 {
    gf_mul2(x) ^ x
}

const SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

#[cfg(target_arch = "x86_64")]
mod x86 {
    use core::arch::x86_64::{__m128i, _mm_aesenc_si128, _mm_clmulepi64_si128, _mm_set_epi64x};
    use core::mem::transmute;

    #[target_feature(enable = "aes")]
    pub unsafe fn aesenc(state: u128, round_key: u128) -> u128 {
        unsafe {
            let s: __m128i = transmute(state);
            let k: __m128i = transmute(round_key);
            transmute(_mm_aesenc_si128(s, k))
        }
    }

    #[target_feature(enable = "pclmulqdq")]
    pub unsafe fn clmul(a: u64, b: u64) -> u128 {
        unsafe {
            let a = _mm_set_epi64x(0, a as i64);
            let b = _mm_set_epi64x(0, b as i64);
            transmute(_mm_clmulepi64_si128(a, b, 0x00))
        }
    }
}
