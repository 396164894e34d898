//! C ABI for native callers (node addons, mining software)
//!
//! Every entry point writes a 32-byte digest to `out` and returns a status
//! code: zero on success, a negative `VERUSHASH_ERR_*` value otherwise. All
//! calls go through the process-wide default engine, so the first call
//! performs setup.

use core::{ptr, slice};

use crate::engine::default_engine;
use crate::error::Error;
use crate::params::DIGEST_SIZE;
use crate::variant::{Variant, Version};

pub const VERUSHASH_OK: i32 = 0;
pub const VERUSHASH_ERR_NULL: i32 = -1;
pub const VERUSHASH_ERR_LENGTH: i32 = -2;
pub const VERUSHASH_ERR_BACKEND: i32 = -3;
pub const VERUSHASH_ERR_VARIANT: i32 = -4;

fn status(err: &Error) -> i32 {
    match err {
        Error::InvalidInputLength { .. } => VERUSHASH_ERR_LENGTH,
        Error::NoEligibleBackend { .. } | Error::UnsupportedBackend(_) => VERUSHASH_ERR_BACKEND,
        Error::UnsupportedVariant(_) | Error::UnsupportedVariantCode(_) => VERUSHASH_ERR_VARIANT,
    }
}

/// # Safety
/// `input` must be valid for `len` reads and `out` for 32 writes.
unsafe fn hash_raw(variant: Variant, input: *const u8, len: usize, out: *mut u8) -> i32 {
    if input.is_null() || out.is_null() {
        return VERUSHASH_ERR_NULL;
    }
    if len > isize::MAX as usize {
        return VERUSHASH_ERR_LENGTH;
    }

    let input = unsafe { slice::from_raw_parts(input, len) };
    let mut digest = [0u8; DIGEST_SIZE];
    match default_engine().hash_into(variant, input, &mut digest) {
        Ok(()) => {
            unsafe { ptr::copy_nonoverlapping(digest.as_ptr(), out, DIGEST_SIZE) };
            VERUSHASH_OK
        }
        Err(err) => status(&err),
    }
}

/// Perform setup now instead of on the first digest call
#[unsafe(no_mangle)]
pub extern "C" fn verushash_initialize() -> i32 {
    match default_engine().initialize() {
        Ok(_) => VERUSHASH_OK,
        Err(err) => status(&err),
    }
}

/// Whether setup has completed
#[unsafe(no_mangle)]
pub extern "C" fn verushash_initialized() -> bool {
    default_engine().is_initialized()
}

/// Digest with a numeric variant code: `version * 2 + reversed`, versions
/// numbered V1 = 0, V2 = 1, V2b = 2, V2b1 = 3.
///
/// # Safety
/// `input` must be valid for `len` reads and `out` for 32 writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn verushash_hash(
    variant_code: u32,
    input: *const u8,
    len: usize,
    out: *mut u8,
) -> i32 {
    match Variant::from_code(variant_code) {
        Ok(variant) => unsafe { hash_raw(variant, input, len, out) },
        Err(err) => status(&err),
    }
}

macro_rules! export_variants {
    ($($name:ident => $variant:expr;)*) => {
        $(
            /// # Safety
            /// `input` must be valid for `len` reads and `out` for 32 writes.
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn $name(input: *const u8, len: usize, out: *mut u8) -> i32 {
                unsafe { hash_raw($variant, input, len, out) }
            }
        )*
    };
}

export_variants! {
    verushash_v1 => Variant::forward(Version::V1);
    verushash_v1_reverse => Variant::reversed(Version::V1);
    verushash_v2 => Variant::forward(Version::V2);
    verushash_v2_reverse => Variant::reversed(Version::V2);
    verushash_v2b => Variant::forward(Version::V2b);
    verushash_v2b_reverse => Variant::reversed(Version::V2b);
    verushash_v2b1 => Variant::forward(Version::V2b1);
    verushash_v2b1_reverse => Variant::reversed(Version::V2b1);
}
