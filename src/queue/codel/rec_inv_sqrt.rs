//! Fixed-point reciprocal square root and the CoDel control law.
//!
//! `rec_inv_sqrt` holds 1/sqrt(count) as the top 16 bits of a Q0.32 number.
//! It is refined by one Newton-Raphson iteration per drop instead of being
//! recomputed, and the control law multiplies by it instead of dividing by
//! sqrt(count). The shift sequence is bit-compatible with the Linux
//! `codel.h` implementation; changing any of it moves drop times.

use super::time::CoDelTime;

/// Width of the stored reciprocal.
pub const REC_INV_SQRT_BITS: u32 = u16::BITS;
/// Shift that turns the stored value into a Q0.32 number.
pub const REC_INV_SQRT_SHIFT: u32 = 32 - REC_INV_SQRT_BITS;
/// 1/sqrt(1), the largest representable value.
pub const REC_INV_SQRT_INIT: u16 = u16::MAX;

/// One Newton step: `x' = x/2 * (3 - count * x^2)`.
///
/// Far from convergence the intermediate `3 - count * x^2` may go negative;
/// it wraps exactly like the unsigned 64-bit arithmetic in Linux `codel.h`.
pub const fn newton_step(rec_inv_sqrt: u16, count: u32) -> u16 {
    let invsqrt = (rec_inv_sqrt as u32) << REC_INV_SQRT_SHIFT;
    let invsqrt2 = ((invsqrt as u64 * invsqrt as u64) >> 32) as u32;
    let mut val = (3u64 << 32).wrapping_sub(count as u64 * invsqrt2 as u64);

    val >>= 2; // avoid overflow in the following multiply
    val = val.wrapping_mul(invsqrt as u64) >> (32 - 2 + 1);
    (val >> REC_INV_SQRT_SHIFT) as u16
}

/// `val * scale / 2^32` with a 64-bit intermediate.
pub const fn reciprocal_scale(val: u32, scale: u32) -> u32 {
    ((val as u64 * scale as u64) >> 32) as u32
}

/// Next drop time: `t + interval / sqrt(count)`.
pub const fn control_law(t: CoDelTime, interval: u32, rec_inv_sqrt: u16) -> CoDelTime {
    t.wrapping_add(reciprocal_scale(
        interval,
        (rec_inv_sqrt as u32) << REC_INV_SQRT_SHIFT,
    ))
}
