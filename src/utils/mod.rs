//! Spatial locality key.
//!
//! `z_order_index` maps a coordinate onto the Z-order (Morton) curve, so
//! sorting by the key groups nearby points together. The cascaded union
//! uses it to order small inputs by envelope center without paying for a
//! tree build.

use geo_types::Coord;

/// Morton key of a coordinate: the upper halves of the two
/// order-preserving bit patterns, interleaved x-low. The low mantissa
/// bits carry no locality and are dropped.
pub fn z_order_index(c: Coord<f64>) -> u64 {
    let x = order_preserving_bits(c.x) >> 32;
    let y = order_preserving_bits(c.y) >> 32;
    spread_bits(x) | (spread_bits(y) << 1)
}

/// Total-order transform for f64: negative values flip entirely,
/// non-negative values flip the sign bit, so unsigned comparison of the
/// results matches float comparison.
fn order_preserving_bits(f: f64) -> u64 {
    let bits = f.to_bits();
    if bits & (1 << 63) != 0 {
        !bits
    } else {
        bits | (1 << 63)
    }
}

/// Spreads the lower 32 bits so one zero bit separates each input bit.
fn spread_bits(mut n: u64) -> u64 {
    n &= 0x0000_0000_FFFF_FFFF;
    n = (n | (n << 16)) & 0x0000_FFFF_0000_FFFF;
    n = (n | (n << 8)) & 0x00FF_00FF_00FF_00FF;
    n = (n | (n << 4)) & 0x0F0F_0F0F_0F0F_0F0F;
    n = (n | (n << 2)) & 0x3333_3333_3333_3333;
    n = (n | (n << 1)) & 0x5555_5555_5555_5555;
    n
}
