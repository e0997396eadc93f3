//! Morton codes for BCC grid indices
//!
//! A modified 3D Morton code: the interleaved x/y/z code is shifted up by
//! one bit and the sub-lattice selector `w` occupies the least significant
//! bit. That leaves 21 bits per spatial axis and 1 for `w`, filling all 64
//! bits, and makes linear enumeration of codes walk the grid in a
//! locality-preserving order.
//!
//! Author: Moroya Sakamoto

use glam::IVec4;

/// Low 21 bits usable per spatial component
pub const COORD_BITS: u32 = 21;

/// Spread the low 21 bits of `v`, inserting two zero bits between each:
/// bit `k` moves to bit `3k`. Branch-free 6-step bitmask cascade.
#[inline]
pub fn spread_bits3(v: u64) -> u64 {
    let mut v = v & 0x1f_ffff;
    v = (v | v << 32) & 0x1f_0000_0000_ffff;
    v = (v | v << 16) & 0x1f_0000_ff00_00ff;
    v = (v | v << 8) & 0x100f_00f0_0f00_f00f;
    v = (v | v << 4) & 0x10c3_0c30_c30c_30c3;
    v = (v | v << 2) & 0x1249_2492_4924_9249;
    v
}

/// Inverse of [`spread_bits3`]: collect every third bit back down.
#[inline]
pub fn squeeze_bits3(v: u64) -> u64 {
    let mut v = v & 0x1249_2492_4924_9249;
    v = (v ^ v >> 2) & 0x10c3_0c30_c30c_30c3;
    v = (v ^ v >> 4) & 0x100f_00f0_0f00_f00f;
    v = (v ^ v >> 8) & 0x1f_0000_ff00_00ff;
    v = (v ^ v >> 16) & 0x1f_0000_0000_ffff;
    v = (v ^ v >> 32) & 0x1f_ffff;
    v
}

/// Encode a grid index `(x, y, z, w)` into a 64-bit Morton code.
///
/// Components must be non-negative; callers that decrement indices have to
/// guard before encoding.
#[inline]
pub fn encode(index: IVec4) -> u64 {
    debug_assert!(
        index.x >= 0 && index.y >= 0 && index.z >= 0,
        "negative grid index {index}"
    );
    (index.w as u64 & 1)
        | (spread_bits3(index.x as u64) << 1)
        | (spread_bits3(index.y as u64) << 2)
        | (spread_bits3(index.z as u64) << 3)
}

/// Decode a 64-bit Morton code back into a grid index.
#[inline]
pub fn decode(code: u64) -> IVec4 {
    IVec4::new(
        squeeze_bits3(code >> 1) as i32,
        squeeze_bits3(code >> 2) as i32,
        squeeze_bits3(code >> 3) as i32,
        (code & 1) as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_spread_squeeze_inverse() {
        for v in [0u64, 1, 2, 0b1011, 0x1f_ffff, 0x15_5555] {
            assert_eq!(squeeze_bits3(spread_bits3(v)), v & 0x1f_ffff);
        }
    }

    #[test]
    fn test_known_codes() {
        assert_eq!(encode(IVec4::new(0, 0, 0, 0)), 0);
        assert_eq!(encode(IVec4::new(0, 0, 0, 1)), 1);
        assert_eq!(encode(IVec4::new(1, 0, 0, 0)), 0b10);
        assert_eq!(encode(IVec4::new(0, 1, 0, 0)), 0b100);
        assert_eq!(encode(IVec4::new(0, 0, 1, 0)), 0b1000);
        assert_eq!(encode(IVec4::new(1, 1, 1, 1)), 0b1111);
        assert_eq!(encode(IVec4::new(2, 0, 0, 0)), 0b10000);
    }

    #[test]
    fn test_decode_is_inverse_of_encode() {
        for x in [0, 1, 5, 100, (1 << COORD_BITS) - 1] {
            for w in 0..2 {
                let index = IVec4::new(x, x / 2, x / 3, w);
                assert_eq!(decode(encode(index)), index);
            }
        }
    }

    #[test]
    fn test_ordering_is_monotone_per_axis() {
        // Growing one component never decreases the code.
        let base = encode(IVec4::new(3, 5, 7, 0));
        assert!(encode(IVec4::new(4, 5, 7, 0)) > base);
        assert!(encode(IVec4::new(3, 6, 7, 0)) > base);
        assert!(encode(IVec4::new(3, 5, 8, 0)) > base);
    }

    proptest! {
        #[test]
        fn prop_encode_decode_roundtrip(code in any::<u64>()) {
            prop_assert_eq!(encode(decode(code)), code);
        }

        #[test]
        fn prop_decode_encode_roundtrip(
            x in 0i32..(1 << COORD_BITS),
            y in 0i32..(1 << COORD_BITS),
            z in 0i32..(1 << COORD_BITS),
            w in 0i32..2,
        ) {
            let index = IVec4::new(x, y, z, w);
            prop_assert_eq!(decode(encode(index)), index);
        }
    }
}
