//! In-place byte order reversal

/// Reverse `buf` in place by swapping mirrored positions up to the midpoint.
///
/// Needs no setup and never allocates. Applying it twice restores the
/// original buffer.
#[inline]
pub fn reverse(buf: &mut [u8]) {
    let len = buf.len();
    for i in 0..len / 2 {
        buf.swap(i, len - 1 - i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_short_buffers_unchanged() {
        let mut empty: [u8; 0] = [];
        reverse(&mut empty);
        assert_eq!(empty, []);

        let mut one = [0x42u8];
        reverse(&mut one);
        assert_eq!(one, [0x42]);
    }

    #[test]
    fn test_reverse_odd_and_even() {
        let mut even = [1u8, 2, 3, 4];
        reverse(&mut even);
        assert_eq!(even, [4, 3, 2, 1]);

        let mut odd = [1u8, 2, 3, 4, 5];
        reverse(&mut odd);
        assert_eq!(odd, [5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_reverse_is_involution() {
        let original: Vec<u8> = (0..=255u8).collect();
        for len in [0, 1, 2, 31, 32, 33, 256] {
            let mut buf = original[..len].to_vec();
            reverse(&mut buf);
            reverse(&mut buf);
            assert_eq!(buf, &original[..len]);
        }
    }

    #[test]
    fn test_reverse_matches_iterator_reverse() {
        let mut buf: Vec<u8> = (0..32u8).collect();
        let expected: Vec<u8> = buf.iter().rev().copied().collect();
        reverse(&mut buf);
        assert_eq!(buf, expected);
    }
}
