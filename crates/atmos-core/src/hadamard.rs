//! 8-point Hadamard transform for FDN feedback mixing.
//!
//! The Sylvester-ordered Hadamard matrix scaled by `1/√8` is orthogonal:
//! it spreads every line's energy over all eight lines without changing the
//! total, which is what keeps a lossless FDN lossless and a damped one
//! stable. The fast form is three butterfly stages of additions and
//! subtractions.

/// Normalization making the transform orthogonal.
pub const HADAMARD_8_NORM: f32 = 0.353_553_38; // 1 / sqrt(8)

/// In-place normalized 8-point Hadamard transform.
///
/// ```rust
/// use atmos_core::hadamard_8;
///
/// let mut v = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
/// hadamard_8(&mut v);
/// for x in v {
///     assert!((x - 0.353_553_38).abs() < 1e-6);
/// }
/// ```
#[inline]
pub fn hadamard_8(v: &mut [f32; 8]) {
    let mut span = 1;
    while span < 8 {
        let mut start = 0;
        while start < 8 {
            for i in start..start + span {
                let a = v[i];
                let b = v[i + span];
                v[i] = a + b;
                v[i + span] = a - b;
            }
            start += span * 2;
        }
        span *= 2;
    }
    for x in v.iter_mut() {
        *x *= HADAMARD_8_NORM;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn energy(v: &[f32; 8]) -> f32 {
        v.iter().map(|x| x * x).sum()
    }

    #[test]
    fn test_preserves_energy() {
        let mut v = [0.3, -1.2, 0.7, 0.05, -0.4, 2.0, -0.9, 0.0];
        let before = energy(&v);
        hadamard_8(&mut v);
        assert!((energy(&v) - before).abs() < 1e-4);
    }

    #[test]
    fn test_is_involution() {
        let original = [1.0, 2.0, 3.0, 4.0, -1.0, -2.0, -3.0, -4.0];
        let mut v = original;
        hadamard_8(&mut v);
        hadamard_8(&mut v);
        for (a, b) in v.iter().zip(original.iter()) {
            assert!((a - b).abs() < 1e-5, "{a} != {b}");
        }
    }

    #[test]
    fn test_rows_match_sylvester_matrix() {
        // Column k of H is the transform of the k-th basis vector.
        for k in 0..8 {
            let mut v = [0.0f32; 8];
            v[k] = 1.0;
            hadamard_8(&mut v);
            for (i, x) in v.iter().enumerate() {
                let sign = if (i & k).count_ones() % 2 == 0 { 1.0 } else { -1.0 };
                assert!((x - sign * HADAMARD_8_NORM).abs() < 1e-6);
            }
        }
    }
}
