//! Mid/side stereo width.

/// Scale the side signal of a stereo pair in place.
///
/// `width` is clamped to [0, 2]: 0 collapses to mono, 1 is unchanged and 2
/// doubles the side component.
///
/// ```rust
/// use atmos_effects::apply_width;
///
/// let mut l = [1.0];
/// let mut r = [0.0];
/// apply_width(0.0, &mut l, &mut r);
/// assert_eq!((l[0], r[0]), (0.5, 0.5));
/// ```
pub fn apply_width(width: f32, left: &mut [f32], right: &mut [f32]) {
    let width = atmos_core::sanitize(width, 0.0, 2.0, 1.0);
    for (l, r) in left.iter_mut().zip(right.iter_mut()) {
        let mid = 0.5 * (*l + *r);
        let side = 0.5 * (*l - *r) * width;
        *l = mid + side;
        *r = mid - side;
    }
}
