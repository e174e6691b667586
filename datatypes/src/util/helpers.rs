/// This macro allows comparing float slices using [float_cmp::approx_eq].
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr $(,)?) => ({
        if !$crate::util::helpers::approx_eq_floats($left, $right) {
            panic!(r#"assertion failed: `(left == right)`
            left: `{:?}`,
           right: `{:?}`"#, $left, $right)
        }
    });
    ($left:expr, $right:expr, $($arg:tt)+) => ({
        if !$crate::util::helpers::approx_eq_floats($left, $right) {
            panic!(r#"assertion failed: `(left == right)`
  left: `{:?}`,
 right: `{:?}`: {}"#, $left, $right,
                           format_args!($($arg)+))
        }
    });
}

/// Continuous pixel coordinates closer than this to an integer are treated as that integer.
pub const PIXEL_EPSILON: f64 = 1e-6;

#[must_use]
pub fn approx_eq_floats(left: &[f64], right: &[f64]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    for (&l, &r) in left.iter().zip(right) {
        if !float_cmp::approx_eq!(f64, l, r) {
            return false;
        }
    }

    true
}

/// Bit representation of a float with a single NaN representation
pub fn f64_to_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

fn snap_to_integer(value: f64) -> Option<f64> {
    let rounded = value.round();
    float_cmp::approx_eq!(f64, value, rounded, epsilon = PIXEL_EPSILON).then_some(rounded)
}

/// Continuous pixel coordinates are clamped to `[-MAX_PIXEL_COORDINATE, MAX_PIXEL_COORDINATE]` before rounding,
/// so that spans between rounded coordinates always fit into an `isize`.
pub const MAX_PIXEL_COORDINATE: f64 = (1_i64 << 40) as f64;

fn clamp_pixel_coordinate(value: f64) -> f64 {
    value.clamp(-MAX_PIXEL_COORDINATE, MAX_PIXEL_COORDINATE)
}

/// `floor` that tolerates values a hair below an integer
pub fn snapped_floor(value: f64) -> isize {
    let value = clamp_pixel_coordinate(value);
    snap_to_integer(value).unwrap_or_else(|| value.floor()) as isize
}

/// `ceil` that tolerates values a hair above an integer
pub fn snapped_ceil(value: f64) -> isize {
    let value = clamp_pixel_coordinate(value);
    snap_to_integer(value).unwrap_or_else(|| value.ceil()) as isize
}
