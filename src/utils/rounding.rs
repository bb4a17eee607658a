/// Round to one decimal place, half away from zero.
///
/// Negative zero is folded into positive zero so that a mean such as `-0.04`
/// displays as `0.0` rather than `-0.0`.
pub fn round_to_tenths(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    rounded + 0.0
}
