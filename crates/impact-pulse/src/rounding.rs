/// Round to the nearest integer, ties toward positive infinity.
///
/// `f64::round` sends ties away from zero, which would turn a trend of
/// `-50.5%` into `-51` instead of `-50`.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round to one decimal place, ties toward positive infinity.
pub(crate) fn round_tenths(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_go_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-50.5), -50.0);
        assert_eq!(round_half_up(33.4), 33.0);
    }

    #[test]
    fn tenths() {
        assert_eq!(round_tenths(66.666_666), 66.7);
        assert_eq!(round_tenths(33.333_333), 33.3);
        assert_eq!(round_tenths(2.0), 2.0);
        assert_eq!(round_tenths(1.25), 1.3);
    }
}
