//! Hours/minutes selection for remaining-time sensors

use super::classes::Unit;

/// Pick the display unit for a duration given in hours.
///
/// Under one hour the value is shown in minutes. The unit and value come out
/// of the same branch so they can never disagree.
pub fn select_duration_unit(hours: Option<f64>) -> (Unit, Option<f64>) {
    match hours {
        None => (Unit::Hours, None),
        Some(h) if h >= 1.0 => (Unit::Hours, Some(h)),
        Some(h) => (Unit::Minutes, Some(h * 60.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_above_one() {
        assert_eq!(select_duration_unit(Some(2.5)), (Unit::Hours, Some(2.5)));
    }

    #[test]
    fn test_minutes_below_one() {
        assert_eq!(select_duration_unit(Some(0.5)), (Unit::Minutes, Some(30.0)));
    }

    #[test]
    fn test_one_hour_is_inclusive() {
        assert_eq!(select_duration_unit(Some(1.0)), (Unit::Hours, Some(1.0)));
    }

    #[test]
    fn test_absent_defaults_to_hours() {
        assert_eq!(select_duration_unit(None), (Unit::Hours, None));
    }

    #[test]
    fn test_zero_is_minutes() {
        assert_eq!(select_duration_unit(Some(0.0)), (Unit::Minutes, Some(0.0)));
    }
}
