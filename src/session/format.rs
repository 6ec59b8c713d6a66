//! Duration formatting for the status title and reminder text.
//!
//! Both forms floor to whole minutes:
//! - short: `"25m"`, `"1h 5m"`
//! - long: `"25 minutes"`, `"1 hour and 5 minutes"`

use std::time::Duration;

/// Formats a duration for the status title.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use aware::session::format::short_form;
///
/// assert_eq!(short_form(Duration::from_secs(59)), "0m");
/// assert_eq!(short_form(Duration::from_secs(3_900)), "1h 5m");
/// ```
pub fn short_form(duration: Duration) -> String {
    let minutes = whole_minutes(duration);
    if minutes < 60 {
        format!("{}m", minutes)
    } else {
        format!("{}h {}m", minutes / 60, minutes % 60)
    }
}

/// Formats a duration as a readable phrase for reminder text.
///
/// Units are pluralised only for values greater than one, so a zero remainder
/// renders as `"0 minute"`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use aware::session::format::long_form;
///
/// assert_eq!(long_form(Duration::from_secs(1_800)), "30 minutes");
/// assert_eq!(long_form(Duration::from_secs(3_660)), "1 hour and 1 minute");
/// ```
pub fn long_form(duration: Duration) -> String {
    let minutes = whole_minutes(duration);
    let minute_value = minutes % 60;
    let minute_unit = unit(minute_value, "minute", "minutes");

    if minutes < 60 {
        format!("{} {}", minute_value, minute_unit)
    } else {
        let hour_value = minutes / 60;
        let hour_unit = unit(hour_value, "hour", "hours");
        format!(
            "{} {} and {} {}",
            hour_value, hour_unit, minute_value, minute_unit
        )
    }
}

fn whole_minutes(duration: Duration) -> u64 {
    duration.as_secs() / 60
}

fn unit(value: u64, singular: &'static str, plural: &'static str) -> &'static str {
    if value > 1 {
        plural
    } else {
        singular
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    /// Parses a short-form string back into total minutes.
    fn parse_short(text: &str) -> Option<u64> {
        let text = text.strip_suffix('m')?;
        match text.split_once("h ") {
            Some((hours, minutes)) => {
                let hours: u64 = hours.parse().ok()?;
                let minutes: u64 = minutes.parse().ok()?;
                (minutes < 60).then_some(hours * 60 + minutes)
            }
            None => text.parse().ok(),
        }
    }

    mod short_form_tests {
        use super::*;

        #[test]
        fn test_zero() {
            assert_eq!(short_form(Duration::ZERO), "0m");
        }

        #[test]
        fn test_floors_partial_minutes() {
            assert_eq!(short_form(secs(59)), "0m");
            assert_eq!(short_form(secs(119)), "1m");
        }

        #[test]
        fn test_subsecond_precision_is_ignored() {
            assert_eq!(short_form(Duration::from_millis(60_999)), "1m");
        }

        #[test]
        fn test_just_below_an_hour() {
            assert_eq!(short_form(secs(3_599)), "59m");
        }

        #[test]
        fn test_exactly_one_hour() {
            assert_eq!(short_form(secs(3_600)), "1h 0m");
        }

        #[test]
        fn test_hours_and_minutes() {
            assert_eq!(short_form(secs(7_320)), "2h 2m");
            assert_eq!(short_form(secs(36_000 + 59 * 60)), "10h 59m");
        }

        #[test]
        fn test_round_trips_total_minutes() {
            let samples = [0, 1, 59, 60, 61, 599, 3_599, 3_600, 3_661, 86_399, 86_400, 1_000_000];
            for s in samples {
                let text = short_form(secs(s));
                assert_eq!(
                    parse_short(&text),
                    Some(s / 60),
                    "unexpected short form {:?} for {}s",
                    text,
                    s
                );
            }
        }
    }

    mod long_form_tests {
        use super::*;

        #[test]
        fn test_zero_is_singular() {
            assert_eq!(long_form(Duration::ZERO), "0 minute");
        }

        #[test]
        fn test_one_minute() {
            assert_eq!(long_form(secs(60)), "1 minute");
            assert_eq!(long_form(secs(90)), "1 minute");
        }

        #[test]
        fn test_two_minutes() {
            assert_eq!(long_form(secs(120)), "2 minutes");
        }

        #[test]
        fn test_session_limit() {
            assert_eq!(long_form(secs(1_800)), "30 minutes");
        }

        #[test]
        fn test_one_hour_one_minute() {
            assert_eq!(long_form(secs(3_660)), "1 hour and 1 minute");
        }

        #[test]
        fn test_two_hours_two_minutes() {
            assert_eq!(long_form(secs(7_320)), "2 hours and 2 minutes");
        }

        #[test]
        fn test_whole_hour_keeps_singular_zero_minute() {
            assert_eq!(long_form(secs(3_600)), "1 hour and 0 minute");
            assert_eq!(long_form(secs(7_200)), "2 hours and 0 minute");
        }
    }
}
