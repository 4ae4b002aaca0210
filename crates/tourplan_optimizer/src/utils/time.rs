use jiff::{SignedDuration, civil::Time};

#[macro_export]
macro_rules! timer_debug {
    ($msg:literal,$block:expr) => {{
        let now = jiff::Timestamp::now();
        let result = $block;
        let elapsed = jiff::Timestamp::now().duration_since(now);

        tracing::debug!("{}: Took {:?}", $msg, elapsed);

        result
    }};
}

/// Clock time `HH:MM` of a minute of the day.
pub fn format_clock(minutes: f64) -> String {
    let offset = SignedDuration::from_secs((minutes.max(0.0) * 60.0).floor() as i64);
    Time::midnight()
        .saturating_add(offset)
        .strftime("%H:%M")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(300.0), "05:00");
        assert_eq!(format_clock(310.6), "05:10");
        assert_eq!(format_clock(481.0), "08:01");
    }
}
