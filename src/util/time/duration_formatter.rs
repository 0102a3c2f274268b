use chrono::{DateTime, Utc};

/// Human-readable difference between two instants, used by the job
/// scheduler's "will run in ..." log lines.
pub fn format_dt_difference(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    let diff = to - from;

    let total_seconds = diff.num_seconds();
    if total_seconds < 0 {
        return "0s".to_string();
    }

    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_magnitude() {
        let from = Utc::now();
        assert_eq!(format_dt_difference(from, from + chrono::Duration::seconds(42)), "42s");
        assert_eq!(
            format_dt_difference(from, from + chrono::Duration::seconds(62)),
            "1m 2s"
        );
        assert_eq!(
            format_dt_difference(from, from + chrono::Duration::seconds(3723)),
            "1h 2m 3s"
        );
        assert_eq!(
            format_dt_difference(from, from - chrono::Duration::seconds(5)),
            "0s"
        );
    }
}
