use std::sync::Arc;

use anyhow::{Result, anyhow};
use chrono::{SecondsFormat, Timelike, Utc};
use tracing::{error, info};

use crate::{init::state::ServerState, util::time::duration_formatter::format_dt_difference};

/// Next UTC instant on a day boundary plus the given hour + minute
/// offset. hour_offset=4, minute_offset=15 schedules 04:15:00 today or
/// tomorrow, whichever is still ahead of `now`.
pub fn next_day_mark(
    now: chrono::DateTime<chrono::Utc>,
    hour_offset: u32,
    minute_offset: u32,
) -> Result<chrono::DateTime<chrono::Utc>> {
    if hour_offset > 23 || minute_offset > 59 {
        return Err(anyhow!(
            "Invalid offset for daily schedule: hour_offset={hour_offset}, minute_offset={minute_offset}"
        ));
    }

    let truncated_to_day = now
        .with_hour(0)
        .and_then(|dt| dt.with_minute(0))
        .and_then(|dt| dt.with_second(0))
        .and_then(|dt| dt.with_nanosecond(0))
        .ok_or_else(|| anyhow!("Could not truncate to start of day."))?;

    let mut target_time = truncated_to_day
        + chrono::Duration::hours(hour_offset as i64)
        + chrono::Duration::minutes(minute_offset as i64);

    if target_time <= now {
        target_time += chrono::Duration::days(1);
    }

    Ok(target_time)
}

/// Schedules a task once per day at a fixed hour + minute offset (UTC).
pub async fn schedule_task_every_day_at<F, Fut>(
    state: Arc<ServerState>,
    task: F,
    task_descriptor: String,
    hour_offset: u32,
    minute_offset: u32,
) -> Result<()>
where
    F: Fn(Arc<ServerState>) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let mut initialized: bool = false;
    loop {
        let now = Utc::now();
        let next_mark = match next_day_mark(now, hour_offset, minute_offset) {
            Ok(mark) => mark,
            Err(e) => {
                error!(
                    "Could not calculate next scheduled time for {}: {:?}",
                    task_descriptor, e
                );
                tokio::time::sleep(std::time::Duration::from_secs(10)).await;
                continue;
            }
        };

        let delay = match (next_mark - now).to_std() {
            Ok(delay) => delay,
            Err(e) => {
                error!(
                    "Could not schedule job at next_day_mark for {}: {:?}",
                    task_descriptor, e
                );
                tokio::time::sleep(std::time::Duration::from_secs(10)).await;
                continue;
            }
        };

        if !initialized {
            info!(
                task_name = %task_descriptor,
                initial_run_time = %next_mark.to_rfc3339_opts(SecondsFormat::AutoSi, true),
                "Scheduled task initialized. First run upcoming in {}",
                format_dt_difference(now, next_mark)
            );
            initialized = true;
        }

        tokio::time::sleep(delay).await;

        let start = tokio::time::Instant::now();
        task(Arc::clone(&state)).await;

        info!(
            task_name = %task_descriptor,
            duration = ?start.elapsed(),
            "Scheduled task ran."
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn mark_lands_later_today() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 2, 0, 0).unwrap();
        let mark = next_day_mark(now, 4, 15).unwrap();
        assert_eq!(mark, Utc.with_ymd_and_hms(2025, 9, 1, 4, 15, 0).unwrap());
    }

    #[test]
    fn mark_rolls_into_tomorrow_when_passed() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap();
        let mark = next_day_mark(now, 4, 15).unwrap();
        assert_eq!(mark, Utc.with_ymd_and_hms(2025, 9, 2, 4, 15, 0).unwrap());
    }

    #[test]
    fn out_of_range_offsets_are_rejected() {
        let now = Utc::now();
        assert!(next_day_mark(now, 24, 0).is_err());
        assert!(next_day_mark(now, 0, 60).is_err());
    }
}
