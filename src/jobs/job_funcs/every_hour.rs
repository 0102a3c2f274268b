use std::sync::Arc;

use anyhow::{Result, anyhow};
use chrono::{SecondsFormat, Timelike, Utc};
use tracing::{error, info};

use crate::{init::state::ServerState, util::time::duration_formatter::format_dt_difference};

/// Next UTC instant on an hour boundary plus the given minute + second
/// offset. minute_offset=30 schedules XX:30:00 of whichever hour is
/// still ahead of `now`.
pub fn next_hour_mark(
    now: chrono::DateTime<chrono::Utc>,
    minute_offset: u32,
    second_offset: u32,
) -> Result<chrono::DateTime<chrono::Utc>> {
    let truncated_to_hour = now
        .with_minute(0)
        .and_then(|dt| dt.with_second(0))
        .and_then(|dt| dt.with_nanosecond(0))
        .ok_or_else(|| anyhow!("Could not truncate to hour."))?;

    let mut target_time = truncated_to_hour
        + chrono::Duration::minutes(minute_offset as i64)
        + chrono::Duration::seconds(second_offset as i64);

    if target_time <= now {
        target_time += chrono::Duration::hours(1);
    }

    Ok(target_time)
}

/// Schedules a task once per hour at a fixed minute + second offset.
pub async fn schedule_task_every_hour_at<F, Fut>(
    state: Arc<ServerState>,
    task: F,
    task_descriptor: String,
    minute_offset: u32,
    second_offset: u32,
) -> Result<()>
where
    F: Fn(Arc<ServerState>) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let mut initialized: bool = false;
    loop {
        let now = Utc::now();
        let next_mark = match next_hour_mark(now, minute_offset, second_offset) {
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
                    "Could not schedule job at next_hour_mark for {}: {:?}",
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
    fn mark_lands_later_in_the_same_hour() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 10, 10, 0).unwrap();
        let mark = next_hour_mark(now, 30, 0).unwrap();
        assert_eq!(mark, Utc.with_ymd_and_hms(2025, 9, 1, 10, 30, 0).unwrap());
    }

    #[test]
    fn mark_rolls_into_the_next_hour_when_passed() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 10, 45, 0).unwrap();
        let mark = next_hour_mark(now, 30, 0).unwrap();
        assert_eq!(mark, Utc.with_ymd_and_hms(2025, 9, 1, 11, 30, 0).unwrap());
    }
}
