use std::sync::Arc;

use anyhow::{Result, anyhow};
use chrono::{Timelike, Utc};
use tracing::{error, info};

use crate::{init::state::ServerState, util::time::duration_formatter::format_dt_difference};

/// Next UTC instant on a minute boundary plus the given second offset.
/// second_offset=20 schedules XX:YY:20 of whichever minute is still
/// ahead of `now`.
pub fn next_minute_mark(
    now: chrono::DateTime<chrono::Utc>,
    second_offset: u32,
) -> Result<chrono::DateTime<chrono::Utc>> {
    let truncated_to_minute = now
        .with_second(0)
        .and_then(|dt| dt.with_nanosecond(0))
        .ok_or_else(|| anyhow!("Could not truncate to minute."))?;

    let mut target_time = truncated_to_minute + chrono::Duration::seconds(second_offset as i64);

    if target_time <= now {
        target_time += chrono::Duration::seconds(60);
    }

    Ok(target_time)
}

/// Schedules a task once per minute at a fixed second offset.
pub async fn schedule_task_every_minute_at<F, Fut>(
    state: Arc<ServerState>,
    task: F,
    task_descriptor: String,
    second_offset: u32,
) -> Result<()>
where
    F: Fn(Arc<ServerState>) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let mut initialized: bool = false;
    loop {
        let now = Utc::now();
        let next_mark = match next_minute_mark(now, second_offset) {
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
                    "Could not schedule job at next_minute_mark for {}: {:?}",
                    task_descriptor, e
                );
                tokio::time::sleep(std::time::Duration::from_secs(10)).await;
                continue;
            }
        };

        if !initialized {
            info!(
                task_name = %task_descriptor,
                "Scheduled task initialized. First run upcoming in {}",
                format_dt_difference(now, next_mark)
            );
            initialized = true;
        }

        tokio::time::sleep(delay).await;

        task(Arc::clone(&state)).await;
        // Loop back and aim for the same offset in the next minute.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn mark_lands_later_in_the_same_minute() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 10, 30, 5).unwrap();
        let mark = next_minute_mark(now, 20).unwrap();
        assert_eq!(mark, Utc.with_ymd_and_hms(2025, 9, 1, 10, 30, 20).unwrap());
    }

    #[test]
    fn mark_rolls_into_the_next_minute_when_passed() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 10, 30, 25).unwrap();
        let mark = next_minute_mark(now, 20).unwrap();
        assert_eq!(mark, Utc.with_ymd_and_hms(2025, 9, 1, 10, 31, 20).unwrap());
    }

    #[test]
    fn exact_hit_still_schedules_forward() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 10, 30, 20).unwrap();
        let mark = next_minute_mark(now, 20).unwrap();
        assert_eq!(mark, Utc.with_ymd_and_hms(2025, 9, 1, 10, 31, 20).unwrap());
    }
}
