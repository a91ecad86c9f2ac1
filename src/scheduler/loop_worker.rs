use std::sync::Arc;

use chrono::Local;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::events::{TabEvent, Trigger};
use crate::manager::TabManager;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

const WEEK: Duration = Duration::from_secs(7 * 24 * 60 * 60);
const DAY: Duration = Duration::from_secs(24 * 60 * 60);
const DAILY_FIRST_DELAY: Duration = Duration::from_secs(60);
const JOB_TIMEOUT_SECS: u64 = 120;

pub async fn automation_loop(
    manager: Arc<TabManager>,
    weekly_first_delay: Duration,
    cancel_token: CancellationToken,
) {
    let start = Instant::now();
    let mut weekly = tokio::time::interval_at(start + weekly_first_delay, WEEK);
    weekly.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut daily = tokio::time::interval_at(start + DAILY_FIRST_DELAY, DAY);
    daily.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = weekly.tick() => run_trigger(&manager, Trigger::WeeklyZombieSweep).await,
            _ = daily.tick() => run_trigger(&manager, Trigger::DailyStatsRefresh).await,
            _ = cancel_token.cancelled() => {
                log_info!("automation loop shutting down");
                break;
            }
        }
    }
}

async fn run_trigger(manager: &TabManager, trigger: Trigger) {
    let now = Local::now().fixed_offset();
    let fut = manager.dispatch(TabEvent::Alarm(trigger), now);

    match tokio::time::timeout(Duration::from_secs(JOB_TIMEOUT_SECS), fut).await {
        Ok(Ok(())) => log_info!("{} finished", trigger),
        Ok(Err(err)) => log_error!("{} failed: {err:?}", trigger),
        Err(_) => log_warn!("{} timed out (> {}s)", trigger, JOB_TIMEOUT_SECS),
    }
}
