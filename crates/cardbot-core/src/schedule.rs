//! Daily broadcast trigger.
//!
//! One fixed job: at the configured local time, broadcast the cards for
//! "today and the previous N-1 days". The job loop is cancellable and keeps
//! running through broadcast errors — a failed run is logged and the next day
//! is scheduled as usual.

use std::{sync::Arc, time::Duration};

use chrono::{Local, NaiveDateTime, TimeDelta};
use tokio::{task::JoinHandle, time::sleep};
use tokio_util::sync::CancellationToken;

use crate::{broadcast::Broadcaster, domain::DayKey};

#[derive(Clone)]
pub struct DailyScheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    broadcaster: Arc<Broadcaster>,
    broadcast_days: usize,
    hour: u32,
    minute: u32,
    cancel: CancellationToken,
}

impl DailyScheduler {
    pub fn new(broadcaster: Arc<Broadcaster>, broadcast_days: usize, hour: u32, minute: u32) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                broadcaster,
                broadcast_days,
                hour,
                minute,
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Spawn the job loop. Dropping the returned handle does not stop the
    /// loop; use `stop()`.
    pub fn start(&self) -> JoinHandle<()> {
        let this = self.clone();
        tracing::info!(
            time = %format!("{:02}:{:02}", this.inner.hour, this.inner.minute),
            days = this.inner.broadcast_days,
            "daily broadcast scheduled"
        );
        tokio::spawn(async move { this.job_loop().await })
    }

    pub fn stop(&self) {
        self.inner.cancel.cancel();
    }

    async fn job_loop(&self) {
        loop {
            let now = Local::now().naive_local();
            let next = next_run_after(now, self.inner.hour, self.inner.minute);
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);

            tokio::select! {
                _ = self.inner.cancel.cancelled() => return,
                _ = sleep(wait) => {}
            }

            let today = Local::now().date_naive();
            let day_keys = DayKey::walk_back(today, self.inner.broadcast_days);
            match self.inner.broadcaster.broadcast(&day_keys).await {
                Ok(report) => tracing::info!(summary = %report.summary(), "scheduled broadcast"),
                Err(e) => tracing::error!(error = %e, "scheduled broadcast failed"),
            }
        }
    }
}

/// Next occurrence of `hour:minute` strictly after `now`.
fn next_run_after(now: NaiveDateTime, hour: u32, minute: u32) -> NaiveDateTime {
    let today_run = now
        .date()
        .and_hms_opt(hour, minute, 0)
        .unwrap_or_else(|| now.date().and_hms_opt(0, 0, 0).expect("midnight exists"));
    if today_run > now {
        today_run
    } else {
        today_run + TimeDelta::days(1)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn runs_later_today_when_time_not_yet_reached() {
        let next = next_run_after(at(2026, 5, 9, 7, 30), 9, 0);
        assert_eq!(next, at(2026, 5, 9, 9, 0));
    }

    #[test]
    fn rolls_to_tomorrow_when_time_already_passed() {
        let next = next_run_after(at(2026, 5, 9, 9, 0), 9, 0);
        assert_eq!(next, at(2026, 5, 10, 9, 0));

        let next = next_run_after(at(2026, 5, 9, 23, 59), 9, 0);
        assert_eq!(next, at(2026, 5, 10, 9, 0));
    }

    #[test]
    fn rolls_across_month_and_year_boundaries() {
        let next = next_run_after(at(2026, 12, 31, 10, 0), 9, 0);
        assert_eq!(next, at(2027, 1, 1, 9, 0));
    }
}
