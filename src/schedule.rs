//! Once-a-day trigger at a fixed wall-clock time.
//!
//! [`DailySchedule`] keeps the next due instant and is polled with the current
//! local time. Nothing is persisted: occurrences that fall while the process is
//! not running are skipped, and a process started after today's time first
//! fires tomorrow.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, Local, NaiveDateTime, NaiveTime};

use super::error::Result;
use super::pipeline::Pipeline;
use super::traits::StudyOperations;

/// Sleep between two checks of the clock.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Work run when the schedule fires.
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    async fn run(&self) -> Result<()>;
}

/// Stand-in job that only reports that an update is due.
pub struct PlaceholderJob;

#[async_trait]
impl ScheduledJob for PlaceholderJob {
    async fn run(&self) -> Result<()> {
        tracing::info!("Updating data...");
        Ok(())
    }
}

/// Re-runs the fetch → format → write chain for a fixed set of companies.
pub struct RefreshJob<'a, S: StudyOperations + ?Sized> {
    pub pipeline: Pipeline<'a, S>,
    pub companies: Vec<String>,
}

#[async_trait]
impl<'a, S: StudyOperations + ?Sized> ScheduledJob for RefreshJob<'a, S> {
    async fn run(&self) -> Result<()> {
        let report = self.pipeline.run(&self.companies).await?;
        tracing::info!(
            "Scheduled refresh wrote {} rows for {} companies",
            report.rows_appended(),
            report.companies.len()
        );
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySchedule {
    at: NaiveTime,
    next_run: NaiveDateTime,
}

impl DailySchedule {
    /// Schedule firing every day at `at`, starting with the first occurrence after `now`.
    pub fn new(at: NaiveTime, now: NaiveDateTime) -> Self {
        Self {
            at,
            next_run: next_occurrence(at, now),
        }
    }

    /// Parses an `HH:MM` (or `HH:MM:SS`) time of day.
    pub fn parse_time(value: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(value, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
            .ok()
    }

    pub fn next_run(&self) -> NaiveDateTime {
        self.next_run
    }

    /// Reports whether the schedule is due at `now`, advancing to the next day if so.
    ///
    /// A poll long after the due time fires once, not once per missed day.
    pub fn poll(&mut self, now: NaiveDateTime) -> bool {
        if now < self.next_run {
            return false;
        }
        self.next_run = next_occurrence(self.at, now);
        true
    }
}

/// First instant strictly after `now` whose time of day is `at`.
fn next_occurrence(at: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        now.date()
            .checked_add_days(Days::new(1))
            .unwrap_or(now.date())
            .and_time(at)
    }
}

/// Polls the local clock forever, running `job` whenever the schedule is due.
///
/// A failing job is logged and the schedule carries on with the next day.
pub async fn run_daily<J: ScheduledJob + ?Sized>(mut schedule: DailySchedule, job: &J) {
    tracing::info!("Next scheduled run at {}", schedule.next_run());
    loop {
        if schedule.poll(Local::now().naive_local()) {
            if let Err(e) = job.run().await {
                tracing::error!("Scheduled job failed: {}", e);
            }
            tracing::info!("Next scheduled run at {}", schedule.next_run());
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn ten() -> NaiveTime {
        NaiveTime::from_hms_opt(10, 0, 0).unwrap()
    }

    #[test]
    fn test_first_run_later_today() {
        let schedule = DailySchedule::new(ten(), at(5, 8, 30, 0));
        assert_eq!(schedule.next_run(), at(5, 10, 0, 0));
    }

    #[test]
    fn test_started_after_time_waits_for_tomorrow() {
        let schedule = DailySchedule::new(ten(), at(5, 10, 0, 0));
        assert_eq!(schedule.next_run(), at(6, 10, 0, 0));
    }

    #[test]
    fn test_poll_fires_once_per_day() {
        let mut schedule = DailySchedule::new(ten(), at(5, 9, 59, 58));

        assert!(!schedule.poll(at(5, 9, 59, 59)));
        assert!(schedule.poll(at(5, 10, 0, 0)));
        assert!(!schedule.poll(at(5, 10, 0, 1)));
        assert!(!schedule.poll(at(6, 9, 59, 59)));
        assert!(schedule.poll(at(6, 10, 0, 0)));
    }

    #[test]
    fn test_missed_days_fire_once() {
        let mut schedule = DailySchedule::new(ten(), at(5, 9, 0, 0));
        assert!(schedule.poll(at(8, 15, 0, 0)));
        assert_eq!(schedule.next_run(), at(9, 10, 0, 0));
        assert!(!schedule.poll(at(8, 15, 0, 1)));
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(DailySchedule::parse_time("10:00"), Some(ten()));
        assert_eq!(
            DailySchedule::parse_time("23:15:30"),
            NaiveTime::from_hms_opt(23, 15, 30)
        );
        assert_eq!(DailySchedule::parse_time("25:00"), None);
        assert_eq!(DailySchedule::parse_time("ten"), None);
    }

    #[tokio::test]
    async fn test_placeholder_job_succeeds() {
        assert!(PlaceholderJob.run().await.is_ok());
    }
}
