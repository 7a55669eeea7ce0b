//! Slot Calendar - 营业时间与可预订时段
//!
//! Each weekday owns zero or more service windows (午市、晚市). A window
//! `[open, close)` yields the slots `open, open + interval, …` strictly
//! before `close`. Closed dates (holidays, private events) yield nothing.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use shared::reservation::serde_hhmm;
use std::collections::BTreeSet;
use thiserror::Error;

/// One service window, `close` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceWindow {
    #[serde(with = "serde_hhmm")]
    pub open: NaiveTime,
    #[serde(with = "serde_hhmm")]
    pub close: NaiveTime,
}

/// Service windows of one weekday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub weekday: Weekday,
    #[serde(default)]
    pub services: Vec<ServiceWindow>,
}

/// Calendar section of the floor plan file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    pub slot_interval_minutes: u32,
    pub days: Vec<DaySchedule>,
    #[serde(default)]
    pub closed_dates: Vec<NaiveDate>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("slot interval must be between 1 and 1440 minutes, got {0}")]
    InvalidInterval(u32),

    #[error("{weekday}: service window {open}-{close} is empty or inverted")]
    InvertedWindow {
        weekday: Weekday,
        open: NaiveTime,
        close: NaiveTime,
    },

    #[error("{0} is scheduled more than once")]
    DuplicateWeekday(Weekday),
}

/// Operating hours lookup
///
/// Slots are precomputed per weekday at construction, so lookups never
/// allocate.
#[derive(Debug, Clone)]
pub struct SlotCalendar {
    interval_minutes: u32,
    /// Indexed by `Weekday::num_days_from_monday()`; sorted, de-duplicated
    slots: [Vec<NaiveTime>; 7],
    closed_dates: BTreeSet<NaiveDate>,
}

impl SlotCalendar {
    pub fn from_config(config: &CalendarConfig) -> Result<Self, CalendarError> {
        let interval = config.slot_interval_minutes;
        if interval == 0 || interval > 24 * 60 {
            return Err(CalendarError::InvalidInterval(interval));
        }

        let mut slots: [Vec<NaiveTime>; 7] = Default::default();
        let mut seen = BTreeSet::new();

        for day in &config.days {
            let idx = day.weekday.num_days_from_monday() as usize;
            if !seen.insert(idx) {
                return Err(CalendarError::DuplicateWeekday(day.weekday));
            }

            let mut minutes = BTreeSet::new();
            for window in &day.services {
                if window.open >= window.close {
                    return Err(CalendarError::InvertedWindow {
                        weekday: day.weekday,
                        open: window.open,
                        close: window.close,
                    });
                }
                let open = minute_of(window.open);
                let close = minute_of(window.close);
                minutes.extend((open..close).step_by(interval as usize));
            }

            slots[idx] = minutes.into_iter().filter_map(time_of).collect();
        }

        Ok(Self {
            interval_minutes: interval,
            slots,
            closed_dates: config.closed_dates.iter().copied().collect(),
        })
    }

    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }

    /// Candidate slots of `date` in calendar order
    pub fn slots_for(&self, date: NaiveDate) -> &[NaiveTime] {
        if self.closed_dates.contains(&date) {
            return &[];
        }
        &self.slots[date.weekday().num_days_from_monday() as usize]
    }

    /// Whether `time` is a bookable slot on `date`
    pub fn is_bookable(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.slots_for(date).binary_search(&time).is_ok()
    }

    pub fn is_closed(&self, date: NaiveDate) -> bool {
        self.slots_for(date).is_empty()
    }
}

fn minute_of(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

fn time_of(minute: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0)
}

impl Default for CalendarConfig {
    /// 每天午市 13:00-16:00，晚市 19:00-23:00，30 分钟一档
    fn default() -> Self {
        let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN);
        let services = vec![
            ServiceWindow {
                open: hm(13, 0),
                close: hm(16, 0),
            },
            ServiceWindow {
                open: hm(19, 0),
                close: hm(23, 0),
            },
        ];
        Self {
            slot_interval_minutes: 30,
            days: [
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
                Weekday::Sun,
            ]
            .into_iter()
            .map(|weekday| DaySchedule {
                weekday,
                services: services.clone(),
            })
            .collect(),
            closed_dates: Vec::new(),
        }
    }
}
