//! 时间工具函数: 业务时区与时钟
//!
//! "Today" is always evaluated in the restaurant's timezone, never the
//! host's. Everything that needs the current date goes through [`Clock`] so
//! tests can pin it.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use shared::reservation::serde_hhmm;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析时段字符串 (HH:MM)
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    serde_hhmm::parse(time)
        .map_err(|_| AppError::validation(format!("Invalid time format: {}", time)))
}

/// 解析时区名 (IANA)，失败返回 None
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.parse().ok()
}

/// Source of "now" for business rules
pub trait Clock: Send + Sync {
    /// Current date in the business timezone
    fn today(&self) -> NaiveDate;

    /// Current Unix millis (record timestamps)
    fn now_millis(&self) -> i64;
}

/// Wall clock in a fixed business timezone
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Utc::now().with_timezone(&self.tz).date_naive()
    }

    fn now_millis(&self) -> i64 {
        shared::util::now_millis()
    }
}

/// Clock pinned to one date (tests, replays)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
    millis: i64,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        let millis = today
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp_millis();
        Self { today, millis }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now_millis(&self) -> i64 {
        self.millis
    }
}
