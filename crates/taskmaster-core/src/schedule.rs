//! Due date/time conversion between the user's timezone and the wire format.
//!
//! Tasks store their schedule as two strings, `due_date` (`YYYY-MM-DD`) and
//! `due_time` (`HH:MM`), expressed in a reference timezone (UTC). The user
//! enters and reads wall-clock values in their own IANA timezone; [`encode`]
//! and [`decode`] convert between the two.
//!
//! The original app shifted dates by a hard-coded four hours (a frozen
//! approximation of Bolivia time). That is replaced here with real
//! timezone-aware conversion through `chrono-tz`; the default user zone in
//! settings is `America/La_Paz`, so existing data reads back identically.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::errors::{Result, ScheduleError};

/// Wire format for `due_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Wire format for `due_time`. Seconds are not carried, matching the
/// original schema.
pub const TIME_FORMAT: &str = "%H:%M";

/// Resolve an IANA timezone name.
pub fn parse_zone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| ScheduleError::UnknownZone(name.to_string()))
}

/// Encode a wall-clock due date/time in `zone` as reference-timezone wire
/// strings.
///
/// Ambiguous local times (DST fold) resolve to the earlier instant;
/// nonexistent local times (DST gap) slide forward to the first valid
/// instant. Neither case can fail.
#[must_use]
pub fn encode(local: NaiveDateTime, zone: Tz) -> (String, String) {
    let resolved: DateTime<Tz> = match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            // Wall-clock value inside a DST gap never occurs; probe forward
            // in half-hour steps until the clock is valid again.
            let mut probe = local;
            loop {
                probe = probe + Duration::minutes(30);
                if let Some(dt) = zone.from_local_datetime(&probe).earliest() {
                    break dt;
                }
            }
        }
    };
    let utc = resolved.with_timezone(&Utc);
    (
        utc.format(DATE_FORMAT).to_string(),
        utc.format(TIME_FORMAT).to_string(),
    )
}

/// Decode wire strings back into a wall-clock value in `zone`.
pub fn decode(due_date: &str, due_time: &str, zone: Tz) -> Result<NaiveDateTime> {
    let instant = due_instant(due_date, due_time)?;
    Ok(instant.with_timezone(&zone).naive_local())
}

/// Parse wire strings into the absolute instant they represent.
pub fn due_instant(due_date: &str, due_time: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(due_date, DATE_FORMAT)
        .map_err(|_| ScheduleError::InvalidDate(due_date.to_string()))?;
    let time = NaiveTime::parse_from_str(due_time, TIME_FORMAT)
        .map_err(|_| ScheduleError::InvalidTime(due_time.to_string()))?;
    Ok(Utc.from_utc_datetime(&date.and_time(time)))
}
