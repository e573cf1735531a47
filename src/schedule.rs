//! Day schedule derived from the PAT ("prêt à tourner") time.

use chrono::{Duration, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{CallSheetError, Result};

const INSTALL_BEFORE_PAT: i64 = 30;
const MEET_BEFORE_PAT: i64 = 15;
const END_AFTER_PAT: i64 = 90;

/// Four checkpoint times, `HH:MM`. Values may be blank when typed by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub install: String,
    pub meet: String,
    pub hair_makeup: String,
    pub end: String,
}

/// Manual overrides entered on the form.
pub type CustomSchedule = ScheduleResult;

pub fn parse_hhmm(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|_| CallSheetError::InvalidTime(s.to_string()))
}

fn hhmm(t: NaiveTime) -> String {
    format!("{:02}:{:02}", t.hour(), t.minute())
}

/// Custom times win as soon as an install time is given; otherwise every
/// checkpoint is offset from PAT on a 24h clock (wrapping past midnight).
pub fn compute_schedule(pat_time: &str, custom: Option<&CustomSchedule>) -> Result<ScheduleResult> {
    if let Some(custom) = custom.filter(|c| !c.install.trim().is_empty()) {
        return Ok(custom.clone());
    }

    let pat = parse_hhmm(pat_time)?;
    let meet = hhmm(pat - Duration::minutes(MEET_BEFORE_PAT));
    Ok(ScheduleResult {
        install: hhmm(pat - Duration::minutes(INSTALL_BEFORE_PAT)),
        hair_makeup: meet.clone(),
        meet,
        end: hhmm(pat + Duration::minutes(END_AFTER_PAT)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_offsets_from_pat() {
        let s = compute_schedule("10:00", None).unwrap();
        assert_eq!(s.install, "09:30");
        assert_eq!(s.meet, "09:45");
        assert_eq!(s.hair_makeup, "09:45");
        assert_eq!(s.end, "11:30");
    }

    #[test]
    fn wraps_before_midnight() {
        let s = compute_schedule("00:10", None).unwrap();
        assert_eq!(s.install, "23:40");
        assert_eq!(s.meet, "23:55");
        assert_eq!(s.end, "01:40");
    }

    #[test]
    fn wraps_after_midnight() {
        assert_eq!(compute_schedule("23:00", None).unwrap().end, "00:30");
    }

    #[test]
    fn custom_with_install_is_returned_verbatim() {
        let custom = ScheduleResult { install: "07:00".into(), meet: "".into(), hair_makeup: "12:00".into(), end: "06:00".into() };
        assert_eq!(compute_schedule("10:00", Some(&custom)).unwrap(), custom);
        // PAT is not even looked at.
        assert_eq!(compute_schedule("garbage", Some(&custom)).unwrap(), custom);
    }

    #[test]
    fn custom_without_install_falls_back_to_pat() {
        let custom = ScheduleResult { install: " ".into(), meet: "08:00".into(), ..Default::default() };
        assert_eq!(compute_schedule("14:15", Some(&custom)).unwrap().install, "13:45");
    }

    #[test]
    fn malformed_pat_is_an_error() {
        assert!(matches!(compute_schedule("10h", None), Err(CallSheetError::InvalidTime(_))));
        assert!(matches!(compute_schedule("", None), Err(CallSheetError::InvalidTime(_))));
    }
}
