use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Immutable filter shared by every record and aggregation query.
///
/// Date bounds are calendar days in local time and inclusive on both ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    agent_code: Option<String>,
    pole: Option<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_start_date(self, start_date: Option<NaiveDate>) -> Self {
        Self { start_date, ..self }
    }

    #[must_use]
    pub fn with_end_date(self, end_date: Option<NaiveDate>) -> Self {
        Self { end_date, ..self }
    }

    #[must_use]
    pub fn with_agent_code(self, agent_code: Option<&str>) -> Self {
        Self {
            agent_code: non_blank(agent_code),
            ..self
        }
    }

    #[must_use]
    pub fn with_pole(self, pole: Option<&str>) -> Self {
        Self {
            pole: non_blank(pole),
            ..self
        }
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn agent_code(&self) -> Option<&str> {
        self.agent_code.as_deref()
    }

    pub fn pole(&self) -> Option<&str> {
        self.pole.as_deref()
    }

    /// Local midnight of the start date.
    pub fn lower_bound(&self) -> Option<NaiveDateTime> {
        self.start_date.map(|date| date.and_time(NaiveTime::MIN))
    }

    /// 23:59:59.999 of the end date.
    pub fn upper_bound(&self) -> Option<NaiveDateTime> {
        self.end_date.and_then(|date| date.and_hms_milli_opt(23, 59, 59, 999))
    }
}

/// Half-open `[day 00:00, next day 00:00)` window.
pub fn day_window(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = day.and_time(NaiveTime::MIN);
    let end = day
        .checked_add_days(Days::new(1))
        .map_or(NaiveDateTime::MAX, |next| next.and_time(NaiveTime::MIN));
    (start, end)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn bounds_cover_whole_days() {
        let filter = RecordFilter::new()
            .with_start_date(Some(day(2026, 1, 5)))
            .with_end_date(Some(day(2026, 1, 7)));
        assert_eq!(
            filter.lower_bound().unwrap().to_string(),
            "2026-01-05 00:00:00"
        );
        assert_eq!(
            filter.upper_bound().unwrap().to_string(),
            "2026-01-07 23:59:59.999"
        );
    }

    #[test]
    fn blank_strings_do_not_filter() {
        let filter = RecordFilter::new()
            .with_agent_code(Some("  "))
            .with_pole(Some(""));
        assert_eq!(filter, RecordFilter::new());
        assert_eq!(filter.agent_code(), None);

        let filter = RecordFilter::new().with_agent_code(Some(" PAP801 "));
        assert_eq!(filter.agent_code(), Some("PAP801"));
    }

    #[test]
    fn day_window_crosses_month_end() {
        let (start, end) = day_window(day(2026, 1, 31));
        assert_eq!(start.to_string(), "2026-01-31 00:00:00");
        assert_eq!(end.to_string(), "2026-02-01 00:00:00");
    }
}
