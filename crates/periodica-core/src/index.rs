//! Time index types
//!
//! A [`PeriodIndex`] is an ordered sequence of calendar periods ("January
//! 2020", "2020Q3") sharing one [`Frequency`]. Periods are converted to
//! absolute instants with the start-of-period convention before any
//! arithmetic happens on them.

use crate::error::{FeatureError, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use std::fmt;
use std::str::FromStr;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;
/// Weekly periods are anchored on Monday 1969-12-29
const WEEK_ANCHOR_SECONDS: i64 = -3 * SECONDS_PER_DAY;

/// Base unit of a sampling frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FrequencyUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl FrequencyUnit {
    /// Canonical alias used when displaying a frequency
    pub fn alias(&self) -> &'static str {
        match self {
            FrequencyUnit::Second => "S",
            FrequencyUnit::Minute => "T",
            FrequencyUnit::Hour => "H",
            FrequencyUnit::Day => "D",
            FrequencyUnit::Week => "W",
            FrequencyUnit::Month => "M",
            FrequencyUnit::Quarter => "Q",
            FrequencyUnit::Year => "A",
        }
    }

    /// Nominal length in seconds. Calendar units use fixed lengths
    /// (30-day months, 90-day quarters, 365-day years).
    pub fn nominal_seconds(&self) -> i64 {
        match self {
            FrequencyUnit::Second => 1,
            FrequencyUnit::Minute => 60,
            FrequencyUnit::Hour => 3_600,
            FrequencyUnit::Day => SECONDS_PER_DAY,
            FrequencyUnit::Week => SECONDS_PER_WEEK,
            FrequencyUnit::Month => 30 * SECONDS_PER_DAY,
            FrequencyUnit::Quarter => 90 * SECONDS_PER_DAY,
            FrequencyUnit::Year => 365 * SECONDS_PER_DAY,
        }
    }

    /// Seconds per unit for the fixed-length units, `None` for calendar units
    fn fixed_seconds(&self) -> Option<i64> {
        match self {
            FrequencyUnit::Second
            | FrequencyUnit::Minute
            | FrequencyUnit::Hour
            | FrequencyUnit::Day => Some(self.nominal_seconds()),
            _ => None,
        }
    }
}

/// Sampling frequency of a period index, e.g. `M`, `Q`, `3D`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frequency {
    multiple: u32,
    unit: FrequencyUnit,
}

impl Frequency {
    pub fn new(multiple: u32, unit: FrequencyUnit) -> Result<Self> {
        if multiple == 0 {
            return Err(FeatureError::InvalidConfig(
                "frequency multiple must be at least 1".to_string(),
            ));
        }
        Ok(Self { multiple, unit })
    }

    /// Frequency with a multiple of one
    pub const fn of(unit: FrequencyUnit) -> Self {
        Self { multiple: 1, unit }
    }

    pub fn multiple(&self) -> u32 {
        self.multiple
    }

    pub fn unit(&self) -> FrequencyUnit {
        self.unit
    }

    /// Spacing between consecutive periods as a duration
    pub fn nominal_duration(&self) -> Duration {
        self.unit
            .nominal_seconds()
            .checked_mul(i64::from(self.multiple))
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }
}

impl FromStr for Frequency {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        let digits = text
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(text.len());
        let (count, alias) = text.split_at(digits);

        let multiple = if count.is_empty() {
            1
        } else {
            count.parse::<u32>().map_err(|_| {
                FeatureError::ParseError(format!("invalid frequency multiple in '{}'", s))
            })?
        };

        let unit = match alias.trim().to_ascii_uppercase().as_str() {
            "S" | "SEC" => FrequencyUnit::Second,
            "T" | "MIN" => FrequencyUnit::Minute,
            "H" | "HR" => FrequencyUnit::Hour,
            "D" => FrequencyUnit::Day,
            "W" | "W-MON" | "W-SUN" => FrequencyUnit::Week,
            "M" | "MS" | "ME" => FrequencyUnit::Month,
            "Q" | "QS" | "QE" | "Q-DEC" => FrequencyUnit::Quarter,
            "A" | "Y" | "AS" | "YS" | "YE" | "A-DEC" => FrequencyUnit::Year,
            _ => {
                return Err(FeatureError::ParseError(format!(
                    "unknown frequency alias '{}'",
                    s
                )))
            }
        };

        Frequency::new(multiple, unit)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.multiple == 1 {
            write!(f, "{}", self.unit.alias())
        } else {
            write!(f, "{}{}", self.multiple, self.unit.alias())
        }
    }
}

/// A single calendar period
///
/// The ordinal counts base units of the frequency since the Unix epoch, so
/// `2020-01` at monthly frequency has ordinal `600`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    ordinal: i64,
    freq: Frequency,
}

impl Period {
    pub fn new(ordinal: i64, freq: Frequency) -> Self {
        Self { ordinal, freq }
    }

    /// The period containing `timestamp`
    pub fn from_timestamp(timestamp: NaiveDateTime, freq: Frequency) -> Self {
        let seconds = timestamp.and_utc().timestamp();
        let months = (i64::from(timestamp.year()) - 1970) * 12 + i64::from(timestamp.month0());

        let ordinal = match freq.unit {
            FrequencyUnit::Week => (seconds - WEEK_ANCHOR_SECONDS).div_euclid(SECONDS_PER_WEEK),
            FrequencyUnit::Month => months,
            FrequencyUnit::Quarter => months.div_euclid(3),
            FrequencyUnit::Year => i64::from(timestamp.year()) - 1970,
            unit => seconds.div_euclid(unit.nominal_seconds()),
        };

        Self { ordinal, freq }
    }

    /// Parse a period label such as `2020`, `2020-01`, `2020Q3` or `2020-01-15`
    pub fn parse(label: &str, freq: Frequency) -> Result<Self> {
        let text = label.trim();

        if let Some((year, quarter)) = text.split_once(|c: char| c == 'Q' || c == 'q') {
            let year: i32 = year.trim_end_matches('-').parse().map_err(|_| {
                FeatureError::ParseError(format!("invalid year in period '{}'", label))
            })?;
            let quarter: u32 = match quarter.parse() {
                Ok(q @ 1..=4) => q,
                _ => {
                    return Err(FeatureError::ParseError(format!(
                        "invalid quarter in period '{}'",
                        label
                    )))
                }
            };
            let start = month_start(year, (quarter - 1) * 3 + 1).ok_or_else(|| {
                FeatureError::ParseError(format!("period '{}' is out of range", label))
            })?;
            return Ok(Self::from_timestamp(start, freq));
        }

        let timestamp = match text.len() {
            4 => text
                .parse::<i32>()
                .ok()
                .and_then(|year| month_start(year, 1)),
            7 => NaiveDate::parse_from_str(&format!("{}-01", text), "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0)),
            _ => parse_timestamp(text).ok(),
        }
        .ok_or_else(|| FeatureError::ParseError(format!("cannot parse period '{}'", label)))?;

        Ok(Self::from_timestamp(timestamp, freq))
    }

    pub fn ordinal(&self) -> i64 {
        self.ordinal
    }

    pub fn freq(&self) -> Frequency {
        self.freq
    }

    /// The period `steps` frequency multiples away from this one
    pub fn offset(&self, steps: i64) -> Result<Self> {
        steps
            .checked_mul(i64::from(self.freq.multiple))
            .and_then(|delta| self.ordinal.checked_add(delta))
            .map(|ordinal| Self::new(ordinal, self.freq))
            .ok_or_else(|| {
                FeatureError::IndexConversion(format!("period offset {} overflows", steps))
            })
    }

    /// First instant of the period
    pub fn start_time(&self) -> Result<NaiveDateTime> {
        let out_of_range = || {
            FeatureError::IndexConversion(format!(
                "period ordinal {} at frequency {} is out of the representable range",
                self.ordinal, self.freq
            ))
        };

        let start = match self.freq.unit {
            FrequencyUnit::Month => {
                let year = 1970 + self.ordinal.div_euclid(12);
                let month = self.ordinal.rem_euclid(12) + 1;
                calendar_start(year, month)
            }
            FrequencyUnit::Quarter => {
                let year = 1970 + self.ordinal.div_euclid(4);
                let month = self.ordinal.rem_euclid(4) * 3 + 1;
                calendar_start(year, month)
            }
            FrequencyUnit::Year => self.ordinal.checked_add(1970).and_then(|y| calendar_start(y, 1)),
            FrequencyUnit::Week => self
                .ordinal
                .checked_mul(SECONDS_PER_WEEK)
                .and_then(|s| s.checked_add(WEEK_ANCHOR_SECONDS))
                .and_then(|s| DateTime::from_timestamp(s, 0))
                .map(|dt| dt.naive_utc()),
            unit => unit
                .fixed_seconds()
                .and_then(|per| self.ordinal.checked_mul(per))
                .and_then(|s| DateTime::from_timestamp(s, 0))
                .map(|dt| dt.naive_utc()),
        };

        start.ok_or_else(out_of_range)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = match self.start_time() {
            Ok(start) => start,
            Err(_) => return write!(f, "Period({}, {})", self.ordinal, self.freq),
        };

        match self.freq.unit {
            FrequencyUnit::Year => write!(f, "{}", start.format("%Y")),
            FrequencyUnit::Quarter => write!(f, "{}Q{}", start.year(), start.month0() / 3 + 1),
            FrequencyUnit::Month => write!(f, "{}", start.format("%Y-%m")),
            FrequencyUnit::Week => {
                let end = start + Duration::days(6);
                write!(f, "{}/{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
            }
            FrequencyUnit::Day => write!(f, "{}", start.format("%Y-%m-%d")),
            FrequencyUnit::Hour | FrequencyUnit::Minute => {
                write!(f, "{}", start.format("%Y-%m-%d %H:%M"))
            }
            FrequencyUnit::Second => write!(f, "{}", start.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Ordered sequence of periods sharing one frequency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodIndex {
    freq: Frequency,
    periods: Vec<Period>,
}

impl PeriodIndex {
    pub fn new(freq: Frequency, periods: Vec<Period>) -> Result<Self> {
        if let Some(other) = periods.iter().find(|p| p.freq != freq) {
            return Err(FeatureError::InvalidConfig(format!(
                "period {} has frequency {}, index frequency is {}",
                other, other.freq, freq
            )));
        }
        Ok(Self { freq, periods })
    }

    /// `count` consecutive periods starting at `start`
    pub fn range(start: Period, count: usize) -> Result<Self> {
        let periods = (0..count)
            .map(|step| {
                let step = i64::try_from(step).map_err(|_| {
                    FeatureError::InvalidConfig(format!("period count {} is too large", count))
                })?;
                start.offset(step)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            freq: start.freq,
            periods,
        })
    }

    pub fn freq(&self) -> Frequency {
        self.freq
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn iter(&self) -> impl Iterator<Item = &Period> {
        self.periods.iter()
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Convert every period to its start instant
    pub fn to_timestamp(&self) -> Result<Vec<NaiveDateTime>> {
        self.periods.iter().map(Period::start_time).collect()
    }
}

/// Row index of a [`FeatureFrame`](crate::FeatureFrame)
#[derive(Debug, Clone, PartialEq)]
pub enum RowIndex {
    Period(PeriodIndex),
    Datetime(Vec<NaiveDateTime>),
    Integer(Vec<i64>),
}

impl RowIndex {
    pub fn len(&self) -> usize {
        match self {
            RowIndex::Period(index) => index.len(),
            RowIndex::Datetime(values) => values.len(),
            RowIndex::Integer(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RowIndex::Period(_) => "period",
            RowIndex::Datetime(_) => "datetime",
            RowIndex::Integer(_) => "integer",
        }
    }

    /// Display labels, one per row
    pub fn labels(&self) -> Vec<String> {
        match self {
            RowIndex::Period(index) => index.iter().map(|p| p.to_string()).collect(),
            RowIndex::Datetime(values) => values
                .iter()
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .collect(),
            RowIndex::Integer(values) => values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn as_period_index(&self) -> Result<&PeriodIndex> {
        match self {
            RowIndex::Period(index) => Ok(index),
            other => Err(FeatureError::IndexConversion(format!(
                "expected a period index, got a {} index",
                other.kind()
            ))),
        }
    }
}

impl From<PeriodIndex> for RowIndex {
    fn from(index: PeriodIndex) -> Self {
        RowIndex::Period(index)
    }
}

/// Parse an absolute timestamp
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS[.f]]`, the same with a `T`
/// separator, and RFC 3339 (converted to UTC).
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime> {
    let text = input.trim();

    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    for format in DATETIME_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(timestamp);
        }
    }

    if let Some(timestamp) = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(timestamp);
    }

    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.naive_utc())
        .map_err(|_| FeatureError::ParseError(format!("cannot parse '{}' as a timestamp", input)))
}

fn month_start(year: i32, month: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, 1).and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn calendar_start(year: i64, month: i64) -> Option<NaiveDateTime> {
    let year = i32::try_from(year).ok()?;
    let month = u32::try_from(month).ok()?;
    month_start(year, month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    fn monthly() -> Frequency {
        Frequency::of(FrequencyUnit::Month)
    }

    #[test]
    fn test_frequency_parsing() {
        assert_eq!("M".parse::<Frequency>().unwrap(), monthly());
        assert_eq!(
            "q".parse::<Frequency>().unwrap(),
            Frequency::of(FrequencyUnit::Quarter)
        );
        assert_eq!(
            "3D".parse::<Frequency>().unwrap(),
            Frequency::new(3, FrequencyUnit::Day).unwrap()
        );
        assert_eq!(
            "15min".parse::<Frequency>().unwrap(),
            Frequency::new(15, FrequencyUnit::Minute).unwrap()
        );
        assert!("0D".parse::<Frequency>().is_err());
        assert!("fortnight".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_frequency_display() {
        assert_eq!(monthly().to_string(), "M");
        assert_eq!(Frequency::new(2, FrequencyUnit::Hour).unwrap().to_string(), "2H");
    }

    #[test]
    fn test_nominal_duration() {
        assert_eq!(monthly().nominal_duration(), Duration::days(30));
        assert_eq!(
            Frequency::of(FrequencyUnit::Quarter).nominal_duration(),
            Duration::days(90)
        );
        assert_eq!(
            Frequency::new(2, FrequencyUnit::Week).unwrap().nominal_duration(),
            Duration::days(14)
        );
        assert_eq!(
            Frequency::of(FrequencyUnit::Year).nominal_duration(),
            Duration::days(365)
        );
    }

    #[test]
    fn test_monthly_period_round_trip() {
        let period = Period::from_timestamp(ts("2020-03-17 12:30:00"), monthly());
        assert_eq!(period.ordinal(), 50 * 12 + 2);
        assert_eq!(period.start_time().unwrap(), ts("2020-03-01"));
        assert_eq!(period.to_string(), "2020-03");
    }

    #[test]
    fn test_periods_before_epoch() {
        let period = Period::from_timestamp(ts("1969-11-05"), monthly());
        assert_eq!(period.ordinal(), -2);
        assert_eq!(period.start_time().unwrap(), ts("1969-11-01"));

        let day = Period::from_timestamp(ts("1969-12-31 23:00:00"), Frequency::of(FrequencyUnit::Day));
        assert_eq!(day.ordinal(), -1);
        assert_eq!(day.start_time().unwrap(), ts("1969-12-31"));
    }

    #[test]
    fn test_quarter_and_year_periods() {
        let quarter = Period::parse("2020Q3", Frequency::of(FrequencyUnit::Quarter)).unwrap();
        assert_eq!(quarter.start_time().unwrap(), ts("2020-07-01"));
        assert_eq!(quarter.to_string(), "2020Q3");

        let year = Period::parse("2021", Frequency::of(FrequencyUnit::Year)).unwrap();
        assert_eq!(year.start_time().unwrap(), ts("2021-01-01"));
        assert_eq!(year.to_string(), "2021");

        assert!(Period::parse("2020Q5", Frequency::of(FrequencyUnit::Quarter)).is_err());
    }

    #[test]
    fn test_weekly_periods_start_on_monday() {
        let week = Period::from_timestamp(ts("2020-01-08"), Frequency::of(FrequencyUnit::Week));
        assert_eq!(week.start_time().unwrap(), ts("2020-01-06"));
        assert_eq!(week.to_string(), "2020-01-06/2020-01-12");
    }

    #[test]
    fn test_sub_daily_periods() {
        let hourly = Frequency::of(FrequencyUnit::Hour);
        let period = Period::parse("2020-01-01 05:45", hourly).unwrap();
        assert_eq!(period.start_time().unwrap(), ts("2020-01-01 05:00:00"));
        assert_eq!(period.to_string(), "2020-01-01 05:00");
    }

    #[test]
    fn test_period_label_parsing() {
        let period = Period::parse("2020-01", monthly()).unwrap();
        assert_eq!(period.start_time().unwrap(), ts("2020-01-01"));

        let period = Period::parse("2020-06-15", monthly()).unwrap();
        assert_eq!(period.start_time().unwrap(), ts("2020-06-01"));

        assert!(Period::parse("January", monthly()).is_err());
    }

    #[test]
    fn test_period_range() {
        let start = Period::parse("2020-01", monthly()).unwrap();
        let index = PeriodIndex::range(start, 6).unwrap();

        assert_eq!(index.len(), 6);
        assert_eq!(index.freq(), monthly());
        let stamps = index.to_timestamp().unwrap();
        assert_eq!(stamps.first().copied(), Some(ts("2020-01-01")));
        assert_eq!(stamps.last().copied(), Some(ts("2020-06-01")));
    }

    #[test]
    fn test_period_range_with_multiple() {
        let freq = Frequency::new(2, FrequencyUnit::Month).unwrap();
        let start = Period::parse("2020-11", freq).unwrap();
        let index = PeriodIndex::range(start, 3).unwrap();

        let stamps = index.to_timestamp().unwrap();
        assert_eq!(stamps, vec![ts("2020-11-01"), ts("2021-01-01"), ts("2021-03-01")]);
    }

    #[test]
    fn test_index_rejects_mixed_frequencies() {
        let periods = vec![
            Period::parse("2020-01", monthly()).unwrap(),
            Period::parse("2020Q1", Frequency::of(FrequencyUnit::Quarter)).unwrap(),
        ];
        assert!(matches!(
            PeriodIndex::new(monthly(), periods),
            Err(FeatureError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_out_of_range_period() {
        let period = Period::new(i64::MAX, monthly());
        assert!(matches!(
            period.start_time(),
            Err(FeatureError::IndexConversion(_))
        ));
        assert!(period.offset(1).is_err());
    }

    #[test]
    fn test_row_index_conversion() {
        let index = RowIndex::Integer(vec![0, 1, 2]);
        assert!(matches!(
            index.as_period_index(),
            Err(FeatureError::IndexConversion(_))
        ));

        let datetime = RowIndex::Datetime(vec![ts("2020-01-01")]);
        let err = datetime.as_period_index().unwrap_err();
        assert!(err.to_string().contains("datetime"));
    }

    #[test]
    fn test_row_index_labels() {
        let start = Period::parse("2020-01", monthly()).unwrap();
        let index = RowIndex::from(PeriodIndex::range(start, 2).unwrap());
        assert_eq!(index.labels(), vec!["2020-01", "2020-02"]);
        assert_eq!(RowIndex::Integer(vec![4, 5]).labels(), vec!["4", "5"]);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(ts("2020-01-01T06:00:00"), ts("2020-01-01 06:00"));
        assert_eq!(ts("2020-01-01T06:00:00+02:00"), ts("2020-01-01 04:00:00"));
        assert_eq!(
            ts("2020-01-01 00:00:00.5"),
            ts("2020-01-01") + Duration::milliseconds(500)
        );
        assert!(parse_timestamp("01/01/2020").is_err());
    }
}
