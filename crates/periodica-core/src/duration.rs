//! Duration parsing, normalization and formatting
//!
//! Periods are configured either as a [`chrono::Duration`] or as text such as
//! `"30 days"`, `"1h30m"`, `"1 days 02:00:00"` or the ISO-8601 form `"P2W"`.

use crate::error::{FeatureError, Result};
use chrono::Duration;

const NANOS_PER_SECOND: i128 = 1_000_000_000;
const NANOS_PER_MINUTE: i128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i128 = 60 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: i128 = 24 * NANOS_PER_HOUR;
const NANOS_PER_WEEK: i128 = 7 * NANOS_PER_DAY;

/// A period as supplied by a caller, before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum PeriodArg {
    Duration(Duration),
    Text(String),
}

impl From<Duration> for PeriodArg {
    fn from(duration: Duration) -> Self {
        PeriodArg::Duration(duration)
    }
}

impl From<&str> for PeriodArg {
    fn from(text: &str) -> Self {
        PeriodArg::Text(text.to_string())
    }
}

impl From<String> for PeriodArg {
    fn from(text: String) -> Self {
        PeriodArg::Text(text)
    }
}

/// Normalize a duration value or duration string into a strictly positive [`Duration`]
pub fn normalize_period(period: impl Into<PeriodArg>) -> Result<Duration> {
    let duration = match period.into() {
        PeriodArg::Duration(duration) => duration,
        PeriodArg::Text(text) => parse_duration(&text)?,
    };

    if duration <= Duration::zero() {
        return Err(FeatureError::InvalidPeriod(format!(
            "period must be strictly positive, got {}",
            format_duration(&duration)
        )));
    }

    Ok(duration)
}

/// Parse a duration string
///
/// Accepted forms:
/// - unit sequences: `"30 days"`, `"10D"`, `"1h30m"`, `"1.5 hours"`
/// - a clock component, alone or after days: `"02:30:00"`, `"1 days 02:00:00"`
/// - ISO-8601: `"P1W2DT3H4M5.5S"`
///
/// A leading `-` negates the whole duration. A number without a unit counts
/// nanoseconds.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let text = input.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text.strip_prefix('+').unwrap_or(text).trim_start()),
    };

    if body.is_empty() {
        return Err(parse_error(input, "no duration given"));
    }

    let nanos = match body.strip_prefix(|c: char| c == 'P' || c == 'p') {
        Some(iso) => parse_iso8601(iso, input)?,
        None => parse_components(body, input)?,
    };
    let nanos = if negative { -nanos } else { nanos };

    nanos_to_duration(nanos).ok_or_else(|| parse_error(input, "duration out of range"))
}

/// Render a duration as `"<days> days HH:MM:SS[.fraction]"`
pub fn format_duration(duration: &Duration) -> String {
    let sign = if *duration < Duration::zero() { "-" } else { "" };
    let magnitude = duration.abs();
    let total_seconds = magnitude.num_seconds();
    let nanos = magnitude.subsec_nanos();

    let days = total_seconds / 86_400;
    let rem = total_seconds % 86_400;
    let mut out = format!(
        "{}{} days {:02}:{:02}:{:02}",
        sign,
        days,
        rem / 3_600,
        (rem % 3_600) / 60,
        rem % 60
    );

    if nanos != 0 {
        let fraction = format!("{:09}", nanos);
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }

    out
}

/// Length of a duration in (fractional) seconds
pub fn duration_seconds(duration: &Duration) -> f64 {
    duration.num_seconds() as f64 + f64::from(duration.subsec_nanos()) / 1e9
}

fn parse_components(body: &str, input: &str) -> Result<i128> {
    let mut total: i128 = 0;
    let mut rest = body;

    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        if rest.is_empty() {
            break;
        }

        let number_len = leading_number_len(rest);
        if number_len == 0 {
            return Err(parse_error(input, &format!("expected a number at '{}'", rest)));
        }

        if rest[number_len..].starts_with(':') {
            let clock_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
            total = checked_sum(total, parse_clock(&rest[..clock_len], input)?, input)?;
            rest = &rest[clock_len..];
            continue;
        }

        let number = &rest[..number_len];
        let after = rest[number_len..].trim_start();
        let unit_len = after
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(after.len());
        let unit = &after[..unit_len];

        let scale = if unit.is_empty() {
            1
        } else {
            unit_nanos(unit)
                .ok_or_else(|| parse_error(input, &format!("unknown unit '{}'", unit)))?
        };

        total = checked_sum(total, scale_decimal(number, scale, input)?, input)?;
        rest = &after[unit_len..];
    }

    Ok(total)
}

fn parse_clock(clock: &str, input: &str) -> Result<i128> {
    let invalid = || parse_error(input, &format!("invalid clock component '{}'", clock));

    let parts: Vec<&str> = clock.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m] => (*h, *m, "0"),
        [h, m, s] => (*h, *m, *s),
        _ => return Err(invalid()),
    };

    let integer_field = |field: &str| -> Result<i128> {
        if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        field.parse().map_err(|_| invalid())
    };

    let hours = integer_field(hours)?;
    let minutes = integer_field(minutes)?;
    if minutes >= 60 {
        return Err(invalid());
    }

    if seconds.is_empty() || !seconds.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return Err(invalid());
    }
    let second_nanos = scale_decimal(seconds, NANOS_PER_SECOND, input)?;
    if second_nanos >= 60 * NANOS_PER_SECOND {
        return Err(invalid());
    }

    let hour_nanos = hours
        .checked_mul(NANOS_PER_HOUR)
        .ok_or_else(|| parse_error(input, "duration out of range"))?;
    let total = checked_sum(hour_nanos, minutes * NANOS_PER_MINUTE, input)?;
    checked_sum(total, second_nanos, input)
}

fn parse_iso8601(body: &str, input: &str) -> Result<i128> {
    if body.is_empty() {
        return Err(parse_error(input, "empty ISO-8601 duration"));
    }

    let (date_part, time_part) = match body.split_once(|c: char| c == 'T' || c == 't') {
        Some((_, "")) => return Err(parse_error(input, "missing time components after 'T'")),
        Some((date, time)) => (date, Some(time)),
        None => (body, None),
    };

    let mut total = parse_designated(
        date_part,
        &[('W', NANOS_PER_WEEK), ('D', NANOS_PER_DAY)],
        input,
    )?;

    if let Some(time) = time_part {
        let time_total = parse_designated(
            time,
            &[
                ('H', NANOS_PER_HOUR),
                ('M', NANOS_PER_MINUTE),
                ('S', NANOS_PER_SECOND),
            ],
            input,
        )?;
        total = checked_sum(total, time_total, input)?;
    }

    Ok(total)
}

/// Parse `<number><designator>` pairs whose designators appear in the given order
fn parse_designated(part: &str, designators: &[(char, i128)], input: &str) -> Result<i128> {
    let mut total: i128 = 0;
    let mut rest = part;
    let mut next_allowed = 0;

    while !rest.is_empty() {
        let number_len = leading_number_len(rest);
        let raw = match rest[number_len..].chars().next() {
            Some(c) if number_len > 0 => c,
            _ => {
                return Err(parse_error(
                    input,
                    &format!("expected a number followed by a designator at '{}'", rest),
                ))
            }
        };
        let designator = raw.to_ascii_uppercase();

        let position = designators[next_allowed..]
            .iter()
            .position(|(d, _)| *d == designator)
            .ok_or_else(|| parse_error(input, &format!("unexpected designator '{}'", raw)))?;
        let (_, scale) = designators[next_allowed + position];
        next_allowed += position + 1;

        total = checked_sum(total, scale_decimal(&rest[..number_len], scale, input)?, input)?;
        rest = &rest[number_len + raw.len_utf8()..];
    }

    Ok(total)
}

fn unit_nanos(unit: &str) -> Option<i128> {
    let nanos = match unit.to_ascii_lowercase().as_str() {
        "w" | "wk" | "wks" | "week" | "weeks" => NANOS_PER_WEEK,
        "d" | "day" | "days" => NANOS_PER_DAY,
        "h" | "hr" | "hrs" | "hour" | "hours" => NANOS_PER_HOUR,
        "m" | "t" | "min" | "mins" | "minute" | "minutes" => NANOS_PER_MINUTE,
        "s" | "sec" | "secs" | "second" | "seconds" => NANOS_PER_SECOND,
        "ms" | "l" | "milli" | "millis" | "millisecond" | "milliseconds" => 1_000_000,
        "us" | "u" | "micro" | "micros" | "microsecond" | "microseconds" => 1_000,
        "ns" | "n" | "nano" | "nanos" | "nanosecond" | "nanoseconds" => 1,
        _ => return None,
    };
    Some(nanos)
}

fn leading_number_len(s: &str) -> usize {
    s.find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len())
}

/// Multiply a decimal literal by `scale` nanoseconds, truncating below 1ns
fn scale_decimal(number: &str, scale: i128, input: &str) -> Result<i128> {
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if (whole.is_empty() && fraction.is_empty()) || fraction.contains('.') {
        return Err(parse_error(input, &format!("invalid number '{}'", number)));
    }

    let out_of_range = || parse_error(input, "duration out of range");

    let whole_value: i128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| out_of_range())?
    };
    let mut value = whole_value.checked_mul(scale).ok_or_else(out_of_range)?;

    let mut place = scale;
    for c in fraction.chars() {
        place /= 10;
        if place == 0 {
            break;
        }
        let digit = c
            .to_digit(10)
            .ok_or_else(|| parse_error(input, &format!("invalid number '{}'", number)))?;
        value = value
            .checked_add(i128::from(digit) * place)
            .ok_or_else(out_of_range)?;
    }

    Ok(value)
}

fn checked_sum(a: i128, b: i128, input: &str) -> Result<i128> {
    a.checked_add(b)
        .ok_or_else(|| parse_error(input, "duration out of range"))
}

fn nanos_to_duration(nanos: i128) -> Option<Duration> {
    let seconds = i64::try_from(nanos.div_euclid(NANOS_PER_SECOND)).ok()?;
    let subsec = i64::try_from(nanos.rem_euclid(NANOS_PER_SECOND)).ok()?;
    Duration::try_seconds(seconds)?.checked_add(&Duration::nanoseconds(subsec))
}

fn parse_error(input: &str, reason: &str) -> FeatureError {
    FeatureError::ParseError(format!("cannot parse '{}' as a duration: {}", input, reason))
}
