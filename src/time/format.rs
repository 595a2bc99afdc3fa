//! Text input and output of dates and timestamps.
//!
//! Output follows `Config::date_style`; input accepts any of the styles
//! (ISO, SQL, German, XSD), reading ambiguous slash dates by
//! `Config::date_order`. Both sides understand `-infinity`, `infinity`,
//! `epoch` and a trailing ` BC`.
use crate::config::{Config, DateOrder, DateStyle};
use crate::error::{InputKind, Result, TemporalError};
use crate::time::TimePoint;
use crate::time::interval::USECS_PER_SEC;
use chrono::{DateTime, Datelike, NaiveDate, Timelike};
use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{char, digit1, one_of, space0, space1};
use nom::combinator::{all_consuming, map, opt, value};
use nom::sequence::{pair, preceded, tuple};

struct RawDate<'a> {
    first: &'a str,
    second: &'a str,
    third: &'a str,
    sep: char,
}

struct RawTime<'a> {
    hour: &'a str,
    minute: &'a str,
    second: Option<&'a str>,
    fraction: Option<&'a str>,
}

struct RawTimestamp<'a> {
    date: RawDate<'a>,
    time: Option<RawTime<'a>>,
    /// Offset east of UTC in seconds
    zone: Option<Option<i32>>,
    bc: bool,
}

fn raw_date(input: &str) -> IResult<&str, RawDate<'_>> {
    let (input, (first, sep, second, sep2, third)) =
        tuple((digit1, one_of("-/."), digit1, one_of("-/."), digit1))(input)?;
    if sep != sep2 {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }
    Ok((
        input,
        RawDate {
            first,
            second,
            third,
            sep,
        },
    ))
}

fn raw_time(input: &str) -> IResult<&str, RawTime<'_>> {
    map(
        tuple((
            digit1,
            char(':'),
            digit1,
            opt(pair(
                preceded(char(':'), digit1),
                opt(preceded(char('.'), digit1)),
            )),
        )),
        |(hour, _, minute, rest)| RawTime {
            hour,
            minute,
            second: rest.map(|(s, _)| s),
            fraction: rest.and_then(|(_, f)| f),
        },
    )(input)
}

fn numeric_offset(input: &str) -> IResult<&str, Option<i32>> {
    map(
        tuple((
            one_of("+-"),
            digit1,
            opt(preceded(char(':'), digit1)),
            opt(preceded(char(':'), digit1)),
        )),
        |(sign, hours, minutes, seconds): (char, &str, Option<&str>, Option<&str>)| {
            // "+0530" carries hours and minutes in one run of digits
            let (h, m) = match (hours.len(), minutes) {
                (4, None) => (hours[..2].parse::<i32>().ok()?, hours[2..].parse::<i32>().ok()?),
                (1..=2, _) => (
                    hours.parse::<i32>().ok()?,
                    minutes.map_or(Some(0), |m| m.parse::<i32>().ok())?,
                ),
                _ => return None,
            };
            let s = seconds.map_or(Some(0), |s| s.parse::<i32>().ok())?;
            if h > 15 || m > 59 || s > 59 {
                return None;
            }
            let total = h * 3600 + m * 60 + s;
            Some(if sign == '-' { -total } else { total })
        },
    )(input)
}

fn zone(input: &str) -> IResult<&str, Option<i32>> {
    alt((
        value(Some(0), alt((tag_no_case("utc"), tag_no_case("gmt"), tag_no_case("z")))),
        numeric_offset,
    ))(input)
}

fn raw_timestamp(input: &str) -> IResult<&str, RawTimestamp<'_>> {
    map(
        all_consuming(tuple((
            space0,
            raw_date,
            opt(preceded(alt((space1, tag_no_case("t"))), raw_time)),
            opt(preceded(space0, zone)),
            opt(preceded(space1, tag_no_case("bc"))),
            space0,
        ))),
        |(_, date, time, zone, bc, _)| RawTimestamp {
            date,
            time,
            zone,
            bc: bc.is_some(),
        },
    )(input)
}

fn special(text: &str) -> Option<TimePoint> {
    match text.trim().to_ascii_lowercase().as_str() {
        "infinity" | "+infinity" => Some(TimePoint::INFINITY),
        "-infinity" => Some(TimePoint::NEG_INFINITY),
        "epoch" => Some(TimePoint::EPOCH),
        _ => None,
    }
}

fn resolve_date(raw: &RawDate<'_>, bc: bool, config: &Config) -> Option<NaiveDate> {
    let year_first = raw.first.len() > 2;
    let (y, m, d) = match raw.sep {
        _ if year_first => (raw.first, raw.second, raw.third),
        '.' => (raw.third, raw.second, raw.first),
        _ => match config.date_order {
            DateOrder::Mdy => (raw.third, raw.first, raw.second),
            DateOrder::Dmy => (raw.third, raw.second, raw.first),
            DateOrder::Ymd => (raw.first, raw.second, raw.third),
        },
    };
    let year: i32 = y.parse().ok()?;
    if year == 0 {
        return None;
    }
    let year = if bc { 1 - year } else { year };
    NaiveDate::from_ymd_opt(year, m.parse().ok()?, d.parse().ok()?)
}

/// Microseconds of a fraction-of-second digit run, rounded half up.
fn fraction_micros(digits: &str) -> i64 {
    let mut micros = 0i64;
    for (i, c) in digits.chars().take(6).enumerate() {
        micros += (c as i64 - '0' as i64) * 10i64.pow(5 - i as u32);
    }
    if let Some(next) = digits.chars().nth(6)
        && next >= '5'
    {
        micros += 1;
    }
    micros
}

fn parse_raw(text: &str, with_tz: bool, config: &Config) -> Option<Result<TimePoint>> {
    let (_, raw) = raw_timestamp(text).ok()?;
    let date = resolve_date(&raw.date, raw.bc, config)?;
    let (h, mi, s, frac) = match &raw.time {
        Some(time) => (
            time.hour.parse::<u32>().ok()?,
            time.minute.parse::<u32>().ok()?,
            time.second.map_or(Some(0), |s| s.parse::<u32>().ok())?,
            time.fraction.map_or(0, fraction_micros),
        ),
        None => (0, 0, 0, 0),
    };
    if s > 59 {
        return None;
    }
    let naive = date.and_hms_opt(h, mi, s)?;
    let offset = match raw.zone {
        Some(zone) => zone?,
        None => config.utc_offset_seconds,
    };
    let offset = if with_tz { offset } else { 0 };
    let micros = naive
        .and_utc()
        .timestamp_micros()
        .checked_add(frac)
        .and_then(|m| m.checked_sub(offset as i64 * USECS_PER_SEC));
    Some(match micros {
        Some(m) => TimePoint::from_micros(m),
        None => Err(TemporalError::Overflow("timestamp")),
    })
}

/// Read a timestamp. With `with_tz` an explicit zone is honoured and a
/// missing one means the configured offset; without it any zone is ignored.
///
/// # Examples
///
/// ```
/// use tempora::config::Config;
/// use tempora::time::format::parse_timestamp;
/// use tempora::time::TimePoint;
///
/// let cfg = Config::default();
/// let t = parse_timestamp("2001-01-01 08:00:00+02", true, &cfg).unwrap();
/// assert_eq!(t, TimePoint::from_ymd_hms(2001, 1, 1, 6, 0, 0).unwrap());
/// ```
pub fn parse_timestamp(text: &str, with_tz: bool, config: &Config) -> Result<TimePoint> {
    if let Some(t) = special(text) {
        return Ok(t);
    }
    let kind = if with_tz {
        InputKind::TimestampTz
    } else {
        InputKind::Timestamp
    };
    parse_raw(text, with_tz, config).unwrap_or_else(|| Err(TemporalError::malformed(text, kind)))
}

/// Read a date as the timestamp of its midnight in UTC.
pub fn parse_date(text: &str, config: &Config) -> Result<TimePoint> {
    if let Some(t) = special(text) {
        return Ok(t);
    }
    let malformed = || TemporalError::malformed(text, InputKind::Date);
    let (_, raw) = raw_timestamp(text).map_err(|_| malformed())?;
    if raw.time.is_some() || raw.zone.is_some() {
        return Err(malformed());
    }
    let midnight = resolve_date(&raw.date, raw.bc, config)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(malformed)?;
    TimePoint::from_naive(midnight)
}

fn write_date(out: &mut String, date: NaiveDate, config: &Config) {
    let (year, month, day) = (date.year(), date.month(), date.day());
    // years up to 0 are written as BC years: 0 is 1 BC
    let year = if year <= 0 { 1 - year } else { year };
    let text = match (config.date_style, config.date_order) {
        (DateStyle::Iso | DateStyle::Xsd, _) => format!("{:04}-{:02}-{:02}", year, month, day),
        (DateStyle::Sql, DateOrder::Mdy) => format!("{:02}/{:02}/{:04}", month, day, year),
        (DateStyle::Sql, DateOrder::Dmy) => format!("{:02}/{:02}/{:04}", day, month, year),
        (DateStyle::Sql, DateOrder::Ymd) => format!("{:04}/{:02}/{:02}", year, month, day),
        (DateStyle::German, _) => format!("{:02}.{:02}.{:04}", day, month, year),
    };
    out.push_str(&text);
}

fn write_offset(out: &mut String, offset: i32) {
    let sign = if offset < 0 { '-' } else { '+' };
    let abs = offset.unsigned_abs();
    out.push_str(&format!("{}{:02}", sign, abs / 3600));
    if abs % 3600 != 0 {
        out.push_str(&format!(":{:02}", (abs / 60) % 60));
        if abs % 60 != 0 {
            out.push_str(&format!(":{:02}", abs % 60));
        }
    }
}

/// Render a timestamp in the configured style. With `with_tz` the value is
/// shown at the configured offset followed by that offset.
pub fn format_timestamp(t: TimePoint, with_tz: bool, config: &Config) -> String {
    if t == TimePoint::NEG_INFINITY {
        return "-infinity".to_string();
    }
    if t == TimePoint::INFINITY {
        return "infinity".to_string();
    }
    let mut offset = if with_tz { config.utc_offset_seconds } else { 0 };
    let local = t
        .micros()
        .checked_add(offset as i64 * USECS_PER_SEC)
        .and_then(DateTime::from_timestamp_micros)
        .or_else(|| {
            offset = 0;
            DateTime::from_timestamp_micros(t.micros())
        });
    let Some(local) = local.map(|dt| dt.naive_utc()) else {
        return t.micros().to_string();
    };

    let mut out = String::with_capacity(32);
    write_date(&mut out, local.date(), config);
    out.push(if config.date_style == DateStyle::Xsd { 'T' } else { ' ' });
    out.push_str(&format!(
        "{:02}:{:02}:{:02}",
        local.hour(),
        local.minute(),
        local.second()
    ));
    let micros = local.nanosecond() / 1000;
    if micros != 0 {
        let digits = format!("{:06}", micros);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    if with_tz {
        write_offset(&mut out, offset);
    }
    if local.year() <= 0 {
        out.push_str(" BC");
    }
    out
}

/// Render the UTC calendar date of a timestamp.
pub fn format_date(t: TimePoint, config: &Config) -> String {
    if t == TimePoint::NEG_INFINITY {
        return "-infinity".to_string();
    }
    if t == TimePoint::INFINITY {
        return "infinity".to_string();
    }
    match t.to_naive() {
        Some(dt) => {
            let mut out = String::with_capacity(16);
            write_date(&mut out, dt.date(), config);
            if dt.year() <= 0 {
                out.push_str(" BC");
            }
            out
        }
        None => t.micros().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> TimePoint {
        TimePoint::from_ymd_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_parse_iso_variants() {
        let cfg = Config::default();
        let expected = utc(2001, 1, 1, 8, 0, 0);
        for text in [
            "2001-01-01 08:00:00",
            "2001-01-01 08:00",
            "2001-01-01T08:00:00Z",
            "2001-01-01 08:00:00+00",
            "2001-01-01 09:00:00+01:00",
            "2001-01-01 03:30:00-0430",
            "  2001-01-01 08:00:00 UTC ",
        ] {
            assert_eq!(parse_timestamp(text, true, &cfg).unwrap(), expected, "{}", text);
        }
    }

    #[test]
    fn test_parse_uses_configured_offset() {
        let cfg = Config::default().with_utc_offset(3600);
        let t = parse_timestamp("2001-01-01 08:00:00", true, &cfg).unwrap();
        assert_eq!(t, utc(2001, 1, 1, 7, 0, 0));
        // without time zone, offsets are ignored
        let t = parse_timestamp("2001-01-01 08:00:00+05", false, &cfg).unwrap();
        assert_eq!(t, utc(2001, 1, 1, 8, 0, 0));
    }

    #[test]
    fn test_parse_date_orders() {
        let mdy = Config::default();
        let dmy = Config::default().with_date_order(DateOrder::Dmy);
        assert_eq!(parse_date("02/03/2001", &mdy).unwrap(), utc(2001, 2, 3, 0, 0, 0));
        assert_eq!(parse_date("02/03/2001", &dmy).unwrap(), utc(2001, 3, 2, 0, 0, 0));
        assert_eq!(parse_date("03.02.2001", &mdy).unwrap(), utc(2001, 2, 3, 0, 0, 0));
    }

    #[test]
    fn test_parse_fraction_rounding() {
        let cfg = Config::default();
        let t = parse_timestamp("2001-01-01 00:00:00.1234565", true, &cfg).unwrap();
        assert_eq!(t.micros() - utc(2001, 1, 1, 0, 0, 0).micros(), 123_457);
    }

    #[test]
    fn test_special_literals() {
        let cfg = Config::default();
        assert_eq!(parse_timestamp("-infinity", true, &cfg).unwrap(), TimePoint::NEG_INFINITY);
        assert_eq!(parse_timestamp("Infinity", true, &cfg).unwrap(), TimePoint::INFINITY);
        assert_eq!(parse_timestamp("epoch", true, &cfg).unwrap(), TimePoint::EPOCH);
    }

    #[test]
    fn test_malformed_inputs() {
        let cfg = Config::default();
        for text in ["", "2001-13-01", "2001-02-30", "2001-01-01 25:00", "yesterday", "2001-01/01"] {
            assert!(
                matches!(
                    parse_timestamp(text, true, &cfg),
                    Err(TemporalError::MalformedInput { kind: InputKind::TimestampTz, .. })
                ),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_format_styles() {
        let t = utc(2001, 2, 3, 4, 5, 6);
        let iso = Config::default();
        assert_eq!(format_timestamp(t, true, &iso), "2001-02-03 04:05:06+00");
        assert_eq!(format_timestamp(t, false, &iso), "2001-02-03 04:05:06");
        let sql = Config::default().with_date_style(DateStyle::Sql);
        assert_eq!(format_timestamp(t, true, &sql), "02/03/2001 04:05:06+00");
        let german = Config::default().with_date_style(DateStyle::German);
        assert_eq!(format_timestamp(t, true, &german), "03.02.2001 04:05:06+00");
        let xsd = Config::default().with_date_style(DateStyle::Xsd).with_utc_offset(-5400);
        assert_eq!(format_timestamp(t, true, &xsd), "2001-02-03T02:35:06-01:30");
    }

    #[test]
    fn test_round_trip_across_styles() {
        let t = TimePoint::from_micros(utc(1999, 12, 31, 23, 59, 59).micros() + 250).unwrap();
        for style in [DateStyle::Iso, DateStyle::Sql, DateStyle::German, DateStyle::Xsd] {
            for order in [DateOrder::Mdy, DateOrder::Dmy, DateOrder::Ymd] {
                let cfg = Config::default()
                    .with_date_style(style)
                    .with_date_order(order)
                    .with_utc_offset(19800);
                let text = format_timestamp(t, true, &cfg);
                assert_eq!(parse_timestamp(&text, true, &cfg).unwrap(), t, "{}", text);
            }
        }
    }

    #[test]
    fn test_bc_dates_round_trip() {
        let cfg = Config::default();
        let t = utc(-43, 3, 15, 12, 0, 0);
        let text = format_timestamp(t, true, &cfg);
        assert_eq!(text, "0044-03-15 12:00:00+00 BC");
        assert_eq!(parse_timestamp(&text, true, &cfg).unwrap(), t);
    }

    #[test]
    fn test_format_date() {
        let cfg = Config::default();
        let t = utc(2012, 6, 30, 23, 0, 0);
        assert_eq!(format_date(t, &cfg), "2012-06-30");
        assert_eq!(parse_date(&format_date(t, &cfg), &cfg).unwrap(), utc(2012, 6, 30, 0, 0, 0));
        assert!(parse_date("2012-06-30 10:00", &cfg).is_err());
    }
}
