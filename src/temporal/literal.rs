//! Text form of temporal values.
//!
//! ```text
//! instant       value@timestamp
//! instant set   {value@timestamp, ...}
//! sequence      [value@timestamp, ...]   with ( or [ and ) or ] as bounds
//! sequence set  {[...], (...], ...}
//! ```
//!
//! Sequences and sequence sets of a continuous base type may be prefixed with
//! `Interp=Stepwise;`; without a prefix they take the base type's default
//! interpolation. Whitespace around tokens is ignored.
use crate::base::{BaseValue, parse_base};
use crate::config::Config;
use crate::error::{InputKind, Result, TemporalError};
use crate::temporal::{Interpolation, TInstant, TSequence, Temporal};
use crate::time::format::{format_timestamp, parse_timestamp};
use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::{tag_no_case, take_till1};
use nom::character::complete::{char, multispace0, one_of};
use nom::combinator::{all_consuming, map, opt, value};
use nom::error::{Error, ErrorKind};
use nom::multi::separated_list1;
use nom::sequence::{delimited, preceded, separated_pair, terminated, tuple};
use std::fmt;
use std::str::FromStr;

struct RawInstant<'a> {
    value: &'a str,
    time: &'a str,
}

struct RawSequence<'a> {
    lower_inc: bool,
    instants: Vec<RawInstant<'a>>,
    upper_inc: bool,
}

enum RawTemporal<'a> {
    Instant(RawInstant<'a>),
    InstantSet(Vec<RawInstant<'a>>),
    Sequence(RawSequence<'a>),
    SequenceSet(Vec<RawSequence<'a>>),
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn fail(input: &str) -> nom::Err<Error<&str>> {
    nom::Err::Error(Error::new(input, ErrorKind::Verify))
}

/// A double-quoted token, escapes included; decoding is left to the base type.
fn quoted_token(input: &str) -> IResult<&str, &str> {
    let mut chars = input.char_indices();
    if !matches!(chars.next(), Some((_, '"'))) {
        return Err(fail(input));
    }
    let mut escaped = false;
    for (idx, c) in chars {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Ok((&input[idx + 1..], &input[..idx + 1])),
            _ => {}
        }
    }
    Err(fail(input))
}

/// Everything up to the `@` that is not nested inside parentheses, so that
/// `POINT(1 2)` stays one token.
fn bare_token(input: &str) -> IResult<&str, &str> {
    let mut depth = 0usize;
    for (idx, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1).ok_or_else(|| fail(input))?,
            '@' if depth == 0 => {
                let token = input[..idx].trim_end();
                if token.is_empty() {
                    return Err(fail(input));
                }
                return Ok((&input[idx..], token));
            }
            _ => {}
        }
    }
    Err(fail(input))
}

fn value_token(input: &str) -> IResult<&str, &str> {
    alt((ws(quoted_token), ws(bare_token)))(input)
}

fn time_token(input: &str) -> IResult<&str, &str> {
    map(
        take_till1(|c| matches!(c, ',' | ']' | ')' | '}')),
        str::trim,
    )(input)
}

fn raw_instant(input: &str) -> IResult<&str, RawInstant<'_>> {
    map(
        separated_pair(value_token, char('@'), ws(time_token)),
        |(value, time)| RawInstant { value, time },
    )(input)
}

fn raw_instants(input: &str) -> IResult<&str, Vec<RawInstant<'_>>> {
    separated_list1(char(','), raw_instant)(input)
}

fn raw_sequence(input: &str) -> IResult<&str, RawSequence<'_>> {
    map(
        tuple((ws(one_of("[(")), raw_instants, ws(one_of("])")))),
        |(open, instants, close)| RawSequence {
            lower_inc: open == '[',
            instants,
            upper_inc: close == ']',
        },
    )(input)
}

fn interp_prefix(input: &str) -> IResult<&str, Interpolation> {
    preceded(
        ws(tag_no_case("interp=")),
        terminated(
            alt((
                value(Interpolation::Stepwise, tag_no_case("stepwise")),
                value(Interpolation::Linear, tag_no_case("linear")),
            )),
            ws(char(';')),
        ),
    )(input)
}

fn raw_temporal(input: &str) -> IResult<&str, (Option<Interpolation>, RawTemporal<'_>)> {
    all_consuming(tuple((
        opt(interp_prefix),
        alt((
            map(
                delimited(
                    ws(char('{')),
                    separated_list1(char(','), raw_sequence),
                    ws(char('}')),
                ),
                RawTemporal::SequenceSet,
            ),
            map(
                delimited(ws(char('{')), raw_instants, ws(char('}'))),
                RawTemporal::InstantSet,
            ),
            map(raw_sequence, RawTemporal::Sequence),
            map(raw_instant, RawTemporal::Instant),
        )),
    )))(input)
}

fn build_instant<V: BaseValue>(raw: &RawInstant<'_>, config: &Config) -> Result<TInstant<V>> {
    let value = parse_base::<V>(raw.value)?;
    let t = parse_timestamp(raw.time, true, config)?;
    TInstant::new(t, value)
}

fn build_sequence<V: BaseValue>(
    raw: &RawSequence<'_>,
    interp: Interpolation,
    config: &Config,
) -> Result<TSequence<V>> {
    let instants = raw
        .instants
        .iter()
        .map(|i| build_instant(i, config))
        .collect::<Result<Vec<_>>>()?;
    TSequence::new(instants, raw.lower_inc, raw.upper_inc, interp)
}

/// Parse a temporal literal.
///
/// # Examples
///
/// ```
/// use tempora::config::Config;
/// use tempora::temporal::{Interpolation, literal::parse_temporal};
///
/// let cfg = Config::default();
/// let temp = parse_temporal::<f64>("Interp=Stepwise;[1.5@2001-01-01, 1.5@2001-01-02)", &cfg).unwrap();
/// assert_eq!(temp.interpolation(), Some(Interpolation::Stepwise));
/// ```
pub fn parse_temporal<V: BaseValue>(text: &str, config: &Config) -> Result<Temporal<V>> {
    let (_, (prefix, raw)) = raw_temporal(text)
        .map_err(|_| TemporalError::malformed(text, InputKind::Temporal(V::TYPE_NAME)))?;
    let interp = prefix.unwrap_or_else(Interpolation::default_for::<V>);
    match raw {
        RawTemporal::Instant(inst) => {
            let inst = build_instant::<V>(&inst, config)?;
            Temporal::instant(inst.t, inst.value)
        }
        RawTemporal::InstantSet(items) => Temporal::instant_set(
            items
                .iter()
                .map(|i| build_instant(i, config))
                .collect::<Result<Vec<_>>>()?,
        ),
        RawTemporal::Sequence(seq) => Ok(Temporal::Sequence(build_sequence(&seq, interp, config)?)),
        RawTemporal::SequenceSet(seqs) => Temporal::sequence_set(
            seqs.iter()
                .map(|s| build_sequence(s, interp, config))
                .collect::<Result<Vec<_>>>()?,
        ),
    }
}

fn write_instant<V: BaseValue>(out: &mut String, inst: &TInstant<V>, config: &Config) {
    inst.value.write_literal(out, config);
    out.push('@');
    out.push_str(&format_timestamp(inst.t, true, config));
}

fn write_instants<V: BaseValue>(out: &mut String, instants: &[TInstant<V>], config: &Config) {
    for (i, inst) in instants.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_instant(out, inst, config);
    }
}

fn write_sequence<V: BaseValue>(out: &mut String, seq: &TSequence<V>, config: &Config) {
    out.push(if seq.lower_inc { '[' } else { '(' });
    write_instants(out, &seq.instants, config);
    out.push(if seq.upper_inc { ']' } else { ')' });
}

fn write_prefix<V: BaseValue>(out: &mut String, interp: Interpolation) {
    if V::CONTINUOUS && interp == Interpolation::Stepwise {
        out.push_str("Interp=Stepwise;");
    }
}

/// Render a temporal value in the configured date style.
pub fn format_temporal<V: BaseValue>(temp: &Temporal<V>, config: &Config) -> String {
    let mut out = String::with_capacity(64);
    match temp {
        Temporal::Instant(inst) => write_instant(&mut out, inst, config),
        Temporal::InstantSet(set) => {
            out.push('{');
            write_instants(&mut out, &set.instants, config);
            out.push('}');
        }
        Temporal::Sequence(seq) => {
            write_prefix::<V>(&mut out, seq.interp);
            write_sequence(&mut out, seq, config);
        }
        Temporal::SequenceSet(set) => {
            write_prefix::<V>(&mut out, set.interpolation());
            out.push('{');
            for (i, seq) in set.sequences.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_sequence(&mut out, seq, config);
            }
            out.push('}');
        }
    }
    out
}

impl<V: BaseValue> Temporal<V> {
    pub fn parse(text: &str, config: &Config) -> Result<Self> {
        parse_temporal(text, config)
    }

    pub fn to_literal(&self, config: &Config) -> String {
        format_temporal(self, config)
    }
}

impl<V: BaseValue> fmt::Display for Temporal<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_temporal(self, &Config::default()))
    }
}

impl<V: BaseValue> FromStr for Temporal<V> {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self> {
        parse_temporal(s, &Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::GeomPoint;
    use crate::config::{DateOrder, DateStyle};

    fn round_trip<V: BaseValue>(text: &str, config: &Config) -> Temporal<V> {
        let temp = parse_temporal::<V>(text, config).unwrap();
        let printed = format_temporal(&temp, config);
        let again = parse_temporal::<V>(&printed, config).unwrap();
        assert_eq!(temp, again, "{} printed as {}", text, printed);
        temp
    }

    #[test]
    fn test_parse_each_shape() {
        let cfg = Config::default();
        let inst = round_trip::<i32>("5@2001-01-01", &cfg);
        assert_eq!(inst.subtype(), "Instant");
        let set = round_trip::<i32>("{1@2001-01-01, 2@2001-01-02}", &cfg);
        assert_eq!(set.subtype(), "InstantSet");
        let seq = round_trip::<f64>("(1.5@2001-01-01, 2.5@2001-01-02]", &cfg);
        assert_eq!(seq.subtype(), "Sequence");
        let seqset = round_trip::<f64>(
            "{[1@2001-01-01, 2@2001-01-02], [3@2001-01-04, 3@2001-01-05]}",
            &cfg,
        );
        assert_eq!(seqset.subtype(), "SequenceSet");
    }

    #[test]
    fn test_output_format() {
        let cfg = Config::default();
        let seq = parse_temporal::<i32>(" [ 1 @ 2001-01-01 , 2@2001-01-02 08:30:00+02 ] ", &cfg).unwrap();
        assert_eq!(
            format_temporal(&seq, &cfg),
            "[1@2001-01-01 00:00:00+00, 2@2001-01-02 06:30:00+00]"
        );
        let flags = parse_temporal::<bool>("{true@2001-01-01, f@2001-01-02}", &cfg).unwrap();
        assert_eq!(
            format_temporal(&flags, &cfg),
            "{t@2001-01-01 00:00:00+00, f@2001-01-02 00:00:00+00}"
        );
    }

    #[test]
    fn test_stepwise_prefix_only_for_continuous_types() {
        let cfg = Config::default();
        let float = parse_temporal::<f64>("Interp=Stepwise;{[1@2001-01-01, 2@2001-01-02]}", &cfg).unwrap();
        assert!(format_temporal(&float, &cfg).starts_with("Interp=Stepwise;{["));
        let int = parse_temporal::<i32>("[1@2001-01-01, 2@2001-01-02]", &cfg).unwrap();
        assert!(format_temporal(&int, &cfg).starts_with('['));
        assert!(matches!(
            parse_temporal::<i32>("Interp=Linear;[1@2001-01-01, 2@2001-01-02]", &cfg),
            Err(TemporalError::InterpolationMismatch(_))
        ));
    }

    #[test]
    fn test_text_and_point_tokens() {
        let cfg = Config::default();
        let text = round_trip::<String>(r#"["a, b@c"@2001-01-01, "x \"y\""@2001-01-02]"#, &cfg);
        assert_eq!(text.start_value(), "a, b@c");
        let point = round_trip::<GeomPoint>("[POINT(1 1)@2001-01-01, POINT(3 3)@2001-01-03]", &cfg);
        assert_eq!(point.num_instants(), 2);
    }

    #[test]
    fn test_round_trip_other_styles() {
        let cfg = Config::default()
            .with_date_style(DateStyle::Sql)
            .with_date_order(DateOrder::Dmy)
            .with_utc_offset(3600);
        let temp = round_trip::<f64>("[1@2001-03-04 10:00:00, 2@2001-03-05 10:00:00.25)", &cfg);
        assert!(format_temporal(&temp, &cfg).contains("04/03/2001"));
    }

    #[test]
    fn test_sentinel_bounds_round_trip() {
        let cfg = Config::default();
        let temp = round_trip::<f64>("(5@-infinity, 5@2001-01-01, 6@2001-01-02]", &cfg);
        assert!(format_temporal(&temp, &cfg).starts_with("(5@-infinity"));
    }

    #[test]
    fn test_malformed_literals() {
        let cfg = Config::default();
        for bad in ["", "[1@2001-01-01", "{1@2001-01-01, [2@2001-01-02]}", "1@", "@2001-01-01", "[1@2001-01-01]]"] {
            assert!(
                matches!(
                    parse_temporal::<i32>(bad, &cfg),
                    Err(TemporalError::MalformedInput { kind: InputKind::Temporal("int"), .. })
                ),
                "{:?}",
                bad
            );
        }
        assert!(matches!(
            parse_temporal::<i32>("x@2001-01-01", &cfg),
            Err(TemporalError::MalformedInput { kind: InputKind::BaseValue("int"), .. })
        ));
        assert!(matches!(
            parse_temporal::<i32>("1@2001-13-01", &cfg),
            Err(TemporalError::MalformedInput { kind: InputKind::TimestampTz, .. })
        ));
    }
}
