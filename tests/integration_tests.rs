use tempora::bbox::ValueExtent;
use tempora::lifting::{
    CmpOp, always_cmp, always_eq, ever_eq, overlaps_time, tcomp, teq, teq_value, when_true,
};
use tempora::math::{add_scalar, derivative};
use tempora::temporal::Temporal;
use tempora::{
    BaseValue, Config, GeogPoint, GeomPoint, GeomPoint3d, Interpolation, Interval, Period,
    TInstant, TSequence, TemporalError, TimePoint,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn ts(day: u32) -> TimePoint {
    TimePoint::from_ymd_hms(2001, 1, day, 0, 0, 0).unwrap()
}

fn parse<V: BaseValue>(text: &str) -> Temporal<V> {
    Temporal::parse(text, &Config::default()).unwrap()
}

fn assert_round_trip<V: BaseValue>(text: &str) {
    let cfg = Config::default();
    let value: Temporal<V> = Temporal::parse(text, &cfg).unwrap();
    let printed = value.to_literal(&cfg);
    let reparsed: Temporal<V> = Temporal::parse(&printed, &cfg).unwrap();
    assert_eq!(reparsed, value, "{}", text);
    assert_eq!(reparsed.to_literal(&cfg), printed);
    assert_eq!(reparsed.hash32(), value.hash32());
}

#[test]
fn test_round_trip_all_shapes() {
    assert_round_trip::<i32>("17@2001-01-01");
    assert_round_trip::<i32>("{1@2001-01-01, 2@2001-01-02, 1@2001-01-03}");
    assert_round_trip::<i32>("[1@2001-01-01, 2@2001-01-03, 2@2001-01-05)");
    assert_round_trip::<f64>("{[1.5@2001-01-01, 2.25@2001-01-02), [3@2001-01-04, 3@2001-01-05]}");
    assert_round_trip::<f64>("Interp=Stepwise;[1@2001-01-01, 2@2001-01-02]");
    assert_round_trip::<bool>("[t@2001-01-01, f@2001-01-02, f@2001-01-03]");
    assert_round_trip::<String>("{\"a \\\"quoted\\\" word\"@2001-01-01, \"b\"@2001-01-02}");
    assert_round_trip::<GeomPoint>("[POINT(0 0)@2001-01-01, POINT(1 2)@2001-01-02]");
}

#[test]
fn test_stepwise_normal_form() {
    init_logging();
    let temp = parse::<i32>("[1@2001-01-01, 2@2001-01-03, 2@2001-01-04, 2@2001-01-05)");
    let expected = parse::<i32>("[1@2001-01-01, 2@2001-01-03, 2@2001-01-05)");
    assert_eq!(temp, expected);
    assert_eq!(temp.num_instants(), 3);
}

#[test]
fn test_linear_normal_form() {
    let temp = parse::<f64>("[1@2001-01-01, 2@2001-01-03, 3@2001-01-05]");
    assert_eq!(temp.timestamps(), vec![ts(1), ts(5)]);

    let track = parse::<GeomPoint>(
        "[POINT(0 0)@2001-01-01, POINT(1 1)@2001-01-02, POINT(2 2)@2001-01-03]",
    );
    assert_eq!(track.num_instants(), 2);

    // off the line: kept
    let bent = parse::<f64>("[1@2001-01-01, 2@2001-01-02, 3@2001-01-05]");
    assert_eq!(bent.num_instants(), 3);
}

#[test]
fn test_normalization_is_idempotent() {
    let texts = [
        "[1@2001-01-01, 1@2001-01-02, 1@2001-01-03, 2@2001-01-04, 2@2001-01-05]",
        "{[1@2001-01-01, 1@2001-01-03), [1@2001-01-03, 2@2001-01-05]}",
    ];
    for text in texts {
        let once = parse::<i32>(text);
        let twice = parse::<i32>(&once.to_string());
        assert_eq!(once, twice);
        assert_eq!(once.to_string(), twice.to_string());
    }
}

#[test]
fn test_sequence_set_merge() {
    init_logging();
    let first = TSequence::new(
        vec![TInstant::new(ts(1), 1).unwrap(), TInstant::new(ts(3), 1).unwrap()],
        true,
        false,
        Interpolation::Stepwise,
    )
    .unwrap();
    let second = TSequence::new(
        vec![TInstant::new(ts(3), 2).unwrap(), TInstant::new(ts(5), 2).unwrap()],
        true,
        false,
        Interpolation::Stepwise,
    )
    .unwrap();
    let merged = Temporal::sequence_set(vec![first.clone(), second]).unwrap();
    assert_eq!(merged.subtype(), "Sequence");
    assert_eq!(merged, parse::<i32>("[1@2001-01-01, 2@2001-01-03, 2@2001-01-05)"));
    assert_eq!(
        merged.to_string(),
        "[1@2001-01-01 00:00:00+00, 2@2001-01-03 00:00:00+00, 2@2001-01-05 00:00:00+00)"
    );

    // a lone member is kept as a set
    let single = Temporal::sequence_set(vec![first]).unwrap();
    assert_eq!(single.subtype(), "SequenceSet");
    assert_eq!(single, parse::<i32>("{[1@2001-01-01, 1@2001-01-03)}"));
}

#[test]
fn test_sequence_set_bbox_is_closed() {
    let set = parse::<f64>("{(1.5@2001-01-01, 2.5@2001-01-02), [3@2001-01-04, 3@2001-01-05)}");
    let bbox = set.bbox();
    assert!(bbox.period.lower_inc() && bbox.period.upper_inc());
    assert_eq!((bbox.period.lower(), bbox.period.upper()), (ts(1), ts(5)));
    assert!(!set.period().lower_inc() && !set.period().upper_inc());
}

#[test]
fn test_rejected_constructions() {
    assert_eq!(
        Temporal::<i32>::sequence(vec![], true, true, Interpolation::Stepwise),
        Err(TemporalError::Empty)
    );
    assert!(matches!(
        Temporal::<i32>::parse("[1@2001-01-01, 2@2001-01-01]", &Config::default()),
        Err(TemporalError::DuplicateOrUnorderedTimestamp { .. })
    ));
    assert_eq!(
        Temporal::<i32>::parse("(1@2001-01-01, 2@2001-01-02)", &Config::default()),
        Err(TemporalError::StepwiseEndpointMismatch)
    );
    assert_eq!(
        Temporal::<i32>::parse(
            "{[1@2001-01-01, 2@2001-01-03], [3@2001-01-02, 3@2001-01-04]}",
            &Config::default()
        ),
        Err(TemporalError::OverlappingOrUnorderedExtents)
    );
}

#[test]
fn test_ever_always() {
    let temp = parse::<i32>("[10@2001-01-01, 20@2001-01-02, 15@2001-01-03]");
    assert!(ever_eq(&temp, &20));
    assert!(!always_eq(&temp, &20));
    assert!(always_cmp(&temp, CmpOp::Le, &20));
}

#[test]
fn test_interval_ordering() {
    let month = Interval::new(1, 0, 0);
    let days = Interval::new(0, 31, 0);
    assert!(days > month);
    assert_eq!(Interval::new(0, 30, 0), month);
}

#[test]
fn test_bbox_contains_every_instant() {
    let texts = [
        "{[1.5@2001-01-01, -2@2001-01-02), [7@2001-01-04, 3@2001-01-05]}",
        "{4@2001-01-01, 9@2001-01-03}",
        "(0@2001-01-01, 100@2001-01-02]",
    ];
    for text in texts {
        let temp = parse::<f64>(text);
        let bbox = temp.bbox();
        for inst in temp.instants() {
            assert!(f64::extent_contains(&bbox.extent, inst.value()));
            assert!(bbox.extent.contains_extent(&inst.value().extent()));
            assert!(bbox.period.lower() <= inst.timestamp() && inst.timestamp() <= bbox.period.upper());
        }
    }
}

#[test]
fn test_lifted_comparison_and_restriction_agree() {
    let temp = parse::<f64>("[0@2001-01-01, 10@2001-01-11]");
    let above = tcomp(&temp, &parse("[5@2001-01-01, 5@2001-01-11]"), CmpOp::Gt).unwrap();
    let periods = when_true(&above);
    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0].lower(), ts(6));
    assert!(!periods[0].lower_inc());

    let eq = teq_value(&temp, &5.0).unwrap();
    assert_eq!(when_true(&eq), temp.at_value(&5.0).unwrap().time());
}

#[test]
fn test_overlaps_time_matches_lift_success() {
    let a = parse::<i32>("{[1@2001-01-01, 1@2001-01-02], [2@2001-01-05, 2@2001-01-06]}");
    let b = parse::<i32>("[3@2001-01-03, 3@2001-01-04]");
    assert!(!overlaps_time(&a, &b));
    assert_eq!(teq(&a, &b), Err(TemporalError::DisjointTimeExtents));
}

#[test]
fn test_shift_and_duration() {
    let temp = parse::<i32>("{[1@2001-01-01, 1@2001-01-02), [2@2001-01-05, 2@2001-01-07]}");
    assert_eq!(temp.duration().unwrap(), Interval::days(3));
    let shifted = temp.shift(&Interval::months(1)).unwrap();
    assert_eq!(shifted.start_timestamp(), TimePoint::from_ymd_hms(2001, 2, 1, 0, 0, 0).unwrap());
    assert_eq!(shifted.duration().unwrap(), temp.duration().unwrap());
}

#[test]
fn test_restrictions() {
    let temp = parse::<f64>("[1@2001-01-01, 5@2001-01-05]");
    let period = Period::new(ts(2), ts(3), true, true).unwrap();
    let inside = temp.at_period(&period).unwrap();
    assert_eq!(inside.start_value(), &2.0);
    assert_eq!(inside.end_value(), &3.0);
    let outside = temp.minus_period(&period).unwrap();
    assert_eq!(outside.time().len(), 2);
    assert_eq!(temp.value_at(ts(4)), Some(4.0));
    assert_eq!(temp.value_at(ts(6)), None);
}

#[test]
fn test_arithmetic_pipeline() {
    let ints = parse::<i32>("[1@2001-01-01, 3@2001-01-02]");
    let floats = add_scalar(&ints, 1).unwrap().to_float();
    assert_eq!(floats.values(), vec![2.0, 4.0]);
    assert_eq!(floats.interpolation(), Some(Interpolation::Stepwise));
    assert!(derivative(&floats).is_err());

    let linear = parse::<f64>("[0@2001-01-01 00:00:00, 60@2001-01-01 00:01:00]");
    let rate = derivative(&linear).unwrap().unwrap();
    assert_eq!(rate.start_value(), &1.0);
}

/// Every value the temporal value takes, at its instants and halfway between
/// them, is found again by `ever_eq` and `at_value`.
fn assert_reaches_own_values<V: BaseValue>(text: &str) {
    let temp = parse::<V>(text);
    let stamps = temp.timestamps();
    let mut sample_times = stamps.clone();
    sample_times.extend(stamps.windows(2).map(|w| {
        TimePoint::from_micros(w[0].micros() + (w[1].micros() - w[0].micros()) / 2).unwrap()
    }));
    for t in sample_times {
        let Some(value) = temp.value_at(t) else {
            continue;
        };
        assert!(ever_eq(&temp, &value), "{} at {}", text, t);
        let hit = temp.at_value(&value).unwrap();
        let near = |s: TimePoint| s.micros().abs_diff(t.micros()) <= 1;
        assert!(
            hit.time().iter().any(|p| p.contains_timestamp(t) || near(p.lower())),
            "{} at {}",
            text,
            t
        );
    }
}

#[test]
fn test_value_at_is_reached_for_every_base_type() {
    assert_reaches_own_values::<bool>("[t@2001-01-01, f@2001-01-03, t@2001-01-05]");
    assert_reaches_own_values::<i32>("{[1@2001-01-01, 4@2001-01-02, 4@2001-01-03), [2@2001-01-05, 2@2001-01-07]}");
    assert_reaches_own_values::<f64>("[0@2001-01-01, 10@2001-01-03, -3@2001-01-04]");
    assert_reaches_own_values::<String>("{\"a\"@2001-01-01, \"b\"@2001-01-02}");
    assert_reaches_own_values::<GeomPoint>("[POINT(0 0)@2001-01-01, POINT(4 2)@2001-01-03]");
    assert_reaches_own_values::<GeomPoint3d>("[POINT Z(0 0 0)@2001-01-01, POINT Z(4 2 8)@2001-01-03]");
    assert_reaches_own_values::<GeogPoint>("[POINT(0 0)@2001-01-01, POINT(90 60)@2001-01-03]");
    assert_reaches_own_values::<GeogPoint>("[POINT(-40 70)@2001-01-01, POINT(40 70)@2001-01-02]");
}

#[test]
fn test_geodetic_value_found_mid_segment() {
    let temp = parse::<GeogPoint>("[POINT(0 0)@2001-01-01, POINT(90 60)@2001-01-03]");
    let mid = temp.value_at(ts(2)).unwrap();
    assert!(ever_eq(&temp, &mid));
    let hit = temp.at_value(&mid).unwrap();
    assert_eq!(hit.timestamps(), vec![ts(2)]);
    let rest = temp.minus_value(&mid).unwrap();
    assert_eq!(rest.time().len(), 2);
}
