use pretty_assertions::assert_eq;

use super::*;

#[test]
fn parses_every_kind() {
    let cases = [
        (TemporalKind::Date, "2021-03-04", "date{2021-03-04}"),
        (TemporalKind::YearMonth, "2021-03", "dateym{2021-03}"),
        (TemporalKind::Time, "12:30", "time{12:30}"),
        (TemporalKind::Time, "12:30:15.5", "time{12:30:15.500}"),
        (
            TemporalKind::DateTime,
            "2021-03-04 12:30:01",
            "datetime{2021-03-04 12:30:01}",
        ),
        (
            TemporalKind::DateTimeZoned,
            "2021-03-04 12:30 +01:00",
            "datetimezoned{2021-03-04 12:30 +01:00}",
        ),
    ];
    for (kind, content, rendered) in cases {
        let value = Temporal::parse(kind, content).unwrap();
        assert_eq!(value.kind(), kind);
        assert_eq!(value.to_string(), rendered);
    }
}

#[test]
fn rejects_bad_content() {
    let err = Temporal::parse(TemporalKind::Date, "2021-13-01").unwrap_err();
    assert_eq!(err.to_string(), "`2021-13-01` is not a valid Date");
    assert!(Temporal::parse(TemporalKind::Time, "25:00").is_err());
}

#[test]
fn compares_within_a_kind_only() {
    let a = Temporal::parse(TemporalKind::Date, "2021-03-04").unwrap();
    let b = Temporal::parse(TemporalKind::Date, "2022-01-01").unwrap();
    let t = Temporal::parse(TemporalKind::Time, "10:00").unwrap();
    assert_eq!(a.compare(&b), Some(Ordering::Less));
    assert_eq!(a.compare(&t), None);
}

#[test]
fn zoned_values_compare_as_instants() {
    let a = Temporal::parse(TemporalKind::DateTimeZoned, "2021-03-04 12:00 +01:00").unwrap();
    let b = Temporal::parse(TemporalKind::DateTimeZoned, "2021-03-04 11:30 +00:00").unwrap();
    assert_eq!(a.compare(&b), Some(Ordering::Less));
}
