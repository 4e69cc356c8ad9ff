use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

#[test]
fn parse_numeric_decides_by_dot() {
    assert_eq!(Literal::parse_numeric("3"), Some(Literal::int(3)));
    assert_eq!(Literal::parse_numeric("3.5"), Some(Literal::double(3.5)));
    assert_eq!(Literal::parse_numeric("1e3"), Some(Literal::double(1000.0)));
    assert_eq!(
        Literal::parse_numeric("4294967296"),
        Some(Literal::long(4_294_967_296))
    );
    assert_eq!(Literal::parse_numeric(" 3"), None);
    assert_eq!(Literal::parse_numeric("three"), None);
    assert_eq!(Literal::parse_numeric(""), None);
}

#[test]
fn parse_boolean_ignores_case() {
    assert_eq!(Literal::parse_boolean("TRUE"), Some(true));
    assert_eq!(Literal::parse_boolean("False"), Some(false));
    assert_eq!(Literal::parse_boolean("yes"), None);
}

#[test]
fn numeric_view_of_strings() {
    assert_eq!(Literal::string("12").numeric_view(), Some(Literal::int(12)));
    assert_eq!(
        Literal::string("true").numeric_view(),
        Some(Literal::Boolean(true))
    );
    assert_eq!(Literal::string("abc").numeric_view(), None);
    assert_eq!(Literal::long(7).numeric_view(), Some(Literal::long(7)));
}

#[test]
fn ranks_follow_kinds() {
    assert_eq!(Literal::Boolean(true).rank(), Some(NumRank::Boolean));
    assert_eq!(Literal::int(1).rank(), Some(NumRank::Int));
    assert_eq!(Literal::long(1).rank(), Some(NumRank::Long));
    assert_eq!(Literal::float(1.0).rank(), Some(NumRank::Float));
    assert_eq!(Literal::double(1.0).rank(), Some(NumRank::Double));
    assert_eq!(Literal::Null.rank(), None);
    assert_eq!(Literal::string("1").rank(), None);
}

#[test]
fn promote_unranked_is_int() {
    assert_eq!(NumRank::promote(None, None), NumRank::Int);
    assert_eq!(NumRank::promote(Some(NumRank::Long), None), NumRank::Long);
    assert_eq!(
        NumRank::promote(Some(NumRank::Boolean), Some(NumRank::Int)),
        NumRank::Int
    );
}

#[test]
fn display_matches_host_formatting() {
    assert_eq!(Literal::double(1.0).to_string(), "1.0");
    assert_eq!(Literal::double(0.25).to_string(), "0.25");
    assert_eq!(Literal::double(1e10).to_string(), "1.0E10");
    assert_eq!(Literal::double(1.5e-5).to_string(), "1.5E-5");
    assert_eq!(Literal::float(2.5).to_string(), "2.5");
    assert_eq!(Literal::double(f64::NAN).to_string(), "NaN");
    assert_eq!(Literal::double(f64::NEG_INFINITY).to_string(), "-Infinity");
    assert_eq!(Literal::long(-3).to_string(), "-3");
}

fn any_rank() -> impl Strategy<Value = NumRank> {
    prop_oneof![
        Just(NumRank::Boolean),
        Just(NumRank::Int),
        Just(NumRank::Long),
        Just(NumRank::Float),
        Just(NumRank::Double),
    ]
}

proptest! {
    #[test]
    fn promote_picks_higher_rank(a in any_rank(), b in any_rank()) {
        let common = NumRank::promote(Some(a), Some(b));
        prop_assert!(common >= a && common >= b);
        prop_assert!(common == a || common == b);
        prop_assert_eq!(common, NumRank::promote(Some(b), Some(a)));
    }

    #[test]
    fn integer_text_round_trips(v in any::<i64>()) {
        let lit = Literal::parse_numeric(&v.to_string());
        prop_assert_eq!(lit.and_then(|l| l.as_i64()), Some(v));
    }
}
