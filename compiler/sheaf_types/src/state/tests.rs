use pretty_assertions::assert_eq;

use super::*;
use crate::UnitTerm;

#[test]
fn add_is_persistent() {
    let empty = TypeState::new();
    let one = empty.add("x", TypeTerm::Text).unwrap();
    assert!(empty.find("x").is_none());
    assert_eq!(one.find("x"), Some(&[TypeTerm::Text][..]));
}

#[test]
fn duplicates_fail_except_for_wildcard_names() {
    let state = TypeState::new().add("x", TypeTerm::Text).unwrap();
    assert_eq!(
        state.add("x", TypeTerm::Boolean),
        Err(DuplicateVariable("x".into()))
    );
    let state = state.add("_tmp", TypeTerm::Text).unwrap();
    let state = state.add("_tmp", TypeTerm::Boolean).unwrap();
    assert_eq!(state.find("_tmp"), Some(&[TypeTerm::Boolean][..]));
}

#[test]
fn union_merges_disjoint_branches() {
    let base = TypeState::new().add("a", TypeTerm::Text).unwrap();
    let left = base.add("x", TypeTerm::SCALAR).unwrap();
    let right = base.add("y", TypeTerm::Boolean).unwrap();
    let merged = TypeState::union(&base, &[left, right]).unwrap();
    let mut names: Vec<_> = merged.names().collect();
    names.sort_unstable();
    assert_eq!(names, vec!["a", "x", "y"]);
}

#[test]
fn union_rejects_a_name_bound_twice() {
    let base = TypeState::new();
    let left = base.add("x", TypeTerm::SCALAR).unwrap();
    let right = base.add("x", TypeTerm::SCALAR).unwrap();
    assert_eq!(
        TypeState::union(&base, &[left, right]),
        Err(DuplicateVariable("x".into()))
    );
}

#[test]
fn intersect_requires_every_alternative_to_bind_the_name() {
    let base = TypeState::new();
    let left = base.add("x", TypeTerm::SCALAR).unwrap();
    let right = base.clone();
    let mut unifier = Unifier::new();
    assert_eq!(
        TypeState::intersect(&base, &[left, right], &mut unifier),
        Err(IntersectError::OnlyInSome { name: "x".into() })
    );
}

#[test]
fn intersect_keeps_and_unifies_candidates() {
    let mut unifier = Unifier::new();
    let unit = unifier.fresh_unit();
    let base = TypeState::new();
    let left = base.add("x", TypeTerm::Number(unit.clone())).unwrap();
    let right = base.add("x", TypeTerm::Number(UnitTerm::named("m"))).unwrap();
    let merged = TypeState::intersect(&base, &[left, right], &mut unifier).unwrap();
    assert_eq!(merged.find("x").map(<[_]>::len), Some(2));
    assert_eq!(unifier.resolve_unit(&unit).to_string(), "m");
}

#[test]
fn intersect_reports_conflicting_candidates() {
    let mut unifier = Unifier::new();
    let base = TypeState::new();
    let left = base.add("x", TypeTerm::Text).unwrap();
    let right = base.add("x", TypeTerm::Boolean).unwrap();
    let err = TypeState::intersect(&base, &[left, right], &mut unifier).unwrap_err();
    assert!(matches!(err, IntersectError::Mismatch { ref name, .. } if name == "x"));
}
