use super::*;

#[test]
fn phases_are_totally_ordered() {
    for pair in ResolvePhase::ALL.windows(2) {
        assert!(pair[0] < pair[1]);
        assert_eq!(pair[0].next(), Some(pair[1]));
        assert_eq!(pair[1].prev(), Some(pair[0]));
    }
}

#[test]
fn ends_have_no_neighbours() {
    assert_eq!(ResolvePhase::RawFir.prev(), None);
    assert_eq!(ResolvePhase::BodyResolve.next(), None);
    assert_eq!(ResolvePhase::default(), ResolvePhase::RawFir);
}

#[test]
fn display_uses_upper_snake_case() {
    assert_eq!(
        ResolvePhase::ImplicitTypesBodyResolve.to_string(),
        "IMPLICIT_TYPES_BODY_RESOLVE"
    );
}
