use msipl::mach::{Arena, DataKind, Val};

fn convert(kind: DataKind, val: &Val) -> Option<Val> {
    kind.convert(val, &Arena::new()).ok()
}

#[test]
fn test_int_through_float() {
    let samples = vec![
        Val::Int(0),
        Val::Int(-7),
        Val::Int(1 << 52),
        Val::Float(2.75),
        Val::Float(-2.75),
        Val::Float(1e15),
        Val::Bool(true),
        Val::Bool(false),
        Val::Str("12".into()),
        Val::Str(" 4.5 ".into()),
    ];
    for val in &samples {
        let direct = convert(DataKind::Int, val);
        let via_float = convert(DataKind::Float, val).and_then(|f| convert(DataKind::Int, &f));
        assert_eq!(direct, via_float, "{:?}", val);
        assert!(direct.is_some(), "{:?}", val);
    }
}

#[test]
fn test_truncates_toward_zero() {
    assert_eq!(convert(DataKind::Int, &Val::Float(2.9)), Some(Val::Int(2)));
    assert_eq!(convert(DataKind::Int, &Val::Float(-2.9)), Some(Val::Int(-2)));
}

#[test]
fn test_failures() {
    assert_eq!(convert(DataKind::Int, &Val::Float(f64::NAN)), None);
    assert_eq!(convert(DataKind::Int, &Val::Float(1e300)), None);
    assert_eq!(convert(DataKind::Bool, &Val::Str("yes".into())), None);
    assert_eq!(convert(DataKind::PartRef, &Val::Int(0)), None);
    assert_eq!(convert(DataKind::Label, &Val::Int(-1)), None);
}

#[test]
fn test_bool_rendering() {
    assert_eq!(convert(DataKind::Bool, &Val::Int(2)), Some(Val::Bool(true)));
    assert_eq!(convert(DataKind::Bool, &Val::Str("TRUE".into())), Some(Val::Bool(true)));
    assert_eq!(Val::Bool(true).render(), "1");
    assert_eq!(Val::Float(3.0).render(), "3");
    assert_eq!(Val::Float(0.25).render(), "0.25");
}
