use fb_core::host::{
    FieldDef, FloatKind, HostFault, HostRecord, HostTy, HostValue, IntKind, RecordType, Signature,
};
use fb_core::error::Error;
use pretty_assertions::assert_eq;
use std::rc::Rc;

fn pair_type() -> Rc<RecordType> {
    RecordType::new(
        "Pair",
        vec![
            FieldDef::new("Key", HostTy::Str),
            FieldDef::new("Value", HostTy::Int(IntKind::U8)),
        ],
    )
}

#[test]
fn host_types_display_like_declarations() {
    let pair = pair_type();
    let cases = [
        (HostTy::Bool, "bool"),
        (HostTy::Int(IntKind::I32), "i32"),
        (HostTy::Float(FloatKind::F32), "f32"),
        (HostTy::c128(), "Complex<f64>"),
        (HostTy::seq(HostTy::seq(HostTy::Str)), "Vec<Vec<String>>"),
        (HostTy::Record(pair.clone()), "Pair"),
        (HostTy::Ref(pair), "&Pair"),
        (
            HostTy::Map(Box::new(HostTy::Str), Box::new(HostTy::i64())),
            "HashMap<String, i64>",
        ),
        (HostTy::Chan(Box::new(HostTy::f64())), "Receiver<f64>"),
        (HostTy::Interface("Reader".into()), "dyn Reader"),
        (HostTy::Error, "error"),
    ];
    for (ty, expected) in cases {
        assert_eq!(ty.to_string(), expected);
    }
}

#[test]
fn signatures_display_params_and_returns() {
    let cases = [
        (Signature::new(vec![], vec![]), "fn()"),
        (
            Signature::new(vec![HostTy::i64()], vec![HostTy::Str]),
            "fn(i64) -> String",
        ),
        (
            Signature::fallible(vec![HostTy::i64(), HostTy::f64()], vec![HostTy::i64()]),
            "fn(i64, f64) -> (i64, error)",
        ),
        (Signature::fallible(vec![], vec![]), "fn() -> error"),
    ];
    for (sig, expected) in cases {
        assert_eq!(sig.to_string(), expected);
    }
}

#[test]
fn fallible_signatures_have_an_extra_output_slot() {
    let sig = Signature::fallible(vec![HostTy::i64()], vec![HostTy::i64(), HostTy::Str]);
    assert_eq!(sig.arity(), 1);
    assert_eq!(sig.output_slots(), 3);
    assert_eq!(Signature::new(vec![], vec![HostTy::Str]).output_slots(), 1);
}

#[test]
fn record_types_compare_by_identity() {
    let a = pair_type();
    let b = pair_type();
    assert_eq!(HostTy::Record(a.clone()), HostTy::Record(a.clone()));
    assert_ne!(HostTy::Record(a.clone()), HostTy::Record(b));
    assert_ne!(HostTy::Record(a.clone()), HostTy::Ref(a));
    assert_eq!(HostTy::seq(HostTy::i64()), HostTy::seq(HostTy::i64()));
}

#[test]
fn only_concrete_types_are_constructible() {
    assert!(HostTy::Str.is_constructible());
    assert!(HostTy::Record(pair_type()).is_constructible());
    assert!(HostTy::Ref(pair_type()).is_constructible());
    assert!(!HostTy::Interface("Reader".into()).is_constructible());
    assert!(!HostTy::Chan(Box::new(HostTy::i64())).is_constructible());
    assert!(!HostTy::Error.is_constructible());
}

#[test]
fn zero_values_match_their_kind() {
    assert!(matches!(HostTy::Bool.zero_value(), HostValue::Bool(false)));
    assert!(matches!(HostTy::Int(IntKind::U8).zero_value(), HostValue::Uint(0)));
    assert!(matches!(HostTy::i64().zero_value(), HostValue::Int(0)));
    assert!(matches!(HostTy::Ref(pair_type()).zero_value(), HostValue::Nil));
    assert!(matches!(HostTy::Error.zero_value(), HostValue::Error(None)));
    let HostValue::Record(record) = HostTy::Record(pair_type()).zero_value() else {
        panic!("expected a record");
    };
    assert_eq!(record.to_string(), r#"{Key: "", Value: 0}"#);
}

#[test]
fn values_conform_to_their_declared_range() {
    assert!(HostValue::Uint(255).conforms_to(&HostTy::Int(IntKind::U8)));
    assert!(!HostValue::Uint(256).conforms_to(&HostTy::Int(IntKind::U8)));
    assert!(!HostValue::Int(1).conforms_to(&HostTy::Int(IntKind::U8)));
    assert!(HostValue::Int(-1).conforms_to(&HostTy::Int(IntKind::I8)));
    assert!(HostValue::Nil.conforms_to(&HostTy::Ref(pair_type())));
    assert!(!HostValue::Nil.conforms_to(&HostTy::Str));
    let strings = HostValue::Seq(vec![HostValue::string("a"), HostValue::Int(1)]);
    assert!(!strings.conforms_to(&HostTy::seq(HostTy::Str)));
}

#[test]
fn record_construction_validates_fields() {
    let pair = pair_type();
    let ok = HostRecord::new(&pair, vec![HostValue::string("k"), HostValue::Uint(7)]);
    assert_eq!(ok.expect("valid pair").get("Value").and_then(HostValue::as_i64), Some(7));

    let short = HostRecord::new(&pair, vec![HostValue::string("k")]).unwrap_err();
    assert_eq!(short.to_string(), "record Pair has 2 fields, got 1 values");

    let wrong = HostRecord::new(&pair, vec![HostValue::Int(1), HostValue::Uint(7)]).unwrap_err();
    assert_eq!(wrong.to_string(), "field Pair.Key expects String, got int");
}

#[test]
fn record_put_rejects_missing_positions() {
    let mut record = HostRecord::zeroed(&pair_type());
    assert!(record.put(1, HostValue::Uint(3)).is_ok());
    assert_eq!(record.at(1).and_then(HostValue::as_i64), Some(3));
    assert!(matches!(
        record.put(2, HostValue::Uint(3)),
        Err(Error::Generic(_))
    ));
}

#[test]
fn methods_can_be_attached_after_the_type_exists() {
    let pair = pair_type();
    assert!(pair.method("Swap").is_none());
    let this = HostTy::Ref(pair.clone());
    pair.define_method(
        "Clone",
        fb_core::host::Method::new(Signature::new(vec![], vec![this]), |recv, _| {
            vec![HostValue::Ref(recv.clone())]
        }),
    );
    assert_eq!(pair.method_names(), vec!["Clone".to_string()]);
    let method = pair.method("Clone").expect("method defined");
    assert_eq!(method.sig.to_string(), "fn() -> &Pair");
}

#[test]
fn host_values_display_their_contents() {
    assert_eq!(HostValue::string("hi").to_string(), r#""hi""#);
    assert_eq!(
        HostValue::Seq(vec![HostValue::Int(1), HostValue::Int(2)]).to_string(),
        "[1, 2]"
    );
    assert_eq!(HostValue::Nil.to_string(), "nil");
    assert_eq!(HostValue::fail("boom").to_string(), "boom");
}

#[test]
fn faults_share_their_report() {
    let fault = HostFault::msg("permission denied");
    let copy = fault.clone();
    assert!(fault.ptr_eq(&copy));
    assert!(!fault.ptr_eq(&HostFault::msg("permission denied")));
    assert_eq!(copy.report().to_string(), "permission denied");
    let err: Error = fault.into();
    assert_eq!(err.to_string(), "permission denied");
}
