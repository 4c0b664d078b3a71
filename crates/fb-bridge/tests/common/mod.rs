#![allow(dead_code)]

use fb_core::host::{
    FieldDef, FloatKind, HostRecord, HostTy, HostValue, IntKind, Method, RecordType, Signature,
};
use fb_core::value::{BoxedValue, Value};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `Point { X: i64, Y: i64 }` with methods `Norm1() -> i64` and
/// `Shift(dx: i64, dy: i64)`.
pub fn point_type() -> Rc<RecordType> {
    let point = RecordType::new(
        "Point",
        vec![
            FieldDef::new("X", HostTy::i64()),
            FieldDef::new("Y", HostTy::i64()),
        ],
    );
    point.define_method(
        "Norm1",
        Method::new(Signature::new(vec![], vec![HostTy::i64()]), |recv, _args| {
            let target = recv.borrow();
            let record = target.as_record().expect("receiver is a Point");
            let x = record.get("X").and_then(HostValue::as_i64).unwrap_or(0);
            let y = record.get("Y").and_then(HostValue::as_i64).unwrap_or(0);
            vec![HostValue::Int(x.abs() + y.abs())]
        }),
    );
    point.define_method(
        "Shift",
        Method::new(
            Signature::new(vec![HostTy::i64(), HostTy::i64()], vec![]),
            |recv, args| {
                let mut target = recv.borrow_mut();
                if let HostValue::Record(record) = &mut *target {
                    for (index, delta) in args.iter().enumerate() {
                        let current = record.at(index).and_then(HostValue::as_i64).unwrap_or(0);
                        let delta = delta.as_i64().unwrap_or(0);
                        record
                            .put(index, HostValue::Int(current + delta))
                            .expect("Point has two fields");
                    }
                }
                vec![]
            },
        ),
    );
    point
}

pub fn point(ty: &Rc<RecordType>, x: i64, y: i64) -> HostRecord {
    HostRecord::new(ty, vec![HostValue::Int(x), HostValue::Int(y)]).expect("valid point")
}

pub fn boxed_point(ty: &Rc<RecordType>, x: i64, y: i64) -> BoxedValue {
    BoxedValue::allocate(HostValue::Record(point(ty, x, y)), HostTy::Record(ty.clone()))
}

/// One field per supported scalar kind plus a string sequence.
pub fn sample_type() -> Rc<RecordType> {
    RecordType::new(
        "Sample",
        vec![
            FieldDef::new("Flag", HostTy::Bool),
            FieldDef::new("Small", HostTy::Int(IntKind::I8)),
            FieldDef::new("Count", HostTy::Int(IntKind::U32)),
            FieldDef::new("Big", HostTy::i64()),
            FieldDef::new("Ratio", HostTy::f64()),
            FieldDef::new("Single", HostTy::Float(FloatKind::F32)),
            FieldDef::new("Z", HostTy::c128()),
            FieldDef::new("Name", HostTy::Str),
            FieldDef::new("Tags", HostTy::seq(HostTy::Str)),
        ],
    )
}

/// `Segment { From: &Point, To: Point, Label: String }`.
pub fn segment_type(point: &Rc<RecordType>) -> Rc<RecordType> {
    RecordType::new(
        "Segment",
        vec![
            FieldDef::new("From", HostTy::Ref(point.clone())),
            FieldDef::new("To", HostTy::Record(point.clone())),
            FieldDef::new("Label", HostTy::Str),
        ],
    )
}

pub fn ints(values: &[i64]) -> Value {
    Value::vector(values.iter().copied().map(Value::int).collect())
}
