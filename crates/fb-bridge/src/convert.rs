//! Conversion between interpreter values and host values.
//!
//! The two directions are not inverse for records: exporting a
//! record needs an existing boxed host object, while importing one always
//! yields a boxed reference.

use fb_core::error::Error;
use fb_core::host::{FloatKind, HostTy, HostValue, IntKind, RecordType};
use fb_core::value::{BoxedValue, Scalar, Value};
use fb_core::{Complex64, Result};
use std::rc::Rc;

/// Convert an interpreter value into a host value of type `ty`.
pub fn export(value: &Value, ty: &HostTy) -> Result<HostValue> {
    if let Value::Any(any) = value {
        if let Some(host) = any.export() {
            let kind = host.kind_name();
            if let Some(host) = coerce(host, ty) {
                return Ok(host);
            }
            fb_core::trace!(
                "{} exported a {}, which does not fit {}",
                any.type_name(),
                kind,
                ty
            );
        }
    }

    match ty {
        HostTy::Bool => match value {
            Value::Scalar(Scalar::Int(0)) => Ok(HostValue::Bool(false)),
            Value::Scalar(Scalar::Int(1)) => Ok(HostValue::Bool(true)),
            Value::Scalar(Scalar::Int(v)) => Err(Error::conversion(format!("integer {}", v), ty)),
            _ => Err(Error::conversion(value.describe(), ty)),
        },
        HostTy::Int(kind) => match value {
            Value::Scalar(Scalar::Int(v)) => export_int(*v, *kind),
            _ => Err(Error::conversion(value.describe(), ty)),
        },
        HostTy::Float(kind) => match value {
            Value::Scalar(Scalar::Float(v)) => Ok(HostValue::Float(kind.narrow(*v))),
            _ => Err(Error::conversion(value.describe(), ty)),
        },
        HostTy::Complex(kind) => match value {
            Value::Scalar(Scalar::Complex(v)) => Ok(HostValue::Complex(narrow_complex(*kind, *v))),
            _ => Err(Error::conversion(value.describe(), ty)),
        },
        HostTy::Str => match value {
            Value::Scalar(Scalar::Str(s)) => Ok(HostValue::Str(s.clone())),
            _ => Err(Error::conversion(value.describe(), ty)),
        },
        HostTy::Seq(elem) => export_seq(value, elem, ty),
        HostTy::Record(record) => export_record(value, record),
        HostTy::Ref(record) => export_ref(value, record, ty),
        HostTy::Map(..) | HostTy::Chan(_) | HostTy::Interface(_) | HostTy::Error => {
            Err(Error::unsupported(ty))
        }
    }
}

fn export_int(value: i64, kind: IntKind) -> Result<HostValue> {
    if !kind.contains(value as i128) {
        return Err(Error::conversion(format!("integer {}", value), kind));
    }
    if kind.is_unsigned() {
        Ok(HostValue::Uint(value as u64))
    } else {
        Ok(HostValue::Int(value))
    }
}

/// Fit a host value produced by an [`Exportable`] into `ty` under the same
/// range checks and rounding as scalar export.
///
/// [`Exportable`]: fb_core::value::Exportable
fn coerce(host: HostValue, ty: &HostTy) -> Option<HostValue> {
    match (host, ty) {
        (HostValue::Int(v), HostTy::Int(kind)) => export_int(v, *kind).ok(),
        (HostValue::Uint(v), HostTy::Int(kind)) => {
            let wide = i128::from(v);
            kind.contains(wide).then(|| {
                if kind.is_unsigned() {
                    HostValue::Uint(v)
                } else {
                    HostValue::Int(wide as i64)
                }
            })
        }
        (HostValue::Float(v), HostTy::Float(kind)) => Some(HostValue::Float(kind.narrow(v))),
        (HostValue::Complex(v), HostTy::Complex(kind)) => {
            Some(HostValue::Complex(narrow_complex(*kind, v)))
        }
        (HostValue::Seq(items), HostTy::Seq(elem)) => items
            .into_iter()
            .map(|item| coerce(item, elem))
            .collect::<Option<Vec<_>>>()
            .map(HostValue::Seq),
        (host, ty) => host.conforms_to(ty).then_some(host),
    }
}

fn narrow_complex(kind: FloatKind, value: Complex64) -> Complex64 {
    Complex64::new(kind.narrow(value.re), kind.narrow(value.im))
}

fn export_seq(value: &Value, elem: &HostTy, ty: &HostTy) -> Result<HostValue> {
    let Value::Array(array) = value else {
        return Err(Error::conversion(value.describe(), ty));
    };
    array
        .values()
        .iter()
        .enumerate()
        .map(|(index, item)| export(item, elem).map_err(|err| Error::element(index, err)))
        .collect::<Result<Vec<_>>>()
        .map(HostValue::Seq)
}

/// A boxed record satisfies a by-value target through one dereference: the
/// host receives a copy of the referenced record.
fn export_record(value: &Value, record: &Rc<RecordType>) -> Result<HostValue> {
    let want = || format!("record {}", record.name());
    let Value::Boxed(boxed) = value else {
        return Err(Error::conversion(value.describe(), want()));
    };
    let target = boxed.borrow()?;
    match &*target {
        HostValue::Record(instance) if Rc::ptr_eq(instance.ty(), record) => {
            Ok(HostValue::Record(instance.clone()))
        }
        _ => Err(Error::conversion(value.describe(), want())),
    }
}

/// A reference target aliases the boxed object itself. The empty value is the
/// nil reference.
fn export_ref(value: &Value, record: &Rc<RecordType>, ty: &HostTy) -> Result<HostValue> {
    match value {
        // a record nested by value has no handle a reference could share
        Value::Boxed(boxed) if boxed.is_projection() => Err(Error::conversion(
            format!("{} held in a record field", value.describe()),
            ty,
        )),
        Value::Boxed(boxed) => {
            let matches = matches!(
                &*boxed.borrow()?,
                HostValue::Record(instance) if Rc::ptr_eq(instance.ty(), record)
            );
            if matches {
                Ok(HostValue::Ref(boxed.handle().clone()))
            } else {
                Err(Error::conversion(value.describe(), ty))
            }
        }
        other if other.is_empty() => Ok(HostValue::Nil),
        other => Err(Error::conversion(other.describe(), ty)),
    }
}

/// Convert a host value declared as `ty` into an interpreter value.
pub fn import(value: HostValue, ty: &HostTy) -> Result<Value> {
    match (ty, value) {
        (HostTy::Bool, HostValue::Bool(b)) => Ok(Value::int(i64::from(b))),
        (HostTy::Int(_), HostValue::Int(v)) => Ok(Value::int(v)),
        (HostTy::Int(_), HostValue::Uint(v)) => i64::try_from(v)
            .map(Value::int)
            .map_err(|_| Error::conversion(format!("unsigned {}", v), "integer")),
        (HostTy::Float(_), HostValue::Float(v)) => Ok(Value::float(v)),
        (HostTy::Complex(_), HostValue::Complex(v)) => Ok(Value::Scalar(Scalar::Complex(v))),
        (HostTy::Str, HostValue::Str(s)) => Ok(Value::string(s)),
        (HostTy::Seq(elem), HostValue::Seq(items)) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| import(item, elem).map_err(|err| Error::element(index, err)))
            .collect::<Result<Vec<_>>>()
            .map(Value::vector),
        (HostTy::Record(record), HostValue::Record(instance))
            if Rc::ptr_eq(instance.ty(), record) =>
        {
            let boxed =
                BoxedValue::allocate(HostValue::Record(instance), HostTy::Record(record.clone()));
            Ok(Value::Boxed(boxed))
        }
        (HostTy::Ref(record), HostValue::Ref(handle)) => {
            let matches = handle.try_borrow().is_ok_and(|target| {
                matches!(&*target, HostValue::Record(instance) if Rc::ptr_eq(instance.ty(), record))
            });
            if !matches {
                return Err(Error::conversion("reference", ty));
            }
            Ok(Value::Boxed(BoxedValue::new(
                handle,
                HostTy::Record(record.clone()),
            )))
        }
        (HostTy::Ref(_), HostValue::Nil) => Ok(Value::empty()),
        (HostTy::Map(..) | HostTy::Chan(_) | HostTy::Interface(_) | HostTy::Error, _) => {
            Err(Error::unsupported(ty))
        }
        (ty, value) => Err(Error::conversion(format!("host {}", value.kind_name()), ty)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_integer_targets_reject_out_of_range() {
        assert!(export_int(255, IntKind::U8).is_ok());
        assert!(matches!(
            export_int(256, IntKind::U8),
            Err(Error::Conversion { .. })
        ));
        assert!(matches!(
            export_int(-1, IntKind::U64),
            Err(Error::Conversion { .. })
        ));
    }

    #[test]
    fn coercion_maps_between_signed_and_unsigned_storage() {
        assert!(matches!(
            coerce(HostValue::Int(7), &HostTy::Int(IntKind::U16)),
            Some(HostValue::Uint(7))
        ));
        assert!(matches!(
            coerce(HostValue::Uint(7), &HostTy::Int(IntKind::I8)),
            Some(HostValue::Int(7))
        ));
        assert!(coerce(HostValue::Uint(u64::MAX), &HostTy::i64()).is_none());
        assert!(coerce(HostValue::Int(1), &HostTy::f64()).is_none());
    }

    #[test]
    fn single_precision_complex_rounds_both_parts() {
        let narrowed = narrow_complex(FloatKind::F32, Complex64::new(0.1, 0.2));
        assert_eq!(narrowed.re, 0.1f32 as f64);
        assert_eq!(narrowed.im, 0.2f32 as f64);
    }
}
