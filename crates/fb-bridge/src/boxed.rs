//! Field and method access on boxed host objects.

use crate::callable::Callable;
use crate::convert::{export, import};
use fb_core::error::Error;
use fb_core::host::{HostTy, HostValue};
use fb_core::value::{BoxedValue, Value};
use fb_core::Result;
use std::borrow::Cow;

/// Reflection over a boxed host object. Names are matched after
/// [`exported_name`] normalization.
pub trait Reflect {
    /// Declared field names in order; empty for non-record objects.
    fn fields(&self) -> Vec<String>;
    /// A bound method, a converted field value, or `None` if the name is
    /// neither. A record field held by value comes back as a box addressing
    /// it inside this object.
    fn field(&self, name: &str) -> Result<Option<Value>>;
    /// Convert `value` to the field's type and write it in place.
    fn set(&self, name: &str, value: &Value) -> Result<()>;
}

/// Host members are exported with a leading capital; `x` refers to `X`.
pub fn exported_name(name: &str) -> Cow<'_, str> {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => {
            Cow::Owned(first.to_uppercase().chain(chars).collect())
        }
        _ => Cow::Borrowed(name),
    }
}

impl Reflect for BoxedValue {
    fn fields(&self) -> Vec<String> {
        match self.record_type() {
            Some(record) => record.fields().iter().map(|f| f.name.clone()).collect(),
            None => Vec::new(),
        }
    }

    fn field(&self, name: &str) -> Result<Option<Value>> {
        let Some(record) = self.record_type() else {
            return Ok(None);
        };
        let name = exported_name(name);

        if let Some(method) = record.method(&name) {
            let bound = Callable::bind(
                format!("{}.{}", record.name(), name),
                method,
                self.clone(),
            );
            return Ok(Some(Value::function(bound)));
        }

        let Some(index) = record.field_index(&name) else {
            return Ok(None);
        };
        let field_ty = &record.fields()[index].ty;
        // a record held by value is addressed in place, so writes through it
        // reach this object
        if let HostTy::Record(_) = field_ty {
            return Ok(Some(Value::Boxed(self.project(index, field_ty.clone()))));
        }
        let current = match &*self.borrow()? {
            HostValue::Record(instance) => instance.at(index).cloned(),
            _ => None,
        };
        match current {
            Some(value) => import(value, field_ty).map(Some),
            None => Err(Error::NotARecord {
                ty: self.ty().to_string(),
            }),
        }
    }

    fn set(&self, name: &str, value: &Value) -> Result<()> {
        let Some(record) = self.record_type() else {
            return Err(Error::NotARecord {
                ty: self.ty().to_string(),
            });
        };
        let name = exported_name(name);
        let index = record
            .field_index(&name)
            .ok_or_else(|| Error::NoSuchField {
                name: name.to_string(),
            })?;

        // `value` may alias this object, so convert before taking the write borrow.
        let converted = export(value, &record.fields()[index].ty)?;
        let mut target = self.borrow_mut()?;
        match &mut *target {
            HostValue::Record(instance) => instance.put(index, converted),
            _ => Err(Error::NotARecord {
                ty: self.ty().to_string(),
            }),
        }
    }
}
