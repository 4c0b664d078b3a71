use crate::config::options;
use crate::host::{HostTy, RecordType};
use crate::{bail, Result};
use num_complex::Complex64;
use std::cell::RefCell;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

/// Shared handle to a host object. Cloning the handle aliases the object.
pub type HostRef = Rc<RefCell<HostValue>>;

pub fn host_ref(value: HostValue) -> HostRef {
    Rc::new(RefCell::new(value))
}

/// A value on the host side of the bridge.
#[derive(Debug, Clone)]
pub enum HostValue {
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Complex(Complex64),
    Str(String),
    Seq(Vec<HostValue>),
    Record(HostRecord),
    Ref(HostRef),
    /// Trailing error slot of a fallible host function; `None` means success.
    Error(Option<HostFault>),
}

impl HostValue {
    pub fn string(s: impl Into<String>) -> Self {
        HostValue::Str(s.into())
    }

    pub fn complex(re: f64, im: f64) -> Self {
        HostValue::Complex(Complex64::new(re, im))
    }

    /// The success marker for a fallible host function's error slot.
    pub const fn ok() -> Self {
        HostValue::Error(None)
    }

    pub fn fail(fault: impl Into<HostFault>) -> Self {
        HostValue::Error(Some(fault.into()))
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HostValue::Int(v) => Some(*v),
            HostValue::Uint(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HostValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&HostRecord> {
        match self {
            HostValue::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut HostRecord> {
        match self {
            HostValue::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Short kind name used in conversion errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            HostValue::Nil => "nil",
            HostValue::Bool(_) => "bool",
            HostValue::Int(_) => "int",
            HostValue::Uint(_) => "uint",
            HostValue::Float(_) => "float",
            HostValue::Complex(_) => "complex",
            HostValue::Str(_) => "string",
            HostValue::Seq(_) => "sequence",
            HostValue::Record(_) => "record",
            HostValue::Ref(_) => "reference",
            HostValue::Error(_) => "error",
        }
    }

    /// Whether this value can stand in a slot of type `ty` as-is.
    pub fn conforms_to(&self, ty: &HostTy) -> bool {
        match (self, ty) {
            (HostValue::Nil, HostTy::Ref(_) | HostTy::Map(..) | HostTy::Chan(_)) => true,
            (HostValue::Nil, HostTy::Interface(_)) => true,
            (HostValue::Bool(_), HostTy::Bool) => true,
            (HostValue::Int(v), HostTy::Int(kind)) => {
                !kind.is_unsigned() && kind.contains(*v as i128)
            }
            (HostValue::Uint(v), HostTy::Int(kind)) => {
                kind.is_unsigned() && kind.contains(*v as i128)
            }
            (HostValue::Float(_), HostTy::Float(_)) => true,
            (HostValue::Complex(_), HostTy::Complex(_)) => true,
            (HostValue::Str(_), HostTy::Str) => true,
            (HostValue::Seq(items), HostTy::Seq(elem)) => {
                items.iter().all(|item| item.conforms_to(elem))
            }
            (HostValue::Record(record), HostTy::Record(ty)) => Rc::ptr_eq(record.ty(), ty),
            (HostValue::Ref(handle), HostTy::Ref(ty)) => match handle.try_borrow() {
                Ok(target) => matches!(&*target, HostValue::Record(record) if Rc::ptr_eq(record.ty(), ty)),
                Err(_) => false,
            },
            (HostValue::Error(_), HostTy::Error) => true,
            _ => false,
        }
    }
}

impl Display for HostValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HostValue::Nil => write!(f, "nil"),
            HostValue::Bool(v) => write!(f, "{}", v),
            HostValue::Int(v) => write!(f, "{}", v),
            HostValue::Uint(v) => write!(f, "{}", v),
            HostValue::Float(v) => write!(f, "{}", v),
            HostValue::Complex(v) => write!(f, "{}", v),
            HostValue::Str(v) => write!(f, "{:?}", v),
            HostValue::Seq(items) => {
                let limit = options().display_limit;
                write!(f, "[")?;
                for (i, item) in items.iter().take(limit).enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                if items.len() > limit {
                    write!(f, ", …")?;
                }
                write!(f, "]")
            }
            HostValue::Record(record) => write!(f, "{}", record),
            HostValue::Ref(handle) => match handle.try_borrow() {
                Ok(target) => write!(f, "&{}", target),
                Err(_) => write!(f, "&<borrowed>"),
            },
            HostValue::Error(None) => write!(f, "nil"),
            HostValue::Error(Some(fault)) => write!(f, "{}", fault),
        }
    }
}

/// Record instance: a type and one value per declared field, in order.
#[derive(Debug, Clone)]
pub struct HostRecord {
    ty: Rc<RecordType>,
    fields: Vec<HostValue>,
}

impl HostRecord {
    /// Every field holds its type's zero value.
    pub fn zeroed(ty: &Rc<RecordType>) -> Self {
        Self {
            ty: ty.clone(),
            fields: ty.fields().iter().map(|field| field.ty.zero_value()).collect(),
        }
    }

    pub fn new(ty: &Rc<RecordType>, fields: Vec<HostValue>) -> Result<Self> {
        if fields.len() != ty.fields().len() {
            bail!(
                "record {} has {} fields, got {} values",
                ty.name(),
                ty.fields().len(),
                fields.len()
            );
        }
        for (def, value) in ty.fields().iter().zip(&fields) {
            if !value.conforms_to(&def.ty) {
                bail!(
                    "field {}.{} expects {}, got {}",
                    ty.name(),
                    def.name,
                    def.ty,
                    value.kind_name()
                );
            }
        }
        Ok(Self {
            ty: ty.clone(),
            fields,
        })
    }

    pub fn ty(&self) -> &Rc<RecordType> {
        &self.ty
    }

    pub fn values(&self) -> &[HostValue] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&HostValue> {
        self.ty.field_index(name).map(|index| &self.fields[index])
    }

    pub fn at(&self, index: usize) -> Option<&HostValue> {
        self.fields.get(index)
    }

    /// In-place access to a field. Writers must keep the declared type.
    pub fn at_mut(&mut self, index: usize) -> Option<&mut HostValue> {
        self.fields.get_mut(index)
    }

    /// Overwrite a field by position. The caller is responsible for having
    /// converted `value` to the field's declared type.
    pub fn put(&mut self, index: usize, value: HostValue) -> Result<()> {
        match self.fields.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => bail!("record {} has no field #{}", self.ty.name(), index),
        }
    }
}

impl Display for HostRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (def, value)) in self.ty.fields().iter().zip(&self.fields).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", def.name, value)?;
        }
        write!(f, "}}")
    }
}

/// Failure reported by a host function through its trailing error slot.
/// Cloning shares the underlying report.
#[derive(Clone)]
pub struct HostFault(Rc<eyre::Report>);

impl HostFault {
    pub fn new<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(Rc::new(eyre::Report::new(error)))
    }

    pub fn msg<M>(message: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Self(Rc::new(eyre::Report::msg(message)))
    }

    pub fn report(&self) -> &eyre::Report {
        &self.0
    }

    pub fn ptr_eq(&self, other: &HostFault) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<eyre::Report> for HostFault {
    fn from(report: eyre::Report) -> Self {
        Self(Rc::new(report))
    }
}

impl From<&'static str> for HostFault {
    fn from(message: &'static str) -> Self {
        Self::msg(message)
    }
}

impl From<String> for HostFault {
    fn from(message: String) -> Self {
        Self::msg(message)
    }
}

impl Display for HostFault {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for HostFault {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "HostFault({:?})", self.0.to_string())
    }
}
