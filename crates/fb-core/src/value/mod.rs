//! Dynamic value model of the interpreter, as seen by the bridge.

mod array;
mod boxed;
mod function;

pub use array::*;
pub use boxed::*;
pub use function::*;

use crate::utils::to_json::ToJson;
use crate::{bail, Result};
use derive_more::From;
use num_complex::Complex64;
use serde_json::json;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, From)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Complex(Complex64),
    Str(String),
}

impl Scalar {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Scalar::Int(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Complex(_) => "complex",
            Scalar::Str(_) => "string",
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Complex(v) => write!(f, "{}", v),
            Scalar::Str(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone, From)]
pub enum Value {
    Scalar(Scalar),
    Array(ValueArray),
    List(ValueList),
    Boxed(BoxedValue),
    Function(ValueFunction),
    Any(ValueAny),
}

impl Value {
    pub fn int(i: i64) -> Value {
        Value::Scalar(Scalar::Int(i))
    }
    pub fn float(f: f64) -> Value {
        Value::Scalar(Scalar::Float(f))
    }
    pub fn complex(re: f64, im: f64) -> Value {
        Value::Scalar(Scalar::Complex(Complex64::new(re, im)))
    }
    pub fn string(s: impl Into<String>) -> Value {
        Value::Scalar(Scalar::Str(s.into()))
    }
    /// Rank-1 array.
    pub fn vector(values: Vec<Value>) -> Value {
        Value::Array(ValueArray::vector(values))
    }
    pub fn array(shape: Vec<usize>, values: Vec<Value>) -> Result<Value> {
        Ok(Value::Array(ValueArray::new(shape, values)?))
    }
    pub fn list(values: Vec<Value>) -> Value {
        Value::List(ValueList::new(values))
    }
    /// The explicit empty result: a rank-1 array of length zero.
    pub fn empty() -> Value {
        Value::Array(ValueArray::empty())
    }
    pub fn function(function: impl Function + 'static) -> Value {
        Value::Function(ValueFunction::new(function))
    }
    pub fn any(any: impl Exportable + 'static) -> Value {
        Value::Any(ValueAny::new(any))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Array(array) if array.size() == 0)
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_boxed(&self) -> Option<&BoxedValue> {
        match self {
            Value::Boxed(boxed) => Some(boxed),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&ValueFunction> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Describes the value's kind for conversion errors.
    pub fn describe(&self) -> String {
        match self {
            Value::Scalar(scalar) => scalar.kind_name().to_string(),
            Value::Array(array) if array.rank() == 1 => "vector".to_string(),
            Value::Array(array) => format!("rank-{} array", array.rank()),
            Value::List(_) => "list".to_string(),
            Value::Boxed(boxed) => format!("boxed {}", boxed.ty()),
            Value::Function(_) => "function".to_string(),
            Value::Any(any) => any.type_name().to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Boxed(a), Value::Boxed(b)) => a.same_object(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Any(a), Value::Any(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Scalar(scalar) => write!(f, "{}", scalar),
            Value::Array(array) => write!(f, "{}", array),
            Value::List(list) => write!(f, "{}", list),
            Value::Boxed(boxed) => write!(f, "{}", boxed),
            Value::Function(function) => write!(f, "{}", function),
            Value::Any(any) => write!(f, "{}", any),
        }
    }
}

impl ToJson for Scalar {
    fn to_json(&self) -> Result<serde_json::Value> {
        Ok(match self {
            Scalar::Int(v) => json!(v),
            Scalar::Float(v) => json!(v),
            Scalar::Complex(v) => json!([v.re, v.im]),
            Scalar::Str(v) => json!(v),
        })
    }
}

impl ToJson for Value {
    fn to_json(&self) -> Result<serde_json::Value> {
        match self {
            Value::Scalar(scalar) => scalar.to_json(),
            Value::Array(array) => {
                let values = array
                    .values()
                    .iter()
                    .map(ToJson::to_json)
                    .collect::<Result<Vec<_>>>()?;
                Ok(json!({ "shape": array.shape(), "values": values }))
            }
            Value::List(list) => {
                let values = list
                    .values
                    .iter()
                    .map(ToJson::to_json)
                    .collect::<Result<Vec<_>>>()?;
                Ok(json!(values))
            }
            Value::Boxed(boxed) => bail!("cannot convert boxed {} to json", boxed.ty()),
            Value::Function(function) => bail!("cannot convert function {} to json", function),
            Value::Any(any) => bail!("cannot convert {} to json", any.type_name()),
        }
    }
}
