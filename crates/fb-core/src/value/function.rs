use crate::host::HostValue;
use crate::value::Value;
use crate::Result;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

/// Anything the interpreter can apply to operands: `f R` or `L f R`.
/// `Display` provides the name shown to users.
pub trait Function: Display {
    fn call(&self, left: Option<&Value>, right: &Value) -> Result<Value>;
}

#[derive(Clone)]
pub struct ValueFunction(Rc<dyn Function>);

impl ValueFunction {
    pub fn new(function: impl Function + 'static) -> Self {
        Self(Rc::new(function))
    }

    pub fn call(&self, left: Option<&Value>, right: &Value) -> Result<Value> {
        self.0.call(left, right)
    }

    pub fn ptr_eq(&self, other: &ValueFunction) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Display for ValueFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for ValueFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ValueFunction({})", self.0)
    }
}

/// Domain values (an image, a plot handle) that know how to present
/// themselves to host code. Conversion asks them first.
pub trait Exportable: Display {
    fn type_name(&self) -> &str;
    /// Host form of the value, or `None` when it has none.
    fn export(&self) -> Option<HostValue>;
}

#[derive(Clone)]
pub struct ValueAny(Rc<dyn Exportable>);

impl ValueAny {
    pub fn new(any: impl Exportable + 'static) -> Self {
        Self(Rc::new(any))
    }

    pub fn type_name(&self) -> &str {
        self.0.type_name()
    }

    pub fn export(&self) -> Option<HostValue> {
        self.0.export()
    }

    pub fn ptr_eq(&self, other: &ValueAny) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Display for ValueAny {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for ValueAny {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ValueAny({})", self.0.type_name())
    }
}
