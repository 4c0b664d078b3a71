use fb_core::error::Error;
use fb_core::host::HostTy;
use fb_core::value::{BoxedValue, Function, Value};
use fb_core::Result;
use std::fmt::{Display, Formatter};

/// `new T`: every invocation allocates a zeroed `T` and boxes it. Fields are
/// filled in afterwards through [`crate::Reflect::set`].
#[derive(Debug, Clone)]
pub struct Constructor {
    ty: HostTy,
}

impl Constructor {
    pub fn new(ty: HostTy) -> Self {
        Self { ty }
    }

    pub fn ty(&self) -> &HostTy {
        &self.ty
    }

    /// Type of the allocated object. Constructing `&T` allocates a `T`; the
    /// box is already the reference.
    fn target(&self) -> HostTy {
        match &self.ty {
            HostTy::Ref(record) => HostTy::Record(record.clone()),
            other => other.clone(),
        }
    }

    pub fn construct(&self) -> Result<BoxedValue> {
        if !self.ty.is_constructible() {
            return Err(Error::NotConstructible {
                ty: self.ty.to_string(),
            });
        }
        let ty = self.target();
        fb_core::trace!("allocating zeroed {}", ty);
        Ok(BoxedValue::allocate(ty.zero_value(), ty))
    }
}

impl Function for Constructor {
    fn call(&self, _left: Option<&Value>, _right: &Value) -> Result<Value> {
        self.construct().map(Value::Boxed)
    }
}

impl Display for Constructor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "new {}", self.target())
    }
}
