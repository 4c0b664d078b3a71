use crate::host::{HostRecord, HostRef, HostValue};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

/// Host function: positional arguments in, declared returns out (plus the
/// trailing error slot when the signature is fallible).
pub type HostFn = Rc<dyn Fn(Vec<HostValue>) -> Vec<HostValue>>;
/// Host method: like [`HostFn`] with the receiver handle passed first.
pub type MethodFn = Rc<dyn Fn(&HostRef, Vec<HostValue>) -> Vec<HostValue>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

impl IntKind {
    pub fn is_unsigned(self) -> bool {
        matches!(self, IntKind::U8 | IntKind::U16 | IntKind::U32 | IntKind::U64)
    }

    /// Inclusive value range of the kind.
    pub fn bounds(self) -> (i128, i128) {
        match self {
            IntKind::I8 => (i8::MIN as i128, i8::MAX as i128),
            IntKind::I16 => (i16::MIN as i128, i16::MAX as i128),
            IntKind::I32 => (i32::MIN as i128, i32::MAX as i128),
            IntKind::I64 => (i64::MIN as i128, i64::MAX as i128),
            IntKind::U8 => (0, u8::MAX as i128),
            IntKind::U16 => (0, u16::MAX as i128),
            IntKind::U32 => (0, u32::MAX as i128),
            IntKind::U64 => (0, u64::MAX as i128),
        }
    }

    pub fn contains(self, value: i128) -> bool {
        let (lo, hi) = self.bounds();
        lo <= value && value <= hi
    }
}

impl Display for IntKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IntKind::I8 => write!(f, "i8"),
            IntKind::I16 => write!(f, "i16"),
            IntKind::I32 => write!(f, "i32"),
            IntKind::I64 => write!(f, "i64"),
            IntKind::U8 => write!(f, "u8"),
            IntKind::U16 => write!(f, "u16"),
            IntKind::U32 => write!(f, "u32"),
            IntKind::U64 => write!(f, "u64"),
        }
    }
}

/// Width of a float, and of each component of a complex number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloatKind {
    F32,
    F64,
}

impl FloatKind {
    /// Round `value` to the precision this kind stores.
    pub fn narrow(self, value: f64) -> f64 {
        match self {
            FloatKind::F32 => value as f32 as f64,
            FloatKind::F64 => value,
        }
    }
}

impl Display for FloatKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FloatKind::F32 => write!(f, "f32"),
            FloatKind::F64 => write!(f, "f64"),
        }
    }
}

/// Descriptor of a host type, built once when a package is registered.
#[derive(Clone)]
pub enum HostTy {
    Bool,
    Int(IntKind),
    Float(FloatKind),
    Complex(FloatKind),
    Str,
    Seq(Box<HostTy>),
    /// Record held by value.
    Record(Rc<RecordType>),
    /// Reference to a record.
    Ref(Rc<RecordType>),
    Map(Box<HostTy>, Box<HostTy>),
    Chan(Box<HostTy>),
    /// Abstract type: no values of its own, never constructible.
    Interface(String),
    /// Error-capable slot, only meaningful as the trailing return.
    Error,
}

impl HostTy {
    pub const fn i64() -> HostTy {
        HostTy::Int(IntKind::I64)
    }
    pub const fn f64() -> HostTy {
        HostTy::Float(FloatKind::F64)
    }
    pub const fn c128() -> HostTy {
        HostTy::Complex(FloatKind::F64)
    }
    pub fn seq(elem: HostTy) -> HostTy {
        HostTy::Seq(Box::new(elem))
    }

    pub fn as_record(&self) -> Option<&Rc<RecordType>> {
        match self {
            HostTy::Record(record) | HostTy::Ref(record) => Some(record),
            _ => None,
        }
    }

    /// Only values of these kinds can be allocated by a constructor.
    pub fn is_constructible(&self) -> bool {
        !matches!(
            self,
            HostTy::Map(..) | HostTy::Chan(_) | HostTy::Interface(_) | HostTy::Error
        )
    }

    /// The value a freshly allocated slot of this type holds. Reference-like
    /// kinds start out nil.
    pub fn zero_value(&self) -> HostValue {
        match self {
            HostTy::Bool => HostValue::Bool(false),
            HostTy::Int(kind) if kind.is_unsigned() => HostValue::Uint(0),
            HostTy::Int(_) => HostValue::Int(0),
            HostTy::Float(_) => HostValue::Float(0.0),
            HostTy::Complex(_) => HostValue::Complex(Default::default()),
            HostTy::Str => HostValue::Str(String::new()),
            HostTy::Seq(_) => HostValue::Seq(Vec::new()),
            HostTy::Record(record) => HostValue::Record(HostRecord::zeroed(record)),
            HostTy::Ref(_) | HostTy::Map(..) | HostTy::Chan(_) | HostTy::Interface(_) => {
                HostValue::Nil
            }
            HostTy::Error => HostValue::Error(None),
        }
    }
}

impl PartialEq for HostTy {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (HostTy::Bool, HostTy::Bool) | (HostTy::Str, HostTy::Str) => true,
            (HostTy::Error, HostTy::Error) => true,
            (HostTy::Int(a), HostTy::Int(b)) => a == b,
            (HostTy::Float(a), HostTy::Float(b)) => a == b,
            (HostTy::Complex(a), HostTy::Complex(b)) => a == b,
            (HostTy::Seq(a), HostTy::Seq(b)) => a == b,
            (HostTy::Chan(a), HostTy::Chan(b)) => a == b,
            (HostTy::Map(ka, va), HostTy::Map(kb, vb)) => ka == kb && va == vb,
            (HostTy::Record(a), HostTy::Record(b)) => Rc::ptr_eq(a, b),
            (HostTy::Ref(a), HostTy::Ref(b)) => Rc::ptr_eq(a, b),
            (HostTy::Interface(a), HostTy::Interface(b)) => a == b,
            _ => false,
        }
    }
}

impl Display for HostTy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HostTy::Bool => write!(f, "bool"),
            HostTy::Int(kind) => write!(f, "{}", kind),
            HostTy::Float(kind) => write!(f, "{}", kind),
            HostTy::Complex(kind) => write!(f, "Complex<{}>", kind),
            HostTy::Str => write!(f, "String"),
            HostTy::Seq(elem) => write!(f, "Vec<{}>", elem),
            HostTy::Record(record) => write!(f, "{}", record.name()),
            HostTy::Ref(record) => write!(f, "&{}", record.name()),
            HostTy::Map(key, value) => write!(f, "HashMap<{}, {}>", key, value),
            HostTy::Chan(elem) => write!(f, "Receiver<{}>", elem),
            HostTy::Interface(name) => write!(f, "dyn {}", name),
            HostTy::Error => write!(f, "error"),
        }
    }
}

impl Debug for HostTy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "HostTy({})", self)
    }
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub ty: HostTy,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: HostTy) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A callable member of a record type.
#[derive(Clone)]
pub struct Method {
    pub sig: Signature,
    pub func: MethodFn,
}

impl Method {
    pub fn new(
        sig: Signature,
        func: impl Fn(&HostRef, Vec<HostValue>) -> Vec<HostValue> + 'static,
    ) -> Self {
        Self {
            sig,
            func: Rc::new(func),
        }
    }
}

impl Debug for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Method").field("sig", &self.sig).finish()
    }
}

/// Named record type: ordered fields plus a method table.
///
/// Identity is the allocation: two descriptors with the same name and fields
/// are still different types.
pub struct RecordType {
    name: String,
    fields: Vec<FieldDef>,
    methods: RefCell<BTreeMap<String, Method>>,
}

impl RecordType {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            fields,
            methods: RefCell::new(BTreeMap::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    /// Register a method. Methods are attached after the type exists so that
    /// their signatures can mention the type itself.
    pub fn define_method(&self, name: impl Into<String>, method: Method) {
        self.methods.borrow_mut().insert(name.into(), method);
    }

    pub fn method(&self, name: &str) -> Option<Method> {
        self.methods.borrow().get(name).cloned()
    }

    pub fn method_names(&self) -> Vec<String> {
        self.methods.borrow().keys().cloned().collect()
    }
}

impl Debug for RecordType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let methods = self.methods.borrow().keys().join(", ");
        f.debug_struct("RecordType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("methods", &methods)
            .finish()
    }
}

/// Describes how a host function is called: parameter and return types, and
/// whether one more error slot follows the declared returns.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub params: Vec<HostTy>,
    pub returns: Vec<HostTy>,
    pub fallible: bool,
}

impl Signature {
    pub fn new(params: Vec<HostTy>, returns: Vec<HostTy>) -> Self {
        Self {
            params,
            returns,
            fallible: false,
        }
    }

    /// The host function returns `returns` followed by a [`HostTy::Error`] slot.
    pub fn fallible(params: Vec<HostTy>, returns: Vec<HostTy>) -> Self {
        Self {
            params,
            returns,
            fallible: true,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Number of values the host function hands back, error slot included.
    pub fn output_slots(&self) -> usize {
        self.returns.len() + usize::from(self.fallible)
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "fn({})", self.params.iter().join(", "))?;
        let returns = self
            .returns
            .iter()
            .map(ToString::to_string)
            .chain(self.fallible.then(|| "error".to_string()))
            .collect::<Vec<_>>();
        match returns.len() {
            0 => Ok(()),
            1 => write!(f, " -> {}", returns[0]),
            _ => write!(f, " -> ({})", returns.join(", ")),
        }
    }
}
