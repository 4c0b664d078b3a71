use crate::error::Error;
use crate::host::{host_ref, HostRef, HostTy, HostValue, RecordType};
use crate::Result;
use std::cell::{Ref, RefMut};
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

/// Opaque reference to a host object, tagged with the object's type.
///
/// Cloning copies the reference: every clone observes writes made through any
/// other. The referenced object is never duplicated by the wrapper.
///
/// A record nested by value inside another record has no handle of its own.
/// It is addressed through the outermost object's handle plus the field
/// positions leading down to it.
#[derive(Clone)]
pub struct BoxedValue {
    handle: HostRef,
    path: Vec<usize>,
    ty: HostTy,
}

impl BoxedValue {
    pub fn new(handle: HostRef, ty: HostTy) -> Self {
        Self {
            handle,
            path: Vec::new(),
            ty,
        }
    }

    /// Move `value` into a fresh host allocation.
    pub fn allocate(value: HostValue, ty: HostTy) -> Self {
        Self::new(host_ref(value), ty)
    }

    /// The by-value field at `index` of this record, addressed in place.
    pub fn project(&self, index: usize, ty: HostTy) -> Self {
        let mut path = self.path.clone();
        path.push(index);
        Self {
            handle: self.handle.clone(),
            path,
            ty,
        }
    }

    /// Handle of the outermost object. For a projected field this is the
    /// containing record, not the field itself.
    pub fn handle(&self) -> &HostRef {
        &self.handle
    }

    /// Field positions from the outermost object down to this one; empty when
    /// the box owns its handle.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub fn is_projection(&self) -> bool {
        !self.path.is_empty()
    }

    /// Type of the referenced object.
    pub fn ty(&self) -> &HostTy {
        &self.ty
    }

    pub fn record_type(&self) -> Option<&Rc<RecordType>> {
        match &self.ty {
            HostTy::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn same_object(&self, other: &BoxedValue) -> bool {
        Rc::ptr_eq(&self.handle, &other.handle) && self.path == other.path
    }

    pub fn borrow(&self) -> Result<Ref<'_, HostValue>> {
        let root = self.handle.try_borrow().map_err(|_| self.borrowed())?;
        let path = &self.path;
        Ref::filter_map(root, |value| {
            path.iter()
                .try_fold(value, |value, &index| value.as_record()?.at(index))
        })
        .map_err(|_| self.not_a_record())
    }

    pub fn borrow_mut(&self) -> Result<RefMut<'_, HostValue>> {
        let root = self.handle.try_borrow_mut().map_err(|_| self.borrowed())?;
        let path = &self.path;
        RefMut::filter_map(root, |value| {
            path.iter()
                .try_fold(value, |value, &index| value.as_record_mut()?.at_mut(index))
        })
        .map_err(|_| self.not_a_record())
    }

    fn borrowed(&self) -> Error {
        Error::Borrowed {
            ty: self.ty.to_string(),
        }
    }

    fn not_a_record(&self) -> Error {
        Error::NotARecord {
            ty: self.ty.to_string(),
        }
    }
}

impl Display for BoxedValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.borrow() {
            Ok(value) => write!(f, "{} {}", self.ty, value),
            Err(_) => write!(f, "{} <borrowed>", self.ty),
        }
    }
}

impl Debug for BoxedValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxedValue")
            .field("ty", &self.ty)
            .field("handle", &Rc::as_ptr(&self.handle))
            .field("path", &self.path)
            .finish()
    }
}
