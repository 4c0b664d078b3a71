use crate::callable::Callable;
use crate::constructor::Constructor;
use crate::convert::import;
use fb_core::host::{HostTy, HostValue, Signature};
use fb_core::value::Value;
use fb_core::Result;
use std::collections::BTreeMap;

/// Name → value table for one host package, ready for the interpreter to
/// register. Entries are exposed as `package.Name`.
#[derive(Debug, Clone)]
pub struct Package {
    name: String,
    entries: BTreeMap<String, Value>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn function(
        self,
        name: &str,
        sig: Signature,
        func: impl Fn(Vec<HostValue>) -> Vec<HostValue> + 'static,
    ) -> Self {
        let callable = Callable::new(self.qualify(name), sig, func);
        self.insert(name, Value::function(callable))
    }

    pub fn constructor(self, name: &str, ty: HostTy) -> Self {
        self.insert(name, Value::function(Constructor::new(ty)))
    }

    /// A host value the package exports as-is, converted once now.
    pub fn variable(self, name: &str, value: HostValue, ty: &HostTy) -> Result<Self> {
        let value = import(value, ty)?;
        Ok(self.insert(name, value))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries under their qualified names, in name order.
    pub fn qualified(&self) -> impl Iterator<Item = (String, &Value)> + '_ {
        self.entries
            .iter()
            .map(|(name, value)| (self.qualify(name), value))
    }

    fn qualify(&self, name: &str) -> String {
        format!("{}.{}", self.name, name)
    }

    fn insert(mut self, name: &str, value: Value) -> Self {
        fb_core::debug!(package = %self.name, "registering {}", name);
        if self.entries.insert(name.to_string(), value).is_some() {
            fb_core::warn!("{} redefined in package {}", name, self.name);
        }
        self
    }
}
