use crate::config::options;
use crate::value::Value;
use crate::{bail, Result};
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// Flat row-major buffer plus shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueArray {
    shape: Vec<usize>,
    values: Vec<Value>,
}

impl ValueArray {
    pub fn new(shape: Vec<usize>, values: Vec<Value>) -> Result<Self> {
        let size = shape_size(&shape);
        if size != values.len() {
            bail!(
                "shape {:?} needs {} elements, got {}",
                shape,
                size,
                values.len()
            );
        }
        Ok(Self { shape, values })
    }

    pub fn vector(values: Vec<Value>) -> Self {
        Self {
            shape: vec![values.len()],
            values,
        }
    }

    pub fn empty() -> Self {
        Self {
            shape: vec![0],
            values: Vec::new(),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Product of the dimensions; 0 when any dimension is 0.
    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

fn shape_size(shape: &[usize]) -> usize {
    shape.iter().product()
}

impl Display for ValueArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.values.is_empty() {
            return write!(f, "⍬");
        }
        if self.rank() != 1 {
            write!(f, "{}⍴", self.shape.iter().join(" "))?;
        }
        let limit = options().display_limit;
        write!(f, "{}", self.values.iter().take(limit).join(" "))?;
        if self.values.len() > limit {
            write!(f, " …")?;
        }
        Ok(())
    }
}

/// Heterogeneous ordered values, e.g. the results of a multi-return call.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueList {
    pub values: Vec<Value>,
}

impl ValueList {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Display for ValueList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.values.iter().join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimension_means_empty() {
        let array = ValueArray::new(vec![3, 0], Vec::new()).unwrap();
        assert_eq!(array.size(), 0);
        assert_eq!(array.rank(), 2);
    }

    #[test]
    fn rejects_buffer_that_does_not_fill_shape() {
        assert!(ValueArray::new(vec![2, 2], vec![Value::int(1)]).is_err());
    }
}
