use crate::convert::{export, import};
use fb_core::config::options;
use fb_core::error::{ArityError, Error};
use fb_core::host::{host_ref, HostFn, HostTy, HostValue, Method, MethodFn, Signature};
use fb_core::value::{BoxedValue, Function, Value};
use fb_core::Result;
use itertools::Itertools;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

/// How the operands of one invocation map onto positional parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgLayout {
    /// No parameters; operands are not forwarded.
    Nullary,
    /// The right operand is parameter 0.
    Monadic,
    /// Right operand is parameter 0, left operand is parameter 1.
    Dyadic,
    /// The right operand is a vector holding one element per parameter.
    Splat,
}

impl ArgLayout {
    pub fn select(arity: usize, has_left: bool) -> Self {
        match (arity, has_left) {
            (0, _) => ArgLayout::Nullary,
            (1, _) => ArgLayout::Monadic,
            (2, true) => ArgLayout::Dyadic,
            _ => ArgLayout::Splat,
        }
    }
}

#[derive(Clone)]
enum Target {
    Function(HostFn),
    Method { func: MethodFn, receiver: BoxedValue },
}

/// A host function presented to the interpreter as an ordinary function value.
#[derive(Clone)]
pub struct Callable {
    name: String,
    sig: Signature,
    target: Target,
}

impl Callable {
    pub fn new(
        name: impl Into<String>,
        sig: Signature,
        func: impl Fn(Vec<HostValue>) -> Vec<HostValue> + 'static,
    ) -> Self {
        Self::from_host_fn(name, sig, Rc::new(func))
    }

    pub fn from_host_fn(name: impl Into<String>, sig: Signature, func: HostFn) -> Self {
        Self {
            name: name.into(),
            sig,
            target: Target::Function(func),
        }
    }

    /// Bind `method` to `receiver`; the result keeps the receiver alive.
    pub fn bind(name: impl Into<String>, method: Method, receiver: BoxedValue) -> Self {
        Self {
            name: name.into(),
            sig: method.sig,
            target: Target::Method {
                func: method.func,
                receiver,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.sig
    }

    /// Export the operands into positional host arguments.
    pub fn marshal(&self, left: Option<&Value>, right: &Value) -> Result<Vec<HostValue>> {
        let params = &self.sig.params;
        let layout = ArgLayout::select(params.len(), left.is_some());
        fb_core::trace!(
            callee = %self.name,
            ?layout,
            arity = params.len(),
            "marshalling host call"
        );
        let args = match (layout, left) {
            (ArgLayout::Nullary, _) => Vec::new(),
            (ArgLayout::Monadic, _) => vec![export_arg(0, right, &params[0])?],
            (ArgLayout::Dyadic, Some(left)) => vec![
                export_arg(0, right, &params[0])?,
                export_arg(1, left, &params[1])?,
            ],
            _ => splat(params, right)?,
        };
        if options().trace_arguments {
            fb_core::trace!(callee = %self.name, "arguments: {}", args.iter().join(", "));
        }
        Ok(args)
    }

    /// Call the host function with already marshalled arguments and import
    /// what it returns.
    pub fn invoke(&self, args: Vec<HostValue>) -> Result<Value> {
        let outputs = match &self.target {
            Target::Function(func) => func(args),
            Target::Method { func, receiver } => call_method(func, receiver, args)?,
        };
        self.unmarshal(outputs)
    }

    fn unmarshal(&self, mut outputs: Vec<HostValue>) -> Result<Value> {
        let expected = self.sig.output_slots();
        if outputs.len() != expected {
            return Err(Error::ReturnMismatch {
                callee: self.name.clone(),
                expected,
                got: outputs.len(),
            });
        }
        if self.sig.fallible {
            match outputs.pop() {
                Some(HostValue::Error(None)) => {}
                Some(HostValue::Error(Some(fault))) => {
                    fb_core::debug!(callee = %self.name, "host call failed: {}", fault);
                    return Err(Error::Host(fault));
                }
                Some(other) => {
                    return Err(Error::conversion(
                        format!("host {}", other.kind_name()),
                        HostTy::Error,
                    ))
                }
                None => {
                    return Err(Error::ReturnMismatch {
                        callee: self.name.clone(),
                        expected,
                        got: 0,
                    })
                }
            }
        }

        let mut values = outputs
            .into_iter()
            .zip(&self.sig.returns)
            .map(|(value, ty)| import(value, ty))
            .collect::<Result<Vec<_>>>()?;
        Ok(match values.len() {
            0 => Value::empty(),
            1 => values.remove(0),
            _ => Value::list(values),
        })
    }
}

/// A receiver nested by value inside another record has no handle the method
/// could take. The method runs against a scratch copy, which is then stored
/// back into the containing record.
fn call_method(
    func: &MethodFn,
    receiver: &BoxedValue,
    args: Vec<HostValue>,
) -> Result<Vec<HostValue>> {
    if !receiver.is_projection() {
        return Ok(func(receiver.handle(), args));
    }
    let scratch = host_ref(receiver.borrow()?.clone());
    let outputs = func(&scratch, args);
    let updated = scratch
        .try_borrow()
        .map(|value| value.clone())
        .map_err(|_| Error::Borrowed {
            ty: receiver.ty().to_string(),
        })?;
    if !updated.conforms_to(receiver.ty()) {
        return Err(Error::conversion(
            format!("host {}", updated.kind_name()),
            receiver.ty(),
        ));
    }
    *receiver.borrow_mut()? = updated;
    Ok(outputs)
}

/// `position` is 0-based; errors report it 1-based.
fn export_arg(position: usize, value: &Value, ty: &HostTy) -> Result<HostValue> {
    export(value, ty).map_err(|err| Error::argument(position + 1, err))
}

fn splat(params: &[HostTy], right: &Value) -> Result<Vec<HostValue>> {
    let values = match right {
        Value::Array(array) if array.rank() > 1 => {
            return Err(ArityError::RankTooHigh { rank: array.rank() }.into());
        }
        Value::Array(array) => array.values(),
        // a lone operand counts as a single element
        other => std::slice::from_ref(other),
    };
    if values.len() != params.len() {
        return Err(ArityError::Count {
            expected: params.len(),
            got: values.len(),
        }
        .into());
    }
    params
        .iter()
        .zip(values)
        .enumerate()
        .map(|(position, (ty, value))| export_arg(position, value, ty))
        .collect()
}

impl Function for Callable {
    fn call(&self, left: Option<&Value>, right: &Value) -> Result<Value> {
        let args = self.marshal(left, right)?;
        self.invoke(args)
    }
}

impl Display for Callable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Debug for Callable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name)
            .field("sig", &format_args!("{}", self.sig))
            .finish()
    }
}
