use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use crate::ast::{ProcedureDecl, Script};
use crate::value::{ops, BaseType, Value};

mod eval;
mod exec;

// ---------------------------------------------------------------------------
// RuntimeError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error)]
#[error("Runtime error at line {line}, column {column}{}: {message}", proc_suffix(.procedure))]
pub struct RuntimeError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    /// Procedure that was executing when the error was raised; empty when the
    /// failure happened outside any procedure (e.g. unknown invoke target).
    pub procedure: String,
}

fn proc_suffix(procedure: &str) -> String {
    if procedure.is_empty() {
        String::new()
    } else {
        format!(" in procedure '{}'", procedure)
    }
}

// ---------------------------------------------------------------------------
// Control flow signals
// ---------------------------------------------------------------------------

/// Non-local control flow, threaded as the error side of `Result`. The three
/// signal variants are expected unwinding: loops and `switch` intercept
/// `Break`/`Continue`, procedure dispatch intercepts `Return`. Only `Error`
/// ever reaches the host.
#[derive(Debug)]
pub(crate) enum Flow {
    Return(Value),
    Break,
    Continue,
    Error(RuntimeError),
}

impl From<RuntimeError> for Flow {
    fn from(err: RuntimeError) -> Self {
        Flow::Error(err)
    }
}

pub(crate) type Exec<T> = Result<T, Flow>;

// ---------------------------------------------------------------------------
// External bindings
// ---------------------------------------------------------------------------

/// Host callback: receives evaluated arguments, returns a value or an error
/// message that the interpreter tags with the call site.
pub type ExternalFn = Box<dyn FnMut(&[Value]) -> Result<Value, String>>;
pub type ExternalGetter = Box<dyn FnMut() -> Value>;
pub type ExternalSetter = Box<dyn FnMut(Value)>;

struct ExternalVar {
    getter: ExternalGetter,
    setter: Option<ExternalSetter>,
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// One procedure invocation: a stack of block scopes. There is deliberately
/// no link to the caller's frame; names either resolve inside the frame or
/// fall through to the external-variable registry.
struct Frame {
    procedure: String,
    scopes: Vec<HashMap<String, Value>>,
}

// ---------------------------------------------------------------------------
// Interpreter
// ---------------------------------------------------------------------------

pub struct Interpreter {
    procedures: HashMap<String, Rc<ProcedureDecl>>,
    external_fns: HashMap<String, ExternalFn>,
    external_vars: HashMap<String, ExternalVar>,
    frames: Vec<Frame>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            procedures: HashMap::new(),
            external_fns: HashMap::new(),
            external_vars: HashMap::new(),
            frames: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Registries
    // -------------------------------------------------------------------------

    /// Publish every procedure of a parsed script. A name already loaded from
    /// an earlier script is silently replaced.
    pub fn load_script(&mut self, script: &Script) {
        for proc in &script.procedures {
            self.procedures
                .insert(proc.name.clone(), Rc::new(proc.clone()));
        }
    }

    pub fn has_procedure(&self, name: &str) -> bool {
        self.procedures.contains_key(name)
    }

    pub fn procedure(&self, name: &str) -> Option<Rc<ProcedureDecl>> {
        self.procedures.get(name).cloned()
    }

    pub fn procedure_names(&self) -> Vec<String> {
        self.procedures.keys().cloned().collect()
    }

    pub fn register_external_fn(
        &mut self,
        name: impl Into<String>,
        callback: impl FnMut(&[Value]) -> Result<Value, String> + 'static,
    ) {
        self.external_fns.insert(name.into(), Box::new(callback));
    }

    pub fn unregister_external_fn(&mut self, name: &str) {
        self.external_fns.remove(name);
    }

    pub fn has_external_fn(&self, name: &str) -> bool {
        self.external_fns.contains_key(name)
    }

    pub fn register_external_var(
        &mut self,
        name: impl Into<String>,
        getter: impl FnMut() -> Value + 'static,
        setter: Option<ExternalSetter>,
    ) {
        self.external_vars.insert(
            name.into(),
            ExternalVar {
                getter: Box::new(getter),
                setter,
            },
        );
    }

    pub fn unregister_external_var(&mut self, name: &str) {
        self.external_vars.remove(name);
    }

    pub fn has_external_var(&self, name: &str) -> bool {
        self.external_vars.contains_key(name)
    }

    // -------------------------------------------------------------------------
    // Procedure dispatch
    // -------------------------------------------------------------------------

    /// Execute a loaded procedure with host-supplied arguments. Each argument
    /// is converted to the declared parameter type before the body runs.
    pub fn invoke(&mut self, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        let proc = self.procedures.get(name).cloned().ok_or_else(|| RuntimeError {
            message: format!("Procedure not found: '{}'", name),
            line: 0,
            column: 0,
            procedure: String::new(),
        })?;
        self.call_procedure(&proc, args)
    }

    pub(crate) fn call_procedure(
        &mut self,
        proc: &Rc<ProcedureDecl>,
        args: &[Value],
    ) -> Result<Value, RuntimeError> {
        if args.len() != proc.parameters.len() {
            return Err(RuntimeError {
                message: format!(
                    "Procedure '{}' expects {} arguments, got {}",
                    proc.name,
                    proc.parameters.len(),
                    args.len()
                ),
                line: proc.line,
                column: proc.column,
                procedure: proc.name.clone(),
            });
        }

        self.frames.push(Frame {
            procedure: proc.name.clone(),
            scopes: vec![HashMap::new()],
        });
        let result = self.run_procedure(proc, args);
        self.frames.pop();
        result
    }

    fn run_procedure(
        &mut self,
        proc: &Rc<ProcedureDecl>,
        args: &[Value],
    ) -> Result<Value, RuntimeError> {
        // Parameters live in the outermost scope of the frame.
        for (param, arg) in proc.parameters.iter().zip(args.iter()) {
            let converted = ops::convert(arg, param.ty)
                .map_err(|e| self.runtime_error(proc.line, proc.column, e.to_string()))?;
            self.define(param.name.clone(), converted);
        }

        let returns_void = proc.return_type.base == BaseType::Void && !proc.return_type.is_array;

        match self.execute(&proc.body) {
            Ok(()) => {
                if returns_void {
                    Ok(Value::Void)
                } else {
                    Err(self.runtime_error(
                        proc.line,
                        proc.column,
                        "Non-void procedure must return a value",
                    ))
                }
            }
            Err(Flow::Return(value)) => {
                if returns_void {
                    Ok(Value::Void)
                } else {
                    ops::convert(&value, proc.return_type)
                        .map_err(|e| self.runtime_error(proc.line, proc.column, e.to_string()))
                }
            }
            Err(Flow::Break) => Err(self.runtime_error(
                proc.line,
                proc.column,
                "'break' outside of a loop or switch",
            )),
            Err(Flow::Continue) => {
                Err(self.runtime_error(proc.line, proc.column, "'continue' outside of a loop"))
            }
            Err(Flow::Error(err)) => Err(err),
        }
    }

    // -------------------------------------------------------------------------
    // Scopes and name resolution
    // -------------------------------------------------------------------------

    pub(crate) fn runtime_error(
        &self,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> RuntimeError {
        RuntimeError {
            message: message.into(),
            line,
            column,
            procedure: self
                .frames
                .last()
                .map(|f| f.procedure.clone())
                .unwrap_or_default(),
        }
    }

    fn frame_mut(&mut self) -> &mut Frame {
        self.frames.last_mut().expect("no active frame")
    }

    pub(crate) fn push_scope(&mut self) {
        self.frame_mut().scopes.push(HashMap::new());
    }

    pub(crate) fn pop_scope(&mut self) {
        self.frame_mut().scopes.pop();
    }

    pub(crate) fn define(&mut self, name: String, value: Value) {
        self.frame_mut()
            .scopes
            .last_mut()
            .expect("no active scope")
            .insert(name, value);
    }

    /// Read a name: innermost scope outward within the current frame, then
    /// the external-variable registry. Caller frames are never consulted.
    pub(crate) fn read_variable(
        &mut self,
        name: &str,
        line: usize,
        column: usize,
    ) -> Result<Value, RuntimeError> {
        if let Some(frame) = self.frames.last() {
            for scope in frame.scopes.iter().rev() {
                if let Some(value) = scope.get(name) {
                    return Ok(value.clone());
                }
            }
        }

        if let Some(var) = self.external_vars.get_mut(name) {
            return Ok((var.getter)());
        }

        Err(self.runtime_error(line, column, format!("Undefined variable: '{}'", name)))
    }

    /// Write a name: first binding found in the current frame, then the
    /// external-variable setter. A setter-less external is read-only.
    pub(crate) fn write_variable(
        &mut self,
        name: &str,
        value: Value,
        line: usize,
        column: usize,
    ) -> Result<(), RuntimeError> {
        if let Some(frame) = self.frames.last_mut() {
            for scope in frame.scopes.iter_mut().rev() {
                if let Some(slot) = scope.get_mut(name) {
                    *slot = value;
                    return Ok(());
                }
            }
        }

        let read_only = match self.external_vars.get_mut(name) {
            Some(ExternalVar {
                setter: Some(setter),
                ..
            }) => {
                setter(value);
                return Ok(());
            }
            Some(_) => true,
            None => false,
        };

        if read_only {
            return Err(self.runtime_error(
                line,
                column,
                format!("Cannot assign to read-only external variable '{}'", name),
            ));
        }

        Err(self.runtime_error(line, column, format!("Undefined variable: '{}'", name)))
    }
}
