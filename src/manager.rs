/// Host-facing facade: compiles source, owns the interpreter and the
/// external registries, tracks which file each procedure came from.
use std::collections::{HashMap, HashSet};
use std::fs;

use thiserror::Error;

use crate::ast::{Parameter, Script};
use crate::interpreter::{ExternalFn, ExternalSetter, Interpreter, RuntimeError};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::token::TokenKind;
use crate::value::{ops, TypeInfo, Value};

// ---------------------------------------------------------------------------
// Diagnostic
// ---------------------------------------------------------------------------

/// A compile-time error surfaced by `load` or `check`.
#[derive(Debug, Clone, Error)]
#[error("{filename}:{line}:{column}: error: {message}{}", proc_suffix(.procedure))]
pub struct Diagnostic {
    pub message: String,
    pub filename: String,
    /// Enclosing procedure, empty outside procedure bodies.
    pub procedure: String,
    pub line: usize,
    pub column: usize,
}

fn proc_suffix(procedure: &str) -> String {
    if procedure.is_empty() {
        String::new()
    } else {
        format!(" in procedure '{}'", procedure)
    }
}

/// Signature information for a loaded procedure.
#[derive(Debug, Clone)]
pub struct ProcedureInfo {
    pub name: String,
    pub return_type: TypeInfo,
    pub parameters: Vec<Parameter>,
    pub filename: String,
}

pub type ExternalBinding = (String, ExternalFn);

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

fn compile(source: &str, filename: &str) -> Result<Script, Vec<Diagnostic>> {
    let tokens = Lexer::new(source).tokenize();

    let mut diagnostics = Vec::new();
    for token in &tokens {
        if let TokenKind::Unknown(lexeme) = &token.kind {
            diagnostics.push(Diagnostic {
                message: format!("Unexpected character: '{}'", lexeme),
                filename: filename.to_string(),
                procedure: String::new(),
                line: token.line,
                column: token.col,
            });
        }
    }
    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }

    let mut parser = Parser::new(tokens, filename);
    let script = parser.parse();
    for err in parser.errors() {
        diagnostics.push(Diagnostic {
            message: err.msg.clone(),
            filename: filename.to_string(),
            procedure: err.procedure.clone(),
            line: err.line,
            column: err.col,
        });
    }
    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }

    // Duplicates within one compilation unit are a compile error; replacing a
    // procedure from an earlier load is not.
    let mut seen = HashSet::new();
    for proc in &script.procedures {
        if !seen.insert(proc.name.as_str()) {
            diagnostics.push(Diagnostic {
                message: format!("Duplicate procedure name: {}", proc.name),
                filename: filename.to_string(),
                procedure: proc.name.clone(),
                line: proc.line,
                column: proc.column,
            });
        }
    }

    if diagnostics.is_empty() {
        Ok(script)
    } else {
        Err(diagnostics)
    }
}

fn file_error(path: &str) -> Vec<Diagnostic> {
    vec![Diagnostic {
        message: "Failed to open file".to_string(),
        filename: path.to_string(),
        procedure: String::new(),
        line: 0,
        column: 0,
    }]
}

// ---------------------------------------------------------------------------
// ScriptManager
// ---------------------------------------------------------------------------

pub struct ScriptManager {
    interpreter: Interpreter,
    /// procedure name -> origin filename
    procedure_files: HashMap<String, String>,
}

impl Default for ScriptManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptManager {
    pub fn new() -> Self {
        ScriptManager {
            interpreter: Interpreter::new(),
            procedure_files: HashMap::new(),
        }
    }

    /// Compile and publish a script. The returned list is empty on success;
    /// a failed compile publishes nothing.
    pub fn load_source(&mut self, source: &str, filename: &str) -> Vec<Diagnostic> {
        match compile(source, filename) {
            Ok(script) => {
                self.interpreter.load_script(&script);
                for proc in &script.procedures {
                    self.procedure_files
                        .insert(proc.name.clone(), filename.to_string());
                }
                Vec::new()
            }
            Err(diagnostics) => diagnostics,
        }
    }

    /// Compile without publishing.
    pub fn check_source(&self, source: &str, filename: &str) -> Vec<Diagnostic> {
        match compile(source, filename) {
            Ok(_) => Vec::new(),
            Err(diagnostics) => diagnostics,
        }
    }

    pub fn load_file(&mut self, path: &str) -> Vec<Diagnostic> {
        match fs::read_to_string(path) {
            Ok(source) => self.load_source(&source, path),
            Err(_) => file_error(path),
        }
    }

    pub fn check_file(&self, path: &str) -> Vec<Diagnostic> {
        match fs::read_to_string(path) {
            Ok(source) => self.check_source(&source, path),
            Err(_) => file_error(path),
        }
    }

    /// Invoke a loaded procedure with typed arguments.
    pub fn invoke(&mut self, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        self.interpreter.invoke(name, args)
    }

    pub fn has_procedure(&self, name: &str) -> bool {
        self.interpreter.has_procedure(name)
    }

    pub fn procedure_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.procedure_files.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn procedure_info(&self, name: &str) -> Option<ProcedureInfo> {
        let proc = self.interpreter.procedure(name)?;
        Some(ProcedureInfo {
            name: proc.name.clone(),
            return_type: proc.return_type,
            parameters: proc.parameters.clone(),
            filename: self.procedure_files.get(name).cloned().unwrap_or_default(),
        })
    }

    // -------------------------------------------------------------------------
    // External functions
    // -------------------------------------------------------------------------

    pub fn register_external_fn(
        &mut self,
        name: impl Into<String>,
        callback: impl FnMut(&[Value]) -> Result<Value, String> + 'static,
    ) {
        self.interpreter.register_external_fn(name, callback);
    }

    pub fn register_external_fns(&mut self, bindings: Vec<ExternalBinding>) {
        for (name, callback) in bindings {
            self.interpreter.register_external_fn(name, callback);
        }
    }

    pub fn unregister_external_fn(&mut self, name: &str) {
        self.interpreter.unregister_external_fn(name);
    }

    pub fn has_external_fn(&self, name: &str) -> bool {
        self.interpreter.has_external_fn(name)
    }

    /// Register a unary host function over plain Rust types; arity and
    /// argument conversion are checked at call time.
    pub fn register_fn1<A, R, F>(&mut self, name: impl Into<String>, mut f: F)
    where
        A: FromScriptValue,
        R: IntoScriptValue,
        F: FnMut(A) -> R + 'static,
    {
        self.register_external_fn(name, move |args| {
            if args.len() != 1 {
                return Err(format!("Expected 1 argument, got {}", args.len()));
            }
            let a = A::from_value(&args[0])?;
            Ok(f(a).into_value())
        });
    }

    /// Binary variant of `register_fn1`.
    pub fn register_fn2<A1, A2, R, F>(&mut self, name: impl Into<String>, mut f: F)
    where
        A1: FromScriptValue,
        A2: FromScriptValue,
        R: IntoScriptValue,
        F: FnMut(A1, A2) -> R + 'static,
    {
        self.register_external_fn(name, move |args| {
            if args.len() != 2 {
                return Err(format!("Expected 2 arguments, got {}", args.len()));
            }
            let a1 = A1::from_value(&args[0])?;
            let a2 = A2::from_value(&args[1])?;
            Ok(f(a1, a2).into_value())
        });
    }

    // -------------------------------------------------------------------------
    // External variables
    // -------------------------------------------------------------------------

    pub fn register_external_var(
        &mut self,
        name: impl Into<String>,
        getter: impl FnMut() -> Value + 'static,
        setter: impl FnMut(Value) + 'static,
    ) {
        self.interpreter
            .register_external_var(name, getter, Some(Box::new(setter) as ExternalSetter));
    }

    /// Setter-less registration: script writes fail with a read-only error.
    pub fn register_external_var_read_only(
        &mut self,
        name: impl Into<String>,
        getter: impl FnMut() -> Value + 'static,
    ) {
        self.interpreter.register_external_var(name, getter, None);
    }

    pub fn unregister_external_var(&mut self, name: &str) {
        self.interpreter.unregister_external_var(name);
    }

    pub fn has_external_var(&self, name: &str) -> bool {
        self.interpreter.has_external_var(name)
    }

    /// Drop every loaded procedure, origin record and external binding.
    pub fn clear(&mut self) {
        self.interpreter = Interpreter::new();
        self.procedure_files.clear();
    }
}

// ---------------------------------------------------------------------------
// Typed conversion traits for host callbacks
// ---------------------------------------------------------------------------

pub trait IntoScriptValue {
    fn into_value(self) -> Value;
}

impl IntoScriptValue for i32 {
    fn into_value(self) -> Value {
        Value::Int32(self)
    }
}

impl IntoScriptValue for i64 {
    fn into_value(self) -> Value {
        Value::Int64(self)
    }
}

impl IntoScriptValue for f64 {
    fn into_value(self) -> Value {
        Value::Double(self)
    }
}

impl IntoScriptValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl IntoScriptValue for String {
    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

pub trait FromScriptValue: Sized {
    fn from_value(value: &Value) -> Result<Self, String>;
}

impl FromScriptValue for i32 {
    fn from_value(value: &Value) -> Result<Self, String> {
        ops::to_i64(value).map(|v| v as i32).map_err(|e| e.to_string())
    }
}

impl FromScriptValue for i64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        ops::to_i64(value).map_err(|e| e.to_string())
    }
}

impl FromScriptValue for f64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        ops::to_f64(value).map_err(|e| e.to_string())
    }
}

impl FromScriptValue for bool {
    fn from_value(value: &Value) -> Result<Self, String> {
        Ok(ops::truthy(value))
    }
}

impl FromScriptValue for String {
    fn from_value(value: &Value) -> Result<Self, String> {
        Ok(ops::stringify(value))
    }
}
