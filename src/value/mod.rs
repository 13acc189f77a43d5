/// Runtime value and type model.
///
/// Lives in its own module so the lexer-facing AST, the interpreter and the
/// manager facade can all import it without circular dependencies.
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

pub mod ops;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Base types of the script language. The declaration order of the integer
/// variants is the widening order used by binary arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BaseType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Double,
    Str,
    Bool,
    Void,
}

impl BaseType {
    pub fn name(&self) -> &'static str {
        match self {
            BaseType::Int8 => "int8",
            BaseType::UInt8 => "uint8",
            BaseType::Int16 => "int16",
            BaseType::UInt16 => "uint16",
            BaseType::Int32 => "int32",
            BaseType::UInt32 => "uint32",
            BaseType::Int64 => "int64",
            BaseType::UInt64 => "uint64",
            BaseType::Double => "double",
            BaseType::Str => "string",
            BaseType::Bool => "bool",
            BaseType::Void => "void",
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            BaseType::Int8
                | BaseType::UInt8
                | BaseType::Int16
                | BaseType::UInt16
                | BaseType::Int32
                | BaseType::UInt32
                | BaseType::Int64
                | BaseType::UInt64
        )
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            BaseType::UInt8 | BaseType::UInt16 | BaseType::UInt32 | BaseType::UInt64
        )
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || *self == BaseType::Double
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A declared type: base type plus one optional array dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    pub base: BaseType,
    pub is_array: bool,
}

impl TypeInfo {
    pub fn scalar(base: BaseType) -> Self {
        TypeInfo { base, is_array: false }
    }

    pub fn array(base: BaseType) -> Self {
        TypeInfo { base, is_array: true }
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_array {
            write!(f, "{}[]", self.base)
        } else {
            write!(f, "{}", self.base)
        }
    }
}

// ---------------------------------------------------------------------------
// OpError
// ---------------------------------------------------------------------------

/// A failure inside a value operation. Carries no source position; the
/// interpreter attaches the failing node's position and the procedure name.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct OpError(pub String);

impl OpError {
    pub fn new(msg: impl Into<String>) -> Self {
        OpError(msg.into())
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    Str(String),
    Bool(bool),
    Void,
    Array(ArrayRef),
}

impl Value {
    pub fn base_type(&self) -> BaseType {
        match self {
            Value::Int8(_) => BaseType::Int8,
            Value::UInt8(_) => BaseType::UInt8,
            Value::Int16(_) => BaseType::Int16,
            Value::UInt16(_) => BaseType::UInt16,
            Value::Int32(_) => BaseType::Int32,
            Value::UInt32(_) => BaseType::UInt32,
            Value::Int64(_) => BaseType::Int64,
            Value::UInt64(_) => BaseType::UInt64,
            Value::Double(_) => BaseType::Double,
            Value::Str(_) => BaseType::Str,
            Value::Bool(_) => BaseType::Bool,
            Value::Void => BaseType::Void,
            // Arrays report their element base; use `type_info` for the full shape.
            Value::Array(a) => a.elem_type(),
        }
    }

    pub fn type_info(&self) -> TypeInfo {
        match self {
            Value::Array(a) => TypeInfo::array(a.elem_type()),
            other => TypeInfo::scalar(other.base_type()),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }
}

// ---------------------------------------------------------------------------
// ArrayRef
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub struct ArrayData {
    pub elem_type: BaseType,
    pub elements: Vec<Value>,
}

/// Shared, mutable handle to a homogeneous array. Cloning shares the buffer,
/// so index assignment, `push` and `pop` are visible through every alias.
/// Elements are always scalars of `elem_type`; nesting is rejected before
/// construction, so reference cycles cannot form.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayRef(Rc<RefCell<ArrayData>>);

impl ArrayRef {
    pub fn new(elem_type: BaseType) -> Self {
        ArrayRef(Rc::new(RefCell::new(ArrayData {
            elem_type,
            elements: Vec::new(),
        })))
    }

    /// Wrap already-converted elements. Callers guarantee every element's
    /// base type equals `elem_type`.
    pub fn from_values(elem_type: BaseType, elements: Vec<Value>) -> Self {
        ArrayRef(Rc::new(RefCell::new(ArrayData { elem_type, elements })))
    }

    pub fn elem_type(&self) -> BaseType {
        self.0.borrow().elem_type
    }

    pub fn len(&self) -> usize {
        self.0.borrow().elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().elements.get(index).cloned()
    }

    /// Write in place. The value must already be converted to the element
    /// type. Returns false when the index is out of bounds.
    pub fn set(&self, index: usize, value: Value) -> bool {
        let mut data = self.0.borrow_mut();
        match data.elements.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Append an already-converted value and return the new length.
    pub fn push(&self, value: Value) -> usize {
        let mut data = self.0.borrow_mut();
        data.elements.push(value);
        data.elements.len()
    }

    pub fn pop(&self) -> Option<Value> {
        self.0.borrow_mut().elements.pop()
    }

    /// Snapshot of the elements (used by conversion and deep equality).
    pub fn elements(&self) -> Vec<Value> {
        self.0.borrow().elements.clone()
    }
}
