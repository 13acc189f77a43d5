/// Operations over runtime values: numeric promotion, comparison, bitwise
/// operators, conversion, truthiness and stringification.
///
/// Every fallible operation returns `OpError` without a source position; the
/// interpreter wraps failures with the position of the failing node.
use super::{ArrayRef, BaseType, OpError, TypeInfo, Value};

// ---------------------------------------------------------------------------
// Widening conversions
// ---------------------------------------------------------------------------

pub fn to_i64(val: &Value) -> Result<i64, OpError> {
    match val {
        Value::Int8(x) => Ok(*x as i64),
        Value::UInt8(x) => Ok(*x as i64),
        Value::Int16(x) => Ok(*x as i64),
        Value::UInt16(x) => Ok(*x as i64),
        Value::Int32(x) => Ok(*x as i64),
        Value::UInt32(x) => Ok(*x as i64),
        Value::Int64(x) => Ok(*x),
        Value::UInt64(x) => Ok(*x as i64),
        Value::Double(x) => Ok(*x as i64),
        Value::Bool(b) => Ok(if *b { 1 } else { 0 }),
        Value::Str(_) => Err(OpError::new("Cannot convert string to int64")),
        Value::Array(_) => Err(OpError::new("Cannot convert an array to a number")),
        Value::Void => Err(OpError::new("Cannot convert void to a number")),
    }
}

pub fn to_u64(val: &Value) -> Result<u64, OpError> {
    match val {
        Value::Int8(x) => Ok(*x as u64),
        Value::UInt8(x) => Ok(*x as u64),
        Value::Int16(x) => Ok(*x as u64),
        Value::UInt16(x) => Ok(*x as u64),
        Value::Int32(x) => Ok(*x as u64),
        Value::UInt32(x) => Ok(*x as u64),
        Value::Int64(x) => Ok(*x as u64),
        Value::UInt64(x) => Ok(*x),
        Value::Double(x) => Ok(*x as u64),
        Value::Bool(b) => Ok(if *b { 1 } else { 0 }),
        Value::Str(_) => Err(OpError::new("Cannot convert string to uint64")),
        Value::Array(_) => Err(OpError::new("Cannot convert an array to a number")),
        Value::Void => Err(OpError::new("Cannot convert void to a number")),
    }
}

pub fn to_f64(val: &Value) -> Result<f64, OpError> {
    match val {
        Value::Int8(x) => Ok(*x as f64),
        Value::UInt8(x) => Ok(*x as f64),
        Value::Int16(x) => Ok(*x as f64),
        Value::UInt16(x) => Ok(*x as f64),
        Value::Int32(x) => Ok(*x as f64),
        Value::UInt32(x) => Ok(*x as f64),
        Value::Int64(x) => Ok(*x as f64),
        Value::UInt64(x) => Ok(*x as f64),
        Value::Double(x) => Ok(*x),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Str(_) => Err(OpError::new("Cannot convert string to double")),
        Value::Array(_) => Err(OpError::new("Cannot convert an array to a number")),
        Value::Void => Err(OpError::new("Cannot convert void to a number")),
    }
}

pub fn truthy(val: &Value) -> bool {
    match val {
        Value::Bool(b) => *b,
        Value::Int8(x) => *x != 0,
        Value::UInt8(x) => *x != 0,
        Value::Int16(x) => *x != 0,
        Value::UInt16(x) => *x != 0,
        Value::Int32(x) => *x != 0,
        Value::UInt32(x) => *x != 0,
        Value::Int64(x) => *x != 0,
        Value::UInt64(x) => *x != 0,
        Value::Double(x) => *x != 0.0,
        Value::Str(s) => !s.is_empty(),
        Value::Array(_) => true,
        Value::Void => false,
    }
}

pub fn stringify(val: &Value) -> String {
    match val {
        Value::Int8(x) => x.to_string(),
        Value::UInt8(x) => x.to_string(),
        Value::Int16(x) => x.to_string(),
        Value::UInt16(x) => x.to_string(),
        Value::Int32(x) => x.to_string(),
        Value::UInt32(x) => x.to_string(),
        Value::Int64(x) => x.to_string(),
        Value::UInt64(x) => x.to_string(),
        Value::Double(x) => x.to_string(),
        Value::Str(s) => s.clone(),
        Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        Value::Void => "void".to_string(),
        Value::Array(_) => "[array]".to_string(),
    }
}

/// Human-readable representation for host-facing output; unlike `stringify`
/// this expands arrays and quotes nested strings.
pub fn repr(val: &Value) -> String {
    match val {
        Value::Array(a) => {
            let parts: Vec<String> = a.elements().iter().map(repr_inner).collect();
            format!("[{}]", parts.join(", "))
        }
        other => stringify(other),
    }
}

fn repr_inner(val: &Value) -> String {
    match val {
        Value::Str(s) => format!("\"{}\"", s),
        other => stringify(other),
    }
}

// ---------------------------------------------------------------------------
// Typed construction
// ---------------------------------------------------------------------------

/// Truncate a 64-bit signed result into the stated base type.
pub fn from_signed(base: BaseType, raw: i64) -> Value {
    match base {
        BaseType::Int8 => Value::Int8(raw as i8),
        BaseType::Int16 => Value::Int16(raw as i16),
        BaseType::Int32 => Value::Int32(raw as i32),
        BaseType::Int64 => Value::Int64(raw),
        BaseType::Bool => Value::Bool(raw != 0),
        _ => Value::Int32(raw as i32),
    }
}

/// Truncate a 64-bit unsigned result into the stated base type.
pub fn from_unsigned(base: BaseType, raw: u64) -> Value {
    match base {
        BaseType::UInt8 => Value::UInt8(raw as u8),
        BaseType::UInt16 => Value::UInt16(raw as u16),
        BaseType::UInt32 => Value::UInt32(raw as u32),
        BaseType::UInt64 => Value::UInt64(raw),
        _ => Value::UInt32(raw as u32),
    }
}

/// Default value of a declared type: zero for numerics, false, the empty
/// string, or a fresh empty array carrying the declared element type.
pub fn default_value(ty: TypeInfo) -> Value {
    if ty.is_array {
        return Value::Array(ArrayRef::new(ty.base));
    }
    match ty.base {
        BaseType::Int8 => Value::Int8(0),
        BaseType::UInt8 => Value::UInt8(0),
        BaseType::Int16 => Value::Int16(0),
        BaseType::UInt16 => Value::UInt16(0),
        BaseType::Int32 => Value::Int32(0),
        BaseType::UInt32 => Value::UInt32(0),
        BaseType::Int64 => Value::Int64(0),
        BaseType::UInt64 => Value::UInt64(0),
        BaseType::Double => Value::Double(0.0),
        BaseType::Str => Value::Str(String::new()),
        BaseType::Bool => Value::Bool(false),
        BaseType::Void => Value::Void,
    }
}

// ---------------------------------------------------------------------------
// Arithmetic with numeric promotion
// ---------------------------------------------------------------------------

/// Widening base for arithmetic: integer operands keep their own base,
/// everything else (bool) participates as int32.
fn arith_base(t: BaseType) -> BaseType {
    if t.is_integer() {
        t
    } else {
        BaseType::Int32
    }
}

fn wider(a: &Value, b: &Value) -> BaseType {
    arith_base(a.base_type()).max(arith_base(b.base_type()))
}

fn either_unsigned(a: &Value, b: &Value) -> bool {
    a.base_type().is_unsigned() || b.base_type().is_unsigned()
}

fn either_double(a: &Value, b: &Value) -> bool {
    matches!(a, Value::Double(_)) || matches!(b, Value::Double(_))
}

fn reject_array_arith(a: &Value, b: &Value, op: &str) -> Result<(), OpError> {
    if a.is_array() || b.is_array() {
        return Err(OpError::new(format!(
            "Operator '{}' cannot be applied to an array",
            op
        )));
    }
    Ok(())
}

pub fn add(a: &Value, b: &Value) -> Result<Value, OpError> {
    reject_array_arith(a, b, "+")?;

    // String concatenation wins over numeric promotion.
    if matches!(a, Value::Str(_)) || matches!(b, Value::Str(_)) {
        return Ok(Value::Str(format!("{}{}", stringify(a), stringify(b))));
    }
    if either_double(a, b) {
        return Ok(Value::Double(to_f64(a)? + to_f64(b)?));
    }
    if either_unsigned(a, b) {
        let result = to_u64(a)?.wrapping_add(to_u64(b)?);
        return Ok(from_unsigned(wider(a, b), result));
    }
    let result = to_i64(a)?.wrapping_add(to_i64(b)?);
    Ok(from_signed(wider(a, b), result))
}

pub fn subtract(a: &Value, b: &Value) -> Result<Value, OpError> {
    reject_array_arith(a, b, "-")?;
    if either_double(a, b) {
        return Ok(Value::Double(to_f64(a)? - to_f64(b)?));
    }
    if either_unsigned(a, b) {
        let result = to_u64(a)?.wrapping_sub(to_u64(b)?);
        return Ok(from_unsigned(wider(a, b), result));
    }
    let result = to_i64(a)?.wrapping_sub(to_i64(b)?);
    Ok(from_signed(wider(a, b), result))
}

pub fn multiply(a: &Value, b: &Value) -> Result<Value, OpError> {
    reject_array_arith(a, b, "*")?;
    if either_double(a, b) {
        return Ok(Value::Double(to_f64(a)? * to_f64(b)?));
    }
    if either_unsigned(a, b) {
        let result = to_u64(a)?.wrapping_mul(to_u64(b)?);
        return Ok(from_unsigned(wider(a, b), result));
    }
    let result = to_i64(a)?.wrapping_mul(to_i64(b)?);
    Ok(from_signed(wider(a, b), result))
}

pub fn divide(a: &Value, b: &Value) -> Result<Value, OpError> {
    reject_array_arith(a, b, "/")?;
    if either_double(a, b) {
        let divisor = to_f64(b)?;
        if divisor == 0.0 {
            return Err(OpError::new("Division by zero"));
        }
        return Ok(Value::Double(to_f64(a)? / divisor));
    }
    if either_unsigned(a, b) {
        let divisor = to_u64(b)?;
        if divisor == 0 {
            return Err(OpError::new("Division by zero"));
        }
        return Ok(from_unsigned(wider(a, b), to_u64(a)? / divisor));
    }
    let divisor = to_i64(b)?;
    if divisor == 0 {
        return Err(OpError::new("Division by zero"));
    }
    Ok(from_signed(wider(a, b), to_i64(a)?.wrapping_div(divisor)))
}

pub fn modulo(a: &Value, b: &Value) -> Result<Value, OpError> {
    reject_array_arith(a, b, "%")?;
    if either_double(a, b) {
        return Err(OpError::new("Modulo is not supported for double operands"));
    }
    if either_unsigned(a, b) {
        let divisor = to_u64(b)?;
        if divisor == 0 {
            return Err(OpError::new("Modulo by zero"));
        }
        return Ok(from_unsigned(wider(a, b), to_u64(a)? % divisor));
    }
    let divisor = to_i64(b)?;
    if divisor == 0 {
        return Err(OpError::new("Modulo by zero"));
    }
    Ok(from_signed(wider(a, b), to_i64(a)?.wrapping_rem(divisor)))
}

// ---------------------------------------------------------------------------
// Equality and ordering
// ---------------------------------------------------------------------------

/// Script `==`: strings with strings, booleans with booleans, arrays with
/// arrays (deep), everything else through numeric promotion. Shape
/// mismatches compare unequal rather than failing.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Void, Value::Void) => true,
        (Value::Array(x), Value::Array(y)) => {
            let xs = x.elements();
            let ys = y.elements();
            xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(x, y)| values_equal(x, y))
        }
        _ => {
            if !numeric_shape(a) || !numeric_shape(b) {
                return false;
            }
            if either_double(a, b) {
                // Both operands are numeric here, so widening cannot fail.
                return to_f64(a).unwrap_or(f64::NAN) == to_f64(b).unwrap_or(f64::NAN);
            }
            if either_unsigned(a, b) {
                return to_u64(a).unwrap_or(0) == to_u64(b).unwrap_or(0);
            }
            to_i64(a).unwrap_or(0) == to_i64(b).unwrap_or(0)
        }
    }
}

fn numeric_shape(v: &Value) -> bool {
    !matches!(
        v,
        Value::Str(_) | Value::Bool(_) | Value::Array(_) | Value::Void
    )
}

/// Script `<`, `<=`, `>`, `>=`.
pub fn compare(a: &Value, b: &Value, op: &str) -> Result<bool, OpError> {
    if a.is_array() || b.is_array() {
        return Err(OpError::new(format!(
            "Operator '{}' cannot be applied to an array",
            op
        )));
    }

    if let (Value::Str(x), Value::Str(y)) = (a, b) {
        return Ok(match op {
            "<" => x < y,
            "<=" => x <= y,
            ">" => x > y,
            ">=" => x >= y,
            _ => unreachable!("unexpected comparison operator {}", op),
        });
    }

    if either_double(a, b) {
        let x = to_f64(a)?;
        let y = to_f64(b)?;
        return Ok(match op {
            "<" => x < y,
            "<=" => x <= y,
            ">" => x > y,
            ">=" => x >= y,
            _ => unreachable!("unexpected comparison operator {}", op),
        });
    }

    let x = to_i64(a)?;
    let y = to_i64(b)?;
    Ok(match op {
        "<" => x < y,
        "<=" => x <= y,
        ">" => x > y,
        ">=" => x >= y,
        _ => unreachable!("unexpected comparison operator {}", op),
    })
}

// ---------------------------------------------------------------------------
// Bitwise operators
// ---------------------------------------------------------------------------

fn require_integers(a: &Value, b: &Value) -> Result<(), OpError> {
    if !a.base_type().is_integer() || !b.base_type().is_integer() || a.is_array() || b.is_array() {
        return Err(OpError::new("Bitwise operators require integer operands"));
    }
    Ok(())
}

/// `&`, `|`, `^`, `<<`, `>>`. Any unsigned operand makes the result a
/// 64-bit unsigned value; otherwise it is 64-bit signed. Shift amounts use
/// the host's 64-bit wrapping shift.
pub fn bitwise(a: &Value, b: &Value, op: &str) -> Result<Value, OpError> {
    require_integers(a, b)?;

    if either_unsigned(a, b) {
        let x = to_u64(a)?;
        let y = to_u64(b)?;
        let result = match op {
            "&" => x & y,
            "|" => x | y,
            "^" => x ^ y,
            "<<" => x.wrapping_shl(y as u32),
            ">>" => x.wrapping_shr(y as u32),
            _ => unreachable!("unexpected bitwise operator {}", op),
        };
        return Ok(Value::UInt64(result));
    }

    let x = to_i64(a)?;
    let y = to_i64(b)?;
    let result = match op {
        "&" => x & y,
        "|" => x | y,
        "^" => x ^ y,
        "<<" => x.wrapping_shl(y as u32),
        ">>" => x.wrapping_shr(y as u32),
        _ => unreachable!("unexpected bitwise operator {}", op),
    };
    Ok(Value::Int64(result))
}

pub fn bit_not(val: &Value) -> Result<Value, OpError> {
    if !val.base_type().is_integer() || val.is_array() {
        return Err(OpError::new("Bitwise operators require integer operands"));
    }
    if val.base_type().is_unsigned() {
        Ok(Value::UInt64(!to_u64(val)?))
    } else {
        Ok(Value::Int64(!to_i64(val)?))
    }
}

/// Unary minus: negate within the operand's declared width.
pub fn negate(val: &Value) -> Result<Value, OpError> {
    match val {
        Value::Int8(x) => Ok(Value::Int8(x.wrapping_neg())),
        Value::UInt8(x) => Ok(Value::UInt8(x.wrapping_neg())),
        Value::Int16(x) => Ok(Value::Int16(x.wrapping_neg())),
        Value::UInt16(x) => Ok(Value::UInt16(x.wrapping_neg())),
        Value::Int32(x) => Ok(Value::Int32(x.wrapping_neg())),
        Value::UInt32(x) => Ok(Value::UInt32(x.wrapping_neg())),
        Value::Int64(x) => Ok(Value::Int64(x.wrapping_neg())),
        Value::UInt64(x) => Ok(Value::UInt64(x.wrapping_neg())),
        Value::Double(x) => Ok(Value::Double(-x)),
        _ => Err(OpError::new("Cannot negate a non-numeric value")),
    }
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// Convert a value into the given declared type, as used by assignment into
/// typed slots, parameter binding and return values.
///
/// Array-to-array conversion with an identical element type returns the same
/// shared handle so aliasing survives parameter passing; a differing element
/// type produces a new buffer with every element converted.
pub fn convert(val: &Value, target: TypeInfo) -> Result<Value, OpError> {
    if target.is_array {
        let arr = match val {
            Value::Array(a) => a,
            _ => {
                return Err(OpError::new(format!(
                    "Cannot convert {} to array type {}",
                    val.base_type(),
                    target
                )))
            }
        };
        if arr.elem_type() == target.base {
            return Ok(val.clone());
        }
        let elem_ty = TypeInfo::scalar(target.base);
        let converted = arr
            .elements()
            .iter()
            .map(|e| convert(e, elem_ty))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Value::Array(ArrayRef::from_values(target.base, converted)));
    }

    if val.is_array() {
        return Err(OpError::new(format!(
            "Cannot convert an array to scalar type {}",
            target.base
        )));
    }
    if val.base_type() == target.base {
        return Ok(val.clone());
    }

    match target.base {
        BaseType::Int8 => Ok(Value::Int8(to_i64(val)? as i8)),
        BaseType::Int16 => Ok(Value::Int16(to_i64(val)? as i16)),
        BaseType::Int32 => Ok(Value::Int32(to_i64(val)? as i32)),
        BaseType::Int64 => Ok(Value::Int64(to_i64(val)?)),
        BaseType::UInt8 => Ok(Value::UInt8(to_u64(val)? as u8)),
        BaseType::UInt16 => Ok(Value::UInt16(to_u64(val)? as u16)),
        BaseType::UInt32 => Ok(Value::UInt32(to_u64(val)? as u32)),
        BaseType::UInt64 => Ok(Value::UInt64(to_u64(val)?)),
        BaseType::Double => Ok(Value::Double(to_f64(val)?)),
        BaseType::Str => Ok(Value::Str(stringify(val))),
        BaseType::Bool => Ok(Value::Bool(truthy(val))),
        BaseType::Void => Ok(val.clone()),
    }
}
