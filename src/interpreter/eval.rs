use crate::ast::{BinOp, Expr, ExprKind, UnaryOp};
use crate::value::{ops, ArrayRef, BaseType, TypeInfo, Value};

use super::{Exec, Interpreter};

impl Interpreter {
    pub(crate) fn eval(&mut self, expr: &Expr) -> Exec<Value> {
        match &expr.kind {
            ExprKind::Literal(value, _) => Ok(value.clone()),
            ExprKind::Variable(name) => Ok(self.read_variable(name, expr.line, expr.column)?),
            ExprKind::ArrayLiteral(elements) => self.eval_array_literal(expr, elements),
            ExprKind::Index { target, index } => self.eval_index(expr, target, index),
            ExprKind::Call { name, args } => self.eval_call(expr, name, args),
            ExprKind::Unary { op, operand } => self.eval_unary(expr, *op, operand),
            ExprKind::Binary { op, left, right } => self.eval_binary(expr, *op, left, right),
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                if ops::truthy(&self.eval(cond)?) {
                    self.eval(then_expr)
                } else {
                    self.eval(else_expr)
                }
            }
        }
    }

    /// Elements take the base type of the first element; later elements are
    /// converted to it. The empty literal carries the void element type and
    /// adopts a concrete one on conversion into a typed slot.
    fn eval_array_literal(&mut self, expr: &Expr, elements: &[Expr]) -> Exec<Value> {
        if elements.is_empty() {
            return Ok(Value::Array(ArrayRef::new(BaseType::Void)));
        }

        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            values.push(self.eval(element)?);
        }

        if values.iter().any(Value::is_array) {
            return Err(self
                .runtime_error(expr.line, expr.column, "Nested arrays are not supported")
                .into());
        }

        let elem_type = values[0].base_type();
        let elem_ty = TypeInfo::scalar(elem_type);
        let converted = values
            .iter()
            .map(|v| ops::convert(v, elem_ty))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| self.runtime_error(expr.line, expr.column, e.to_string()))?;

        Ok(Value::Array(ArrayRef::from_values(elem_type, converted)))
    }

    fn eval_index(&mut self, expr: &Expr, target: &Expr, index: &Expr) -> Exec<Value> {
        let target = self.eval(target)?;
        let arr = match target {
            Value::Array(arr) => arr,
            other => {
                return Err(self
                    .runtime_error(
                        expr.line,
                        expr.column,
                        format!("Cannot index a value of type {}", other.base_type()),
                    )
                    .into())
            }
        };

        let index = self.eval(index)?;
        let index = ops::to_u64(&index)
            .map_err(|e| self.runtime_error(expr.line, expr.column, e.to_string()))?
            as usize;

        arr.get(index).ok_or_else(|| {
            self.runtime_error(
                expr.line,
                expr.column,
                format!("Array index out of bounds: {} (length {})", index, arr.len()),
            )
            .into()
        })
    }

    /// Call dispatch: array intrinsics shadow everything, then loaded
    /// procedures, then host-registered external functions.
    fn eval_call(&mut self, expr: &Expr, name: &str, args: &[Expr]) -> Exec<Value> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg)?);
        }

        match name {
            "len" | "push" | "pop" => return self.eval_builtin(expr, name, values),
            _ => {}
        }

        if let Some(proc) = self.procedure(name) {
            return Ok(self.call_procedure(&proc, &values)?);
        }

        if !self.external_fns.contains_key(name) {
            return Err(self
                .runtime_error(
                    expr.line,
                    expr.column,
                    format!("Undefined function: '{}'", name),
                )
                .into());
        }
        let result = self.external_fns.get_mut(name).unwrap()(&values);
        result.map_err(|msg| self.runtime_error(expr.line, expr.column, msg).into())
    }

    fn eval_builtin(&mut self, expr: &Expr, name: &str, mut args: Vec<Value>) -> Exec<Value> {
        match name {
            "len" => {
                if args.len() != 1 {
                    return Err(self
                        .runtime_error(
                            expr.line,
                            expr.column,
                            format!("len() takes 1 argument, got {}", args.len()),
                        )
                        .into());
                }
                match &args[0] {
                    Value::Array(arr) => Ok(Value::Int32(arr.len() as i32)),
                    _ => Err(self
                        .runtime_error(expr.line, expr.column, "len() requires an array argument")
                        .into()),
                }
            }
            "push" => {
                if args.len() != 2 {
                    return Err(self
                        .runtime_error(
                            expr.line,
                            expr.column,
                            format!("push() takes 2 arguments, got {}", args.len()),
                        )
                        .into());
                }
                let value = args.pop().unwrap();
                let arr = match args.pop().unwrap() {
                    Value::Array(arr) => arr,
                    _ => {
                        return Err(self
                            .runtime_error(
                                expr.line,
                                expr.column,
                                "push() requires an array as its first argument",
                            )
                            .into())
                    }
                };
                let converted = ops::convert(&value, TypeInfo::scalar(arr.elem_type()))
                    .map_err(|e| self.runtime_error(expr.line, expr.column, e.to_string()))?;
                let new_len = arr.push(converted);
                Ok(Value::Int32(new_len as i32))
            }
            "pop" => {
                if args.len() != 1 {
                    return Err(self
                        .runtime_error(
                            expr.line,
                            expr.column,
                            format!("pop() takes 1 argument, got {}", args.len()),
                        )
                        .into());
                }
                let arr = match args.pop().unwrap() {
                    Value::Array(arr) => arr,
                    _ => {
                        return Err(self
                            .runtime_error(
                                expr.line,
                                expr.column,
                                "pop() requires an array argument",
                            )
                            .into())
                    }
                };
                arr.pop().ok_or_else(|| {
                    self.runtime_error(expr.line, expr.column, "Cannot pop from an empty array")
                        .into()
                })
            }
            _ => unreachable!("not an array builtin: {}", name),
        }
    }

    fn eval_unary(&mut self, expr: &Expr, op: UnaryOp, operand: &Expr) -> Exec<Value> {
        let operand = self.eval(operand)?;
        let result = match op {
            UnaryOp::Negate => ops::negate(&operand),
            UnaryOp::Not => Ok(Value::Bool(!ops::truthy(&operand))),
            UnaryOp::BitNot => ops::bit_not(&operand),
        };
        result.map_err(|e| self.runtime_error(expr.line, expr.column, e.to_string()).into())
    }

    fn eval_binary(&mut self, expr: &Expr, op: BinOp, left: &Expr, right: &Expr) -> Exec<Value> {
        // && and || evaluate the right operand only when needed.
        match op {
            BinOp::And => {
                if !ops::truthy(&self.eval(left)?) {
                    return Ok(Value::Bool(false));
                }
                let right = self.eval(right)?;
                return Ok(Value::Bool(ops::truthy(&right)));
            }
            BinOp::Or => {
                if ops::truthy(&self.eval(left)?) {
                    return Ok(Value::Bool(true));
                }
                let right = self.eval(right)?;
                return Ok(Value::Bool(ops::truthy(&right)));
            }
            _ => {}
        }

        let left = self.eval(left)?;
        let right = self.eval(right)?;

        let result = match op {
            BinOp::Add => ops::add(&left, &right),
            BinOp::Sub => ops::subtract(&left, &right),
            BinOp::Mul => ops::multiply(&left, &right),
            BinOp::Div => ops::divide(&left, &right),
            BinOp::Mod => ops::modulo(&left, &right),
            BinOp::Eq => Ok(Value::Bool(ops::values_equal(&left, &right))),
            BinOp::Neq => Ok(Value::Bool(!ops::values_equal(&left, &right))),
            BinOp::Lt => ops::compare(&left, &right, "<").map(Value::Bool),
            BinOp::Lte => ops::compare(&left, &right, "<=").map(Value::Bool),
            BinOp::Gt => ops::compare(&left, &right, ">").map(Value::Bool),
            BinOp::Gte => ops::compare(&left, &right, ">=").map(Value::Bool),
            BinOp::BitAnd => ops::bitwise(&left, &right, "&"),
            BinOp::BitOr => ops::bitwise(&left, &right, "|"),
            BinOp::BitXor => ops::bitwise(&left, &right, "^"),
            BinOp::Shl => ops::bitwise(&left, &right, "<<"),
            BinOp::Shr => ops::bitwise(&left, &right, ">>"),
            BinOp::And | BinOp::Or => unreachable!(),
        };
        result.map_err(|e| self.runtime_error(expr.line, expr.column, e.to_string()).into())
    }
}
