use crate::ast::{AssignOp, Expr, Stmt, StmtKind, SwitchCase};
use crate::value::{ops, TypeInfo, Value};

use super::{Exec, Flow, Interpreter};

impl Interpreter {
    pub(crate) fn execute(&mut self, stmt: &Stmt) -> Exec<()> {
        match &stmt.kind {
            StmtKind::Expression(expr) => {
                self.eval(expr)?;
                Ok(())
            }
            StmtKind::VarDecl { ty, name, init } => self.exec_var_decl(stmt, *ty, name, init),
            StmtKind::Assign { name, op, value } => self.exec_assign(stmt, name, *op, value),
            StmtKind::IndexAssign {
                target,
                index,
                value,
            } => self.exec_index_assign(stmt, target, index, value),
            StmtKind::Block(stmts) => {
                self.push_scope();
                let result = self.execute_all(stmts);
                self.pop_scope();
                result
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if ops::truthy(&self.eval(cond)?) {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            StmtKind::While { cond, body } => self.exec_while(cond, body),
            StmtKind::DoWhile { body, cond } => self.exec_do_while(body, cond),
            StmtKind::For {
                init,
                cond,
                incr,
                body,
            } => {
                // The initializer's bindings live in their own scope that also
                // encloses the body.
                self.push_scope();
                let result = self.exec_for(init.as_deref(), cond.as_ref(), incr.as_deref(), body);
                self.pop_scope();
                result
            }
            StmtKind::Switch { subject, cases } => self.exec_switch(subject, cases),
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Void,
                };
                Err(Flow::Return(value))
            }
            StmtKind::Break => Err(Flow::Break),
            StmtKind::Continue => Err(Flow::Continue),
        }
    }

    fn execute_all(&mut self, stmts: &[Stmt]) -> Exec<()> {
        for stmt in stmts {
            self.execute(stmt)?;
        }
        Ok(())
    }

    fn exec_var_decl(
        &mut self,
        stmt: &Stmt,
        ty: TypeInfo,
        name: &str,
        init: &Option<Expr>,
    ) -> Exec<()> {
        let value = match init {
            Some(expr) => {
                let value = self.eval(expr)?;
                ops::convert(&value, ty)
                    .map_err(|e| self.runtime_error(stmt.line, stmt.column, e.to_string()))?
            }
            None => ops::default_value(ty),
        };
        self.define(name.to_string(), value);
        Ok(())
    }

    fn exec_assign(&mut self, stmt: &Stmt, name: &str, op: AssignOp, value: &Expr) -> Exec<()> {
        let value = self.eval(value)?;

        let result = match op {
            AssignOp::Assign => value,
            compound => {
                let current = self.read_variable(name, stmt.line, stmt.column)?;
                let applied = match compound {
                    AssignOp::AddAssign => ops::add(&current, &value),
                    AssignOp::SubAssign => ops::subtract(&current, &value),
                    AssignOp::MulAssign => ops::multiply(&current, &value),
                    AssignOp::DivAssign => ops::divide(&current, &value),
                    AssignOp::Assign => unreachable!(),
                };
                applied.map_err(|e| self.runtime_error(stmt.line, stmt.column, e.to_string()))?
            }
        };

        self.write_variable(name, result, stmt.line, stmt.column)?;
        Ok(())
    }

    fn exec_index_assign(
        &mut self,
        stmt: &Stmt,
        target: &Expr,
        index: &Expr,
        value: &Expr,
    ) -> Exec<()> {
        let target = self.eval(target)?;
        let arr = match target {
            Value::Array(arr) => arr,
            other => {
                return Err(self
                    .runtime_error(
                        stmt.line,
                        stmt.column,
                        format!("Cannot index a value of type {}", other.base_type()),
                    )
                    .into())
            }
        };

        let index = self.eval(index)?;
        let index = ops::to_u64(&index)
            .map_err(|e| self.runtime_error(stmt.line, stmt.column, e.to_string()))?
            as usize;

        let value = self.eval(value)?;
        let converted = ops::convert(&value, TypeInfo::scalar(arr.elem_type()))
            .map_err(|e| self.runtime_error(stmt.line, stmt.column, e.to_string()))?;

        if !arr.set(index, converted) {
            return Err(self
                .runtime_error(
                    stmt.line,
                    stmt.column,
                    format!("Array index out of bounds: {} (length {})", index, arr.len()),
                )
                .into());
        }
        Ok(())
    }

    fn exec_while(&mut self, cond: &Expr, body: &Stmt) -> Exec<()> {
        loop {
            if !ops::truthy(&self.eval(cond)?) {
                return Ok(());
            }
            match self.execute(body) {
                Ok(()) | Err(Flow::Continue) => {}
                Err(Flow::Break) => return Ok(()),
                Err(other) => return Err(other),
            }
        }
    }

    fn exec_do_while(&mut self, body: &Stmt, cond: &Expr) -> Exec<()> {
        loop {
            match self.execute(body) {
                Ok(()) | Err(Flow::Continue) => {}
                Err(Flow::Break) => return Ok(()),
                Err(other) => return Err(other),
            }
            if !ops::truthy(&self.eval(cond)?) {
                return Ok(());
            }
        }
    }

    fn exec_for(
        &mut self,
        init: Option<&Stmt>,
        cond: Option<&Expr>,
        incr: Option<&Stmt>,
        body: &Stmt,
    ) -> Exec<()> {
        if let Some(init) = init {
            self.execute(init)?;
        }

        loop {
            if let Some(cond) = cond {
                if !ops::truthy(&self.eval(cond)?) {
                    return Ok(());
                }
            }

            match self.execute(body) {
                // Continue falls through to the increment.
                Ok(()) | Err(Flow::Continue) => {}
                Err(Flow::Break) => return Ok(()),
                Err(other) => return Err(other),
            }

            if let Some(incr) = incr {
                self.execute(incr)?;
            }
        }
    }

    /// C-style switch: the control expression is evaluated once, the first
    /// matching case (or `default`) starts execution, and statements fall
    /// through subsequent cases until `break`.
    fn exec_switch(&mut self, subject: &Expr, cases: &[SwitchCase]) -> Exec<()> {
        let subject = self.eval(subject)?;

        let mut start = None;
        for (i, case) in cases.iter().enumerate() {
            if let Some(value) = &case.value {
                let value = self.eval(value)?;
                if ops::values_equal(&subject, &value) {
                    start = Some(i);
                    break;
                }
            }
        }
        let start = match start.or_else(|| cases.iter().position(|c| c.value.is_none())) {
            Some(i) => i,
            None => return Ok(()),
        };

        self.push_scope();
        let mut result: Exec<()> = Ok(());
        for case in &cases[start..] {
            result = self.execute_all(&case.body);
            if result.is_err() {
                break;
            }
        }
        self.pop_scope();

        match result {
            Err(Flow::Break) => Ok(()),
            other => other,
        }
    }
}
