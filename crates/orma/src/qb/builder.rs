//! Rendering of expression trees into SQL text plus arguments.
//!
//! One [`SqlBuilder`] is created per statement build. It owns the output
//! buffer and the argument list, and resolves logical field names to quoted
//! columns through the statement's model and the registry.

use super::assign::Assignment;
use super::column::{Aggregate, Column};
use super::expr::{BinaryExpr, Expr, Predicate};
use super::subquery::Subquery;
use super::table::TableRef;
use super::traits::Query;
use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::model::{Model, Registry};
use crate::value::Value;
use std::sync::Arc;

pub struct SqlBuilder<'a> {
    sql: String,
    args: Vec<Value>,
    model: Arc<Model>,
    dialect: &'a dyn Dialect,
    registry: &'a Registry,
    quote: char,
}

impl<'a> SqlBuilder<'a> {
    pub fn new(dialect: &'a dyn Dialect, registry: &'a Registry, model: Arc<Model>) -> Self {
        Self {
            sql: String::with_capacity(128),
            args: Vec::new(),
            model,
            quote: dialect.quote(),
            dialect,
            registry,
        }
    }

    /// Model of the statement being built.
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn dialect(&self) -> &'a dyn Dialect {
        self.dialect
    }

    pub fn push_str(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    pub fn push(&mut self, c: char) {
        self.sql.push(c);
    }

    /// Write an identifier wrapped in the dialect's quote character.
    pub fn quote(&mut self, name: &str) {
        self.sql.push(self.quote);
        self.sql.push_str(name);
        self.sql.push(self.quote);
    }

    /// Write the statement model's quoted table name.
    pub fn quote_table(&mut self) {
        let model = Arc::clone(&self.model);
        self.quote(&model.table_name);
    }

    /// Write a `?` placeholder bound to `value`.
    pub fn push_arg(&mut self, value: Value) {
        self.sql.push('?');
        self.args.push(value);
    }

    /// Terminate with `;` and hand out the result.
    pub fn finish(mut self) -> Query {
        self.sql.push(';');
        Query {
            sql: self.sql,
            args: self.args,
        }
    }

    /// Resolve a logical field name to its column name.
    pub fn col_name(&self, table: Option<&TableRef>, field: &str) -> OrmResult<String> {
        match table {
            None => self.model.column_of(field).map(str::to_string),
            Some(TableRef::Table(t)) => {
                let model = self.registry.get_type(t.entity)?;
                model.column_of(field).map(str::to_string)
            }
            Some(TableRef::Join(join)) => match self.col_name(Some(&join.left), field) {
                Ok(name) => Ok(name),
                Err(err) if err.is_unknown_field() => {
                    tracing::debug!(
                        target: "orma.builder",
                        field,
                        error = %err,
                        "field not on left side of join, trying right side"
                    );
                    self.col_name(Some(&join.right), field)
                }
                Err(err) => Err(err),
            },
            Some(TableRef::Subquery(sub)) => {
                if sub.columns.is_empty() {
                    return self.col_name(Some(&sub.table), field);
                }
                for c in &sub.columns {
                    if c.selected_alias() == Some(field) {
                        return Ok(field.to_string());
                    }
                    if let Expr::Column(inner) = c
                        && inner.name == field
                    {
                        let target = inner.table.as_ref().unwrap_or(&sub.table);
                        return self.col_name(Some(target), field);
                    }
                }
                Err(OrmError::unknown_field(field))
            }
        }
    }

    /// Write `` [`alias`.]`column` ``.
    pub fn build_column(&mut self, table: Option<&TableRef>, field: &str) -> OrmResult<()> {
        let name = self.col_name(table, field)?;
        if let Some(alias) = table.and_then(TableRef::alias) {
            self.quote(alias);
            self.sql.push('.');
        }
        self.quote(&name);
        Ok(())
    }

    fn build_column_ref(&mut self, c: &Column) -> OrmResult<()> {
        self.build_column(c.table.as_ref(), &c.name)
    }

    pub fn build_expression(&mut self, expr: &Expr) -> OrmResult<()> {
        match expr {
            Expr::Column(c) => self.build_column_ref(c),
            Expr::Value(v) => {
                self.push_arg(v.clone());
                Ok(())
            }
            Expr::Aggregate(a) => self.build_aggregate(a, false),
            Expr::Raw(r) => {
                self.sql.push_str(&r.sql);
                self.args.extend(r.args.iter().cloned());
                Ok(())
            }
            Expr::Math(m) => self.build_binary(&m.0),
            Expr::Predicate(p) => self.build_binary(&p.0),
            Expr::Binary(b) => self.build_binary(b),
            Expr::SubqueryPredicate(s) => {
                self.sql.push_str(s.keyword);
                self.sql.push(' ');
                self.build_subquery(&s.subquery, false)
            }
            Expr::Subquery(s) => self.build_subquery(s, false),
        }
    }

    fn build_binary(&mut self, e: &BinaryExpr) -> OrmResult<()> {
        let has_left = e.left.is_some();
        if let Some(left) = &e.left {
            self.build_sub_expr(left)?;
        }
        if let Some(op) = &e.op {
            if has_left {
                self.sql.push(' ');
            }
            self.sql.push_str(op.as_str());
        }
        if let Some(right) = &e.right {
            if has_left || e.op.is_some() {
                self.sql.push(' ');
            }
            self.build_sub_expr(right)?;
        }
        Ok(())
    }

    fn build_sub_expr(&mut self, e: &Expr) -> OrmResult<()> {
        if e.is_binary() {
            self.sql.push('(');
            self.build_expression(e)?;
            self.sql.push(')');
            Ok(())
        } else {
            self.build_expression(e)
        }
    }

    /// Conjunction of all predicates. Callers never pass an empty slice.
    pub fn build_predicates(&mut self, predicates: &[Predicate]) -> OrmResult<()> {
        let Some((first, rest)) = predicates.split_first() else {
            return Ok(());
        };
        let combined = rest
            .iter()
            .cloned()
            .fold(first.clone(), |acc, p| acc.and(p));
        self.build_binary(&combined.0)
    }

    pub fn build_aggregate(&mut self, a: &Aggregate, use_alias: bool) -> OrmResult<()> {
        self.sql.push_str(a.func);
        self.sql.push('(');
        self.build_column(a.table.as_ref(), &a.arg)?;
        self.sql.push(')');
        if use_alias {
            self.build_as(a.alias.as_deref());
        }
        Ok(())
    }

    fn build_as(&mut self, alias: Option<&str>) {
        if let Some(alias) = alias {
            self.sql.push_str(" AS ");
            self.quote(alias);
        }
    }

    /// Parenthesized inner SQL without its `;`, with its arguments merged.
    pub fn build_subquery(&mut self, sub: &Subquery, use_alias: bool) -> OrmResult<()> {
        let query = sub.statement.build()?;
        let inner = query.sql.strip_suffix(';').unwrap_or(&query.sql);
        self.sql.push('(');
        self.sql.push_str(inner);
        self.sql.push(')');
        self.args.extend(query.args);
        if use_alias {
            self.build_as(sub.alias.as_deref());
        }
        Ok(())
    }

    /// One projection entry: columns, aggregates, raw fragments and
    /// subqueries, with their aliases.
    pub(crate) fn build_selectable(&mut self, e: &Expr) -> OrmResult<()> {
        match e {
            Expr::Column(c) => {
                self.build_column_ref(c)?;
                self.build_as(c.alias.as_deref());
                Ok(())
            }
            Expr::Aggregate(a) => self.build_aggregate(a, true),
            Expr::Raw(_) => self.build_expression(e),
            Expr::Subquery(s) => self.build_subquery(s, true),
            other => Err(OrmError::UnsupportedExpression(format!("{other:?}"))),
        }
    }

    /// `` `column`=expression ``.
    pub fn build_assignment(&mut self, a: &Assignment) -> OrmResult<()> {
        self.build_column(None, &a.column)?;
        self.sql.push('=');
        self.build_expression(&a.value)
    }

    /// FROM target. `None` is the statement model's own table.
    pub(crate) fn build_table(&mut self, table: Option<&TableRef>) -> OrmResult<()> {
        match table {
            None => {
                self.quote_table();
                Ok(())
            }
            Some(TableRef::Table(t)) => {
                let model = self.registry.get_type(t.entity)?;
                self.quote(&model.table_name);
                self.build_as(t.alias.as_deref());
                Ok(())
            }
            Some(TableRef::Join(join)) => {
                self.sql.push('(');
                self.build_table(Some(&join.left))?;
                self.sql.push(' ');
                self.sql.push_str(join.kind.as_str());
                self.sql.push(' ');
                self.build_table(Some(&join.right))?;
                if !join.using.is_empty() {
                    self.sql.push_str(" USING (");
                    for (i, field) in join.using.iter().enumerate() {
                        if i > 0 {
                            self.sql.push(',');
                        }
                        let name = self.col_name(table, field)?;
                        self.quote(&name);
                    }
                    self.sql.push(')');
                }
                if !join.on.is_empty() {
                    self.sql.push_str(" ON ");
                    self.build_predicates(&join.on)?;
                }
                self.sql.push(')');
                Ok(())
            }
            Some(TableRef::Subquery(sub)) => self.build_subquery(sub, true),
        }
    }
}
