//! SQL transpiler for predicate expressions.
//!
//! Renders an [`Expr`] tree as a SQL boolean expression suitable for use
//! after `WHERE`. Every compound is wrapped in one pair of parentheses,
//! comparison values are always double-quoted, and display names are
//! resolved to backing columns through a [`CriteriaRegistry`].
//!
//! | Operator      | SQL    | Value     |
//! |---------------|--------|-----------|
//! | `EQUAL`       | `=`    | `value`   |
//! | `NOT_EQUAL`   | `!=`   | `value`   |
//! | `BEGINS_WITH` | `LIKE` | `value%`  |
//! | `ENDS_WITH`   | `LIKE` | `%value`  |
//! | `CONTAINS`    | `LIKE` | `%value%` |

#[cfg(test)]
mod tests;

use tracing::debug;

use crate::ast::*;
use crate::criteria::CriteriaRegistry;
use crate::error::{PredicateError, PredicateResult};

/// Trait for converting expression nodes to SQL.
pub trait ToSql {
    /// Convert this node to a SQL string, resolving names through `criteria`.
    fn to_sql(&self, criteria: &CriteriaRegistry) -> PredicateResult<String>;
}

impl ToSql for Expr {
    fn to_sql(&self, criteria: &CriteriaRegistry) -> PredicateResult<String> {
        Translator::new(criteria).translate(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Reject comparisons using an operator the criteria does not offer.
    pub strict_operators: bool,
    /// Render the root compound without its surrounding parentheses.
    pub strip_outer_parens: bool,
}

/// Renders expression trees against one registry.
///
/// Holds a shared borrow of the registry, so the registry cannot change
/// while a translator exists.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    registry: &'a CriteriaRegistry,
    options: TranslateOptions,
}

impl<'a> Translator<'a> {
    pub fn new(registry: &'a CriteriaRegistry) -> Self {
        Self::with_options(registry, TranslateOptions::default())
    }

    pub fn with_options(registry: &'a CriteriaRegistry, options: TranslateOptions) -> Self {
        Self { registry, options }
    }

    pub fn strict_operators(mut self, strict: bool) -> Self {
        self.options.strict_operators = strict;
        self
    }

    pub fn strip_outer_parens(mut self, strip: bool) -> Self {
        self.options.strip_outer_parens = strip;
        self
    }

    pub fn options(&self) -> TranslateOptions {
        self.options
    }

    /// Translate a whole tree.
    pub fn translate(&self, expr: &Expr) -> PredicateResult<String> {
        match expr {
            Expr::Compound(c) if self.options.strip_outer_parens => self.compound_body(c, 1),
            _ => self.render(expr, 0),
        }
    }

    fn render(&self, expr: &Expr, depth: usize) -> PredicateResult<String> {
        match expr {
            Expr::Compound(c) => Ok(format!("({})", self.compound_body(c, depth + 1)?)),
            Expr::Comparison(c) => self.comparison(c),
        }
    }

    /// Children joined by the connective, without the wrapping parentheses.
    /// `depth` counts this compound.
    fn compound_body(&self, compound: &Compound, depth: usize) -> PredicateResult<String> {
        if depth > MAX_DEPTH {
            return Err(PredicateError::NestingTooDeep { limit: MAX_DEPTH });
        }
        let n = compound.children.len();
        if n == 0 || (compound.kind == CompoundKind::Not && n != 1) {
            return Err(PredicateError::MalformedCompound {
                kind: compound.kind,
                children: n,
            });
        }

        let clauses = compound
            .children
            .iter()
            .map(|child| self.render(child, depth))
            .collect::<PredicateResult<Vec<_>>>()?;

        Ok(match compound.kind {
            CompoundKind::And => clauses.join(" AND "),
            CompoundKind::Or => clauses.join(" OR "),
            CompoundKind::Not => format!("NOT {}", clauses[0]),
        })
    }

    fn comparison(&self, cmp: &Comparison) -> PredicateResult<String> {
        let descriptor = self.registry.descriptor(&cmp.criteria).ok_or_else(|| {
            PredicateError::UnknownCriteria {
                name: cmp.criteria.clone(),
                suggestion: self.registry.suggest(&cmp.criteria).map(str::to_string),
            }
        })?;

        if self.options.strict_operators && !descriptor.supports(cmp.operator) {
            return Err(PredicateError::UnsupportedOperator {
                criteria: cmp.criteria.clone(),
                operator: cmp.operator,
            });
        }

        let op = cmp.operator.sql();
        let value = op.template.apply(&cmp.value);
        debug!(
            "Comparison: {} {} {}",
            descriptor.backing_name, op.sql, value
        );

        Ok(format!("{} {} \"{}\"", descriptor.backing_name, op.sql, value))
    }
}
