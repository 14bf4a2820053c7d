use crate::ast::{CompoundKind, OperatorTag};

/// Deepest run of groups and negations the text parser accepts.
pub const MAX_NESTING: usize = 64;

/// Deepest compound nesting the translator renders. Every tree the text
/// parser accepts fits.
pub const MAX_DEPTH: usize = 2 * MAX_NESTING;

/// A node of a predicate expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// AND / OR / NOT over child expressions.
    Compound(Compound),
    /// Leaf comparison against a named criteria.
    Comparison(Comparison),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Compound {
    pub kind: CompoundKind,
    pub children: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Display name of the criteria, resolved through the registry.
    pub criteria: String,
    pub operator: OperatorTag,
    pub value: String,
}

impl Expr {
    pub fn and(children: impl IntoIterator<Item = Expr>) -> Self {
        Self::compound(CompoundKind::And, children)
    }

    pub fn or(children: impl IntoIterator<Item = Expr>) -> Self {
        Self::compound(CompoundKind::Or, children)
    }

    pub fn not(child: Expr) -> Self {
        Self::compound(CompoundKind::Not, [child])
    }

    pub fn compound(kind: CompoundKind, children: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Compound(Compound {
            kind,
            children: children.into_iter().collect(),
        })
    }

    /// Build a comparison leaf.
    pub fn compare(
        criteria: impl Into<String>,
        operator: OperatorTag,
        value: impl Into<String>,
    ) -> Self {
        Expr::Comparison(Comparison {
            criteria: criteria.into(),
            operator,
            value: value.into(),
        })
    }

    /// Number of comparison leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Expr::Comparison(_) => 1,
            Expr::Compound(c) => c.children.iter().map(Expr::leaf_count).sum(),
        }
    }

    /// Display names referenced by the tree, in visit order.
    pub fn criteria_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expr::Comparison(c) => names.push(&c.criteria),
            Expr::Compound(c) => {
                for child in &c.children {
                    child.collect_names(names);
                }
            }
        }
    }
}

/// Renders the text predicate syntax.
///
/// The output parses back to an equivalent tree. Shapes the text syntax
/// cannot spell come back normalized: a single-child AND/OR reparses as
/// its child, and a NOT over several children reparses as NOT over an AND.
impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Comparison(c) => write!(
                f,
                "{} {} {}",
                quote(&c.criteria),
                c.operator.keyword(),
                quote(&c.value)
            ),
            Expr::Compound(c) if c.kind == CompoundKind::Not => {
                f.write_str("NOT (")?;
                for (i, child) in c.children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" AND ")?;
                    }
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
            Expr::Compound(c) => {
                f.write_str("(")?;
                for (i, child) in c.children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", c.kind)?;
                    }
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
        }
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
