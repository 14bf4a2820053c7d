//! # predicate-sql
//!
//! Describe search criteria, let an editor build a predicate, get a SQL
//! WHERE clause back.
//!
//! ## Quick Example
//!
//! ```rust
//! use predicate_sql::prelude::*;
//!
//! let mut criteria = CriteriaRegistry::new();
//! criteria
//!     .add_mapped_criteria_with(
//!         "First Name",
//!         "firstname",
//!         ValueType::String,
//!         [OperatorTag::Equal, OperatorTag::BeginsWith],
//!     )
//!     .unwrap();
//! criteria
//!     .add_mapped_criteria_with(
//!         "Last Name",
//!         "lastname",
//!         ValueType::String,
//!         [OperatorTag::NotEqual, OperatorTag::Contains],
//!     )
//!     .unwrap();
//!
//! let expr = Expr::and([
//!     Expr::compare("First Name", OperatorTag::BeginsWith, "Jo"),
//!     Expr::compare("Last Name", OperatorTag::Contains, "Smith"),
//! ]);
//!
//! assert_eq!(
//!     expr.to_sql(&criteria).unwrap(),
//!     r#"(firstname LIKE "Jo%" AND lastname LIKE "%Smith%")"#
//! );
//! ```
//!
//! ## Operators
//!
//! | Operator      | Text syntax  | SQL                 |
//! |---------------|--------------|---------------------|
//! | `EQUAL`       | `=`          | `col = "value"`     |
//! | `NOT_EQUAL`   | `!=`         | `col != "value"`    |
//! | `CONTAINS`    | `CONTAINS`   | `col LIKE "%value%"` |
//! | `BEGINS_WITH` | `BEGINSWITH` | `col LIKE "value%"` |
//! | `ENDS_WITH`   | `ENDSWITH`   | `col LIKE "%value"` |

pub mod ast;
pub mod config;
pub mod criteria;
pub mod error;
pub mod parser;
pub mod templates;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::criteria::{CriteriaDescriptor, CriteriaRegistry};
    pub use crate::error::*;
    pub use crate::parser::parse;
    pub use crate::templates::RowTemplate;
    pub use crate::transpiler::{ToSql, TranslateOptions, Translator};
}

/// Parse a textual predicate into an expression tree.
///
/// # Example
///
/// ```
/// use predicate_sql::parse;
///
/// let expr = parse(r#"zipcode = "02139""#).unwrap();
/// assert_eq!(expr.criteria_names(), vec!["zipcode"]);
/// ```
pub fn parse(input: &str) -> Result<ast::Expr, error::PredicateError> {
    parser::parse(input)
}

/// Parse a textual predicate and translate it in one step.
pub fn translate(
    input: &str,
    criteria: &criteria::CriteriaRegistry,
) -> Result<String, error::PredicateError> {
    transpiler::Translator::new(criteria).translate(&parse(input)?)
}
