//! JSON interchange form of expression trees.
//!
//! This is the shape an editor front-end hands over:
//!
//! ```json
//! {"type": "and", "children": [
//!   {"type": "comparison", "criteria": "First Name", "operator": "beginswith", "value": "Jo"}
//! ]}
//! ```
//!
//! Decoding is where foreign node kinds surface; anything other than
//! `and`, `or`, `not` or `comparison` is rejected.

use serde::{Deserialize, Serialize};

use crate::ast::{CompoundKind, Expr, OperatorTag};
use crate::error::{PredicateError, PredicateResult};

/// Loosely typed node as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<JsonNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl TryFrom<JsonNode> for Expr {
    type Error = PredicateError;

    fn try_from(node: JsonNode) -> PredicateResult<Self> {
        let kind = match node.kind.to_ascii_lowercase().as_str() {
            "and" => CompoundKind::And,
            "or" => CompoundKind::Or,
            "not" => CompoundKind::Not,
            "comparison" => return comparison(node),
            _ => return Err(PredicateError::unsupported(node.kind)),
        };

        let children = node
            .children
            .into_iter()
            .map(Expr::try_from)
            .collect::<PredicateResult<Vec<_>>>()?;
        Ok(Expr::compound(kind, children))
    }
}

fn comparison(node: JsonNode) -> PredicateResult<Expr> {
    let (Some(criteria), Some(operator), Some(value)) = (node.criteria, node.operator, node.value)
    else {
        return Err(PredicateError::unsupported(
            "comparison without criteria, operator or value",
        ));
    };
    let op = OperatorTag::from_name(&operator)
        .ok_or_else(|| PredicateError::unsupported(format!("comparison operator '{}'", operator)))?;

    Ok(Expr::compare(criteria, op, value))
}

impl From<&Expr> for JsonNode {
    fn from(expr: &Expr) -> Self {
        match expr {
            Expr::Compound(c) => JsonNode {
                kind: c.kind.to_string().to_ascii_lowercase(),
                children: c.children.iter().map(JsonNode::from).collect(),
                criteria: None,
                operator: None,
                value: None,
            },
            Expr::Comparison(c) => JsonNode {
                kind: "comparison".to_string(),
                children: Vec::new(),
                criteria: Some(c.criteria.clone()),
                operator: Some(c.operator.to_string()),
                value: Some(c.value.clone()),
            },
        }
    }
}

impl Expr {
    /// Decode a JSON expression tree.
    pub fn from_json(input: &str) -> PredicateResult<Self> {
        let node: JsonNode = serde_json::from_str(input)?;
        Expr::try_from(node)
    }

    /// Encode this tree in the JSON interchange form.
    pub fn to_json(&self) -> PredicateResult<String> {
        Ok(serde_json::to_string_pretty(&JsonNode::from(self))?)
    }
}
