use serde::{Deserialize, Serialize};

/// Comparison operator a criteria can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatorTag {
    Equal,
    NotEqual,
    Contains,
    BeginsWith,
    EndsWith,
}

impl OperatorTag {
    pub const ALL: [OperatorTag; 5] = [
        OperatorTag::Equal,
        OperatorTag::NotEqual,
        OperatorTag::Contains,
        OperatorTag::BeginsWith,
        OperatorTag::EndsWith,
    ];

    /// Look up an operator by any of its accepted spellings.
    ///
    /// Accepts symbols (`=`, `==`, `!=`, `<>`), predicate keywords
    /// (`CONTAINS`, `BEGINSWITH`, `ENDSWITH`) and the enum names
    /// (`EQUAL`, `NOT_EQUAL`, ...), case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let op = match name.trim().to_ascii_lowercase().as_str() {
            "=" | "==" | "eq" | "equal" => OperatorTag::Equal,
            "!=" | "<>" | "ne" | "not_equal" | "notequal" => OperatorTag::NotEqual,
            "contains" => OperatorTag::Contains,
            "beginswith" | "begins_with" => OperatorTag::BeginsWith,
            "endswith" | "ends_with" => OperatorTag::EndsWith,
            _ => return None,
        };
        Some(op)
    }

    /// Entry of the operator table for this tag.
    pub fn sql(self) -> &'static OperatorSql {
        &OPERATOR_TABLE[self as usize]
    }

    /// Spelling used by the text predicate syntax.
    pub fn keyword(&self) -> &'static str {
        match self {
            OperatorTag::Equal => "=",
            OperatorTag::NotEqual => "!=",
            OperatorTag::Contains => "CONTAINS",
            OperatorTag::BeginsWith => "BEGINSWITH",
            OperatorTag::EndsWith => "ENDSWITH",
        }
    }
}

impl std::fmt::Display for OperatorTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperatorTag::Equal => write!(f, "EQUAL"),
            OperatorTag::NotEqual => write!(f, "NOT_EQUAL"),
            OperatorTag::Contains => write!(f, "CONTAINS"),
            OperatorTag::BeginsWith => write!(f, "BEGINS_WITH"),
            OperatorTag::EndsWith => write!(f, "ENDS_WITH"),
        }
    }
}

/// How a comparison value is wrapped before quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTemplate {
    /// `value`
    Exact,
    /// `value%`
    Prefix,
    /// `%value`
    Suffix,
    /// `%value%`
    Substring,
}

impl ValueTemplate {
    /// Format a raw value into this template.
    pub fn apply(&self, value: &str) -> String {
        match self {
            ValueTemplate::Exact => value.to_string(),
            ValueTemplate::Prefix => format!("{}%", value),
            ValueTemplate::Suffix => format!("%{}", value),
            ValueTemplate::Substring => format!("%{}%", value),
        }
    }
}

impl std::fmt::Display for ValueTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.apply("value"))
    }
}

/// SQL spelling and value template of one operator.
#[derive(Debug, PartialEq, Eq)]
pub struct OperatorSql {
    pub tag: OperatorTag,
    pub sql: &'static str,
    pub template: ValueTemplate,
}

/// Indexed by `OperatorTag` discriminant.
pub static OPERATOR_TABLE: [OperatorSql; 5] = [
    OperatorSql {
        tag: OperatorTag::Equal,
        sql: "=",
        template: ValueTemplate::Exact,
    },
    OperatorSql {
        tag: OperatorTag::NotEqual,
        sql: "!=",
        template: ValueTemplate::Exact,
    },
    OperatorSql {
        tag: OperatorTag::Contains,
        sql: "LIKE",
        template: ValueTemplate::Substring,
    },
    OperatorSql {
        tag: OperatorTag::BeginsWith,
        sql: "LIKE",
        template: ValueTemplate::Prefix,
    },
    OperatorSql {
        tag: OperatorTag::EndsWith,
        sql: "LIKE",
        template: ValueTemplate::Suffix,
    },
];

/// Logical connective of a compound expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompoundKind {
    And,
    Or,
    Not,
}

impl std::fmt::Display for CompoundKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompoundKind::And => write!(f, "AND"),
            CompoundKind::Or => write!(f, "OR"),
            CompoundKind::Not => write!(f, "NOT"),
        }
    }
}

/// Attribute type of a criteria's value.
///
/// Only `String` can be registered; the rest exist so configuration
/// naming them fails loudly instead of being misread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    String,
    Integer,
    Decimal,
    Boolean,
    Date,
}

impl ValueType {
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name.trim().to_ascii_lowercase().as_str() {
            "string" | "text" => ValueType::String,
            "integer" | "int" => ValueType::Integer,
            "decimal" | "float" => ValueType::Decimal,
            "boolean" | "bool" => ValueType::Boolean,
            "date" => ValueType::Date,
            _ => return None,
        };
        Some(ty)
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, ValueType::String)
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::String => write!(f, "STRING"),
            ValueType::Integer => write!(f, "INTEGER"),
            ValueType::Decimal => write!(f, "DECIMAL"),
            ValueType::Boolean => write!(f, "BOOLEAN"),
            ValueType::Date => write!(f, "DATE"),
        }
    }
}
