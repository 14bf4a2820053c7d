//! Row templates for a predicate editor.
//!
//! Describes which rows an editor front-end should offer for a registry:
//! an optional compound row (when nesting is enabled) followed by one
//! comparison row per criteria. The editor itself lives outside this crate.

use serde::Serialize;

use crate::ast::{CompoundKind, OperatorTag, ValueType};
use crate::criteria::CriteriaRegistry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RowTemplate {
    /// Row that groups other rows.
    Compound { kinds: Vec<CompoundKind> },
    /// Row comparing one criteria against a typed-in value.
    Comparison {
        criteria: String,
        value_type: ValueType,
        operators: Vec<OperatorTag>,
    },
}

impl CriteriaRegistry {
    /// Templates in the order an editor should install them.
    pub fn row_templates(&self) -> Vec<RowTemplate> {
        let mut templates = Vec::with_capacity(self.len() + 1);

        if self.is_nesting_enabled() {
            templates.push(RowTemplate::Compound {
                kinds: vec![CompoundKind::Or, CompoundKind::And],
            });
        }

        templates.extend(self.iter().map(|c| RowTemplate::Comparison {
            criteria: c.display_name.clone(),
            value_type: c.value_type,
            operators: c.operators.clone(),
        }));
        templates
    }
}
