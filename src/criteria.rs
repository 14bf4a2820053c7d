//! Criteria registry.
//!
//! Holds the searchable fields an editor may offer, in registration order,
//! and resolves display names to backing column names during translation.
//!
//! ```
//! use predicate_sql::prelude::*;
//!
//! let mut registry = CriteriaRegistry::new();
//! registry
//!     .add_mapped_criteria_with(
//!         "Last Name",
//!         "lastname",
//!         ValueType::String,
//!         [OperatorTag::NotEqual, OperatorTag::Contains],
//!     )
//!     .unwrap();
//! registry.add_criteria("zipcode").unwrap();
//!
//! assert_eq!(registry.resolve_backing_name("Last Name"), Some("lastname"));
//! assert_eq!(registry.resolve_backing_name("zipcode"), Some("zipcode"));
//! ```

use serde::Serialize;
use strsim::levenshtein;
use tracing::{debug, warn};

use crate::ast::{OperatorTag, ValueType};
use crate::error::{PredicateError, PredicateResult};

/// One searchable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriteriaDescriptor {
    pub display_name: String,
    pub backing_name: String,
    pub value_type: ValueType,
    pub operators: Vec<OperatorTag>,
}

impl CriteriaDescriptor {
    pub fn supports(&self, op: OperatorTag) -> bool {
        self.operators.contains(&op)
    }

    pub fn is_mapped(&self) -> bool {
        self.display_name != self.backing_name
    }
}

/// Ordered set of criteria plus the editor's nesting flag.
#[derive(Debug, Clone)]
pub struct CriteriaRegistry {
    criteria: Vec<CriteriaDescriptor>,
    nesting: bool,
    unique_names: bool,
}

impl Default for CriteriaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CriteriaRegistry {
    /// Create an empty registry with nesting enabled.
    pub fn new() -> Self {
        Self {
            criteria: Vec::new(),
            nesting: true,
            unique_names: false,
        }
    }

    /// Register a string criteria offering only `EQUAL`, shown under its column name.
    pub fn add_criteria(&mut self, name: impl Into<String>) -> PredicateResult<()> {
        self.add_criteria_with(name, ValueType::String, [OperatorTag::Equal])
    }

    /// Register a criteria shown under its column name.
    pub fn add_criteria_with(
        &mut self,
        name: impl Into<String>,
        value_type: ValueType,
        operators: impl IntoIterator<Item = OperatorTag>,
    ) -> PredicateResult<()> {
        let name = name.into();
        self.add_mapped_criteria_with(name.clone(), name, value_type, operators)
    }

    /// Register a string criteria offering only `EQUAL` under a display name.
    pub fn add_mapped_criteria(
        &mut self,
        display_name: impl Into<String>,
        backing_name: impl Into<String>,
    ) -> PredicateResult<()> {
        self.add_mapped_criteria_with(
            display_name,
            backing_name,
            ValueType::String,
            [OperatorTag::Equal],
        )
    }

    /// Register a criteria whose display name differs from its column name.
    ///
    /// Fails with [`PredicateError::Configuration`] for a non-string type, an
    /// empty operator set, or (in unique-names mode) a display name that is
    /// already registered. A failed call leaves the registry unchanged.
    pub fn add_mapped_criteria_with(
        &mut self,
        display_name: impl Into<String>,
        backing_name: impl Into<String>,
        value_type: ValueType,
        operators: impl IntoIterator<Item = OperatorTag>,
    ) -> PredicateResult<()> {
        let display_name = display_name.into();
        let backing_name = backing_name.into();

        if !value_type.is_supported() {
            return Err(PredicateError::config(format!(
                "Unsupported criteria type {} for '{}'",
                value_type, display_name
            )));
        }

        let mut ops: Vec<OperatorTag> = Vec::new();
        for op in operators {
            if !ops.contains(&op) {
                ops.push(op);
            }
        }
        if ops.is_empty() {
            return Err(PredicateError::config(format!(
                "Criteria '{}' must support at least one operator",
                display_name
            )));
        }

        if self.descriptor(&display_name).is_some() {
            if self.unique_names {
                return Err(PredicateError::config(format!(
                    "Duplicate criteria '{}'",
                    display_name
                )));
            }
            warn!(
                "Criteria '{}' registered twice; lookups resolve to the first",
                display_name
            );
        }

        debug!(
            "Registered criteria '{}' -> {} ({} operator(s))",
            display_name,
            backing_name,
            ops.len()
        );
        self.criteria.push(CriteriaDescriptor {
            display_name,
            backing_name,
            value_type,
            operators: ops,
        });
        Ok(())
    }

    /// Backing column for a display name, first match in registration order.
    pub fn resolve_backing_name(&self, display_name: &str) -> Option<&str> {
        self.descriptor(display_name)
            .map(|c| c.backing_name.as_str())
    }

    pub fn descriptor(&self, display_name: &str) -> Option<&CriteriaDescriptor> {
        self.criteria
            .iter()
            .find(|c| c.display_name == display_name)
    }

    pub fn is_nesting_enabled(&self) -> bool {
        self.nesting
    }

    pub fn set_nesting_enabled(&mut self, nesting: bool) {
        self.nesting = nesting;
    }

    pub fn unique_names(&self) -> bool {
        self.unique_names
    }

    /// Reject duplicate display names from now on.
    pub fn set_unique_names(&mut self, unique: bool) {
        self.unique_names = unique;
    }

    /// Display names registered more than once, each listed once.
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut dups: Vec<&str> = Vec::new();
        for (i, c) in self.criteria.iter().enumerate() {
            let name = c.display_name.as_str();
            if !dups.contains(&name)
                && self.criteria[..i].iter().any(|p| p.display_name == name)
            {
                dups.push(name);
            }
        }
        dups
    }

    /// Fail if any display name is shadowed by an earlier registration.
    pub fn validate(&self) -> PredicateResult<()> {
        let dups = self.duplicate_names();
        if dups.is_empty() {
            Ok(())
        } else {
            Err(PredicateError::config(format!(
                "Duplicate criteria: {}",
                dups.join(", ")
            )))
        }
    }

    /// Closest registered display name, if one is near enough to be a typo.
    pub fn suggest(&self, input: &str) -> Option<&str> {
        let threshold = match input.chars().count() {
            0..=2 => 0,
            3..=5 => 2,
            _ => 3,
        };

        let mut best = None;
        let mut min_dist = usize::MAX;
        for c in &self.criteria {
            let dist = levenshtein(input, &c.display_name);
            if dist <= threshold && dist < min_dist {
                min_dist = dist;
                best = Some(c.display_name.as_str());
            }
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = &CriteriaDescriptor> {
        self.criteria.iter()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> CriteriaRegistry {
        let mut r = CriteriaRegistry::new();
        r.add_mapped_criteria_with(
            "First Name",
            "firstname",
            ValueType::String,
            [OperatorTag::Equal, OperatorTag::BeginsWith],
        )
        .unwrap();
        r.add_mapped_criteria_with(
            "Last Name",
            "lastname",
            ValueType::String,
            [OperatorTag::NotEqual, OperatorTag::Contains],
        )
        .unwrap();
        r.add_criteria("zipcode").unwrap();
        r
    }

    #[test]
    fn test_resolve_mapped_and_plain() {
        let r = people();
        assert_eq!(r.resolve_backing_name("Last Name"), Some("lastname"));
        assert_eq!(r.resolve_backing_name("zipcode"), Some("zipcode"));
        assert_eq!(r.resolve_backing_name("lastname"), None);
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn test_defaults() {
        let r = people();
        let zip = r.descriptor("zipcode").unwrap();
        assert_eq!(zip.value_type, ValueType::String);
        assert_eq!(zip.operators, vec![OperatorTag::Equal]);
        assert!(!zip.is_mapped());
        assert!(r.is_nesting_enabled());
    }

    #[test]
    fn test_rejects_non_string_type() {
        let mut r = people();
        let err = r
            .add_criteria_with("age", ValueType::Integer, [OperatorTag::Equal])
            .unwrap_err();
        assert!(matches!(err, PredicateError::Configuration(_)));
        assert_eq!(r.len(), 3);
        assert_eq!(r.resolve_backing_name("age"), None);
    }

    #[test]
    fn test_rejects_empty_operators() {
        let mut r = CriteriaRegistry::new();
        let err = r
            .add_mapped_criteria_with("City", "city", ValueType::String, [])
            .unwrap_err();
        assert!(matches!(err, PredicateError::Configuration(_)));
        assert!(r.is_empty());
    }

    #[test]
    fn test_operators_deduplicated_in_order() {
        let mut r = CriteriaRegistry::new();
        r.add_criteria_with(
            "city",
            ValueType::String,
            [OperatorTag::Contains, OperatorTag::Equal, OperatorTag::Contains],
        )
        .unwrap();
        assert_eq!(
            r.descriptor("city").unwrap().operators,
            vec![OperatorTag::Contains, OperatorTag::Equal]
        );
    }

    #[test]
    fn test_duplicate_first_match_wins() {
        let mut r = people();
        r.add_mapped_criteria("Last Name", "surname").unwrap();
        assert_eq!(r.resolve_backing_name("Last Name"), Some("lastname"));
        assert_eq!(r.duplicate_names(), vec!["Last Name"]);
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_unique_names_mode() {
        let mut r = people();
        r.set_unique_names(true);
        let err = r.add_mapped_criteria("Last Name", "surname").unwrap_err();
        assert!(matches!(err, PredicateError::Configuration(_)));
        assert_eq!(r.len(), 3);
        assert!(r.validate().is_ok());
    }

    #[test]
    fn test_nesting_toggle() {
        let mut r = CriteriaRegistry::new();
        r.set_nesting_enabled(false);
        assert!(!r.is_nesting_enabled());
    }

    #[test]
    fn test_suggest() {
        let r = people();
        assert_eq!(r.suggest("Frist Name"), Some("First Name"));
        assert_eq!(r.suggest("zipcod"), Some("zipcode"));
        assert_eq!(r.suggest("Phone"), None);
    }
}
