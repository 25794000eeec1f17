//! Feature schema: the ordered field list the models were trained on.
//!
//! Vector positions come from this order. Changing it requires retraining the
//! models, not just a code change.

use crate::domain::{FieldKind, FieldSpec};
use crate::encoding::codec::{DAY, DEPARTMENT, QUARTER};
use crate::error::SchemaError;

/// Numeric fields of the garment schema, in vector order after the categoricals.
pub const NUMERIC_FIELDS: [&str; 11] = [
    "team",
    "targeted_productivity",
    "smv",
    "wip",
    "over_time",
    "incentive",
    "idle_time",
    "idle_men",
    "no_of_style_change",
    "no_of_workers",
    "month",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    fields: Vec<FieldSpec>,
}

impl FeatureSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, SchemaError> {
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(SchemaError::DuplicateField {
                    field: field.name.clone(),
                });
            }
        }
        Ok(Self { fields })
    }

    /// The 14-field schema: quarter, department, day, then the numeric fields.
    pub fn garment() -> Self {
        let fields = [QUARTER, DEPARTMENT, DAY]
            .into_iter()
            .map(FieldSpec::categorical)
            .chain(NUMERIC_FIELDS.into_iter().map(FieldSpec::numeric))
            .collect();
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn categorical_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.kind == FieldKind::Categorical)
    }
}
