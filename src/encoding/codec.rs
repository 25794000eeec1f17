//! Categorical codec: closed vocabularies → integer codes.
//!
//! Codes are the position of a value in the **lexicographically sorted**
//! vocabulary, regardless of the order the values were declared in. This is
//! the rule the training-time label encoders used, so `department=sweing`
//! encodes to `1` on every run.

use crate::error::{InputError, SchemaError};

pub const QUARTER: &str = "quarter";
pub const DEPARTMENT: &str = "department";
pub const DAY: &str = "day";

pub const QUARTERS: [&str; 5] = ["Quarter1", "Quarter2", "Quarter3", "Quarter4", "Quarter5"];
pub const DEPARTMENTS: [&str; 2] = ["sweing", "finishing"];
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Closed set of permitted values for one categorical field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    field: String,
    /// Sorted; the index of a value is its code.
    values: Vec<String>,
}

impl Vocabulary {
    pub fn new<S: AsRef<str>>(field: impl Into<String>, values: &[S]) -> Result<Self, SchemaError> {
        let field = field.into();
        if values.is_empty() {
            return Err(SchemaError::EmptyVocabulary { field });
        }

        let mut sorted: Vec<String> = values.iter().map(|v| v.as_ref().to_string()).collect();
        sorted.sort();
        if let Some(pair) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(SchemaError::DuplicateCategory {
                field,
                value: pair[0].clone(),
            });
        }

        Ok(Self {
            field,
            values: sorted,
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in code order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn code(&self, value: &str) -> Option<u32> {
        self.values
            .binary_search_by(|v| v.as_str().cmp(value))
            .ok()
            .map(|idx| idx as u32)
    }
}

/// Immutable set of vocabularies, one per categorical field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalCodec {
    vocabularies: Vec<Vocabulary>,
}

impl CategoricalCodec {
    pub fn new(vocabularies: Vec<Vocabulary>) -> Result<Self, SchemaError> {
        for (i, vocab) in vocabularies.iter().enumerate() {
            if vocabularies[..i].iter().any(|v| v.field == vocab.field) {
                return Err(SchemaError::DuplicateField {
                    field: vocab.field.clone(),
                });
            }
        }
        Ok(Self { vocabularies })
    }

    /// Codec for the garment productivity vocabularies (quarter, department, day).
    pub fn garment() -> Result<Self, SchemaError> {
        Self::new(vec![
            Vocabulary::new(QUARTER, &QUARTERS)?,
            Vocabulary::new(DEPARTMENT, &DEPARTMENTS)?,
            Vocabulary::new(DAY, &WEEKDAYS)?,
        ])
    }

    pub fn vocabulary(&self, field: &str) -> Option<&Vocabulary> {
        self.vocabularies.iter().find(|v| v.field == field)
    }

    pub fn vocabularies(&self) -> &[Vocabulary] {
        &self.vocabularies
    }

    /// Encode `value` for `field`.
    ///
    /// Matching is exact (case-sensitive); out-of-vocabulary values are an error,
    /// never a default code.
    pub fn encode(&self, field: &str, value: &str) -> Result<u32, InputError> {
        let vocab = self
            .vocabulary(field)
            .ok_or_else(|| InputError::UnknownField {
                field: field.to_string(),
            })?;

        vocab.code(value).ok_or_else(|| InputError::UnknownCategory {
            field: field.to_string(),
            value: value.to_string(),
            expected: vocab.values.join(", "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> CategoricalCodec {
        CategoricalCodec::garment().unwrap()
    }

    #[test]
    fn codes_follow_sorted_order_not_declaration_order() {
        let c = codec();
        assert_eq!(c.encode(DEPARTMENT, "finishing").unwrap(), 0);
        assert_eq!(c.encode(DEPARTMENT, "sweing").unwrap(), 1);

        let days: Vec<u32> = WEEKDAYS.iter().map(|d| c.encode(DAY, d).unwrap()).collect();
        // Monday..Sunday as declared; Friday sorts first.
        assert_eq!(days, vec![1, 5, 6, 4, 0, 2, 3]);

        for (i, q) in QUARTERS.iter().enumerate() {
            assert_eq!(c.encode(QUARTER, q).unwrap(), i as u32);
        }
    }

    #[test]
    fn codes_are_unique_and_in_range() {
        let c = codec();
        for vocab in c.vocabularies() {
            let mut codes: Vec<u32> = vocab
                .values()
                .iter()
                .map(|v| c.encode(vocab.field(), v).unwrap())
                .collect();
            assert!(codes.iter().all(|&code| (code as usize) < vocab.len()));
            codes.sort_unstable();
            codes.dedup();
            assert_eq!(codes.len(), vocab.len());
        }
    }

    #[test]
    fn encoding_is_stable_across_codec_instances() {
        let a = codec();
        let b = CategoricalCodec::new(vec![
            Vocabulary::new(DAY, &["Sunday", "Saturday", "Friday", "Thursday", "Wednesday", "Tuesday", "Monday"]).unwrap(),
            Vocabulary::new(DEPARTMENT, &["finishing", "sweing"]).unwrap(),
        ])
        .unwrap();
        for day in WEEKDAYS {
            assert_eq!(a.encode(DAY, day).unwrap(), b.encode(DAY, day).unwrap());
        }
        assert_eq!(a.encode(DEPARTMENT, "sweing").unwrap(), b.encode(DEPARTMENT, "sweing").unwrap());
    }

    #[test]
    fn out_of_vocabulary_value_is_rejected() {
        let err = codec().encode(DEPARTMENT, "dyeing").unwrap_err();
        match err {
            InputError::UnknownCategory { field, value, expected } => {
                assert_eq!(field, DEPARTMENT);
                assert_eq!(value, "dyeing");
                assert_eq!(expected, "finishing, sweing");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(codec().encode(DAY, "monday").is_err());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = codec().encode("shift", "night").unwrap_err();
        assert_eq!(
            err,
            InputError::UnknownField {
                field: "shift".to_string()
            }
        );
    }

    #[test]
    fn vocabulary_rejects_duplicates_and_empty_sets() {
        assert!(matches!(
            Vocabulary::new("department", &["sweing", "sweing"]),
            Err(SchemaError::DuplicateCategory { .. })
        ));
        let empty: [&str; 0] = [];
        assert!(matches!(
            Vocabulary::new("department", &empty),
            Err(SchemaError::EmptyVocabulary { .. })
        ));
    }

    #[test]
    fn codec_rejects_two_vocabularies_for_one_field() {
        let v = Vocabulary::new(DAY, &WEEKDAYS).unwrap();
        assert!(matches!(
            CategoricalCodec::new(vec![v.clone(), v]),
            Err(SchemaError::DuplicateField { .. })
        ));
    }
}
