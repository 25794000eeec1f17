//! Feature vector assembly.
//!
//! `build` walks the schema in order and either encodes (categorical) or parses
//! (numeric) each raw value. It is all-or-nothing: the first bad field aborts
//! the build and no partial vector escapes.

use crate::domain::{FeatureVector, FieldKind, RawFields};
use crate::encoding::codec::CategoricalCodec;
use crate::encoding::schema::FeatureSchema;
use crate::error::{InputError, SchemaError};

#[derive(Debug, Clone)]
pub struct FeatureVectorBuilder {
    schema: FeatureSchema,
    codec: CategoricalCodec,
}

impl FeatureVectorBuilder {
    /// Pair a schema with a codec, checking every categorical field has a vocabulary.
    pub fn new(schema: FeatureSchema, codec: CategoricalCodec) -> Result<Self, SchemaError> {
        if let Some(field) = schema
            .categorical_fields()
            .find(|f| codec.vocabulary(&f.name).is_none())
        {
            return Err(SchemaError::MissingVocabulary {
                field: field.name.clone(),
            });
        }
        Ok(Self { schema, codec })
    }

    pub fn garment() -> Result<Self, SchemaError> {
        Self::new(FeatureSchema::garment(), CategoricalCodec::garment()?)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn codec(&self) -> &CategoricalCodec {
        &self.codec
    }

    /// Build the feature vector for one request.
    ///
    /// Values are trimmed first; a blank value counts as missing. Fields not in
    /// the schema are ignored.
    pub fn build(&self, raw: &RawFields) -> Result<FeatureVector, InputError> {
        let mut values = Vec::with_capacity(self.schema.len());

        for field in self.schema.fields() {
            let value = raw
                .get(&field.name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| InputError::MissingField {
                    field: field.name.clone(),
                })?;

            let x = match field.kind {
                FieldKind::Categorical => f64::from(self.codec.encode(&field.name, value)?),
                FieldKind::Numeric => parse_numeric(&field.name, value)?,
            };
            values.push(x);
        }

        Ok(FeatureVector::from(values))
    }
}

fn parse_numeric(field: &str, value: &str) -> Result<f64, InputError> {
    match value.parse::<f64>() {
        Ok(x) if x.is_finite() => Ok(x),
        _ => Err(InputError::InvalidNumeric {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}
