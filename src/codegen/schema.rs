//! Field sources.
//!
//! A [`FieldSource`] hands the generator the class it works on, the constant
//! prefix chosen by the caller and the ordered list of fields to persist.
//! [`ModelSchema`] is the in-memory implementation; it can also be loaded from
//! TOML (see [`crate::codegen::toml_parser`]).

use crate::codegen::types::FieldDescriptor;

/// Supplies the inputs of one generation pass.
pub trait FieldSource {
    /// Name of the model class (used as the default table name).
    fn class_name(&self) -> &str;

    /// Constant prefix, used verbatim (no escaping).
    fn prefix(&self) -> &str;

    /// Ordered fields, or `None` when the source has no field list at all.
    fn fields(&self) -> Option<&[FieldDescriptor]>;

    /// Literal value of the table-name constant.
    fn table_name(&self) -> &str {
        self.class_name()
    }
}

/// A model class together with its persisted fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSchema {
    pub class_name: String,
    pub prefix: String,
    pub table_name: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

impl ModelSchema {
    pub fn new(class_name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            prefix: prefix.into(),
            table_name: None,
            fields: Vec::new(),
        }
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = FieldDescriptor>,
    {
        self.fields.extend(fields);
        self
    }
}

impl FieldSource for ModelSchema {
    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn fields(&self) -> Option<&[FieldDescriptor]> {
        Some(&self.fields)
    }

    fn table_name(&self) -> &str {
        self.table_name.as_deref().unwrap_or(&self.class_name)
    }
}
