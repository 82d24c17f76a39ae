//! TOML model schema parser
//!
//! A model schema file names the class, the constant prefix and the ordered
//! field list:
//!
//! ```toml
//! [model]
//! class = "PEXDbMessage"
//! prefix = "PEX_DBM"
//! table = "message"        # optional, defaults to the class name
//!
//! [[fields]]
//! name = "id"
//! type = "NSNumber *"
//!
//! [[fields]]
//! name = "sentAt"
//! type = "DATE"
//! ```
//!
//! Field types may be host spellings (`NSString *`, `BOOL`, ...) or semantic
//! type names. A document without a `fields` entry is rejected.

use crate::codegen::schema::ModelSchema;
use crate::codegen::types::FieldDescriptor;
use crate::errors::{DbModelError, DbModelResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root of a model schema document
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelSchemaFile {
    pub model: ModelConfig,
    pub fields: Option<Vec<FieldConfig>>,
}

/// Model configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    pub class: String,
    pub prefix: String,
    pub table: Option<String>,
}

/// Field configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FieldConfig {
    pub name: String,
    pub r#type: String,
}

/// Parse a model schema from a TOML file
pub fn parse_model_schema<P: AsRef<Path>>(path: P) -> DbModelResult<ModelSchema> {
    let content = fs::read_to_string(&path).map_err(|e| {
        DbModelError::Configuration(format!(
            "Failed to read schema file '{}': {}",
            path.as_ref().display(),
            e
        ))
    })?;

    parse_model_schema_from_str(&content)
}

/// Parse a model schema from a TOML string
pub fn parse_model_schema_from_str(content: &str) -> DbModelResult<ModelSchema> {
    let file: ModelSchemaFile = toml::from_str(content)
        .map_err(|e| DbModelError::Configuration(format!("Failed to parse TOML schema: {}", e)))?;

    ModelSchema::try_from(file)
}

impl TryFrom<ModelSchemaFile> for ModelSchema {
    type Error = DbModelError;

    fn try_from(file: ModelSchemaFile) -> DbModelResult<Self> {
        let fields = file.fields.ok_or_else(|| {
            DbModelError::InvalidInput(format!(
                "Model '{}' has no field list",
                file.model.class
            ))
        })?;

        let mut schema = ModelSchema::new(file.model.class, file.model.prefix).with_fields(
            fields
                .into_iter()
                .map(|field| FieldDescriptor::from_declared_type(field.name, field.r#type)),
        );
        schema.table_name = file.model.table;
        Ok(schema)
    }
}
