//! Field source validator
//!
//! Rejects inputs the generator cannot turn into unique, well-formed
//! constants and collects warnings for spots that will carry a verification
//! marker in the output.

use crate::codegen::naming::{field_constant_name, table_constant_name};
use crate::codegen::schema::FieldSource;
use crate::codegen::type_mapping::SemanticType;
use crate::codegen::types::*;
use std::collections::HashMap;

/// Validate the inputs of one generation pass
pub fn validate_field_source<S: FieldSource + ?Sized>(source: &S) -> ValidationResult {
    let mut result = ValidationResult::new();

    if source.prefix().trim().is_empty() {
        result.add_error(
            "Constant prefix cannot be empty".to_string(),
            Some("prefix".to_string()),
            ValidationErrorType::EmptyPrefix,
        );
    }

    let Some(fields) = source.fields() else {
        result.add_error(
            format!("Model '{}' has no field list", source.class_name()),
            Some("fields".to_string()),
            ValidationErrorType::MissingFields,
        );
        return result;
    };

    validate_fields(source.prefix(), fields, &mut result);
    result
}

fn validate_fields(prefix: &str, fields: &[FieldDescriptor], result: &mut ValidationResult) {
    let identifier_constant = field_constant_name(prefix, IDENTIFIER_FIELD);
    let mut seen: HashMap<String, &str> = HashMap::new();
    seen.insert(table_constant_name(prefix), "<table name>");

    for field in fields {
        if field.name().trim().is_empty() {
            result.add_error(
                "Field name cannot be empty".to_string(),
                None,
                ValidationErrorType::EmptyFieldName,
            );
            continue;
        }

        let constant = field_constant_name(prefix, field.name());
        if let Some(previous) = seen.insert(constant.clone(), field.name()) {
            result.add_error(
                format!(
                    "Fields '{}' and '{}' both map to constant {}",
                    previous,
                    field.name(),
                    constant
                ),
                Some(field.name().to_string()),
                ValidationErrorType::DuplicateConstant,
            );
        }

        if field.semantic_type() == SemanticType::Unknown {
            result.add_warning(format!(
                "Field '{}' has unresolved type '{}' - generated accessors fall back to strings",
                field.name(),
                field.type_name()
            ));
        }

        if field.is_identifier() {
            if field.semantic_type() != SemanticType::Number {
                result.add_warning(format!(
                    "Identifier field '{}' is {} rather than NUMBER",
                    field.name(),
                    field.semantic_type()
                ));
            }
        } else if constant.eq_ignore_ascii_case(&identifier_constant) {
            result.add_warning(format!(
                "Field '{}' maps onto the identifier constant {}",
                field.name(),
                identifier_constant
            ));
        }
    }
}
