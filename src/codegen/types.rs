//! Model and generated-artifact type definitions

use crate::codegen::type_mapping::{SemanticType, SqlStorageClass};

/// Name of the field mapped onto the primary key column (case-insensitive).
pub const IDENTIFIER_FIELD: &str = "id";

/// A single persisted field as read from the field source.
///
/// Immutable once constructed. Declaration order of descriptors drives the
/// emission order of every generated artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    semantic_type: SemanticType,
    type_name: String,
    is_identifier: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        let name = name.into();
        let is_identifier = name.eq_ignore_ascii_case(IDENTIFIER_FIELD);
        Self {
            name,
            type_name: semantic_type.to_string(),
            semantic_type,
            is_identifier,
        }
    }

    /// Build a descriptor from a declared type spelling (host spelling or
    /// semantic name). Unresolvable spellings keep their text so markers can
    /// name them.
    pub fn from_declared_type(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        let mut field = Self::new(name, SemanticType::resolve(&type_name));
        field.type_name = type_name.trim().to_string();
        field
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn semantic_type(&self) -> SemanticType {
        self.semantic_type
    }

    /// The type as it was declared, used in verification markers.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn is_identifier(&self) -> bool {
        self.is_identifier
    }

    /// Instance variable backing the field (`title` -> `_title`).
    pub fn ivar(&self) -> String {
        format!("_{}", self.name)
    }
}

/// A named string constant to be declared in the interface file and defined
/// in the implementation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedConstant {
    pub qualified_name: String,
    pub literal_value: String,
    pub comment: Option<String>,
}

impl GeneratedConstant {
    pub fn new(qualified_name: impl Into<String>, literal_value: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into().trim().to_string(),
            literal_value: literal_value.into().trim().to_string(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.add_comment(comment);
        self
    }

    /// Attach a comment, chaining onto an existing one with `"; "`.
    pub fn add_comment(&mut self, comment: impl Into<String>) {
        let comment = comment.into();
        self.comment = Some(match self.comment.take() {
            Some(existing) => format!("{}; {}", existing, comment.trim()),
            None => comment.trim().to_string(),
        });
    }

    /// Declaration-only form (`extern NSString * NAME;`)
    pub fn declaration_text(&self) -> String {
        format!("extern NSString * {};", self.qualified_name)
    }

    /// Value-bearing form (`NSString *NAME = @"value";`)
    pub fn definition_text(&self) -> String {
        match &self.comment {
            Some(comment) => format!(
                "NSString *{} = @\"{}\"; //{}",
                self.qualified_name, self.literal_value, comment
            ),
            None => format!("NSString *{} = @\"{}\";", self.qualified_name, self.literal_value),
        }
    }

    /// Literal text as it appears in source (`"value"`).
    pub fn quoted_value(&self) -> String {
        format!("\"{}\"", self.literal_value)
    }
}

/// A non-identifier column of the generated table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub constant: String,
    pub storage_class: SqlStorageClass,
}

/// The `CREATE TABLE` statement as a format template plus the constants that
/// fill its `%@` placeholders, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTableStatement {
    /// Template fragments in emission order; concatenated they form the statement
    pub fragments: Vec<String>,
    pub variables: Vec<String>,
    pub columns: Vec<ColumnDefinition>,
}

impl CreateTableStatement {
    pub const PLACEHOLDER: &'static str = "%@";

    pub fn sql_template(&self) -> String {
        self.fragments.concat()
    }

    /// Substitute placeholders positionally, as the host's formatter would.
    pub fn render_with<F>(&self, mut resolve: F) -> String
    where
        F: FnMut(&str) -> String,
    {
        let template = self.sql_template();
        let mut out = String::with_capacity(template.len());
        let mut variables = self.variables.iter();
        let mut rest = template.as_str();
        while let Some(pos) = rest.find(Self::PLACEHOLDER) {
            out.push_str(&rest[..pos]);
            if let Some(variable) = variables.next() {
                out.push_str(&resolve(variable));
            }
            rest = &rest[pos + Self::PLACEHOLDER.len()..];
        }
        out.push_str(rest);
        out
    }
}

/// A generated method: its selector, the interface-side signature and the
/// implementation-side definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMethod {
    pub selector: String,
    pub declaration: String,
    pub definition: String,
}

/// Everything produced for one model in one generation pass.
#[derive(Debug, Clone)]
pub struct GeneratedModelCode {
    pub class_name: String,
    /// Candidate constants: table name first, then fields in source order
    pub constants: Vec<GeneratedConstant>,
    pub constant_declarations: String,
    pub constant_definitions: String,
    pub create_table: CreateTableStatement,
    pub methods: Vec<GeneratedMethod>,
}

impl GeneratedModelCode {
    pub fn method(&self, selector: &str) -> Option<&GeneratedMethod> {
        self.methods.iter().find(|m| m.selector == selector)
    }
}

/// Validation result
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<String>,
}

/// Validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
    pub field: Option<String>,
    pub error_type: ValidationErrorType,
}

/// Validation error types
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationErrorType {
    EmptyPrefix,
    MissingFields,
    EmptyFieldName,
    DuplicateConstant,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, message: String, field: Option<String>, error_type: ValidationErrorType) {
        self.is_valid = false;
        self.errors.push(ValidationError {
            message,
            field,
            error_type,
        });
    }

    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_detection() {
        assert!(FieldDescriptor::new("id", SemanticType::Number).is_identifier());
        assert!(FieldDescriptor::new("ID", SemanticType::Number).is_identifier());
        assert!(!FieldDescriptor::new("idx", SemanticType::Number).is_identifier());
    }

    #[test]
    fn test_declared_type_keeps_spelling() {
        let field = FieldDescriptor::from_declared_type("frame", " CGRect ");
        assert_eq!(field.semantic_type(), SemanticType::Unknown);
        assert_eq!(field.type_name(), "CGRect");

        let field = FieldDescriptor::from_declared_type("title", "NSString *");
        assert_eq!(field.semantic_type(), SemanticType::String);
    }

    #[test]
    fn test_constant_text_forms() {
        let constant = GeneratedConstant::new("PEX_FIELD_TITLE", "title");
        assert_eq!(constant.declaration_text(), "extern NSString * PEX_FIELD_TITLE;");
        assert_eq!(constant.definition_text(), "NSString *PEX_FIELD_TITLE = @\"title\";");
        assert_eq!(constant.quoted_value(), "\"title\"");
    }

    #[test]
    fn test_comment_chaining() {
        let mut constant =
            GeneratedConstant::new("PEX_TABLE_NAME", "Message").with_comment("TODO: FIXME");
        constant.add_comment("TODO: verify");
        assert_eq!(constant.comment.as_deref(), Some("TODO: FIXME; TODO: verify"));
        assert_eq!(
            constant.definition_text(),
            "NSString *PEX_TABLE_NAME = @\"Message\"; //TODO: FIXME; TODO: verify"
        );
    }

    #[test]
    fn test_render_with_substitutes_in_order() {
        let statement = CreateTableStatement {
            fragments: vec!["CREATE TABLE %@ (".into(), "%@ INTEGER".into(), ");".into()],
            variables: vec!["T".into(), "C".into()],
            columns: vec![],
        };
        let rendered = statement.render_with(|v| v.to_lowercase());
        assert_eq!(rendered, "CREATE TABLE t (c INTEGER);");
    }
}
