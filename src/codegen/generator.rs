//! Code generator for model persistence boilerplate
//!
//! This module turns a prefix and an ordered field list into the four
//! generated artifacts: the `CREATE TABLE` statement, the row deserializer,
//! the value serializer and the field-name constants. Everything here is pure
//! text production.

use crate::codegen::naming::{field_constant_name, table_constant_name};
use crate::codegen::schema::FieldSource;
use crate::codegen::type_mapping::{SemanticType, read_expression_for};
use crate::codegen::types::*;
use crate::codegen::validator::validate_field_source;
use crate::config::GeneratorConfig;
use crate::errors::{DbModelError, DbModelResult};
use log::{debug, warn};

/// Selector of the generated `CREATE TABLE` accessor
pub const CREATE_TABLE_SELECTOR: &str = "getCreateTable";
/// Selector of the generated row deserializer
pub const CREATE_FROM_CURSOR_SELECTOR: &str = "createFromCursor:";
/// Selector of the generated value serializer
pub const CONTENT_VALUES_SELECTOR: &str = "getDbContentValues";

/// Composes the generated artifacts for one prefix and field list.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactGenerator<'a> {
    prefix: &'a str,
    table_name: &'a str,
    fields: &'a [FieldDescriptor],
    config: &'a GeneratorConfig,
}

impl<'a> ArtifactGenerator<'a> {
    pub fn new(
        prefix: &'a str,
        table_name: &'a str,
        fields: &'a [FieldDescriptor],
        config: &'a GeneratorConfig,
    ) -> Self {
        Self {
            prefix,
            table_name,
            fields,
            config,
        }
    }

    fn constant_for(&self, field: &FieldDescriptor) -> String {
        field_constant_name(self.prefix, field.name())
    }

    fn identifier_constant(&self) -> String {
        field_constant_name(self.prefix, IDENTIFIER_FIELD)
    }

    fn identifier_ivar(&self) -> String {
        self.fields
            .iter()
            .find(|f| f.is_identifier())
            .map_or_else(|| format!("_{}", IDENTIFIER_FIELD), FieldDescriptor::ivar)
    }

    /// Candidate constants: the table-name constant first, then one constant
    /// per non-identifier field in source order.
    pub fn candidate_constants(&self) -> Vec<GeneratedConstant> {
        let table = GeneratedConstant::new(table_constant_name(self.prefix), self.table_name)
            .with_comment(self.config.table_name_comment.as_str());

        std::iter::once(table)
            .chain(
                self.fields
                    .iter()
                    .filter(|f| !f.is_identifier())
                    .map(|f| GeneratedConstant::new(self.constant_for(f), f.name())),
            )
            .collect()
    }

    /// Build the `CREATE TABLE IF NOT EXISTS` template and its variable list.
    ///
    /// The number of emitted columns is counted before any text is produced so
    /// the last column is known up front and carries no trailing separator.
    pub fn build_create_table(&self) -> CreateTableStatement {
        let total = self.fields.iter().filter(|f| !f.is_identifier()).count();

        let mut fragments = vec!["CREATE TABLE IF NOT EXISTS %@ (".to_string()];
        let mut variables = vec![table_constant_name(self.prefix), self.identifier_constant()];
        let mut columns = Vec::with_capacity(total);

        let pk_separator = if total == 0 { "" } else { "," };
        fragments.push(format!("  %@  INTEGER PRIMARY KEY AUTOINCREMENT{} ", pk_separator));

        let mut emitted = 0;
        for field in self.fields.iter().filter(|f| !f.is_identifier()) {
            emitted += 1;
            let storage_class = field.semantic_type().sql_storage_class();
            let separator = if emitted == total { "" } else { "," };
            fragments.push(format!("  %@  {}{} ", storage_class, separator));

            let constant = self.constant_for(field);
            variables.push(constant.clone());
            columns.push(ColumnDefinition {
                constant,
                storage_class,
            });
        }

        fragments.push(" );".to_string());

        CreateTableStatement {
            fragments,
            variables,
            columns,
        }
    }

    /// Class method returning the formatted `CREATE TABLE` statement.
    pub fn build_create_table_method(&self) -> GeneratedMethod {
        let statement = self.build_create_table();

        let mut body = String::from(
            "+(NSString *) getCreateTable {\n    NSString *createTable = [[NSString alloc] initWithFormat:\n",
        );

        // Fragment i (i >= 1) introduces placeholder i.
        for (i, fragment) in statement.fragments.iter().enumerate() {
            let lead = if i == 0 { "@" } else { "" };
            match statement.variables.get(i) {
                Some(constant) if i >= 1 => {
                    body.push_str(&format!("            {}\"{}\" // {}\n", lead, fragment, constant));
                }
                _ => {
                    let terminator = if i + 1 == statement.fragments.len() { "," } else { "" };
                    body.push_str(&format!("            {}\"{}\"{}\n", lead, fragment, terminator));
                }
            }
        }

        body.push_str(&format!("            {}];\n", statement.variables.join(",\n            ")));
        body.push_str("    return createTable;\n}\n");

        GeneratedMethod {
            selector: CREATE_TABLE_SELECTOR.to_string(),
            declaration: "+(NSString *) getCreateTable;".to_string(),
            definition: body,
        }
    }

    /// Body of the column-name dispatch inside `createFromCursor:`.
    ///
    /// One branch per field, identifier included, followed by a catch-all
    /// that logs unknown columns. Without fields there are no branches and
    /// no catch-all.
    pub fn build_row_deserializer(&self) -> String {
        let mut out = String::new();

        for (i, field) in self.fields.iter().enumerate() {
            let keyword = if i == 0 { "if" } else { "} else if" };
            let mut read =
                read_expression_for(field.semantic_type(), field.is_identifier(), self.config);
            read.push(';');
            if field.semantic_type() == SemanticType::Unknown {
                read.push_str(&format!(" // {}, type={}", self.config.verify_marker, field.type_name()));
            }

            out.push_str(&format!(
                "{} ([{} isEqualToString: colname]) {{\n",
                keyword,
                self.constant_for(field)
            ));
            out.push_str(&format!("    {} = {}\n", field.ivar(), read));
        }

        if !self.fields.is_empty() {
            out.push_str("} else {\n");
            out.push_str(&format!(
                "    {}(@\"Unknown column name %@\", colname);\n",
                self.config.warn_macro
            ));
            out.push_str("}\n");
        }

        out
    }

    /// Instance method filling the object from a result-row cursor.
    pub fn build_row_deserializer_method(&self) -> GeneratedMethod {
        let cursor = &self.config.cursor_type;
        let mut body = format!(
            "/**\n * Create wrapper with content values pairs.\n *\n * @param c the cursor to unpack.\n */\n\
             -(void) createFromCursor: ({} *) c {{\n\
             \x20   int colCount = [c getColumnCount];\n\
             \x20   for (int i = 0; i < colCount; i++) {{\n\
             \x20       NSString *colname = [c getColumnName:i];\n",
            cursor
        );
        body.push_str(&indent(&self.build_row_deserializer(), 8));
        body.push_str("    }\n}\n");

        GeneratedMethod {
            selector: CREATE_FROM_CURSOR_SELECTOR.to_string(),
            declaration: format!("- (void)createFromCursor:({} *)c;", cursor),
            definition: body,
        }
    }

    /// Body of `getDbContentValues`: guarded puts into the content values `cv`.
    ///
    /// The identifier guard always comes first and only stores a value that
    /// is set and different from the "unset" sentinel. Every other field is
    /// stored when non-nil.
    pub fn build_value_serializer(&self) -> String {
        let id_ivar = self.identifier_ivar();
        let mut out = format!(
            "if ({ivar} != nil && [{ivar} longLongValue] != {sentinel}ll) {{\n    [cv put: {constant} NSNumberAsLongLong: {ivar}];\n}}\n",
            ivar = id_ivar,
            sentinel = self.config.identifier_sentinel,
            constant = self.identifier_constant(),
        );

        for field in self.fields.iter().filter(|f| !f.is_identifier()) {
            let constant = self.constant_for(field);
            let ivar = field.ivar();
            out.push_str(&format!("if ({} != nil)\n", ivar));
            match field.semantic_type().serialize_tag() {
                Some(tag) => {
                    out.push_str(&format!("    [cv put: {} {}: {}];\n", constant, tag, ivar));
                }
                None => {
                    warn!(
                        "No serializer for field '{}' of type '{}', falling back to string",
                        field.name(),
                        field.type_name()
                    );
                    out.push_str(&format!(
                        "    [cv put: {} string: {}]; // {} type: {}\n",
                        constant,
                        ivar,
                        self.config.verify_marker,
                        field.type_name()
                    ));
                }
            }
        }

        out
    }

    /// Instance method packing the object into content values.
    pub fn build_value_serializer_method(&self) -> GeneratedMethod {
        let values = &self.config.content_values_type;
        let mut body = format!(
            "/**\n * Pack the object content value to store\n *\n * @return The content value representing the object\n */\n\
             -({values} *) getDbContentValues {{\n\
             \x20   {values} * cv = [[{values} alloc] init];\n"
        );
        body.push_str(&indent(&self.build_value_serializer(), 4));
        body.push_str("    return cv;\n}\n");

        GeneratedMethod {
            selector: CONTENT_VALUES_SELECTOR.to_string(),
            declaration: format!("- ({} *)getDbContentValues;", values),
            definition: body,
        }
    }

    /// Declaration-only block, one `extern` line per candidate constant.
    pub fn build_constant_declarations(&self) -> String {
        self.candidate_constants()
            .iter()
            .map(|c| c.declaration_text() + "\n")
            .collect()
    }

    /// Value-bearing block, one definition line per candidate constant.
    pub fn build_constant_definitions(&self) -> String {
        self.candidate_constants()
            .iter()
            .map(|c| c.definition_text() + "\n")
            .collect()
    }
}

fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                "\n".to_string()
            } else {
                format!("{}{}\n", pad, line)
            }
        })
        .collect()
}

/// Generate every artifact for the model described by `source`.
///
/// Fails only when the input itself is unusable (no field list, empty
/// prefix, two fields mapping onto one constant).
pub fn generate_model_code<S: FieldSource + ?Sized>(
    source: &S,
    config: &GeneratorConfig,
) -> DbModelResult<GeneratedModelCode> {
    let validation = validate_field_source(source);
    if !validation.is_valid {
        let messages: Vec<_> = validation.errors.iter().map(|e| e.message.as_str()).collect();
        return Err(DbModelError::InvalidInput(messages.join("; ")));
    }
    for warning in &validation.warnings {
        warn!("{}: {}", source.class_name(), warning);
    }

    let fields = source.fields().unwrap_or_default();
    let generator = ArtifactGenerator::new(source.prefix(), source.table_name(), fields, config);

    let constants = generator.candidate_constants();
    let create_table = generator.build_create_table();
    debug!(
        "Generated {} constants and {} columns for {}",
        constants.len(),
        create_table.columns.len(),
        source.class_name()
    );

    Ok(GeneratedModelCode {
        class_name: source.class_name().to_string(),
        constant_declarations: generator.build_constant_declarations(),
        constant_definitions: generator.build_constant_definitions(),
        constants,
        create_table,
        methods: vec![
            generator.build_create_table_method(),
            generator.build_row_deserializer_method(),
            generator.build_value_serializer_method(),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::schema::ModelSchema;
    use crate::codegen::type_mapping::SqlStorageClass;

    fn scenario_fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("id", SemanticType::Number),
            FieldDescriptor::new("title", SemanticType::String),
            FieldDescriptor::new("createdAt", SemanticType::Date),
        ]
    }

    #[test]
    fn test_candidate_constants_exclude_identifier() {
        let config = GeneratorConfig::default();
        let fields = scenario_fields();
        let generator = ArtifactGenerator::new("PEX_DBFT", "Message", &fields, &config);

        let names: Vec<_> = generator
            .candidate_constants()
            .into_iter()
            .map(|c| c.qualified_name)
            .collect();
        assert_eq!(
            names,
            ["PEX_DBFT_TABLE_NAME", "PEX_DBFT_FIELD_TITLE", "PEX_DBFT_FIELD_CREATED_AT"]
        );
    }

    #[test]
    fn test_create_table_columns_and_separators() {
        let config = GeneratorConfig::default();
        let fields = scenario_fields();
        let statement = ArtifactGenerator::new("PEX_DBFT", "Message", &fields, &config)
            .build_create_table();

        assert_eq!(statement.columns.len(), 2);
        assert_eq!(statement.columns[0].storage_class, SqlStorageClass::Text);
        assert_eq!(statement.columns[1].storage_class, SqlStorageClass::Integer);
        assert_eq!(
            statement.sql_template(),
            "CREATE TABLE IF NOT EXISTS %@ (  %@  INTEGER PRIMARY KEY AUTOINCREMENT,   %@  TEXT,   %@  INTEGER  );"
        );
        assert_eq!(
            statement.variables,
            [
                "PEX_DBFT_TABLE_NAME",
                "PEX_DBFT_FIELD_ID",
                "PEX_DBFT_FIELD_TITLE",
                "PEX_DBFT_FIELD_CREATED_AT"
            ]
        );
    }

    #[test]
    fn test_create_table_without_fields_is_closed() {
        let config = GeneratorConfig::default();
        let statement = ArtifactGenerator::new("PEX_DBFT", "Message", &[], &config)
            .build_create_table();

        assert!(statement.columns.is_empty());
        assert_eq!(
            statement.sql_template(),
            "CREATE TABLE IF NOT EXISTS %@ (  %@  INTEGER PRIMARY KEY AUTOINCREMENT  );"
        );
        assert_eq!(statement.variables.len(), 2);
    }

    #[test]
    fn test_create_table_method_lists_variables() {
        let config = GeneratorConfig::default();
        let fields = scenario_fields();
        let method = ArtifactGenerator::new("PEX_DBFT", "Message", &fields, &config)
            .build_create_table_method();

        assert_eq!(method.selector, CREATE_TABLE_SELECTOR);
        assert!(method.definition.contains("@\"CREATE TABLE IF NOT EXISTS %@ (\""));
        assert!(method.definition.contains("\"  %@  TEXT, \" // PEX_DBFT_FIELD_TITLE"));
        assert!(method.definition.contains("\"  %@  INTEGER \" // PEX_DBFT_FIELD_CREATED_AT"));
        assert!(method.definition.contains("PEX_DBFT_FIELD_CREATED_AT];"));
        assert!(method.definition.ends_with("    return createTable;\n}\n"));
    }

    #[test]
    fn test_create_table_method_text() {
        let config = GeneratorConfig::default();
        let fields = vec![FieldDescriptor::new("title", SemanticType::String)];
        let method = ArtifactGenerator::new("PEX_DBFT", "Message", &fields, &config)
            .build_create_table_method();

        assert_eq!(
            method.definition,
            "+(NSString *) getCreateTable {\n\
             \x20   NSString *createTable = [[NSString alloc] initWithFormat:\n\
             \x20           @\"CREATE TABLE IF NOT EXISTS %@ (\"\n\
             \x20           \"  %@  INTEGER PRIMARY KEY AUTOINCREMENT, \" // PEX_DBFT_FIELD_ID\n\
             \x20           \"  %@  TEXT \" // PEX_DBFT_FIELD_TITLE\n\
             \x20           \" );\",\n\
             \x20           PEX_DBFT_TABLE_NAME,\n\
             \x20           PEX_DBFT_FIELD_ID,\n\
             \x20           PEX_DBFT_FIELD_TITLE];\n\
             \x20   return createTable;\n}\n"
        );
    }

    #[test]
    fn test_row_deserializer_branches() {
        let config = GeneratorConfig::default();
        let fields = scenario_fields();
        let body = ArtifactGenerator::new("PEX_DBFT", "Message", &fields, &config)
            .build_row_deserializer();

        assert!(body.starts_with("if ([PEX_DBFT_FIELD_ID isEqualToString: colname]) {\n    _id = [c getInt64:i];"));
        assert!(body.contains("} else if ([PEX_DBFT_FIELD_TITLE isEqualToString: colname]) {\n    _title = [c getString:i];"));
        assert!(body.contains("_createdAt = [PEXDbModelBase getDateFromCursor:c idx:i];"));
        assert!(body.ends_with("} else {\n    DDLogWarn(@\"Unknown column name %@\", colname);\n}\n"));
    }

    #[test]
    fn test_row_deserializer_without_fields_is_empty() {
        let config = GeneratorConfig::default();
        let generator = ArtifactGenerator::new("PEX_DBFT", "Message", &[], &config);
        assert_eq!(generator.build_row_deserializer(), "");
        assert!(!generator.build_row_deserializer_method().definition.contains("else"));
    }

    #[test]
    fn test_row_deserializer_marks_unknown_type() {
        let config = GeneratorConfig::default();
        let fields = vec![FieldDescriptor::from_declared_type("frame", "CGRect")];
        let body = ArtifactGenerator::new("PEX_DBFT", "Message", &fields, &config)
            .build_row_deserializer();
        assert!(body.contains("_frame = [c getString:i]; // TODO: verify, type=CGRect"));
    }

    #[test]
    fn test_value_serializer_identifier_guard() {
        let config = GeneratorConfig::default();
        let body = ArtifactGenerator::new("PEX_DBFT", "Message", &[], &config)
            .build_value_serializer();
        assert_eq!(
            body,
            "if (_id != nil && [_id longLongValue] != -1ll) {\n    [cv put: PEX_DBFT_FIELD_ID NSNumberAsLongLong: _id];\n}\n"
        );
    }

    #[test]
    fn test_value_serializer_fields() {
        let config = GeneratorConfig::default();
        let mut fields = scenario_fields();
        fields.push(FieldDescriptor::new("seen", SemanticType::Boolean));
        fields.push(FieldDescriptor::from_declared_type("frame", "CGRect"));
        let body = ArtifactGenerator::new("PEX_DBFT", "Message", &fields, &config)
            .build_value_serializer();

        assert_eq!(body.matches("NSNumberAsLongLong").count(), 1);
        assert!(body.contains("if (_title != nil)\n    [cv put: PEX_DBFT_FIELD_TITLE string: _title];"));
        assert!(body.contains("[cv put: PEX_DBFT_FIELD_CREATED_AT date: _createdAt];"));
        assert!(body.contains("[cv put: PEX_DBFT_FIELD_SEEN integer: _seen];"));
        assert!(body.contains("[cv put: PEX_DBFT_FIELD_FRAME string: _frame]; // TODO: verify type: CGRect"));
    }

    #[test]
    fn test_constant_blocks() {
        let config = GeneratorConfig::default();
        let fields = scenario_fields();
        let generator = ArtifactGenerator::new("PEX_DBFT", "Message", &fields, &config);

        assert_eq!(
            generator.build_constant_declarations(),
            "extern NSString * PEX_DBFT_TABLE_NAME;\n\
             extern NSString * PEX_DBFT_FIELD_TITLE;\n\
             extern NSString * PEX_DBFT_FIELD_CREATED_AT;\n"
        );
        assert_eq!(
            generator.build_constant_definitions(),
            "NSString *PEX_DBFT_TABLE_NAME = @\"Message\"; //TODO: FIXME: give a proper table name\n\
             NSString *PEX_DBFT_FIELD_TITLE = @\"title\";\n\
             NSString *PEX_DBFT_FIELD_CREATED_AT = @\"createdAt\";\n"
        );
    }

    #[test]
    fn test_generate_model_code_rejects_duplicates() {
        let schema = ModelSchema::new("PEXDbMessage", "PEX_DBFT").with_fields([
            FieldDescriptor::new("sentAt", SemanticType::Date),
            FieldDescriptor::new("SentAt", SemanticType::Date),
        ]);
        let err = generate_model_code(&schema, &GeneratorConfig::default()).unwrap_err();
        assert!(matches!(err, DbModelError::InvalidInput(_)));
    }

    #[test]
    fn test_generate_model_code_methods() {
        let schema = ModelSchema::new("PEXDbMessage", "PEX_DBFT").with_fields(scenario_fields());
        let code = generate_model_code(&schema, &GeneratorConfig::default()).unwrap();

        assert_eq!(code.class_name, "PEXDbMessage");
        assert_eq!(code.methods.len(), 3);
        assert_eq!(
            code.method(CREATE_FROM_CURSOR_SELECTOR).unwrap().declaration,
            "- (void)createFromCursor:(PEXDbCursor *)c;"
        );
        assert_eq!(
            code.method(CONTENT_VALUES_SELECTOR).unwrap().declaration,
            "- (PEXDbContentValues *)getDbContentValues;"
        );
        assert_eq!(code.constants[0].literal_value, "PEXDbMessage");
    }
}
