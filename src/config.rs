//! Generator configuration.
//!
//! The generated text targets an Objective-C persistence layer built around a
//! cursor type, a content-values container and a shared model base class. All
//! of those names, as well as the markers left for a human reviewer, can be
//! changed through [`GeneratorConfig`] using the builder pattern via
//! `typed-builder`.

use typed_builder::TypedBuilder;

/// Names and markers used while rendering generated code.
///
/// # Examples
///
/// ```
/// use dbmodel_codegen::config::GeneratorConfig;
///
/// // Create with defaults
/// let config = GeneratorConfig::default();
/// assert_eq!(config.identifier_sentinel, -1);
///
/// // Customize options
/// let config = GeneratorConfig::builder()
///     .cursor_type("ACMECursor")
///     .verify_marker("FIXME: check")
///     .build();
/// assert_eq!(config.cursor_type, "ACMECursor");
/// ```
#[derive(Debug, Clone, TypedBuilder)]
#[builder(doc)]
pub struct GeneratorConfig {
    /// Runtime value of the identifier meaning "not assigned yet"
    #[builder(default = -1)]
    pub identifier_sentinel: i64,

    /// Comment appended wherever a human has to double-check the output
    #[builder(default = String::from("TODO: verify"), setter(into))]
    pub verify_marker: String,

    /// Comment attached to the generated table-name constant
    #[builder(default = String::from("TODO: FIXME: give a proper table name"), setter(into))]
    pub table_name_comment: String,

    /// Result-row cursor class consumed by the row deserializer
    #[builder(default = String::from("PEXDbCursor"), setter(into))]
    pub cursor_type: String,

    /// Key/value container produced by the value serializer
    #[builder(default = String::from("PEXDbContentValues"), setter(into))]
    pub content_values_type: String,

    /// Base class providing shared cursor helpers (date decoding)
    #[builder(default = String::from("PEXDbModelBase"), setter(into))]
    pub model_base_type: String,

    /// Logging macro used by the deserializer's unknown-column branch
    #[builder(default = String::from("DDLogWarn"), setter(into))]
    pub warn_macro: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
