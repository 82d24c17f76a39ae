//! Code generation for persisted model classes
//!
//! This module provides the naming rules, the semantic type mapping, the
//! TOML-backed field sources and the generator producing the table DDL, row
//! (de)serializers and field-name constants.

pub mod generator;
pub mod naming;
pub mod schema;
pub mod toml_parser;
pub mod type_mapping;
pub mod types;
pub mod validator;

pub use generator::*;
pub use naming::*;
pub use schema::*;
pub use toml_parser::*;
pub use type_mapping::*;
pub use types::*;
pub use validator::*;
