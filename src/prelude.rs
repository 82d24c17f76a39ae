//! Prelude module for convenient imports.
//!
//! ```rust
//! use dbmodel_codegen::prelude::*;
//! ```

pub use crate::codegen::{
    FieldDescriptor, FieldSource, GeneratedConstant, GeneratedMethod, GeneratedModelCode, ModelSchema,
    SemanticType, generate_model_code, parse_model_schema, parse_model_schema_from_str,
};
pub use crate::config::GeneratorConfig;
pub use crate::errors::{DbModelError, DbModelResult};
pub use crate::merge::{
    ApplyReport, ClassBody, ConstantIndex, InsertAnchor, MergeAction, MergeDecision, MergePlan, MethodPlan, Side,
    merge,
};
pub use crate::session::{DbModelSession, SessionPlan};
pub use crate::source::{ContainerKind, DocumentPair, NodeId, SourceDocument, SourceLocation, SourceLocator};
