//! # dbmodel_codegen
//!
//! Generates the persistence boilerplate of an Objective-C model class and
//! merges it into the class's interface and implementation sources.
//!
//! ## Features
//!
//! - **Field constants**: one string constant per persisted field plus the
//!   table name, declared on the interface side and defined on the
//!   implementation side
//! - **Table DDL**: a `CREATE TABLE IF NOT EXISTS` template with its
//!   placeholder variables
//! - **Row (de)serializers**: `createFromCursor:` and `getDbContentValues`
//!   bodies driven by a closed semantic type table
//! - **Idempotent merge**: existing constants are reused, conflicting values
//!   are added next to the original with a review marker, hand-written
//!   methods are kept and nothing is deleted
//!
//! ## Quick Start
//!
//! ```rust
//! use dbmodel_codegen::prelude::*;
//!
//! let schema = ModelSchema::new("PEXDbMessage", "PEX_DBM").with_fields([
//!     FieldDescriptor::new("id", SemanticType::Number),
//!     FieldDescriptor::new("body", SemanticType::String),
//! ]);
//!
//! let mut sources = DocumentPair::new(
//!     Some(SourceDocument::parse("@interface PEXDbMessage : PEXDbModelBase\n@end\n")),
//!     Some(SourceDocument::parse("@implementation PEXDbMessage\n@end\n")),
//! );
//!
//! let session = DbModelSession::default();
//! let plan = session.plan(&schema, &mut sources)?;
//! assert_eq!(plan.constants.insertions(Side::Implementation), 2);
//!
//! session.apply(&plan, &mut sources)?;
//! let header = sources.header.as_ref().map(SourceDocument::render).unwrap_or_default();
//! assert!(header.contains("extern NSString * PEX_DBM_FIELD_BODY;"));
//! # Ok::<(), DbModelError>(())
//! ```

pub mod codegen;
pub mod config;
pub mod errors;
pub mod merge;
pub mod prelude;
pub mod session;
pub mod source;
