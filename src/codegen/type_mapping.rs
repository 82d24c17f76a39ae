//! Semantic field types and their storage/accessor mapping.
//!
//! The set of semantic types is closed. Every type maps to exactly one SQL
//! storage class and, except for [`SemanticType::Unknown`], one serializer
//! tag. Unknown types degrade to `TEXT` storage and string accessors; the
//! generator marks those spots for manual verification instead of failing.

use crate::config::GeneratorConfig;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Storage-relevant category of a model field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum SemanticType {
    String,
    Number,
    Date,
    Binary,
    Boolean,
    Integer,
    Double,
    Unknown,
}

/// SQL storage class of a generated column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum SqlStorageClass {
    Integer,
    Text,
}

/// Putter selector used by the value serializer (`[cv put: KEY <tag>: value]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum SerializeTag {
    Number,
    Date,
    Data,
    Integer,
    Double,
    String,
}

/// One row of the mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMapping {
    pub semantic_type: SemanticType,
    pub sql_storage_class: SqlStorageClass,
    pub serialize_tag: Option<SerializeTag>,
}

/// The complete mapping table, one entry per semantic type.
pub const TYPE_MAPPINGS: [TypeMapping; 8] = [
    SemanticType::Number.mapping(),
    SemanticType::Date.mapping(),
    SemanticType::Boolean.mapping(),
    SemanticType::Integer.mapping(),
    SemanticType::Double.mapping(),
    SemanticType::Binary.mapping(),
    SemanticType::String.mapping(),
    SemanticType::Unknown.mapping(),
];

impl SemanticType {
    pub const fn mapping(self) -> TypeMapping {
        use SerializeTag as Tag;
        use SqlStorageClass::{Integer, Text};

        let (sql_storage_class, serialize_tag) = match self {
            Self::Number => (Integer, Some(Tag::Number)),
            Self::Date => (Integer, Some(Tag::Date)),
            Self::Boolean => (Integer, Some(Tag::Integer)),
            Self::Integer => (Integer, Some(Tag::Integer)),
            Self::Double => (Integer, Some(Tag::Double)),
            Self::Binary => (Text, Some(Tag::Data)),
            Self::String => (Text, Some(Tag::String)),
            Self::Unknown => (Text, None),
        };

        TypeMapping {
            semantic_type: self,
            sql_storage_class,
            serialize_tag,
        }
    }

    pub const fn sql_storage_class(self) -> SqlStorageClass {
        self.mapping().sql_storage_class
    }

    /// `None` means the caller has to emit a verification marker.
    pub const fn serialize_tag(self) -> Option<SerializeTag> {
        self.mapping().serialize_tag
    }

    /// Resolve a host canonical type spelling such as `NSString *` or `BOOL`.
    ///
    /// Comparison ignores ASCII case and whitespace around the pointer star.
    /// Returns `None` for spellings outside the known set.
    pub fn from_host_type(canonical: &str) -> Option<Self> {
        let normalized: String = canonical
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .replace(" *", "*")
            .to_ascii_lowercase();

        let resolved = match normalized.as_str() {
            "nsstring*" | "nsmutablestring*" | "nsstring" => Self::String,
            "nsnumber*" => Self::Number,
            "nsdate*" => Self::Date,
            "nsdata*" | "nsmutabledata*" => Self::Binary,
            "bool" => Self::Boolean,
            "int" => Self::Integer,
            "double" => Self::Double,
            _ => return None,
        };
        Some(resolved)
    }

    /// Resolve either a host spelling or a semantic type name (`"date"`,
    /// `"STRING"`). Anything else is [`SemanticType::Unknown`].
    pub fn resolve(type_name: &str) -> Self {
        Self::from_host_type(type_name)
            .or_else(|| type_name.trim().parse().ok())
            .unwrap_or(Self::Unknown)
    }
}

/// Expression reading column `i` of cursor `c` into a field of type `ty`.
///
/// `NUMBER` identifiers read through the 64-bit getter, every other `NUMBER`
/// through the 32-bit one. Unknown types fall back to the string getter; the
/// generator appends the verification marker.
pub fn read_expression_for(ty: SemanticType, is_identifier: bool, config: &GeneratorConfig) -> String {
    match ty {
        SemanticType::String | SemanticType::Unknown => "[c getString:i]".to_string(),
        SemanticType::Number if is_identifier => "[c getInt64:i]".to_string(),
        SemanticType::Number => "[c getInt:i]".to_string(),
        SemanticType::Date => format!("[{} getDateFromCursor:c idx:i]", config.model_base_type),
        SemanticType::Binary => {
            "[[NSData alloc] initWithBase64EncodedData:[c getString:i] options:0]".to_string()
        }
        SemanticType::Boolean => "[[c getInt:i] boolValue]".to_string(),
        SemanticType::Integer => "[[c getInt:i] integerValue]".to_string(),
        SemanticType::Double => "[[c getDouble:i] doubleValue]".to_string(),
    }
}
