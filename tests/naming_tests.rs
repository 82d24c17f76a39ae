//! Constant naming integration tests
//!
//! Covers the transliteration rules used to derive constant names from
//! field names, including the property-based guarantees.

use dbmodel_codegen::codegen::{field_constant_name, table_constant_name, transliterate};
use proptest::prelude::*;

mod transliteration {
    use super::*;

    #[test]
    fn camel_case_words_are_split() {
        assert_eq!(transliterate("createdAt"), "CREATED_AT");
        assert_eq!(transliterate("remoteURLValue"), "REMOTE_URL_VALUE");
        assert_eq!(transliterate("title"), "TITLE");
    }

    #[test]
    fn qualified_names() {
        assert_eq!(table_constant_name("PEX_DBFT"), "PEX_DBFT_TABLE_NAME");
        assert_eq!(field_constant_name("PEX_DBFT", "createdAt"), "PEX_DBFT_FIELD_CREATED_AT");
        assert_eq!(field_constant_name("PEX_DBFT", "id"), "PEX_DBFT_FIELD_ID");
    }
}

mod properties {
    use super::*;

    fn camel_case() -> impl Strategy<Value = String> {
        "[a-z]{1,8}([A-Z][a-z]{1,8}){0,3}"
    }

    proptest! {
        #[test]
        fn transliteration_is_idempotent(name in camel_case()) {
            let once = transliterate(&name);
            prop_assert_eq!(transliterate(&once), once);
        }

        #[test]
        fn output_is_upper_snake(name in camel_case()) {
            let out = transliterate(&name);
            prop_assert!(out.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
            prop_assert!(!out.starts_with('_') && !out.ends_with('_'));
        }

        #[test]
        fn digits_keep_names_apart(name in camel_case(), a in 0u8..10, b in 0u8..10) {
            prop_assume!(a != b);
            prop_assert_ne!(
                transliterate(&format!("{}{}", name, a)),
                transliterate(&format!("{}{}", name, b))
            );
        }
    }
}
