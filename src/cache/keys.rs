// Cache key derivation for memoized provider calls
// Author: kelexine (https://github.com/kelexine)

use sha2::{Digest, Sha256};
use std::fmt;

/// The kind of expensive operation a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Embedding,
    Comparison,
}

impl OperationKind {
    /// Fixed key prefix for this operation
    pub fn prefix(self) -> &'static str {
        match self {
            OperationKind::Embedding => "emb",
            OperationKind::Comparison => "cmp",
        }
    }

    /// Label used in logs and Prometheus series
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Embedding => "embedding",
            OperationKind::Comparison => "comparison",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hex SHA256 of `text`. Always 64 characters, including for empty input.
pub fn digest(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Build `<prefix>[:<target>]:<sha256(text)>`.
///
/// The digest is fixed-width, so the target is unambiguous even when it
/// contains `:` itself.
pub fn derive_key(kind: OperationKind, target: Option<&str>, text: &str) -> String {
    let digest = digest(text);
    match target {
        Some(target) => format!("{}:{}:{}", kind.prefix(), target, digest),
        None => format!("{}:{}", kind.prefix(), digest),
    }
}

/// Key for an embedding of already-normalized text
pub fn embedding_key(normalized_text: &str) -> String {
    derive_key(OperationKind::Embedding, None, normalized_text)
}

/// Key for comparing already-normalized contract text against a library clause
pub fn comparison_key(clause_id: &str, normalized_contract_text: &str) -> String {
    derive_key(OperationKind::Comparison, Some(clause_id), normalized_contract_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_embedding_key_shape() {
        let key = embedding_key("indemnification");
        assert!(key.starts_with("emb:"));
        assert_eq!(key.len(), 4 + 64);
    }

    #[test]
    fn test_empty_text_has_well_defined_key() {
        assert_eq!(
            embedding_key(""),
            "emb:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_comparison_key_distinguishes_clause_and_text() {
        let a1 = comparison_key("clause-1", "contract A text");
        let a2 = comparison_key("clause-2", "contract A text");
        let b1 = comparison_key("clause-1", "contract B text");

        assert_ne!(a1, a2);
        assert_ne!(a1, b1);
        assert_eq!(a1, comparison_key("clause-1", "contract A text"));
    }

    #[test]
    fn test_large_text_key_is_bounded() {
        let text = "liability ".repeat(100_000);
        let key = comparison_key("clause-9", &text);
        assert_eq!(key.len(), "cmp:clause-9:".len() + 64);
    }

    #[test]
    fn test_kinds_never_share_keys() {
        assert_ne!(
            derive_key(OperationKind::Embedding, None, "x"),
            derive_key(OperationKind::Comparison, None, "x")
        );
    }

    proptest! {
        #[test]
        fn prop_key_is_deterministic(id in "[a-z0-9:-]{1,16}", text in ".*") {
            prop_assert_eq!(comparison_key(&id, &text), comparison_key(&id, &text));
        }

        #[test]
        fn prop_different_text_gives_different_key(a in ".*", b in ".*") {
            prop_assume!(a != b);
            prop_assert_ne!(embedding_key(&a), embedding_key(&b));
        }

        #[test]
        fn prop_different_target_gives_different_key(
            a in "[a-z0-9:-]{1,16}",
            b in "[a-z0-9:-]{1,16}",
            text in ".{0,64}",
        ) {
            prop_assume!(a != b);
            prop_assert_ne!(comparison_key(&a, &text), comparison_key(&b, &text));
        }
    }
}
