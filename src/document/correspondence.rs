//! Block correspondence tracking between the two language renderings.
//!
//! After translation, a job holds two structured documents whose block sets
//! must be identical and identically ordered. [`CorrespondenceMap::pair`]
//! verifies that and exposes the id-keyed lookup that side-by-side rendering
//! and block-level export are built on: given a block id in one language,
//! find its counterpart in the other.

use std::collections::HashMap;

use crate::document::{Block, DocumentError, StructuredDocument};

/// A source-language block and its target-language counterpart.
#[derive(Debug, Clone)]
pub struct BlockPair {
    pub source: Block,
    pub target: Block,
}

/// Verified 1:1 pairing of the blocks of two documents.
#[derive(Debug)]
pub struct CorrespondenceMap {
    pairs: HashMap<String, BlockPair>,
    source_language: String,
    target_language: String,
}

impl CorrespondenceMap {
    /// Builds the block pairing for a source and target document.
    ///
    /// Fails with [`DocumentError::CorrespondenceMismatch`] if the two block
    /// id sets differ, or if the ids appear in a different page/block order.
    /// Either condition means the translation stage did not preserve the
    /// block set bijectively and is a defect, not a user input problem.
    pub fn pair(
        source: &StructuredDocument,
        target: &StructuredDocument,
    ) -> Result<Self, DocumentError> {
        let source_ids = source.block_ids();
        let target_ids = target.block_ids();

        if source_ids != target_ids {
            let missing = difference(&source_ids, &target_ids);
            let unexpected = difference(&target_ids, &source_ids);
            return Err(DocumentError::CorrespondenceMismatch {
                missing,
                unexpected,
            });
        }

        let mut pairs = HashMap::with_capacity(source_ids.len());
        for (source_block, target_block) in source.blocks().zip(target.blocks()) {
            pairs.insert(
                source_block.block_id.clone(),
                BlockPair {
                    source: source_block.clone(),
                    target: target_block.clone(),
                },
            );
        }

        Ok(Self {
            pairs,
            source_language: source.language.clone(),
            target_language: target.language.clone(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub fn get(&self, block_id: &str) -> Option<&BlockPair> {
        self.pairs.get(block_id)
    }

    /// Resolves the counterpart of a block the caller is looking at.
    ///
    /// `language` is the language of the block the caller holds; the block
    /// returned is the paired block in the opposite language. Returns `None`
    /// for an unknown id or a language tag matching neither document.
    #[must_use]
    pub fn counterpart(&self, block_id: &str, language: &str) -> Option<&Block> {
        let pair = self.pairs.get(block_id)?;
        if language == self.source_language {
            Some(&pair.target)
        } else if language == self.target_language {
            Some(&pair.source)
        } else {
            None
        }
    }
}

fn difference(left: &[&str], right: &[&str]) -> Vec<String> {
    let right_set: std::collections::HashSet<&str> = right.iter().copied().collect();
    left.iter()
        .filter(|id| !right_set.contains(**id))
        .map(|id| (*id).to_string())
        .collect()
}
