//! Block-boundary segment chunker.
//!
//! Packs an ordered list of [`RenderedBlock`]s into [`Segment`]s that each
//! stay within a platform `ceiling`. Blocks are never split. Packing is a
//! single greedy pass that also stops filling a segment once it reaches the
//! `target` average length, so the load spreads over roughly the minimum
//! number of segments.
//!
//! The important-species block, if any, always becomes its own trailing
//! segment.

use crate::error::ReportError;
use crate::render::{ensure_fits, RenderedBlock};

/// One dispatchable slice of a post.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Segment {
    pub text: String,
    /// Length in characters.
    pub len: usize,
}

impl Segment {
    fn push(&mut self, block: &RenderedBlock, len: usize) {
        self.text.push_str(&block.text);
        self.len += len;
    }
}

/// Average segment length for the fewest segments that keep every segment
/// under `ceiling`: `total / (total / ceiling + 1)`.
pub fn target_length(blocks: &[RenderedBlock], ceiling: usize) -> usize {
    let total: usize = blocks.iter().map(RenderedBlock::len).sum();
    total / (total / ceiling.max(1) + 1)
}

/// Split `blocks` into segments.
///
/// A block is appended while the segment stays within `ceiling` and the
/// segment's current length is still below `target`; otherwise the segment
/// is closed and a new one starts with the block. The last segment is always
/// emitted, even if empty.
pub fn chunk_blocks(
    blocks: &[RenderedBlock],
    important: Option<&RenderedBlock>,
    ceiling: usize,
    target: usize,
) -> Result<Vec<Segment>, ReportError> {
    let mut segments = Vec::new();
    let mut current = Segment::default();

    for block in blocks {
        ensure_fits(block, ceiling)?;
        let len = block.len();

        if current.len + len <= ceiling && current.len < target.max(1) {
            current.push(block, len);
        } else {
            segments.push(std::mem::take(&mut current));
            current.push(block, len);
        }
    }
    segments.push(current);

    if let Some(important) = important.filter(|b| !b.is_empty()) {
        ensure_fits(important, ceiling)?;
        let mut tail = Segment::default();
        tail.push(important, important.len());
        segments.push(tail);
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(label: &str, len: usize) -> RenderedBlock {
        RenderedBlock::new(label, label.chars().cycle().take(len).collect::<String>())
    }

    fn with_anchor(mut blocks: Vec<RenderedBlock>) -> Vec<RenderedBlock> {
        blocks.insert(0, RenderedBlock::new("anchor", ""));
        blocks
    }

    fn concat(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_three_large_blocks_never_merge() {
        let blocks = with_anchor(vec![block("a", 1800), block("b", 1800), block("c", 1800)]);
        let target = target_length(&blocks, 2000);
        assert_eq!(target, 1800);

        let segments = chunk_blocks(&blocks, None, 2000, target).unwrap();
        assert_eq!(segments.len(), 3);
        for s in &segments {
            assert_eq!(s.len, 1800);
        }
    }

    #[test]
    fn test_small_blocks_share_a_segment() {
        let blocks = with_anchor(vec![block("p", 100), block("a", 300), block("b", 300)]);
        let target = target_length(&blocks, 2000);
        let segments = chunk_blocks(&blocks, None, 2000, target).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].len, 700);
    }

    #[test]
    fn test_block_equal_to_ceiling_stands_alone() {
        let blocks = with_anchor(vec![block("p", 50), block("a", 2000), block("b", 10)]);
        let target = target_length(&blocks, 2000);
        let segments = chunk_blocks(&blocks, None, 2000, target).unwrap();
        assert!(segments.iter().all(|s| s.len <= 2000));
        assert!(segments.iter().any(|s| s.len == 2000 && s.text.chars().all(|c| c == 'a')));
    }

    #[test]
    fn test_oversized_block_is_an_error() {
        let blocks = with_anchor(vec![block("p", 50), block("Sprawl", 2001)]);
        let err = chunk_blocks(&blocks, None, 2000, 1000).unwrap_err();
        assert_eq!(
            err,
            ReportError::OversizedSection {
                geography: "Sprawl".to_string(),
                len: 2001,
                ceiling: 2000
            }
        );
    }

    #[test]
    fn test_concatenation_and_ceiling_hold_across_layouts() {
        let ceiling = 2000;
        let layouts: &[&[usize]] = &[
            &[120, 1900, 5, 640, 640, 1999, 30, 700, 1300, 1, 888],
            &[10, 20, 30, 40, 50, 60, 70, 80, 90],
            &[2000, 2000, 2000],
            &[1999],
            &[1, 2000, 1, 1999, 1],
            &[1000, 1000, 1000, 1000, 1001],
            &[0, 0, 500, 0, 1500, 0],
        ];

        for sizes in layouts {
            let blocks = with_anchor(
                sizes
                    .iter()
                    .enumerate()
                    .map(|(i, &n)| block(&((b'a' + i as u8) as char).to_string(), n))
                    .collect(),
            );
            let important = block("z", 400);
            let target = target_length(&blocks, ceiling);

            let segments = chunk_blocks(&blocks, Some(&important), ceiling, target).unwrap();

            let mut expected: String = blocks.iter().map(|b| b.text.as_str()).collect();
            expected.push_str(&important.text);
            assert_eq!(concat(&segments), expected, "layout {:?}", sizes);
            assert!(segments.iter().all(|s| s.len <= ceiling), "layout {:?}", sizes);
            assert!(
                segments.iter().all(|s| s.len == s.text.chars().count()),
                "layout {:?}",
                sizes
            );
            assert_eq!(segments.last().unwrap().text, important.text, "layout {:?}", sizes);
        }
    }

    #[test]
    fn test_empty_input_yields_one_empty_segment() {
        let segments = chunk_blocks(&[], None, 2000, 0).unwrap();
        assert_eq!(segments, vec![Segment::default()]);
    }

    #[test]
    fn test_all_empty_blocks_stay_in_one_segment() {
        let blocks = with_anchor(vec![RenderedBlock::new("preamble", "")]);
        let target = target_length(&blocks, 2000);
        assert_eq!(target, 0);
        let segments = chunk_blocks(&blocks, None, 2000, target).unwrap();
        assert_eq!(segments, vec![Segment::default()]);
    }

    #[test]
    fn test_empty_important_block_is_dropped() {
        let blocks = with_anchor(vec![block("p", 10)]);
        let empty = RenderedBlock::new("notable", "");
        let segments = chunk_blocks(&blocks, Some(&empty), 2000, 10).unwrap();
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_oversized_important_block_is_an_error() {
        let blocks = with_anchor(vec![block("p", 10)]);
        let important = block("notable", 2500);
        assert!(matches!(
            chunk_blocks(&blocks, Some(&important), 2000, 10),
            Err(ReportError::OversizedSection { .. })
        ));
    }

    #[test]
    fn test_deterministic() {
        let blocks = with_anchor(vec![block("a", 900), block("b", 900), block("c", 900)]);
        let target = target_length(&blocks, 2000);
        let s1 = chunk_blocks(&blocks, None, 2000, target).unwrap();
        let s2 = chunk_blocks(&blocks, None, 2000, target).unwrap();
        assert_eq!(s1, s2);
    }
}
