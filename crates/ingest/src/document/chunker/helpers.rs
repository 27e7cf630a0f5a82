//! Text splitting and merging utilities used by the chunking strategy.

use std::collections::VecDeque;

use super::types::ChunkConfig;

/// Length in characters (not bytes).
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split `text` on `separator`, keeping the separator at the end of the
/// piece it terminates. An empty separator splits between characters.
/// Empty pieces are dropped.
pub(crate) fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, sep) in text.match_indices(separator) {
        let end = idx + sep.len();
        pieces.push(text[start..end].to_string());
        start = end;
    }
    if start < text.len() {
        pieces.push(text[start..].to_string());
    }
    pieces.retain(|p| !p.is_empty());
    pieces
}

/// Greedily merge small pieces into chunks of at most `chunk_size`
/// characters. When a chunk is emitted, pieces are dropped from its front
/// until the carried-over tail fits within `chunk_overlap` and leaves room
/// for the next piece.
pub(crate) fn merge_splits(splits: &[String], config: &ChunkConfig) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: VecDeque<&str> = VecDeque::new();
    let mut total = 0usize;

    for piece in splits {
        let len = char_len(piece);
        if total + len > config.chunk_size && !current.is_empty() {
            push_trimmed(&mut chunks, &current);
            while total > config.chunk_overlap || (total + len > config.chunk_size && total > 0) {
                match current.pop_front() {
                    Some(dropped) => total -= char_len(dropped),
                    None => break,
                }
            }
        }
        current.push_back(piece);
        total += len;
    }
    push_trimmed(&mut chunks, &current);
    chunks
}

fn push_trimmed(chunks: &mut Vec<String>, pieces: &VecDeque<&str>) {
    let joined: String = pieces.iter().copied().collect();
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

/// Split with the first separator present in `text`; pieces still too
/// large are split again with the remaining separators.
pub(crate) fn split_recursive(text: &str, separators: &[&str], config: &ChunkConfig) -> Vec<String> {
    let Some(pos) = separators
        .iter()
        .position(|s| s.is_empty() || text.contains(s))
    else {
        // Nothing left to split on; keep the oversized piece whole.
        let trimmed = text.trim();
        return if trimmed.is_empty() { Vec::new() } else { vec![trimmed.to_string()] };
    };
    let separator = separators[pos];
    let remaining = &separators[pos + 1..];

    let mut chunks = Vec::new();
    let mut small: Vec<String> = Vec::new();

    for piece in split_keeping_separator(text, separator) {
        if char_len(&piece) < config.chunk_size {
            small.push(piece);
            continue;
        }
        if !small.is_empty() {
            chunks.extend(merge_splits(&small, config));
            small.clear();
        }
        if remaining.is_empty() {
            let trimmed = piece.trim();
            if !trimmed.is_empty() {
                chunks.push(trimmed.to_string());
            }
        } else {
            chunks.extend(split_recursive(&piece, remaining, config));
        }
    }
    if !small.is_empty() {
        chunks.extend(merge_splits(&small, config));
    }
    chunks
}
