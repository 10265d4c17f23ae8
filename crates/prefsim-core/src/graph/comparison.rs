//! Structured comparison strings such as `"a>bc>d"`.
//!
//! Groups are separated by `>` and ordered most to least preferred. Each
//! character inside a group is one item, so `bc` is a tie between items 1
//! and 2. Letters `a`..`g` stand for the digits `0`..`6`.

use crate::error::DatasetError;
use crate::types::{ItemId, PreferenceGraph, PreferencePair};

/// Delimiter between ordered groups.
pub const ORDER_DELIMITER: char = '>';

/// Replace letter-coded items `a`..`g` with the digits `0`..`6`.
pub fn decode_letters(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'a'..='g' => char::from(b'0' + (c as u8 - b'a')),
            other => other,
        })
        .collect()
}

/// Decode and split a comparison string into ordered groups of item ids.
pub fn parse_groups(input: &str) -> Result<Vec<Vec<ItemId>>, DatasetError> {
    let decoded = decode_letters(input.trim());

    decoded
        .split(ORDER_DELIMITER)
        .map(|group| {
            if group.is_empty() {
                return Err(DatasetError::Comparison {
                    input: input.to_string(),
                    message: "empty group".to_string(),
                });
            }
            group
                .chars()
                .map(|c| {
                    c.to_digit(10).map(|d| d as ItemId).ok_or_else(|| {
                        DatasetError::Comparison {
                            input: input.to_string(),
                            message: format!("unexpected character {c:?}"),
                        }
                    })
                })
                .collect()
        })
        .collect()
}

/// Cross product of every earlier group against every later group.
///
/// Members of the same group are tied and produce no edge.
pub fn group_pairs(groups: &[Vec<ItemId>]) -> PreferenceGraph {
    let mut graph = PreferenceGraph::new();
    for (j, earlier) in groups.iter().enumerate() {
        for later in &groups[j + 1..] {
            for &winner in earlier {
                graph.extend(later.iter().map(|&loser| PreferencePair::new(winner, loser)));
            }
        }
    }
    graph
}

/// Parse a comparison string straight into its preference pairs.
pub fn comparison_pairs(input: &str) -> Result<PreferenceGraph, DatasetError> {
    Ok(group_pairs(&parse_groups(input)?))
}
