//! Reconstruction of the ad unit tree from a flat fetch result.

use std::collections::HashSet;

use crate::error::TreeError;
use crate::schema::AdUnit;

/// Assemble the rooted tree for `root_id` out of a flat ad unit list.
///
/// Children are attached in flat-list order. A missing root is an error,
/// distinct from a present root without children. Every unit is visited
/// at most once; a parent reference looping back onto the path is
/// reported as [`TreeError::Cycle`] instead of recursing without bound.
///
/// Each unit costs one linear scan of the flat list, fine at the few
/// hundred units a network typically holds.
pub fn build_tree(root_id: &str, flat: &[AdUnit]) -> Result<AdUnit, TreeError> {
    let root = flat
        .iter()
        .find(|unit| unit.id == root_id)
        .ok_or_else(|| TreeError::RootNotFound(root_id.to_string()))?;

    let mut visited = HashSet::new();
    visited.insert(root.id.clone());
    assemble(root, flat, &mut visited)
}

fn assemble(
    node: &AdUnit,
    flat: &[AdUnit],
    visited: &mut HashSet<String>,
) -> Result<AdUnit, TreeError> {
    let mut assembled = node.clone();
    assembled.children = Vec::new();

    for candidate in flat {
        if candidate.parent_id.as_deref() == Some(node.id.as_str()) {
            if !visited.insert(candidate.id.clone()) {
                return Err(TreeError::Cycle(candidate.id.clone()));
            }
            assembled.children.push(assemble(candidate, flat, visited)?);
        }
    }

    Ok(assembled)
}
