//! Decision tree storage and traversal.
//!
//! Trees are stored structure-of-arrays: one flat array per node attribute,
//! indexed by node id (root = 0). A tree is only constructed through
//! [`Tree::from_nodes`], which validates the structure so traversal can never
//! index out of bounds or loop.

use serde::Deserialize;
use thiserror::Error;

use crate::domain::SplitCondition;

/// One node as written in a model artifact.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    Split {
        feature: u32,
        threshold: f64,
        left: u32,
        right: u32,
    },
    Leaf {
        leaf: f64,
    },
}

/// Structural problems found while building a [`Tree`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeValidationError {
    #[error("tree has no nodes")]
    EmptyTree,

    #[error("node {node} {side} child {child} is out of bounds (n_nodes={n_nodes})")]
    ChildOutOfBounds {
        node: u32,
        side: &'static str,
        child: u32,
        n_nodes: usize,
    },

    #[error("node {node} references itself")]
    SelfLoop { node: u32 },

    #[error("node {node} is reached more than once (shared subtree or cycle)")]
    DuplicateVisit { node: u32 },

    #[error("node {node} is unreachable from the root")]
    UnreachableNode { node: u32 },

    #[error("node {node} splits on feature {feature}, model has {n_features} features")]
    FeatureOutOfRange {
        node: u32,
        feature: u32,
        n_features: usize,
    },

    #[error("node {node} has a non-finite threshold")]
    NonFiniteThreshold { node: u32 },

    #[error("node {node} has a non-finite leaf value")]
    NonFiniteLeaf { node: u32 },
}

#[derive(Debug, Clone)]
pub struct Tree {
    split_indices: Box<[u32]>,
    split_thresholds: Box<[f64]>,
    left_children: Box<[u32]>,
    right_children: Box<[u32]>,
    is_leaf: Box<[bool]>,
    leaf_values: Box<[f64]>,
}

impl Tree {
    /// Build and validate a tree over `n_features` inputs.
    pub fn from_nodes(nodes: &[NodeSpec], n_features: usize) -> Result<Self, TreeValidationError> {
        let n_nodes = nodes.len();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }

        let mut split_indices = vec![0u32; n_nodes];
        let mut split_thresholds = vec![0f64; n_nodes];
        let mut left_children = vec![0u32; n_nodes];
        let mut right_children = vec![0u32; n_nodes];
        let mut is_leaf = vec![false; n_nodes];
        let mut leaf_values = vec![0f64; n_nodes];

        for (idx, node) in nodes.iter().enumerate() {
            let id = idx as u32;
            match *node {
                NodeSpec::Leaf { leaf } => {
                    if !leaf.is_finite() {
                        return Err(TreeValidationError::NonFiniteLeaf { node: id });
                    }
                    is_leaf[idx] = true;
                    leaf_values[idx] = leaf;
                }
                NodeSpec::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature as usize >= n_features {
                        return Err(TreeValidationError::FeatureOutOfRange {
                            node: id,
                            feature,
                            n_features,
                        });
                    }
                    if !threshold.is_finite() {
                        return Err(TreeValidationError::NonFiniteThreshold { node: id });
                    }
                    for (side, child) in [("left", left), ("right", right)] {
                        if child as usize >= n_nodes {
                            return Err(TreeValidationError::ChildOutOfBounds {
                                node: id,
                                side,
                                child,
                                n_nodes,
                            });
                        }
                        if child == id {
                            return Err(TreeValidationError::SelfLoop { node: id });
                        }
                    }
                    split_indices[idx] = feature;
                    split_thresholds[idx] = threshold;
                    left_children[idx] = left;
                    right_children[idx] = right;
                }
            }
        }

        // Every node must be reached exactly once from the root.
        let mut visited = vec![false; n_nodes];
        let mut stack = vec![0u32];
        while let Some(node) = stack.pop() {
            let idx = node as usize;
            if visited[idx] {
                return Err(TreeValidationError::DuplicateVisit { node });
            }
            visited[idx] = true;
            if !is_leaf[idx] {
                stack.push(right_children[idx]);
                stack.push(left_children[idx]);
            }
        }
        if let Some(idx) = visited.iter().position(|v| !v) {
            return Err(TreeValidationError::UnreachableNode { node: idx as u32 });
        }

        Ok(Self {
            split_indices: split_indices.into_boxed_slice(),
            split_thresholds: split_thresholds.into_boxed_slice(),
            left_children: left_children.into_boxed_slice(),
            right_children: right_children.into_boxed_slice(),
            is_leaf: is_leaf.into_boxed_slice(),
            leaf_values: leaf_values.into_boxed_slice(),
        })
    }

    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.is_leaf.iter().filter(|&&leaf| leaf).count()
    }

    /// Walk from the root to a leaf and return its value.
    ///
    /// Inputs are narrowed to `f32`, the precision trees are trained on, then
    /// compared against the `f64` thresholds. `features` must cover every
    /// split index (checked at load).
    #[inline]
    pub fn predict(&self, features: &[f64], condition: SplitCondition) -> f64 {
        let mut node = 0usize;
        while !self.is_leaf[node] {
            let x = features[self.split_indices[node] as usize] as f32;
            node = if condition.goes_left(x, self.split_thresholds[node]) {
                self.left_children[node]
            } else {
                self.right_children[node]
            } as usize;
        }
        self.leaf_values[node]
    }
}
