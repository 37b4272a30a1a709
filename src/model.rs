use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::ModelError;
use crate::features::{FEATURE_COUNT, FeatureVector};

/// A pre-fit regressor mapping a route's features to grams of CO2.
/// Implementations are read-only after construction and shared across requests.
pub trait EmissionModel: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> f64;
}

/// Serialized model exported by the training pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModelArtifact {
    Linear(LinearModel),
    Forest(ForestModel),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

/// Averaged ensemble of regression trees.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForestModel {
    pub trees: Vec<Vec<TreeNode>>,
}

/// Node 0 of each tree is the root. A split sends a sample left when
/// `features[feature] <= threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl ModelArtifact {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ModelError::ReadError {
            filepath: path.display().to_string(),
            error: e.to_string(),
        })?;
        let artifact = Self::from_json(&text)?;
        tracing::info!("loaded {} model from {}", artifact.kind(), path.display());
        Ok(artifact)
    }

    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = serde_json::from_str(text)?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::Linear(_) => "linear",
            ModelArtifact::Forest(_) => "forest",
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        match self {
            ModelArtifact::Linear(m) => {
                if m.coefficients.len() != FEATURE_COUNT {
                    return Err(ModelError::Invalid(format!(
                        "expected {} coefficients, found {}",
                        FEATURE_COUNT,
                        m.coefficients.len()
                    )));
                }
                if !m.intercept.is_finite() || m.coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(ModelError::Invalid("non-finite linear weight".to_string()));
                }
                Ok(())
            }
            ModelArtifact::Forest(m) => {
                if m.trees.is_empty() {
                    return Err(ModelError::Invalid("forest has no trees".to_string()));
                }
                m.trees.iter().enumerate().try_for_each(|(i, tree)| {
                    validate_tree(tree)
                        .map_err(|msg| ModelError::Invalid(format!("tree {}: {}", i, msg)))
                })
            }
        }
    }
}

// Children must point strictly forward, so every walk reaches a leaf.
fn validate_tree(nodes: &[TreeNode]) -> Result<(), String> {
    if nodes.is_empty() {
        return Err("no nodes".to_string());
    }
    for (idx, node) in nodes.iter().enumerate() {
        match *node {
            TreeNode::Split { feature, threshold, left, right } => {
                if feature >= FEATURE_COUNT {
                    return Err(format!("node {} splits on unknown feature {}", idx, feature));
                }
                if threshold.is_nan() {
                    return Err(format!("node {} has a NaN threshold", idx));
                }
                for child in [left, right] {
                    if child <= idx || child >= nodes.len() {
                        return Err(format!("node {} has invalid child {}", idx, child));
                    }
                }
            }
            TreeNode::Leaf { value } => {
                if !value.is_finite() {
                    return Err(format!("node {} has a non-finite leaf", idx));
                }
            }
        }
    }
    Ok(())
}

fn walk_tree(nodes: &[TreeNode], x: &[f64]) -> f64 {
    let mut idx = 0;
    loop {
        match nodes[idx] {
            TreeNode::Split { feature, threshold, left, right } => {
                idx = if x[feature] <= threshold { left } else { right };
            }
            TreeNode::Leaf { value } => return value,
        }
    }
}

impl EmissionModel for ModelArtifact {
    fn predict(&self, features: &FeatureVector) -> f64 {
        let x = features.as_slice();
        match self {
            ModelArtifact::Linear(m) => {
                m.intercept + m.coefficients.iter().zip(x).map(|(c, v)| c * v).sum::<f64>()
            }
            ModelArtifact::Forest(m) => {
                let total: f64 = m.trees.iter().map(|tree| walk_tree(tree, x)).sum();
                total / m.trees.len() as f64
            }
        }
    }
}
