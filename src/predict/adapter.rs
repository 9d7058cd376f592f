//! Inference adapter
//!
//! Feeds the feature vector plus the artifact's fixed categorical inputs to
//! the model, picks the probability output and normalizes it.

use super::backend::{InferenceBackend, ModelInput, ModelLoader, OutputSpec};
use crate::features::FeatureVector;
use crate::{OwError, PredictionResult, Result};
use once_cell::sync::OnceCell;

/// Categorical inputs the trained artifact requires but does not use
pub const PLACEHOLDER_INPUTS: [(&str, &str); 2] = [("phase", "Control"), ("stage", "Group")];

/// Tolerance before a probability pair is rescaled to sum to one
const PAIR_SUM_TOLERANCE: f64 = 1e-6;

/// Raw model output classified by shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelOutput {
    /// Hard class label; true means team 1 wins
    Label(bool),
    /// Class probabilities
    ProbabilityPair { team1: f64, team2: f64 },
}

impl ModelOutput {
    /// Classify the values of the selected output
    pub fn decode(values: &[f64]) -> Result<Self> {
        match values {
            [] => Err(OwError::InferenceOutput(
                "selected output is empty".to_string(),
            )),
            [label] => {
                if *label == 0.0 {
                    Ok(ModelOutput::Label(false))
                } else if *label == 1.0 {
                    Ok(ModelOutput::Label(true))
                } else {
                    Err(OwError::InferenceOutput(format!(
                        "single-value output {} is not a 0/1 label",
                        label
                    )))
                }
            }
            [team2, team1, rest @ ..] => {
                if !rest.is_empty() {
                    log::debug!(
                        "Output has {} values, using the first two",
                        values.len()
                    );
                }
                Ok(ModelOutput::ProbabilityPair {
                    team1: *team1,
                    team2: *team2,
                })
            }
        }
    }

    /// Convert into a complementary probability pair
    pub fn normalize(self) -> Result<PredictionResult> {
        match self {
            ModelOutput::Label(team1_wins) => {
                Ok(PredictionResult::new(if team1_wins { 1.0 } else { 0.0 }))
            }
            ModelOutput::ProbabilityPair { team1, team2 } => {
                if !team1.is_finite() || !team2.is_finite() || team1 < 0.0 || team2 < 0.0 {
                    return Err(OwError::InferenceOutput(format!(
                        "invalid class probabilities [{}, {}]",
                        team2, team1
                    )));
                }
                let sum = team1 + team2;
                if sum <= 0.0 {
                    return Err(OwError::InferenceOutput(
                        "class probabilities sum to zero".to_string(),
                    ));
                }
                let p = if (sum - 1.0).abs() > PAIR_SUM_TOLERANCE {
                    log::warn!("Class probabilities sum to {}, rescaling", sum);
                    team1 / sum
                } else {
                    team1
                };
                Ok(PredictionResult::new(p))
            }
        }
    }
}

/// Pick the class-probability output: the second tensor output if there is
/// one, otherwise the first.
pub fn select_output(outputs: &[OutputSpec]) -> Result<&OutputSpec> {
    let tensors: Vec<&OutputSpec> = outputs.iter().filter(|o| o.is_tensor).collect();
    tensors
        .get(1)
        .or_else(|| tensors.first())
        .copied()
        .ok_or_else(|| {
            OwError::InferenceOutput(format!(
                "model has no tensor outputs (outputs: {})",
                outputs
                    .iter()
                    .map(|o| o.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
}

/// Model feed for one prediction
pub fn model_inputs(features: &FeatureVector) -> Vec<ModelInput> {
    features
        .named()
        .map(|(name, value)| ModelInput::float(name, value as f32))
        .chain(
            PLACEHOLDER_INPUTS
                .iter()
                .map(|(name, value)| ModelInput::text(name, value)),
        )
        .collect()
}

/// Lazily loads the model once and serves predictions from the cached handle
pub struct InferenceAdapter {
    loader: Box<dyn ModelLoader>,
    backend: OnceCell<Box<dyn InferenceBackend>>,
}

impl InferenceAdapter {
    pub fn new(loader: impl ModelLoader + 'static) -> Self {
        InferenceAdapter {
            loader: Box::new(loader),
            backend: OnceCell::new(),
        }
    }

    /// The loaded backend. Concurrent first callers block until a single
    /// load finishes. A failed load is reported and not cached.
    pub fn backend(&self) -> Result<&dyn InferenceBackend> {
        let backend = self.backend.get_or_try_init(|| {
            log::info!("Loading model from {}", self.loader.describe());
            let backend = self.loader.load()?;
            log::info!(
                "Model loaded with outputs: {}",
                backend
                    .outputs()
                    .iter()
                    .map(|o| format!("{}{}", o.name, if o.is_tensor { "" } else { " (non-tensor)" }))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            Ok::<_, OwError>(backend)
        })?;
        Ok(backend.as_ref())
    }

    /// Load eagerly so a missing artifact surfaces at startup
    pub fn warm_up(&self) -> Result<()> {
        self.backend().map(|_| ())
    }

    pub fn is_loaded(&self) -> bool {
        self.backend.get().is_some()
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult> {
        let backend = self.backend()?;
        let output = select_output(backend.outputs())?;
        let values = backend.run(&model_inputs(features), &output.name)?;
        let decoded = ModelOutput::decode(&values)?;
        let result = decoded.normalize()?;
        log::debug!(
            "Output {} decoded as {:?} -> team1 {:.4}",
            output.name,
            decoded,
            result.team1()
        );
        Ok(result)
    }
}
