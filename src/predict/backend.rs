//! Inference backend abstraction
//!
//! The adapter talks to a loaded model only through these traits, so the
//! ONNX runtime can be swapped for an in-process fake.

use crate::Result;

/// A single scalar input fed as a `[1, 1]` tensor
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Float(f32),
    Text(String),
}

/// Named model input
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInput {
    pub name: String,
    pub value: InputValue,
}

impl ModelInput {
    pub fn float(name: &str, value: f32) -> Self {
        ModelInput {
            name: name.to_string(),
            value: InputValue::Float(value),
        }
    }

    pub fn text(name: &str, value: &str) -> Self {
        ModelInput {
            name: name.to_string(),
            value: InputValue::Text(value.to_string()),
        }
    }
}

/// Declared model output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    pub name: String,
    /// False for sequence/map outputs such as sklearn's ZipMap probabilities
    pub is_tensor: bool,
}

impl OutputSpec {
    pub fn tensor(name: &str) -> Self {
        OutputSpec {
            name: name.to_string(),
            is_tensor: true,
        }
    }

    pub fn other(name: &str) -> Self {
        OutputSpec {
            name: name.to_string(),
            is_tensor: false,
        }
    }
}

/// A loaded model, shared read-only across requests
pub trait InferenceBackend: Send + Sync {
    /// Input names in declaration order
    fn input_names(&self) -> Vec<String>;

    /// Outputs in declaration order
    fn outputs(&self) -> &[OutputSpec];

    /// Run the model and return the flattened numeric values of one output
    fn run(&self, inputs: &[ModelInput], output: &str) -> Result<Vec<f64>>;
}

/// Produces a backend. Called at most once per adapter.
pub trait ModelLoader: Send + Sync {
    fn load(&self) -> Result<Box<dyn InferenceBackend>>;

    /// Human-readable source for logs
    fn describe(&self) -> String;
}
