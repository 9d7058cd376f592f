//! Prediction and inference
//!
//! Load the trained classifier once and turn two rosters into win probabilities.

pub mod adapter;
pub mod backend;
pub mod onnx;
pub mod service;

pub use adapter::{InferenceAdapter, ModelOutput};
pub use backend::{InferenceBackend, InputValue, ModelInput, ModelLoader, OutputSpec};
pub use onnx::OnnxLoader;
pub use service::{format_prediction, PredictionService};
