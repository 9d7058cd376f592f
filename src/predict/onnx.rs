//! ONNX Runtime backend

use super::backend::{InferenceBackend, InputValue, ModelInput, ModelLoader, OutputSpec};
use crate::{OwError, Result};
use ort::session::Session;
use ort::value::{DynValue, Tensor, ValueType};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Loads an exported classifier from an `.onnx` file
#[derive(Debug, Clone)]
pub struct OnnxLoader {
    path: PathBuf,
}

impl OnnxLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        OnnxLoader {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModelLoader for OnnxLoader {
    fn load(&self) -> Result<Box<dyn InferenceBackend>> {
        Ok(Box::new(OnnxBackend::open(&self.path)?))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// ONNX session. Runs are serialized through the mutex.
pub struct OnnxBackend {
    session: Mutex<Session>,
    inputs: Vec<String>,
    outputs: Vec<OutputSpec>,
}

fn load_error(path: &Path, e: impl Display) -> OwError {
    OwError::ModelLoad(format!("{}: {}", path.display(), e))
}

fn run_error(e: impl Display) -> OwError {
    OwError::InferenceOutput(format!("inference failed: {}", e))
}

impl OnnxBackend {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(load_error(path, "model file not found"));
        }
        let builder = Session::builder().map_err(|e| load_error(path, e))?;
        let session = builder
            .commit_from_file(path)
            .map_err(|e| load_error(path, e))?;

        let inputs = session.inputs.iter().map(|i| i.name.clone()).collect();
        let outputs = session
            .outputs
            .iter()
            .map(|o| OutputSpec {
                name: o.name.clone(),
                is_tensor: matches!(o.output_type, ValueType::Tensor { .. }),
            })
            .collect();

        Ok(OnnxBackend {
            session: Mutex::new(session),
            inputs,
            outputs,
        })
    }

    fn to_value(input: &ModelInput) -> Result<DynValue> {
        let value = match &input.value {
            InputValue::Float(v) => Tensor::from_array(([1usize, 1], vec![*v]))
                .map(|t| t.into_dyn()),
            InputValue::Text(s) => Tensor::from_string_array(([1usize, 1], std::slice::from_ref(s)))
                .map(|t| t.into_dyn()),
        };
        value.map_err(|e| run_error(format!("input {}: {}", input.name, e)))
    }
}

/// Flatten a numeric tensor of any element type the exported pipelines emit
fn numeric_values(value: &DynValue) -> Option<Vec<f64>> {
    if let Ok((_, data)) = value.try_extract_tensor::<f32>() {
        return Some(data.iter().map(|v| *v as f64).collect());
    }
    if let Ok((_, data)) = value.try_extract_tensor::<f64>() {
        return Some(data.to_vec());
    }
    if let Ok((_, data)) = value.try_extract_tensor::<i64>() {
        return Some(data.iter().map(|v| *v as f64).collect());
    }
    None
}

impl InferenceBackend for OnnxBackend {
    fn input_names(&self) -> Vec<String> {
        self.inputs.clone()
    }

    fn outputs(&self) -> &[OutputSpec] {
        &self.outputs
    }

    fn run(&self, inputs: &[ModelInput], output: &str) -> Result<Vec<f64>> {
        let feed = inputs
            .iter()
            .map(|input| Ok((input.name.clone(), Self::to_value(input)?)))
            .collect::<Result<Vec<(String, DynValue)>>>()?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| run_error("session lock poisoned"))?;
        let results = session.run(feed).map_err(run_error)?;
        let value = results.get(output).ok_or_else(|| {
            OwError::InferenceOutput(format!("output {} missing from results", output))
        })?;
        let values = numeric_values(value).ok_or_else(|| {
            OwError::InferenceOutput(format!("output {} is not a numeric tensor", output))
        })?;
        Ok(values)
    }
}
