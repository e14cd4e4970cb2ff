//! Classification models with compile-time training state.

use crate::error::Result;
use crate::serialization::{read_params, write_params, SerializableParams};

pub mod linear;
pub mod state;

pub use state::{Fitted, Unfitted};

/// A trained model that can score inputs and be persisted.
pub trait InferenceModel {
    type Input: ?Sized;
    type Output;
    /// Plain serializable form of the model parameters.
    type ParamsRepr: SerializableParams;

    /// Score a single input.
    fn predict(&self, input: &Self::Input) -> Result<Self::Output>;

    fn extract_params(&self) -> Self::ParamsRepr;

    fn from_params(params: Self::ParamsRepr) -> Result<Self>
    where
        Self: Sized;

    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        write_params(&self.extract_params(), path)
    }

    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self>
    where
        Self: Sized,
    {
        Self::from_params(read_params(path)?)
    }
}
