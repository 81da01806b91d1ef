//! frame selection and mask bounding-box utilities over image batches.
//!
//! the crate exposes two stateless transforms behind a declarative node
//! contract: [`select::FrameSelector`] composites selected frames over a
//! constant placeholder and emits per-frame masks, and
//! [`bbox::MaskBoundingBoxExtractor`] reduces each mask in a batch to its
//! tight enclosing rectangle. both operate on [`burn`] tensors so the work
//! stays on whatever device the inputs already live on, and both hand their
//! results back as host-side data.

pub mod bbox;
pub mod error;
pub mod node;
pub mod select;
pub mod tensorops;

use burn::{prelude::Backend, tensor::Tensor};

use crate::error::FramepickError;

pub use bbox::{BoundingBox, MaskBoundingBoxExtractor};
pub use select::{FrameSelector, Selection};

/// mask value marking a placeholder frame with no selected content.
pub const MASK_EMPTY: f32 = 1.0;
/// mask value marking a frame that holds real selected content.
pub const MASK_CONTENT: f32 = 0.0;

/// the accepted ranks for mask-valued inputs.
///
/// masks arrive from the host in one of three layouts; anything else is a
/// caller error rather than something to guess at with broadcasting rules.
#[derive(Debug, Clone)]
pub enum MaskInput<B: Backend> {
    /// a single `(height, width)` mask, treated as a batch of one.
    Single(Tensor<B, 2>),
    /// a `(batch, height, width)` mask batch.
    Batch(Tensor<B, 3>),
    /// a `(batch, height, width, 1)` mask batch carrying a trailing singleton
    /// channel dimension. any other channel count is rejected.
    Channeled(Tensor<B, 4>),
}

impl<B: Backend> MaskInput<B> {
    /// normalizes to the canonical `(batch, height, width)` rank.
    pub fn into_batch(self) -> crate::error::Result<Tensor<B, 3>> {
        match self {
            MaskInput::Single(mask) => Ok(mask.unsqueeze::<3>()),
            MaskInput::Batch(mask) => Ok(mask),
            MaskInput::Channeled(mask) => {
                let dims = mask.dims();
                if dims[3] != 1 {
                    return Err(FramepickError::MaskShape {
                        shape: dims.to_vec(),
                        reason: "trailing channel dimension must be 1",
                    });
                }
                Ok(mask.squeeze::<3>(3))
            }
        }
    }
}
