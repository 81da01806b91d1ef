//! auxiliary mask reconciliation against a primary frame batch.

use burn::{
    prelude::Backend,
    tensor::{
        Tensor,
        module::interpolate,
        ops::{InterpolateMode, InterpolateOptions},
    },
};

use crate::{
    MaskInput,
    error::{FramepickError, Result},
};

/// brings an auxiliary mask into agreement with the primary batch: canonical
/// rank, the batch's `(height, width)` spatial size, and exactly
/// `frame_count` frames.
pub fn reconcile<B: Backend>(
    mask: MaskInput<B>,
    frame_count: usize,
    height: usize,
    width: usize,
) -> Result<Tensor<B, 3>> {
    let mask = mask.into_batch()?;
    if mask.dims()[0] == 0 {
        return Err(FramepickError::EmptyBatch);
    }
    let mask = resize_nearest(mask, height, width);
    Ok(repeat_to_count(mask, frame_count))
}

/// nearest-neighbor spatial resize. nearest keeps hard mask edges hard
/// instead of introducing fractional values around boundaries.
fn resize_nearest<B: Backend>(mask: Tensor<B, 3>, height: usize, width: usize) -> Tensor<B, 3> {
    let [_, mask_height, mask_width] = mask.dims();
    if (mask_height, mask_width) == (height, width) {
        return mask;
    }
    log::debug!(
        "resizing auxiliary mask from {}x{} to {}x{}",
        mask_height,
        mask_width,
        height,
        width
    );
    // interpolate wants NCHW, so round-trip through a singleton channel dim.
    let mask = mask.unsqueeze_dim::<4>(1);
    let mask = interpolate(
        mask,
        [height, width],
        InterpolateOptions::new(InterpolateMode::Nearest),
    );
    mask.squeeze::<3>(1)
}

/// minimal-period repetition of `mask` truncated to exactly `frame_count`
/// frames. the leading frames of the result always equal the input sequence.
fn repeat_to_count<B: Backend>(mask: Tensor<B, 3>, frame_count: usize) -> Tensor<B, 3> {
    let count = mask.dims()[0];
    if count == frame_count {
        return mask;
    }
    if count > frame_count {
        return mask.slice([0..frame_count]);
    }
    let repeats = frame_count.div_ceil(count);
    Tensor::cat(vec![mask; repeats], 0).slice([0..frame_count])
}
