//! frame selection and placeholder compositing.

pub mod index;
pub mod reconcile;

use burn::{prelude::Backend, tensor::{Tensor, TensorData}};

use crate::{
    MASK_CONTENT, MASK_EMPTY, MaskInput,
    error::{FramepickError, Result},
    node::{FloatControl, InputSpec, NodeContract, NodeDescriptor, OutputSpec, ValueKind},
};

/// host-side result of a frame selection pass. both buffers live in host
/// memory at `f32` precision regardless of where the inputs came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// `(batch, height, width, channels)` frame data: selected frames pass
    /// through unchanged, the rest hold the uniform fill level.
    pub frames: TensorData,
    /// `(batch, height, width)` mask data, [`MASK_EMPTY`] for placeholder
    /// frames and [`MASK_CONTENT`] for selected ones.
    pub masks: TensorData,
}

/// picks frames out of a batch by a textual index specification and replaces
/// the rest with a constant-intensity placeholder.
pub struct FrameSelector;

const DESCRIPTOR: NodeDescriptor = NodeDescriptor {
    id: "IndexSelector",
    inputs: &[
        InputSpec::required("images", ValueKind::Image),
        InputSpec::required("index_selector", ValueKind::Text).with_default_text("0,1,2"),
        InputSpec::required("empty_frame_level", ValueKind::Float).with_control(FloatControl {
            default: 0.0,
            min: 0.0,
            max: 1.0,
            step: 0.01,
        }),
        InputSpec::optional("inpaint_mask", ValueKind::Mask),
    ],
    outputs: &[
        OutputSpec {
            name: "control_images",
            kind: ValueKind::Image,
        },
        OutputSpec {
            name: "masks",
            kind: ValueKind::Mask,
        },
    ],
};

impl NodeContract for FrameSelector {
    fn descriptor() -> &'static NodeDescriptor {
        &DESCRIPTOR
    }
}

impl FrameSelector {
    /// composites the frames named by `index_spec` over a uniform
    /// `fill_level` canvas and derives the matching per-frame masks.
    ///
    /// malformed specifications, out-of-range indices and mismatched
    /// auxiliary masks are all recovered silently; the only hard errors are
    /// an empty batch and an auxiliary mask with a real channel dimension.
    pub fn select<B: Backend>(
        &self,
        frames: Tensor<B, 4>,
        index_spec: &str,
        fill_level: f64,
        aux_mask: Option<MaskInput<B>>,
    ) -> Result<Selection> {
        let [count, height, width, channels] = frames.dims();
        if count == 0 || height == 0 || width == 0 || channels == 0 {
            return Err(FramepickError::EmptyBatch);
        }
        let device = frames.device();

        let selected = index::resolve_indices(index_spec, count);
        log::debug!("selected {} of {} frames", selected.len(), count);

        // placeholder canvas at the fill level; selected frames are written
        // back over it unchanged.
        let mut control = Tensor::full([count, height, width, channels], fill_level, &device);
        for &idx in &selected {
            let frame = frames.clone().slice([idx..idx + 1]);
            control = control.slice_assign([idx..idx + 1], frame);
        }

        // every frame counts as a placeholder until proven selected.
        let mut masks = Tensor::full([count, height, width], MASK_EMPTY, &device);
        for &idx in &selected {
            masks = masks.slice_assign(
                [idx..idx + 1],
                Tensor::full([1, height, width], MASK_CONTENT, &device),
            );
        }

        if let Some(aux) = aux_mask {
            let aux = reconcile::reconcile(aux, count, height, width)?;
            // element-wise product: the combined mask never exceeds either
            // input, so the auxiliary mask can only suppress mask values.
            masks = aux * masks;
        }

        // terminal step: move to host memory at a fixed precision.
        Ok(Selection {
            frames: control.into_data().convert::<f32>(),
            masks: masks.into_data().convert::<f32>(),
        })
    }
}
