//! bounding-box extraction from mask batches.

use burn::{prelude::Backend, tensor::cast::ToElement};
use ndarray::ArrayView2;
use serde::Serialize;

use crate::{
    MaskInput,
    error::{FramepickError, Result},
    node::{InputSpec, NodeContract, NodeDescriptor, OutputSpec, ValueKind},
};

/// tight axis-aligned rectangle around the nonzero pixels of one mask.
///
/// `(x, y)` is the top-left corner and extents are inclusive, so a single
/// nonzero pixel has width and height 1. an all-zero mask degenerates to
/// all-zero fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// reduces each 2d mask in a batch to its bounding box.
pub struct MaskBoundingBoxExtractor;

const DESCRIPTOR: NodeDescriptor = NodeDescriptor {
    id: "MaskToBoundingBox",
    inputs: &[InputSpec::required("mask", ValueKind::Mask)],
    outputs: &[OutputSpec {
        name: "bounding_boxes",
        kind: ValueKind::Text,
    }],
};

impl NodeContract for MaskBoundingBoxExtractor {
    fn descriptor() -> &'static NodeDescriptor {
        &DESCRIPTOR
    }
}

impl MaskBoundingBoxExtractor {
    /// computes one box per mask, in input order. frames are independent, so
    /// the record count always equals the normalized batch size.
    pub fn extract<B: Backend>(&self, masks: MaskInput<B>) -> Result<Vec<BoundingBox>> {
        let masks = masks.into_batch()?;
        let [count, height, width] = masks.dims();
        log::debug!("extracting bounding boxes for {} masks", count);

        // per-pixel scanning happens on the host.
        let values: Vec<f32> = masks
            .into_data()
            .into_vec::<B::FloatElem>()
            .map_err(|err| {
                FramepickError::invalid_input(format!("failed to read mask data: {err:?}"))
            })?
            .iter()
            .map(|value| value.to_f32())
            .collect();

        (0..count)
            .map(|index| {
                let frame = &values[index * height * width..(index + 1) * height * width];
                let view = ArrayView2::from_shape((height, width), frame).map_err(|err| {
                    FramepickError::invalid_input(format!("mask data is not {height}x{width}: {err}"))
                })?;
                Ok(frame_bounding_box(&view))
            })
            .collect()
    }
}

/// scans one mask for the extent of its nonzero pixels.
fn frame_bounding_box(mask: &ArrayView2<'_, f32>) -> BoundingBox {
    // (min_x, max_x, min_y, max_y), present once a nonzero pixel is seen.
    let mut extent: Option<(usize, usize, usize, usize)> = None;
    for ((y, x), &value) in mask.indexed_iter() {
        if value == 0.0 {
            continue;
        }
        extent = Some(match extent {
            None => (x, x, y, y),
            Some((min_x, max_x, min_y, max_y)) => {
                (min_x.min(x), max_x.max(x), min_y.min(y), max_y.max(y))
            }
        });
    }
    match extent {
        None => BoundingBox {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        },
        Some((min_x, max_x, min_y, max_y)) => BoundingBox {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        },
    }
}

/// serializes records for transport: a JSON array of `{x, y, width, height}`
/// objects, pretty-printed with 2-space indentation.
pub fn to_json(boxes: &[BoundingBox]) -> Result<String> {
    Ok(serde_json::to_string_pretty(boxes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::{
        backend::{NdArray, ndarray::NdArrayDevice},
        tensor::{Tensor, TensorData},
    };

    type B = NdArray;

    fn mask_batch(values: Vec<f32>, shape: [usize; 3]) -> MaskInput<B> {
        MaskInput::Batch(Tensor::from_data(
            TensorData::new(values, shape),
            &NdArrayDevice::default(),
        ))
    }

    #[test]
    fn all_zero_mask_yields_the_degenerate_box() {
        let boxes = MaskBoundingBoxExtractor
            .extract(mask_batch(vec![0.0; 16], [1, 4, 4]))
            .unwrap();
        assert_eq!(
            boxes,
            vec![BoundingBox {
                x: 0,
                y: 0,
                width: 0,
                height: 0
            }]
        );
    }

    #[test]
    fn single_pixel_box_has_unit_extent() {
        let mut values = vec![0.0; 16];
        values[2 * 4 + 3] = 1.0; // row 2, col 3
        let boxes = MaskBoundingBoxExtractor
            .extract(mask_batch(values, [1, 4, 4]))
            .unwrap();
        assert_eq!(
            boxes,
            vec![BoundingBox {
                x: 3,
                y: 2,
                width: 1,
                height: 1
            }]
        );
    }

    #[test]
    fn spanning_pixels_produce_inclusive_extents() {
        // nonzero pixels covering rows 1-3 and columns 0-4 of a 5x5 mask.
        let mut values = vec![0.0; 25];
        values[5] = 0.5; // row 1, col 0
        values[3 * 5 + 4] = 0.5; // row 3, col 4
        let boxes = MaskBoundingBoxExtractor
            .extract(mask_batch(values, [1, 5, 5]))
            .unwrap();
        assert_eq!(
            boxes,
            vec![BoundingBox {
                x: 0,
                y: 1,
                width: 5,
                height: 3
            }]
        );
    }

    #[test]
    fn batch_order_is_preserved() {
        let mut values = vec![0.0; 3 * 4];
        values[0] = 1.0; // frame 0: pixel (0, 0)
        values[2 * 4 + 3] = 1.0; // frame 2: pixel (1, 1)
        let boxes = MaskBoundingBoxExtractor
            .extract(mask_batch(values, [3, 2, 2]))
            .unwrap();
        assert_eq!(boxes.len(), 3);
        assert_eq!(boxes[0].x, 0);
        assert_eq!(boxes[1].width, 0);
        assert_eq!((boxes[2].x, boxes[2].y), (1, 1));
    }

    #[test]
    fn single_mask_is_a_batch_of_one() {
        let mask = Tensor::<B, 2>::from_data(
            TensorData::new(vec![0.0, 1.0, 0.0, 0.0], [2, 2]),
            &NdArrayDevice::default(),
        );
        let boxes = MaskBoundingBoxExtractor
            .extract(MaskInput::Single(mask))
            .unwrap();
        assert_eq!(boxes.len(), 1);
        assert_eq!((boxes[0].x, boxes[0].y), (1, 0));
    }

    #[test]
    fn trailing_singleton_channel_is_squeezed() {
        let mask = Tensor::<B, 4>::from_data(
            TensorData::new(vec![1.0, 0.0, 0.0, 0.0], [1, 2, 2, 1]),
            &NdArrayDevice::default(),
        );
        let boxes = MaskBoundingBoxExtractor
            .extract(MaskInput::Channeled(mask))
            .unwrap();
        assert_eq!(
            boxes,
            vec![BoundingBox {
                x: 0,
                y: 0,
                width: 1,
                height: 1
            }]
        );
    }

    #[test]
    fn json_output_is_stable() {
        let json = to_json(&[BoundingBox {
            x: 3,
            y: 2,
            width: 1,
            height: 1,
        }])
        .unwrap();
        let expected = "[\n  {\n    \"x\": 3,\n    \"y\": 2,\n    \"width\": 1,\n    \"height\": 1\n  }\n]";
        assert_eq!(json, expected);
    }

    #[test]
    fn empty_batch_serializes_to_an_empty_array() {
        assert_eq!(to_json(&[]).unwrap(), "[]");
    }
}
