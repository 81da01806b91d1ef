//! conversions between decoded images and burn tensors.

use burn::{prelude::Backend, tensor::{Tensor, TensorData}};
use image::{DynamicImage, GenericImageView, GrayImage, RgbImage};

use crate::error::{FramepickError, Result};

const RGB_CHANNEL_COUNT: usize = 3;

/// converts decoded frames into an NHWC batch tensor with values in [0, 1].
/// an empty list or a mixed-size batch is rejected rather than coerced.
pub fn frames_to_tensor<B: Backend>(
    frames: &[DynamicImage],
    device: &B::Device,
) -> Result<Tensor<B, 4>> {
    let first = frames.first().ok_or(FramepickError::EmptyBatch)?;
    let (width, height) = first.dimensions();

    let frame_len = (width * height) as usize * RGB_CHANNEL_COUNT;
    let mut pixels = Vec::with_capacity(frames.len() * frame_len);
    for frame in frames {
        if frame.dimensions() != (width, height) {
            return Err(FramepickError::invalid_input(format!(
                "frame size {:?} does not match batch size {:?}",
                frame.dimensions(),
                (width, height)
            )));
        }
        let rgb = frame.to_rgb32f();
        pixels.extend(rgb.pixels().flat_map(|pixel| pixel.0));
    }

    let data = TensorData::new(
        pixels,
        [
            frames.len(),
            height as usize,
            width as usize,
            RGB_CHANNEL_COUNT,
        ],
    );
    Ok(Tensor::from_data(data, device))
}

/// converts a grayscale mask into a `(height, width)` tensor in [0, 1].
pub fn mask_to_tensor<B: Backend>(mask: &GrayImage, device: &B::Device) -> Tensor<B, 2> {
    let (width, height) = mask.dimensions();
    let values: Vec<f32> = mask
        .pixels()
        .map(|pixel| pixel.0[0] as f32 / u8::MAX as f32)
        .collect();
    let data = TensorData::new(values, [height as usize, width as usize]);
    Tensor::from_data(data, device)
}

/// converts host frame data of shape `(batch, height, width, 3)` back into
/// RGB images.
pub fn frames_from_data(data: TensorData) -> Result<Vec<RgbImage>> {
    let &[count, height, width, channels] = data.shape.as_slice() else {
        return Err(FramepickError::invalid_input(format!(
            "expected rank-4 frame data, got shape {:?}",
            data.shape
        )));
    };
    if channels != RGB_CHANNEL_COUNT {
        return Err(FramepickError::invalid_input(format!(
            "expected {RGB_CHANNEL_COUNT} channels, got {channels}"
        )));
    }
    let values = read_values(data)?;

    let frame_len = height * width * channels;
    (0..count)
        .map(|index| {
            let frame = &values[index * frame_len..(index + 1) * frame_len];
            let bytes: Vec<u8> = frame
                .iter()
                .map(|value| (value.clamp(0.0, 1.0) * 255.0) as u8)
                .collect();
            RgbImage::from_raw(width as u32, height as u32, bytes).ok_or_else(|| {
                FramepickError::invalid_input("frame buffer does not match its declared shape")
            })
        })
        .collect()
}

/// converts host mask data of shape `(batch, height, width)` back into
/// grayscale images.
pub fn masks_from_data(data: TensorData) -> Result<Vec<GrayImage>> {
    let &[count, height, width] = data.shape.as_slice() else {
        return Err(FramepickError::invalid_input(format!(
            "expected rank-3 mask data, got shape {:?}",
            data.shape
        )));
    };
    let values = read_values(data)?;

    let frame_len = height * width;
    (0..count)
        .map(|index| {
            let frame = &values[index * frame_len..(index + 1) * frame_len];
            let bytes: Vec<u8> = frame
                .iter()
                .map(|value| (value.clamp(0.0, 1.0) * 255.0) as u8)
                .collect();
            GrayImage::from_raw(width as u32, height as u32, bytes).ok_or_else(|| {
                FramepickError::invalid_input("mask buffer does not match its declared shape")
            })
        })
        .collect()
}

fn read_values(data: TensorData) -> Result<Vec<f32>> {
    data.convert::<f32>()
        .into_vec::<f32>()
        .map_err(|err| FramepickError::invalid_input(format!("failed to read tensor data: {err:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{NdArray, ndarray::NdArrayDevice};
    use image::Rgb;

    type B = NdArray;

    fn solid_frame(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([value, value, value])))
    }

    #[test]
    fn builds_an_nhwc_batch() {
        let frames = [solid_frame(4, 2, 0), solid_frame(4, 2, 255)];
        let tensor = frames_to_tensor::<B>(&frames, &NdArrayDevice::default()).unwrap();
        assert_eq!(tensor.dims(), [2, 2, 4, 3]);

        let values = tensor.into_data().into_vec::<f32>().unwrap();
        assert!(values[..2 * 4 * 3].iter().all(|&v| v == 0.0));
        assert!(values[2 * 4 * 3..].iter().all(|&v| v == 1.0));
    }

    #[test]
    fn rejects_an_empty_frame_list() {
        let result = frames_to_tensor::<B>(&[], &NdArrayDevice::default());
        assert!(matches!(result, Err(FramepickError::EmptyBatch)));
    }

    #[test]
    fn rejects_mixed_frame_sizes() {
        let frames = [solid_frame(4, 2, 0), solid_frame(2, 2, 0)];
        let result = frames_to_tensor::<B>(&frames, &NdArrayDevice::default());
        assert!(matches!(result, Err(FramepickError::InvalidInput { .. })));
    }

    #[test]
    fn frames_round_trip_through_host_data() {
        let frames = [solid_frame(3, 2, 255)];
        let tensor = frames_to_tensor::<B>(&frames, &NdArrayDevice::default()).unwrap();
        let restored = frames_from_data(tensor.into_data()).unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].dimensions(), (3, 2));
        assert_eq!(restored[0].get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn mask_values_are_normalized() {
        let mask = GrayImage::from_pixel(2, 2, image::Luma([255]));
        let tensor = mask_to_tensor::<B>(&mask, &NdArrayDevice::default());
        assert_eq!(tensor.dims(), [2, 2]);
        assert!(
            tensor
                .into_data()
                .into_vec::<f32>()
                .unwrap()
                .iter()
                .all(|&v| v == 1.0)
        );
    }
}
