use crate::embedding::interface::ModelError;
use image::{imageops, DynamicImage};
use tract_onnx::prelude::*;

pub const INPUT_SIZE: u32 = 224;

// Channel statistics the CLIP vision tower was trained with.
const MEAN: [f32; 3] = [0.481_454_66, 0.457_827_5, 0.408_210_73];
const STD: [f32; 3] = [0.268_629_54, 0.261_302_58, 0.275_777_11];

/// Resize the shortest edge to `INPUT_SIZE`, center-crop to a square, and
/// pack the pixels into a normalized `[1, 3, 224, 224]` f32 tensor.
pub fn image_to_clip_tensor(image: &DynamicImage) -> Result<Tensor, ModelError> {
    let resized = resize_shortest_edge(image, INPUT_SIZE);
    let cropped = center_crop(&resized, INPUT_SIZE);
    let rgb = cropped.to_rgb8();

    let tensor = tract_ndarray::Array4::from_shape_fn(
        (1, 3, INPUT_SIZE as usize, INPUT_SIZE as usize),
        |(_, c, y, x)| {
            let pixel = rgb.get_pixel(x as u32, y as u32);
            (pixel[c] as f32 / 255.0 - MEAN[c]) / STD[c]
        },
    );

    Ok(tensor.into())
}

fn resize_shortest_edge(image: &DynamicImage, target: u32) -> DynamicImage {
    let (w, h) = (image.width(), image.height());
    let scale = target as f32 / w.min(h) as f32;
    let new_w = ((w as f32 * scale).round() as u32).max(target);
    let new_h = ((h as f32 * scale).round() as u32).max(target);
    image.resize_exact(new_w, new_h, imageops::FilterType::CatmullRom)
}

fn center_crop(image: &DynamicImage, size: u32) -> DynamicImage {
    let x = (image.width() - size) / 2;
    let y = (image.height() - size) / 2;
    image.crop_imm(x, y, size, size)
}
