//! Pixel flattening and the per-format encoders.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};
use ribbon_core::Color;
use std::io::Cursor;
use tiny_skia::Pixmap;

use crate::error::RenderError;

/// Composite a premultiplied RGBA pixmap onto `background`, dropping alpha.
pub fn flatten_rgb(pixmap: &Pixmap, background: Color) -> Vec<u8> {
    let bg = background.to_bytes();
    pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|pixel| {
            let inverse = 255 - pixel[3] as u16;
            let mut out = [0u8; 3];
            for (channel, slot) in out.iter_mut().enumerate() {
                let value = pixel[channel] as u16 + (bg[channel] as u16 * inverse + 127) / 255;
                *slot = value.min(255) as u8;
            }
            out
        })
        .collect()
}

/// PNG via `png` (fast settings), then recompressed with oxipng.
pub fn encode_png(rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
    let png_error = |e: png::EncodingError| RenderError::Encode {
        format: "PNG",
        message: e.to_string(),
    };

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder.write_header().map_err(png_error)?;
        writer.write_image_data(rgb).map_err(png_error)?;
    }
    let png_bytes = buf.into_inner();

    // Re-compress with oxipng (zopfli + adaptive filter selection)
    match oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            ..Default::default()
        },
    ) {
        Ok(optimized) => Ok(optimized),
        Err(e) => {
            tracing::warn!(%e, "oxipng failed, keeping unoptimized PNG");
            Ok(png_bytes)
        }
    }
}

pub fn encode_jpeg(
    rgb: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, RenderError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
        .write_image(rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| RenderError::Encode {
            format: "JPEG",
            message: e.to_string(),
        })?;
    Ok(buf)
}

/// Lossless WebP
pub fn encode_webp(rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
    let mut buf = Vec::new();
    WebPEncoder::new_lossless(&mut buf)
        .write_image(rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| RenderError::Encode {
            format: "WebP",
            message: e.to_string(),
        })?;
    Ok(buf)
}
