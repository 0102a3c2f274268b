use anyhow::anyhow;
use fast_image_resize::{PixelType, ResizeOptions, Resizer, images::Image as FastImage};
use image::{DynamicImage, GenericImageView, ImageFormat, load_from_memory};
use std::{io::Cursor, time::Instant};
use tracing::info;

pub const IMAGE_ENCODING_FORMAT: ImageFormat = ImageFormat::Avif;
pub const IMAGE_ENCODING_EXTENSION: &str = "avif";
pub const IMAGE_ENCODING_MIME: &str = "image/avif";

/// What an upload is for decides how hard it gets downscaled and which
/// bucket prefix it lands under.
pub enum WallImageType {
    PostImage,
    ProofDocument,
}

impl WallImageType {
    pub fn max_long_edge(&self) -> u32 {
        match self {
            WallImageType::PostImage => 2048,
            // Student-card photos only need to be readable by a reviewer.
            WallImageType::ProofDocument => 1200,
        }
    }

    pub fn key_prefix(&self) -> &'static str {
        match self {
            WallImageType::PostImage => "wall",
            WallImageType::ProofDocument => "proof",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WallImageType::PostImage => "post_image",
            WallImageType::ProofDocument => "proof_document",
        }
    }
}

pub fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < MB {
        format!("{:.2} KB", b / KB)
    } else if b < GB {
        format!("{:.2} MB", b / MB)
    } else {
        format!("{:.2} GB", b / GB)
    }
}

/// Decode, downscale the long edge to the type's cap, and re-encode
/// as AVIF. Runs on a blocking thread; the decode alone can be tens of
/// milliseconds for phone photos.
pub async fn process_uploaded_image(
    bits: Vec<u8>,
    image_type: WallImageType,
) -> anyhow::Result<Vec<u8>> {
    let image_type_label = image_type.as_str();
    let original_size = bits.len();
    let start = Instant::now();

    let result = tokio::task::spawn_blocking(move || {
        let img =
            load_from_memory(&bits).map_err(|e| anyhow!("Failed to decode image: {:?}", e))?;

        let (width, height) = img.dimensions();
        let max_edge = width.max(height);
        let resized_img = if max_edge > image_type.max_long_edge() {
            let scale = image_type.max_long_edge() as f64 / max_edge as f64;
            let new_width = (width as f64 * scale).round().max(1.0) as u32;
            let new_height = (height as f64 * scale).round().max(1.0) as u32;

            let src_data = img.to_rgba8().into_raw();
            let src_image = FastImage::from_vec_u8(width, height, src_data, PixelType::U8x4)
                .map_err(|_| anyhow!("Failed to create fast image from buffer"))?;

            let mut dst_image = FastImage::new(new_width, new_height, src_image.pixel_type());

            let mut resizer = Resizer::new();
            resizer
                .resize(&src_image, &mut dst_image, &ResizeOptions::default())
                .map_err(|_| anyhow!("Failed to resize image"))?;

            let dst_data = dst_image.into_vec();
            let dst_buffer =
                image::ImageBuffer::<image::Rgba<u8>, _>::from_raw(new_width, new_height, dst_data)
                    .ok_or(anyhow!("Failed to create image buffer"))?;

            DynamicImage::ImageRgba8(dst_buffer)
        } else {
            img
        };

        let mut output_buffer = Vec::new();
        {
            let mut cursor = Cursor::new(&mut output_buffer);
            resized_img
                .write_to(&mut cursor, IMAGE_ENCODING_FORMAT)
                .map_err(|e| anyhow!("Failed to encode image as AVIF: {:?}", e))?;
        }
        Ok(output_buffer)
    })
    .await
    .map_err(|e| anyhow!("Blocking image processing task panicked: {:?}", e))?;

    let elapsed = start.elapsed();
    if let Ok(ref processed) = result {
        let processed_size = processed.len();
        info!(
            image_type = image_type_label,
            original_size_bytes = original_size,
            original_size_human = %format_size(original_size),
            processed_size_bytes = processed_size,
            processed_size_human = %format_size(processed_size),
            elapsed_ms = %elapsed.as_millis(),
            "Completed image processing and AVIF encoding"
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_formatting_picks_the_right_unit() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn proof_documents_downscale_harder_than_post_images() {
        assert!(WallImageType::ProofDocument.max_long_edge() < WallImageType::PostImage.max_long_edge());
        assert_eq!(WallImageType::PostImage.key_prefix(), "wall");
        assert_eq!(WallImageType::ProofDocument.key_prefix(), "proof");
    }
}
