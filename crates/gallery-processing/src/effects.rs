//! Named photo effects
//!
//! A served photo can be passed through one effect, picked by its display name
//! (`BlackWhite`, `OilPaint`, ...). Unknown names leave the pixels untouched; the image is
//! still decoded and re-encoded in its original format.

use std::io::Cursor;
use std::str::FromStr;

use gallery_core::AppError;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader, Rgba, RgbaImage};

const OIL_PAINT_LEVELS: usize = 10;
const OIL_PAINT_RADIUS: i64 = 3;
const BLUR_SIGMA: f32 = 3.0;
const SHARPEN_SIGMA: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEffect {
    BlackWhite,
    OilPaint,
    Sepia,
    Blur,
    Sharpen,
    Glow,
    Invert,
}

impl ImageEffect {
    pub const ALL: [ImageEffect; 7] = [
        ImageEffect::BlackWhite,
        ImageEffect::OilPaint,
        ImageEffect::Sepia,
        ImageEffect::Blur,
        ImageEffect::Sharpen,
        ImageEffect::Glow,
        ImageEffect::Invert,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ImageEffect::BlackWhite => "BlackWhite",
            ImageEffect::OilPaint => "OilPaint",
            ImageEffect::Sepia => "Sepia",
            ImageEffect::Blur => "Blur",
            ImageEffect::Sharpen => "Sharpen",
            ImageEffect::Glow => "Glow",
            ImageEffect::Invert => "Invert",
        }
    }

    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            ImageEffect::BlackWhite => apply_black_white(img),
            ImageEffect::OilPaint => apply_oil_paint(img, OIL_PAINT_LEVELS, OIL_PAINT_RADIUS),
            ImageEffect::Sepia => apply_sepia(img),
            ImageEffect::Blur => DynamicImage::ImageRgba8(imageproc::filter::gaussian_blur_f32(
                &img.to_rgba8(),
                BLUR_SIGMA,
            )),
            ImageEffect::Sharpen => img.unsharpen(SHARPEN_SIGMA, 0),
            ImageEffect::Glow => apply_glow(img, Rgba([0, 0, 0, 255])),
            ImageEffect::Invert => {
                let mut inverted = img;
                inverted.invert();
                inverted
            }
        }
    }
}

impl FromStr for ImageEffect {
    type Err = AppError;

    /// Names are matched exactly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageEffect::ALL
            .into_iter()
            .find(|effect| effect.name() == s)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown effect: {}", s)))
    }
}

/// Encoded output of the effects pipeline.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub data: Vec<u8>,
    pub format: ImageFormat,
}

impl RenderedImage {
    pub fn content_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

/// Decode `data`, apply the effect named `effect_name` if it is known, and re-encode
/// in the source format.
pub fn render_with_effect(data: &[u8], effect_name: &str) -> Result<RenderedImage, AppError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| AppError::ImageProcessing(format!("Failed to read image: {}", e)))?;
    let format = reader
        .format()
        .ok_or_else(|| AppError::ImageProcessing("Unrecognized image format".to_string()))?;
    let img = reader
        .decode()
        .map_err(|e| AppError::ImageProcessing(format!("Failed to decode image: {}", e)))?;

    let img = match effect_name.parse::<ImageEffect>() {
        Ok(effect) => {
            tracing::debug!(effect = effect.name(), format = ?format, "Applying image effect");
            effect.apply(img)
        }
        Err(_) => {
            tracing::debug!(effect = %effect_name, "Unknown effect, serving image unchanged");
            img
        }
    };

    // JPEG has no alpha channel
    let img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        _ => img,
    };

    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format)
        .map_err(|e| AppError::ImageProcessing(format!("Failed to encode image: {}", e)))?;

    Ok(RenderedImage {
        data: out.into_inner(),
        format,
    })
}

/// `render_with_effect` on the blocking thread pool.
pub async fn render_with_effect_blocking(
    data: Vec<u8>,
    effect_name: String,
) -> Result<RenderedImage, AppError> {
    tokio::task::spawn_blocking(move || render_with_effect(&data, &effect_name))
        .await
        .map_err(|e| AppError::Internal(format!("Effect task failed: {}", e)))?
}

/// High-contrast black and white: every channel becomes `1.5 * (r + g + b) - 1`.
fn apply_black_white(img: DynamicImage) -> DynamicImage {
    let mut rgba8 = img.to_rgba8();

    for pixel in rgba8.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        let sum = (r as f32 + g as f32 + b as f32) / 255.0;
        let value = ((1.5 * sum - 1.0).clamp(0.0, 1.0) * 255.0).round() as u8;
        *pixel = Rgba([value, value, value, a]);
    }

    DynamicImage::ImageRgba8(rgba8)
}

fn apply_sepia(img: DynamicImage) -> DynamicImage {
    let mut rgba8 = img.to_rgba8();

    for pixel in rgba8.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        let (r, g, b) = (r as f32, g as f32, b as f32);

        let tr = (0.393 * r + 0.769 * g + 0.189 * b).min(255.0) as u8;
        let tg = (0.349 * r + 0.686 * g + 0.168 * b).min(255.0) as u8;
        let tb = (0.272 * r + 0.534 * g + 0.131 * b).min(255.0) as u8;

        *pixel = Rgba([tr, tg, tb, a]);
    }

    DynamicImage::ImageRgba8(rgba8)
}

/// Oil painting: each pixel takes the average colour of the most common intensity
/// bucket in its neighbourhood.
fn apply_oil_paint(img: DynamicImage, levels: usize, radius: i64) -> DynamicImage {
    let (width, height) = img.dimensions();
    let source = img.to_rgba8();
    let mut painted = RgbaImage::new(width, height);

    let intensity = |p: &Rgba<u8>| -> usize {
        let avg = (p[0] as usize + p[1] as usize + p[2] as usize) / 3;
        (avg * (levels - 1)) / 255
    };

    let mut counts = vec![0u32; levels];
    let mut sums = vec![[0u32; 3]; levels];

    for y in 0..height as i64 {
        for x in 0..width as i64 {
            counts.iter_mut().for_each(|c| *c = 0);
            sums.iter_mut().for_each(|s| *s = [0; 3]);

            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let nx = (x + dx).clamp(0, width as i64 - 1) as u32;
                    let ny = (y + dy).clamp(0, height as i64 - 1) as u32;
                    let p = source.get_pixel(nx, ny);
                    let bucket = intensity(p);
                    counts[bucket] += 1;
                    sums[bucket][0] += p[0] as u32;
                    sums[bucket][1] += p[1] as u32;
                    sums[bucket][2] += p[2] as u32;
                }
            }

            let (bucket, count) = counts
                .iter()
                .enumerate()
                .max_by_key(|(_, count)| **count)
                .map(|(bucket, count)| (bucket, *count))
                .unwrap_or((0, 0));
            let alpha = source.get_pixel(x as u32, y as u32)[3];

            let pixel = if count == 0 {
                *source.get_pixel(x as u32, y as u32)
            } else {
                Rgba([
                    (sums[bucket][0] / count) as u8,
                    (sums[bucket][1] / count) as u8,
                    (sums[bucket][2] / count) as u8,
                    alpha,
                ])
            };
            painted.put_pixel(x as u32, y as u32, pixel);
        }
    }

    DynamicImage::ImageRgba8(painted)
}

/// Radial glow of `color` from the centre, fading out at half the image width.
fn apply_glow(img: DynamicImage, color: Rgba<u8>) -> DynamicImage {
    let (width, height) = img.dimensions();
    let mut rgba8 = img.to_rgba8();

    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let max_distance = (width as f32 * 0.5).max(1.0);

    for (x, y, pixel) in rgba8.enumerate_pixels_mut() {
        let distance = ((x as f32 - center_x).powi(2) + (y as f32 - center_y).powi(2)).sqrt();
        let blend = (1.0 - 0.95 * (distance / max_distance)).clamp(0.0, 1.0);
        if blend <= 0.0 {
            continue;
        }

        let Rgba([r, g, b, a]) = *pixel;
        let mix = |from: u8, to: u8| -> u8 {
            (from as f32 + (to as f32 - from as f32) * blend).round() as u8
        };
        *pixel = Rgba([mix(r, color[0]), mix(g, color[1]), mix(b, color[2]), a]);
    }

    DynamicImage::ImageRgba8(rgba8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::ErrorMetadata;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_effect_names_are_exact() {
        for effect in ImageEffect::ALL {
            assert_eq!(effect.name().parse::<ImageEffect>().unwrap(), effect);
        }
        assert!("sepia".parse::<ImageEffect>().is_err());
        assert!("Posterize".parse::<ImageEffect>().is_err());
    }

    #[test]
    fn test_invert() {
        let inverted = ImageEffect::Invert.apply(solid(4, 4, [255, 100, 50, 255]));
        let pixel = *inverted.to_rgba8().get_pixel(0, 0);
        assert_eq!(pixel, Rgba([0, 155, 205, 255]));
    }

    #[test]
    fn test_black_white_pushes_to_extremes() {
        let light = ImageEffect::BlackWhite.apply(solid(2, 2, [200, 200, 200, 255]));
        assert_eq!(light.to_rgba8().get_pixel(0, 0)[0], 255);

        let dark = ImageEffect::BlackWhite.apply(solid(2, 2, [40, 40, 40, 255]));
        assert_eq!(dark.to_rgba8().get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_sepia_warms_white() {
        let sepia = ImageEffect::Sepia.apply(solid(2, 2, [255, 255, 255, 255]));
        let pixel = *sepia.to_rgba8().get_pixel(0, 0);
        assert_eq!(pixel[0], 255);
        assert!(pixel[2] < pixel[1]);
    }

    #[test]
    fn test_oil_paint_keeps_uniform_image() {
        let painted = ImageEffect::OilPaint.apply(solid(6, 5, [90, 120, 30, 255]));
        assert_eq!(painted.dimensions(), (6, 5));
        assert_eq!(*painted.to_rgba8().get_pixel(3, 2), Rgba([90, 120, 30, 255]));
    }

    #[test]
    fn test_glow_darkens_center_only() {
        let glowing = ImageEffect::Glow.apply(solid(20, 20, [200, 200, 200, 255]));
        let rgba = glowing.to_rgba8();
        assert!(rgba.get_pixel(10, 10)[0] < 50);
        assert_eq!(rgba.get_pixel(0, 0)[0], 200);
    }

    #[test]
    fn test_blur_and_sharpen_keep_dimensions() {
        for effect in [ImageEffect::Blur, ImageEffect::Sharpen] {
            let out = effect.apply(solid(12, 8, [10, 20, 30, 255]));
            assert_eq!(out.dimensions(), (12, 8));
        }
    }

    #[test]
    fn test_render_applies_effect_in_source_format() {
        let png = encode(&solid(3, 3, [255, 255, 255, 255]), ImageFormat::Png);
        let rendered = render_with_effect(&png, "Invert").unwrap();
        assert_eq!(rendered.format, ImageFormat::Png);
        assert_eq!(rendered.content_type(), "image/png");

        let decoded = image::load_from_memory(&rendered.data).unwrap();
        assert_eq!(decoded.to_rgba8().get_pixel(1, 1)[0], 0);
    }

    #[test]
    fn test_render_unknown_effect_passes_through() {
        let png = encode(&solid(3, 3, [12, 34, 56, 255]), ImageFormat::Png);
        let rendered = render_with_effect(&png, "Vintage").unwrap();
        let decoded = image::load_from_memory(&rendered.data).unwrap();
        assert_eq!(*decoded.to_rgba8().get_pixel(0, 0), Rgba([12, 34, 56, 255]));
    }

    #[test]
    fn test_render_jpeg_with_effect() {
        let jpeg = encode(
            &DynamicImage::ImageRgb8(solid(8, 8, [120, 80, 40, 255]).to_rgb8()),
            ImageFormat::Jpeg,
        );
        let rendered = render_with_effect(&jpeg, "Sepia").unwrap();
        assert_eq!(rendered.content_type(), "image/jpeg");
        assert!(image::load_from_memory(&rendered.data).is_ok());
    }

    #[test]
    fn test_render_rejects_garbage() {
        let err = render_with_effect(b"definitely not an image", "Blur").unwrap_err();
        assert_eq!(err.error_code(), "IMAGE_PROCESSING_ERROR");
    }

    #[tokio::test]
    async fn test_render_blocking() {
        let png = encode(&solid(2, 2, [0, 0, 0, 255]), ImageFormat::Png);
        let rendered = render_with_effect_blocking(png, "Invert".to_string())
            .await
            .unwrap();
        assert_eq!(rendered.format, ImageFormat::Png);
    }
}
