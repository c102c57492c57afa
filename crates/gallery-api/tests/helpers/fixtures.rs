use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Small striped PNG; stripes make effects visibly change the bytes.
pub fn create_png() -> Vec<u8> {
    let img = RgbImage::from_fn(8, 8, |x, _| {
        if x % 2 == 0 {
            Rgb([200, 40, 40])
        } else {
            Rgb([20, 20, 220])
        }
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("Failed to encode test PNG");
    out.into_inner()
}
