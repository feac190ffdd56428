//! Production image backend on top of the `image` crate.

use std::path::Path;

use image::RgbImage;

use super::{ExportError, ImageBackend, LoadError};
use crate::geometry::Rect;

/// Backend decoding to 8-bit RGB and resampling with Lanczos3.
#[derive(Debug, Default)]
pub struct RasterBackend;

impl RasterBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ImageBackend for RasterBackend {
    type Image = RgbImage;

    fn load(&self, path: &Path) -> Result<Self::Image, LoadError> {
        let decoded = image::open(path).map_err(|e| match e {
            image::ImageError::IoError(source) => LoadError::Io {
                path: path.to_path_buf(),
                source,
            },
            source => LoadError::Decode {
                path: path.to_path_buf(),
                source,
            },
        })?;
        Ok(decoded.into_rgb8())
    }

    fn dimensions(&self, image: &Self::Image) -> (u32, u32) {
        image.dimensions()
    }

    fn resample(&self, image: &Self::Image, width: u32, height: u32) -> Self::Image {
        // Fast path: nothing to do at the target size.
        if image.dimensions() == (width, height) {
            return image.clone();
        }
        image::imageops::resize(image, width, height, image::imageops::FilterType::Lanczos3)
    }

    fn crop_and_save(
        &self,
        image: &Self::Image,
        rect: Rect,
        out: &Path,
    ) -> Result<(), ExportError> {
        let width = rect.width();
        let height = rect.height();
        if width <= 0 || height <= 0 {
            return Err(ExportError::EmptyRegion {
                path: out.to_path_buf(),
            });
        }

        // Copy row by row; anything outside the source stays black so the
        // output always has exactly the requested dimensions.
        let mut output = RgbImage::new(width as u32, height as u32);
        let (src_w, src_h) = image.dimensions();
        for y in 0..height {
            let src_y = rect.top() + y;
            if src_y < 0 || src_y >= src_h as i32 {
                continue;
            }
            for x in 0..width {
                let src_x = rect.left() + x;
                if src_x < 0 || src_x >= src_w as i32 {
                    continue;
                }
                let pixel = *image.get_pixel(src_x as u32, src_y as u32);
                output.put_pixel(x as u32, y as u32, pixel);
            }
        }

        output.save(out).map_err(|e| match e {
            image::ImageError::IoError(source) => ExportError::Io {
                path: out.to_path_buf(),
                source,
            },
            source => ExportError::Encode {
                path: out.to_path_buf(),
                source,
            },
        })
    }
}
