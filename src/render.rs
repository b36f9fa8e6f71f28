//! QR painting and the raster surface it paints into.

use std::io::Cursor;

use image::{ImageBuffer, ImageFormat, Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode};

use crate::error::QrError;
use crate::settings::{ErrorCorrection, QrRenderRequest};

/// Largest edge length [`QrcodePainter`] will allocate, in pixels.
pub const MAX_SIZE: u32 = 4096;

/*---- Raster surface ----*/

/// A drawable raster the QR code is painted into.
///
/// Only the two primitives the logo overlay needs are exposed, plus PNG
/// export.
pub trait Surface {
    /// Width and height in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Fills a circle centered at (`cx`, `cy`). A pixel is covered when its
    /// center lies within `radius`.
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba<u8>);

    /// Alpha-blends `image` with its top-left corner at (`x`, `y`). Parts
    /// outside the surface are clipped.
    fn draw_image(&mut self, image: &RgbaImage, x: i64, y: i64);

    /// Encodes the current pixels as PNG.
    fn to_png(&self) -> Result<Vec<u8>, QrError>;
}

impl Surface for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        ImageBuffer::dimensions(self)
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba<u8>) {
        if radius <= 0.0 {
            return;
        }
        let (width, height) = ImageBuffer::dimensions(self);
        let left = (cx - radius).floor().max(0.0) as u32;
        let top = (cy - radius).floor().max(0.0) as u32;
        let right = ((cx + radius).ceil().max(0.0) as u32).min(width);
        let bottom = ((cy + radius).ceil().max(0.0) as u32).min(height);
        let radius_sq = radius * radius;

        for y in top..bottom {
            for x in left..right {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= radius_sq {
                    self.put_pixel(x, y, color);
                }
            }
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, x: i64, y: i64) {
        let (width, height) = ImageBuffer::dimensions(self);
        for (ox, oy, src) in image.enumerate_pixels() {
            let bx = x + ox as i64;
            let by = y + oy as i64;
            if bx < 0 || by < 0 || bx >= width as i64 || by >= height as i64 {
                continue;
            }
            let alpha = src.0[3] as f32 / 255.0;
            if alpha <= 0.0 {
                continue;
            }
            let dst = self.get_pixel_mut(bx as u32, by as u32);
            let inv = 1.0 - alpha;
            for c in 0..3 {
                dst.0[c] = (src.0[c] as f32 * alpha + dst.0[c] as f32 * inv).round() as u8;
            }
            dst.0[3] = 255;
        }
    }

    fn to_png(&self) -> Result<Vec<u8>, QrError> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_to(&mut buffer, ImageFormat::Png).map_err(QrError::Encode)?;
        Ok(buffer.into_inner())
    }
}

/*---- QR drawing ----*/

/// Paints a QR symbol for a render request.
///
/// Implementations must return a fully drawn surface: callers overlay on
/// top of it and never wait for further drawing.
pub trait QrPainter {
    type Surface: Surface;

    /// Paints a `size` x `size` symbol of the request's payload.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::Render`] with a human readable reason when the
    /// payload cannot be encoded, e.g. it exceeds the symbol capacity, or
    /// the size cannot be drawn.
    fn paint(&mut self, request: &QrRenderRequest) -> Result<Self::Surface, QrError>;
}

/// [`QrPainter`] backed by the `qrcode` crate, drawing into an [`RgbaImage`].
#[derive(Clone, Copy, Debug, Default)]
pub struct QrcodePainter;

impl QrcodePainter {
    pub fn new() -> Self {
        Self
    }
}

fn ec_level(level: ErrorCorrection) -> EcLevel {
    match level {
        ErrorCorrection::High => EcLevel::H,
    }
}

impl QrPainter for QrcodePainter {
    type Surface = RgbaImage;

    /// Modules are stretched over the whole canvas without a quiet zone, so
    /// the output is exactly `size` pixels wide whatever the symbol version.
    fn paint(&mut self, request: &QrRenderRequest) -> Result<RgbaImage, QrError> {
        let size = request.size();
        if size == 0 {
            return Err(QrError::Render("size must be greater than zero".into()));
        }
        if size > MAX_SIZE {
            return Err(QrError::Render(format!("size too large: {size} px, at most {MAX_SIZE} px")));
        }
        let code = QrCode::with_error_correction_level(request.payload().as_bytes(), ec_level(request.error_correction()))
            .map_err(|e| QrError::Render(e.to_string()))?;

        let modules = code.width();
        let colors = code.to_colors();
        let dark = request.color_dark().to_rgba();
        let light = request.color_light().to_rgba();
        let mut img = RgbaImage::new(size, size);

        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let qr_x = x as usize * modules / size as usize;
            let qr_y = y as usize * modules / size as usize;
            *pixel = if colors[qr_y * modules + qr_x] == qrcode::Color::Dark {
                dark
            } else {
                light
            };
        }

        Ok(img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Color, RenderSettings};

    fn request(payload: &str, size: u32) -> QrRenderRequest {
        let settings = RenderSettings { size, ..RenderSettings::default() };
        QrRenderRequest::new(payload, &settings)
    }

    #[test]
    fn test_paint_exact_size() {
        let img = QrcodePainter.paint(&request("Hello, world!", 256)).unwrap();
        assert_eq!(img.dimensions(), (256, 256));
    }

    #[test]
    fn test_paint_uses_colors() {
        let settings = RenderSettings {
            size: 210,
            color_dark: Color([200, 0, 0]),
            color_light: Color([0, 0, 200]),
        };
        let img = QrcodePainter.paint(&QrRenderRequest::new("colors", &settings)).unwrap();
        // Finder pattern corner is always dark.
        assert_eq!(*img.get_pixel(0, 0), Rgba([200, 0, 0, 255]));
        assert!(img.pixels().all(|p| *p == Rgba([200, 0, 0, 255]) || *p == Rgba([0, 0, 200, 255])));
    }

    #[test]
    fn test_paint_rejects_oversized_payload() {
        let payload = "x".repeat(4000);
        match QrcodePainter.paint(&request(&payload, 256)) {
            Err(QrError::Render(reason)) => assert!(!reason.is_empty()),
            other => panic!("expected render error, got {other:?}"),
        }
    }

    #[test]
    fn test_paint_rejects_zero_size() {
        assert!(matches!(QrcodePainter.paint(&request("a", 0)), Err(QrError::Render(_))));
    }

    #[test]
    fn test_paint_rejects_huge_size() {
        for size in [MAX_SIZE + 1, 50_000, u32::MAX] {
            match QrcodePainter.paint(&request("a", size)) {
                Err(QrError::Render(reason)) => assert!(reason.starts_with("size too large"), "{reason}"),
                other => panic!("expected render error for {size}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_paint_accepts_max_size() {
        let img = QrcodePainter.paint(&request("a", MAX_SIZE)).unwrap();
        assert_eq!(img.dimensions(), (MAX_SIZE, MAX_SIZE));
    }

    #[test]
    fn test_fill_circle_stays_inside() {
        let mut img = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 255]));
        img.fill_circle(10.0, 10.0, 4.0, Rgba([255, 255, 255, 255]));
        assert_eq!(*img.get_pixel(10, 10), Rgba([255, 255, 255, 255]));
        assert_eq!(*img.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*img.get_pixel(10, 2), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_draw_image_clips_and_blends() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let mut patch = RgbaImage::from_pixel(3, 3, Rgba([255, 255, 255, 255]));
        patch.put_pixel(0, 0, Rgba([255, 255, 255, 0]));
        img.draw_image(&patch, 2, 2);
        assert_eq!(*img.get_pixel(2, 2), Rgba([0, 0, 0, 255]));
        assert_eq!(*img.get_pixel(3, 3), Rgba([255, 255, 255, 255]));
        img.draw_image(&patch, -10, -10);
    }

    #[test]
    fn test_to_png_signature() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
        let png = img.to_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
