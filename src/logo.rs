//! Circular logo overlay.
//!
//! The logo sits on a white disc in the middle of the symbol. High error
//! correction lets readers recover the modules it hides.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::error::QrError;
use crate::render::Surface;

/// Fraction of the QR size used for the logo's edge.
const LOGO_SCALE: f32 = 0.22;
/// Fraction of the QR size used for the backing disc radius.
const DISC_SCALE: f32 = 0.11;
/// Extra disc radius in pixels so the logo never touches dark modules.
const DISC_PADDING: f32 = 6.0;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A decoded logo image.
#[derive(Clone, Debug)]
pub struct LogoAsset {
    image: RgbaImage,
}

impl LogoAsset {
    /// Decodes a user supplied image file (PNG, JPEG, GIF, ... whatever the
    /// `image` crate was built with).
    pub fn decode(bytes: &[u8]) -> Result<Self, QrError> {
        let image = image::load_from_memory(bytes).map_err(QrError::LogoDecode)?;
        Ok(Self { image: image.to_rgba8() })
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Natural dimensions of the decoded image.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// A logo with a zero dimension has nothing to draw.
    pub fn is_drawable(&self) -> bool {
        let (width, height) = self.dimensions();
        width > 0 && height > 0
    }

    /// Center-crops to a square, scales to `edge` pixels and clears every
    /// pixel outside the inscribed circle.
    fn circular(&self, edge: u32) -> RgbaImage {
        let (width, height) = self.dimensions();
        let min_dim = width.min(height);
        let left = (width - min_dim) / 2;
        let top = (height - min_dim) / 2;
        let cropped = imageops::crop_imm(&self.image, left, top, min_dim, min_dim).to_image();
        let mut out = imageops::resize(&cropped, edge, edge, FilterType::Lanczos3);

        let center = edge as f32 / 2.0;
        for (x, y, pixel) in out.enumerate_pixels_mut() {
            let dx = x as f32 + 0.5 - center;
            let dy = y as f32 + 0.5 - center;
            if dx * dx + dy * dy > center * center {
                pixel.0[3] = 0;
            }
        }
        out
    }
}

/// Radius of the white disc drawn behind the logo.
pub fn disc_radius(size: u32) -> f32 {
    size as f32 * DISC_SCALE + DISC_PADDING
}

/// Edge length of the drawn logo.
pub fn logo_edge(size: u32) -> u32 {
    (size as f32 * LOGO_SCALE).round() as u32
}

/// Draws `logo` over the middle of `surface`: a white disc of radius
/// `size * 0.11 + 6`, then the logo cropped into a circle and scaled to
/// `size * 0.22`.
///
/// Does nothing and returns `false` when the logo has no pixels. The surface
/// must already hold the finished QR symbol; drawing is idempotent, so it is
/// safe to call again before an export.
pub fn overlay<S: Surface + ?Sized>(surface: &mut S, logo: &LogoAsset, size: u32) -> bool {
    if !logo.is_drawable() {
        return false;
    }
    let (width, height) = surface.dimensions();
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    surface.fill_circle(cx, cy, disc_radius(size), WHITE);

    let edge = logo_edge(size);
    if edge > 0 {
        let x = (width as i64 - edge as i64) / 2;
        let y = (height as i64 - edge as i64) / 2;
        surface.draw_image(&logo.circular(edge), x, y);
    }
    true
}

/// Identifies one logo load request; see
/// [`Session::begin_logo_load`](crate::session::Session::begin_logo_load).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LogoTicket(pub(crate) u64);

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::ImageFormat;

    use super::*;

    fn red_logo(width: u32, height: u32) -> LogoAsset {
        LogoAsset::from_image(RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255])))
    }

    #[test]
    fn test_geometry() {
        assert_eq!(disc_radius(256), 256.0 * 0.11 + 6.0);
        assert_eq!(logo_edge(256), 56);
        assert_eq!(logo_edge(100), 22);
    }

    #[test]
    fn test_overlay_draws_disc_and_logo() {
        let mut canvas = RgbaImage::from_pixel(256, 256, Rgba([0, 0, 0, 255]));
        assert!(overlay(&mut canvas, &red_logo(40, 80), 256));

        // Logo center, give or take resampling error.
        let center = canvas.get_pixel(128, 128);
        assert!(center.0[0] > 250 && center.0[1] < 5 && center.0[2] < 5, "{center:?}");
        // Inside the disc but outside the logo square: white padding.
        assert_eq!(*canvas.get_pixel(128, 128 + 31), WHITE);
        // Far corner untouched.
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        // Corner of the logo square is masked off by the circle.
        assert_eq!(*canvas.get_pixel(104, 104), WHITE);
    }

    #[test]
    fn test_overlay_is_idempotent() {
        let mut once = RgbaImage::from_pixel(128, 128, Rgba([0, 0, 0, 255]));
        overlay(&mut once, &red_logo(10, 10), 128);
        let mut twice = once.clone();
        overlay(&mut twice, &red_logo(10, 10), 128);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_overlay_skips_empty_logo() {
        let mut canvas = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 255]));
        let before = canvas.clone();
        assert!(!overlay(&mut canvas, &LogoAsset::from_image(RgbaImage::new(0, 0)), 64));
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_decode_png_bytes() {
        let mut bytes = Cursor::new(Vec::new());
        RgbaImage::from_pixel(3, 5, Rgba([0, 255, 0, 255]))
            .write_to(&mut bytes, ImageFormat::Png)
            .unwrap();
        let logo = LogoAsset::decode(bytes.get_ref()).unwrap();
        assert_eq!(logo.dimensions(), (3, 5));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(LogoAsset::decode(b"not an image"), Err(QrError::LogoDecode(_))));
    }
}
