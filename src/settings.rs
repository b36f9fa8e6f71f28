//! Render settings and the immutable request handed to the painter.

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::error::QrError;

/// Default edge length of the rendered QR code, in pixels.
pub const DEFAULT_SIZE: u32 = 256;

/// An opaque RGB color, written as `#rrggbb` in settings.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);
    pub const WHITE: Color = Color([255, 255, 255]);

    pub fn to_rgba(self) -> Rgba<u8> {
        let [r, g, b] = self.0;
        Rgba([r, g, b, 255])
    }
}

impl FromStr for Color {
    type Err = QrError;

    /// Parses `#rrggbb` or the short `#rgb` form, case insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || QrError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Color([channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?])),
            3 => {
                let mut rgb = [0u8; 3];
                for (slot, digit) in rgb.iter_mut().zip(hex.chars()) {
                    *slot = channel(&format!("{digit}{digit}"))?;
                }
                Ok(Color(rgb))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = QrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// User adjustable look of the QR code.
///
/// Every key is optional when deserializing; missing keys take the defaults
/// (256 px, black modules on white).
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderSettings {
    pub size: u32,
    pub color_dark: Color,
    pub color_light: Color,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            color_dark: Color::BLACK,
            color_light: Color::WHITE,
        }
    }
}

impl RenderSettings {
    /// Reads settings from the JSON the host page posts, e.g.
    /// `{"size": 300, "colorDark": "#112233"}`.
    pub fn from_json(json: &str) -> Result<Self, QrError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Error correction level requested from the painter. Only `High` is ever used.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ErrorCorrection {
    #[default]
    High,
}

/// Everything the painter needs for one render. Immutable once built.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrRenderRequest {
    payload: String,
    size: u32,
    color_dark: Color,
    color_light: Color,
    error_correction: ErrorCorrection,
}

impl QrRenderRequest {
    pub fn new(payload: impl Into<String>, settings: &RenderSettings) -> Self {
        Self {
            payload: payload.into(),
            size: settings.size,
            color_dark: settings.color_dark,
            color_light: settings.color_light,
            error_correction: ErrorCorrection::High,
        }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn color_dark(&self) -> Color {
        self.color_dark
    }

    pub fn color_light(&self) -> Color {
        self.color_light
    }

    pub fn error_correction(&self) -> ErrorCorrection {
        self.error_correction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parse() {
        assert_eq!("#000000".parse::<Color>().unwrap(), Color::BLACK);
        assert_eq!("#FfFfFf".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("#1a2b3c".parse::<Color>().unwrap(), Color([0x1a, 0x2b, 0x3c]));
        assert_eq!("#f80".parse::<Color>().unwrap(), Color([0xff, 0x88, 0x00]));
    }

    #[test]
    fn test_color_parse_rejects_garbage() {
        for input in ["000000", "#12345", "#gggggg", "", "#", "#ñ0000"] {
            assert!(matches!(input.parse::<Color>(), Err(QrError::InvalidColor(_))), "{input}");
        }
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color([255, 165, 0]).to_string(), "#ffa500");
    }

    #[test]
    fn test_settings_defaults() {
        let settings = RenderSettings::from_json("{}").unwrap();
        assert_eq!(settings, RenderSettings::default());
        assert_eq!(settings.size, 256);
    }

    #[test]
    fn test_settings_partial_json() {
        let settings = RenderSettings::from_json(r##"{"size": 300, "colorDark": "#112233"}"##).unwrap();
        assert_eq!(settings.size, 300);
        assert_eq!(settings.color_dark, Color([0x11, 0x22, 0x33]));
        assert_eq!(settings.color_light, Color::WHITE);
    }

    #[test]
    fn test_settings_bad_color() {
        assert!(matches!(
            RenderSettings::from_json(r#"{"colorLight": "white"}"#),
            Err(QrError::Settings(_))
        ));
    }

    #[test]
    fn test_request_is_high_ecc() {
        let request = QrRenderRequest::new("hello", &RenderSettings::default());
        assert_eq!(request.payload(), "hello");
        assert_eq!(request.size(), DEFAULT_SIZE);
        assert_eq!(request.error_correction(), ErrorCorrection::High);
    }
}
