//! # qiform
//!
//! A Rust library for turning form input into QR codes.
//!
//! `qiform` maps a typed form (plain text, Wi-Fi credentials, contact card,
//! email, phone, SMS or calendar event) to the exact payload text QR reader
//! apps expect, renders it at the highest error correction level, optionally
//! places a circular logo in the middle, and exports the result as PNG.
//!
//! ## Features
//!
//! - Payload builders for `WIFI:`, `BEGIN:VCARD`, `mailto:`, `tel:`, `sms:`
//!   and `BEGIN:VCALENDAR`.
//! - Static field schemas per QR type, rendered into any host through the
//!   [`form::FormContainer`] trait.
//! - Custom size and colors, loadable from JSON settings.
//! - Logo overlay on a white disc, with superseded logo loads dropped.
//! - PNG export with a file name derived from the payload.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qiform = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Render a Wi-Fi QR code and save it:
//!
//! ```no_run
//! use qiform::{helper::DirSaver, schema::QrKind, session::Session};
//!
//! fn main() -> Result<(), qiform::QrError> {
//!     let mut session = Session::default();
//!     session.set_kind(QrKind::Wifi)?;
//!     session.set_field("ssid", "Home")?;
//!     session.set_field("password", "secret1")?;
//!     let png = session.export_png(&mut DirSaver::new("output"))?;
//!     println!("saved {}", png.filename);
//!     Ok(())
//! }
//! ```
//!
//! Build a payload without rendering anything:
//!
//! ```rust
//! use qiform::{content::{build, FieldValues}, schema::QrKind};
//!
//! let values = FieldValues::new().with("to", "a@b.com").with("subject", "Hi");
//! assert_eq!(build(QrKind::Email, &values), "mailto:a@b.com?subject=Hi");
//! ```
//!
//! ## Modules
//!
//! - [`schema`]: QR types and the fields each one solicits.
//! - [`form`]: Form controls built from the schema.
//! - [`content`]: Payload text builders.
//! - [`settings`]: Size and colors.
//! - [`render`]: QR painting and the raster surface.
//! - [`logo`]: Logo overlay.
//! - [`session`]: Render orchestration and export.
//! - [`helper`]: Export file naming and saving.

#![forbid(unsafe_code)]

pub mod content;
pub mod error;
pub mod form;
pub mod helper;
pub mod logo;
pub mod render;
pub mod schema;
pub mod session;
pub mod settings;

pub use error::{ExportPrecondition, QrError};
