//! QR render orchestrator.
//!
//! [`Session`] owns everything that changes while the user edits the form:
//! selected type, field values, settings, the logo, the current surface and
//! the last successful render. Every input change goes through a setter that
//! regenerates synchronously, so the surface always reflects the latest
//! inputs.

use tracing::{debug, error, info, warn};

use crate::content::{build, FieldValue, FieldValues, TEXT_FIELD};
use crate::error::{ExportPrecondition, QrError};
use crate::helper::{ExportedPng, FileSaver};
use crate::logo::{overlay, LogoAsset, LogoTicket};
use crate::render::{QrPainter, QrcodePainter, Surface};
use crate::schema::QrKind;
use crate::settings::{Color, QrRenderRequest, RenderSettings};

const RENDERED_MESSAGE: &str = "QR code generated successfully.";
const DOWNLOADED_MESSAGE: &str = "QR code downloaded successfully!";

/// Where the current render cycle stands.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum RenderPhase {
    #[default]
    Idle,
    Validating,
    Rendering,
    Rendered,
    Failed,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MessageKind {
    Success,
    Error,
}

/// The line of feedback shown under the QR code.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl StatusMessage {
    fn success(text: impl Into<String>) -> Self {
        Self { kind: MessageKind::Success, text: text.into() }
    }

    fn error(text: impl Into<String>) -> Self {
        Self { kind: MessageKind::Error, text: text.into() }
    }
}

/// The most recent successful render.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LastRenderState {
    pub request: QrRenderRequest,
}

impl LastRenderState {
    /// Payload text the export file name is derived from.
    pub fn payload(&self) -> &str {
        self.request.payload()
    }
}

#[derive(Clone, Debug, Default)]
enum LogoSlot {
    #[default]
    Empty,
    /// A load was requested and has not completed yet.
    Pending(LogoTicket),
    Ready(LogoAsset),
}

/// Result of redeeming a [`LogoTicket`].
#[derive(Debug)]
pub enum LogoLoad {
    /// The logo was installed and the QR code regenerated with it.
    Applied(Result<(), QrError>),
    /// A newer load was requested after this one; the bytes were dropped.
    Superseded,
}

/// Session state plus the render/export operations that act on it.
pub struct Session<P: QrPainter = QrcodePainter> {
    painter: P,
    kind: QrKind,
    values: FieldValues,
    settings: RenderSettings,
    logo: LogoSlot,
    logo_generation: u64,
    surface: Option<P::Surface>,
    last_render: Option<LastRenderState>,
    phase: RenderPhase,
    message: Option<StatusMessage>,
    export_enabled: bool,
}

impl Session<QrcodePainter> {
    /// A session rendering with the `qrcode` crate.
    pub fn new(settings: RenderSettings) -> Self {
        Self::with_painter(QrcodePainter, settings)
    }
}

impl Default for Session<QrcodePainter> {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}

impl<P: QrPainter> Session<P> {
    pub fn with_painter(painter: P, settings: RenderSettings) -> Self {
        Self {
            painter,
            kind: QrKind::default(),
            values: FieldValues::new(),
            settings,
            logo: LogoSlot::Empty,
            logo_generation: 0,
            surface: None,
            last_render: None,
            phase: RenderPhase::Idle,
            message: None,
            export_enabled: false,
        }
    }

    pub fn kind(&self) -> QrKind {
        self.kind
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    /// Whether the download action should be offered.
    pub fn export_enabled(&self) -> bool {
        self.export_enabled
    }

    /// The currently displayed QR code, if the last render succeeded.
    pub fn surface(&self) -> Option<&P::Surface> {
        self.surface.as_ref()
    }

    pub fn last_render(&self) -> Option<&LastRenderState> {
        self.last_render.as_ref()
    }

    /// Whether a decoded logo is installed.
    pub fn has_logo(&self) -> bool {
        matches!(self.logo, LogoSlot::Ready(_))
    }

    /// Whether a logo load is in flight.
    pub fn logo_pending(&self) -> bool {
        matches!(self.logo, LogoSlot::Pending(_))
    }

    pub fn painter(&self) -> &P {
        &self.painter
    }

    /*---- Input changes ----*/

    /// Switches the QR type. Values of the previous type's fields are
    /// dropped along with their controls; the plain text is kept.
    pub fn set_kind(&mut self, kind: QrKind) -> Result<(), QrError> {
        self.kind = kind;
        self.values.retain(|id| id == TEXT_FIELD);
        self.regenerate()
    }

    /// Updates the plain text input.
    pub fn set_text(&mut self, text: &str) -> Result<(), QrError> {
        self.values.set(TEXT_FIELD, text);
        self.regenerate()
    }

    /// Updates one schema field.
    pub fn set_field(&mut self, id: &str, value: impl Into<FieldValue>) -> Result<(), QrError> {
        self.values.set(id, value);
        self.regenerate()
    }

    /// Replaces all field values at once, e.g. after
    /// [`collect_values`](crate::form::collect_values).
    pub fn set_values(&mut self, values: FieldValues) -> Result<(), QrError> {
        self.values = values;
        self.regenerate()
    }

    pub fn set_size(&mut self, size: u32) -> Result<(), QrError> {
        self.settings.size = size;
        self.regenerate()
    }

    pub fn set_colors(&mut self, dark: Color, light: Color) -> Result<(), QrError> {
        self.settings.color_dark = dark;
        self.settings.color_light = light;
        self.regenerate()
    }

    pub fn set_settings(&mut self, settings: RenderSettings) -> Result<(), QrError> {
        self.settings = settings;
        self.regenerate()
    }

    /*---- Rendering ----*/

    /// Rebuilds the payload and repaints the QR code from scratch.
    ///
    /// Errors are also reported through [`message`](Self::message); the
    /// session stays usable after any of them.
    pub fn regenerate(&mut self) -> Result<(), QrError> {
        self.phase = RenderPhase::Validating;
        self.surface = None;
        self.export_enabled = false;

        let payload = build(self.kind, &self.values);
        if payload.trim().is_empty() {
            warn!(kind = %self.kind, "nothing to encode");
            return Err(self.fail(QrError::Validation));
        }

        self.phase = RenderPhase::Rendering;
        let request = QrRenderRequest::new(payload, &self.settings);
        let mut surface = match self.painter.paint(&request) {
            Ok(surface) => surface,
            Err(err) => {
                error!("Error generating QR: {err}");
                return Err(self.fail(err));
            }
        };

        if let LogoSlot::Ready(logo) = &self.logo {
            overlay(&mut surface, logo, request.size());
        }

        info!(kind = %self.kind, size = request.size(), "rendered QR code");
        self.surface = Some(surface);
        self.last_render = Some(LastRenderState { request });
        self.phase = RenderPhase::Rendered;
        self.export_enabled = true;
        self.message = Some(StatusMessage::success(RENDERED_MESSAGE));
        Ok(())
    }

    fn fail(&mut self, err: QrError) -> QrError {
        self.phase = RenderPhase::Failed;
        self.surface = None;
        self.export_enabled = false;
        self.message = Some(StatusMessage::error(err.to_string()));
        err
    }

    /*---- Logo ----*/

    /// Starts a logo load. Any earlier load still in flight is superseded,
    /// and the previous logo is removed from the displayed QR code at once.
    ///
    /// Hand the ticket back with the file's bytes to
    /// [`finish_logo_load`](Self::finish_logo_load) once they are read.
    pub fn begin_logo_load(&mut self) -> LogoTicket {
        self.logo_generation += 1;
        let ticket = LogoTicket(self.logo_generation);
        let had_logo = self.has_logo();
        self.logo = LogoSlot::Pending(ticket);
        if had_logo {
            // Repaint without the old logo; failures land in the status message.
            let _ = self.regenerate();
        }
        ticket
    }

    /// Completes a logo load: decodes `bytes`, installs the logo and
    /// regenerates so the overlay lands on a freshly painted symbol.
    pub fn finish_logo_load(&mut self, ticket: LogoTicket, bytes: &[u8]) -> LogoLoad {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, current = self.logo_generation, "dropping superseded logo");
            return LogoLoad::Superseded;
        }
        match LogoAsset::decode(bytes) {
            Ok(logo) => {
                let (width, height) = logo.dimensions();
                debug!(width, height, "logo decoded");
                self.logo = LogoSlot::Ready(logo);
                LogoLoad::Applied(self.regenerate())
            }
            Err(err) => {
                error!("{err}");
                self.logo = LogoSlot::Empty;
                self.message = Some(StatusMessage::error(err.to_string()));
                LogoLoad::Applied(Err(err))
            }
        }
    }

    /// Reports that the host could not read the logo file.
    pub fn fail_logo_load(&mut self, ticket: LogoTicket, reason: &str) -> LogoLoad {
        if !self.is_current(ticket) {
            return LogoLoad::Superseded;
        }
        let err = QrError::LogoRead(reason.to_string());
        error!("{err}");
        self.logo = LogoSlot::Empty;
        self.message = Some(StatusMessage::error(err.to_string()));
        LogoLoad::Applied(Err(err))
    }

    /// Installs an already decoded logo, superseding any load in flight.
    pub fn set_logo(&mut self, logo: LogoAsset) -> Result<(), QrError> {
        self.logo_generation += 1;
        self.logo = LogoSlot::Ready(logo);
        self.regenerate()
    }

    /// Removes the logo, cancelling any load in flight.
    pub fn clear_logo(&mut self) -> Result<(), QrError> {
        self.logo_generation += 1;
        self.logo = LogoSlot::Empty;
        self.regenerate()
    }

    fn is_current(&self, ticket: LogoTicket) -> bool {
        matches!(self.logo, LogoSlot::Pending(pending) if pending == ticket)
    }

    /*---- Export ----*/

    /// Encodes the displayed QR code as PNG, named after the last rendered
    /// payload.
    ///
    /// The logo is drawn again first, so the file always carries it even if
    /// the surface was touched since the last render.
    pub fn png_bytes(&mut self) -> Result<ExportedPng, QrError> {
        let last = match &self.last_render {
            Some(last) => last,
            None => return Err(ExportPrecondition::NotGenerated.into()),
        };
        let surface = match self.surface.as_mut() {
            Some(surface) => surface,
            None => return Err(ExportPrecondition::CanvasNotFound.into()),
        };
        if let LogoSlot::Ready(logo) = &self.logo {
            overlay(&mut *surface, logo, last.request.size());
        }
        let bytes = surface.to_png()?;
        Ok(ExportedPng::new(last.payload(), bytes))
    }

    /// Exports the displayed QR code through `saver`.
    ///
    /// # Errors
    ///
    /// [`QrError::ExportPrecondition`] when nothing was generated yet or the
    /// last render failed; encoding and save errors otherwise. Every error
    /// is also reported through [`message`](Self::message).
    pub fn export_png<F: FileSaver + ?Sized>(&mut self, saver: &mut F) -> Result<ExportedPng, QrError> {
        let result = self
            .png_bytes()
            .and_then(|png| saver.save(&png.filename, &png.bytes).map(|_| png).map_err(QrError::from));
        match &result {
            Ok(png) => {
                info!(filename = %png.filename, "exported QR code");
                self.message = Some(StatusMessage::success(DOWNLOADED_MESSAGE));
            }
            Err(err @ QrError::ExportPrecondition(_)) => {
                warn!("{err}");
                self.message = Some(StatusMessage::error(err.to_string()));
            }
            Err(err) => {
                error!("Error exporting QR: {err}");
                self.message = Some(StatusMessage::error(err.to_string()));
            }
        }
        result
    }
}
