//! Form renderer: turns a [`QrKind`]'s schema into input controls and reads
//! their values back.
//!
//! The page (or any other host) implements [`FormContainer`]; this module
//! only decides which controls exist, how they are labeled and which ids
//! they carry.

use std::collections::HashMap;

use crate::content::{FieldValue, FieldValues, TEXT_FIELD};
use crate::schema::{fields_for, FieldKind, FieldSpec, QrKind};

/// Element id of the plain text input shown for [`QrKind::Text`].
pub const TEXT_INPUT_ID: &str = "qrTextInput";

const CONTROL_ID_PREFIX: &str = "qr-field-";

/// Element id of the control created for a schema field.
pub fn control_id(field_id: &str) -> String {
    format!("{CONTROL_ID_PREFIX}{field_id}")
}

/// One input control to be created by the host.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Control {
    /// Element id, see [`control_id`].
    pub id: String,
    pub field_id: &'static str,
    /// Label text; required fields end with ` *`.
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl Control {
    pub fn from_spec(spec: &FieldSpec) -> Self {
        let label = if spec.required {
            format!("{} *", spec.label)
        } else {
            spec.label.to_string()
        };
        Self {
            id: control_id(spec.id),
            field_id: spec.id,
            label,
            kind: spec.kind,
            required: spec.required,
        }
    }

    /// Element to create: `input`, `textarea` or `select`.
    pub fn element(&self) -> &'static str {
        match self.kind {
            FieldKind::Textarea => "textarea",
            FieldKind::Select { .. } => "select",
            _ => "input",
        }
    }

    /// `type` attribute for `input` elements.
    pub fn input_type(&self) -> Option<&'static str> {
        match self.kind {
            FieldKind::Text => Some("text"),
            FieldKind::Email => Some("email"),
            FieldKind::Url => Some("url"),
            FieldKind::Checkbox => Some("checkbox"),
            FieldKind::DateTime => Some("datetime-local"),
            FieldKind::Textarea | FieldKind::Select { .. } => None,
        }
    }

    /// Options of a select control, empty for every other kind.
    pub fn options(&self) -> &'static [&'static str] {
        match self.kind {
            FieldKind::Select { options } => options,
            _ => &[],
        }
    }
}

/// The part of the page that hosts the form.
pub trait FormContainer {
    /// Removes every dynamically created control.
    fn clear_fields(&mut self);
    fn set_text_input_visible(&mut self, visible: bool);
    fn set_fields_visible(&mut self, visible: bool);
    fn append(&mut self, control: Control);
    /// Current value of the element with the given id, if it exists.
    fn value(&self, element_id: &str) -> Option<FieldValue>;
}

/// Rebuilds the form for `kind`.
///
/// Prior dynamic controls are always cleared. Kinds without schema fields
/// show the plain text input instead of the dynamic container.
pub fn render<C: FormContainer + ?Sized>(kind: QrKind, container: &mut C) {
    container.clear_fields();
    let fields = fields_for(kind);
    if fields.is_empty() {
        container.set_text_input_visible(true);
        container.set_fields_visible(false);
        return;
    }
    container.set_text_input_visible(false);
    container.set_fields_visible(true);
    for spec in fields {
        container.append(Control::from_spec(spec));
    }
}

/// Reads the current values of `kind`'s controls back into [`FieldValues`].
///
/// Controls that do not exist are skipped; the content builder reads them
/// as empty.
pub fn collect_values<C: FormContainer + ?Sized>(kind: QrKind, container: &C) -> FieldValues {
    let mut values = FieldValues::new();
    if kind == QrKind::Text {
        if let Some(value) = container.value(TEXT_INPUT_ID) {
            values.set(TEXT_FIELD, value);
        }
        return values;
    }
    for spec in fields_for(kind) {
        if let Some(value) = container.value(&control_id(spec.id)) {
            values.set(spec.id, value);
        }
    }
    values
}

/// [`FormContainer`] kept entirely in memory, for hosts without a DOM.
#[derive(Clone, Debug, Default)]
pub struct MemoryForm {
    text_visible: bool,
    fields_visible: bool,
    controls: Vec<Control>,
    values: HashMap<String, FieldValue>,
}

impl MemoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn text_input_visible(&self) -> bool {
        self.text_visible
    }

    pub fn fields_visible(&self) -> bool {
        self.fields_visible
    }

    /// Types into the plain text input.
    pub fn set_text(&mut self, text: &str) {
        self.values.insert(TEXT_INPUT_ID.to_string(), text.into());
    }

    /// Sets the value of a schema field's control. Returns `false` when no
    /// such control is currently rendered.
    pub fn set(&mut self, field_id: &str, value: impl Into<FieldValue>) -> bool {
        let id = control_id(field_id);
        if !self.controls.iter().any(|c| c.id == id) {
            return false;
        }
        self.values.insert(id, value.into());
        true
    }
}

impl FormContainer for MemoryForm {
    fn clear_fields(&mut self) {
        self.controls.clear();
        self.values.retain(|id, _| id == TEXT_INPUT_ID);
    }

    fn set_text_input_visible(&mut self, visible: bool) {
        self.text_visible = visible;
    }

    fn set_fields_visible(&mut self, visible: bool) {
        self.fields_visible = visible;
    }

    fn append(&mut self, control: Control) {
        self.controls.push(control);
    }

    fn value(&self, element_id: &str) -> Option<FieldValue> {
        self.values.get(element_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::build;

    #[test]
    fn test_render_text_shows_plain_input() {
        let mut form = MemoryForm::new();
        render(QrKind::Text, &mut form);
        assert!(form.text_input_visible());
        assert!(!form.fields_visible());
        assert!(form.controls().is_empty());
    }

    #[test]
    fn test_render_wifi_controls() {
        let mut form = MemoryForm::new();
        render(QrKind::Wifi, &mut form);
        assert!(!form.text_input_visible());
        assert!(form.fields_visible());

        let ids: Vec<_> = form.controls().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["qr-field-ssid", "qr-field-password", "qr-field-encryption", "qr-field-hidden"]);

        let ssid = &form.controls()[0];
        assert_eq!(ssid.label, "Network name (SSID) *");
        assert_eq!(ssid.input_type(), Some("text"));

        let encryption = &form.controls()[2];
        assert_eq!(encryption.element(), "select");
        assert_eq!(encryption.options(), ["WPA", "WEP", "nopass"]);
        assert_eq!(form.controls()[3].input_type(), Some("checkbox"));
    }

    #[test]
    fn test_render_replaces_previous_controls() {
        let mut form = MemoryForm::new();
        render(QrKind::Vcard, &mut form);
        assert!(form.set("org", "Acme"));
        render(QrKind::Tel, &mut form);
        assert_eq!(form.controls().len(), 1);
        assert!(!form.set("org", "Acme"));
        render(QrKind::Vcard, &mut form);
        assert_eq!(collect_values(QrKind::Vcard, &form).text("org"), "");
    }

    #[test]
    fn test_collect_values_feeds_builder() {
        let mut form = MemoryForm::new();
        render(QrKind::Sms, &mut form);
        form.set("number", "555");
        form.set("message", "hi there");
        let values = collect_values(QrKind::Sms, &form);
        assert_eq!(build(QrKind::Sms, &values), "sms:555?body=hi%20there");
    }

    #[test]
    fn test_collect_text_survives_type_switch() {
        let mut form = MemoryForm::new();
        form.set_text(" hello ");
        render(QrKind::Email, &mut form);
        render(QrKind::Text, &mut form);
        assert_eq!(build(QrKind::Text, &collect_values(QrKind::Text, &form)), "hello");
    }

    #[test]
    fn test_datetime_control() {
        let mut form = MemoryForm::new();
        render(QrKind::Event, &mut form);
        let start = form.controls().iter().find(|c| c.field_id == "start").unwrap();
        assert_eq!(start.input_type(), Some("datetime-local"));
        assert!(start.required);
    }
}
