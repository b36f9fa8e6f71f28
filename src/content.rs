//! Content builder: typed form values to canonical QR payload text.
//!
//! The formats here are read by phone camera apps, so they are reproduced
//! byte for byte. No escaping is applied to Wi-Fi, vCard or iCalendar
//! values; only the `mailto:` and `sms:` query parameters are
//! percent-encoded.

use std::collections::HashMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::schema::QrKind;

/// Field id under which the plain text input is stored.
pub const TEXT_FIELD: &str = "text";

/// Characters left untouched by URI component encoding.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A single form value: text for every control except checkboxes.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

/// Live form state, keyed by field id.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValues(HashMap<String, FieldValue>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, id: &str, value: impl Into<FieldValue>) -> Self {
        self.set(id, value);
        self
    }

    pub fn set(&mut self, id: &str, value: impl Into<FieldValue>) {
        self.0.insert(id.to_string(), value.into());
    }

    pub fn get(&self, id: &str) -> Option<&FieldValue> {
        self.0.get(id)
    }

    /// Text value of a field. Missing fields and checkboxes read as `""`.
    pub fn text(&self, id: &str) -> &str {
        match self.0.get(id) {
            Some(FieldValue::Text(value)) => value,
            _ => "",
        }
    }

    /// Checkbox state. Missing fields read as unchecked; a text value of
    /// `"true"` or `"on"` counts as checked.
    pub fn flag(&self, id: &str) -> bool {
        match self.0.get(id) {
            Some(FieldValue::Flag(value)) => *value,
            Some(FieldValue::Text(value)) => value == "true" || value == "on",
            None => false,
        }
    }

    /// Drops every value except those whose id satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|id, _| keep(id));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Builds the payload text for `kind` from the current form values.
///
/// Missing values are treated as empty strings; optional parts with an
/// empty value contribute nothing.
///
/// # Example
///
/// ```
/// use qiform::content::{build, FieldValues};
/// use qiform::schema::QrKind;
///
/// let values = FieldValues::new()
///     .with("ssid", "Home")
///     .with("password", "secret1")
///     .with("encryption", "WPA")
///     .with("hidden", true);
/// assert_eq!(build(QrKind::Wifi, &values), "WIFI:T:WPA;S:Home;P:secret1;H:true;;");
/// ```
pub fn build(kind: QrKind, values: &FieldValues) -> String {
    let payload = match kind {
        QrKind::Text => values.text(TEXT_FIELD).trim().to_string(),
        QrKind::Wifi => wifi(values),
        QrKind::Vcard => vcard(values),
        QrKind::Email => email(values),
        QrKind::Tel => format!("tel:{}", values.text("number")),
        QrKind::Sms => sms(values),
        QrKind::Event => event(values),
    };
    debug!(%kind, len = payload.len(), "built payload");
    payload
}

/// Same as [`build`], but takes the type name as the selector reports it.
/// Unknown names yield an empty payload.
pub fn build_named(kind: &str, values: &FieldValues) -> String {
    match kind.parse::<QrKind>() {
        Ok(kind) => build(kind, values),
        Err(err) => {
            debug!("{err}");
            String::new()
        }
    }
}

fn wifi(values: &FieldValues) -> String {
    let encryption = match values.text("encryption") {
        "" => "WPA",
        other => other,
    };
    let hidden = if values.flag("hidden") { "H:true;" } else { "" };
    format!(
        "WIFI:T:{encryption};S:{};P:{};{hidden};",
        values.text("ssid"),
        values.text("password"),
    )
}

fn vcard(values: &FieldValues) -> String {
    let mut out = format!("BEGIN:VCARD\nVERSION:3.0\nFN:{}\n", values.text("name"));
    for (id, property) in [
        ("org", "ORG"),
        ("title", "TITLE"),
        ("phone", "TEL"),
        ("email", "EMAIL"),
        ("url", "URL"),
        ("address", "ADR"),
    ] {
        push_line(&mut out, property, values.text(id));
    }
    out.push_str("END:VCARD");
    out
}

fn email(values: &FieldValues) -> String {
    let mut params = Vec::new();
    let subject = values.text("subject");
    if !subject.is_empty() {
        params.push(format!("subject={}", encode_component(subject)));
    }
    let body = values.text("body");
    if !body.is_empty() {
        params.push(format!("body={}", encode_component(body)));
    }

    let mut out = format!("mailto:{}", values.text("to"));
    if !params.is_empty() {
        out.push('?');
        out.push_str(&params.join("&"));
    }
    out
}

fn sms(values: &FieldValues) -> String {
    let mut out = format!("sms:{}", values.text("number"));
    let message = values.text("message");
    if !message.is_empty() {
        out.push_str("?body=");
        out.push_str(&encode_component(message));
    }
    out
}

fn event(values: &FieldValues) -> String {
    let mut out = format!(
        "BEGIN:VCALENDAR\nVERSION:2.0\nBEGIN:VEVENT\nSUMMARY:{}\n",
        values.text("summary")
    );
    push_line(&mut out, "LOCATION", values.text("location"));
    push_line(&mut out, "DESCRIPTION", values.text("description"));
    out.push_str(&format!(
        "DTSTART:{}\nDTEND:{}\n",
        compact_datetime(values.text("start")),
        compact_datetime(values.text("end")),
    ));
    out.push_str("END:VEVENT\nEND:VCALENDAR");
    out
}

fn push_line(out: &mut String, property: &str, value: &str) {
    if !value.is_empty() {
        out.push_str(property);
        out.push(':');
        out.push_str(value);
        out.push('\n');
    }
}

/// Turns a `datetime-local` value (`YYYY-MM-DDTHH:MM`) into the compact
/// iCalendar form `YYYYMMDDTHHMM00Z`.
///
/// The input is not validated: separators are stripped and `00Z` is
/// appended. An empty input stays empty.
///
/// ```
/// use qiform::content::compact_datetime;
///
/// assert_eq!(compact_datetime("2024-01-01T10:00"), "20240101T100000Z");
/// assert_eq!(compact_datetime(""), "");
/// ```
pub fn compact_datetime(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let mut out: String = value.chars().filter(|c| *c != '-' && *c != ':').collect();
    out.push_str("00Z");
    out
}

/// Percent-encodes a query parameter value the way browsers encode URI components.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}
