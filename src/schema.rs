//! Field schema registry.
//!
//! Each [`QrKind`] solicits a fixed, ordered set of inputs. The schemas are
//! `'static` tables; nothing here allocates or mutates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The semantic QR convention a payload follows.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrKind {
    #[default]
    Text,
    Wifi,
    Vcard,
    Email,
    Tel,
    Sms,
    Event,
}

impl QrKind {
    /// Every kind, in selector order.
    pub const ALL: [QrKind; 7] = [
        QrKind::Text,
        QrKind::Wifi,
        QrKind::Vcard,
        QrKind::Email,
        QrKind::Tel,
        QrKind::Sms,
        QrKind::Event,
    ];

    /// Lowercase identifier, as used by the type selector.
    pub const fn name(self) -> &'static str {
        match self {
            QrKind::Text => "text",
            QrKind::Wifi => "wifi",
            QrKind::Vcard => "vcard",
            QrKind::Email => "email",
            QrKind::Tel => "tel",
            QrKind::Sms => "sms",
            QrKind::Event => "event",
        }
    }

    /// Human readable label for the type selector.
    pub const fn label(self) -> &'static str {
        match self {
            QrKind::Text => "Text / URL",
            QrKind::Wifi => "Wi-Fi",
            QrKind::Vcard => "Contact (vCard)",
            QrKind::Email => "Email",
            QrKind::Tel => "Phone",
            QrKind::Sms => "SMS",
            QrKind::Event => "Calendar event",
        }
    }
}

impl fmt::Display for QrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a type name does not match any [`QrKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown QR type '{}'", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for QrKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QrKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// The kind of input control a field is rendered as.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FieldKind {
    Text,
    Email,
    Url,
    Textarea,
    Select { options: &'static [&'static str] },
    Checkbox,
    DateTime,
}

/// Declarative description of one form input belonging to a [`QrKind`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FieldSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    const fn new(id: &'static str, label: &'static str, kind: FieldKind, required: bool) -> Self {
        FieldSpec { id, label, kind, required }
    }
}

/// Encryption choices offered for Wi-Fi networks. The first entry is the default.
pub const WIFI_ENCRYPTIONS: &[&str] = &["WPA", "WEP", "nopass"];

const WIFI_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("ssid", "Network name (SSID)", FieldKind::Text, true),
    FieldSpec::new("password", "Password", FieldKind::Text, false),
    FieldSpec::new("encryption", "Encryption", FieldKind::Select { options: WIFI_ENCRYPTIONS }, false),
    FieldSpec::new("hidden", "Hidden network", FieldKind::Checkbox, false),
];

const VCARD_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", "Full name", FieldKind::Text, true),
    FieldSpec::new("org", "Organization", FieldKind::Text, false),
    FieldSpec::new("title", "Job title", FieldKind::Text, false),
    FieldSpec::new("phone", "Phone", FieldKind::Text, false),
    FieldSpec::new("email", "Email", FieldKind::Email, false),
    FieldSpec::new("url", "Website", FieldKind::Url, false),
    FieldSpec::new("address", "Address", FieldKind::Textarea, false),
];

const EMAIL_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("to", "Recipient", FieldKind::Email, true),
    FieldSpec::new("subject", "Subject", FieldKind::Text, false),
    FieldSpec::new("body", "Message", FieldKind::Textarea, false),
];

const TEL_FIELDS: &[FieldSpec] = &[FieldSpec::new("number", "Phone number", FieldKind::Text, true)];

const SMS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("number", "Phone number", FieldKind::Text, true),
    FieldSpec::new("message", "Message", FieldKind::Textarea, false),
];

const EVENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("summary", "Title", FieldKind::Text, true),
    FieldSpec::new("location", "Location", FieldKind::Text, false),
    FieldSpec::new("description", "Description", FieldKind::Textarea, false),
    FieldSpec::new("start", "Starts", FieldKind::DateTime, true),
    FieldSpec::new("end", "Ends", FieldKind::DateTime, true),
];

/// Returns the ordered fields a QR type solicits.
///
/// [`QrKind::Text`] has no dynamic fields; the plain text input is used directly.
///
/// # Example
///
/// ```
/// use qiform::schema::{fields_for, QrKind};
///
/// assert!(fields_for(QrKind::Text).is_empty());
/// assert_eq!(fields_for(QrKind::Tel)[0].id, "number");
/// ```
pub fn fields_for(kind: QrKind) -> &'static [FieldSpec] {
    match kind {
        QrKind::Text => &[],
        QrKind::Wifi => WIFI_FIELDS,
        QrKind::Vcard => VCARD_FIELDS,
        QrKind::Email => EMAIL_FIELDS,
        QrKind::Tel => TEL_FIELDS,
        QrKind::Sms => SMS_FIELDS,
        QrKind::Event => EVENT_FIELDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in QrKind::ALL {
            assert_eq!(kind.name().parse::<QrKind>(), Ok(kind));
        }
        assert_eq!("barcode".parse::<QrKind>(), Err(UnknownKind("barcode".into())));
    }

    #[test]
    fn test_field_ids_unique_per_kind() {
        for kind in QrKind::ALL {
            let fields = fields_for(kind);
            for (i, field) in fields.iter().enumerate() {
                assert!(fields[i + 1..].iter().all(|other| other.id != field.id), "{kind}: {}", field.id);
            }
        }
    }

    #[test]
    fn test_only_text_has_no_fields() {
        for kind in QrKind::ALL {
            assert_eq!(fields_for(kind).is_empty(), kind == QrKind::Text);
        }
    }

    #[test]
    fn test_wifi_encryption_options() {
        let encryption = fields_for(QrKind::Wifi).iter().find(|f| f.id == "encryption").unwrap();
        assert_eq!(encryption.kind, FieldKind::Select { options: &["WPA", "WEP", "nopass"] });
    }

    #[test]
    fn test_kind_serde_lowercase() {
        assert_eq!(serde_json::to_string(&QrKind::Vcard).unwrap(), "\"vcard\"");
        assert_eq!(serde_json::from_str::<QrKind>("\"event\"").unwrap(), QrKind::Event);
    }
}
