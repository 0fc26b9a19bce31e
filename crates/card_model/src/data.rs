//! Card data: the values a filled-in card carries

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A file uploaded into an image field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    #[serde(with = "base64_bytes")]
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// The placeholder used as the initial value of image fields
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether this is the placeholder rather than an actual upload
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.bytes.is_empty()
    }

    /// Whether the MIME type is `image/*`
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Encode the file as a `data:` URI
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

/// Format a number the way it is shown to users: integral values without a
/// fractional part
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// A single field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
    File(UploadedFile),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&UploadedFile> {
        match self {
            FieldValue::File(f) => Some(f),
            _ => None,
        }
    }

    /// Whether the value counts as "not provided" for required checks
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::File(f) => f.is_empty(),
            FieldValue::Number(n) => n.is_nan(),
            FieldValue::Bool(_) => false,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
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

impl From<UploadedFile> for FieldValue {
    fn from(value: UploadedFile) -> Self {
        FieldValue::File(value)
    }
}

/// Field name to value mapping for one card
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardData(BTreeMap<String, FieldValue>);

impl CardData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    /// Text value of `name`, if it is text
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }
}

impl FromIterator<(String, FieldValue)> for CardData {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_value_roundtrip() {
        let data = CardData::new()
            .with("name", "Aria")
            .with("strength", 42.0)
            .with("isElite", true)
            .with("art", UploadedFile::new("a.png", "image/png", vec![1, 2, 3]));

        let json = serde_json::to_string(&data).unwrap();
        let back: CardData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
        assert_eq!(back.text("name"), Some("Aria"));
        assert_eq!(back.get("strength").and_then(FieldValue::as_f64), Some(42.0));
    }

    #[test]
    fn test_file_bytes_are_base64() {
        let file = UploadedFile::new("x.jpg", "image/jpeg", b"hi".to_vec());
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["bytes"], "aGk=");
        assert_eq!(json["mimeType"], "image/jpeg");
        assert_eq!(file.to_data_uri(), "data:image/jpeg;base64,aGk=");
    }

    #[test]
    fn test_blank_values() {
        assert!(FieldValue::text("  ").is_blank());
        assert!(FieldValue::File(UploadedFile::empty()).is_blank());
        assert!(!FieldValue::Bool(false).is_blank());
        assert!(!FieldValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn test_image_mime_check() {
        assert!(UploadedFile::new("a", "image/svg+xml", vec![]).is_image());
        assert!(!UploadedFile::new("a", "application/pdf", vec![]).is_image());
    }
}
