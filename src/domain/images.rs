use std::fmt::Write;

use crate::domain::ids::UserId;

pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";
const DEFAULT_FILENAME: &str = "img.jpg";

/// An image received from a client, fully buffered.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub filename: Option<String>,
}

impl ImageUpload {
    /// Declared content type, falling back to JPEG.
    pub fn content_type(&self) -> &str {
        self.content_type
            .as_deref()
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// Text after the last `.` of the original filename. A filename without a
    /// dot is used whole, matching how the extension was always derived.
    pub fn extension(&self) -> &str {
        let filename = self
            .filename
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_FILENAME);
        filename.rsplit('.').next().unwrap_or(filename)
    }

    /// `data:` URL of the image, as sent to the vision model.
    pub fn data_url(&self) -> String {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{encoded}", self.content_type())
    }
}

/// Builds `{user_id}/{16 random lowercase hex}.{ext}`.
pub fn storage_key(user_id: &UserId, extension: &str) -> String {
    let random: [u8; 8] = rand::random();
    let mut key = String::with_capacity(user_id.as_str().len() + extension.len() + 18);
    key.push_str(user_id.as_str());
    key.push('/');
    for byte in random {
        let _ = write!(key, "{byte:02x}");
    }
    key.push('.');
    key.push_str(extension);
    key
}
