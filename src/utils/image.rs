use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::errors::AppError;

const DEFAULT_CONTENT_TYPE: &str = "image/png";

#[derive(Debug, PartialEq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

pub fn is_data_url(value: &str) -> bool {
    value
        .get(..5)
        .map(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .unwrap_or(false)
}

/// Object key under which an employee's photo is stored.
pub fn image_key(employee_id: &str) -> String {
    format!("employee_images/{}.png", employee_id)
}

/// Decodes a `data:[<mime>][;base64],<payload>` URL as produced by a browser
/// `FileReader.readAsDataURL`.
pub fn decode_data_url(value: &str) -> Result<DecodedImage, AppError> {
    if !is_data_url(value) {
        return Err(AppError::BadRequest("Image must be a data URL".to_string()));
    }

    let (header, payload) = value[5..]
        .split_once(',')
        .ok_or_else(|| AppError::BadRequest("Malformed image data URL".to_string()))?;

    let mut params = header.split(';');
    let declared_type = params.next().unwrap_or_default().trim();
    if !params.any(|param| param.eq_ignore_ascii_case("base64")) {
        return Err(AppError::BadRequest("Image data URL must be base64-encoded".to_string()));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|err| AppError::BadRequest(format!("Invalid image data: {}", err)))?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest("Image data is empty".to_string()));
    }

    let content_type = match infer::get(&bytes) {
        Some(kind) => kind.mime_type().to_string(),
        None if !declared_type.is_empty() => declared_type.to_string(),
        None => DEFAULT_CONTENT_TYPE.to_string(),
    };

    Ok(DecodedImage { bytes, content_type })
}

/// Inverse of [`decode_data_url`], used by the form when a photo is attached.
pub fn encode_data_url(bytes: &[u8], content_type: &str) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(bytes))
}
