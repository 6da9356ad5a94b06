use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::prompt::IMAGE_MIME;

/// Standard-alphabet, padded base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// `data:image/jpeg;base64,<payload>` for inlining into the user message.
pub fn image_data_uri(bytes: &[u8]) -> String {
    format!("data:{IMAGE_MIME};base64,{}", encode_base64(bytes))
}
