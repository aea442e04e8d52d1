//! Multipart payloads for upload tests.

use axum_test::multipart::{MultipartForm, Part};

/// Smallest valid PNG (1x1, transparent).
pub fn minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
        0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

/// Form with a single file part named `field`.
pub fn file_form(field: &str, file_name: &str, mime_type: &str, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        field,
        Part::bytes(data).file_name(file_name).mime_type(mime_type),
    )
}
