//! QR rendering for vendor identity tokens.
//!
//! The payload format `Vendor:<username>|ID:<unique_id>` is fixed: it is
//! rendered exactly once when a profile is provisioned, so a later username
//! change is not reflected in the stored image.

use image::{ImageFormat, Luma};
use qrcode::QrCode;
use thiserror::Error;

/// Errors that can occur while rendering a QR image.
#[derive(Debug, Error)]
pub enum QrError {
    #[error("failed to build QR code: {0}")]
    Encode(#[from] qrcode::types::QrError),
    #[error("failed to encode QR PNG: {0}")]
    Png(#[from] image::ImageError),
}

/// Builds the payload encoded into a vendor's QR image.
pub fn vendor_qr_payload(username: &str, unique_id: &str) -> String {
    format!("Vendor:{}|ID:{}", username, unique_id)
}

/// Renders `data` as a PNG-encoded QR image.
pub fn render_qr_png(data: &str) -> Result<Vec<u8>, QrError> {
    let code = QrCode::new(data.as_bytes())?;
    let img = code.render::<Luma<u8>>().build();

    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}
