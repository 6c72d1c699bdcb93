use crate::config::QrConfig;
use crate::error::app_error::AppError;
use crate::models::attendance_session::QrPayload;
use base64::{Engine as _, engine::general_purpose};
use qrcode::QrCode;
use qrcode::render::svg;

/// Turns session payloads into QR images and decoded scan text back into payloads.
///
/// Image decoding happens on the scanning device; this side only ever sees text.
#[derive(Debug, Clone)]
pub struct QrCodec {
    config: QrConfig,
}

impl QrCodec {
    pub fn new(config: QrConfig) -> Self {
        Self { config }
    }

    pub fn encode_payload(payload: &QrPayload) -> Result<String, AppError> {
        serde_json::to_string(payload).map_err(|e| AppError::qr_encoding(format!("Failed to serialize QR payload: {}", e)))
    }

    pub fn decode_payload(raw: &str) -> Result<QrPayload, AppError> {
        serde_json::from_str(raw.trim()).map_err(|source| AppError::InvalidQrCode { source })
    }

    /// Render the payload as an SVG QR code wrapped in a data URL.
    pub fn render(&self, payload: &QrPayload) -> Result<String, AppError> {
        let data = Self::encode_payload(payload)?;
        let code = QrCode::new(data.as_bytes()).map_err(|e| AppError::qr_encoding(format!("Failed to generate QR code: {}", e)))?;

        let image = code
            .render::<svg::Color>()
            .min_dimensions(self.config.size, self.config.size)
            .dark_color(svg::Color(&self.config.dark_color))
            .light_color(svg::Color(&self.config.light_color))
            .quiet_zone(self.config.quiet_zone)
            .build();

        Ok(format!("data:image/svg+xml;base64,{}", general_purpose::STANDARD.encode(image.as_bytes())))
    }
}
