use printpdf::image_crate::{GrayImage, Luma};
use qrcode::{Color as ModuleColor, QrCode};
use serde::Serialize;
use uuid::Uuid;

use crate::error::CertificateError;

/// チェックインコード画像の一辺のピクセル数。
pub const CODE_IMAGE_SIZE: u32 = 240;

// モジュール換算のクワイエットゾーン幅
const QUIET_ZONE_MODULES: u32 = 4;

const DARK: Luma<u8> = Luma([0u8]);
const LIGHT: Luma<u8> = Luma([255u8]);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckInPayload<'a> {
    participant_id: &'a Uuid,
    event_id: &'a Uuid,
}

/// (参加者, イベント) の組を一意に表すペイロードと、
/// それをレンダリングしたチェックインコード画像。
#[derive(Debug)]
pub struct CheckInCode {
    payload: Vec<u8>,
    image: GrayImage,
}

impl CheckInCode {
    /// 同じ入力に対しては常に同じペイロード・同じ画像を返す。
    pub fn encode(participant_id: Uuid, event_id: Uuid) -> Result<Self, CertificateError> {
        if participant_id.is_nil() || event_id.is_nil() {
            return Err(CertificateError::InvalidIdentifier);
        }

        let payload = serde_json::to_vec(&CheckInPayload {
            participant_id: &participant_id,
            event_id: &event_id,
        })
        .map_err(|e| CertificateError::Encoding(e.to_string()))?;

        let code =
            QrCode::new(&payload).map_err(|e| CertificateError::Encoding(e.to_string()))?;

        Ok(Self {
            image: rasterize(&code),
            payload,
        })
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }
}

// モジュール格子をクワイエットゾーン込みで固定サイズのビットマップへ引き伸ばす
fn rasterize(code: &QrCode) -> GrayImage {
    let modules = code.to_colors();
    let width = code.width() as u32;
    let total = width + QUIET_ZONE_MODULES * 2;

    GrayImage::from_fn(CODE_IMAGE_SIZE, CODE_IMAGE_SIZE, |x, y| {
        let mx = x * total / CODE_IMAGE_SIZE;
        let my = y * total / CODE_IMAGE_SIZE;
        let in_grid = (QUIET_ZONE_MODULES..QUIET_ZONE_MODULES + width).contains(&mx)
            && (QUIET_ZONE_MODULES..QUIET_ZONE_MODULES + width).contains(&my);
        if !in_grid {
            return LIGHT;
        }
        let idx = ((my - QUIET_ZONE_MODULES) * width + (mx - QUIET_ZONE_MODULES)) as usize;
        match modules[idx] {
            ModuleColor::Dark => DARK,
            ModuleColor::Light => LIGHT,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_is_deterministic() {
        let participant = Uuid::new_v4();
        let event = Uuid::new_v4();

        let a = CheckInCode::encode(participant, event).unwrap();
        let b = CheckInCode::encode(participant, event).unwrap();

        assert_eq!(a.payload(), b.payload());
        assert_eq!(a.image().as_raw(), b.image().as_raw());
    }

    #[test]
    fn payload_identifies_the_pair() {
        let participant = Uuid::new_v4();
        let event = Uuid::new_v4();

        let code = CheckInCode::encode(participant, event).unwrap();
        let json: serde_json::Value = serde_json::from_slice(code.payload()).unwrap();

        assert_eq!(json["participantId"], participant.to_string());
        assert_eq!(json["eventId"], event.to_string());
    }

    #[test]
    fn image_has_fixed_size() {
        let code = CheckInCode::encode(Uuid::new_v4(), Uuid::new_v4()).unwrap();
        assert_eq!(code.image().width(), CODE_IMAGE_SIZE);
        assert_eq!(code.image().height(), CODE_IMAGE_SIZE);
        // クワイエットゾーンは常に白
        assert_eq!(*code.image().get_pixel(0, 0), LIGHT);
        assert_eq!(
            *code.image().get_pixel(CODE_IMAGE_SIZE - 1, CODE_IMAGE_SIZE - 1),
            LIGHT
        );
    }

    #[test]
    fn nil_identifiers_are_rejected() {
        let err = CheckInCode::encode(Uuid::nil(), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, CertificateError::InvalidIdentifier));

        let err = CheckInCode::encode(Uuid::new_v4(), Uuid::nil()).unwrap_err();
        assert!(matches!(err, CertificateError::InvalidIdentifier));
    }

    #[test]
    fn different_pairs_encode_differently() {
        let a = CheckInCode::encode(Uuid::new_v4(), Uuid::new_v4()).unwrap();
        let b = CheckInCode::encode(Uuid::new_v4(), Uuid::new_v4()).unwrap();
        assert_ne!(a.payload(), b.payload());
    }
}
