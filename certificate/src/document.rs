use chrono::{DateTime, Utc};
use printpdf::image_crate::{self, imageops::FilterType, DynamicImage, Rgb as Px, RgbImage};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfLayerReference, Rect, Rgb,
};

use crate::code::CheckInCode;
use crate::error::CertificateError;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const HEADER_HEIGHT: f32 = 42.0;

const PT_TO_MM: f32 = 0.352_778;
const IMAGE_DPI: f32 = 300.0;

// 元デザインのカラーパレット
const PRIMARY: (f32, f32, f32) = (0.416, 0.067, 0.796);
const TEXT: (f32, f32, f32) = (0.2, 0.2, 0.2);
const LIGHT_TEXT: (f32, f32, f32) = (0.4, 0.4, 0.4);
const PANEL_EDGE: (f32, f32, f32) = (0.933, 0.933, 0.933);
const PANEL_FILL: (f32, f32, f32) = (0.976, 0.976, 0.976);

const ACCENT_PX: Px<u8> = Px([255, 154, 68]);
const PLACEHOLDER_PX: Px<u8> = Px([214, 214, 214]);
const WHITE_PX: Px<u8> = Px([255, 255, 255]);

const BADGE_SIZE_PX: u32 = 200;
const BADGE_RING_PX: f64 = 6.0;
const BADGE_SIZE_MM: f32 = 35.0;
const CODE_SIZE_MM: f32 = 42.0;

/// 証明書に載せる登録内容。ネットワークや DB には一切触れない。
#[derive(Debug, Clone)]
pub struct Certificate {
    pub participant_name: String,
    pub participant_email: String,
    pub event_title: String,
    pub event_date: DateTime<Utc>,
    pub event_location: String,
    pub registered_at: DateTime<Utc>,
}

/// A4 固定レイアウトの登録証明書 PDF を生成する。
///
/// 写真はデコードできた場合のみ使い、なければプレースホルダーで代替する。
/// 描画段階の失敗はこの登録試行に対して致命的で、呼び出し側へそのまま返す。
pub fn render(
    certificate: &Certificate,
    photo: Option<&[u8]>,
    code: &CheckInCode,
) -> Result<Vec<u8>, CertificateError> {
    let (doc, page, layer) = PdfDocument::new(
        "Registration Certificate",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "certificate",
    );
    let layer = doc.get_page(page).get_layer(layer);

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(rendering)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(rendering)?;

    // ヘッダーバンド
    set_fill(&layer, PRIMARY);
    layer.add_rect(
        Rect::new(
            Mm(0.0),
            Mm(PAGE_HEIGHT - HEADER_HEIGHT),
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
        )
        .with_mode(PaintMode::Fill),
    );
    set_fill(&layer, (1.0, 1.0, 1.0));
    layer.use_text("EVENT HORIZON", 20.0, Mm(18.0), Mm(PAGE_HEIGHT - 16.0), &bold);
    layer.use_text(
        "Registration Certificate",
        13.0,
        Mm(18.0),
        Mm(PAGE_HEIGHT - 25.0),
        &regular,
    );

    // 円形にくり抜いた写真バッジ。中心をヘッダー下端に重ねる
    let badge = photo_badge(photo);
    place_image(
        &layer,
        DynamicImage::ImageRgb8(badge),
        Mm((PAGE_WIDTH - BADGE_SIZE_MM) / 2.0),
        Mm(PAGE_HEIGHT - HEADER_HEIGHT - BADGE_SIZE_MM / 2.0),
        BADGE_SIZE_MM,
    );

    // タイトル
    set_fill(&layer, TEXT);
    layer.use_text(
        "EVENT REGISTRATION",
        22.0,
        centered_x("EVENT REGISTRATION", 22.0),
        Mm(222.0),
        &bold,
    );

    // 詳細パネル
    set_fill(&layer, (1.0, 1.0, 1.0));
    set_outline(&layer, PANEL_EDGE);
    layer.set_outline_thickness(0.8);
    layer.add_rect(
        Rect::new(Mm(25.0), Mm(138.0), Mm(185.0), Mm(212.0)).with_mode(PaintMode::FillStroke),
    );

    set_fill(&layer, PRIMARY);
    layer.use_text("PARTICIPANT DETAILS", 13.0, Mm(30.0), Mm(202.0), &bold);
    detail_row(
        &layer,
        &regular,
        &bold,
        "Full Name:",
        &certificate.participant_name,
        195.0,
    );
    detail_row(
        &layer,
        &regular,
        &bold,
        "Email:",
        &certificate.participant_email,
        188.0,
    );
    detail_row(
        &layer,
        &regular,
        &bold,
        "Registration Date:",
        &certificate.registered_at.format("%Y-%m-%d").to_string(),
        181.0,
    );

    set_fill(&layer, PRIMARY);
    layer.use_text("EVENT DETAILS", 13.0, Mm(30.0), Mm(170.0), &bold);
    detail_row(
        &layer,
        &regular,
        &bold,
        "Event Name:",
        &certificate.event_title,
        163.0,
    );
    detail_row(
        &layer,
        &regular,
        &bold,
        "Date & Time:",
        &certificate
            .event_date
            .format("%Y-%m-%d %H:%M UTC")
            .to_string(),
        156.0,
    );
    detail_row(
        &layer,
        &regular,
        &bold,
        "Location:",
        &certificate.event_location,
        149.0,
    );

    // チェックインコード
    let caption = "Present this check-in code at the event entrance:";
    set_fill(&layer, LIGHT_TEXT);
    layer.use_text(caption, 12.0, centered_x(caption, 12.0), Mm(132.0), &regular);

    set_fill(&layer, PANEL_FILL);
    set_outline(&layer, PANEL_EDGE);
    layer.add_rect(
        Rect::new(Mm(78.0), Mm(70.0), Mm(132.0), Mm(124.0)).with_mode(PaintMode::FillStroke),
    );
    place_image(
        &layer,
        DynamicImage::ImageLuma8(code.image().clone()),
        Mm((PAGE_WIDTH - CODE_SIZE_MM) / 2.0),
        Mm(76.0),
        CODE_SIZE_MM,
    );

    // フッター
    let disclaimer = "This certificate is proof of registration and must be presented at the event.";
    set_fill(&layer, LIGHT_TEXT);
    layer.use_text(disclaimer, 9.0, centered_x(disclaimer, 9.0), Mm(22.0), &regular);
    let copyright = "(c) 2025 Event Horizon. All rights reserved.";
    layer.use_text(copyright, 9.0, centered_x(copyright, 9.0), Mm(16.0), &regular);

    doc.save_to_bytes().map_err(rendering)
}

fn rendering<E: std::fmt::Display>(e: E) -> CertificateError {
    CertificateError::Rendering(e.to_string())
}

fn set_fill(layer: &PdfLayerReference, (r, g, b): (f32, f32, f32)) {
    layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
}

fn set_outline(layer: &PdfLayerReference, (r, g, b): (f32, f32, f32)) {
    layer.set_outline_color(Color::Rgb(Rgb::new(r, g, b, None)));
}

fn detail_row(
    layer: &PdfLayerReference,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
    label: &str,
    value: &str,
    y: f32,
) {
    set_fill(layer, LIGHT_TEXT);
    layer.use_text(label, 11.0, Mm(32.0), Mm(y), regular);
    set_fill(layer, TEXT);
    layer.use_text(value, 11.0, Mm(78.0), Mm(y), bold);
}

// Helvetica の平均字幅による近似センタリング
fn centered_x(text: &str, font_size_pt: f32) -> Mm {
    let width_mm = text.chars().count() as f32 * font_size_pt * 0.5 * PT_TO_MM;
    Mm(((PAGE_WIDTH - width_mm) / 2.0).max(0.0))
}

fn place_image(
    layer: &PdfLayerReference,
    image: DynamicImage,
    x: Mm,
    y: Mm,
    desired_mm: f32,
) {
    let px = image.width() as f32;
    // dpi 固定なので原寸からの倍率で目的サイズに合わせる
    let scale = desired_mm / (px / IMAGE_DPI * 25.4);
    Image::from_dynamic_image(&image).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(x),
            translate_y: Some(y),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        },
    );
}

/// 写真を中央の正方形で切り出し、円形マスクとアクセントリングを焼き込む。
/// 写真が無い・読めない場合はプレースホルダーの円盤になる。
fn photo_badge(photo: Option<&[u8]>) -> RgbImage {
    let scaled = photo
        .and_then(|bytes| image_crate::load_from_memory(bytes).ok())
        .map(|img| {
            let side = img.width().min(img.height());
            let x = (img.width() - side) / 2;
            let y = (img.height() - side) / 2;
            img.crop_imm(x, y, side, side)
                .resize_exact(BADGE_SIZE_PX, BADGE_SIZE_PX, FilterType::Triangle)
                .to_rgb8()
        });

    let center = (BADGE_SIZE_PX as f64 - 1.0) / 2.0;
    let outer = BADGE_SIZE_PX as f64 / 2.0;
    let inner = outer - BADGE_RING_PX;

    RgbImage::from_fn(BADGE_SIZE_PX, BADGE_SIZE_PX, |x, y| {
        let dx = x as f64 - center;
        let dy = y as f64 - center;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance > outer {
            WHITE_PX
        } else if distance > inner {
            ACCENT_PX
        } else {
            match &scaled {
                Some(img) => *img.get_pixel(x, y),
                None => PLACEHOLDER_PX,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::CheckInCode;
    use printpdf::image_crate::ImageOutputFormat;
    use std::io::Cursor;
    use uuid::Uuid;

    fn sample() -> Certificate {
        Certificate {
            participant_name: "Ada Lovelace".into(),
            participant_email: "ada@example.com".into(),
            event_title: "RustConf".into(),
            event_date: "2025-06-01T10:00:00Z".parse().unwrap(),
            event_location: "Tokyo".into(),
            registered_at: "2025-05-01T09:30:00Z".parse().unwrap(),
        }
    }

    fn sample_code() -> CheckInCode {
        CheckInCode::encode(Uuid::new_v4(), Uuid::new_v4()).unwrap()
    }

    fn png_bytes(color: [u8; 3]) -> Vec<u8> {
        let img = RgbImage::from_pixel(32, 32, Px(color));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageOutputFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn renders_pdf_without_photo() {
        let bytes = render(&sample(), None, &sample_code()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1_000);
    }

    #[test]
    fn renders_pdf_with_photo() {
        let photo = png_bytes([200, 40, 40]);
        let bytes = render(&sample(), Some(&photo), &sample_code()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn garbage_photo_falls_back_to_placeholder() {
        let bytes = render(&sample(), Some(b"not an image"), &sample_code()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn badge_masks_to_a_circle() {
        let badge = photo_badge(None);
        // 四隅は円の外なので背景色
        assert_eq!(*badge.get_pixel(0, 0), WHITE_PX);
        assert_eq!(*badge.get_pixel(BADGE_SIZE_PX - 1, 0), WHITE_PX);
        // 中心はプレースホルダー
        assert_eq!(
            *badge.get_pixel(BADGE_SIZE_PX / 2, BADGE_SIZE_PX / 2),
            PLACEHOLDER_PX
        );
        // 縁はアクセントリング
        assert_eq!(*badge.get_pixel(BADGE_SIZE_PX / 2, 2), ACCENT_PX);
    }

    #[test]
    fn badge_keeps_photo_pixels_inside_the_circle() {
        let photo = png_bytes([10, 200, 30]);
        let badge = photo_badge(Some(&photo));
        assert_eq!(
            *badge.get_pixel(BADGE_SIZE_PX / 2, BADGE_SIZE_PX / 2),
            Px([10, 200, 30])
        );
        assert_eq!(*badge.get_pixel(0, BADGE_SIZE_PX - 1), WHITE_PX);
    }
}
