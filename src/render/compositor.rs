//! Ticket composition.
//!
//! One ticket face is drawn in a fixed stage order onto a 1650×600
//! canvas: background template, title, show logo, date line, venue
//! contact block, attendee name band, seat labels, subscriber
//! decorations, and finally the QR code with its rotated id caption.
//! Stage anchors below are in canvas pixels and match the printed
//! template artwork; the canvas itself is ticket stock at print
//! resolution (5.5in × 2in at 300 dpi).

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};

use crate::error::BoletoError;
use crate::render::canvas::{Align, BLACK, Canvas, WHITE};
use crate::render::font::{self, FontBook};
use crate::render::layout::{self, TextBlock};
use crate::render::qr::{self, QrStyle};
use crate::ticket::{GENERAL_ADMISSION, TicketRecord};

/// Canvas dimensions of the printable ticket face.
pub const TICKET_WIDTH: u32 = 1650;
pub const TICKET_HEIGHT: u32 = 600;

// Left text column (title, date, contact block).
const LEFT_MARGIN: f32 = 38.0;
const LEFT_COLUMN_MAX: f32 = 700.0;
const TITLE_START: f32 = 70.0;
const TITLE_FLOOR: f32 = 50.0;
const TITLE_TOP: f32 = 20.0;
const DATE_START: f32 = 32.0;
const DATE_FLOOR: f32 = 12.0;
const DATE_GAP: f32 = 10.0;

// Venue block, drawn at a fixed size above the name band.
const CONTACT_TEXT: &str = "Renton Civic Theatre\n507 S Third St, Renton, WA 98507\nboxoffice@rentoncivictheatre.org | (425) 226-5529";
const CONTACT_SIZE: f32 = 26.0;
const CONTACT_ANCHOR_Y: f32 = 268.0;

// Logo box, centered right of the text column.
const LOGO_BOX: u32 = TICKET_HEIGHT - 60;
const LOGO_CENTER_X: f32 = 1032.0;
const LOGO_CENTER_Y: f32 = TICKET_HEIGHT as f32 / 2.0;

// Attendee name band (white text over the template's dark band).
const NAME_CENTER_X: f32 = 353.0;
const NAME_BASELINE: f32 = 332.0;
const NAME_MAX: f32 = 570.0;
const NAME_START: f32 = 42.0;
const NAME_FLOOR: f32 = 16.0;

// Section / row / seat labels.
const SEAT_SIZE: f32 = 70.0;
const SEAT_BASELINE: f32 = 515.0;
const SECTION_X: f32 = 168.0;
const ROW_X: f32 = 383.0;
const SEAT_X: f32 = 570.0;

// Subscriber decorations.
const GA_NOTE: &str = "See board member for seat preference selection";
const GA_NOTE_X: f32 = 59.0;
const GA_NOTE_BASELINE: f32 = 562.0;
const NOTE_SIZE: f32 = 25.0;
const BADGE_CENTER: (f32, f32) = (663.0, 267.0);
const BADGE_RADIUS: f32 = 10.0;
const THANKS_TEXT: &str = "Thank you for being a subscriber!";
const THANKS_BASELINE: f32 = 588.0;

// QR block, bottom-right corner.
const QR_SIZE: u32 = 180;
const QR_MARGIN: u32 = 40;
const CAPTION_SIZE: f32 = 37.0;
const CAPTION_FLOOR: f32 = 12.0;
const CAPTION_MAX: f32 = 170.0;
const CAPTION_GAP: f32 = 20.0;

/// Asset and staging locations, fixed at startup.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    /// Background template stretched across the whole face.
    pub template: PathBuf,
    /// Directory of per-show logo images keyed by show slug.
    pub logo_dir: PathBuf,
    /// Directory where rendered tickets await the print dispatcher.
    pub staging_dir: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            template: PathBuf::from("img/ticket-template.png"),
            logo_dir: PathBuf::from("img/logos"),
            staging_dir: PathBuf::from("img/generated-tickets"),
        }
    }
}

impl AssetPaths {
    pub fn logo_path(&self, slug: &str) -> PathBuf {
        self.logo_dir.join(format!("{slug}.png"))
    }

    pub fn staged_path(&self, ticket_id: &str) -> PathBuf {
        self.staging_dir.join(format!("{ticket_id}.png"))
    }
}

/// Scale (src_w, src_h) into a bounding box preserving the aspect ratio,
/// sized by the constraining dimension: taller-than-wide images take the
/// box height, all others the box width.
pub fn aspect_fit(src_w: u32, src_h: u32, box_w: u32, box_h: u32) -> (u32, u32) {
    if src_h > src_w {
        let h = box_h;
        let w = (src_w as f32 * (h as f32 / src_h as f32)).round() as u32;
        (w.max(1), h)
    } else {
        let w = box_w;
        let h = (src_h as f32 * (w as f32 / src_w as f32)).round() as u32;
        (w, h.max(1))
    }
}

fn load_asset(path: &Path) -> Result<image::DynamicImage, BoletoError> {
    image::open(path)
        .map_err(|e| BoletoError::Asset(format!("failed to load {}: {}", path.display(), e)))
}

/// Render one ticket onto a fresh canvas.
///
/// Stages run strictly in order; the first failure (missing template or
/// logo, oversized QR payload) aborts the whole render and the canvas is
/// never flushed.
pub fn compose_ticket(
    assets: &AssetPaths,
    fonts: &FontBook,
    ticket: &TicketRecord,
) -> Result<Canvas, BoletoError> {
    let mut canvas = Canvas::new(TICKET_WIDTH, TICKET_HEIGHT);

    let template = load_asset(&assets.template)?;
    canvas.draw_stretched(&template);

    let light = fonts.font(font::LIGHT)?;
    let medium = fonts.font(font::MEDIUM)?;
    let semibold = fonts.font(font::SEMIBOLD)?;

    // Show title, shrunk to the left column.
    let title = layout::shrink_to_fit(
        |px| font::line_width(medium, px, &ticket.show),
        TITLE_START,
        TITLE_FLOOR,
        LEFT_COLUMN_MAX,
    );
    canvas.draw_text(
        medium,
        title.px,
        BLACK,
        Align::Left,
        LEFT_MARGIN,
        TITLE_TOP + title.px,
        &ticket.show,
    );

    // Show logo, aspect-fit into its box. A missing logo aborts the
    // ticket; the canvas is simply dropped.
    let logo = load_asset(&assets.logo_path(&ticket.show_slug()))?;
    let (logo_w, logo_h) = aspect_fit(logo.width(), logo.height(), LOGO_BOX, LOGO_BOX);
    let scaled = imageops::resize(&logo.to_rgba8(), logo_w, logo_h, FilterType::Lanczos3);
    canvas.overlay(
        &scaled,
        (LOGO_CENTER_X - logo_w as f32 / 2.0).round() as i64,
        (LOGO_CENTER_Y - logo_h as f32 / 2.0).round() as i64,
    );

    // Date line sits below the title at the title's final size.
    let date_baseline = TITLE_TOP + title.px + DATE_GAP + DATE_START;
    let date = layout::shrink_to_fit(
        |px| font::line_width(medium, px, &ticket.date_time),
        DATE_START,
        DATE_FLOOR,
        LEFT_COLUMN_MAX,
    );
    canvas.draw_text(
        medium,
        date.px,
        BLACK,
        Align::Left,
        LEFT_MARGIN,
        date_baseline,
        &ticket.date_time,
    );

    // Venue contact block: fixed size, anchored by its own height.
    let contact = TextBlock::new(CONTACT_TEXT);
    let contact_metrics = font::LineMetrics::of(light, CONTACT_SIZE);
    let line_height = contact_metrics.line_height();
    let first_baseline = CONTACT_ANCHOR_Y - contact.height(line_height) + 10.0;
    for (i, line) in contact.lines.iter().enumerate() {
        canvas.draw_text(
            light,
            CONTACT_SIZE,
            BLACK,
            Align::Left,
            LEFT_MARGIN,
            first_baseline + i as f32 * line_height,
            line,
        );
    }

    // Attendee name, white over the template's name band.
    let name = layout::shrink_to_fit(
        |px| font::line_width(semibold, px, &ticket.name),
        NAME_START,
        NAME_FLOOR,
        NAME_MAX,
    );
    canvas.draw_text(
        semibold,
        name.px,
        WHITE,
        Align::Center,
        NAME_CENTER_X,
        NAME_BASELINE,
        &ticket.name,
    );

    // Section / row / seat at a fixed size; overflow is accepted.
    for (label, x) in [
        (&ticket.section, SECTION_X),
        (&ticket.row, ROW_X),
        (&ticket.seat, SEAT_X),
    ] {
        canvas.draw_text(medium, SEAT_SIZE, BLACK, Align::Center, x, SEAT_BASELINE, label);
    }

    if ticket.is_subscriber && ticket.section == GENERAL_ADMISSION {
        canvas.draw_text(
            medium,
            NOTE_SIZE,
            BLACK,
            Align::Left,
            GA_NOTE_X,
            GA_NOTE_BASELINE,
            GA_NOTE,
        );
    }

    if ticket.is_subscriber {
        let (bx, by) = BADGE_CENTER;
        canvas.fill_circle(bx, by, BADGE_RADIUS, WHITE);
        canvas.stroke_circle(bx, by, BADGE_RADIUS, 1.0, BLACK);
        canvas.draw_text(
            light,
            NOTE_SIZE,
            BLACK,
            Align::Center,
            NAME_CENTER_X,
            THANKS_BASELINE,
            THANKS_TEXT,
        );
    }

    // QR code in the bottom-right corner.
    let qr_x = TICKET_WIDTH - QR_MARGIN - QR_SIZE;
    let qr_y = TICKET_HEIGHT - QR_MARGIN - QR_SIZE;
    let qr = qr::encode_styled(&ticket.ticket_id, QR_SIZE, &QrStyle::default())?;
    canvas.overlay(&qr, qr_x as i64, qr_y as i64);

    // Ticket id caption, rotated up the left edge of the QR box.
    let caption = layout::shrink_to_fit(
        |px| font::line_width(light, px, &ticket.ticket_id),
        CAPTION_SIZE,
        CAPTION_FLOOR,
        CAPTION_MAX,
    );
    canvas.draw_text_rotated_ccw(
        light,
        caption.px,
        BLACK,
        qr_x as f32 - CAPTION_GAP,
        qr_y as f32 + QR_SIZE as f32 / 2.0,
        &ticket.ticket_id,
    );

    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_aspect_fit_tall_logo_takes_box_height() {
        let (w, h) = aspect_fit(200, 400, 540, 540);
        assert_eq!(h, 540);
        assert_eq!(w, 270);
    }

    #[test]
    fn test_aspect_fit_wide_logo_takes_box_width() {
        let (w, h) = aspect_fit(400, 200, 540, 540);
        assert_eq!(w, 540);
        assert_eq!(h, 270);
    }

    #[test]
    fn test_aspect_fit_square_logo_fills_box() {
        assert_eq!(aspect_fit(100, 100, 540, 540), (540, 540));
    }

    #[test]
    fn test_aspect_fit_preserves_ratio() {
        let (w0, h0) = (321, 87);
        let (w, h) = aspect_fit(w0, h0, 540, 540);
        let src_ratio = w0 as f32 / h0 as f32;
        let fit_ratio = w as f32 / h as f32;
        assert!((src_ratio - fit_ratio).abs() / src_ratio < 0.02);
    }

    #[test]
    fn test_staged_path_keyed_by_ticket_id() {
        let assets = AssetPaths::default();
        assert_eq!(
            assets.staged_path("ABC123"),
            PathBuf::from("img/generated-tickets/ABC123.png")
        );
    }

    #[test]
    fn test_logo_path_keyed_by_slug() {
        let assets = AssetPaths::default();
        assert_eq!(assets.logo_path("annie"), PathBuf::from("img/logos/annie.png"));
    }

    #[test]
    fn test_missing_template_aborts_render() {
        let assets = AssetPaths {
            template: PathBuf::from("/nonexistent/template.png"),
            ..AssetPaths::default()
        };
        let ticket = TicketRecord {
            show: "Annie".into(),
            date_time: "Fri 7:30PM".into(),
            name: "Jane Doe".into(),
            ticket_type: None,
            is_subscriber: false,
            section: "CTR".into(),
            row: "A".into(),
            seat: "5".into(),
            ticket_id: "ABC123".into(),
        };
        let err = compose_ticket(&assets, &FontBook::empty(), &ticket).unwrap_err();
        assert!(matches!(err, BoletoError::Asset(_)));
    }

    #[test]
    fn test_canvas_matches_default_ticket_stock() {
        // 5.5in × 2in at 300 dpi.
        assert_eq!((TICKET_WIDTH, TICKET_HEIGHT), (1650, 600));
    }
}
