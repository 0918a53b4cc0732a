//! Styled QR rendering.
//!
//! Ticket ids become scannable codes drawn with rounded data modules and
//! rounded corner markers. Symbol version and error-correction level are
//! pinned rather than left to the library, so the same payload always
//! produces the same pixels; payloads that do not fit the fixed capacity
//! are rejected.

use image::{Rgba, RgbaImage, imageops};
use qrcode::{EcLevel, QrCode, Version};

use crate::error::BoletoError;
use crate::render::canvas::{BLACK, WHITE};

/// Fixed symbol version (33×33 modules, ~62 byte capacity at level M).
const QR_VERSION: Version = Version::Normal(4);
const QR_EC_LEVEL: EcLevel = EcLevel::M;

/// Quiet-zone width in modules on each side.
const QUIET_ZONE: u32 = 2;

/// Modules are rendered at this multiple of the target scale and then
/// resized down, which smooths the rounded corners.
const OVERSAMPLE: u32 = 2;

/// Visual options for the rendered code.
#[derive(Debug, Clone, Copy)]
pub struct QrStyle {
    pub dark: Rgba<u8>,
    pub light: Rgba<u8>,
    /// Corner radius of data modules as a fraction of the module size;
    /// 0.0 draws squares, 0.5 fully rounded dots.
    pub module_roundness: f32,
    /// Corner radius of the finder rings in modules.
    pub finder_roundness: f32,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            dark: BLACK,
            light: WHITE,
            module_roundness: 0.5,
            finder_roundness: 1.5,
        }
    }
}

/// Encode `payload` and render it styled at exactly `size`×`size` pixels.
pub fn encode_styled(payload: &str, size: u32, style: &QrStyle) -> Result<RgbaImage, BoletoError> {
    let code = QrCode::with_version(payload, QR_VERSION, QR_EC_LEVEL).map_err(|e| {
        BoletoError::Encoding(format!(
            "payload of {} bytes does not fit fixed QR parameters: {}",
            payload.len(),
            e
        ))
    })?;

    let img = render_modules(&code, style, size);
    if img.width() == size {
        Ok(img)
    } else {
        Ok(imageops::resize(&img, size, size, imageops::FilterType::Triangle))
    }
}

/// True for modules belonging to one of the three finder patterns.
fn in_finder(x: u32, y: u32, modules: u32) -> bool {
    (x < 7 && y < 7) || (x + 7 >= modules && y < 7) || (x < 7 && y + 7 >= modules)
}

fn is_dark(code: &QrCode, x: u32, y: u32) -> bool {
    code[(x as usize, y as usize)] == qrcode::Color::Dark
}

fn render_modules(code: &QrCode, style: &QrStyle, target: u32) -> RgbaImage {
    let modules = code.width() as u32;
    let total = modules + 2 * QUIET_ZONE;
    let module_px = ((target * OVERSAMPLE) / total).max(1);

    let mut img = RgbaImage::from_pixel(total * module_px, total * module_px, style.light);

    let radius = (module_px as f32 * style.module_roundness.clamp(0.0, 0.5)).round() as u32;

    for y in 0..modules {
        for x in 0..modules {
            if in_finder(x, y, modules) || !is_dark(code, x, y) {
                continue;
            }

            // Neighboring dark modules keep shared corners square so
            // runs merge into continuous blobs.
            let n = y > 0 && is_dark(code, x, y - 1);
            let s = y + 1 < modules && is_dark(code, x, y + 1);
            let w = x > 0 && is_dark(code, x - 1, y);
            let e = x + 1 < modules && is_dark(code, x + 1, y);

            let px = (x + QUIET_ZONE) * module_px;
            let py = (y + QUIET_ZONE) * module_px;
            fill_module(&mut img, px, py, module_px, radius, style, [n, e, s, w]);
        }
    }

    let finder_radius =
        ((module_px as f32 * style.finder_roundness).round() as u32).min(7 * module_px / 2);
    for (fx, fy) in [
        (0, 0),
        (modules - 7, 0),
        (0, modules - 7),
    ] {
        draw_finder(
            &mut img,
            (fx + QUIET_ZONE) * module_px,
            (fy + QUIET_ZONE) * module_px,
            module_px,
            finder_radius,
            style,
        );
    }

    img
}

/// Fill one data module, carving round corners only where no dark
/// neighbor touches that corner. Neighbors are [north, east, south, west].
fn fill_module(
    img: &mut RgbaImage,
    x0: u32,
    y0: u32,
    module_px: u32,
    radius: u32,
    style: &QrStyle,
    [n, e, s, w]: [bool; 4],
) {
    fill_rect(img, x0, y0, module_px, module_px, style.dark);
    if radius == 0 {
        return;
    }

    if !n && !w {
        carve_corner(img, x0, y0, radius, (-1, -1), style.light);
    }
    if !n && !e {
        carve_corner(img, x0 + module_px - radius, y0, radius, (1, -1), style.light);
    }
    if !s && !w {
        carve_corner(img, x0, y0 + module_px - radius, radius, (-1, 1), style.light);
    }
    if !s && !e {
        carve_corner(
            img,
            x0 + module_px - radius,
            y0 + module_px - radius,
            radius,
            (1, 1),
            style.light,
        );
    }
}

/// Restore the background outside a quarter-circle of the given radius.
/// `corner` picks the quadrant: (-1,-1) top-left through (1,1) bottom-right.
fn carve_corner(img: &mut RgbaImage, x0: u32, y0: u32, r: u32, corner: (i32, i32), light: Rgba<u8>) {
    let r_f = r as f32;
    // Half-pixel centered circle avoids jagged spikes at small radii.
    let center = r_f - 0.5;
    let threshold = (r_f - 0.25) * (r_f - 0.25);

    for dy in 0..r {
        for dx in 0..r {
            let lx = if corner.0 < 0 { dx as f32 } else { (r - 1 - dx) as f32 };
            let ly = if corner.1 < 0 { dy as f32 } else { (r - 1 - dy) as f32 };
            let ddx = lx - center;
            let ddy = ly - center;
            if ddx * ddx + ddy * ddy >= threshold {
                let px = x0 + dx;
                let py = y0 + dy;
                if px < img.width() && py < img.height() {
                    img.put_pixel(px, py, light);
                }
            }
        }
    }
}

/// Draw one finder pattern: a rounded 7×7 dark ring around a 5×5 light
/// hole with a rounded 3×3 dark center. The curvature of the hole
/// follows the ring, inset by one module.
fn draw_finder(img: &mut RgbaImage, x0: u32, y0: u32, module_px: u32, radius: u32, style: &QrStyle) {
    fill_rounded_rect(
        img,
        x0,
        y0,
        7 * module_px,
        7 * module_px,
        radius,
        style.dark,
        style.light,
    );

    let hole_r = radius.saturating_sub(module_px);
    fill_rounded_rect(
        img,
        x0 + module_px,
        y0 + module_px,
        5 * module_px,
        5 * module_px,
        hole_r,
        style.light,
        style.dark,
    );

    let center_r = radius.saturating_sub(module_px);
    fill_rounded_rect(
        img,
        x0 + 2 * module_px,
        y0 + 2 * module_px,
        3 * module_px,
        3 * module_px,
        center_r,
        style.dark,
        style.light,
    );
}

fn fill_rect(img: &mut RgbaImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgba<u8>) {
    for y in y0..(y0 + h).min(img.height()) {
        for x in x0..(x0 + w).min(img.width()) {
            img.put_pixel(x, y, color);
        }
    }
}

/// Fill a rectangle and round its corners by carving them back to the
/// `behind` color.
#[allow(clippy::too_many_arguments)]
fn fill_rounded_rect(
    img: &mut RgbaImage,
    x0: u32,
    y0: u32,
    w: u32,
    h: u32,
    r: u32,
    color: Rgba<u8>,
    behind: Rgba<u8>,
) {
    fill_rect(img, x0, y0, w, h, color);
    let r = r.min(w / 2).min(h / 2);
    if r == 0 {
        return;
    }
    carve_corner(img, x0, y0, r, (-1, -1), behind);
    carve_corner(img, x0 + w - r, y0, r, (1, -1), behind);
    carve_corner(img, x0, y0 + h - r, r, (-1, 1), behind);
    carve_corner(img, x0 + w - r, y0 + h - r, r, (1, 1), behind);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_is_requested_size() {
        let img = encode_styled("ABC123", 180, &QrStyle::default()).unwrap();
        assert_eq!(img.width(), 180);
        assert_eq!(img.height(), 180);
    }

    #[test]
    fn test_deterministic_across_calls() {
        let style = QrStyle::default();
        let a = encode_styled("1234567890", 180, &style).unwrap();
        let b = encode_styled("1234567890", 180, &style).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_payload_too_long_for_fixed_version() {
        let payload = "X".repeat(200);
        let err = encode_styled(&payload, 180, &QrStyle::default()).unwrap_err();
        assert!(matches!(err, BoletoError::Encoding(_)));
    }

    #[test]
    fn test_quiet_zone_is_light() {
        let img = encode_styled("ABC123", 180, &QrStyle::default()).unwrap();
        assert_eq!(*img.get_pixel(0, 0), WHITE);
        assert_eq!(*img.get_pixel(179, 179), WHITE);
    }

    #[test]
    fn test_contains_dark_modules() {
        let img = encode_styled("ABC123", 180, &QrStyle::default()).unwrap();
        assert!(img.pixels().any(|p| *p == BLACK));
    }

    #[test]
    fn test_rounding_changes_pixels() {
        let square = QrStyle {
            module_roundness: 0.0,
            finder_roundness: 0.0,
            ..QrStyle::default()
        };
        let rounded = QrStyle::default();
        let a = encode_styled("ABC123", 180, &square).unwrap();
        let b = encode_styled("ABC123", 180, &rounded).unwrap();
        assert_ne!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_finder_membership() {
        let n = 33;
        assert!(in_finder(0, 0, n));
        assert!(in_finder(6, 6, n));
        assert!(in_finder(32, 0, n));
        assert!(in_finder(0, 32, n));
        assert!(!in_finder(7, 7, n));
        assert!(!in_finder(32, 32, n));
        assert!(!in_finder(16, 16, n));
    }
}
