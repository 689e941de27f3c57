use crate::surface::SurfaceSize;
use crate::ui::Rect;

pub type Color = [u8; 4];

// A tiny 3x5 block font (no external deps). Kept deliberately simple.
pub const DEFAULT_TEXT_SCALE: u32 = 2;
const GLYPH_W: u32 = 3;
const GLYPH_H: u32 = 5;

fn glyph_advance_x(scale: u32) -> u32 {
    (GLYPH_W + 1) * scale.max(1)
}

fn line_advance_y(scale: u32) -> u32 {
    (GLYPH_H + 1) * scale.max(1)
}

/// Pixel width of `text` at `scale`, for centering. Only the widest line of
/// a multi-line string counts.
pub fn text_width(text: &str, scale: u32) -> u32 {
    let adv = glyph_advance_x(scale);
    text.lines()
        .map(|line| (line.chars().count() as u32).saturating_mul(adv))
        .max()
        .unwrap_or(0)
        .saturating_sub(scale.max(1)) // no trailing gap after the last glyph
}

pub fn text_height(text: &str, scale: u32) -> u32 {
    let lines = text.lines().count().max(1) as u32;
    lines * line_advance_y(scale) - scale.max(1)
}

/// 2D drawing interface.
///
/// Game code only talks to this trait; whether the pixels land in a window
/// or in an offscreen test buffer is the surface's business.
pub trait Renderer2d {
    fn begin_frame(&mut self, size: SurfaceSize);
    fn size(&self) -> SurfaceSize;

    /// Opaque fill.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Alpha-blended rect over existing content.
    fn blend_rect(&mut self, rect: Rect, color: Color, alpha: u8);

    fn rect_outline(&mut self, rect: Rect, color: Color);

    /// Filled circle, center in signed pixel coordinates (may be partially
    /// or fully off-surface).
    fn fill_disc(&mut self, cx: i32, cy: i32, radius: u32, color: Color);

    /// Alpha-blended filled circle.
    fn blend_disc(&mut self, cx: i32, cy: i32, radius: u32, color: Color, alpha: u8);

    /// Thick line with round caps, endpoints in float pixel coordinates.
    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: u32, color: Color);

    fn draw_text_scaled(&mut self, x: u32, y: u32, text: &str, color: Color, scale: u32);

    fn draw_text(&mut self, x: u32, y: u32, text: &str, color: Color) {
        self.draw_text_scaled(x, y, text, color, DEFAULT_TEXT_SCALE);
    }

    fn clear(&mut self, color: Color) {
        let s = self.size();
        self.fill_rect(Rect::from_size(s.width, s.height), color);
    }
}

/// CPU renderer that draws into an RGBA frame buffer.
pub struct CpuRenderer<'a> {
    frame: &'a mut [u8],
    size: SurfaceSize,
}

impl<'a> CpuRenderer<'a> {
    pub fn new(frame: &'a mut [u8], size: SurfaceSize) -> Self {
        Self { frame, size }
    }

    fn put_px(&mut self, x: i32, y: i32, color: Color) {
        let Some(idx) = self.px_index(x, y) else {
            return;
        };
        self.frame[idx..idx + 4].copy_from_slice(&color);
    }

    fn blend_px(&mut self, x: i32, y: i32, color: Color, alpha: u8) {
        if alpha == 255 {
            self.put_px(x, y, color);
            return;
        }
        let Some(idx) = self.px_index(x, y) else {
            return;
        };
        let a = alpha as u32;
        let inv = 255 - a;
        let px = &mut self.frame[idx..idx + 4];
        px[0] = ((px[0] as u32 * inv + color[0] as u32 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u32 * inv + color[1] as u32 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u32 * inv + color[2] as u32 * a + 127) / 255) as u8;
        px[3] = 255;
    }

    fn px_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let idx = (y as usize * self.size.width as usize + x as usize) * 4;
        if idx + 4 > self.frame.len() {
            return None;
        }
        Some(idx)
    }

    fn disc_rows(cx: i32, cy: i32, radius: u32) -> impl Iterator<Item = (i32, i32, i32)> {
        let r = radius as i32;
        (-r..=r).map(move |dy| {
            let half = (((r * r - dy * dy) as f32).sqrt()).floor() as i32;
            (cy + dy, cx - half, cx + half)
        })
    }
}

impl Renderer2d for CpuRenderer<'_> {
    fn begin_frame(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let x1 = rect.x.saturating_add(rect.w).min(self.size.width);
        let y1 = rect.y.saturating_add(rect.h).min(self.size.height);
        for y in rect.y..y1 {
            for x in rect.x..x1 {
                self.put_px(x as i32, y as i32, color);
            }
        }
    }

    fn blend_rect(&mut self, rect: Rect, color: Color, alpha: u8) {
        if alpha == 0 {
            return;
        }
        let x1 = rect.x.saturating_add(rect.w).min(self.size.width);
        let y1 = rect.y.saturating_add(rect.h).min(self.size.height);
        for y in rect.y..y1 {
            for x in rect.x..x1 {
                self.blend_px(x as i32, y as i32, color, alpha);
            }
        }
    }

    fn rect_outline(&mut self, rect: Rect, color: Color) {
        if rect.w == 0 || rect.h == 0 {
            return;
        }
        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, 1), color);
        if rect.h > 1 {
            self.fill_rect(Rect::new(rect.x, rect.y + rect.h - 1, rect.w, 1), color);
        }
        self.fill_rect(Rect::new(rect.x, rect.y, 1, rect.h), color);
        if rect.w > 1 {
            self.fill_rect(Rect::new(rect.x + rect.w - 1, rect.y, 1, rect.h), color);
        }
    }

    fn fill_disc(&mut self, cx: i32, cy: i32, radius: u32, color: Color) {
        for (y, x0, x1) in Self::disc_rows(cx, cy, radius) {
            for x in x0..=x1 {
                self.put_px(x, y, color);
            }
        }
    }

    fn blend_disc(&mut self, cx: i32, cy: i32, radius: u32, color: Color, alpha: u8) {
        if alpha == 0 {
            return;
        }
        for (y, x0, x1) in Self::disc_rows(cx, cy, radius) {
            for x in x0..=x1 {
                self.blend_px(x, y, color, alpha);
            }
        }
    }

    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: u32, color: Color) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs()).ceil() as u32;
        let radius = width.max(1) / 2;
        if steps == 0 {
            self.fill_disc(x0.round() as i32, y0.round() as i32, radius, color);
            return;
        }
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = (x0 + dx * t).round() as i32;
            let y = (y0 + dy * t).round() as i32;
            self.fill_disc(x, y, radius, color);
        }
    }

    fn draw_text_scaled(&mut self, x: u32, y: u32, text: &str, color: Color, scale: u32) {
        let scale = scale.max(1);
        let adv_x = glyph_advance_x(scale);
        let adv_y = line_advance_y(scale);

        let mut cursor_x = x;
        let mut cursor_y = y;

        for ch in text.chars() {
            match ch {
                '\n' => {
                    cursor_x = x;
                    cursor_y = cursor_y.saturating_add(adv_y);
                    if cursor_y >= self.size.height {
                        break;
                    }
                    continue;
                }
                ' ' => {
                    cursor_x = cursor_x.saturating_add(adv_x);
                    continue;
                }
                _ => {}
            }

            if let Some(rows) = glyph(ch) {
                for (row_idx, row) in rows.iter().enumerate() {
                    for col in 0..GLYPH_W {
                        if row & (0b100 >> col) == 0 {
                            continue;
                        }
                        let px = cursor_x + col * scale;
                        let py = cursor_y + row_idx as u32 * scale;
                        self.fill_rect(Rect::new(px, py, scale, scale), color);
                    }
                }
            }

            cursor_x = cursor_x.saturating_add(adv_x);
            if cursor_x >= self.size.width {
                break;
            }
        }
    }
}

/// Glyph rows, 3 bits each, top to bottom. Unknown characters render as a
/// blank cell rather than failing.
fn glyph(ch: char) -> Option<[u8; 5]> {
    let rows = match ch.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b111, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b111, 0b001, 0b011, 0b000, 0b010],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        _ => return None,
    };
    Some(rows)
}
