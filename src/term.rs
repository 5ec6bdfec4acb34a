use std::io::{BufWriter, Stdout, Write};

use slotmap::SlotMap;

use crate::color::Rgb;
use crate::display::{Surface, TextId, TextLayer, Transform};

/// The simulation runs on a fixed-height virtual canvas so its tuning is
/// independent of terminal size; everything scales uniformly into cells.
const VIRT_HEIGHT: f32 = 900.0;
/// Halo reach around a glowing particle, virtual px.
const GLOW_REACH: f32 = 14.0;
const GLOW_STRENGTH: f32 = 0.35;

struct TextEntry {
    text: String,
    anchor: (f32, f32),
    opacity: f32,
    transform: Transform,
}

/// Terminal implementation of both display traits: a persistent truecolor
/// pixel buffer rendered as half-block cells (each terminal row carries two
/// pixel rows), with retained text entries composited on top. The buffer is
/// never cleared between frames; the per-frame `fade` call is what ages old
/// light into trails.
pub struct TermDisplay {
    cols: usize,
    pixel_rows: usize,
    scale: f32,
    virt_w: f32,
    buf: Vec<[f32; 3]>,
    texts: SlotMap<TextId, TextEntry>,
    out: Vec<u8>,
    bg: Rgb,
}

fn channels(color: Rgb) -> [f32; 3] {
    [color.r as f32, color.g as f32, color.b as f32]
}

impl TermDisplay {
    pub fn new(cols: u16, rows: u16, bg: Rgb) -> Self {
        let cols = (cols as usize).max(1);
        let pixel_rows = (rows as usize).max(1) * 2;
        let scale = pixel_rows as f32 / VIRT_HEIGHT;
        Self {
            cols,
            pixel_rows,
            scale,
            virt_w: cols as f32 / scale,
            buf: vec![channels(bg); cols * pixel_rows],
            texts: SlotMap::with_key(),
            out: Vec::with_capacity(cols * pixel_rows * 25),
            bg,
        }
    }

    fn blend(&mut self, px: usize, py: usize, color: [f32; 3], alpha: f32) {
        let cell = &mut self.buf[py * self.cols + px];
        for c in 0..3 {
            cell[c] += (color[c] - cell[c]) * alpha;
        }
    }

    /// Visits every cell within `radius` cells of the mapped center, with the
    /// normalized distance to it.
    fn for_disc(&mut self, x: f32, y: f32, radius: f32, mut apply: impl FnMut(&mut Self, usize, usize, f32)) {
        let cx = x * self.scale;
        let cy = y * self.scale;
        // 0.75 ≥ the half-diagonal of a cell, so even sub-cell discs land on
        // their nearest cell center
        let cr = radius.max(0.75);

        let x0 = (cx - cr).floor().max(0.0) as usize;
        let x1 = ((cx + cr).ceil() as usize).min(self.cols.saturating_sub(1));
        let y0 = (cy - cr).floor().max(0.0) as usize;
        let y1 = ((cy + cr).ceil() as usize).min(self.pixel_rows.saturating_sub(1));
        if cx + cr < 0.0 || cy + cr < 0.0 {
            return;
        }

        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                if d <= cr {
                    apply(&mut *self, px, py, d / cr);
                }
            }
        }
    }

    /// Writes the pixel buffer and the text layer to the terminal.
    pub fn render(&mut self, stdout: &mut BufWriter<Stdout>) -> std::io::Result<()> {
        self.out.clear();
        self.out.extend_from_slice(b"\x1b[H");

        let mut prev_top: Option<Rgb> = None;
        let mut prev_bot: Option<Rgb> = None;

        for y in (0..self.pixel_rows).step_by(2) {
            for x in 0..self.cols {
                let top = quantize(self.buf[y * self.cols + x]);
                let bot = if y + 1 < self.pixel_rows {
                    quantize(self.buf[(y + 1) * self.cols + x])
                } else {
                    top
                };

                if prev_top != Some(top) {
                    write!(self.out, "\x1b[48;2;{};{};{}m", top.r, top.g, top.b)?;
                    prev_top = Some(top);
                }
                if prev_bot != Some(bot) {
                    write!(self.out, "\x1b[38;2;{};{};{}m", bot.r, bot.g, bot.b)?;
                    prev_bot = Some(bot);
                }
                self.out.extend_from_slice("▄".as_bytes());
            }
            self.out.extend_from_slice(b"\x1b[0m");
            prev_top = None;
            prev_bot = None;
            if y + 2 < self.pixel_rows {
                self.out.extend_from_slice(b"\r\n");
            }
        }

        self.render_texts()?;

        stdout.write_all(&self.out)?;
        stdout.flush()
    }

    fn render_texts(&mut self) -> std::io::Result<()> {
        let rows = self.pixel_rows / 2;
        let bg = channels(self.bg);

        for entry in self.texts.values() {
            if entry.opacity < 0.02 {
                continue;
            }
            // glyphs cannot rotate or scale in a cell grid; position and
            // opacity carry the motion
            let cx = (entry.anchor.0 + entry.transform.tx) * self.scale;
            let cy = (entry.anchor.1 + entry.transform.ty) * self.scale;
            let row = (cy / 2.0).round() as isize + 1;
            if row < 1 || row > rows as isize {
                continue;
            }

            let chars: Vec<char> = entry.text.chars().collect();
            let start = cx.round() as isize - chars.len() as isize / 2;
            let a = entry.opacity.clamp(0.0, 1.0);
            let fg = Rgb::new(
                (bg[0] + (255.0 - bg[0]) * a) as u8,
                (bg[1] + (255.0 - bg[1]) * a) as u8,
                (bg[2] + (255.0 - bg[2]) * a) as u8,
            );

            for (i, ch) in chars.iter().enumerate() {
                let col = start + i as isize + 1;
                if col < 1 || col > self.cols as isize {
                    continue;
                }
                write!(
                    self.out,
                    "\x1b[{row};{col}H\x1b[38;2;{};{};{}m{ch}",
                    fg.r, fg.g, fg.b
                )?;
            }
        }
        self.out.extend_from_slice(b"\x1b[0m");
        Ok(())
    }
}

fn quantize(cell: [f32; 3]) -> Rgb {
    Rgb::new(
        cell[0].clamp(0.0, 255.0) as u8,
        cell[1].clamp(0.0, 255.0) as u8,
        cell[2].clamp(0.0, 255.0) as u8,
    )
}

impl Surface for TermDisplay {
    fn width(&self) -> f32 {
        self.virt_w
    }

    fn height(&self) -> f32 {
        VIRT_HEIGHT
    }

    fn fade(&mut self, color: Rgb, alpha: f32) {
        let target = channels(color);
        for cell in &mut self.buf {
            for c in 0..3 {
                cell[c] += (target[c] - cell[c]) * alpha;
            }
        }
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32) {
        let src = channels(color);
        let cr = radius * self.scale;
        self.for_disc(x, y, cr, |s, px, py, _| s.blend(px, py, src, alpha));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, alpha: f32) {
        let src = channels(color);
        let x0 = (x * self.scale).floor().max(0.0) as usize;
        let y0 = (y * self.scale).floor().max(0.0) as usize;
        if x0 >= self.cols || y0 >= self.pixel_rows || x + w < 0.0 || y + h < 0.0 {
            return;
        }
        let x1 = (((x + w) * self.scale).ceil() as usize).clamp(x0 + 1, self.cols);
        let y1 = (((y + h) * self.scale).ceil() as usize).clamp(y0 + 1, self.pixel_rows);

        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, src, alpha);
            }
        }
    }

    fn glow(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32) {
        let src = channels(color);
        let halo = (radius + GLOW_REACH) * self.scale;
        self.for_disc(x, y, halo, |s, px, py, t| {
            let falloff = (1.0 - t) * (1.0 - t);
            s.blend(px, py, src, alpha * GLOW_STRENGTH * falloff);
        });
    }
}

impl TextLayer for TermDisplay {
    fn create(&mut self, text: &str, anchor_x: f32, anchor_y: f32) -> TextId {
        self.texts.insert(TextEntry {
            text: text.to_string(),
            anchor: (anchor_x, anchor_y),
            opacity: 1.0,
            transform: Transform::default(),
        })
    }

    fn set_opacity(&mut self, id: TextId, opacity: f32) {
        if let Some(entry) = self.texts.get_mut(id) {
            entry.opacity = opacity;
        }
    }

    fn set_transform(&mut self, id: TextId, transform: Transform) {
        if let Some(entry) = self.texts.get_mut(id) {
            entry.transform = transform;
        }
    }

    fn remove(&mut self, id: TextId) {
        self.texts.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display() -> TermDisplay {
        TermDisplay::new(120, 30, Rgb::new(3, 4, 8))
    }

    #[test]
    fn virtual_canvas_keeps_cell_aspect() {
        let d = display();
        assert_eq!(d.height(), 900.0);
        // 120 cols over 60 pixel rows at scale 60/900
        assert!((d.width() - 1800.0).abs() < 1e-3);
    }

    #[test]
    fn circle_lands_on_the_mapped_cell() {
        let mut d = display();
        d.fill_circle(900.0, 450.0, 10.0, Rgb::new(255, 0, 0), 1.0);
        // center of the virtual canvas is the center cell
        let cell = d.buf[30 * d.cols + 60];
        assert_eq!(cell[0], 255.0);
        assert_eq!(cell[1], 0.0);
        // a far corner is untouched
        assert_eq!(d.buf[0], channels(Rgb::new(3, 4, 8)));
    }

    #[test]
    fn fade_pulls_cells_toward_the_target() {
        let mut d = display();
        d.fill_circle(900.0, 450.0, 10.0, Rgb::new(255, 255, 255), 1.0);
        let before = d.buf[30 * d.cols + 60][0];
        d.fade(Rgb::new(0, 0, 0), 0.22);
        let after = d.buf[30 * d.cols + 60][0];
        assert!(after < before);
        assert!((after - before * 0.78).abs() < 0.1);
    }

    #[test]
    fn offscreen_draws_are_ignored() {
        let mut d = display();
        let snapshot = d.buf.clone();
        d.fill_circle(-500.0, -500.0, 5.0, Rgb::new(255, 255, 255), 1.0);
        d.fill_rect(5000.0, 5000.0, 10.0, 10.0, Rgb::new(255, 255, 255), 1.0);
        assert_eq!(d.buf, snapshot);
    }

    #[test]
    fn stale_text_ids_are_ignored() {
        let mut d = display();
        let id = d.create("hey", 100.0, 100.0);
        d.remove(id);
        d.set_opacity(id, 0.5);
        d.set_transform(id, Transform::default());
        assert!(d.texts.is_empty());
    }
}
