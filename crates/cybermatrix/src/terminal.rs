//! Terminal host for the effect.
//!
//! Every terminal cell stands for a [`CELL_WIDTH`] x [`CELL_HEIGHT`] box of
//! virtual pixels. Text lands in the cell under its anchor, lines are walked
//! cell by cell, and the CSS background gradient becomes a diagonal backdrop.

use cybermatrix_core::{
    Container, Paint, Point, Rgba, Stroke, Surface, SurfaceSpec, TextAlign, TextBaseline,
    TextStyle, Viewport,
    color::{css_color_stops, sample_stops},
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use tracing::debug;

/// Virtual pixels per terminal column.
pub const CELL_WIDTH: f32 = 10.0;
/// Virtual pixels per terminal row. Matches the rain glyph stride.
pub const CELL_HEIGHT: f32 = 15.0;

/// Ink fainter than this is not worth a cell.
const MIN_VISIBLE_ALPHA: f32 = 0.02;
/// Glow at least this strong renders bold.
const BOLD_GLOW_BLUR: f32 = 10.0;
const BACKDROP_FALLBACK: Rgba = Rgba::rgb(10, 10, 10);
const PACKET_GLYPH: char = '▪';

/// Pixel viewport covered by a terminal of `cols` x `rows`.
pub fn viewport_for(cols: u16, rows: u16) -> Viewport {
    Viewport::new(cols as f32 * CELL_WIDTH, rows as f32 * CELL_HEIGHT)
}

/// Center of the cell at `(col, row)` in virtual pixels.
pub fn cell_center(col: u16, row: u16) -> Point {
    Point::new(
        (col as f32 + 0.5) * CELL_WIDTH,
        (row as f32 + 0.5) * CELL_HEIGHT,
    )
}

fn to_color(color: Rgba) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Strokes sit under text in the same cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Layer {
    Stroke,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Ink {
    glyph: char,
    color: Rgba,
    layer: Layer,
    bold: bool,
}

/// Cell grid the effect draws into.
#[derive(Debug)]
pub struct TerminalSurface {
    cols: u16,
    rows: u16,
    cells: Vec<Option<Ink>>,
    /// Background gradient stops, top-left to bottom-right.
    backdrop: Vec<Rgba>,
}

impl TerminalSurface {
    /// Empty surface over the given CSS background.
    pub fn new(background: &str) -> Self {
        Self {
            cols: 0,
            rows: 0,
            cells: Vec::new(),
            backdrop: css_color_stops(background),
        }
    }

    /// Size in cells.
    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Glyph currently inked at `(col, row)`.
    pub fn glyph_at(&self, col: u16, row: u16) -> Option<char> {
        self.ink_at(col, row).map(|ink| ink.glyph)
    }

    fn ink_at(&self, col: u16, row: u16) -> Option<Ink> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells[self.index(col, row)]
    }

    fn index(&self, col: u16, row: u16) -> usize {
        row as usize * self.cols as usize + col as usize
    }

    /// Backdrop color under a cell, following a 135 degree gradient.
    pub fn backdrop_at(&self, col: u16, row: u16) -> Rgba {
        let fx = col as f32 / self.cols.max(1) as f32;
        let fy = row as f32 / self.rows.max(1) as f32;
        sample_stops(&self.backdrop, (fx + fy) / 2.0).unwrap_or(BACKDROP_FALLBACK)
    }

    fn cell_at(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if !(x.is_finite() && y.is_finite()) || x < 0.0 || y < 0.0 {
            return None;
        }
        let col = (x / CELL_WIDTH).floor();
        let row = (y / CELL_HEIGHT).floor();
        if col >= self.cols as f32 || row >= self.rows as f32 {
            return None;
        }
        Some((col as u16, row as u16))
    }

    /// Ink a cell. Text always wins over strokes; between strokes the more
    /// opaque one stays.
    fn put(&mut self, col: u16, row: u16, ink: Ink) {
        if ink.color.a < MIN_VISIBLE_ALPHA {
            return;
        }
        let index = self.index(col, row);
        let keep_existing = match self.cells[index] {
            Some(existing) if existing.layer > ink.layer => true,
            Some(existing) if existing.layer == Layer::Stroke && ink.layer == Layer::Stroke => {
                existing.color.a > ink.color.a
            }
            _ => false,
        };
        if !keep_existing {
            self.cells[index] = Some(ink);
        }
    }
}

/// Box-drawing glyph for a segment running `dc` columns by `dr` rows.
fn line_glyph(dc: f32, dr: f32, thin: bool) -> char {
    let (adc, adr) = (dc.abs(), dr.abs());
    if adc < f32::EPSILON && adr < f32::EPSILON {
        '·'
    } else if adr <= adc * 0.5 {
        if thin { '╌' } else { '─' }
    } else if adc <= adr * 0.5 {
        if thin { '╎' } else { '│' }
    } else if (dc > 0.0) == (dr > 0.0) {
        '╲'
    } else {
        '╱'
    }
}

impl Surface for TerminalSurface {
    fn resize(&mut self, viewport: Viewport) {
        self.cols = (viewport.width / CELL_WIDTH).floor().clamp(0.0, u16::MAX as f32) as u16;
        self.rows = (viewport.height / CELL_HEIGHT).floor().clamp(0.0, u16::MAX as f32) as u16;
        self.cells = vec![None; self.cols as usize * self.rows as usize];
    }

    fn clear(&mut self, _viewport: Viewport) {
        self.cells.fill(None);
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        let dc = (to.x - from.x) / CELL_WIDTH;
        let dr = (to.y - from.y) / CELL_HEIGHT;
        let glyph = line_glyph(dc, dr, stroke.width < 1.0);
        let steps = dc.abs().max(dr.abs()).ceil().max(1.0) as usize;

        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = from.x + (to.x - from.x) * t;
            let y = from.y + (to.y - from.y) * t;
            let Some((col, row)) = self.cell_at(x, y) else {
                continue;
            };
            let color = match &stroke.paint {
                Paint::Solid(color) => *color,
                Paint::Linear(gradient) => gradient.color_at(t),
            };
            self.put(
                col,
                row,
                Ink {
                    glyph,
                    color: color.scale_alpha(stroke.alpha),
                    layer: Layer::Stroke,
                    bold: false,
                },
            );
        }
    }

    fn fill_rect(&mut self, origin: Point, width: f32, height: f32, color: Rgba) {
        // Rects here are packet marks, far smaller than a cell
        let Some((col, row)) = self.cell_at(origin.x + width / 2.0, origin.y + height / 2.0) else {
            return;
        };
        self.put(
            col,
            row,
            Ink {
                glyph: PACKET_GLYPH,
                color,
                layer: Layer::Text,
                bold: true,
            },
        );
    }

    fn fill_text(&mut self, glyph: char, at: Point, style: &TextStyle<'_>) {
        let x = match style.align {
            TextAlign::Center => at.x,
            TextAlign::Start => at.x + CELL_WIDTH / 2.0,
        };
        let y = match style.baseline {
            TextBaseline::Middle => at.y,
            TextBaseline::Alphabetic => at.y - CELL_HEIGHT / 2.0,
        };
        let Some((col, row)) = self.cell_at(x, y) else {
            return;
        };
        let bold = style.glow.is_some_and(|glow| glow.blur >= BOLD_GLOW_BLUR);
        self.put(
            col,
            row,
            Ink {
                glyph,
                color: style.color,
                layer: Layer::Text,
                bold,
            },
        );
    }
}

impl Widget for &TerminalSurface {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..self.rows.min(area.height) {
            for col in 0..self.cols.min(area.width) {
                let backdrop = self.backdrop_at(col, row);
                let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) else {
                    continue;
                };
                let mut style = Style::new().bg(to_color(backdrop));
                match self.ink_at(col, row) {
                    Some(ink) => {
                        style = style.fg(to_color(ink.color.over(backdrop)));
                        if ink.bold {
                            style = style.add_modifier(Modifier::BOLD);
                        }
                        cell.set_char(ink.glyph).set_style(style);
                    }
                    None => {
                        cell.set_char(' ').set_style(style);
                    }
                }
            }
        }
    }
}

/// The terminal window as a container for a single full-screen surface.
#[derive(Debug, Default)]
pub struct TerminalContainer;

impl Container for TerminalContainer {
    type Surface = TerminalSurface;

    fn viewport(&self) -> Viewport {
        match crossterm::terminal::size() {
            Ok((cols, rows)) if cols > 0 && rows > 0 => viewport_for(cols, rows),
            _ => viewport_for(80, 24),
        }
    }

    fn attach(&mut self, spec: &SurfaceSpec<'_>) -> TerminalSurface {
        debug!(id = spec.id, z_index = spec.z_index, "attaching terminal surface");
        TerminalSurface::new(spec.background)
    }

    fn detach(&mut self, surface: TerminalSurface) {
        let (cols, rows) = surface.size();
        debug!(cols, rows, "detaching terminal surface");
    }
}
