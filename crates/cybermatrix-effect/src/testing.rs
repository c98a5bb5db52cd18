//! Stub host capabilities for unit tests.

use cybermatrix_core::{
    Container, FrameRequest, Glow, Paint, Point, Rgba, Scheduler, Stroke, Surface, SurfaceSpec,
    TextStyle, Viewport,
};
use rand::{SeedableRng, rngs::StdRng};

pub fn seeded() -> StdRng {
    StdRng::seed_from_u64(0x5eed)
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Resize(Viewport),
    Clear,
    Line {
        from: Point,
        to: Point,
        paint: Paint,
        alpha: f32,
        width: f32,
    },
    Rect {
        origin: Point,
        width: f32,
        height: f32,
        color: Rgba,
    },
    Text {
        glyph: char,
        at: Point,
        color: Rgba,
        glow: Option<Glow>,
    },
}

/// Records draw calls made since the last clear.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub id: String,
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn lines(&self) -> Vec<&DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Line { .. }))
            .collect()
    }

    pub fn texts(&self) -> Vec<&DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Text { .. }))
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, viewport: Viewport) {
        self.ops.push(DrawOp::Resize(viewport));
    }

    fn clear(&mut self, _viewport: Viewport) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear);
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            paint: stroke.paint.clone(),
            alpha: stroke.alpha,
            width: stroke.width,
        });
    }

    fn fill_rect(&mut self, origin: Point, width: f32, height: f32, color: Rgba) {
        self.ops.push(DrawOp::Rect {
            origin,
            width,
            height,
            color,
        });
    }

    fn fill_text(&mut self, glyph: char, at: Point, style: &TextStyle<'_>) {
        self.ops.push(DrawOp::Text {
            glyph,
            at,
            color: style.color,
            glow: style.glow,
        });
    }
}

/// Scheduler whose frames fire only when a test says so.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pub pending: Vec<FrameRequest>,
    pub cancelled: Vec<FrameRequest>,
}

impl ManualScheduler {
    /// Pop the oldest pending request, as if its frame came due.
    pub fn fire(&mut self) -> Option<FrameRequest> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id += 1;
        let request = FrameRequest(self.next_id);
        self.pending.push(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.pending.retain(|r| *r != request);
        self.cancelled.push(request);
    }
}

/// Container holding child ids in document order.
#[derive(Debug)]
pub struct MemoryContainer {
    pub viewport: Viewport,
    pub children: Vec<String>,
}

impl MemoryContainer {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            children: vec!["content".to_string()],
        }
    }

    pub fn has_surface(&self) -> bool {
        self.children.iter().any(|c| c != "content")
    }
}

impl Container for MemoryContainer {
    type Surface = RecordingSurface;

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn attach(&mut self, spec: &SurfaceSpec<'_>) -> RecordingSurface {
        self.children.insert(0, spec.id.to_string());
        RecordingSurface {
            id: spec.id.to_string(),
            ops: Vec::new(),
        }
    }

    fn detach(&mut self, surface: RecordingSurface) {
        self.children.retain(|c| *c != surface.id);
    }
}
