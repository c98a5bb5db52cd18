//! Fixed-interval frame scheduling for the terminal loop.

use std::time::{Duration, Instant};

use cybermatrix_core::{FrameRequest, Scheduler};

/// Hands out one frame request at a time, due one interval after it was made.
#[derive(Debug)]
pub struct FrameClock {
    interval: Duration,
    next_id: u64,
    pending: Option<(FrameRequest, Instant)>,
}

impl FrameClock {
    /// Clock ticking at `fps` frames per second (at least one).
    pub fn new(fps: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / fps.max(1),
            next_id: 0,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// How long the host may wait for input before the next frame is due.
    pub fn time_until_due(&self, now: Instant) -> Duration {
        match self.pending {
            Some((_, due)) => due.saturating_duration_since(now),
            None => self.interval,
        }
    }

    /// Take the pending request if it has come due.
    pub fn take_due(&mut self, now: Instant) -> Option<FrameRequest> {
        match self.pending {
            Some((request, due)) if due <= now => {
                self.pending = None;
                Some(request)
            }
            _ => None,
        }
    }
}

impl Scheduler for FrameClock {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id += 1;
        let request = FrameRequest(self.next_id);
        self.pending = Some((request, Instant::now() + self.interval));
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if matches!(self.pending, Some((pending, _)) if pending == request) {
            self.pending = None;
        }
    }
}
