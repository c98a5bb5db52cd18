//! Animation driver and surface lifecycle.

use cybermatrix_core::{
    Container, FrameRequest, HostEvent, PartialSettings, Point, Scheduler, Settings, Surface,
    SurfaceSpec, Viewport,
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, warn};

use crate::{
    animations::{
        connections, grid,
        particles::{self, Particle, Pointer},
        rain::{self, RainStream},
    },
    palette::Palette,
};

/// Element id given to the attached surface.
pub const SURFACE_ID: &str = "cyber-matrix-canvas";

/// Whether the per-frame callback chain is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// A frame has been requested and will tick when it comes due.
    Running(FrameRequest),
    /// No frame is outstanding.
    Stopped,
}

/// The background effect: owns its surface, fields and frame chain.
pub struct CyberMatrix<C: Container, S: Scheduler, R: Rng = StdRng> {
    settings: Settings,
    palette: Palette,
    container: C,
    scheduler: S,
    rng: R,
    /// Attached drawing surface, `None` before init and after destroy.
    surface: Option<C::Surface>,
    viewport: Viewport,
    particles: Vec<Particle>,
    drops: Vec<RainStream>,
    pointer: Pointer,
    /// Elapsed-time accumulator driving the glow pulse.
    time: f32,
    state: RunState,
}

impl<C: Container, S: Scheduler> CyberMatrix<C, S> {
    /// Create the effect, attaching and starting it when `auto_init` is on.
    pub fn new(container: C, scheduler: S, options: PartialSettings) -> Self {
        Self::with_rng(container, scheduler, options, StdRng::from_entropy())
    }
}

impl<C: Container, S: Scheduler, R: Rng> CyberMatrix<C, S, R> {
    /// Like [`CyberMatrix::new`] with an explicit random source.
    pub fn with_rng(container: C, scheduler: S, options: PartialSettings, rng: R) -> Self {
        let settings = Settings::resolve(options);
        let mut effect = Self {
            palette: Palette::from_settings(&settings),
            pointer: Pointer::new(settings.mouse_radius),
            settings,
            container,
            scheduler,
            rng,
            surface: None,
            viewport: Viewport::default(),
            particles: Vec::new(),
            drops: Vec::new(),
            time: 0.0,
            state: RunState::Stopped,
        };
        if effect.settings.auto_init {
            effect.init();
        }
        effect
    }

    /// Attach the surface, lay out for the current viewport and start.
    pub fn init(&mut self) -> &mut Self {
        if self.surface.is_none() {
            let spec = SurfaceSpec {
                id: SURFACE_ID,
                z_index: self.settings.z_index,
                background: &self.settings.background_gradient,
                pointer_events: false,
            };
            self.surface = Some(self.container.attach(&spec));
            debug!(id = SURFACE_ID, "surface attached");
        }
        let viewport = self.container.viewport();
        self.layout(viewport);
        self.start()
    }

    /// Resize the surface and regenerate the particle grid and rain.
    pub fn layout(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(viewport);
        }

        if self.settings.particle_distance <= 0.0 {
            warn!(
                particle_distance = self.settings.particle_distance,
                "non-positive particle distance, grid left empty"
            );
        }
        self.particles = particles::init_particles(viewport, &self.settings, &mut self.rng);
        self.drops = if self.settings.show_matrix_rain {
            rain::init_streams(viewport, &self.settings, &mut self.rng)
        } else {
            Vec::new()
        };

        debug!(
            width = viewport.width,
            height = viewport.height,
            particles = self.particles.len(),
            streams = self.drops.len(),
            "layout regenerated"
        );
    }

    /// Start the frame chain. Does nothing if already running, and stays
    /// stopped while no surface is attached.
    pub fn start(&mut self) -> &mut Self {
        if self.state == RunState::Stopped && self.tick() {
            self.state = RunState::Running(self.scheduler.request_frame());
            debug!("animation started");
        }
        self
    }

    /// Cancel the outstanding frame request.
    pub fn stop(&mut self) -> &mut Self {
        if let RunState::Running(request) = self.state {
            self.scheduler.cancel_frame(request);
            self.state = RunState::Stopped;
            debug!("animation stopped");
        }
        self
    }

    /// Stop and remove the surface from the container. Safe to repeat.
    pub fn destroy(&mut self) -> &mut Self {
        self.stop();
        if let Some(surface) = self.surface.take() {
            self.container.detach(surface);
            debug!(id = SURFACE_ID, "surface detached");
        }
        self
    }

    /// Merge `options` over the current settings and rebuild the layout.
    pub fn update_config(&mut self, options: PartialSettings) -> &mut Self {
        self.settings.merge(options);
        self.palette = Palette::from_settings(&self.settings);
        self.pointer.radius = self.settings.mouse_radius;
        debug!("settings updated");
        let viewport = self.container.viewport();
        self.layout(viewport);
        self
    }

    /// Scheduler callback. Requests other than the outstanding one are stale
    /// and ignored.
    pub fn on_frame(&mut self, request: FrameRequest) {
        if self.state != RunState::Running(request) {
            return;
        }
        self.state = if self.tick() {
            RunState::Running(self.scheduler.request_frame())
        } else {
            RunState::Stopped
        };
    }

    /// Apply a host notification.
    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::PointerMove { x, y } => self.pointer.position = Some(Point::new(x, y)),
            HostEvent::PointerLeave => self.pointer.position = None,
            HostEvent::Resize(viewport) => self.layout(viewport),
        }
    }

    /// One update-and-draw pass: grid, rain, particles, then connections.
    /// Returns false, drawing nothing, when no surface is attached.
    fn tick(&mut self) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            warn!("tick without an attached surface, frame chain not scheduled");
            return false;
        };
        let viewport = self.viewport;
        let settings = &self.settings;
        let palette = &self.palette;

        surface.clear(viewport);
        self.time += settings.animation_speed;

        if settings.show_grid {
            grid::draw(surface, viewport, settings, palette);
        }

        if settings.show_matrix_rain {
            for stream in &mut self.drops {
                stream.update(viewport.height, settings, &mut self.rng);
                stream.draw(surface, settings, palette);
            }
        }

        for particle in &mut self.particles {
            particle.update(&self.pointer, self.time, settings, &mut self.rng);
            particle.draw(surface, settings, palette);
        }

        if settings.show_connections {
            connections::draw(surface, &self.particles, settings, palette, &mut self.rng);
        }
        true
    }

    /// Current resolved settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Particles in lattice order, row by row.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Rain streams, one per lane. Empty while rain is disabled.
    pub fn drops(&self) -> &[RainStream] {
        &self.drops
    }

    /// Last known pointer position and interaction radius.
    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    /// Viewport used by the last layout.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Accumulated animation time.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Current run state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// True while a frame request is outstanding.
    pub fn is_running(&self) -> bool {
        matches!(self.state, RunState::Running(_))
    }

    /// The attached surface, if any.
    pub fn surface(&self) -> Option<&C::Surface> {
        self.surface.as_ref()
    }

    /// The hosting container.
    pub fn container(&self) -> &C {
        &self.container
    }

    /// The frame scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// The frame scheduler, mutably. Hosts use this to collect due frames.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DrawOp, ManualScheduler, MemoryContainer, RecordingSurface, seeded};

    type TestEffect = CyberMatrix<MemoryContainer, ManualScheduler, StdRng>;

    fn effect(width: f32, height: f32, options: PartialSettings) -> TestEffect {
        CyberMatrix::with_rng(
            MemoryContainer::new(width, height),
            ManualScheduler::default(),
            options,
            seeded(),
        )
    }

    fn quiet() -> PartialSettings {
        PartialSettings {
            particle_distance: Some(60.0),
            show_matrix_rain: Some(false),
            show_connections: Some(false),
            ..Default::default()
        }
    }

    fn surface(effect: &TestEffect) -> &RecordingSurface {
        effect.surface().expect("surface attached")
    }

    #[test]
    fn test_scenario_grid_and_destroy() {
        let mut effect = effect(600.0, 600.0, quiet());
        assert!(effect.is_running());
        assert_eq!(effect.particles().len(), 100);
        assert!(effect.drops().is_empty());
        assert_eq!(effect.particles()[0].rest(), Point::new(30.0, 30.0));
        assert_eq!(effect.container().children[0], SURFACE_ID);

        effect.destroy();
        assert!(!effect.is_running());
        assert!(effect.surface().is_none());
        assert!(!effect.container().has_surface());

        // Idempotent
        effect.destroy();
        assert!(!effect.container().has_surface());
    }

    #[test]
    fn test_manual_init() {
        let mut effect = effect(
            300.0,
            200.0,
            PartialSettings {
                auto_init: Some(false),
                ..Default::default()
            },
        );
        assert!(!effect.is_running());
        assert!(effect.surface().is_none());
        assert!(effect.particles().is_empty());

        effect.init();
        assert!(effect.is_running());
        assert!(effect.container().has_surface());
        assert_eq!(effect.particles().len(), 15);
        assert_eq!(effect.drops().len(), 15);
    }

    #[test]
    fn test_start_is_noop_when_running() {
        let mut effect = effect(600.0, 600.0, quiet());
        let time = effect.time();
        effect.start();
        assert_eq!(effect.scheduler().pending.len(), 1);
        assert_eq!(effect.time(), time);
    }

    #[test]
    fn test_frames_advance_time_and_reschedule() {
        let mut effect = effect(600.0, 600.0, quiet());
        assert!((effect.time() - 0.01).abs() < 1e-6);

        let request = effect.scheduler_mut().fire().unwrap();
        effect.on_frame(request);
        assert!((effect.time() - 0.02).abs() < 1e-6);
        assert_eq!(effect.scheduler().pending.len(), 1);
        assert_ne!(effect.state(), RunState::Running(request));

        // Replaying an old request is ignored
        effect.on_frame(request);
        assert!((effect.time() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_stop_cancels_pending_frame() {
        let mut effect = effect(600.0, 600.0, quiet());
        let RunState::Running(request) = effect.state() else {
            panic!("expected running");
        };
        effect.stop();
        assert_eq!(effect.state(), RunState::Stopped);
        assert!(effect.scheduler().pending.is_empty());
        assert_eq!(effect.scheduler().cancelled, vec![request]);

        let time = effect.time();
        effect.on_frame(request);
        assert_eq!(effect.time(), time);

        effect.stop();
        assert_eq!(effect.scheduler().cancelled.len(), 1);

        effect.start();
        assert!(effect.is_running());
        assert!(effect.time() > time);
    }

    #[test]
    fn test_tick_draw_order() {
        let effect = effect(
            200.0,
            200.0,
            PartialSettings {
                particle_distance: Some(60.0),
                data_packet_chance: Some(0.0),
                ..Default::default()
            },
        );
        let ops = &surface(&effect).ops;
        assert_eq!(ops[0], DrawOp::Clear);

        let grid_lines = 8; // 4 verticals, 4 horizontals
        assert!(
            ops[1..=grid_lines]
                .iter()
                .all(|op| matches!(op, DrawOp::Line { width, .. } if *width == 0.5))
        );

        let rain_glyphs: usize = effect.drops().iter().map(RainStream::len).sum();
        let rain_end = 1 + grid_lines + rain_glyphs;
        assert!(
            ops[grid_lines + 1..rain_end]
                .iter()
                .all(|op| matches!(op, DrawOp::Text { .. }))
        );

        let particle_end = rain_end + effect.particles().len();
        assert!(
            ops[rain_end..particle_end]
                .iter()
                .all(|op| matches!(op, DrawOp::Text { glow: Some(_), .. }))
        );
        // 3x3 lattice at spacing 60: 12 orthogonal neighbor links
        let connections = &ops[particle_end..];
        assert_eq!(connections.len(), 12);
        assert!(
            connections
                .iter()
                .all(|op| matches!(op, DrawOp::Line { width, .. } if *width == 1.0))
        );
    }

    #[test]
    fn test_disabled_layers_are_skipped() {
        let effect = effect(
            600.0,
            600.0,
            PartialSettings {
                show_grid: Some(false),
                ..quiet()
            },
        );
        let ops = &surface(&effect).ops;
        assert_eq!(ops.len(), 1 + 100);
        assert!(ops[1..].iter().all(|op| matches!(op, DrawOp::Text { .. })));
    }

    #[test]
    fn test_resize_regenerates_identically() {
        let mut effect = effect(600.0, 600.0, quiet());
        effect.handle_event(HostEvent::Resize(Viewport::new(480.0, 300.0)));
        let first: Vec<Point> = effect.particles().iter().map(Particle::rest).collect();
        effect.handle_event(HostEvent::Resize(Viewport::new(480.0, 300.0)));
        let second: Vec<Point> = effect.particles().iter().map(Particle::rest).collect();
        assert_eq!(first.len(), 8 * 5);
        assert_eq!(first, second);
        assert_eq!(effect.viewport(), Viewport::new(480.0, 300.0));
        assert!(surface(&effect)
            .ops
            .contains(&DrawOp::Resize(Viewport::new(480.0, 300.0))));
    }

    #[test]
    fn test_pointer_events() {
        let mut effect = effect(600.0, 600.0, quiet());
        effect.handle_event(HostEvent::PointerMove { x: 30.0, y: 30.0 });
        assert_eq!(effect.pointer().position, Some(Point::new(30.0, 30.0)));

        let request = effect.scheduler_mut().fire().unwrap();
        effect.on_frame(request);
        assert!(effect.particles()[0].is_hovered());

        effect.handle_event(HostEvent::PointerLeave);
        assert_eq!(effect.pointer().position, None);
        let request = effect.scheduler_mut().fire().unwrap();
        effect.on_frame(request);
        assert!(effect.particles().iter().all(|p| !p.is_hovered()));
    }

    #[test]
    fn test_update_config() {
        let mut effect = effect(600.0, 600.0, PartialSettings::default());
        assert!(!effect.drops().is_empty());

        effect.update_config(PartialSettings {
            mouse_radius: Some(42.0),
            show_matrix_rain: Some(false),
            particle_distance: Some(100.0),
            ..Default::default()
        });
        assert_eq!(effect.pointer().radius, 42.0);
        assert!(effect.drops().is_empty());
        assert_eq!(effect.particles().len(), 36);
        assert_eq!(effect.settings().particle_distance, 100.0);
        // Options not mentioned survive the merge
        assert!(effect.settings().show_grid);
    }

    #[test]
    fn test_tick_without_surface_draws_nothing() {
        let mut effect = effect(
            600.0,
            600.0,
            PartialSettings {
                auto_init: Some(false),
                ..Default::default()
            },
        );
        effect.start();
        assert_eq!(effect.time(), 0.0);
        assert!(!effect.is_running());
        assert!(effect.scheduler().pending.is_empty());

        // Attaching later starts normally
        effect.init();
        assert!(effect.is_running());
        assert_eq!(effect.scheduler().pending.len(), 1);
    }
}
