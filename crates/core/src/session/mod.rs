//! The session controller: turns normalised input into figure and trail
//! mutations and fires feedback at the collaborators.
//!
//! [`SessionController`] is a plain single-owner state machine. Time is passed
//! in by the caller, which keeps it deterministic under test. The threaded
//! [`runtime`] wraps it so input and fade ticks are serialised through one
//! channel.

pub mod runtime;
#[cfg(test)]
pub(crate) mod testing;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    audio::{Feedback, Laughter, Sound, Utterance},
    config::{SessionConfig, SoundMode},
    drawing::DrawingBoard,
    figure::{AnimationStyle, Figure, FigureId, FigureKind, FigureStyle},
    input::{EventSink, InputCapture, KeyBlocker, KeyEvent, PointerEvent, SessionEvent},
    placement::{pick_surface, random_position, SurfaceTopology, TopologyProvider},
    store::{EntityStore, StoreSnapshot},
    theme::ThemeProvider,
    words::WordDetector,
};

pub use runtime::{SessionHandle, SessionMessage};

const MIN_FIGURE_SIZE: f64 = 120.0;
const MAX_FIGURE_SIZE: f64 = 260.0;

/// External systems the controller talks to.
pub struct Collaborators {
    pub feedback: Box<dyn Feedback>,
    pub words: Box<dyn WordDetector>,
    pub theme: Box<dyn ThemeProvider>,
    pub key_blocker: Box<dyn KeyBlocker>,
    pub capture: Box<dyn InputCapture>,
    pub topology: Box<dyn TopologyProvider>,
}

type Listener = Box<dyn FnMut(&StoreSnapshot) + Send>;

pub struct SessionController {
    config: SessionConfig,
    store: EntityStore,
    drawing: DrawingBoard,
    surfaces: SurfaceTopology,
    collaborators: Collaborators,
    listeners: Vec<Listener>,
    rng: StdRng,
    next_id: u64,
    running: bool,
}

impl SessionController {
    pub fn new(config: SessionConfig, collaborators: Collaborators) -> Self {
        Self::with_rng(config, collaborators, StdRng::from_entropy())
    }

    pub fn with_seed(config: SessionConfig, collaborators: Collaborators, seed: u64) -> Self {
        Self::with_rng(config, collaborators, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SessionConfig, collaborators: Collaborators, rng: StdRng) -> Self {
        let config = config.normalized();
        let mut surfaces = SurfaceTopology::new();
        surfaces.refresh(
            config.display_mode,
            config.selected_display_index,
            collaborators.topology.as_ref(),
        );

        Self {
            store: EntityStore::new(config.max_figures),
            drawing: DrawingBoard::new(),
            surfaces,
            collaborators,
            listeners: Vec::new(),
            rng,
            next_id: 0,
            running: false,
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn surfaces(&self) -> &SurfaceTopology {
        &self.surfaces
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.snapshot()
    }

    /// Registers a callback invoked with a fresh snapshot after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreSnapshot) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Starts input capture and, if configured, system key blocking.
    pub fn start(&mut self, sink: EventSink) {
        if self.running {
            return;
        }

        if let Err(err) = self.collaborators.capture.start(sink) {
            tracing::warn!(%err, "input capture failed to start");
        }
        if self.config.block_system_keys {
            self.start_key_blocking();
        }
        self.running = true;
        tracing::info!(
            surfaces = self.surfaces.surface_count(),
            blocking = self.collaborators.key_blocker.is_active(),
            "session started"
        );
    }

    /// Stops input capture and key blocking. The fade timer is owned by the
    /// runtime and must be cancelled before this runs.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }

        self.collaborators.capture.stop();
        if self.collaborators.key_blocker.is_active() {
            self.collaborators.key_blocker.stop();
        }
        self.running = false;
        tracing::info!(figures = self.store.len(), "session stopped");
    }

    fn start_key_blocking(&mut self) {
        if let Err(err) = self.collaborators.key_blocker.start() {
            tracing::warn!(%err, "system key blocking unavailable, continuing without it");
        }
    }

    /// Applies a configuration change mid-session.
    pub fn apply_config(&mut self, config: SessionConfig) {
        let config = config.normalized();
        if self.running && config.block_system_keys != self.config.block_system_keys {
            if config.block_system_keys {
                self.start_key_blocking();
            } else if self.collaborators.key_blocker.is_active() {
                self.collaborators.key_blocker.stop();
            }
        }

        let topology_changed = config.display_mode != self.config.display_mode
            || config.selected_display_index != self.config.selected_display_index;
        self.config = config;
        self.store.set_max_figures(self.config.max_figures);
        if topology_changed {
            self.refresh_surfaces();
        }
        self.notify();
    }

    pub fn handle_event(&mut self, event: SessionEvent, now: f64) {
        match event {
            SessionEvent::Key(key) => self.handle_key(key, now),
            SessionEvent::Pointer(pointer) => self.handle_pointer(pointer, now),
            SessionEvent::DragEnded => {
                if self.drawing.end_drawing() {
                    self.publish_trails();
                }
            }
            SessionEvent::Scroll { delta_y } => self.handle_scroll(delta_y),
            SessionEvent::SurfaceResized { surface, size } => {
                self.surfaces.record_size(surface, size);
            }
            SessionEvent::TopologyChanged => {
                self.refresh_surfaces();
                if self.drawing.retain_surfaces(self.surfaces.surface_count()) {
                    self.publish_trails();
                }
            }
            SessionEvent::DisplayModeChanged {
                mode,
                selected_index,
            } => {
                self.config.display_mode = mode;
                self.config.selected_display_index = selected_index;
                self.refresh_surfaces();
            }
        }
    }

    /// Runs one fade sweep if fading is enabled.
    pub fn on_fade_tick(&mut self, now: f64) {
        if !self.config.fade_enabled {
            return;
        }
        self.store.age_step(now, self.config.fade_after);
        self.notify();
    }

    fn handle_key(&mut self, key: KeyEvent, now: f64) {
        if key.is_letter_or_digit() {
            self.spawn_character(key, now);
        } else if key.is_printable() {
            self.spawn_shape(now);
        } else {
            tracing::trace!(character = ?key.character, "ignoring non-printable key");
            return;
        }

        if let Some(word) = self.collaborators.words.push(key.character) {
            tracing::debug!(%word, "word completed");
            if self.config.sound_mode != SoundMode::Off {
                self.collaborators.feedback.speak(Utterance::Word(word));
            }
        }
    }

    fn spawn_character(&mut self, key: KeyEvent, now: f64) {
        let glyph = if self.config.force_uppercase {
            uppercase(key.character)
        } else {
            key.character
        };

        let style = self.random_style(false);
        self.spawn(FigureKind::Character(glyph), style, now);

        match self.config.sound_mode {
            SoundMode::Laughter => self.laugh(),
            SoundMode::Speech => self.collaborators.feedback.speak(Utterance::Letter(glyph)),
            SoundMode::Off => {}
        }

    }

    fn spawn_shape(&mut self, now: f64) {
        let shape = self.collaborators.theme.pick_shape();
        let show_face = self.collaborators.theme.supports_faces() && self.config.show_faces;
        let style = self.random_style(show_face);
        let color = style.color;
        self.spawn(FigureKind::Shape(shape), style, now);

        match self.config.sound_mode {
            SoundMode::Laughter => self.laugh(),
            SoundMode::Speech => self
                .collaborators
                .feedback
                .speak(Utterance::ShapeAndColor { shape, color }),
            SoundMode::Off => {}
        }
    }

    fn random_style(&mut self, show_face: bool) -> FigureStyle {
        FigureStyle {
            color: self.collaborators.theme.pick_color(),
            size: self.rng.gen_range(MIN_FIGURE_SIZE..=MAX_FIGURE_SIZE),
            animation: AnimationStyle::ALL[self.rng.gen_range(0..AnimationStyle::ALL.len())],
            font: self.collaborators.theme.pick_font(),
            show_face,
        }
    }

    fn spawn(&mut self, kind: FigureKind, style: FigureStyle, now: f64) {
        let surface = pick_surface(self.surfaces.eligible(), &mut self.rng);
        let position = random_position(self.surfaces.size_of(surface), &mut self.rng);
        let id = FigureId(self.next_id);
        self.next_id += 1;

        tracing::debug!(?id, ?kind, surface, "figure spawned");
        self.store
            .add_figure(Figure::new(id, kind, style, surface, position, now));
        self.notify();
    }

    fn laugh(&mut self) {
        let laughter = Laughter::random(&mut self.rng);
        self.collaborators.feedback.play(Sound::Laughter(laughter));
    }

    fn handle_pointer(&mut self, pointer: PointerEvent, now: f64) {
        if !self.config.mouse_draw_enabled {
            return;
        }
        if !(pointer.is_dragging || self.config.clickless_mouse_draw) {
            return;
        }

        if self
            .drawing
            .record_point(pointer.surface, pointer.position, now)
        {
            self.publish_trails();
        }
    }

    fn handle_scroll(&mut self, delta_y: f64) {
        if self.config.sound_mode == SoundMode::Off {
            return;
        }
        if delta_y > 0.0 {
            self.collaborators.feedback.play(Sound::Rising);
        } else if delta_y < 0.0 {
            self.collaborators.feedback.play(Sound::Falling);
        }
    }

    fn refresh_surfaces(&mut self) {
        self.surfaces.refresh(
            self.config.display_mode,
            self.config.selected_display_index,
            self.collaborators.topology.as_ref(),
        );
    }

    fn publish_trails(&mut self) {
        self.store.set_trails(self.drawing.trails().to_vec());
        self.notify();
    }

    fn notify(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let snapshot = self.store.snapshot();
        for listener in &mut self.listeners {
            listener(&snapshot);
        }
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("config", &self.config)
            .field("figures", &self.store.len())
            .field("trails", &self.store.trails().len())
            .field("eligible_surfaces", &self.surfaces.eligible())
            .field("listeners", &self.listeners.len())
            .field("running", &self.running)
            .finish()
    }
}

/// Uppercases a glyph unless that would expand it into several characters.
fn uppercase(character: char) -> char {
    let mut upper = character.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => character,
    }
}
