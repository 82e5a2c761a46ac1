use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    config::DisplayMode,
    figure::{Point, Size},
    Result,
};

/// A normalised key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub character: char,
    pub is_letter: bool,
    pub is_number: bool,
}

impl KeyEvent {
    /// Classifies a character the way the OS layer would.
    pub fn from_char(character: char) -> Self {
        Self {
            character,
            is_letter: character.is_alphabetic(),
            is_number: character.is_numeric(),
        }
    }

    pub fn is_letter_or_digit(&self) -> bool {
        self.is_letter || self.is_number
    }

    pub fn is_printable(&self) -> bool {
        !self.character.is_control()
    }
}

/// Pointer motion on a specific surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub position: Point,
    pub surface: usize,
    pub is_dragging: bool,
}

/// Everything the session controller reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Key(KeyEvent),
    Pointer(PointerEvent),
    DragEnded,
    Scroll {
        delta_y: f64,
    },
    SurfaceResized {
        surface: usize,
        size: Size,
    },
    TopologyChanged,
    DisplayModeChanged {
        mode: DisplayMode,
        selected_index: usize,
    },
}

/// Delivery point for normalised events. Returns `false` once the receiving
/// session is gone so capture backends can wind down.
#[derive(Clone)]
pub struct EventSink {
    deliver: Arc<dyn Fn(SessionEvent) -> bool + Send + Sync>,
}

impl EventSink {
    pub fn new(deliver: impl Fn(SessionEvent) -> bool + Send + Sync + 'static) -> Self {
        Self {
            deliver: Arc::new(deliver),
        }
    }

    /// A sink that drops everything.
    pub fn discard() -> Self {
        Self::new(|_| false)
    }

    pub fn send(&self, event: SessionEvent) -> bool {
        (self.deliver)(event)
    }
}

impl fmt::Debug for EventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink").finish()
    }
}

/// OS keyboard/mouse capture feeding an [`EventSink`].
pub trait InputCapture: Send {
    fn start(&mut self, sink: EventSink) -> Result<()>;
    fn stop(&mut self);
}

/// Suppresses system shortcuts (app switching, menus) while a session runs.
pub trait KeyBlocker: Send {
    /// Fails when the OS refuses permission.
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self);
    fn is_active(&self) -> bool;
}

/// Capture backend for hosts that push events into the session themselves.
#[derive(Debug, Default)]
pub struct ManualCapture {
    sink: Option<EventSink>,
}

impl ManualCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sink handed over by the session, while capture is running.
    pub fn sink(&self) -> Option<&EventSink> {
        self.sink.as_ref()
    }
}

impl InputCapture for ManualCapture {
    fn start(&mut self, sink: EventSink) -> Result<()> {
        self.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        self.sink = None;
    }
}

/// Key blocker for platforms without a system hook.
#[derive(Debug, Default)]
pub struct NoKeyBlocker {
    active: bool,
}

impl KeyBlocker for NoKeyBlocker {
    fn start(&mut self) -> Result<()> {
        self.active = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
