//! Core library for Smashpad, a full-screen keyboard toy for small children.
//!
//! The crate holds the session state engine: it turns normalised key and
//! pointer input into short-lived on-screen figures and drawing trails, fades
//! and evicts them, and spreads them across every display in use. Input
//! capture, playback, theming and window management stay behind traits so a
//! front end can plug in its own platform code.

pub mod audio;
pub mod config;
pub mod drawing;
pub mod error;
pub mod figure;
pub mod input;
pub mod placement;
pub mod record;
pub mod session;
pub mod store;
pub mod theme;
pub mod timeline;
pub mod words;

pub use audio::{Feedback, FeedbackDispatcher, Laughter, Sound, SoundPlayer, Speaker, Utterance};
pub use config::{DisplayMode, SessionConfig, SoundMode};
pub use drawing::{DrawingBoard, DrawingTrail};
pub use error::{Result, SmashError};
pub use figure::{
    AnimationStyle, Figure, FigureId, FigureKind, FigureStyle, NamedColor, Point, ShapeKind, Size,
};
pub use input::{
    EventSink, InputCapture, KeyBlocker, KeyEvent, ManualCapture, NoKeyBlocker, PointerEvent,
    SessionEvent,
};
pub use placement::{
    random_position, resolve_target, StaticTopology, SurfaceInfo, SurfaceTopology,
    TopologyProvider,
};
pub use record::{EventScript, ScriptedEvent};
pub use session::{Collaborators, SessionController, SessionHandle, SessionMessage};
pub use store::{EntityStore, StoreSnapshot};
pub use theme::{Palette, PaletteSettings, ThemeProvider};
pub use timeline::{FadeScheduler, SessionClock};
pub use words::{WordDetector, WordList};
