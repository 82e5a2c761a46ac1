//! Recording fakes for controller and runtime tests.

use std::sync::{Arc, Mutex};

use super::Collaborators;
use crate::{
    audio::{Feedback, Sound, Utterance},
    figure::Size,
    input::{EventSink, InputCapture, KeyBlocker},
    placement::{SurfaceInfo, TopologyProvider},
    theme::{Palette, PaletteSettings},
    words::WordList,
    Result, SmashError,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Play(Sound),
    Speak(Utterance),
    CaptureStart,
    CaptureStop,
    BlockStart,
    BlockDenied,
    BlockStop,
}

type Log = Arc<Mutex<Vec<Call>>>;

pub(crate) struct Fakes {
    log: Log,
    surfaces: Arc<Mutex<usize>>,
    deny_blocking: bool,
    faces: bool,
}

impl Fakes {
    pub(crate) fn new(surfaces: usize) -> Self {
        Self {
            log: Arc::default(),
            surfaces: Arc::new(Mutex::new(surfaces)),
            deny_blocking: false,
            faces: true,
        }
    }

    pub(crate) fn deny_blocking(mut self) -> Self {
        self.deny_blocking = true;
        self
    }

    pub(crate) fn without_faces(mut self) -> Self {
        self.faces = false;
        self
    }

    pub(crate) fn set_surfaces(&self, count: usize) {
        *self.surfaces.lock().unwrap() = count;
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.log.lock().unwrap().clone()
    }

    pub(crate) fn collaborators(&self) -> Collaborators {
        Collaborators {
            feedback: Box::new(RecordingFeedback(self.log.clone())),
            words: Box::new(WordList::default()),
            theme: Box::new(Palette::with_seed(
                PaletteSettings {
                    faces: self.faces,
                    ..PaletteSettings::default()
                },
                9,
            )),
            key_blocker: Box::new(RecordingBlocker {
                log: self.log.clone(),
                deny: self.deny_blocking,
                active: false,
            }),
            capture: Box::new(RecordingCapture {
                log: self.log.clone(),
                _sink: None,
            }),
            topology: Box::new(SharedTopology(self.surfaces.clone())),
        }
    }
}

struct RecordingFeedback(Log);

impl Feedback for RecordingFeedback {
    fn play(&self, sound: Sound) {
        self.0.lock().unwrap().push(Call::Play(sound));
    }

    fn speak(&self, utterance: Utterance) {
        self.0.lock().unwrap().push(Call::Speak(utterance));
    }
}

struct RecordingBlocker {
    log: Log,
    deny: bool,
    active: bool,
}

impl KeyBlocker for RecordingBlocker {
    fn start(&mut self) -> Result<()> {
        if self.deny {
            self.log.lock().unwrap().push(Call::BlockDenied);
            return Err(SmashError::collaborator(
                "key blocker",
                "accessibility permission missing",
            ));
        }
        self.log.lock().unwrap().push(Call::BlockStart);
        self.active = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.log.lock().unwrap().push(Call::BlockStop);
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

pub(crate) struct RecordingCapture {
    log: Log,
    _sink: Option<EventSink>,
}

impl InputCapture for RecordingCapture {
    fn start(&mut self, sink: EventSink) -> Result<()> {
        self.log.lock().unwrap().push(Call::CaptureStart);
        self._sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        self.log.lock().unwrap().push(Call::CaptureStop);
        self._sink = None;
    }
}

struct SharedTopology(Arc<Mutex<usize>>);

impl TopologyProvider for SharedTopology {
    fn active_surfaces(&self) -> Vec<SurfaceInfo> {
        let count = *self.0.lock().unwrap();
        (0..count)
            .map(|index| SurfaceInfo {
                index,
                size: Size::new(1920.0, 1080.0),
            })
            .collect()
    }
}
