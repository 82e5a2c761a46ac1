//! Terminal stand-ins for the platform collaborators.

use std::{
    io::BufRead,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::Sender,
        Arc,
    },
};

use smashpad_core::{
    EventSink, InputCapture, KeyEvent, SessionEvent, Sound, SoundPlayer, Speaker, Utterance,
};

pub struct LoggingPlayer;

impl SoundPlayer for LoggingPlayer {
    fn play(&mut self, sound: Sound) -> smashpad_core::Result<()> {
        tracing::info!(sound = sound.id(), "play");
        Ok(())
    }
}

pub struct LoggingSpeaker;

impl Speaker for LoggingSpeaker {
    fn speak(&mut self, utterance: &Utterance) -> smashpad_core::Result<()> {
        tracing::info!(text = %utterance.text(), "say");
        Ok(())
    }
}

/// Reads stdin on a background thread and turns each character into a key
/// press. Signals `done` when stdin closes.
pub struct StdinCapture {
    done: Option<Sender<()>>,
    stopped: Arc<AtomicBool>,
}

impl StdinCapture {
    pub fn new(done: Sender<()>) -> Self {
        Self {
            done: Some(done),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl InputCapture for StdinCapture {
    fn start(&mut self, sink: EventSink) -> smashpad_core::Result<()> {
        let done = self.done.take();
        let stopped = self.stopped.clone();

        std::thread::Builder::new()
            .name("smashpad-stdin".to_string())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    let Ok(line) = line else { break };
                    if stopped.load(Ordering::SeqCst) {
                        break;
                    }
                    let delivered = line
                        .chars()
                        .all(|ch| sink.send(SessionEvent::Key(KeyEvent::from_char(ch))));
                    if !delivered {
                        break;
                    }
                }
                if let Some(done) = done {
                    let _ = done.send(());
                }
            })?;
        Ok(())
    }

    fn stop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}
