use std::{
    sync::mpsc::{channel, Sender},
    thread::JoinHandle,
};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    figure::{NamedColor, ShapeKind},
    Result,
};

/// The bundled laughter clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Laughter {
    Giggle,
    BabyLaugh,
    BabyGiggle,
    CcGiggle,
    LaughingMice,
}

impl Laughter {
    pub const ALL: [Laughter; 5] = [
        Laughter::Giggle,
        Laughter::BabyLaugh,
        Laughter::BabyGiggle,
        Laughter::CcGiggle,
        Laughter::LaughingMice,
    ];

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Sound effects the playback collaborator knows by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sound {
    Laughter(Laughter),
    Rising,
    Falling,
}

impl Sound {
    /// Resource name of the clip.
    pub fn id(self) -> &'static str {
        match self {
            Sound::Laughter(Laughter::Giggle) => "giggle",
            Sound::Laughter(Laughter::BabyLaugh) => "babylaugh",
            Sound::Laughter(Laughter::BabyGiggle) => "babygigl2",
            Sound::Laughter(Laughter::CcGiggle) => "ccgiggle",
            Sound::Laughter(Laughter::LaughingMice) => "laughingmice",
            Sound::Rising => "rising",
            Sound::Falling => "falling",
        }
    }
}

/// Something for the speech collaborator to say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Utterance {
    Letter(char),
    Word(String),
    ShapeAndColor { shape: ShapeKind, color: NamedColor },
}

impl Utterance {
    pub fn text(&self) -> String {
        match self {
            Utterance::Letter(ch) => ch.to_string(),
            Utterance::Word(word) => word.clone(),
            Utterance::ShapeAndColor { shape, color } => {
                format!("{} {}", color.name(), shape.name())
            }
        }
    }
}

/// Plays sound clips by identifier.
pub trait SoundPlayer: Send {
    fn play(&mut self, sound: Sound) -> Result<()>;
}

/// Speaks text aloud.
pub trait Speaker: Send {
    fn speak(&mut self, utterance: &Utterance) -> Result<()>;
}

/// Fire-and-forget feedback used by the session controller. Implementations
/// must return immediately.
pub trait Feedback: Send {
    fn play(&self, sound: Sound);
    fn speak(&self, utterance: Utterance);
}

#[derive(Debug)]
enum FeedbackRequest {
    Play(Sound),
    Speak(Utterance),
}

/// Runs playback and speech on a worker thread so slow or failing backends
/// never stall event processing. Backend errors are logged and dropped.
#[derive(Debug)]
pub struct FeedbackDispatcher {
    tx: Option<Sender<FeedbackRequest>>,
    worker: Option<JoinHandle<()>>,
}

impl FeedbackDispatcher {
    pub fn spawn(mut player: Box<dyn SoundPlayer>, mut speaker: Box<dyn Speaker>) -> Self {
        let (tx, rx) = channel::<FeedbackRequest>();
        let worker = std::thread::Builder::new()
            .name("smashpad-feedback".to_string())
            .spawn(move || {
                while let Ok(request) = rx.recv() {
                    let outcome = match &request {
                        FeedbackRequest::Play(sound) => player.play(*sound),
                        FeedbackRequest::Speak(utterance) => speaker.speak(utterance),
                    };
                    if let Err(err) = outcome {
                        tracing::warn!(?request, %err, "feedback playback failed");
                    }
                }
            });

        match worker {
            Ok(worker) => Self {
                tx: Some(tx),
                worker: Some(worker),
            },
            Err(err) => {
                tracing::warn!(%err, "feedback worker unavailable, running silent");
                Self {
                    tx: None,
                    worker: None,
                }
            }
        }
    }

    fn submit(&self, request: FeedbackRequest) {
        if let Some(tx) = &self.tx {
            if tx.send(request).is_err() {
                tracing::warn!("feedback worker has exited");
            }
        }
    }

    /// Lets queued requests drain, then waits for the worker to exit.
    pub fn shutdown(mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("feedback worker panicked");
            }
        }
    }
}

impl Feedback for FeedbackDispatcher {
    fn play(&self, sound: Sound) {
        self.submit(FeedbackRequest::Play(sound));
    }

    fn speak(&self, utterance: Utterance) {
        self.submit(FeedbackRequest::Speak(utterance));
    }
}

impl Drop for FeedbackDispatcher {
    fn drop(&mut self) {
        // Detach: a clip still playing must not block teardown.
        self.tx.take();
        self.worker.take();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::SmashError;

    #[derive(Clone, Default)]
    struct Log(Arc<Mutex<Vec<String>>>);

    impl SoundPlayer for Log {
        fn play(&mut self, sound: Sound) -> Result<()> {
            if sound == Sound::Falling {
                return Err(SmashError::collaborator("player", "device busy"));
            }
            self.0.lock().unwrap().push(sound.id().to_string());
            Ok(())
        }
    }

    impl Speaker for Log {
        fn speak(&mut self, utterance: &Utterance) -> Result<()> {
            self.0.lock().unwrap().push(utterance.text());
            Ok(())
        }
    }

    #[test]
    fn dispatcher_runs_requests_in_order_and_swallows_failures() {
        let log = Log::default();
        let dispatcher = FeedbackDispatcher::spawn(Box::new(log.clone()), Box::new(log.clone()));

        dispatcher.play(Sound::Rising);
        dispatcher.play(Sound::Falling);
        dispatcher.speak(Utterance::ShapeAndColor {
            shape: ShapeKind::Star,
            color: NamedColor::Blue,
        });
        dispatcher.speak(Utterance::Word("cat".to_string()));
        dispatcher.shutdown();

        assert_eq!(
            *log.0.lock().unwrap(),
            vec!["rising", "blue star", "cat"]
        );
    }

    #[test]
    fn laughter_selection_covers_every_clip() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(Laughter::random(&mut rng));
        }
        assert_eq!(seen.len(), Laughter::ALL.len());
    }
}
