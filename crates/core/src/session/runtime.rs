use std::{
    sync::mpsc::{channel, Receiver, Sender},
    thread::JoinHandle,
    time::Duration,
};

use super::SessionController;
use crate::{
    config::SessionConfig,
    input::{EventSink, SessionEvent},
    store::StoreSnapshot,
    timeline::{FadeScheduler, SessionClock, FADE_TICK_INTERVAL},
    Result, SmashError,
};

/// Everything the control thread processes, in arrival order.
pub enum SessionMessage {
    Event(SessionEvent),
    FadeTick,
    UpdateConfig(SessionConfig),
    Snapshot(Sender<StoreSnapshot>),
    Stop,
}

/// Owner of a running session.
///
/// The controller lives on a dedicated control thread. Input capture and the
/// fade timer only send messages to it, so session state has a single writer.
#[derive(Debug)]
pub struct SessionHandle {
    tx: Sender<SessionMessage>,
    control: Option<JoinHandle<SessionController>>,
    fade: FadeScheduler,
    clock: SessionClock,
}

impl SessionHandle {
    pub fn spawn(controller: SessionController) -> Result<Self> {
        Self::spawn_with_interval(controller, FADE_TICK_INTERVAL)
    }

    /// Same as [`SessionHandle::spawn`] with a custom fade cadence.
    pub fn spawn_with_interval(controller: SessionController, interval: Duration) -> Result<Self> {
        let (tx, rx) = channel::<SessionMessage>();
        let clock = SessionClock::start();

        let sink_tx = tx.clone();
        let sink = EventSink::new(move |event| sink_tx.send(SessionMessage::Event(event)).is_ok());

        let control = std::thread::Builder::new()
            .name("smashpad-session".to_string())
            .spawn(move || run_control_loop(controller, rx, sink, clock))?;

        let fade_tx = tx.clone();
        let fade = FadeScheduler::spawn(interval, move || {
            fade_tx.send(SessionMessage::FadeTick).is_ok()
        });

        Ok(Self {
            tx,
            control: Some(control),
            fade,
            clock,
        })
    }

    pub fn clock(&self) -> SessionClock {
        self.clock
    }

    /// A sink that feeds this session, for external input producers.
    pub fn sink(&self) -> EventSink {
        let tx = self.tx.clone();
        EventSink::new(move |event| tx.send(SessionMessage::Event(event)).is_ok())
    }

    pub fn send(&self, event: SessionEvent) -> Result<()> {
        self.post(SessionMessage::Event(event))
    }

    pub fn update_config(&self, config: SessionConfig) -> Result<()> {
        self.post(SessionMessage::UpdateConfig(config))
    }

    /// Snapshot taken after every message sent before this call.
    pub fn snapshot(&self) -> Result<StoreSnapshot> {
        let (reply_tx, reply_rx) = channel();
        self.post(SessionMessage::Snapshot(reply_tx))?;
        reply_rx.recv().map_err(|_| SmashError::SessionStopped)
    }

    /// Cancels the fade timer, stops the controller and hands it back.
    /// Messages queued behind the stop request are discarded.
    pub fn stop(mut self) -> Result<SessionController> {
        self.shutdown().ok_or(SmashError::SessionStopped)
    }

    fn post(&self, message: SessionMessage) -> Result<()> {
        self.tx
            .send(message)
            .map_err(|_| SmashError::SessionStopped)
    }

    fn shutdown(&mut self) -> Option<SessionController> {
        let control = self.control.take()?;
        self.fade.cancel();
        let _ = self.tx.send(SessionMessage::Stop);
        match control.join() {
            Ok(controller) => Some(controller),
            Err(_) => {
                tracing::error!("session control thread panicked");
                None
            }
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_control_loop(
    mut controller: SessionController,
    rx: Receiver<SessionMessage>,
    sink: EventSink,
    clock: SessionClock,
) -> SessionController {
    controller.start(sink);

    while let Ok(message) = rx.recv() {
        match message {
            SessionMessage::Event(event) => controller.handle_event(event, clock.now_seconds()),
            SessionMessage::FadeTick => controller.on_fade_tick(clock.now_seconds()),
            SessionMessage::UpdateConfig(config) => controller.apply_config(config),
            SessionMessage::Snapshot(reply) => {
                let _ = reply.send(controller.snapshot());
            }
            SessionMessage::Stop => break,
        }
    }

    controller.stop();
    controller
}
