use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{input::SessionEvent, session::SessionController, Result, SmashError};

/// Interval between synthesised fade ticks during replay, in seconds.
const REPLAY_TICK_SECONDS: f64 = 1.0;

/// Latest session time a script may reference.
const MAX_SCRIPT_SECONDS: f64 = 1.0e9;

/// An input event stamped with session time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedEvent {
    pub at: f64,
    pub event: SessionEvent,
}

/// A recorded (or hand-written) sequence of input for deterministic replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventScript {
    pub events: Vec<ScriptedEvent>,
    /// Seconds to keep ticking after the last event.
    #[serde(default)]
    pub settle: f64,
}

impl EventScript {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let mut script: Self = serde_json::from_str(raw)?;
        script.validate()?;
        script
            .events
            .sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(script)
    }

    pub fn validate(&self) -> Result<()> {
        let in_range = |seconds: f64| (0.0..=MAX_SCRIPT_SECONDS).contains(&seconds);
        if !self.events.iter().all(|scripted| in_range(scripted.at)) {
            return Err(SmashError::InvalidConfig(
                "event times must be between zero and 1e9 seconds",
            ));
        }
        if !in_range(self.settle) {
            return Err(SmashError::InvalidConfig(
                "settle must be between zero and 1e9 seconds",
            ));
        }
        Ok(())
    }

    pub fn push(&mut self, at: f64, event: SessionEvent) {
        self.events.push(ScriptedEvent { at, event });
    }

    /// Feeds the script into `controller`, interleaving fade ticks at the
    /// scheduler's cadence. Returns the session time the replay ended at.
    ///
    /// Fading depends only on the tick time, so a run of ticks between two
    /// events collapses into the last one.
    pub fn replay(&self, controller: &mut SessionController) -> f64 {
        let mut next_tick = REPLAY_TICK_SECONDS;
        let mut now = 0.0_f64;

        for scripted in &self.events {
            next_tick = tick_until(controller, next_tick, scripted.at);
            now = now.max(scripted.at);
            controller.handle_event(scripted.event.clone(), now);
        }

        let end = now + self.settle.max(0.0);
        tick_until(controller, next_tick, end);

        tracing::debug!(
            events = self.events.len(),
            end,
            figures = controller.store().len(),
            "replay finished"
        );
        end
    }
}

/// Delivers the last tick due at or before `until` and returns the next due
/// tick time.
fn tick_until(controller: &mut SessionController, next_tick: f64, until: f64) -> f64 {
    if !until.is_finite() {
        return next_tick;
    }
    let last = (until / REPLAY_TICK_SECONDS).floor() * REPLAY_TICK_SECONDS;
    if last < next_tick {
        return next_tick;
    }
    controller.on_fade_tick(last);
    last + REPLAY_TICK_SECONDS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SessionConfig, input::KeyEvent, session::testing::Fakes};

    #[test]
    fn script_events_are_sorted_on_load() {
        let script = EventScript::from_json(
            r#"{
                "events": [
                    { "at": 2.0, "event": { "type": "drag_ended" } },
                    { "at": 0.5, "event": { "type": "scroll", "delta_y": 1.0 } }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(script.events[0].at, 0.5);
        assert_eq!(script.settle, 0.0);
    }

    #[test]
    fn replay_fades_figures_on_schedule() {
        let fakes = Fakes::new(1);
        let mut controller = SessionController::with_seed(
            SessionConfig {
                fade_after: 10.0,
                ..SessionConfig::default()
            },
            fakes.collaborators(),
            1,
        );

        let mut script = EventScript::default();
        script.push(0.0, SessionEvent::Key(KeyEvent::from_char('a')));
        script.push(5.0, SessionEvent::Key(KeyEvent::from_char('b')));
        script.settle = 8.0;

        let end = script.replay(&mut controller);

        assert_eq!(end, 13.0);
        let figures = controller.store().figures();
        assert_eq!(figures.len(), 1);
        assert_eq!(figures[0].kind.character(), Some('B'));
        assert_eq!(figures[0].opacity(), 1.0);
    }

    #[test]
    fn far_future_events_replay_without_stepping_every_second() {
        let fakes = Fakes::new(1);
        let mut controller =
            SessionController::with_seed(SessionConfig::default(), fakes.collaborators(), 1);

        let mut script = EventScript::default();
        script.push(0.0, SessionEvent::Key(KeyEvent::from_char('a')));
        script.push(1.0e17, SessionEvent::Key(KeyEvent::from_char('b')));
        script.settle = 3.0;

        let end = script.replay(&mut controller);

        assert_eq!(end, 1.0e17 + 3.0);
        let figures = controller.store().figures();
        assert_eq!(figures.len(), 1);
        assert_eq!(figures[0].kind.character(), Some('B'));
    }

    #[test]
    fn out_of_range_times_are_rejected() {
        let far = EventScript::from_json(
            r#"{ "events": [ { "at": 1e17, "event": { "type": "drag_ended" } } ] }"#,
        );
        assert!(matches!(far, Err(SmashError::InvalidConfig(_))));

        let negative = EventScript::from_json(r#"{ "events": [], "settle": -1.0 }"#);
        assert!(matches!(negative, Err(SmashError::InvalidConfig(_))));
    }
}
