//! Physical input and timer producers.
//!
//! Buttons are polled once per tick. A press is measured from the
//! asserted edge to the released edge; what it produces depends on the
//! button's [`ButtonAction`]. The polling loop itself lives with the
//! hardware glue, the decisions live here so they can be tested.

use crate::command::{Command, Payload};
use crate::config::LONG_PRESS_MS;

/// Logical input level (after active-low inversion).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Asserted,
    Released,
}

/// A polled input line.
pub trait InputLevel {
    fn level(&mut self) -> Level;
}

/// Tracks one button across polls and reports completed presses.
#[derive(Clone, Copy, Debug, Default)]
pub struct PressTracker {
    pressed_at: Option<u64>,
}

impl PressTracker {
    pub const fn new() -> Self {
        Self { pressed_at: None }
    }

    /// Feed one sample. Returns the hold time (ms) when a press ends.
    pub fn update(&mut self, level: Level, now_ms: u64) -> Option<u64> {
        match (level, self.pressed_at) {
            (Level::Asserted, None) => {
                self.pressed_at = Some(now_ms);
                None
            }
            (Level::Released, Some(start)) => {
                self.pressed_at = None;
                Some(now_ms.saturating_sub(start))
            }
            _ => None,
        }
    }
}

/// Short press starts sending, long press stops it.
pub fn classify_hold(held_ms: u64) -> Command {
    if held_ms > LONG_PRESS_MS {
        Command::Stop
    } else {
        Command::Start
    }
}

/// What a button produces when released.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonAction {
    /// Start on a short press, stop on a long one.
    StartStop,
    /// Send a fixed text.
    SendText(&'static str),
}

impl ButtonAction {
    pub fn command(self, held_ms: u64) -> Command {
        match self {
            ButtonAction::StartStop => classify_hold(held_ms),
            ButtonAction::SendText(text) => Command::send_text(text),
        }
    }
}

/// Fixed payloads of the three-button board, in button order.
pub const SEND_BUTTON_TEXTS: [&str; 3] = ["abcdefghijk", "01234567890", "ABCDEFGHIJK"];

/// Poll-driven button producer.
pub struct Button {
    action: ButtonAction,
    tracker: PressTracker,
}

impl Button {
    pub const fn new(action: ButtonAction) -> Self {
        Self {
            action,
            tracker: PressTracker::new(),
        }
    }

    /// Feed one sample; yields a command when a press completes.
    pub fn poll(&mut self, level: Level, now_ms: u64) -> Option<Command> {
        let held = self.tracker.update(level, now_ms)?;
        debug!("Button released after {} ms", held);
        Some(self.action.command(held))
    }

    pub fn action(&self) -> ButtonAction {
        self.action
    }
}

/// Periodic `Send` producer: "This is <label>:<n>".
pub struct TelemetryTicker {
    label: &'static str,
    counter: u32,
}

impl TelemetryTicker {
    pub const fn new(label: &'static str) -> Self {
        Self { label, counter: 0 }
    }

    pub fn next_command(&mut self) -> Command {
        let payload = Payload::format(format_args!("This is {}:{}", self.label, self.counter));
        self.counter = self.counter.wrapping_add(1);
        Command::Send(payload)
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_reports_hold_time_on_release() {
        let mut t = PressTracker::new();
        assert_eq!(t.update(Level::Released, 0), None);
        assert_eq!(t.update(Level::Asserted, 100), None);
        assert_eq!(t.update(Level::Asserted, 110), None);
        assert_eq!(t.update(Level::Released, 350), Some(250));
        assert_eq!(t.update(Level::Released, 360), None);
    }

    #[test]
    fn hold_threshold_is_inclusive_for_start() {
        assert_eq!(classify_hold(0), Command::Start);
        assert_eq!(classify_hold(LONG_PRESS_MS), Command::Start);
        assert_eq!(classify_hold(LONG_PRESS_MS + 1), Command::Stop);
    }

    #[test]
    fn start_stop_button_sequence() {
        let mut b = Button::new(ButtonAction::StartStop);
        assert_eq!(b.poll(Level::Asserted, 0), None);
        assert_eq!(b.poll(Level::Released, 50), Some(Command::Start));
        assert_eq!(b.poll(Level::Asserted, 1_000), None);
        assert_eq!(b.poll(Level::Released, 3_500), Some(Command::Stop));
    }

    #[test]
    fn send_button_emits_fixed_text_regardless_of_hold() {
        let mut b = Button::new(ButtonAction::SendText(SEND_BUTTON_TEXTS[1]));
        b.poll(Level::Asserted, 0);
        assert_eq!(
            b.poll(Level::Released, 5_000),
            Some(Command::send_text("01234567890"))
        );
    }

    #[test]
    fn telemetry_counts_up() {
        let mut ticker = TelemetryTicker::new("M5StickC");
        let Command::Send(first) = ticker.next_command() else {
            panic!("expected send");
        };
        let Command::Send(second) = ticker.next_command() else {
            panic!("expected send");
        };
        assert_eq!(first.text(), "This is M5StickC:0");
        assert_eq!(second.text(), "This is M5StickC:1");
        assert_eq!(ticker.counter(), 2);
    }
}
