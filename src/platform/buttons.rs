//! GPIO buttons and the telemetry timer.
//!
//! Buttons are active-low with the internal pull-up and are sampled
//! every `BUTTON_POLL_MS`. Each completed press goes through
//! [`Button::poll`] and, if it produces a command, into the channel.

use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_time::{Duration, Instant, Ticker};

use crate::config::{BUTTON_POLL_MS, TELEMETRY_PERIOD_MS};
use crate::input::{Button, ButtonAction, InputLevel, Level, TelemetryTicker};
use crate::platform::BridgeSender;

/// Active-low input pin.
pub struct ActiveLow<'d>(Input<'d>);

impl<'d> ActiveLow<'d> {
    pub fn new(pin: AnyPin) -> Self {
        Self(Input::new(pin, Pull::Up))
    }
}

impl InputLevel for ActiveLow<'_> {
    fn level(&mut self) -> Level {
        if self.0.is_low() {
            Level::Asserted
        } else {
            Level::Released
        }
    }
}

#[embassy_executor::task(pool_size = 3)]
pub async fn button_task(pin: AnyPin, action: ButtonAction, tx: BridgeSender) -> ! {
    let mut line = ActiveLow::new(pin);
    let mut button = Button::new(action);
    let mut ticker = Ticker::every(Duration::from_millis(BUTTON_POLL_MS));
    info!("button ready: {}", button.action());

    loop {
        ticker.next().await;
        if let Some(command) = button.poll(line.level(), Instant::now().as_millis()) {
            tx.try_send(command);
        }
    }
}

#[embassy_executor::task]
pub async fn telemetry_task(label: &'static str, tx: BridgeSender) -> ! {
    let mut telemetry = TelemetryTicker::new(label);
    let mut ticker = Ticker::every(Duration::from_millis(TELEMETRY_PERIOD_MS));

    loop {
        ticker.next().await;
        // Dropped by the consumer unless sending is on.
        tx.try_send(telemetry.next_command());
    }
}
