//! The display task: single consumer of the command channel.
//!
//! The consumer owns the connection state, the link writer and the
//! screen. Producers reach any of them only by sending a [`Command`].
//!
//! ```text
//!                 Open{h}                       Start
//!  Disconnected ──────────▶ Connected{h, Idle} ───────▶ Connected{h, Sending}
//!       ▲                        │   ▲                         │
//!       │          Close         │   └─────────── Stop ────────┘
//!       └────────────────────────┘ (also from Sending)
//! ```
//!
//! Commands that do not apply in the current state are counted and
//! otherwise ignored.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::board::{BoardProfile, Labels};
use crate::channel::CommandReceiver;
use crate::command::{Command, ConnHandle, Payload};
use crate::config::ACK;
use crate::display::{Display, Region, TextLog};
use crate::producer::Role;
use crate::spp::SppWriter;

/// Whether outbound `Send` commands are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendMode {
    Idle,
    Sending,
}

/// Link state as seen by the consumer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    Disconnected,
    Connected { handle: ConnHandle, mode: SendMode },
}

impl ConnectionState {
    pub fn handle(&self) -> Option<ConnHandle> {
        match self {
            ConnectionState::Connected { handle, .. } => Some(*handle),
            ConnectionState::Disconnected => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected { .. })
    }
}

/// Result of dispatching one command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    Applied,
    Ignored,
}

pub struct Consumer<W, D> {
    role: Role,
    profile: BoardProfile,
    labels: Labels,
    writer: W,
    display: D,
    state: ConnectionState,
    log: TextLog,
    ignored: u32,
    write_failures: u32,
    draw_failures: u32,
}

impl<W: SppWriter, D: Display> Consumer<W, D> {
    pub fn new(role: Role, profile: BoardProfile, writer: W, display: D) -> Self {
        let log = TextLog::new(profile.overflow(role), display.body_lines());
        Self {
            role,
            labels: profile.labels(role),
            profile,
            writer,
            display,
            state: ConnectionState::Disconnected,
            log,
            ignored: 0,
            write_failures: 0,
            draw_failures: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Commands that did not apply in the state they arrived in.
    pub fn ignored(&self) -> u32 {
        self.ignored
    }

    pub fn write_failures(&self) -> u32 {
        self.write_failures
    }

    pub fn draw_failures(&self) -> u32 {
        self.draw_failures
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Paint the start-up screen: titles and "not connected".
    pub fn paint_initial(&mut self) {
        let labels = self.labels;
        let mut drawn = Ok(());
        for (row, line) in labels.title.iter().enumerate() {
            drawn = drawn.and_then(|_| {
                self.display
                    .draw_text(Region::Title(row as u8), line.text, line.color)
            });
        }
        drawn = drawn.and_then(|_| self.draw_status());
        self.note_draw(drawn);
        self.finish();
    }

    /// Apply one command to the state, the link and the screen.
    pub fn dispatch(&mut self, command: Command) -> Outcome {
        info!(
            "command {} ({}) in {}",
            command.tag(),
            command.tag().code(),
            self.state
        );
        let outcome = match (self.state, command) {
            (_, Command::Open { handle }) => {
                let mode = if self.profile.sends_on_open() {
                    SendMode::Sending
                } else {
                    SendMode::Idle
                };
                self.state = ConnectionState::Connected { handle, mode };
                let drawn = self.draw_status().and_then(|_| self.draw_mode());
                self.note_draw(drawn);
                Outcome::Applied
            }
            (ConnectionState::Connected { .. }, Command::Close) => {
                self.state = ConnectionState::Disconnected;
                let drawn = self.draw_status().and_then(|_| self.draw_mode());
                self.note_draw(drawn);
                Outcome::Applied
            }
            (ConnectionState::Connected { .. }, Command::Receive { handle, payload }) => {
                self.write(handle, &ACK);
                self.append(&payload);
                Outcome::Applied
            }
            (
                ConnectionState::Connected {
                    handle,
                    mode: SendMode::Idle,
                },
                Command::Start,
            ) => {
                self.set_mode(handle, SendMode::Sending);
                Outcome::Applied
            }
            (
                ConnectionState::Connected {
                    handle,
                    mode: SendMode::Sending,
                },
                Command::Stop,
            ) => {
                self.set_mode(handle, SendMode::Idle);
                Outcome::Applied
            }
            (
                ConnectionState::Connected {
                    handle,
                    mode: SendMode::Sending,
                },
                Command::Send(payload),
            ) => {
                self.write(handle, payload.as_bytes());
                if self.profile.echo_sent {
                    self.append(&payload);
                }
                Outcome::Applied
            }
            (state, command) => {
                self.ignored = self.ignored.wrapping_add(1);
                debug!("command {} ignored in {}", command.tag(), state);
                Outcome::Ignored
            }
        };
        if outcome == Outcome::Applied {
            self.finish();
        }
        outcome
    }

    /// Consume commands forever.
    pub async fn run<M: RawMutex, const N: usize>(mut self, rx: CommandReceiver<'_, M, N>) -> ! {
        self.paint_initial();
        loop {
            let command = rx.receive().await;
            self.dispatch(command);
        }
    }

    fn set_mode(&mut self, handle: ConnHandle, mode: SendMode) {
        self.state = ConnectionState::Connected { handle, mode };
        let drawn = self.draw_mode();
        self.note_draw(drawn);
    }

    fn write(&mut self, handle: ConnHandle, data: &[u8]) {
        if let Err(e) = self.writer.write(handle, data) {
            self.write_failures = self.write_failures.wrapping_add(1);
            warn!("write of {} bytes on {} failed: {}", data.len(), handle, e);
        }
    }

    fn append(&mut self, payload: &Payload) {
        let drawn = self
            .log
            .append(&mut self.display, payload.text(), self.labels.body);
        self.note_draw(drawn);
    }

    fn draw_status(&mut self) -> Result<(), crate::error::Error> {
        let label = if self.state.is_connected() {
            self.labels.connected
        } else {
            self.labels.disconnected
        };
        self.display.draw_text(Region::Status, label.text, label.color)
    }

    /// Repaint the send-mode row; blank while disconnected.
    fn draw_mode(&mut self) -> Result<(), crate::error::Error> {
        if self.role != Role::Initiator || !self.profile.has_mode_row() {
            return Ok(());
        }
        let label = match self.state {
            ConnectionState::Connected {
                mode: SendMode::Sending,
                ..
            } => self.labels.sending,
            ConnectionState::Connected {
                mode: SendMode::Idle,
                ..
            } => self.labels.idle,
            ConnectionState::Disconnected => {
                return self
                    .display
                    .fill_region(Region::Mode, crate::display::Color::Black)
            }
        };
        self.display.draw_text(Region::Mode, label.text, label.color)
    }

    fn note_draw(&mut self, result: Result<(), crate::error::Error>) {
        if let Err(e) = result {
            self.draw_failures = self.draw_failures.wrapping_add(1);
            warn!("display update failed: {}", e);
        }
    }

    fn finish(&mut self) {
        let flushed = self.display.flush();
        self.note_draw(flushed);
    }
}
