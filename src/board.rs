//! Board profiles: screen geometry, fonts, labels and input capability.
//!
//! One profile per supported board. The firmware picks one at build time
//! through [`crate::config::BOARD`]; tests pick whichever they need.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10, FONT_7X13, FONT_8X13};
use embedded_graphics::mono_font::MonoFont;

use crate::display::{Color, Overflow};
use crate::input::{ButtonAction, SEND_BUTTON_TEXTS};
use crate::producer::Role;

/// Supported boards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardKind {
    /// 320×240 color, three send buttons, echoes sent text.
    Stack,
    /// 80×160 color, start/stop button and telemetry timer.
    StickC,
    /// 64×128 monochrome, start/stop button and telemetry timer.
    Stick,
    /// nRF52840-DK with a 128×64 SSD1306, start/stop button and telemetry timer.
    Oled128x64,
}

/// How the board's buttons produce commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputKind {
    /// One button per fixed text; sending is always enabled while connected.
    SendButtons,
    /// One start/stop button gating a periodic sender.
    StartStop,
}

/// A piece of text with its color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Label {
    pub text: &'static str,
    pub color: Color,
}

impl Label {
    pub const fn new(text: &'static str, color: Color) -> Self {
        Self { text, color }
    }
}

/// Role-specific texts drawn by the consumer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Labels {
    pub title: &'static [Label],
    pub connected: Label,
    pub disconnected: Label,
    pub sending: Label,
    pub idle: Label,
    /// Color of body text.
    pub body: Color,
}

/// Static description of a board.
#[derive(Clone, Copy)]
pub struct BoardProfile {
    pub kind: BoardKind,
    /// Screen size in pixels.
    pub width: u32,
    pub height: u32,
    pub font: &'static MonoFont<'static>,
    /// Status row and starting column (in characters).
    pub status_row: u8,
    pub status_col: u8,
    /// Send-mode row, if the board shows one.
    pub mode_row: Option<u8>,
    /// First row of the text area.
    pub body_top: u8,
    pub input: InputKind,
    /// Whether sent text is echoed into the text area.
    pub echo_sent: bool,
    /// Label used in telemetry text; `None` on boards without a timer.
    pub telemetry_label: Option<&'static str>,
    pub monochrome: bool,
}

const ACCEPTOR_WIDE_TITLE: &[Label] = &[Label::new("SPP ACCEPTOR", Color::Yellow)];
const INITIATOR_WIDE_TITLE: &[Label] = &[Label::new("SPP INITIATOR", Color::Red)];
const ACCEPTOR_NARROW_TITLE: &[Label] = &[
    Label::new("SPP", Color::Yellow),
    Label::new("ACCEPTOR", Color::Yellow),
];
const INITIATOR_NARROW_TITLE: &[Label] = &[
    Label::new("SPP", Color::Yellow),
    Label::new("INITIATOR", Color::Yellow),
];
/// Eight columns: "INITIATOR" does not fit.
const INITIATOR_TINY_TITLE: &[Label] = &[
    Label::new("SPP", Color::Yellow),
    Label::new("INITIATE", Color::Yellow),
];

const STACK_BUTTONS: [ButtonAction; 3] = [
    ButtonAction::SendText(SEND_BUTTON_TEXTS[0]),
    ButtonAction::SendText(SEND_BUTTON_TEXTS[1]),
    ButtonAction::SendText(SEND_BUTTON_TEXTS[2]),
];
const START_STOP_BUTTON: [ButtonAction; 1] = [ButtonAction::StartStop];

impl BoardProfile {
    pub const fn for_kind(kind: BoardKind) -> Self {
        match kind {
            BoardKind::Stack => Self {
                kind,
                width: 320,
                height: 240,
                font: &FONT_10X20,
                status_row: 0,
                status_col: 15,
                mode_row: None,
                body_top: 1,
                input: InputKind::SendButtons,
                echo_sent: true,
                telemetry_label: None,
                monochrome: false,
            },
            BoardKind::StickC => Self {
                kind,
                width: 80,
                height: 160,
                font: &FONT_7X13,
                status_row: 3,
                status_col: 0,
                mode_row: Some(4),
                body_top: 6,
                input: InputKind::StartStop,
                echo_sent: false,
                telemetry_label: Some("M5StickC"),
                monochrome: false,
            },
            BoardKind::Stick => Self {
                kind,
                width: 64,
                height: 128,
                font: &FONT_8X13,
                status_row: 3,
                status_col: 0,
                mode_row: Some(5),
                body_top: 7,
                input: InputKind::StartStop,
                echo_sent: false,
                telemetry_label: Some("M5Stick"),
                monochrome: true,
            },
            BoardKind::Oled128x64 => Self {
                kind,
                width: 128,
                height: 64,
                font: &FONT_6X10,
                status_row: 1,
                status_col: 0,
                mode_row: Some(2),
                body_top: 3,
                input: InputKind::StartStop,
                echo_sent: false,
                telemetry_label: Some("nRF52840"),
                monochrome: true,
            },
        }
    }

    /// Characters per line.
    pub const fn columns(&self) -> u32 {
        self.width / (self.font.character_size.width + self.font.character_spacing)
    }

    /// Text rows on the screen.
    pub const fn rows(&self) -> u32 {
        self.height / self.font.character_size.height
    }

    /// Lines available to the text area.
    pub const fn body_lines(&self) -> u8 {
        let rows = self.rows();
        if rows > self.body_top as u32 {
            (rows - self.body_top as u32) as u8
        } else {
            0
        }
    }

    /// Boards without a start/stop control send whenever connected.
    pub const fn sends_on_open(&self) -> bool {
        matches!(self.input, InputKind::SendButtons)
    }

    pub const fn has_mode_row(&self) -> bool {
        self.mode_row.is_some()
    }

    /// Button actions in pin order.
    pub const fn buttons(&self) -> &'static [ButtonAction] {
        match self.input {
            InputKind::SendButtons => &STACK_BUTTONS,
            InputKind::StartStop => &START_STOP_BUTTON,
        }
    }

    /// Overflow policy of the text area for `role`.
    pub const fn overflow(&self, role: Role) -> Overflow {
        match role {
            Role::Acceptor => Overflow::Scroll,
            Role::Initiator => Overflow::Wrap,
        }
    }

    /// Texts for `role` on this board.
    pub const fn labels(&self, role: Role) -> Labels {
        let columns = self.columns();
        let title = match (role, columns) {
            (Role::Acceptor, 13..) => ACCEPTOR_WIDE_TITLE,
            (Role::Initiator, 13..) => INITIATOR_WIDE_TITLE,
            (Role::Acceptor, _) => ACCEPTOR_NARROW_TITLE,
            (Role::Initiator, 9..) => INITIATOR_NARROW_TITLE,
            (Role::Initiator, _) => INITIATOR_TINY_TITLE,
        };
        let (connected, disconnected) = match (role, self.kind) {
            (Role::Initiator, BoardKind::Stack) => (
                Label::new("Connect", Color::Red),
                Label::new("Not Connect", Color::Red),
            ),
            (Role::Initiator, BoardKind::StickC) => (
                Label::new("Connect", Color::Cyan),
                Label::new("DisConnect", Color::Red),
            ),
            (Role::Initiator, BoardKind::Stick) => (
                Label::new("Connect", Color::White),
                Label::new("", Color::Black),
            ),
            _ => (
                Label::new("Connect", Color::Cyan),
                Label::new("Not Connect", Color::Red),
            ),
        };
        Labels {
            title,
            connected,
            disconnected,
            sending: Label::new("Start", Color::Cyan),
            idle: Label::new("Stop", Color::Red),
            body: Color::Cyan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_is_consistent() {
        for kind in [
            BoardKind::Stack,
            BoardKind::StickC,
            BoardKind::Stick,
            BoardKind::Oled128x64,
        ] {
            let p = BoardProfile::for_kind(kind);
            assert!(p.columns() >= 8, "{:?}", kind);
            assert!((p.status_row as u32) < p.rows(), "{:?}", kind);
            if let Some(row) = p.mode_row {
                assert!((row as u32) < p.rows(), "{:?}", kind);
                assert!(row < p.body_top, "{:?}", kind);
            }
            assert_eq!(p.body_top as u32 + p.body_lines() as u32, p.rows().max(p.body_top as u32));
        }
    }

    #[test]
    fn stack_sends_without_gating_and_echoes() {
        let p = BoardProfile::for_kind(BoardKind::Stack);
        assert!(p.sends_on_open());
        assert!(p.echo_sent);
        assert!(!p.has_mode_row());
        assert_eq!(p.buttons().len(), 3);
        assert_eq!(p.telemetry_label, None);
        assert_eq!(p.body_lines(), 11);
    }

    #[test]
    fn stick_boards_gate_with_start_stop() {
        for kind in [BoardKind::StickC, BoardKind::Stick, BoardKind::Oled128x64] {
            let p = BoardProfile::for_kind(kind);
            assert!(!p.sends_on_open());
            assert!(p.has_mode_row());
            assert_eq!(p.buttons(), &[ButtonAction::StartStop]);
            assert!(p.telemetry_label.is_some());
        }
        assert_eq!(
            BoardProfile::for_kind(BoardKind::StickC).telemetry_label,
            Some("M5StickC")
        );
    }

    #[test]
    fn narrow_screens_split_the_title() {
        let stickc = BoardProfile::for_kind(BoardKind::StickC).labels(Role::Initiator);
        assert_eq!(stickc.title.len(), 2);
        assert_eq!(stickc.title[1].text, "INITIATOR");
        assert_eq!(stickc.disconnected.text, "DisConnect");

        let stick = BoardProfile::for_kind(BoardKind::Stick);
        let title = stick.labels(Role::Initiator).title;
        assert_eq!(title[1].text, "INITIATE");
        assert!(title.iter().all(|l| l.text.len() as u32 <= stick.columns()));

        let stack = BoardProfile::for_kind(BoardKind::Stack).labels(Role::Acceptor);
        assert_eq!(stack.title, &[Label::new("SPP ACCEPTOR", Color::Yellow)]);
        assert_eq!(stack.connected, Label::new("Connect", Color::Cyan));
        assert_eq!(stack.disconnected, Label::new("Not Connect", Color::Red));
    }
}
