//! Stack event → command mapping for both roles.
//!
//! The mapping functions are pure; the listeners wrap them with a single
//! non-blocking channel send, which is the only thing a producer does
//! from the stack's context.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::channel::CommandSender;
use crate::command::{Command, Payload};
use crate::spp::{SppEvent, SppListener};

/// Acceptor (server) mapping: open, close and inbound data.
pub fn acceptor_command(event: &SppEvent<'_>) -> Option<Command> {
    match *event {
        SppEvent::ServerOpen { handle } => {
            info!("SPP server open, handle {}", handle);
            Some(Command::Open { handle })
        }
        SppEvent::Close { handle } => {
            info!("SPP close, handle {}", handle);
            Some(Command::Close)
        }
        SppEvent::Data { handle, data } => {
            debug!("SPP data len={} handle={}: {=[u8]:x}", data.len(), handle, data);
            let (payload, cut) = Payload::truncated(data);
            if cut {
                warn!(
                    "SPP data of {} bytes truncated to {}",
                    data.len(),
                    Payload::CAPACITY
                );
            }
            Some(Command::Receive { handle, payload })
        }
        _ => {
            debug!("SPP event ignored: {}", event);
            None
        }
    }
}

/// Initiator (client) mapping: open, close and congestion-cleared.
pub fn initiator_command(event: &SppEvent<'_>) -> Option<Command> {
    match *event {
        SppEvent::ClientOpen { handle } => {
            info!("SPP client open, handle {}", handle);
            Some(Command::Open { handle })
        }
        SppEvent::Close { handle } => {
            info!("SPP close, handle {}", handle);
            Some(Command::Close)
        }
        SppEvent::Congestion {
            congested: false, ..
        } => Some(Command::Send(Payload::congestion_block())),
        SppEvent::Data { handle, data } => {
            // Acknowledgments from the acceptor; nothing to render.
            debug!("SPP data len={} handle={}: {=[u8]:x}", data.len(), handle, data);
            None
        }
        _ => {
            debug!("SPP event ignored: {}", event);
            None
        }
    }
}

/// Which mapping a listener applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    Acceptor,
    Initiator,
}

impl Role {
    pub fn command_for(self, event: &SppEvent<'_>) -> Option<Command> {
        match self {
            Role::Acceptor => acceptor_command(event),
            Role::Initiator => initiator_command(event),
        }
    }
}

/// `SppListener` that forwards mapped events into the command channel.
pub struct EventProducer<'a, M: RawMutex, const N: usize> {
    role: Role,
    tx: CommandSender<'a, M, N>,
}

impl<'a, M: RawMutex, const N: usize> EventProducer<'a, M, N> {
    pub fn new(role: Role, tx: CommandSender<'a, M, N>) -> Self {
        Self { role, tx }
    }
}

impl<M: RawMutex, const N: usize> SppListener for EventProducer<'_, M, N> {
    fn on_spp_event(&self, event: &SppEvent<'_>) {
        if let Some(command) = self.role.command_for(event) {
            // Drops are counted by the channel.
            let _ = self.tx.try_send(command);
        }
    }
}
