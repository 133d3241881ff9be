//! Bounded command channel between producer contexts and the display task.
//!
//! Built on an `embassy-sync` channel. Sends never wait: when the queue is
//! full the new command is dropped and counted. Exactly one receiver can be
//! taken from a channel, so there is a single consumer by construction.
//!
//! ```text
//! ┌──────────────┐  try_send   ┌──────────────┐  receive  ┌──────────────┐
//! │ stack events │───────────▶│              │─────────▶│              │
//! │ buttons      │───────────▶│ CommandChannel│          │ display task │
//! │ timer        │───────────▶│  (N slots)   │          │              │
//! └──────────────┘             └──────────────┘           └──────────────┘
//! ```

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;

use crate::command::Command;

/// Bounded multi-producer, single-consumer queue of `Command`s.
pub struct CommandChannel<M: RawMutex, const N: usize> {
    queue: Channel<M, Command, N>,
    dropped: AtomicU32,
    receiver_taken: AtomicBool,
}

impl<M: RawMutex, const N: usize> CommandChannel<M, N> {
    /// Create an empty channel. Usable in a `static`.
    pub const fn new() -> Self {
        Self {
            queue: Channel::new(),
            dropped: AtomicU32::new(0),
            receiver_taken: AtomicBool::new(false),
        }
    }

    /// A sending handle. Any number may exist.
    pub fn sender(&self) -> CommandSender<'_, M, N> {
        CommandSender { channel: self }
    }

    /// The receiving handle. Returns `None` once it has been taken.
    pub fn take_receiver(&self) -> Option<CommandReceiver<'_, M, N>> {
        if self.receiver_taken.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(CommandReceiver { channel: self })
    }

    /// Enqueue without waiting. Returns `false` if the command was dropped.
    pub fn try_send(&self, command: Command) -> bool {
        match self.queue.try_send(command) {
            Ok(()) => true,
            Err(_) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
                warn!("Command queue full - dropping (total dropped {})", dropped);
                false
            }
        }
    }

    /// Number of commands rejected because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Commands currently waiting.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<M: RawMutex, const N: usize> Default for CommandChannel<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer handle. Cheap to copy into every callback and task.
pub struct CommandSender<'a, M: RawMutex, const N: usize> {
    channel: &'a CommandChannel<M, N>,
}

impl<M: RawMutex, const N: usize> Clone for CommandSender<'_, M, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: RawMutex, const N: usize> Copy for CommandSender<'_, M, N> {}

impl<M: RawMutex, const N: usize> CommandSender<'_, M, N> {
    /// See [`CommandChannel::try_send`].
    pub fn try_send(&self, command: Command) -> bool {
        self.channel.try_send(command)
    }
}

/// The single consumer's handle.
pub struct CommandReceiver<'a, M: RawMutex, const N: usize> {
    channel: &'a CommandChannel<M, N>,
}

impl<M: RawMutex, const N: usize> CommandReceiver<'_, M, N> {
    /// Wait until a command is available and remove it.
    pub async fn receive(&self) -> Command {
        self.channel.queue.receive().await
    }

    /// Remove the oldest command if there is one.
    pub fn try_receive(&self) -> Option<Command> {
        self.channel.queue.try_receive().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ConnHandle, Payload};
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};

    fn numbered(i: u32) -> Command {
        Command::Receive {
            handle: ConnHandle(i),
            payload: Payload::new(),
        }
    }

    #[test]
    fn fifo_order() {
        let channel: CommandChannel<NoopRawMutex, 4> = CommandChannel::new();
        let rx = channel.take_receiver().unwrap();
        assert!(channel.try_send(Command::Open {
            handle: ConnHandle(1)
        }));
        assert!(channel.try_send(Command::Start));
        assert!(channel.try_send(Command::Close));

        assert_eq!(
            block_on(rx.receive()),
            Command::Open {
                handle: ConnHandle(1)
            }
        );
        assert_eq!(block_on(rx.receive()), Command::Start);
        assert_eq!(block_on(rx.receive()), Command::Close);
        assert!(rx.try_receive().is_none());
    }

    #[test]
    fn newest_send_is_dropped_when_full() {
        let channel: CommandChannel<NoopRawMutex, 10> = CommandChannel::new();
        let tx = channel.sender();

        for i in 0..10 {
            assert!(tx.try_send(numbered(i)));
        }
        assert!(!tx.try_send(numbered(10)));
        assert!(!tx.try_send(numbered(11)));
        assert_eq!(channel.dropped(), 2);
        assert_eq!(channel.len(), 10);

        let rx = channel.take_receiver().unwrap();
        for i in 0..10 {
            assert_eq!(rx.try_receive(), Some(numbered(i)));
        }
        assert!(rx.try_receive().is_none());
    }

    #[test]
    fn space_frees_after_receive() {
        let channel: CommandChannel<NoopRawMutex, 2> = CommandChannel::new();
        let rx = channel.take_receiver().unwrap();
        assert!(channel.try_send(Command::Start));
        assert!(channel.try_send(Command::Stop));
        assert!(!channel.try_send(Command::Close));

        assert_eq!(rx.try_receive(), Some(Command::Start));
        assert!(channel.try_send(Command::Close));
        assert_eq!(rx.try_receive(), Some(Command::Stop));
        assert_eq!(rx.try_receive(), Some(Command::Close));
        assert_eq!(channel.dropped(), 1);
    }

    #[test]
    fn receiver_can_only_be_taken_once() {
        let channel: CommandChannel<NoopRawMutex, 2> = CommandChannel::new();
        assert!(channel.take_receiver().is_some());
        assert!(channel.take_receiver().is_none());
    }

    #[test]
    fn concurrent_producers_deliver_each_command_once_in_order() {
        const PER_PRODUCER: u32 = 200;
        let channel: CommandChannel<CriticalSectionRawMutex, 10> = CommandChannel::new();
        let rx = channel.take_receiver().unwrap();

        let mut seen_a = Vec::new();
        let mut seen_b = Vec::new();

        std::thread::scope(|s| {
            for base in [0u32, 1_000] {
                let tx = channel.sender();
                s.spawn(move || {
                    for i in 0..PER_PRODUCER {
                        while !tx.try_send(numbered(base + i)) {
                            std::thread::yield_now();
                        }
                    }
                });
            }

            while seen_a.len() + seen_b.len() < (2 * PER_PRODUCER) as usize {
                if let Some(Command::Receive { handle, .. }) = rx.try_receive() {
                    if handle.0 < 1_000 {
                        seen_a.push(handle.0);
                    } else {
                        seen_b.push(handle.0 - 1_000);
                    }
                }
            }
        });

        let expected: Vec<u32> = (0..PER_PRODUCER).collect();
        assert_eq!(seen_a, expected);
        assert_eq!(seen_b, expected);
        assert!(rx.try_receive().is_none());
    }
}
