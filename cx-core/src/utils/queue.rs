//! Hand-off between the bus ingress and the render loop.
//!
//! The ingress side decodes frames and pushes the resulting [`Command`]s; the execution side
//! pops them one at a time between engine ticks. The lock is held only for the push or pop
//! itself, so neither side ever waits on rendering.
//!
//! The same lock guards the [`EngineStatus`] the execution side publishes after every tick,
//! which the ingress side reads to answer bus read requests.

use alloc::collections::VecDeque;
use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

use super::protocol::Command;
use crate::config::DEFAULT_PORT;

/// Snapshot of the engine for bus read requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStatus {
    pub system_on: bool,
    /// LED port that pattern and color commands apply to.
    pub port: u8,
    /// Color of the selected zone on that port.
    pub color: u32,
    /// Whether the selected zone finished its one-shot pattern.
    pub pattern_done: bool,
}

impl EngineStatus {
    pub const fn new() -> Self {
        Self {
            system_on: true,
            port: DEFAULT_PORT,
            color: 0,
            pattern_done: false,
        }
    }
}

impl Default for EngineStatus {
    fn default() -> Self {
        Self::new()
    }
}

struct Inner {
    commands: VecDeque<Command>,
    status: EngineStatus,
}

/// FIFO of decoded commands plus the latched engine status.
pub struct CommandQueue {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Inner>>,
}

impl CommandQueue {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                commands: VecDeque::new(),
                status: EngineStatus::new(),
            })),
        }
    }

    /// Append a command, returning the new queue length.
    pub fn push(&self, command: Command) -> usize {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            inner.commands.push_back(command);
            inner.commands.len()
        })
    }

    /// Take the oldest command, if any.
    pub fn pop(&self) -> Option<Command> {
        self.inner.lock(|inner| inner.borrow_mut().commands.pop_front())
    }

    pub fn has_next(&self) -> bool {
        !self.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.lock(|inner| inner.borrow().commands.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn publish_status(&self, status: EngineStatus) {
        self.inner.lock(|inner| inner.borrow_mut().status = status);
    }

    pub fn status(&self) -> EngineStatus {
        self.inner.lock(|inner| inner.borrow().status)
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}
