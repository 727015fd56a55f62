//! Buffer of `basic.return`ed messages awaiting collection, grounded on the
//! teacher's `ReturnedMessages` (`set_delivery_properties`,
//! `receive_delivery_content`, `new_delivery_complete`, `drain`).

use crate::message::ReturnedMessage;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Inner {
    messages: Vec<ReturnedMessage>,
}

/// Cheaply clonable; every clone of a [`crate::channel::Channel`] drains the
/// same buffer.
#[derive(Clone, Debug, Default)]
pub struct ReturnedMessages(Arc<Mutex<Inner>>);

impl ReturnedMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, message: ReturnedMessage) {
        self.0.lock().messages.push(message);
    }

    /// Takes every message collected so far, leaving the buffer empty.
    /// Called from `wait_for_confirms` and from a channel's own `close`.
    pub fn drain(&self) -> Vec<ReturnedMessage> {
        std::mem::take(&mut self.0.lock().messages)
    }
}
