//! Outbound frame queue and per-channel expected-reply FIFO (§4.3/§4.5):
//! every method frame pushed out either carries no expectation (fire and
//! forget, e.g. `basic.ack`) or is paired with the [`crate::channel::Reply`]
//! variant that will resolve the RPC promise once its answer comes back.
//! Grounded on the teacher's `frames.rs`, trimmed of its flow-control frame
//! priority lanes since this crate hands frames to an external connection
//! one at a time rather than multiplexing several channels' queues itself.

use crate::{channel::Reply, frame::AMQPFrame, Error, Promise, PromiseResolver};
use parking_lot::Mutex;
use std::{
    collections::{HashMap, VecDeque},
    fmt,
    sync::Arc,
};

pub(crate) struct ExpectedReply(pub(crate) Reply);

impl fmt::Debug for ExpectedReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExpectedReply").field(&self.0).finish()
    }
}

#[derive(Default)]
struct Inner {
    queue: VecDeque<AMQPFrame>,
    expected_replies: HashMap<u16, VecDeque<ExpectedReply>>,
}

/// Cheaply clonable; every clone of a [`crate::channel::Channel`] pushes
/// into and pops from the same queue, which is what lets multiple channel
/// handles share one connection's frame stream in order.
#[derive(Clone, Default)]
pub struct Frames {
    inner: Arc<Mutex<Inner>>,
}

impl Frames {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, channel_id: u16, frame: AMQPFrame, expected_reply: Option<Reply>) {
        let mut inner = self.inner.lock();
        inner.queue.push_back(frame);
        if let Some(reply) = expected_reply {
            inner
                .expected_replies
                .entry(channel_id)
                .or_default()
                .push_back(ExpectedReply(reply));
        }
    }

    /// Pushes a batch of frames (method + header + body chunks) atomically,
    /// resolving the returned promise once they have all been queued.
    pub fn push_frames(&self, frames: Vec<AMQPFrame>) -> Promise<()> {
        let (promise, resolver) = Promise::new();
        let mut inner = self.inner.lock();
        for frame in frames {
            inner.queue.push_back(frame);
        }
        resolver.swear(Ok(()));
        promise
    }

    pub fn pop(&self) -> Option<AMQPFrame> {
        self.inner.lock().queue.pop_front()
    }

    pub(crate) fn next_expected_reply(&self, channel_id: u16) -> Option<Reply> {
        self.inner
            .lock()
            .expected_replies
            .get_mut(&channel_id)
            .and_then(|replies| replies.pop_front())
            .map(|reply| reply.0)
    }

    pub fn has_pending(&self) -> bool {
        !self.inner.lock().queue.is_empty()
    }

    /// Fails every outstanding expected reply, called when the connection
    /// the channel runs over goes down.
    pub fn drop_pending(&self, error: Error) {
        let mut inner = self.inner.lock();
        inner.queue.clear();
        for (_, replies) in inner.expected_replies.drain() {
            Self::cancel_expected_replies(replies, error.clone());
        }
    }

    pub(crate) fn clear_expected_replies(&self, channel_id: u16, error: Error) {
        if let Some(replies) = self.inner.lock().expected_replies.remove(&channel_id) {
            Self::cancel_expected_replies(replies, error);
        }
    }

    fn cancel_expected_replies(replies: VecDeque<ExpectedReply>, error: Error) {
        for reply in replies {
            reply.0.cancel(error.clone());
        }
    }
}
