//! External interface onto the connection a channel is multiplexed over
//! (§6). Everything below this trait -- the socket, TLS, the AMQP
//! handshake, heartbeats, reconnection -- is explicitly out of scope for
//! this crate and lives in the collaborator that implements it.

use crate::Result;
use async_trait::async_trait;
use std::fmt;

/// What a [`crate::channel::Channel`] needs from the connection it is
/// multiplexed over: the negotiated frame size limit, and a way to nudge
/// the connection's write loop after queuing a new outbound frame.
#[async_trait]
pub trait ConnectionHandle: fmt::Debug + Send + Sync {
    /// The negotiated `frame_max`, used to size outgoing body chunks.
    fn frame_max(&self) -> u32;

    /// Wakes whatever drives this connection's write loop, so a frame
    /// pushed onto [`crate::frames::Frames`] gets flushed promptly instead
    /// of waiting for the next unrelated wakeup.
    fn wake(&self);

    /// Reports a fault observed while driving this channel (e.g. a decode
    /// error on an inbound frame) back to the connection, which owns
    /// deciding whether that's fatal to the whole connection.
    async fn report_error(&self, error: crate::Error);
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::ConnectionHandle;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Minimal in-memory stand-in for a real connection, used by this
    /// crate's own tests to drive a [`crate::channel::Channel`] without a
    /// socket. Records the frame_max it was built with and collects
    /// reported errors for assertions; does not implement any broker
    /// semantics itself (see `tests/common` for that).
    #[derive(Debug, Clone)]
    pub(crate) struct LoopbackConnection {
        frame_max: u32,
        woken: Arc<Mutex<usize>>,
        errors: Arc<Mutex<Vec<crate::Error>>>,
    }

    impl LoopbackConnection {
        pub(crate) fn new(frame_max: u32) -> Self {
            Self {
                frame_max,
                woken: Arc::new(Mutex::new(0)),
                errors: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub(crate) fn wake_count(&self) -> usize {
            *self.woken.lock()
        }

        pub(crate) fn errors(&self) -> Vec<crate::Error> {
            self.errors.lock().clone()
        }
    }

    #[async_trait]
    impl ConnectionHandle for LoopbackConnection {
        fn frame_max(&self) -> u32 {
            self.frame_max
        }

        fn wake(&self) {
            *self.woken.lock() += 1;
        }

        async fn report_error(&self, error: crate::Error) {
            self.errors.lock().push(error);
        }
    }
}
