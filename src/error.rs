use crate::channel_status::ChannelState;
use std::{fmt, sync::Arc};

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while driving a channel.
///
/// Cloneable so the same fault can be replayed to every pending RPC, every
/// unconfirmed publish and every consumer when a channel or connection goes
/// down (see [`crate::channel::Channel::set_closed`]).
#[derive(Clone, Debug, thiserror::Error)]
pub enum Error {
    /// The operation was attempted after the channel had already closed.
    #[error("channel closed")]
    ChannelClosed,
    /// The broker closed the channel with `channel.close`.
    #[error("channel {class_id}:{method_id} error: {code} ({text})")]
    ChannelError {
        code: u16,
        text: String,
        class_id: u16,
        method_id: u16,
    },
    /// The underlying connection reported a fault; identical for every
    /// channel multiplexed over it.
    #[error("connection error: {0}")]
    ConnectionError(String),
    /// A frame was malformed, out of sequence, or referenced unknown state.
    #[error("protocol error {code}: {message}")]
    ProtocolError { code: u16, message: String },
    /// A value could not be encoded onto the wire (oversized shortstr,
    /// oversized field table, non-UTF8 text, body larger than `frame_max`
    /// allows to ever be split).
    #[error("encoding error: {0}")]
    EncodingError(String),
    /// A publish awaiting confirms was rejected by a matching `basic.nack`.
    #[error("publish was nacked by the broker")]
    PublishNacked,
    /// A method was invoked while the channel was in a state that forbids it.
    #[error("invalid channel state: {0:?}")]
    InvalidChannelState(ChannelState),
}

impl Error {
    pub(crate) fn protocol(code: u16, message: impl Into<String>) -> Self {
        Error::ProtocolError {
            code,
            message: message.into(),
        }
    }
}

/// Boxed sink invoked with errors raised inside user-supplied consumer
/// callbacks. Such errors must not corrupt channel state, so they are routed
/// here instead of propagated.
#[derive(Clone)]
pub struct ErrorSink(pub(crate) Arc<dyn Fn(Error) + Send + Sync>);

impl ErrorSink {
    pub fn new(f: impl Fn(Error) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub(crate) fn call(&self, error: Error) {
        (self.0)(error)
    }
}

impl Default for ErrorSink {
    fn default() -> Self {
        Self::new(|error| {
            tracing::error!(%error, "unhandled error from consumer callback");
        })
    }
}

impl fmt::Debug for ErrorSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ErrorSink")
    }
}
