//! The future returned by `basic_publish` once `confirm.select` has put a
//! channel into confirm mode (§4.4). Grounded on the teacher's
//! `publisher_confirm.rs` (`PublisherConfirm::not_requested`, used as the
//! fallback in `send_method_frame_with_body`).

use crate::{Promise, Result};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

/// How the broker settled a confirm-tracked publish. A `basic.nack` does not
/// produce a value here: it rejects the future with [`crate::Error::PublishNacked`]
/// instead, since a nacked publish is a failure the caller must handle, not
/// a value to inspect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    Ack,
    /// The channel was not in confirm mode when this message was published.
    NotRequested,
}

/// Future settling once the broker acks or nacks the delivery tag this
/// publish was assigned, or immediately if the channel isn't in confirm
/// mode.
pub struct PublisherConfirm(Promise<Confirmation>);

impl PublisherConfirm {
    pub(crate) fn new(promise: Promise<Confirmation>) -> Self {
        Self(promise)
    }

    pub(crate) fn not_requested() -> Self {
        let (promise, resolver) = Promise::new();
        resolver.swear(Ok(Confirmation::NotRequested));
        Self(promise)
    }
}

impl Future for PublisherConfirm {
    type Output = Result<Confirmation>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx)
    }
}
