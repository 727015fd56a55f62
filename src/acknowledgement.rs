//! Publisher-confirms bookkeeping: tracks which delivery tags the broker has
//! yet to ack or nack, and settles the right [`PublisherConfirm`] when it
//! does (§4.4). Grounded on the teacher's `acknowledgement.rs` usage inside
//! `channel.rs` (`register_pending`, `ack`, `ack_all_before`,
//! `ack_all_pending`, and their nack counterparts).

use crate::{
    publisher_confirm::{Confirmation, PublisherConfirm},
    returned::ReturnedMessages,
    Error, Promise, PromiseResolver, Result,
};
use parking_lot::Mutex;
use std::{collections::BTreeMap, sync::Arc};

pub type DeliveryTag = u64;

struct Inner {
    /// Delivery tags the broker has not yet confirmed, in ascending order so
    /// a `multiple`-flagged ack/nack can drain a prefix in one pass.
    pending: BTreeMap<DeliveryTag, PromiseResolver<Confirmation>>,
    /// Resolvers for `wait_for_confirms` callers, settled once `pending`
    /// drains to empty.
    drain_waiters: Vec<PromiseResolver<()>>,
    last_error: Option<Error>,
}

/// Cheaply clonable: every clone of a [`crate::channel::Channel`] shares one
/// `Acknowledgements` so confirms observed on any clone settle the same
/// promises.
#[derive(Clone)]
pub struct Acknowledgements {
    inner: Arc<Mutex<Inner>>,
    returned_messages: ReturnedMessages,
}

impl Acknowledgements {
    pub fn new(returned_messages: ReturnedMessages) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                pending: BTreeMap::new(),
                drain_waiters: Vec::new(),
                last_error: None,
            })),
            returned_messages,
        }
    }

    /// Registers a delivery tag allocated for an outgoing publish, returning
    /// the future that resolves once the broker acks or nacks it.
    pub fn register_pending(&self, delivery_tag: DeliveryTag) -> PublisherConfirm {
        let (promise, resolver) = Promise::new();
        let mut inner = self.inner.lock();
        if let Some(err) = inner.last_error.clone() {
            resolver.swear(Err(err));
        } else {
            inner.pending.insert(delivery_tag, resolver);
        }
        PublisherConfirm::new(promise)
    }

    fn drain_if_empty(inner: &mut Inner) {
        if inner.pending.is_empty() {
            for waiter in inner.drain_waiters.drain(..) {
                waiter.swear(Ok(()));
            }
        }
    }

    /// `ack = false` rejects the matching future with [`Error::PublishNacked`]
    /// rather than handing back a value: a nack is a failure the caller
    /// must handle, not a [`Confirmation`] to inspect.
    fn resolve(&self, delivery_tag: DeliveryTag, ack: bool) -> Result<()> {
        let mut inner = self.inner.lock();
        match inner.pending.remove(&delivery_tag) {
            Some(resolver) => {
                Self::drain_if_empty(&mut inner);
                drop(inner);
                resolver.swear(Self::outcome(ack));
                Ok(())
            }
            None => Err(Error::protocol(
                504,
                format!("received ack/nack for unknown delivery tag {}", delivery_tag),
            )),
        }
    }

    fn outcome(ack: bool) -> Result<Confirmation> {
        if ack {
            Ok(Confirmation::Ack)
        } else {
            Err(Error::PublishNacked)
        }
    }

    pub fn ack(&self, delivery_tag: DeliveryTag) -> Result<()> {
        self.resolve(delivery_tag, true)
    }

    pub fn nack(&self, delivery_tag: DeliveryTag) -> Result<()> {
        self.resolve(delivery_tag, false)
    }

    /// `multiple = true, delivery_tag > 0`: every pending tag up to and
    /// including `delivery_tag` is settled.
    pub fn ack_all_before(&self, delivery_tag: DeliveryTag) -> Result<()> {
        self.settle_before(delivery_tag, true)
    }

    pub fn nack_all_before(&self, delivery_tag: DeliveryTag) -> Result<()> {
        self.settle_before(delivery_tag, false)
    }

    fn settle_before(&self, delivery_tag: DeliveryTag, ack: bool) -> Result<()> {
        let mut inner = self.inner.lock();
        let tail = inner.pending.split_off(&(delivery_tag + 1));
        let settled = std::mem::replace(&mut inner.pending, tail);
        Self::drain_if_empty(&mut inner);
        drop(inner);
        for (_, resolver) in settled {
            resolver.swear(Self::outcome(ack));
        }
        Ok(())
    }

    /// `multiple = true, delivery_tag == 0`: every pending tag is settled.
    pub fn ack_all_pending(&self) {
        self.settle_all(true);
    }

    pub fn nack_all_pending(&self) {
        self.settle_all(false);
    }

    fn settle_all(&self, ack: bool) {
        let mut inner = self.inner.lock();
        let pending = std::mem::take(&mut inner.pending);
        Self::drain_if_empty(&mut inner);
        drop(inner);
        for (_, resolver) in pending {
            resolver.swear(Self::outcome(ack));
        }
    }

    /// Fails every still-pending confirm with `error`, called when the
    /// channel or connection goes down so no publisher waits forever.
    pub fn on_channel_error(&self, error: Error) {
        let mut inner = self.inner.lock();
        inner.last_error = Some(error.clone());
        let pending = std::mem::take(&mut inner.pending);
        let waiters = std::mem::take(&mut inner.drain_waiters);
        drop(inner);
        for (_, resolver) in pending {
            resolver.swear(Err(error.clone()));
        }
        for waiter in waiters {
            waiter.swear(Err(error.clone()));
        }
    }

    /// Resolves once every confirm pending *right now* has settled, used by
    /// `wait_for_confirms`. `None` if nothing is outstanding.
    pub fn get_last_pending(&self) -> Option<Promise<()>> {
        let mut inner = self.inner.lock();
        if inner.pending.is_empty() {
            return None;
        }
        let (promise, resolver) = Promise::new();
        inner.drain_waiters.push(resolver);
        Some(promise)
    }

    pub fn returned_messages(&self) -> &ReturnedMessages {
        &self.returned_messages
    }
}
