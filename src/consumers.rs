//! Per-channel consumer table, keyed directly by consumer tag. The teacher
//! indexes consumers through a per-queue `Queues` registry; this crate has
//! no queue-state cache to hang that off, so `basic.consume-ok`/
//! `basic.deliver`/`basic.cancel(-ok)` dispatch straight off this map.

use crate::{consumer::Consumer, message::Delivery, Error, Result};
use parking_lot::Mutex;
use std::{collections::HashMap, sync::Arc};

#[derive(Clone, Default)]
pub struct Consumers(Arc<Mutex<HashMap<String, Consumer>>>);

impl Consumers {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&self, consumer: Consumer) {
        self.0.lock().insert(consumer.tag().to_string(), consumer);
    }

    pub(crate) fn get(&self, consumer_tag: &str) -> Option<Consumer> {
        self.0.lock().get(consumer_tag).cloned()
    }

    pub(crate) fn deregister(&self, consumer_tag: &str) -> Option<Consumer> {
        self.0.lock().remove(consumer_tag)
    }

    /// Dispatches a completed delivery to its consumer. A tag the broker
    /// never registered via `basic.consume-ok` is a protocol violation, not
    /// something to paper over.
    pub(crate) fn deliver(&self, consumer_tag: &str, delivery: Delivery) -> Result<()> {
        match self.get(consumer_tag) {
            Some(consumer) => {
                consumer.dispatch(Ok(Some(delivery)));
                Ok(())
            }
            None => Err(Error::protocol(
                505,
                format!("delivery for unknown consumer tag {consumer_tag}"),
            )),
        }
    }

    /// Settles every consumer's delegate with a cancellation, used when the
    /// channel or connection goes down.
    pub(crate) fn cancel_all(&self, error: Error) {
        for (_, consumer) in std::mem::take(&mut *self.0.lock()) {
            consumer.dispatch(Err(error.clone()));
            consumer.dispatch(Ok(None));
        }
    }
}
