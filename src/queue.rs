//! Handle returned by `queue_declare`, caching the name the broker assigned
//! (relevant for server-generated queue names: an empty name on the
//! request, a generated one in the `queue.declare-ok` reply) along with the
//! depth/consumer counts reported at declare time.

use crate::types::{LongUInt, ShortString};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Queue {
    name: ShortString,
    message_count: LongUInt,
    consumer_count: LongUInt,
}

impl Queue {
    pub(crate) fn new(name: ShortString, message_count: LongUInt, consumer_count: LongUInt) -> Self {
        Self {
            name,
            message_count,
            consumer_count,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message_count(&self) -> LongUInt {
        self.message_count
    }

    pub fn consumer_count(&self) -> LongUInt {
        self.consumer_count
    }
}
