//! Inbound message shapes (§3 data model): `Delivery` for `basic.deliver`
//! and `basic.get-ok`, `ReturnedMessage` for `basic.return`, plus the single
//! `InFlight` assembly slot that content-header/body frames fill in before a
//! method gets handed to its waiter. Grounded on the teacher's
//! `message.rs`, trimmed of the per-queue indirection the full driver needs
//! but this channel-only crate does not.

use crate::{
    acknowledgement::DeliveryTag,
    types::{LongLongUInt, LongUInt, ShortString, ShortUInt},
    BasicProperties,
};

/// Result handed to a consumer callback: `Some` for a delivery, `None` once
/// the consumer has been canceled. An error always precedes a final `None`.
pub type DeliveryResult = crate::Result<Option<Delivery>>;

/// A fully assembled AMQP message delivered to a consumer or returned by
/// `basic.get`.
#[derive(Clone, Debug, PartialEq)]
pub struct Delivery {
    pub delivery_tag: DeliveryTag,
    pub exchange: ShortString,
    pub routing_key: ShortString,
    pub redelivered: bool,
    pub properties: BasicProperties,
    pub data: Vec<u8>,
}

impl Delivery {
    pub(crate) fn new(
        delivery_tag: LongLongUInt,
        exchange: ShortString,
        routing_key: ShortString,
        redelivered: bool,
    ) -> Self {
        Self {
            delivery_tag,
            exchange,
            routing_key,
            redelivered,
            properties: BasicProperties::default(),
            data: Vec::new(),
        }
    }

    pub(crate) fn set_properties(&mut self, properties: BasicProperties) {
        self.properties = properties;
    }

    pub(crate) fn receive_content(&mut self, data: &[u8]) {
        self.data.extend_from_slice(data);
    }
}

/// A message handed back by `basic.get-ok`, alongside the queue depth the
/// broker reported at the time.
#[derive(Clone, Debug, PartialEq)]
pub struct GetMessage {
    pub delivery: Delivery,
    pub message_count: LongUInt,
}

/// A message the broker rejected delivery of via `basic.return` (an
/// unroutable `mandatory` publish).
#[derive(Clone, Debug, PartialEq)]
pub struct ReturnedMessage {
    pub delivery: Delivery,
    pub reply_code: ShortUInt,
    pub reply_text: ShortString,
}

/// What consumed the content-header/body frames following the last method
/// frame the channel read. Exactly one of these can be assembling at a time
/// per channel, since AMQP never interleaves two deliveries' frames (§3
/// invariant 5).
#[derive(Debug)]
pub(crate) enum InFlight {
    None,
    Deliver {
        consumer_tag: ShortString,
        delivery: Delivery,
        remaining: usize,
    },
    Get {
        message_count: LongUInt,
        delivery: Delivery,
        remaining: usize,
    },
    Return {
        reply_code: ShortUInt,
        reply_text: ShortString,
        delivery: Delivery,
        remaining: usize,
    },
}

impl Default for InFlight {
    fn default() -> Self {
        InFlight::None
    }
}
