//! Channel layer and wire-protocol engine for AMQP 0-9-1 brokers.
//!
//! This crate owns everything from the frame envelope up through a single
//! multiplexed [`channel::Channel`]: the codec, the class/method grammar in
//! [`frame::protocol`], the channel state machine, the RPC-over-frames
//! engine, publisher-confirms tracking and the inbound dispatcher that turns
//! `basic.deliver`/`basic.get-ok`/`basic.return` frame sequences into
//! [`message::Delivery`] values.
//!
//! What it does not own: the socket, TLS, the connection handshake,
//! heartbeating, reconnection, authentication and URI parsing. Those live in
//! whatever implements [`connection::ConnectionHandle`] and drives frames in
//! and out of a [`channel::Channel`].

pub mod acknowledgement;
pub mod channel;
pub mod channel_status;
pub mod connection;
pub mod consumer;
pub mod consumers;
mod error;
pub mod frame;
pub mod frames;
mod id_sequence;
pub mod message;
pub mod options;
pub mod publisher_confirm;
pub mod queue;
pub mod returned;
pub mod types;

pub use crate::error::{Error, ErrorSink, Result};
pub use crate::types::BasicProperties;

pub use channel::Channel;
pub use consumer::Consumer;
pub use message::{Delivery, DeliveryResult, GetMessage, ReturnedMessage};
pub use publisher_confirm::{Confirmation, PublisherConfirm};
pub use queue::Queue;

/// A promise settled with a [`Result`], the continuation primitive every RPC
/// and publisher confirm in this crate is built on (§4.2). Resolved from
/// wherever a frame answering that RPC arrives, awaited from wherever the
/// caller issued it.
pub(crate) type Promise<T> = pinky_swear::Promise<Result<T>>;
/// The settling half of a [`Promise`].
pub(crate) type PromiseResolver<T> = pinky_swear::PromiseResolver<Result<T>>;
