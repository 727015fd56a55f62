use crate::{
    acknowledgement::{Acknowledgements, DeliveryTag},
    channel_status::{ChannelState, ChannelStatus},
    connection::ConnectionHandle,
    consumer::Consumer,
    consumers::Consumers,
    frame::{
        protocol::{basic, channel as chan, confirm, exchange, queue, tx, AMQPClass},
        split_body, AMQPFrame, ContentHeader,
    },
    frames::Frames,
    id_sequence::IdSequence,
    message::{Delivery, GetMessage, InFlight, ReturnedMessage},
    options::{
        BasicCancelOptions, BasicConsumeOptions, BasicGetOptions, BasicPublishOptions,
        BasicQosOptions, ConfirmSelectOptions, ExchangeBindOptions, ExchangeDeclareOptions,
        ExchangeDeleteOptions, ExchangeUnbindOptions, QueueBindOptions, QueueDeclareOptions,
        QueueDeleteOptions, QueuePurgeOptions, QueueUnbindOptions,
    },
    publisher_confirm::PublisherConfirm,
    queue::Queue,
    returned::ReturnedMessages,
    types::{FieldTable, LongUInt, ShortString, ShortUInt},
    BasicProperties, Error, ErrorSink, Promise, PromiseResolver, Result,
};
use parking_lot::Mutex;
use std::{fmt, sync::Arc};
use tracing::{debug, error, trace};

/// Everything the channel is waiting to hear back about, keyed one per
/// outstanding RPC in the order the requests were sent (§4.2 FIFO
/// matching). Grounded on the teacher's `Reply` enum referenced from
/// `on_basic_get_empty_received` (`Reply::BasicGetOk(resolver, _)`).
#[allow(clippy::large_enum_variant)]
pub(crate) enum Reply {
    ChannelOpenOk(PromiseResolver<()>),
    ChannelFlowOk(PromiseResolver<bool>),
    ChannelCloseOk(PromiseResolver<()>),
    ExchangeDeclareOk(PromiseResolver<()>),
    ExchangeDeleteOk(PromiseResolver<()>),
    ExchangeBindOk(PromiseResolver<()>),
    ExchangeUnbindOk(PromiseResolver<()>),
    QueueDeclareOk(PromiseResolver<Queue>),
    QueueBindOk(PromiseResolver<()>),
    QueuePurgeOk(PromiseResolver<LongUInt>),
    QueueDeleteOk(PromiseResolver<LongUInt>),
    QueueUnbindOk(PromiseResolver<()>),
    BasicQosOk(PromiseResolver<()>),
    BasicConsumeOk(PromiseResolver<Consumer>, Consumer),
    BasicCancelOk(PromiseResolver<()>),
    BasicGetOk(PromiseResolver<Option<GetMessage>>),
    BasicRecoverOk(PromiseResolver<()>),
    ConfirmSelectOk(PromiseResolver<()>),
    TxSelectOk(PromiseResolver<()>),
    TxCommitOk(PromiseResolver<()>),
    TxRollbackOk(PromiseResolver<()>),
}

impl Reply {
    pub(crate) fn cancel(self, error: Error) {
        match self {
            Reply::ChannelOpenOk(r) => r.swear(Err(error)),
            Reply::ChannelFlowOk(r) => r.swear(Err(error)),
            Reply::ChannelCloseOk(r) => r.swear(Err(error)),
            Reply::ExchangeDeclareOk(r) => r.swear(Err(error)),
            Reply::ExchangeDeleteOk(r) => r.swear(Err(error)),
            Reply::ExchangeBindOk(r) => r.swear(Err(error)),
            Reply::ExchangeUnbindOk(r) => r.swear(Err(error)),
            Reply::QueueDeclareOk(r) => r.swear(Err(error)),
            Reply::QueueBindOk(r) => r.swear(Err(error)),
            Reply::QueuePurgeOk(r) => r.swear(Err(error)),
            Reply::QueueDeleteOk(r) => r.swear(Err(error)),
            Reply::QueueUnbindOk(r) => r.swear(Err(error)),
            Reply::BasicQosOk(r) => r.swear(Err(error)),
            Reply::BasicConsumeOk(r, _) => r.swear(Err(error)),
            Reply::BasicCancelOk(r) => r.swear(Err(error)),
            Reply::BasicGetOk(r) => r.swear(Err(error)),
            Reply::BasicRecoverOk(r) => r.swear(Err(error)),
            Reply::ConfirmSelectOk(r) => r.swear(Err(error)),
            Reply::TxSelectOk(r) => r.swear(Err(error)),
            Reply::TxCommitOk(r) => r.swear(Err(error)),
            Reply::TxRollbackOk(r) => r.swear(Err(error)),
        }
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Reply::ChannelOpenOk(_) => "ChannelOpenOk",
            Reply::ChannelFlowOk(_) => "ChannelFlowOk",
            Reply::ChannelCloseOk(_) => "ChannelCloseOk",
            Reply::ExchangeDeclareOk(_) => "ExchangeDeclareOk",
            Reply::ExchangeDeleteOk(_) => "ExchangeDeleteOk",
            Reply::ExchangeBindOk(_) => "ExchangeBindOk",
            Reply::ExchangeUnbindOk(_) => "ExchangeUnbindOk",
            Reply::QueueDeclareOk(_) => "QueueDeclareOk",
            Reply::QueueBindOk(_) => "QueueBindOk",
            Reply::QueuePurgeOk(_) => "QueuePurgeOk",
            Reply::QueueDeleteOk(_) => "QueueDeleteOk",
            Reply::QueueUnbindOk(_) => "QueueUnbindOk",
            Reply::BasicQosOk(_) => "BasicQosOk",
            Reply::BasicConsumeOk(..) => "BasicConsumeOk",
            Reply::BasicCancelOk(_) => "BasicCancelOk",
            Reply::BasicGetOk(_) => "BasicGetOk",
            Reply::BasicRecoverOk(_) => "BasicRecoverOk",
            Reply::ConfirmSelectOk(_) => "ConfirmSelectOk",
            Reply::TxSelectOk(_) => "TxSelectOk",
            Reply::TxCommitOk(_) => "TxCommitOk",
            Reply::TxRollbackOk(_) => "TxRollbackOk",
        })
    }
}

/// Main entry point for most AMQP operations: a single multiplexed channel
/// over a connection supplied by the caller (§6). Owns the state machine,
/// the RPC-over-frames engine and the publisher-confirms/consumer dispatch
/// tables; owns no socket.
#[derive(Clone)]
pub struct Channel {
    id: u16,
    status: ChannelStatus,
    acknowledgements: Acknowledgements,
    delivery_tag: IdSequence<DeliveryTag>,
    consumer_tag: IdSequence<u64>,
    returned_messages: ReturnedMessages,
    consumers: Consumers,
    frames: Frames,
    connection: Arc<dyn ConnectionHandle>,
    in_flight: Arc<Mutex<InFlight>>,
    error_sink: ErrorSink,
}

impl PartialEq for Channel {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("id", &self.id)
            .field("status", &self.status)
            .finish()
    }
}

impl Channel {
    pub fn new(id: u16, connection: Arc<dyn ConnectionHandle>) -> Self {
        Self::with_error_sink(id, connection, ErrorSink::default())
    }

    pub fn with_error_sink(
        id: u16,
        connection: Arc<dyn ConnectionHandle>,
        error_sink: ErrorSink,
    ) -> Self {
        let returned_messages = ReturnedMessages::new();
        Self {
            id,
            status: ChannelStatus::new(),
            acknowledgements: Acknowledgements::new(returned_messages.clone()),
            delivery_tag: IdSequence::new(false),
            consumer_tag: IdSequence::new(false),
            returned_messages,
            consumers: Consumers::new(),
            frames: Frames::new(),
            connection,
            in_flight: Arc::new(Mutex::new(InFlight::None)),
            error_sink,
        }
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn status(&self) -> &ChannelStatus {
        &self.status
    }

    /// The frame queue this channel writes into. The connection's write
    /// loop (outside this crate's scope) drains it with [`Frames::pop`].
    pub fn frames(&self) -> &Frames {
        &self.frames
    }

    fn wake(&self) {
        self.connection.wake();
    }

    fn ensure_open(&self) -> Result<()> {
        match self.status.state() {
            ChannelState::Connected => Ok(()),
            ChannelState::Closed | ChannelState::Error => Err(Error::ChannelClosed),
            other => Err(Error::InvalidChannelState(other)),
        }
    }

    fn set_closed(&self, error: Error) {
        self.status.set_state(ChannelState::Closed);
        self.teardown(error);
    }

    fn set_error(&self, error: Error) {
        self.status.set_state(ChannelState::Error);
        self.teardown(error);
    }

    fn teardown(&self, error: Error) {
        self.acknowledgements.on_channel_error(error.clone());
        self.consumers.cancel_all(error.clone());
        self.frames.drop_pending(error.clone());
        self.frames.clear_expected_replies(self.id, error);
    }

    fn send_method(&self, class: AMQPClass, expected_reply: Option<Reply>) {
        trace!(channel = self.id, "send_method");
        self.frames
            .push(self.id, AMQPFrame::Method(self.id, class), expected_reply);
        self.wake();
    }

    async fn rpc<T: Send + 'static>(
        &self,
        class: AMQPClass,
        make_reply: impl FnOnce(PromiseResolver<T>) -> Reply,
    ) -> Result<T> {
        self.ensure_open()?;
        debug!(channel = self.id, "rpc");
        let (promise, resolver) = Promise::new();
        self.send_method(class, Some(make_reply(resolver)));
        promise.await
    }

    // -- channel lifecycle ------------------------------------------------

    pub async fn channel_open(&self) -> Result<()> {
        if self.status.state() != ChannelState::Initial {
            return Err(Error::InvalidChannelState(self.status.state()));
        }
        let (promise, resolver) = Promise::new();
        self.send_method(
            AMQPClass::Channel(chan::AMQPMethod::Open(chan::Open {})),
            Some(Reply::ChannelOpenOk(resolver)),
        );
        promise.await
    }

    pub async fn close(&self, reply_code: ShortUInt, reply_text: &str) -> Result<()> {
        self.do_channel_close(reply_code, reply_text, 0, 0).await
    }

    async fn do_channel_close(
        &self,
        reply_code: ShortUInt,
        reply_text: &str,
        class_id: ShortUInt,
        method_id: ShortUInt,
    ) -> Result<()> {
        self.ensure_open()?;
        self.status.set_state(ChannelState::Closing);
        let (promise, resolver) = Promise::new();
        self.send_method(
            AMQPClass::Channel(chan::AMQPMethod::Close(chan::Close {
                reply_code,
                reply_text: reply_text.to_string(),
                class_id,
                method_id,
            })),
            Some(Reply::ChannelCloseOk(resolver)),
        );
        let result = promise.await;
        let error = match &result {
            Ok(()) => Error::ChannelClosed,
            Err(error) => error.clone(),
        };
        self.set_closed(error);
        result
    }

    pub async fn basic_flow(&self, active: bool) -> Result<bool> {
        self.rpc(
            AMQPClass::Channel(chan::AMQPMethod::Flow(chan::Flow { active })),
            Reply::ChannelFlowOk,
        )
        .await
    }

    // -- exchange -----------------------------------------------------------

    pub async fn exchange_declare(
        &self,
        exchange: &str,
        kind: &str,
        options: ExchangeDeclareOptions,
        arguments: FieldTable,
    ) -> Result<()> {
        self.rpc(
            AMQPClass::Exchange(exchange::AMQPMethod::Declare(exchange::Declare {
                exchange: exchange.to_string(),
                kind: kind.to_string(),
                passive: options.passive,
                durable: options.durable,
                auto_delete: options.auto_delete,
                internal: options.internal,
                nowait: options.nowait,
                arguments,
            })),
            Reply::ExchangeDeclareOk,
        )
        .await
    }

    pub async fn exchange_delete(
        &self,
        exchange: &str,
        options: ExchangeDeleteOptions,
    ) -> Result<()> {
        self.rpc(
            AMQPClass::Exchange(exchange::AMQPMethod::Delete(exchange::Delete {
                exchange: exchange.to_string(),
                if_unused: options.if_unused,
                nowait: options.nowait,
            })),
            Reply::ExchangeDeleteOk,
        )
        .await
    }

    pub async fn exchange_bind(
        &self,
        destination: &str,
        source: &str,
        routing_key: &str,
        options: ExchangeBindOptions,
        arguments: FieldTable,
    ) -> Result<()> {
        self.rpc(
            AMQPClass::Exchange(exchange::AMQPMethod::Bind(exchange::Bind {
                destination: destination.to_string(),
                source: source.to_string(),
                routing_key: routing_key.to_string(),
                nowait: options.nowait,
                arguments,
            })),
            Reply::ExchangeBindOk,
        )
        .await
    }

    pub async fn exchange_unbind(
        &self,
        destination: &str,
        source: &str,
        routing_key: &str,
        options: ExchangeUnbindOptions,
        arguments: FieldTable,
    ) -> Result<()> {
        self.rpc(
            AMQPClass::Exchange(exchange::AMQPMethod::Unbind(exchange::Unbind {
                destination: destination.to_string(),
                source: source.to_string(),
                routing_key: routing_key.to_string(),
                nowait: options.nowait,
                arguments,
            })),
            Reply::ExchangeUnbindOk,
        )
        .await
    }

    // -- queue ----------------------------------------------------------

    pub async fn queue_declare(
        &self,
        queue: &str,
        options: QueueDeclareOptions,
        arguments: FieldTable,
    ) -> Result<Queue> {
        self.rpc(
            AMQPClass::Queue(queue::AMQPMethod::Declare(queue::Declare {
                queue: queue.to_string(),
                passive: options.passive,
                durable: options.durable,
                exclusive: options.exclusive,
                auto_delete: options.auto_delete,
                nowait: options.nowait,
                arguments,
            })),
            Reply::QueueDeclareOk,
        )
        .await
    }

    pub async fn queue_bind(
        &self,
        queue: &str,
        exchange: &str,
        routing_key: &str,
        options: QueueBindOptions,
        arguments: FieldTable,
    ) -> Result<()> {
        self.rpc(
            AMQPClass::Queue(queue::AMQPMethod::Bind(queue::Bind {
                queue: queue.to_string(),
                exchange: exchange.to_string(),
                routing_key: routing_key.to_string(),
                nowait: options.nowait,
                arguments,
            })),
            Reply::QueueBindOk,
        )
        .await
    }

    pub async fn queue_unbind(
        &self,
        queue: &str,
        exchange: &str,
        routing_key: &str,
        _options: QueueUnbindOptions,
        arguments: FieldTable,
    ) -> Result<()> {
        self.rpc(
            AMQPClass::Queue(queue::AMQPMethod::Unbind(queue::Unbind {
                queue: queue.to_string(),
                exchange: exchange.to_string(),
                routing_key: routing_key.to_string(),
                arguments,
            })),
            Reply::QueueUnbindOk,
        )
        .await
    }

    pub async fn queue_purge(&self, queue: &str, options: QueuePurgeOptions) -> Result<LongUInt> {
        self.rpc(
            AMQPClass::Queue(queue::AMQPMethod::Purge(queue::Purge {
                queue: queue.to_string(),
                nowait: options.nowait,
            })),
            Reply::QueuePurgeOk,
        )
        .await
    }

    pub async fn queue_delete(
        &self,
        queue: &str,
        options: QueueDeleteOptions,
    ) -> Result<LongUInt> {
        self.rpc(
            AMQPClass::Queue(queue::AMQPMethod::Delete(queue::Delete {
                queue: queue.to_string(),
                if_unused: options.if_unused,
                if_empty: options.if_empty,
                nowait: options.nowait,
            })),
            Reply::QueueDeleteOk,
        )
        .await
    }

    // -- basic ------------------------------------------------------------

    pub async fn basic_qos(&self, prefetch_count: ShortUInt, options: BasicQosOptions) -> Result<()> {
        self.rpc(
            AMQPClass::Basic(basic::AMQPMethod::Qos(basic::Qos {
                prefetch_size: 0,
                prefetch_count,
                global: options.global,
            })),
            Reply::BasicQosOk,
        )
        .await
    }

    pub async fn basic_consume(
        &self,
        queue: &str,
        consumer_tag: &str,
        options: BasicConsumeOptions,
        arguments: FieldTable,
    ) -> Result<Consumer> {
        self.ensure_open()?;
        let tag = if consumer_tag.is_empty() {
            format!("ctag-{}-{}", self.id, self.consumer_tag.next())
        } else {
            consumer_tag.to_string()
        };
        let consumer = Consumer::new(tag.clone(), self.error_sink.clone());
        self.consumers.register(consumer.clone());

        let (promise, resolver) = Promise::new();
        self.send_method(
            AMQPClass::Basic(basic::AMQPMethod::Consume(basic::Consume {
                queue: queue.to_string(),
                consumer_tag: tag,
                no_local: options.no_local,
                no_ack: options.no_ack,
                exclusive: options.exclusive,
                nowait: options.nowait,
                arguments,
            })),
            Some(Reply::BasicConsumeOk(resolver, consumer)),
        );
        promise.await
    }

    pub async fn basic_cancel(&self, consumer_tag: &str, options: BasicCancelOptions) -> Result<()> {
        self.rpc(
            AMQPClass::Basic(basic::AMQPMethod::Cancel(basic::Cancel {
                consumer_tag: consumer_tag.to_string(),
                nowait: options.nowait,
            })),
            Reply::BasicCancelOk,
        )
        .await
    }

    pub async fn basic_get(&self, queue: &str, options: BasicGetOptions) -> Result<Option<GetMessage>> {
        self.rpc(
            AMQPClass::Basic(basic::AMQPMethod::Get(basic::Get {
                queue: queue.to_string(),
                no_ack: options.no_ack,
            })),
            Reply::BasicGetOk,
        )
        .await
    }

    pub async fn basic_publish(
        &self,
        exchange: &str,
        routing_key: &str,
        options: BasicPublishOptions,
        data: &[u8],
        properties: BasicProperties,
    ) -> Result<PublisherConfirm> {
        self.ensure_open()?;
        let publisher_confirm = if self.status.confirm() {
            Some(
                self.acknowledgements
                    .register_pending(self.delivery_tag.next()),
            )
        } else {
            None
        };

        let method = AMQPClass::Basic(basic::AMQPMethod::Publish(basic::Publish {
            exchange: exchange.to_string(),
            routing_key: routing_key.to_string(),
            mandatory: options.mandatory,
            immediate: options.immediate,
        }));
        let header = ContentHeader {
            class_id: method.class_id(),
            body_size: data.len() as u64,
            properties,
        };
        let frame_max = self.connection.frame_max() as usize;
        let mut frames = vec![
            AMQPFrame::Method(self.id, method),
            AMQPFrame::Header(self.id, 0, Box::new(header)),
        ];
        frames.extend(split_body(self.id, data, frame_max));

        self.frames.push_frames(frames).await?;
        self.wake();

        Ok(publisher_confirm.unwrap_or_else(PublisherConfirm::not_requested))
    }

    pub async fn basic_ack(&self, delivery_tag: DeliveryTag, multiple: bool) -> Result<()> {
        self.ensure_open()?;
        self.send_method(
            AMQPClass::Basic(basic::AMQPMethod::Ack(basic::Ack {
                delivery_tag,
                multiple,
            })),
            None,
        );
        Ok(())
    }

    pub async fn basic_nack(
        &self,
        delivery_tag: DeliveryTag,
        multiple: bool,
        requeue: bool,
    ) -> Result<()> {
        self.ensure_open()?;
        self.send_method(
            AMQPClass::Basic(basic::AMQPMethod::Nack(basic::Nack {
                delivery_tag,
                multiple,
                requeue,
            })),
            None,
        );
        Ok(())
    }

    pub async fn basic_reject(&self, delivery_tag: DeliveryTag, requeue: bool) -> Result<()> {
        self.ensure_open()?;
        self.send_method(
            AMQPClass::Basic(basic::AMQPMethod::Reject(basic::Reject {
                delivery_tag,
                requeue,
            })),
            None,
        );
        Ok(())
    }

    pub async fn basic_recover(&self, requeue: bool) -> Result<()> {
        self.rpc(
            AMQPClass::Basic(basic::AMQPMethod::Recover(basic::Recover { requeue })),
            Reply::BasicRecoverOk,
        )
        .await
    }

    pub async fn basic_recover_async(&self, requeue: bool) -> Result<()> {
        self.ensure_open()?;
        self.send_method(
            AMQPClass::Basic(basic::AMQPMethod::RecoverAsync(basic::RecoverAsync {
                requeue,
            })),
            None,
        );
        Ok(())
    }

    pub async fn wait_for_confirms(&self) -> Result<Vec<ReturnedMessage>> {
        if let Some(drained) = self.acknowledgements.get_last_pending() {
            trace!(channel = self.id, "waiting for pending confirms");
            drained.await?;
        }
        Ok(self.returned_messages.drain())
    }

    // -- confirm / tx -----------------------------------------------------

    pub async fn confirm_select(&self, options: ConfirmSelectOptions) -> Result<()> {
        self.rpc(
            AMQPClass::Confirm(confirm::AMQPMethod::Select(confirm::Select {
                nowait: options.nowait,
            })),
            Reply::ConfirmSelectOk,
        )
        .await
    }

    pub async fn tx_select(&self) -> Result<()> {
        self.rpc(
            AMQPClass::Tx(tx::AMQPMethod::Select(tx::Select {})),
            Reply::TxSelectOk,
        )
        .await
    }

    pub async fn tx_commit(&self) -> Result<()> {
        self.rpc(
            AMQPClass::Tx(tx::AMQPMethod::Commit(tx::Commit {})),
            Reply::TxCommitOk,
        )
        .await
    }

    pub async fn tx_rollback(&self) -> Result<()> {
        self.rpc(
            AMQPClass::Tx(tx::AMQPMethod::Rollback(tx::Rollback {})),
            Reply::TxRollbackOk,
        )
        .await
    }

    // -- inbound dispatch ---------------------------------------------------

    /// Feeds one decoded frame into the channel. Called by the external
    /// connection's read loop for every frame addressed to this channel id.
    pub fn handle_frame(&self, frame: AMQPFrame) -> Result<()> {
        let result = match frame {
            AMQPFrame::Method(_, class) => self.handle_method_frame(class),
            AMQPFrame::Header(_, _, header) => self.handle_content_header_frame(*header),
            AMQPFrame::Body(_, payload) => self.handle_body_frame(payload),
            AMQPFrame::Heartbeat(_) => Ok(()),
        };
        result.map_err(|error| self.escalate_protocol_error(error))
    }

    /// A protocol error on an inbound frame means the two sides have
    /// diverged on what frame should come next; the channel is no longer
    /// usable, so this sends `channel.close` and tears the channel down
    /// before the error reaches the caller, instead of leaving the caller to
    /// remember to close on every `Err` it sees from `handle_frame`.
    fn escalate_protocol_error(&self, error: Error) -> Error {
        if let Error::ProtocolError { code, message } = &error {
            self.send_method(
                AMQPClass::Channel(chan::AMQPMethod::Close(chan::Close {
                    reply_code: *code,
                    reply_text: message.clone(),
                    class_id: 0,
                    method_id: 0,
                })),
                None,
            );
            self.set_closed(error.clone());
        }
        error
    }

    fn next_reply(&self) -> Option<Reply> {
        self.frames.next_expected_reply(self.id)
    }

    fn handle_method_frame(&self, class: AMQPClass) -> Result<()> {
        match class {
            AMQPClass::Channel(method) => self.handle_channel_method(method),
            AMQPClass::Exchange(method) => self.handle_exchange_method(method),
            AMQPClass::Queue(method) => self.handle_queue_method(method),
            AMQPClass::Basic(method) => self.handle_basic_method(method),
            AMQPClass::Confirm(method) => self.handle_confirm_method(method),
            AMQPClass::Tx(method) => self.handle_tx_method(method),
        }
    }

    fn expect_reply<T>(&self, matches: impl FnOnce(Reply) -> std::result::Result<T, Reply>) -> Result<T> {
        match self.next_reply() {
            Some(reply) => matches(reply).map_err(|reply| {
                Error::protocol(
                    505,
                    format!("unexpected reply on channel {}: {:?}", self.id, reply),
                )
            }),
            None => Err(Error::protocol(
                505,
                format!("unexpected frame on channel {} with no pending RPC", self.id),
            )),
        }
    }

    fn handle_channel_method(&self, method: chan::AMQPMethod) -> Result<()> {
        match method {
            chan::AMQPMethod::OpenOk(_) => {
                self.status.set_state(ChannelState::Connected);
                self.expect_reply(|reply| match reply {
                    Reply::ChannelOpenOk(r) => {
                        r.swear(Ok(()));
                        Ok(())
                    }
                    other => Err(other),
                })
            }
            chan::AMQPMethod::FlowOk(m) => self.expect_reply(|reply| match reply {
                Reply::ChannelFlowOk(r) => {
                    r.swear(Ok(m.active));
                    Ok(())
                }
                other => Err(other),
            }),
            chan::AMQPMethod::CloseOk(_) => self.expect_reply(|reply| match reply {
                Reply::ChannelCloseOk(r) => {
                    r.swear(Ok(()));
                    Ok(())
                }
                other => Err(other),
            }),
            chan::AMQPMethod::Close(m) => {
                error!(
                    channel = self.id,
                    code = m.reply_code,
                    "broker closed the channel"
                );
                let error = Error::ChannelError {
                    code: m.reply_code,
                    text: m.reply_text,
                    class_id: m.class_id,
                    method_id: m.method_id,
                };
                self.send_method(
                    AMQPClass::Channel(chan::AMQPMethod::CloseOk(chan::CloseOk {})),
                    None,
                );
                self.set_closed(error);
                Ok(())
            }
            chan::AMQPMethod::Open(_) | chan::AMQPMethod::Flow(_) => Err(Error::protocol(
                503,
                "broker sent a channel method only clients should send",
            )),
        }
    }

    fn handle_exchange_method(&self, method: exchange::AMQPMethod) -> Result<()> {
        macro_rules! ok {
            ($variant:ident) => {
                self.expect_reply(|reply| match reply {
                    Reply::$variant(r) => {
                        r.swear(Ok(()));
                        Ok(())
                    }
                    other => Err(other),
                })
            };
        }
        match method {
            exchange::AMQPMethod::DeclareOk(_) => ok!(ExchangeDeclareOk),
            exchange::AMQPMethod::DeleteOk(_) => ok!(ExchangeDeleteOk),
            exchange::AMQPMethod::BindOk(_) => ok!(ExchangeBindOk),
            exchange::AMQPMethod::UnbindOk(_) => ok!(ExchangeUnbindOk),
            _ => Err(Error::protocol(
                503,
                "broker sent an exchange method only clients should send",
            )),
        }
    }

    fn handle_queue_method(&self, method: queue::AMQPMethod) -> Result<()> {
        match method {
            queue::AMQPMethod::DeclareOk(m) => self.expect_reply(|reply| match reply {
                Reply::QueueDeclareOk(r) => {
                    r.swear(Ok(Queue::new(m.queue, m.message_count, m.consumer_count)));
                    Ok(())
                }
                other => Err(other),
            }),
            queue::AMQPMethod::BindOk(_) => self.expect_reply(|reply| match reply {
                Reply::QueueBindOk(r) => {
                    r.swear(Ok(()));
                    Ok(())
                }
                other => Err(other),
            }),
            queue::AMQPMethod::UnbindOk(_) => self.expect_reply(|reply| match reply {
                Reply::QueueUnbindOk(r) => {
                    r.swear(Ok(()));
                    Ok(())
                }
                other => Err(other),
            }),
            queue::AMQPMethod::PurgeOk(m) => self.expect_reply(|reply| match reply {
                Reply::QueuePurgeOk(r) => {
                    r.swear(Ok(m.message_count));
                    Ok(())
                }
                other => Err(other),
            }),
            queue::AMQPMethod::DeleteOk(m) => self.expect_reply(|reply| match reply {
                Reply::QueueDeleteOk(r) => {
                    r.swear(Ok(m.message_count));
                    Ok(())
                }
                other => Err(other),
            }),
            _ => Err(Error::protocol(
                503,
                "broker sent a queue method only clients should send",
            )),
        }
    }

    fn handle_confirm_method(&self, method: confirm::AMQPMethod) -> Result<()> {
        match method {
            confirm::AMQPMethod::SelectOk(_) => {
                self.status.set_confirm();
                self.expect_reply(|reply| match reply {
                    Reply::ConfirmSelectOk(r) => {
                        r.swear(Ok(()));
                        Ok(())
                    }
                    other => Err(other),
                })
            }
            _ => Err(Error::protocol(
                503,
                "broker sent a confirm method only clients should send",
            )),
        }
    }

    fn handle_tx_method(&self, method: tx::AMQPMethod) -> Result<()> {
        macro_rules! ok {
            ($variant:ident) => {
                self.expect_reply(|reply| match reply {
                    Reply::$variant(r) => {
                        r.swear(Ok(()));
                        Ok(())
                    }
                    other => Err(other),
                })
            };
        }
        match method {
            tx::AMQPMethod::SelectOk(_) => ok!(TxSelectOk),
            tx::AMQPMethod::CommitOk(_) => ok!(TxCommitOk),
            tx::AMQPMethod::RollbackOk(_) => ok!(TxRollbackOk),
            _ => Err(Error::protocol(
                503,
                "broker sent a tx method only clients should send",
            )),
        }
    }

    fn handle_basic_method(&self, method: basic::AMQPMethod) -> Result<()> {
        match method {
            basic::AMQPMethod::QosOk(_) => self.expect_reply(|reply| match reply {
                Reply::BasicQosOk(r) => {
                    r.swear(Ok(()));
                    Ok(())
                }
                other => Err(other),
            }),
            basic::AMQPMethod::ConsumeOk(_) => self.expect_reply(|reply| match reply {
                Reply::BasicConsumeOk(r, consumer) => {
                    r.swear(Ok(consumer));
                    Ok(())
                }
                other => Err(other),
            }),
            basic::AMQPMethod::CancelOk(m) => {
                self.consumers.deregister(&m.consumer_tag);
                self.expect_reply(|reply| match reply {
                    Reply::BasicCancelOk(r) => {
                        r.swear(Ok(()));
                        Ok(())
                    }
                    other => Err(other),
                })
            }
            basic::AMQPMethod::Cancel(m) => {
                if let Some(consumer) = self.consumers.deregister(&m.consumer_tag) {
                    consumer.cancel();
                }
                if !m.nowait {
                    self.send_method(
                        AMQPClass::Basic(basic::AMQPMethod::CancelOk(basic::CancelOk {
                            consumer_tag: m.consumer_tag,
                        })),
                        None,
                    );
                }
                Ok(())
            }
            basic::AMQPMethod::Deliver(m) => self.begin_in_flight(
                "basic.deliver",
                InFlight::Deliver {
                    consumer_tag: m.consumer_tag,
                    delivery: Delivery::new(
                        m.delivery_tag,
                        m.exchange,
                        m.routing_key,
                        m.redelivered,
                    ),
                    remaining: 0,
                },
            ),
            basic::AMQPMethod::GetOk(m) => self.begin_in_flight(
                "basic.get-ok",
                InFlight::Get {
                    message_count: m.message_count,
                    delivery: Delivery::new(
                        m.delivery_tag,
                        m.exchange,
                        m.routing_key,
                        m.redelivered,
                    ),
                    remaining: 0,
                },
            ),
            basic::AMQPMethod::GetEmpty(_) => self.expect_reply(|reply| match reply {
                Reply::BasicGetOk(r) => {
                    r.swear(Ok(None));
                    Ok(())
                }
                other => Err(other),
            }),
            basic::AMQPMethod::Return(m) => self.begin_in_flight(
                "basic.return",
                InFlight::Return {
                    reply_code: m.reply_code,
                    reply_text: m.reply_text,
                    delivery: Delivery::new(0, m.exchange, m.routing_key, false),
                    remaining: 0,
                },
            ),
            basic::AMQPMethod::Ack(m) => self.on_basic_ack(m.delivery_tag, m.multiple),
            basic::AMQPMethod::Nack(m) => self.on_basic_nack(m.delivery_tag, m.multiple),
            basic::AMQPMethod::RecoverOk(_) => self.expect_reply(|reply| match reply {
                Reply::BasicRecoverOk(r) => {
                    r.swear(Ok(()));
                    Ok(())
                }
                other => Err(other),
            }),
            basic::AMQPMethod::Qos(_)
            | basic::AMQPMethod::Consume(_)
            | basic::AMQPMethod::Publish(_)
            | basic::AMQPMethod::Get(_)
            | basic::AMQPMethod::Reject(_)
            | basic::AMQPMethod::RecoverAsync(_)
            | basic::AMQPMethod::Recover(_) => Err(Error::protocol(
                503,
                "broker sent a basic method only clients should send",
            )),
        }
    }

    fn on_basic_ack(&self, delivery_tag: DeliveryTag, multiple: bool) -> Result<()> {
        if !self.status.confirm() {
            return Ok(());
        }
        if multiple {
            if delivery_tag > 0 {
                self.acknowledgements.ack_all_before(delivery_tag)?;
            } else {
                self.acknowledgements.ack_all_pending();
            }
        } else {
            self.acknowledgements.ack(delivery_tag)?;
        }
        Ok(())
    }

    fn on_basic_nack(&self, delivery_tag: DeliveryTag, multiple: bool) -> Result<()> {
        if !self.status.confirm() {
            return Ok(());
        }
        if multiple {
            if delivery_tag > 0 {
                self.acknowledgements.nack_all_before(delivery_tag)?;
            } else {
                self.acknowledgements.nack_all_pending();
            }
        } else {
            self.acknowledgements.nack(delivery_tag)?;
        }
        Ok(())
    }

    /// Moves the single in-flight assembly slot into a freshly announced
    /// delivery, rejecting the method if a previous delivery's content
    /// frames were still pending (§3 invariant 5: AMQP never interleaves two
    /// deliveries' frames on one channel, so a second announcement while one
    /// is still assembling means the two sides have desynced).
    fn begin_in_flight(&self, method: &'static str, next: InFlight) -> Result<()> {
        let mut in_flight = self.in_flight.lock();
        if !matches!(*in_flight, InFlight::None) {
            return Err(Error::protocol(
                505,
                format!(
                    "{method} received while a previous message's content frames were still pending"
                ),
            ));
        }
        *in_flight = next;
        Ok(())
    }

    fn handle_content_header_frame(&self, header: ContentHeader) -> Result<()> {
        let mut in_flight = self.in_flight.lock();
        match &mut *in_flight {
            InFlight::None => Err(Error::protocol(
                503,
                "content header received with no method announcing it",
            )),
            InFlight::Deliver {
                delivery, remaining, ..
            }
            | InFlight::Get {
                delivery, remaining, ..
            }
            | InFlight::Return {
                delivery, remaining, ..
            } => {
                delivery.set_properties(header.properties);
                *remaining = header.body_size as usize;
                if *remaining == 0 {
                    self.complete_in_flight(&mut in_flight)
                } else {
                    Ok(())
                }
            }
        }
    }

    fn handle_body_frame(&self, payload: Vec<u8>) -> Result<()> {
        let mut in_flight = self.in_flight.lock();
        match &mut *in_flight {
            InFlight::None => Err(Error::protocol(
                503,
                "body frame received with no content header announcing it",
            )),
            InFlight::Deliver {
                delivery, remaining, ..
            }
            | InFlight::Get {
                delivery, remaining, ..
            }
            | InFlight::Return {
                delivery, remaining, ..
            } => {
                delivery.receive_content(&payload);
                *remaining = remaining.saturating_sub(payload.len());
                if *remaining == 0 {
                    self.complete_in_flight(&mut in_flight)
                } else {
                    Ok(())
                }
            }
        }
    }

    fn complete_in_flight(&self, in_flight: &mut InFlight) -> Result<()> {
        match std::mem::take(in_flight) {
            InFlight::None => Ok(()),
            InFlight::Deliver {
                consumer_tag,
                delivery,
                ..
            } => self.consumers.deliver(&consumer_tag, delivery),
            InFlight::Get {
                message_count,
                delivery,
                ..
            } => {
                if let Some(Reply::BasicGetOk(resolver)) = self.next_reply() {
                    resolver.swear(Ok(Some(GetMessage {
                        delivery,
                        message_count,
                    })));
                } else {
                    error!(channel = self.id, "basic.get-ok completed with no pending get");
                }
                Ok(())
            }
            InFlight::Return {
                reply_code,
                reply_text,
                delivery,
                ..
            } => {
                self.returned_messages.push(ReturnedMessage {
                    delivery,
                    reply_code,
                    reply_text,
                });
                Ok(())
            }
        }
    }
}
