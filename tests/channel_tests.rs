//! End-to-end scenarios driven against an in-memory broker stand-in. Each
//! test owns its own channel and responder; nothing here touches a socket.

mod common;

use common::{ack_handshakes, block_on, noop_waker, open_channel};
use cottontail::frame::protocol::{basic, channel as chan, queue, AMQPClass};
use cottontail::frame::{AMQPFrame, ContentHeader};
use cottontail::options::{BasicConsumeOptions, BasicPublishOptions, QueueDeclareOptions};
use cottontail::{channel_status::ChannelState, BasicProperties, Confirmation, Error};
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

#[test]
fn declare_publish_consume_delivers_to_the_registered_callback() {
    let (channel, broker) = open_channel(4096);

    let consumer_tag = Arc::new(Mutex::new(String::new()));
    {
        let consumer_tag = consumer_tag.clone();
        broker.set_responder(move |frame, channel| match frame {
            AMQPFrame::Method(id, AMQPClass::Queue(queue::AMQPMethod::Declare(m))) => {
                channel
                    .handle_frame(AMQPFrame::Method(
                        id,
                        AMQPClass::Queue(queue::AMQPMethod::DeclareOk(queue::DeclareOk {
                            queue: m.queue,
                            message_count: 0,
                            consumer_count: 0,
                        })),
                    ))
                    .unwrap();
            }
            AMQPFrame::Method(id, AMQPClass::Basic(basic::AMQPMethod::Consume(m))) => {
                *consumer_tag.lock() = m.consumer_tag.clone();
                channel
                    .handle_frame(AMQPFrame::Method(
                        id,
                        AMQPClass::Basic(basic::AMQPMethod::ConsumeOk(basic::ConsumeOk {
                            consumer_tag: m.consumer_tag,
                        })),
                    ))
                    .unwrap();
            }
            // Echo the publish straight back as the delivery it produced: the
            // outgoing method/header/body for a publish are exactly what a
            // broker would hand back to a consumer bound to that queue.
            AMQPFrame::Method(id, AMQPClass::Basic(basic::AMQPMethod::Publish(m))) => {
                let tag = consumer_tag.lock().clone();
                channel
                    .handle_frame(AMQPFrame::Method(
                        id,
                        AMQPClass::Basic(basic::AMQPMethod::Deliver(basic::Deliver {
                            consumer_tag: tag,
                            delivery_tag: 1,
                            redelivered: false,
                            exchange: m.exchange,
                            routing_key: m.routing_key,
                        })),
                    ))
                    .unwrap();
            }
            AMQPFrame::Header(id, weight, header) => {
                channel
                    .handle_frame(AMQPFrame::Header(id, weight, header))
                    .unwrap();
            }
            AMQPFrame::Body(id, data) => {
                channel.handle_frame(AMQPFrame::Body(id, data)).unwrap();
            }
            _ => {}
        });
    }

    let queue = block_on(channel.queue_declare(
        "q",
        QueueDeclareOptions {
            durable: true,
            ..Default::default()
        },
        Default::default(),
    ))
    .expect("queue_declare");
    assert_eq!(queue.name(), "q");
    assert_eq!(queue.message_count(), 0);
    assert_eq!(queue.consumer_count(), 0);

    let consumer = block_on(channel.basic_consume(
        "q",
        "",
        BasicConsumeOptions {
            no_ack: true,
            ..Default::default()
        },
        Default::default(),
    ))
    .expect("basic_consume");

    let received = Arc::new(Mutex::new(None));
    {
        let received = received.clone();
        consumer.set_delegate(move |delivery| {
            *received.lock() = Some(delivery);
        });
    }

    block_on(channel.basic_publish(
        "",
        "q",
        BasicPublishOptions::default(),
        b"hello",
        BasicProperties::default(),
    ))
    .expect("basic_publish");

    let delivery = received
        .lock()
        .take()
        .expect("delegate was invoked")
        .expect("delivery was ok")
        .expect("delivery was Some, not a cancellation");
    assert_eq!(delivery.data, b"hello".to_vec());
    assert_eq!(delivery.routing_key, "q");
    assert_eq!(delivery.exchange, "");
    assert!(broker.wake_count() > 0);
}

#[test]
fn confirms_batched_ack_resolves_all_three_in_order() {
    let (channel, broker) = open_channel(4096);
    broker.set_responder(ack_handshakes);

    block_on(channel.confirm_select(Default::default())).expect("confirm_select");

    let c1 = block_on(channel.basic_publish(
        "",
        "q",
        Default::default(),
        b"a",
        Default::default(),
    ))
    .expect("publish a");
    let c2 = block_on(channel.basic_publish(
        "",
        "q",
        Default::default(),
        b"b",
        Default::default(),
    ))
    .expect("publish b");
    let c3 = block_on(channel.basic_publish(
        "",
        "q",
        Default::default(),
        b"c",
        Default::default(),
    ))
    .expect("publish c");

    channel
        .handle_frame(AMQPFrame::Method(
            1,
            AMQPClass::Basic(basic::AMQPMethod::Ack(basic::Ack {
                delivery_tag: 3,
                multiple: true,
            })),
        ))
        .expect("handle ack");

    assert_eq!(block_on(c1).expect("c1 acked"), Confirmation::Ack);
    assert_eq!(block_on(c2).expect("c2 acked"), Confirmation::Ack);
    assert_eq!(block_on(c3).expect("c3 acked"), Confirmation::Ack);
}

#[test]
fn nack_one_rejects_only_the_nacked_publish() {
    let (channel, broker) = open_channel(4096);
    broker.set_responder(ack_handshakes);

    block_on(channel.confirm_select(Default::default())).expect("confirm_select");

    let m1 = block_on(channel.basic_publish(
        "",
        "q",
        Default::default(),
        b"m1",
        Default::default(),
    ))
    .expect("publish m1");
    let m2 = block_on(channel.basic_publish(
        "",
        "q",
        Default::default(),
        b"m2",
        Default::default(),
    ))
    .expect("publish m2");

    channel
        .handle_frame(AMQPFrame::Method(
            1,
            AMQPClass::Basic(basic::AMQPMethod::Nack(basic::Nack {
                delivery_tag: 2,
                multiple: false,
                requeue: false,
            })),
        ))
        .expect("handle nack");
    channel
        .handle_frame(AMQPFrame::Method(
            1,
            AMQPClass::Basic(basic::AMQPMethod::Ack(basic::Ack {
                delivery_tag: 1,
                multiple: false,
            })),
        ))
        .expect("handle ack");

    assert_eq!(block_on(m1).expect("m1 acked"), Confirmation::Ack);
    assert!(matches!(block_on(m2), Err(Error::PublishNacked)));
}

#[test]
fn large_body_splits_into_frame_max_bounded_chunks() {
    let (channel, broker) = open_channel(4096);

    let captured = Arc::new(Mutex::new(Vec::new()));
    {
        let captured = captured.clone();
        broker.set_responder(move |frame, _channel| captured.lock().push(frame));
    }

    let body = vec![0x42u8; 10000];
    block_on(channel.basic_publish(
        "",
        "q",
        Default::default(),
        &body,
        Default::default(),
    ))
    .expect("basic_publish");

    let bodies: Vec<Vec<u8>> = captured
        .lock()
        .iter()
        .filter_map(|frame| match frame {
            AMQPFrame::Body(_, data) => Some(data.clone()),
            _ => None,
        })
        .collect();

    assert_eq!(
        bodies.iter().map(Vec::len).collect::<Vec<_>>(),
        vec![4088, 4088, 1824]
    );
    let reassembled: Vec<u8> = bodies.into_iter().flatten().collect();
    assert_eq!(reassembled, body);
}

#[test]
fn server_channel_close_rejects_pending_rpc_and_replies_close_ok() {
    let (channel, broker) = open_channel(4096);

    let captured = Arc::new(Mutex::new(Vec::new()));
    {
        let captured = captured.clone();
        broker.set_responder(move |frame, _channel| captured.lock().push(frame));
    }

    // Poll the RPC once so it sends `queue.declare` and parks on the reply,
    // without a reply ever arriving for it.
    let waker = noop_waker();
    let mut cx = Context::from_waker(&waker);
    let mut pending = Box::pin(channel.queue_declare("q", Default::default(), Default::default()));
    assert!(matches!(Pin::as_mut(&mut pending).poll(&mut cx), Poll::Pending));

    channel
        .handle_frame(AMQPFrame::Method(
            1,
            AMQPClass::Channel(chan::AMQPMethod::Close(chan::Close {
                reply_code: 404,
                reply_text: "NOT_FOUND".to_string(),
                class_id: 50,
                method_id: 10,
            })),
        ))
        .expect("handle close");

    let result = match Pin::as_mut(&mut pending).poll(&mut cx) {
        Poll::Ready(result) => result,
        Poll::Pending => panic!("queue_declare should have settled once the channel closed"),
    };
    assert!(matches!(
        result,
        Err(Error::ChannelError {
            code: 404,
            class_id: 50,
            method_id: 10,
            ..
        })
    ));
    assert_eq!(channel.status().state(), ChannelState::Closed);

    let sent_close_ok = captured.lock().iter().any(|frame| {
        matches!(
            frame,
            AMQPFrame::Method(_, AMQPClass::Channel(chan::AMQPMethod::CloseOk(_)))
        )
    });
    assert!(sent_close_ok, "channel should reply with channel.close-ok");
}

#[test]
fn overlapping_delivery_before_prior_body_completes_closes_the_channel() {
    let (channel, broker) = open_channel(4096);
    broker.set_responder(ack_handshakes);

    block_on(channel.basic_consume(
        "q",
        "ctag-1",
        BasicConsumeOptions::default(),
        Default::default(),
    ))
    .expect("basic_consume");

    channel
        .handle_frame(AMQPFrame::Method(
            1,
            AMQPClass::Basic(basic::AMQPMethod::Deliver(basic::Deliver {
                consumer_tag: "ctag-1".to_string(),
                delivery_tag: 1,
                redelivered: false,
                exchange: "".to_string(),
                routing_key: "q".to_string(),
            })),
        ))
        .expect("first deliver method");
    channel
        .handle_frame(AMQPFrame::Header(
            1,
            0,
            Box::new(ContentHeader {
                class_id: 60,
                body_size: 5,
                properties: BasicProperties::default(),
            }),
        ))
        .expect("first deliver header, body still pending");

    // A second `basic.deliver` arrives before the first one's 5-byte body
    // was ever sent: the broker and this channel have desynced.
    let result = channel.handle_frame(AMQPFrame::Method(
        1,
        AMQPClass::Basic(basic::AMQPMethod::Deliver(basic::Deliver {
            consumer_tag: "ctag-1".to_string(),
            delivery_tag: 2,
            redelivered: false,
            exchange: "".to_string(),
            routing_key: "q".to_string(),
        })),
    ));

    assert!(matches!(
        result,
        Err(Error::ProtocolError { code: 505, .. })
    ));
    assert_eq!(channel.status().state(), ChannelState::Closed);
}

#[test]
fn delivery_for_unregistered_consumer_tag_closes_the_channel() {
    let (channel, broker) = open_channel(4096);
    broker.set_responder(ack_handshakes);

    channel
        .handle_frame(AMQPFrame::Method(
            1,
            AMQPClass::Basic(basic::AMQPMethod::Deliver(basic::Deliver {
                consumer_tag: "no-such-consumer".to_string(),
                delivery_tag: 1,
                redelivered: false,
                exchange: "".to_string(),
                routing_key: "q".to_string(),
            })),
        ))
        .expect("deliver method");

    let result = channel.handle_frame(AMQPFrame::Header(
        1,
        0,
        Box::new(ContentHeader {
            class_id: 60,
            body_size: 0,
            properties: BasicProperties::default(),
        }),
    ));

    assert!(matches!(
        result,
        Err(Error::ProtocolError { code: 505, .. })
    ));
    assert_eq!(channel.status().state(), ChannelState::Closed);
}

#[test]
fn returned_mandatory_publish_invokes_return_handler_once() {
    let (channel, broker) = open_channel(4096);
    broker.set_responder(ack_handshakes);

    block_on(channel.confirm_select(Default::default())).expect("confirm_select");

    let confirm = block_on(channel.basic_publish(
        "unroutable-exchange",
        "nowhere",
        BasicPublishOptions {
            mandatory: true,
            ..Default::default()
        },
        b"body",
        Default::default(),
    ))
    .expect("basic_publish");

    channel
        .handle_frame(AMQPFrame::Method(
            1,
            AMQPClass::Basic(basic::AMQPMethod::Return(basic::Return {
                reply_code: 312,
                reply_text: "NO_ROUTE".to_string(),
                exchange: "unroutable-exchange".to_string(),
                routing_key: "nowhere".to_string(),
            })),
        ))
        .expect("handle return");
    channel
        .handle_frame(AMQPFrame::Header(
            1,
            0,
            Box::new(ContentHeader {
                class_id: 60,
                body_size: 4,
                properties: BasicProperties::default(),
            }),
        ))
        .expect("handle header");
    channel
        .handle_frame(AMQPFrame::Body(1, b"body".to_vec()))
        .expect("handle body");

    channel
        .handle_frame(AMQPFrame::Method(
            1,
            AMQPClass::Basic(basic::AMQPMethod::Ack(basic::Ack {
                delivery_tag: 1,
                multiple: false,
            })),
        ))
        .expect("handle ack");

    assert_eq!(block_on(confirm).expect("publish acked"), Confirmation::Ack);

    let returned = block_on(channel.wait_for_confirms()).expect("wait_for_confirms");
    assert_eq!(returned.len(), 1);
    assert_eq!(returned[0].delivery.data, b"body".to_vec());
    assert_eq!(returned[0].reply_code, 312);
}
