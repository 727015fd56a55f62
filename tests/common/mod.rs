//! In-memory broker stand-in used by the integration tests: implements
//! [`cottontail::connection::ConnectionHandle`] and, on `wake`, drains the
//! channel's outbound frame queue through a test-supplied responder that
//! feeds frames back in with [`cottontail::Channel::handle_frame`]. There is
//! no socket and no executor; every promise in this crate settles
//! synchronously once its answering frame has been handled, so a bare
//! no-op-waker poll loop is enough to drive the async API from a plain
//! `#[test]` function.

use async_trait::async_trait;
use cottontail::connection::ConnectionHandle;
use cottontail::frame::AMQPFrame;
use cottontail::{Channel, Error};
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

type Responder = dyn FnMut(AMQPFrame, &Channel) + Send;

pub struct TestBroker {
    frame_max: u32,
    channel: Mutex<Option<Channel>>,
    responder: Mutex<Box<Responder>>,
    wakes: Mutex<usize>,
    errors: Mutex<Vec<Error>>,
}

impl TestBroker {
    pub fn new(frame_max: u32) -> Arc<Self> {
        Arc::new(Self {
            frame_max,
            channel: Mutex::new(None),
            responder: Mutex::new(Box::new(|_, _| {})),
            wakes: Mutex::new(0),
            errors: Mutex::new(Vec::new()),
        })
    }

    pub fn attach(&self, channel: Channel) {
        *self.channel.lock() = Some(channel);
    }

    pub fn set_responder(&self, responder: impl FnMut(AMQPFrame, &Channel) + Send + 'static) {
        *self.responder.lock() = Box::new(responder);
    }

    pub fn wake_count(&self) -> usize {
        *self.wakes.lock()
    }

    pub fn errors(&self) -> Vec<Error> {
        self.errors.lock().clone()
    }
}

#[async_trait]
impl ConnectionHandle for TestBroker {
    fn frame_max(&self) -> u32 {
        self.frame_max
    }

    fn wake(&self) {
        *self.wakes.lock() += 1;
        let channel = match self.channel.lock().clone() {
            Some(channel) => channel,
            None => return,
        };
        let mut responder = self.responder.lock();
        while let Some(frame) = channel.frames().pop() {
            (responder)(frame, &channel);
        }
    }

    async fn report_error(&self, error: Error) {
        self.errors.lock().push(error);
    }
}

impl std::fmt::Debug for TestBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestBroker").finish()
    }
}

/// Opens a channel over a fresh [`TestBroker`], replying to `channel.open`
/// with `channel.open-ok` before handing control to the caller.
pub fn open_channel(frame_max: u32) -> (Channel, Arc<TestBroker>) {
    use cottontail::frame::protocol::{channel as chan, AMQPClass};

    // Best-effort: lets `RUST_LOG=trace cargo test -- --nocapture` show the
    // channel's tracing output. Fails silently on repeat calls across tests.
    let _ = tracing_subscriber::fmt::try_init();

    let broker = TestBroker::new(frame_max);
    let channel = Channel::new(1, broker.clone() as Arc<dyn ConnectionHandle>);
    broker.attach(channel.clone());
    broker.set_responder(|frame, channel| {
        if let AMQPFrame::Method(id, AMQPClass::Channel(chan::AMQPMethod::Open(_))) = frame {
            channel
                .handle_frame(AMQPFrame::Method(
                    id,
                    AMQPClass::Channel(chan::AMQPMethod::OpenOk(chan::OpenOk {})),
                ))
                .unwrap();
        }
    });
    block_on(channel.channel_open()).expect("channel_open");
    (channel, broker)
}

/// Answers the request/reply handshakes common to most scenarios with an
/// immediate, minimal ok. Tests that need to control timing or content of a
/// reply (delivery, return, close, nack) drive `Channel::handle_frame`
/// directly instead of going through this.
pub fn ack_handshakes(frame: AMQPFrame, channel: &Channel) {
    use cottontail::frame::protocol::{basic, confirm, exchange, queue, tx, AMQPClass};

    match frame {
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
        AMQPFrame::Method(id, AMQPClass::Exchange(exchange::AMQPMethod::Declare(_))) => {
            channel
                .handle_frame(AMQPFrame::Method(
                    id,
                    AMQPClass::Exchange(exchange::AMQPMethod::DeclareOk(exchange::DeclareOk {})),
                ))
                .unwrap();
        }
        AMQPFrame::Method(id, AMQPClass::Confirm(confirm::AMQPMethod::Select(_))) => {
            channel
                .handle_frame(AMQPFrame::Method(
                    id,
                    AMQPClass::Confirm(confirm::AMQPMethod::SelectOk(confirm::SelectOk {})),
                ))
                .unwrap();
        }
        AMQPFrame::Method(id, AMQPClass::Basic(basic::AMQPMethod::Consume(m))) => {
            channel
                .handle_frame(AMQPFrame::Method(
                    id,
                    AMQPClass::Basic(basic::AMQPMethod::ConsumeOk(basic::ConsumeOk {
                        consumer_tag: m.consumer_tag,
                    })),
                ))
                .unwrap();
        }
        AMQPFrame::Method(id, AMQPClass::Tx(tx::AMQPMethod::Select(_))) => {
            channel
                .handle_frame(AMQPFrame::Method(
                    id,
                    AMQPClass::Tx(tx::AMQPMethod::SelectOk(tx::SelectOk {})),
                ))
                .unwrap();
        }
        _ => {}
    }
}

fn noop_raw_waker() -> RawWaker {
    fn no_op(_: *const ()) {}
    fn clone(_: *const ()) -> RawWaker {
        noop_raw_waker()
    }
    const VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
    RawWaker::new(std::ptr::null(), &VTABLE)
}

/// A waker that does nothing: every future this crate hands back settles
/// synchronously inside a call this test harness already made (`wake` or
/// `handle_frame`), never from a real wakeup, so there's nothing to schedule.
pub fn noop_waker() -> Waker {
    unsafe { Waker::from_raw(noop_raw_waker()) }
}

/// Drives a future to completion without a real executor. Every future this
/// crate hands back resolves the moment its answering frame has been fed
/// through [`TestBroker::wake`], so polling in a tight loop is sufficient.
pub fn block_on<F: Future>(fut: F) -> F::Output {
    let waker = noop_waker();
    let mut cx = Context::from_waker(&waker);
    let mut fut = Box::pin(fut);
    loop {
        match Pin::as_mut(&mut fut).poll(&mut cx) {
            Poll::Ready(v) => return v,
            Poll::Pending => std::thread::yield_now(),
        }
    }
}
