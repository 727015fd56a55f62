//! A single consumer's delivery dispatch (§4.5). Grounded on the shape of
//! the teacher's `Consumer` handle (`Consumer::new(consumer_tag, ..)`,
//! registered into the channel's consumer table on `basic.consume-ok`), cut
//! down to this crate's single-threaded dispatcher instead of an executor
//! handle.

use crate::{message::DeliveryResult, ErrorSink};
use parking_lot::Mutex;
use std::{collections::VecDeque, fmt, sync::Arc};

type Delegate = Box<dyn FnMut(DeliveryResult) + Send>;

struct Inner {
    delegate: Option<Delegate>,
    /// Deliveries that arrived before a delegate was attached via
    /// [`Consumer::set_delegate`], replayed in order once one is.
    backlog: VecDeque<DeliveryResult>,
    canceled: bool,
}

/// Cheaply clonable handle returned by `basic_consume`. The channel keeps
/// its own clone in the consumer table to dispatch deliveries into.
#[derive(Clone)]
pub struct Consumer {
    tag: String,
    inner: Arc<Mutex<Inner>>,
    error_sink: ErrorSink,
}

impl Consumer {
    pub(crate) fn new(tag: String, error_sink: ErrorSink) -> Self {
        Self {
            tag,
            inner: Arc::new(Mutex::new(Inner {
                delegate: None,
                backlog: VecDeque::new(),
                canceled: false,
            })),
            error_sink,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attaches the callback deliveries are dispatched into. Anything that
    /// arrived first is replayed immediately, in order.
    pub fn set_delegate(&self, mut delegate: impl FnMut(DeliveryResult) + Send + 'static) {
        let mut inner = self.inner.lock();
        for queued in inner.backlog.drain(..) {
            delegate(queued);
        }
        inner.delegate = Some(Box::new(delegate));
    }

    pub(crate) fn dispatch(&self, result: DeliveryResult) {
        let mut inner = self.inner.lock();
        match inner.delegate.as_mut() {
            Some(delegate) => delegate(result),
            None => inner.backlog.push_back(result),
        }
    }

    pub(crate) fn cancel(&self) {
        let mut inner = self.inner.lock();
        inner.canceled = true;
        match inner.delegate.as_mut() {
            Some(delegate) => delegate(Ok(None)),
            None => inner.backlog.push_back(Ok(None)),
        }
    }

    pub(crate) fn is_canceled(&self) -> bool {
        self.inner.lock().canceled
    }

    pub(crate) fn error_sink(&self) -> &ErrorSink {
        &self.error_sink
    }
}

impl fmt::Debug for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer").field("tag", &self.tag).finish()
    }
}
