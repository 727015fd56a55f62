//! Frame envelope: the outermost layer of the wire format, wrapping method,
//! content-header and body payloads for multiplexing over channel numbers
//! (§4.1). The envelope is deliberately dumb -- it doesn't know what a
//! `queue.declare` looks like, only how to find where one frame ends and the
//! next begins.

pub mod codec;
pub mod protocol;

use crate::{
    frame::codec::{Reader, Writer},
    frame::protocol::AMQPClass,
    types::BasicProperties,
    Error, Result,
};
use bytes::BytesMut;

pub const FRAME_METHOD: u8 = 1;
pub const FRAME_HEADER: u8 = 2;
pub const FRAME_BODY: u8 = 3;
pub const FRAME_HEARTBEAT: u8 = 8;
pub const FRAME_END: u8 = 0xCE;

/// Bytes of header in front of a frame's payload: 1 (type) + 2 (channel) + 4
/// (size).
const HEADER_LEN: usize = 7;

/// Bytes of envelope overhead around a frame's payload: the 7-byte header
/// plus the trailing frame-end octet. `frame_max` bounds the whole frame, so
/// this is what a payload's capacity is measured against.
pub const FRAME_OVERHEAD: usize = HEADER_LEN + 1;

/// A fully-decoded AMQP frame, still holding its payload in whatever shape
/// that frame type carries it in. Channel 0 is the connection channel; every
/// other id addresses a `Channel` multiplexed over the same connection.
#[derive(Clone, Debug, PartialEq)]
pub enum AMQPFrame {
    Method(u16, AMQPClass),
    Header(u16, u16, Box<ContentHeader>),
    Body(u16, Vec<u8>),
    Heartbeat(u16),
}

impl AMQPFrame {
    pub fn channel_id(&self) -> u16 {
        match self {
            AMQPFrame::Method(channel, _) => *channel,
            AMQPFrame::Header(channel, _, _) => *channel,
            AMQPFrame::Body(channel, _) => *channel,
            AMQPFrame::Heartbeat(channel) => *channel,
        }
    }
}

/// The `content-header` frame body: class id, total body length declared up
/// front, and the `basic` properties that travel alongside it.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentHeader {
    pub class_id: u16,
    pub body_size: u64,
    pub properties: BasicProperties,
}

/// Encodes one frame into `out`, including the envelope and trailing
/// frame-end octet.
pub fn encode_frame(frame: &AMQPFrame, out: &mut BytesMut) -> Result<()> {
    let mut payload = BytesMut::new();
    let frame_type = match frame {
        AMQPFrame::Method(_, class) => {
            let mut w = Writer::new(&mut payload);
            w.write_u16(class.class_id());
            w.write_u16(class.method_id());
            class.encode(&mut w)?;
            FRAME_METHOD
        }
        AMQPFrame::Header(_, weight, header) => {
            let mut w = Writer::new(&mut payload);
            w.write_u16(header.class_id);
            w.write_u16(*weight);
            w.write_u64(header.body_size);
            w.write_properties(&header.properties)?;
            FRAME_HEADER
        }
        AMQPFrame::Body(_, data) => {
            payload.extend_from_slice(data);
            FRAME_BODY
        }
        AMQPFrame::Heartbeat(_) => FRAME_HEARTBEAT,
    };

    let mut w = Writer::new(out);
    w.write_u8(frame_type);
    w.write_u16(frame.channel_id());
    w.write_u32(payload.len() as u32);
    out.extend_from_slice(&payload);
    out.extend_from_slice(&[FRAME_END]);
    Ok(())
}

/// Attempts to decode one frame from the front of `buf`. Returns `None` (and
/// leaves `buf` untouched) when fewer bytes are available than the next
/// frame needs -- the caller owns retrying once more data has arrived.
pub fn decode_frame(buf: &[u8]) -> Result<Option<(AMQPFrame, usize)>> {
    if buf.len() < HEADER_LEN {
        return Ok(None);
    }
    let mut header = Reader::new(&buf[..HEADER_LEN]);
    let frame_type = header.read_u8()?;
    let channel = header.read_u16()?;
    let size = header.read_u32()? as usize;
    let total_len = FRAME_OVERHEAD + size;
    if buf.len() < total_len {
        return Ok(None);
    }
    let payload = &buf[HEADER_LEN..HEADER_LEN + size];
    if buf[HEADER_LEN + size] != FRAME_END {
        return Err(Error::protocol(501, "frame did not end with the expected octet"));
    }

    let mut r = Reader::new(payload);
    let frame = match frame_type {
        FRAME_METHOD => {
            let class_id = r.read_u16()?;
            let method_id = r.read_u16()?;
            AMQPFrame::Method(channel, AMQPClass::decode(class_id, method_id, &mut r)?)
        }
        FRAME_HEADER => {
            let class_id = r.read_u16()?;
            let weight = r.read_u16()?;
            let body_size = r.read_u64()?;
            let properties = r.read_properties()?;
            AMQPFrame::Header(
                channel,
                weight,
                Box::new(ContentHeader {
                    class_id,
                    body_size,
                    properties,
                }),
            )
        }
        FRAME_BODY => AMQPFrame::Body(channel, payload.to_vec()),
        FRAME_HEARTBEAT => AMQPFrame::Heartbeat(channel),
        other => {
            return Err(Error::protocol(501, format!("unknown frame type {}", other)))
        }
    };

    Ok(Some((frame, total_len)))
}

/// Splits a message body into frames no larger than `frame_max` allows,
/// mirroring the chunking the teacher's publish path performs before handing
/// frames to the connection (§4.3).
pub fn split_body(channel: u16, data: &[u8], frame_max: usize) -> Vec<AMQPFrame> {
    let max_payload = frame_max.saturating_sub(FRAME_OVERHEAD).max(1);
    data.chunks(max_payload)
        .map(|chunk| AMQPFrame::Body(channel, chunk.to_vec()))
        .collect()
}
