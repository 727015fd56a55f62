//! Primitive readers/writers for the AMQP 0-9-1 data grammar (§4.1): short
//! and long strings, field tables, and the typed values they carry. Built on
//! `bytes` the way the rest of the Rust AMQP ecosystem does it, rather than
//! hand-rolling cursor arithmetic.

use crate::{
    types::{AMQPDecimal, AMQPValue, BasicProperties, FieldTable, SHORT_STRING_MAX_LEN},
    Error, Result,
};
use bytes::{Buf, BufMut, BytesMut};

/// A cursor over a borrowed frame payload. Every `read_*` call advances the
/// cursor and fails with [`Error::ProtocolError`] rather than panicking when
/// the buffer is short -- a malformed frame must never crash the driver.
pub struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    pub fn rest(&self) -> &'a [u8] {
        self.buf
    }

    fn need(&self, n: usize) -> Result<()> {
        if self.buf.remaining() < n {
            Err(Error::protocol(501, "frame payload truncated"))
        } else {
            Ok(())
        }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.need(1)?;
        Ok(self.buf.get_u8())
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.need(1)?;
        Ok(self.buf.get_i8())
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.need(2)?;
        Ok(self.buf.get_u16())
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.need(2)?;
        Ok(self.buf.get_i16())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.need(4)?;
        Ok(self.buf.get_u32())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.need(4)?;
        Ok(self.buf.get_i32())
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.need(8)?;
        Ok(self.buf.get_u64())
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.need(8)?;
        Ok(self.buf.get_i64())
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.need(4)?;
        Ok(self.buf.get_f32())
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.need(8)?;
        Ok(self.buf.get_f64())
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.need(len)?;
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    pub fn read_shortstr(&mut self) -> Result<String> {
        let len = self.read_u8()? as usize;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| Error::protocol(502, "short string is not valid UTF-8"))
    }

    pub fn read_longstr(&mut self) -> Result<Vec<u8>> {
        let len = self.read_u32()? as usize;
        Ok(self.read_bytes(len)?.to_vec())
    }

    pub fn read_table(&mut self) -> Result<FieldTable> {
        let len = self.read_u32()? as usize;
        let bytes = self.read_bytes(len)?;
        let mut inner = Reader::new(bytes);
        let mut table = FieldTable::new();
        while inner.remaining() > 0 {
            let key = inner.read_shortstr()?;
            let value = inner.read_value()?;
            table.insert(key, value);
        }
        Ok(table)
    }

    pub fn read_value(&mut self) -> Result<AMQPValue> {
        let tag = self.read_u8()?;
        match tag {
            b't' => Ok(AMQPValue::Boolean(self.read_bool()?)),
            b'b' => Ok(AMQPValue::ShortShortInt(self.read_i8()?)),
            b'B' => Ok(AMQPValue::ShortShortUInt(self.read_u8()?)),
            b's' => Ok(AMQPValue::ShortInt(self.read_i16()?)),
            b'u' => Ok(AMQPValue::ShortUInt(self.read_u16()?)),
            b'I' => Ok(AMQPValue::LongUInt(self.read_u32()?)),
            b'i' => Ok(AMQPValue::LongInt(self.read_i32()?)),
            b'l' => Ok(AMQPValue::LongLongInt(self.read_i64()?)),
            b'f' => Ok(AMQPValue::Float(self.read_f32()?)),
            b'd' => Ok(AMQPValue::Double(self.read_f64()?)),
            b'D' => {
                let scale = self.read_u8()?;
                let value = self.read_u32()?;
                Ok(AMQPValue::Decimal(AMQPDecimal { scale, value }))
            }
            b'S' => {
                let bytes = self.read_longstr()?;
                String::from_utf8(bytes)
                    .map(AMQPValue::LongString)
                    .map_err(|_| Error::protocol(502, "long string is not valid UTF-8"))
            }
            b'A' => {
                let len = self.read_u32()? as usize;
                let bytes = self.read_bytes(len)?;
                let mut inner = Reader::new(bytes);
                let mut values = Vec::new();
                while inner.remaining() > 0 {
                    values.push(inner.read_value()?);
                }
                Ok(AMQPValue::FieldArray(values))
            }
            b'T' => Ok(AMQPValue::Timestamp(self.read_u64()?)),
            b'F' => Ok(AMQPValue::FieldTable(self.read_table()?)),
            b'V' => Ok(AMQPValue::Void),
            other => Err(Error::protocol(
                503,
                format!("unknown field table type tag '{}'", other as char),
            )),
        }
    }

    pub fn read_properties(&mut self) -> Result<BasicProperties> {
        let flags = self.read_u16()?;
        let mut properties = BasicProperties::default();
        if flags & (1 << 15) != 0 {
            properties.content_type = Some(self.read_shortstr()?);
        }
        if flags & (1 << 14) != 0 {
            properties.content_encoding = Some(self.read_shortstr()?);
        }
        if flags & (1 << 13) != 0 {
            properties.headers = Some(self.read_table()?);
        }
        if flags & (1 << 12) != 0 {
            properties.delivery_mode = Some(self.read_u8()?);
        }
        if flags & (1 << 11) != 0 {
            properties.priority = Some(self.read_u8()?);
        }
        if flags & (1 << 10) != 0 {
            properties.correlation_id = Some(self.read_shortstr()?);
        }
        if flags & (1 << 9) != 0 {
            properties.reply_to = Some(self.read_shortstr()?);
        }
        if flags & (1 << 8) != 0 {
            properties.expiration = Some(self.read_shortstr()?);
        }
        if flags & (1 << 7) != 0 {
            properties.message_id = Some(self.read_shortstr()?);
        }
        if flags & (1 << 6) != 0 {
            properties.timestamp = Some(self.read_u64()?);
        }
        if flags & (1 << 5) != 0 {
            properties.kind = Some(self.read_shortstr()?);
        }
        if flags & (1 << 4) != 0 {
            properties.user_id = Some(self.read_shortstr()?);
        }
        if flags & (1 << 3) != 0 {
            properties.app_id = Some(self.read_shortstr()?);
        }
        if flags & (1 << 2) != 0 {
            properties.cluster_id = Some(self.read_shortstr()?);
        }
        Ok(properties)
    }
}

/// Writes into a reusable per-channel scratch buffer (§9 design notes): the
/// publisher overwrites it for every `basic.publish`, so a publish must
/// finish writing before another one starts on the same channel.
pub struct Writer<'a> {
    buf: &'a mut BytesMut,
}

impl<'a> Writer<'a> {
    pub fn new(buf: &'a mut BytesMut) -> Self {
        Self { buf }
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.put_u8(v);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.put_u8(v as u8);
    }

    pub fn write_i8(&mut self, v: i8) {
        self.buf.put_i8(v);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.put_u16(v);
    }

    pub fn write_i16(&mut self, v: i16) {
        self.buf.put_i16(v);
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.put_u32(v);
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.put_i32(v);
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.put_u64(v);
    }

    pub fn write_i64(&mut self, v: i64) {
        self.buf.put_i64(v);
    }

    pub fn write_f32(&mut self, v: f32) {
        self.buf.put_f32(v);
    }

    pub fn write_f64(&mut self, v: f64) {
        self.buf.put_f64(v);
    }

    pub fn write_shortstr(&mut self, v: &str) -> Result<()> {
        if v.len() > SHORT_STRING_MAX_LEN {
            return Err(Error::EncodingError(format!(
                "short string of {} bytes exceeds the {} byte limit",
                v.len(),
                SHORT_STRING_MAX_LEN
            )));
        }
        self.write_u8(v.len() as u8);
        self.buf.put_slice(v.as_bytes());
        Ok(())
    }

    pub fn write_longstr(&mut self, v: &[u8]) {
        self.write_u32(v.len() as u32);
        self.buf.put_slice(v);
    }

    pub fn write_table(&mut self, table: &FieldTable) -> Result<()> {
        // Length is unknown until the body is written, so encode into a
        // scratch buffer first and splice the length prefix in front.
        let mut body = BytesMut::new();
        {
            let mut inner = Writer::new(&mut body);
            for (key, value) in table {
                inner.write_shortstr(key)?;
                inner.write_value(value)?;
            }
        }
        self.write_u32(body.len() as u32);
        self.buf.put_slice(&body);
        Ok(())
    }

    pub fn write_value(&mut self, value: &AMQPValue) -> Result<()> {
        match value {
            AMQPValue::Boolean(v) => {
                self.write_u8(b't');
                self.write_bool(*v);
            }
            AMQPValue::ShortShortInt(v) => {
                self.write_u8(b'b');
                self.write_i8(*v);
            }
            AMQPValue::ShortShortUInt(v) => {
                self.write_u8(b'B');
                self.write_u8(*v);
            }
            AMQPValue::ShortInt(v) => {
                self.write_u8(b's');
                self.write_i16(*v);
            }
            AMQPValue::ShortUInt(v) => {
                self.write_u8(b'u');
                self.write_u16(*v);
            }
            AMQPValue::LongUInt(v) => {
                self.write_u8(b'I');
                self.write_u32(*v);
            }
            AMQPValue::LongInt(v) => {
                self.write_u8(b'i');
                self.write_i32(*v);
            }
            AMQPValue::LongLongInt(v) => {
                self.write_u8(b'l');
                self.write_i64(*v);
            }
            AMQPValue::Float(v) => {
                self.write_u8(b'f');
                self.write_f32(*v);
            }
            AMQPValue::Double(v) => {
                self.write_u8(b'd');
                self.write_f64(*v);
            }
            AMQPValue::Decimal(d) => {
                self.write_u8(b'D');
                self.write_u8(d.scale);
                self.write_u32(d.value);
            }
            AMQPValue::LongString(s) => {
                self.write_u8(b'S');
                self.write_longstr(s.as_bytes());
            }
            AMQPValue::FieldArray(values) => {
                self.write_u8(b'A');
                let mut body = BytesMut::new();
                {
                    let mut inner = Writer::new(&mut body);
                    for v in values {
                        inner.write_value(v)?;
                    }
                }
                self.write_u32(body.len() as u32);
                self.buf.put_slice(&body);
            }
            AMQPValue::Timestamp(v) => {
                self.write_u8(b'T');
                self.write_u64(*v);
            }
            AMQPValue::FieldTable(t) => {
                self.write_u8(b'F');
                self.write_table(t)?;
            }
            AMQPValue::Void => {
                self.write_u8(b'V');
            }
        }
        Ok(())
    }

    pub fn write_properties(&mut self, properties: &BasicProperties) -> Result<()> {
        let mut flags = 0u16;
        if properties.content_type.is_some() {
            flags |= 1 << 15;
        }
        if properties.content_encoding.is_some() {
            flags |= 1 << 14;
        }
        if properties.headers.is_some() {
            flags |= 1 << 13;
        }
        if properties.delivery_mode.is_some() {
            flags |= 1 << 12;
        }
        if properties.priority.is_some() {
            flags |= 1 << 11;
        }
        if properties.correlation_id.is_some() {
            flags |= 1 << 10;
        }
        if properties.reply_to.is_some() {
            flags |= 1 << 9;
        }
        if properties.expiration.is_some() {
            flags |= 1 << 8;
        }
        if properties.message_id.is_some() {
            flags |= 1 << 7;
        }
        if properties.timestamp.is_some() {
            flags |= 1 << 6;
        }
        if properties.kind.is_some() {
            flags |= 1 << 5;
        }
        if properties.user_id.is_some() {
            flags |= 1 << 4;
        }
        if properties.app_id.is_some() {
            flags |= 1 << 3;
        }
        if properties.cluster_id.is_some() {
            flags |= 1 << 2;
        }
        self.write_u16(flags);

        if let Some(v) = &properties.content_type {
            self.write_shortstr(v)?;
        }
        if let Some(v) = &properties.content_encoding {
            self.write_shortstr(v)?;
        }
        if let Some(v) = &properties.headers {
            self.write_table(v)?;
        }
        if let Some(v) = properties.delivery_mode {
            self.write_u8(v);
        }
        if let Some(v) = properties.priority {
            self.write_u8(v);
        }
        if let Some(v) = &properties.correlation_id {
            self.write_shortstr(v)?;
        }
        if let Some(v) = &properties.reply_to {
            self.write_shortstr(v)?;
        }
        if let Some(v) = &properties.expiration {
            self.write_shortstr(v)?;
        }
        if let Some(v) = &properties.message_id {
            self.write_shortstr(v)?;
        }
        if let Some(v) = properties.timestamp {
            self.write_u64(v);
        }
        if let Some(v) = &properties.kind {
            self.write_shortstr(v)?;
        }
        if let Some(v) = &properties.user_id {
            self.write_shortstr(v)?;
        }
        if let Some(v) = &properties.app_id {
            self.write_shortstr(v)?;
        }
        if let Some(v) = &properties.cluster_id {
            self.write_shortstr(v)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AMQPDecimal;

    fn round_trip_value(value: AMQPValue) {
        let mut buf = BytesMut::new();
        Writer::new(&mut buf).write_value(&value).unwrap();
        let decoded = Reader::new(&buf).read_value().unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn value_round_trips_every_type_tag() {
        round_trip_value(AMQPValue::Boolean(true));
        round_trip_value(AMQPValue::ShortShortInt(-12));
        round_trip_value(AMQPValue::ShortShortUInt(200));
        round_trip_value(AMQPValue::ShortInt(-1000));
        round_trip_value(AMQPValue::ShortUInt(50000));
        round_trip_value(AMQPValue::LongUInt(u32::MAX));
        round_trip_value(AMQPValue::LongInt(i32::MIN));
        round_trip_value(AMQPValue::LongLongInt(i64::MIN));
        round_trip_value(AMQPValue::Float(1.5));
        round_trip_value(AMQPValue::Double(2.5));
        round_trip_value(AMQPValue::Decimal(AMQPDecimal { scale: 2, value: 12345 }));
        round_trip_value(AMQPValue::LongString("a longer string value".into()));
        round_trip_value(AMQPValue::FieldArray(vec![
            AMQPValue::Boolean(false),
            AMQPValue::LongUInt(7),
        ]));
        round_trip_value(AMQPValue::Timestamp(1_700_000_000));
        round_trip_value(AMQPValue::Void);
    }

    #[test]
    fn table_round_trips_through_a_nested_field_table_value() {
        let mut inner = FieldTable::new();
        inner.insert("x-match".to_string(), AMQPValue::LongString("all".into()));
        inner.insert("count".to_string(), AMQPValue::LongUInt(3));

        let mut table = FieldTable::new();
        table.insert("headers".to_string(), AMQPValue::FieldTable(inner));
        table.insert("present".to_string(), AMQPValue::Boolean(true));

        let mut buf = BytesMut::new();
        Writer::new(&mut buf).write_table(&table).unwrap();
        let decoded = Reader::new(&buf).read_table().unwrap();
        assert_eq!(decoded, table);
    }

    #[test]
    fn properties_round_trip_with_a_sparse_presence_mask() {
        let mut headers = FieldTable::new();
        headers.insert("x-retry".to_string(), AMQPValue::LongUInt(2));

        let properties = BasicProperties {
            content_type: Some("application/json".to_string()),
            delivery_mode: Some(2),
            headers: Some(headers),
            message_id: Some("msg-1".to_string()),
            ..BasicProperties::default()
        };

        let mut buf = BytesMut::new();
        Writer::new(&mut buf).write_properties(&properties).unwrap();
        let decoded = Reader::new(&buf).read_properties().unwrap();
        assert_eq!(decoded, properties);
    }

    #[test]
    fn properties_round_trip_when_entirely_empty() {
        let properties = BasicProperties::default();
        let mut buf = BytesMut::new();
        Writer::new(&mut buf).write_properties(&properties).unwrap();
        // Two bytes of presence flags, all zero, nothing else.
        assert_eq!(buf.len(), 2);
        let decoded = Reader::new(&buf).read_properties().unwrap();
        assert_eq!(decoded, properties);
    }

    #[test]
    fn shortstr_rejects_a_string_over_the_255_byte_limit() {
        let mut buf = BytesMut::new();
        let oversized = "x".repeat(SHORT_STRING_MAX_LEN + 1);
        assert!(Writer::new(&mut buf).write_shortstr(&oversized).is_err());
    }

    #[test]
    fn unknown_type_tag_is_a_protocol_error_not_a_panic() {
        let mut buf = BytesMut::new();
        buf.extend_from_slice(b"?");
        assert!(Reader::new(&buf).read_value().is_err());
    }
}
