use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{PackError, codes};

use super::marker;

/// `MessageWriter` 将高层值按线缆子集顺序写出为字节流。
///
/// # 设计背景（Why）
/// - 序列化侧只需要顺序追加：nil、布尔、整数、字符串与数组头；
///   借助 `bytes::BytesMut` 的扩容策略即可获得稳定的摊还性能。
/// - 与读取侧对称：写出的每个标记都能被 [`MessageReader`](super::MessageReader)
///   无歧义地还原。
///
/// # 契约说明（What）
/// - **后置条件**：整数一律选择能容纳该值的最短编码，保证同一逻辑值
///   的编码字节稳定，从而支撑“重新编码逐字节相等”的回归断言。
/// - 数组长度超出 `u32::MAX` 属于线缆格式不可表达的输入，返回
///   `wire.overflow` 而非截断。
#[derive(Debug, Default)]
pub struct MessageWriter {
    buf: BytesMut,
}

impl MessageWriter {
    /// 创建空写出器。
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
        }
    }

    /// 以给定初始容量创建写出器，适合已知负载规模的场景。
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// 写出 nil 哨兵。
    pub fn write_nil(&mut self) {
        self.buf.put_u8(marker::NIL);
    }

    /// 写出布尔值。
    pub fn write_bool(&mut self, value: bool) {
        self.buf
            .put_u8(if value { marker::TRUE } else { marker::FALSE });
    }

    /// 写出无符号整数，自动选择最短编码。
    pub fn write_uint(&mut self, value: u64) {
        if value <= u64::from(marker::POS_FIXINT_MAX) {
            self.buf.put_u8(value as u8);
        } else if value <= u64::from(u8::MAX) {
            self.buf.put_u8(marker::UINT8);
            self.buf.put_u8(value as u8);
        } else if value <= u64::from(u16::MAX) {
            self.buf.put_u8(marker::UINT16);
            self.buf.put_u16(value as u16);
        } else if value <= u64::from(u32::MAX) {
            self.buf.put_u8(marker::UINT32);
            self.buf.put_u32(value as u32);
        } else {
            self.buf.put_u8(marker::UINT64);
            self.buf.put_u64(value);
        }
    }

    /// 写出有符号整数。
    ///
    /// 非负值复用无符号编码族，负值按幅度选择最短的有符号编码；
    /// 两侧约定一致后，读取器可以在 `i64` 范围内无损还原。
    pub fn write_int(&mut self, value: i64) {
        if value >= 0 {
            self.write_uint(value as u64);
        } else if value >= -32 {
            self.buf.put_u8(value as u8);
        } else if value >= i64::from(i8::MIN) {
            self.buf.put_u8(marker::INT8);
            self.buf.put_i8(value as i8);
        } else if value >= i64::from(i16::MIN) {
            self.buf.put_u8(marker::INT16);
            self.buf.put_i16(value as i16);
        } else if value >= i64::from(i32::MIN) {
            self.buf.put_u8(marker::INT32);
            self.buf.put_i32(value as i32);
        } else {
            self.buf.put_u8(marker::INT64);
            self.buf.put_i64(value);
        }
    }

    /// 写出数组头（仅元素个数，元素本体由调用方继续写出）。
    pub fn write_array_header(&mut self, len: usize) -> crate::Result<(), PackError> {
        if len <= 0x0f {
            self.buf.put_u8(marker::FIXARRAY_BASE | len as u8);
        } else if len <= usize::from(u16::MAX) {
            self.buf.put_u8(marker::ARRAY16);
            self.buf.put_u16(len as u16);
        } else {
            let len = u32::try_from(len).map_err(|_| {
                PackError::new(
                    codes::WIRE_OVERFLOW,
                    "array length exceeds wire format capacity (u32::MAX)",
                )
            })?;
            self.buf.put_u8(marker::ARRAY32);
            self.buf.put_u32(len);
        }
        Ok(())
    }

    /// 写出 UTF-8 字符串（标记 + 长度 + 负载）。
    pub fn write_str(&mut self, value: &str) -> crate::Result<(), PackError> {
        let bytes = value.as_bytes();
        if bytes.len() <= 0x1f {
            self.buf.put_u8(marker::FIXSTR_BASE | bytes.len() as u8);
        } else if bytes.len() <= usize::from(u8::MAX) {
            self.buf.put_u8(marker::STR8);
            self.buf.put_u8(bytes.len() as u8);
        } else if bytes.len() <= usize::from(u16::MAX) {
            self.buf.put_u8(marker::STR16);
            self.buf.put_u16(bytes.len() as u16);
        } else {
            let len = u32::try_from(bytes.len()).map_err(|_| {
                PackError::new(
                    codes::WIRE_OVERFLOW,
                    "str length exceeds wire format capacity (u32::MAX)",
                )
            })?;
            self.buf.put_u8(marker::STR32);
            self.buf.put_u32(len);
        }
        self.buf.put_slice(bytes);
        Ok(())
    }

    /// 已写出的字节数。
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// 是否尚未写出任何字节。
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// 只读视图，便于测试直接断言编码内容。
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// 冻结为只读 [`Bytes`]，写出器随之消耗。
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}
