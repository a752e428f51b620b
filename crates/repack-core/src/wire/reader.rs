use alloc::format;
use core::num::NonZeroU16;
use core::str;

use crate::error::{PackError, codes};

use super::marker;

/// `MessageReader` 以零拷贝方式顺序读取线缆子集，并承载递归深度计数。
///
/// # 设计背景（Why）
/// - 解码进既有对象图的过程是严格顺序的：每读取一个标记就前进一次
///   读指针，借用输入切片即可避免任何中间拷贝。
/// - 恶意构造的深层嵌套数组会以极小的输入撑爆解码栈，因此深度计数与
///   读取器同生命周期：一次解码调用独占一个读取器，也独占一份深度状态，
///   并发解码互不干扰。
///
/// # 逻辑解析（How）
/// - 所有读取方法先校验剩余字节数，不足即返回 `wire.truncated`，
///   绝不 panic；
/// - 标记不符合期望类型族时返回 `wire.type_mismatch` 并回显实际标记，
///   便于定位协议偏差；
/// - [`Self::enter_nesting`] / [`Self::leave_nesting`] 在每个嵌套解码循环
///   外侧成对调用，无论成功失败都必须归还层级（调用方以
///   “先保存结果、再离开、最后 `?`”的顺序保证平衡）。
///
/// # 契约说明（What）
/// - **前置条件**：输入切片在读取器生命周期内保持有效且不被修改；
/// - **后置条件**：成功的读取精确消费对应字节；失败的读取不保证
///   读指针可回滚，调用方应丢弃整个解码结果。
///
/// # 风险提示（Trade-offs）
/// - 深度计数依赖调用方成对调用，读取器不做 RAII 强制；解析器层的
///   循环骨架已将该约定固化，新增解析器时应沿用同一骨架。
#[derive(Debug)]
pub struct MessageReader<'a> {
    input: &'a [u8],
    position: usize,
    nesting_depth: u16,
}

impl<'a> MessageReader<'a> {
    /// 基于输入切片创建读取器，读指针与深度计数均从零开始。
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            position: 0,
            nesting_depth: 0,
        }
    }

    /// 剩余未消费的字节数。
    pub fn remaining(&self) -> usize {
        self.input.len() - self.position
    }

    /// 是否已消费全部输入。
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// 查询当前嵌套层级，入口与测试据此断言深度平衡。
    pub fn nesting_depth(&self) -> u16 {
        self.nesting_depth
    }

    /// 进入一层嵌套解码，超出上限返回 `codec.depth_exceeded`。
    ///
    /// # 契约说明
    /// - **前置条件**：`limit` 为本次解码调用配置的硬上限；
    /// - **后置条件**：成功时层级加一；失败时层级保持不变，
    ///   调用方不得再调用对应的 [`Self::leave_nesting`]。
    pub fn enter_nesting(&mut self, limit: NonZeroU16) -> crate::Result<(), PackError> {
        if self.nesting_depth >= limit.get() {
            return Err(PackError::new(
                codes::CODEC_DEPTH_EXCEEDED,
                format!(
                    "nesting depth {} exceeds configured limit {}",
                    self.nesting_depth + 1,
                    limit
                ),
            ));
        }
        self.nesting_depth += 1;
        Ok(())
    }

    /// 离开一层嵌套解码；与成功的 [`Self::enter_nesting`] 成对出现。
    pub fn leave_nesting(&mut self) {
        self.nesting_depth = self.nesting_depth.saturating_sub(1);
    }

    /// 若下一个标记为 nil 则消费之并返回 `true`，否则读指针不动。
    pub fn try_read_nil(&mut self) -> bool {
        if self.input.get(self.position) == Some(&marker::NIL) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// 读取布尔值。
    pub fn read_bool(&mut self) -> crate::Result<bool, PackError> {
        match self.read_marker()? {
            marker::TRUE => Ok(true),
            marker::FALSE => Ok(false),
            other => Err(Self::mismatch("bool", other)),
        }
    }

    /// 读取数组头，返回元素个数。
    pub fn read_array_header(&mut self) -> crate::Result<usize, PackError> {
        match self.read_marker()? {
            m @ marker::FIXARRAY_BASE..=marker::FIXARRAY_MAX => {
                Ok(usize::from(m & 0x0f))
            }
            marker::ARRAY16 => Ok(usize::from(self.read_be_u16()?)),
            marker::ARRAY32 => Ok(self.read_be_u32()? as usize),
            other => Err(Self::mismatch("array header", other)),
        }
    }

    /// 读取无符号整数，接受任意能放入 `u64` 的无符号编码族。
    pub fn read_uint(&mut self) -> crate::Result<u64, PackError> {
        match self.read_marker()? {
            m @ 0x00..=marker::POS_FIXINT_MAX => Ok(u64::from(m)),
            marker::UINT8 => Ok(u64::from(self.read_byte()?)),
            marker::UINT16 => Ok(u64::from(self.read_be_u16()?)),
            marker::UINT32 => Ok(u64::from(self.read_be_u32()?)),
            marker::UINT64 => Ok(self.read_be_u64()?),
            other => Err(Self::mismatch("unsigned integer", other)),
        }
    }

    /// 读取有符号整数，同时接受能放入 `i64` 的无符号编码。
    pub fn read_int(&mut self) -> crate::Result<i64, PackError> {
        match self.read_marker()? {
            m @ 0x00..=marker::POS_FIXINT_MAX => Ok(i64::from(m)),
            m @ marker::NEG_FIXINT_MIN..=0xff => Ok(i64::from(m as i8)),
            marker::INT8 => Ok(i64::from(self.read_byte()? as i8)),
            marker::INT16 => Ok(i64::from(self.read_be_u16()? as i16)),
            marker::INT32 => Ok(i64::from(self.read_be_u32()? as i32)),
            marker::INT64 => Ok(self.read_be_u64()? as i64),
            marker::UINT8 => Ok(i64::from(self.read_byte()?)),
            marker::UINT16 => Ok(i64::from(self.read_be_u16()?)),
            marker::UINT32 => Ok(i64::from(self.read_be_u32()?)),
            marker::UINT64 => {
                let value = self.read_be_u64()?;
                i64::try_from(value).map_err(|_| {
                    PackError::new(
                        codes::WIRE_TYPE_MISMATCH,
                        format!("unsigned value {value} does not fit into i64"),
                    )
                })
            }
            other => Err(Self::mismatch("signed integer", other)),
        }
    }

    /// 读取 UTF-8 字符串；nil 返回 `None`。
    pub fn read_str(&mut self) -> crate::Result<Option<&'a str>, PackError> {
        if self.try_read_nil() {
            return Ok(None);
        }
        let len = match self.read_marker()? {
            m @ marker::FIXSTR_BASE..=marker::FIXSTR_MAX => usize::from(m & 0x1f),
            marker::STR8 => usize::from(self.read_byte()?),
            marker::STR16 => usize::from(self.read_be_u16()?),
            marker::STR32 => self.read_be_u32()? as usize,
            other => return Err(Self::mismatch("str", other)),
        };
        let payload = self.take(len)?;
        str::from_utf8(payload).map(Some).map_err(|_| {
            PackError::new(
                codes::WIRE_TYPE_MISMATCH,
                "str payload is not valid UTF-8",
            )
        })
    }

    fn read_marker(&mut self) -> crate::Result<u8, PackError> {
        self.read_byte()
    }

    fn read_byte(&mut self) -> crate::Result<u8, PackError> {
        let byte = *self.input.get(self.position).ok_or_else(|| {
            PackError::new(codes::WIRE_TRUNCATED, "input exhausted while reading marker")
        })?;
        self.position += 1;
        Ok(byte)
    }

    fn read_be_u16(&mut self) -> crate::Result<u16, PackError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn read_be_u32(&mut self) -> crate::Result<u32, PackError> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_be_u64(&mut self) -> crate::Result<u64, PackError> {
        let bytes = self.take(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(u64::from_be_bytes(raw))
    }

    fn take(&mut self, len: usize) -> crate::Result<&'a [u8], PackError> {
        if self.remaining() < len {
            return Err(PackError::new(
                codes::WIRE_TRUNCATED,
                format!(
                    "need {len} more bytes but only {} remain",
                    self.remaining()
                ),
            ));
        }
        let slice = &self.input[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    fn mismatch(expected: &'static str, found: u8) -> PackError {
        PackError::new(
            codes::WIRE_TYPE_MISMATCH,
            format!("expected {expected}, found marker 0x{found:02x}"),
        )
    }
}
