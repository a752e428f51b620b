//! 公开的序列化/反序列化入口。
//!
//! # 模块定位（Why）
//! - 入口层是错误翻译的唯一边界：解析器内部不包装错误，任何解码链路
//!   中的失败都在这里被捕获一次，重新包装为携带目标类型名的
//!   `codec.decode_failed`（编码侧对应 `codec.encode_failed`），
//!   原始原因完整保留在错误链上。
//! - 复用解码入口（[`deserialize_into`]）在委派之前完成两项治理检查：
//!   压缩配置直接拒绝、复用能力缺失快速失败——这两类错误属于独立的
//!   错误分类，原样上抛，不参与统一包装。

use alloc::format;
use bytes::Bytes;
use core::any::type_name;

use crate::error::{PackError, codes};
use crate::formatter::ReuseOutcome;
use crate::options::SerializerOptions;
use crate::wire::{MessageReader, MessageWriter};

/// 将值编码为字节序列。
///
/// # 契约说明（What）
/// - 通过配置的注册中心解析 `T` 的基础解析器（缺失为
///   `codec.formatter_missing`，不参与包装）；
/// - 解析器写出过程中的任何失败被包装为 `codec.encode_failed`，
///   附带目标类型名，原因保留。
pub fn serialize<T: 'static>(
    value: &T,
    options: &SerializerOptions,
) -> crate::Result<Bytes, PackError> {
    let formatter = options.resolver().formatter_with_verify::<T>()?;
    let mut writer = MessageWriter::new();
    formatter
        .serialize(value, &mut writer, options)
        .map_err(|cause| {
            PackError::new(
                codes::CODEC_ENCODE_FAILED,
                format!("failed to serialize `{}` value", type_name::<T>()),
            )
            .with_cause(cause)
        })?;
    Ok(writer.into_bytes())
}

/// 以全新分配的方式解码一个值；`None` 对应线缆 nil。
///
/// 本实现不支持压缩负载，压缩配置在任何读取发生之前即被拒绝。
pub fn deserialize<T: 'static>(
    input: &[u8],
    options: &SerializerOptions,
) -> crate::Result<Option<T>, PackError> {
    reject_compression(options)?;
    let formatter = options.resolver().formatter_with_verify::<T>()?;
    let mut reader = MessageReader::new(input);
    formatter
        .deserialize(&mut reader, options)
        .map_err(wrap_decode_failure::<T>)
}

/// 复用解码入口：把线缆数据解码进既有实例。
///
/// # 执行顺序（How）
/// 1. 压缩配置 → `codec.compression_unsupported`，不做任何解码尝试；
/// 2. 注册中心必须为 `T` 暴露复用解码能力，否则
///    `codec.capability_missing`（配置错误，快速失败）；
/// 3. 委派给解析器的 `deserialize_into`；
/// 4. 委派链路中的任何失败被捕获一次，包装为携带
///    `core::any::type_name::<T>()` 的 `codec.decode_failed`，原因保留。
///
/// # 契约说明（What）
/// - 返回 [`ReuseOutcome::Nil`] 时 `existing` 保持原样（含池簿记），
///   调用方必须将结果视为空值；
/// - 返回 [`ReuseOutcome::Decoded`] 时 `existing` 的全部可观察状态
///   均来自本次输入。
pub fn deserialize_into<T: 'static>(
    input: &[u8],
    existing: &mut T,
    options: &SerializerOptions,
) -> crate::Result<ReuseOutcome, PackError> {
    let mut reader = MessageReader::new(input);
    deserialize_into_reader(&mut reader, existing, options)
}

/// [`deserialize_into`] 的读取器变体，便于调用方复用已有读取器继续解码。
pub fn deserialize_into_reader<T: 'static>(
    reader: &mut MessageReader<'_>,
    existing: &mut T,
    options: &SerializerOptions,
) -> crate::Result<ReuseOutcome, PackError> {
    reject_compression(options)?;
    let formatter = options.resolver().reuse_formatter::<T>().ok_or_else(|| {
        PackError::new(
            codes::CODEC_CAPABILITY_MISSING,
            format!(
                "formatter for `{}` does not implement reuse deserialization",
                type_name::<T>()
            ),
        )
    })?;
    formatter
        .deserialize_into(reader, existing, options)
        .map_err(wrap_decode_failure::<T>)
}

fn reject_compression(options: &SerializerOptions) -> crate::Result<(), PackError> {
    if options.compression().is_enabled() {
        return Err(PackError::new(
            codes::CODEC_COMPRESSION_UNSUPPORTED,
            "compressed payloads are not supported by this implementation",
        ));
    }
    Ok(())
}

fn wrap_decode_failure<T>(cause: PackError) -> PackError {
    PackError::new(
        codes::CODEC_DECODE_FAILED,
        format!("failed to deserialize `{}` value", type_name::<T>()),
    )
    .with_cause(cause)
}
