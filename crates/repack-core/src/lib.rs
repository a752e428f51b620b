#![cfg_attr(not(feature = "std"), no_std)]
#![doc = "repack-core: 池化复用二进制消息编解码的核心契约。"]
#![doc = ""]
#![doc = "该 crate 定义“解码进既有对象图”所需的最小公共层："]
#![doc = "稳定错误域、协作式取消、MessagePack 兼容线缆子集、"]
#![doc = "解析器（formatter）契约与注册中心，以及公开的序列化入口。"]
#![doc = "具体的池化容器与复用解析器由 `repack-pool` 落地。"]

extern crate alloc;

pub mod contract;
pub mod error;
pub mod formatter;
pub mod options;
pub mod primitives;
pub mod registry;
pub mod serializer;
pub mod wire;

pub use contract::Cancellation;
pub use error::{ErrorCause, PackError, codes};
pub use formatter::{Formatter, ReuseFormatter, ReuseOutcome};
pub use options::{Compression, DEFAULT_MAX_DEPTH, SerializerOptions};
pub use registry::FormatterRegistry;
pub use serializer::{deserialize, deserialize_into, deserialize_into_reader, serialize};
pub use wire::{MessageReader, MessageWriter};

use alloc::boxed::Box;
use core::fmt;

/// 框架内部统一的 `Result` 别名，默认错误域为 [`PackError`]。
pub type Result<T, E = PackError> = core::result::Result<T, E>;

/// `repack-core` 中所有错误必须实现的 `no_std` 基础 Trait。
///
/// # 设计背景（Why）
/// - `std::error::Error` 在 `no_std` 环境中不可用，因此需要一个对象安全、
///   与平台无关的错误抽象来串联底层错误链。
/// - 该 Trait 作为所有错误类型的“最小公共接口”，帮助框架在 `alloc`
///   场景下完成跨模块错误传递。
///
/// # 逻辑解析（How）
/// - 约束实现者提供 `Debug` 与 `Display`，便于日志与可观测性收集。
/// - 通过 `source` 方法递归返回链路上的上游错误，保持与
///   `std::error::Error::source` 一致的语义，从而兼容现有生态的错误处理约定。
///
/// # 契约说明（What）
/// - **前置条件**：实现类型必须是 `'static` 生命周期并可安全跨线程共享
///   （若需包装进 [`ErrorCause`]）。
/// - **后置条件**：`source` 返回的引用生命周期受限于 `self`，以防悬垂引用。
pub trait Error: fmt::Debug + fmt::Display {
    /// 返回当前错误的上游来源。
    fn source(&self) -> Option<&(dyn Error + 'static)>;
}

impl<E> Error for Box<E>
where
    E: Error + ?Sized,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        (**self).source()
    }
}
