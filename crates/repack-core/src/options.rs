use alloc::sync::Arc;
use core::num::NonZeroU16;

use crate::contract::Cancellation;
use crate::error::{PackError, codes};
use crate::registry::FormatterRegistry;

/// 未显式配置时的最大嵌套深度：足以覆盖常规业务消息的对象图预算，
/// 又能把恶意深层嵌套的栈消耗钉在可控范围内。
pub const DEFAULT_MAX_DEPTH: NonZeroU16 = NonZeroU16::new(500).unwrap();

/// 负载压缩方案标识。
///
/// 本实现不支持任何压缩方案：解码入口在做任何读取之前即拒绝
/// 非 [`Compression::None`] 的配置。保留枚举是为了与外部基础编解码的
/// 配置面保持形状兼容，让调用方的配置可以原样传入。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum Compression {
    /// 不压缩（唯一受支持的取值）。
    #[default]
    None,
    /// LZ4 块压缩（不支持，解码前拒绝）。
    Lz4Block,
    /// LZ4 块数组压缩（不支持，解码前拒绝）。
    Lz4BlockArray,
}

impl Compression {
    /// 是否启用了压缩。
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Compression::None)
    }
}

/// `SerializerOptions` 是一次编解码调用的完整配置面。
///
/// # 设计背景（Why）
/// - 进程级可变默认配置会让多租户与测试隔离变得脆弱，因此配置一律
///   显式构造、按引用传递：进程启动时构建一次，穿过每一层解码调用。
/// - 配置面聚合四项关注点：解析器注册中心（resolver）、压缩标识、
///   递归深度上限与协作式取消信号，与外部基础编解码的 options 对象
///   逐项对应。
///
/// # 契约说明（What）
/// - **前置条件**：`resolver` 中已注册本次调用会触达的全部类型；
/// - **后置条件**：配置自身不可变（Builder 方法返回新值），可被多次
///   解码调用共享；取消令牌可跨线程克隆，由调用方在外部触发。
#[derive(Clone)]
pub struct SerializerOptions {
    resolver: Arc<FormatterRegistry>,
    compression: Compression,
    max_depth: NonZeroU16,
    cancellation: Cancellation,
}

impl core::fmt::Debug for SerializerOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SerializerOptions")
            .field("compression", &self.compression)
            .field("max_depth", &self.max_depth)
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish()
    }
}

impl SerializerOptions {
    /// 以给定注册中心构建配置，其余字段取默认值。
    pub fn new(resolver: Arc<FormatterRegistry>) -> Self {
        Self {
            resolver,
            compression: Compression::None,
            max_depth: DEFAULT_MAX_DEPTH,
            cancellation: Cancellation::new(),
        }
    }

    /// 指定压缩方案（解码入口会拒绝任何非 `None` 取值）。
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// 指定递归深度上限。
    pub fn with_max_depth(mut self, max_depth: NonZeroU16) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// 绑定取消令牌，供调用方中断长序列的编解码。
    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// 访问解析器注册中心。
    pub fn resolver(&self) -> &FormatterRegistry {
        &self.resolver
    }

    /// 当前压缩配置。
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// 当前递归深度上限。
    pub fn max_depth(&self) -> NonZeroU16 {
        self.max_depth
    }

    /// 访问取消令牌。
    pub fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }

    /// 在元素边界检查取消信号，已取消则返回 `codec.cancelled`。
    ///
    /// 编解码循环在处理每个元素之前调用本方法，确保中断只发生在
    /// 元素之间，不会留下解析到一半的元素。
    pub fn check_cancelled(&self) -> crate::Result<(), PackError> {
        if self.cancellation.is_cancelled() {
            return Err(PackError::new(
                codes::CODEC_CANCELLED,
                "serialization cancelled by caller at element boundary",
            ));
        }
        Ok(())
    }
}
