use alloc::{borrow::Cow, boxed::Box};
use core::fmt;

use crate::Error;

/// `ErrorCause` 封装底层原因，保持 `Send + Sync` 以方便跨线程传递。
pub type ErrorCause = Box<dyn Error + Send + Sync + 'static>;

/// `PackError` 提供稳定的错误码与根因链路，是编解码错误分层的最底层。
///
/// # 设计背景（Why）
/// - 解码进既有对象图时，线缆层、解析器层与入口层会在不同位置产生故障，
///   需要合流为统一的错误码，便于日志、指标与回归测试执行精确断言。
/// - 框架兼容 `no_std + alloc` 场景，因此不依赖 `std::error::Error`，
///   而是复用 crate 内部定义的轻量 [`Error`] 抽象。
///
/// # 逻辑解析（How）
/// - 结构体以 Builder 风格方法叠加底层原因，并通过 `source()` 暴露完整链路。
/// - 错误码 `code` 始终为 `'static` 字符串，承载稳定语义；`message`
///   面向排障人员，允许借用静态文案或携带格式化后的动态内容。
///
/// # 契约说明（What）
/// - **前置条件**：调用方必须使用 [`codes`] 模块或遵循 `<域>.<语义>`
///   约定的自定义码值。
/// - **后置条件**：除非显式调用 `with_cause`/`set_cause`，错误不会包含
///   底层原因；返回值满足 `Send + Sync + 'static`，可安全跨线程移动。
///
/// # 风险提示（Trade-offs）
/// - 结构体仅负责承载信息，不执行任何格式化或指标上报逻辑；调用方需自行处理。
#[derive(Debug)]
pub struct PackError {
    code: &'static str,
    message: Cow<'static, str>,
    cause: Option<ErrorCause>,
}

impl PackError {
    /// 构造携带稳定错误码与描述的错误。
    pub fn new(code: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            message: message.into(),
            cause: None,
        }
    }

    /// 附带底层原因并返回新的错误，形成 `source()` 可遍历的链路。
    pub fn with_cause(mut self, cause: impl Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// 为现有错误设置底层原因。
    pub fn set_cause(&mut self, cause: impl Error + Send + Sync + 'static) {
        self.cause = Some(Box::new(cause));
    }

    /// 获取稳定错误码，供日志聚合或测试断言使用。
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// 获取人类可读的错误描述。
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 获取可选的底层原因。
    pub fn cause(&self) -> Option<&ErrorCause> {
        self.cause.as_ref()
    }
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for PackError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_ref()
            .map(|boxed| boxed.as_ref() as &(dyn Error + 'static))
    }
}

/// 稳定错误码清单，命名遵循 `<域>.<语义>` 约定。
///
/// # 分域说明（What）
/// - `wire.*`：线缆子集在读取/写入字节时的底层故障；
/// - `codec.*`：解析器解析、注册中心配置与入口治理层面的故障。
///
/// # 使用契约
/// - 错误码一经发布即冻结语义，新增场景应追加新码而非复用旧码；
/// - 测试与上层治理逻辑只允许依赖错误码，不允许依赖 message 文案。
pub mod codes {
    /// 输入字节不足以完成当前读取。
    pub const WIRE_TRUNCATED: &str = "wire.truncated";
    /// 线缆标记与期望的类型不匹配（含非法 UTF-8 负载）。
    pub const WIRE_TYPE_MISMATCH: &str = "wire.type_mismatch";
    /// 长度字段超出线缆格式可表示的范围。
    pub const WIRE_OVERFLOW: &str = "wire.overflow";
    /// 负载声明了压缩，但本实现显式不支持压缩（解码前即拒绝）。
    pub const CODEC_COMPRESSION_UNSUPPORTED: &str = "codec.compression_unsupported";
    /// 目标类型已注册解析器，但未声明“复用解码”扩展能力（配置错误，快速失败）。
    pub const CODEC_CAPABILITY_MISSING: &str = "codec.capability_missing";
    /// 注册中心查不到目标类型的解析器。
    pub const CODEC_FORMATTER_MISSING: &str = "codec.formatter_missing";
    /// 嵌套深度超过配置上限，疑似畸形或恶意输入。
    pub const CODEC_DEPTH_EXCEEDED: &str = "codec.depth_exceeded";
    /// 协作式取消信号在元素边界被观察到。
    pub const CODEC_CANCELLED: &str = "codec.cancelled";
    /// 编码链路中的故障，由入口统一包装并附带目标类型名。
    pub const CODEC_ENCODE_FAILED: &str = "codec.encode_failed";
    /// 解码链路中的故障，由入口统一包装并附带目标类型名。
    pub const CODEC_DECODE_FAILED: &str = "codec.decode_failed";
}
