use crate::error::PackError;
use crate::options::SerializerOptions;
use crate::wire::{MessageReader, MessageWriter};

/// `Formatter` 定义某一业务类型在线缆子集上的基础编解码契约。
///
/// # 设计背景（Why）
/// - 每个可序列化类型对应一个解析器实现，由注册中心按 `TypeId`
///   查找；复合类型的解析器通过注册中心递归取得字段/元素的解析器，
///   保持 schema 驱动的组合方式。
/// - 与对象安全的注册存储配合，trait 对象以 `Arc<dyn Formatter<T>>`
///   形式在多次解码之间共享，因此要求 `Send + Sync + 'static`。
///
/// # 契约说明（What）
/// - `serialize` 将 `value` 追加写入 `writer`；取消信号应在元素边界检查，
///   不得在单个元素中途放弃写出；
/// - `deserialize` 的 `Ok(None)` 与线缆 nil 哨兵一一对应；不可为 nil 的
///   类型（如整数）应返回 `wire.type_mismatch` 而非 `None`；
/// - **后置条件**：成功的 `deserialize` 精确消费该值的全部编码字节。
///
/// # 风险提示（Trade-offs）
/// - 解析器自身不包装错误，原样向上传播；统一附加目标类型上下文是
///   入口层（[`crate::serializer`]）的职责，避免多层包装互相嵌套。
pub trait Formatter<T>: Send + Sync + 'static {
    /// 将值顺序写入写出器。
    fn serialize(
        &self,
        value: &T,
        writer: &mut MessageWriter,
        options: &SerializerOptions,
    ) -> crate::Result<(), PackError>;

    /// 从读取器解码一个新分配的值；`None` 表示线缆上的 nil。
    fn deserialize(
        &self,
        reader: &mut MessageReader<'_>,
        options: &SerializerOptions,
    ) -> crate::Result<Option<T>, PackError>;
}

/// 复用解码的结果状态。
///
/// - `Decoded`：`existing` 的可观察状态已被线缆数据完整覆盖；
/// - `Nil`：线缆上是 nil 哨兵，`existing`（含其回收池簿记）保持原样，
///   调用方必须把结果当作空值处理，不得继续使用 `existing` 的旧内容
///   冒充解码结果。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use = "nil outcome must be treated as an absent value"]
pub enum ReuseOutcome {
    /// 既有实例已被线缆数据完整覆盖。
    Decoded,
    /// 线缆上是 nil，既有实例未被触碰。
    Nil,
}

impl ReuseOutcome {
    /// 是否为 nil 分支。
    pub fn is_nil(self) -> bool {
        matches!(self, ReuseOutcome::Nil)
    }
}

/// `ReuseFormatter` 在基础契约之上声明“原地复用解码”扩展能力。
///
/// # 设计背景（Why）
/// - 高频消息场景下，为每次解码重新分配容器与元素会制造可观的分配
///   压力；支持复用的解析器可以把线缆数据直接写进既有实例，由容器的
///   回收池提供可重用的子对象。
/// - 该能力是按类型可选的：是否支持由注册中心在解码时查询
///   （[`crate::registry::FormatterRegistry::reuse_formatter`]），而非由
///   泛型入口静态假定——缺失是一个可区分、可处理的结果。
///
/// # 契约说明（What）
/// - `deserialize_into` 返回 [`ReuseOutcome::Decoded`] 时，`existing` 的
///   全部可观察状态都必须来自本次线缆数据，不得残留旧值；
/// - 线缆为 nil 时返回 [`ReuseOutcome::Nil`]，且不触碰 `existing` 的任何
///   状态——特别是池化容器的回收队列不会被清理，这意味着连续的 nil
///   解码不会回收此前的活跃元素（既定的边界行为，见容器文档）；
/// - 嵌套结构的实现必须在进入元素循环前后平衡读取器的深度计数，
///   错误路径同样归还层级。
pub trait ReuseFormatter<T>: Formatter<T> {
    /// 将线缆数据解码进既有实例。
    fn deserialize_into(
        &self,
        reader: &mut MessageReader<'_>,
        existing: &mut T,
        options: &SerializerOptions,
    ) -> crate::Result<ReuseOutcome, PackError>;
}
