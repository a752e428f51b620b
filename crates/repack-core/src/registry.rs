use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::sync::Arc;
use core::any::{Any, TypeId, type_name};

use spin::RwLock;

use crate::error::{PackError, codes};
use crate::formatter::{Formatter, ReuseFormatter};

/// 单个类型的注册记录：基础解析器必备，复用能力可选。
///
/// 两个槽位都以 `Box<dyn Any>` 存放对应的 `Arc<dyn …>` 胖指针，读取时
/// 按具体泛型还原——这是“运行时能力查询取代无条件下转型”的落点：
/// 能力缺失表现为 `None`，而不是一次失败的 cast。
struct FormatterEntry {
    base: Box<dyn Any + Send + Sync>,
    reuse: Option<Box<dyn Any + Send + Sync>>,
}

/// `FormatterRegistry` 是类型到解析器的注册中心（resolver）。
///
/// # 设计背景（Why）
/// - schema 驱动的编解码要求在运行时按目标类型取得解析器；复合类型的
///   解析器又会递归向注册中心索要字段/元素的解析器，注册中心因此是
///   整个组合结构的枢纽。
/// - “复用解码”是按类型可选的扩展能力：有的类型只注册基础解析器，
///   有的同时声明复用能力。查询接口把两者分开，入口层据此区分
///   “未注册”“已注册但无能力”“能力齐备”三种情形。
///
/// # 逻辑解析（How）
/// - 内部以 `TypeId` 为键维护注册表；`spin::RwLock` 只保护注册期的
///   写入，解码热路径仅做读锁加 `Arc` 克隆；
/// - [`Self::register_reuse`] 会同时占据基础与复用两个槽位（同一个
///   实例两种视图），保证能力声明与基础契约始终一致；
/// - 重新调用 [`Self::register`] 会整体覆盖该类型的记录，先前声明的
///   复用能力随之撤销，避免新旧实现混搭。
///
/// # 契约说明（What）
/// - **前置条件**：注册应在进程启动阶段完成；解码期间并发注册虽是
///   线程安全的，但可能让组合解码观察到不一致的注册表快照；
/// - **后置条件**：查询返回的 `Arc` 可跨线程共享并在多次解码间复用。
///
/// # 风险提示（Trade-offs）
/// - 每次查询克隆一个 `Arc` 并持有短暂读锁；若未来热路径证明该开销
///   可观，可以在上层按解码调用缓存查询结果，注册中心行为不变。
pub struct FormatterRegistry {
    entries: RwLock<BTreeMap<TypeId, FormatterEntry>>,
}

impl FormatterRegistry {
    /// 创建空注册中心。
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// 注册类型 `T` 的基础解析器，覆盖既有记录（含复用能力声明）。
    pub fn register<T, F>(&self, formatter: F)
    where
        T: 'static,
        F: Formatter<T>,
    {
        let base: Arc<dyn Formatter<T>> = Arc::new(formatter);
        self.entries.write().insert(
            TypeId::of::<T>(),
            FormatterEntry {
                base: Box::new(base),
                reuse: None,
            },
        );
    }

    /// 注册类型 `T` 的复用解析器，同时充当基础解析器。
    pub fn register_reuse<T, F>(&self, formatter: F)
    where
        T: 'static,
        F: ReuseFormatter<T>,
    {
        let shared = Arc::new(formatter);
        let base: Arc<dyn Formatter<T>> = shared.clone();
        let reuse: Arc<dyn ReuseFormatter<T>> = shared;
        self.entries.write().insert(
            TypeId::of::<T>(),
            FormatterEntry {
                base: Box::new(base),
                reuse: Some(Box::new(reuse)),
            },
        );
    }

    /// 查询类型 `T` 的基础解析器（get-if-present 语义）。
    pub fn formatter<T: 'static>(&self) -> Option<Arc<dyn Formatter<T>>> {
        self.entries
            .read()
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.base.downcast_ref::<Arc<dyn Formatter<T>>>())
            .cloned()
    }

    /// 查询类型 `T` 的基础解析器，缺失视为配置错误。
    pub fn formatter_with_verify<T: 'static>(
        &self,
    ) -> crate::Result<Arc<dyn Formatter<T>>, PackError> {
        self.formatter::<T>().ok_or_else(|| {
            PackError::new(
                codes::CODEC_FORMATTER_MISSING,
                format!("no formatter registered for `{}`", type_name::<T>()),
            )
        })
    }

    /// 查询类型 `T` 的复用解码能力；`None` 是可处理的常规结果。
    pub fn reuse_formatter<T: 'static>(&self) -> Option<Arc<dyn ReuseFormatter<T>>> {
        self.entries
            .read()
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.reuse.as_ref())
            .and_then(|slot| slot.downcast_ref::<Arc<dyn ReuseFormatter<T>>>())
            .cloned()
    }

    /// 类型 `T` 是否已有任何注册记录。
    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.read().contains_key(&TypeId::of::<T>())
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
