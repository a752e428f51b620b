use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, Ordering};

/// 取消原语，统一表达跨模块的可中断性契约。
///
/// # 设计背景（Why）
/// - 长序列的编解码循环必须能被外部主动打断，避免恶意超长数组拖垮调用方；
/// - 传统任务取消机制在 `no_std` 环境下缺乏统一接口，因此通过轻量的
///   原子位提供最小可行解。
///
/// # 逻辑解析（How）
/// - 内部使用 [`AtomicBool`] 表达取消状态，并通过 [`Arc`] 支持多方共享。
/// - `cancel` 在首次成功设置取消位时返回 `true`，后续重复调用将返回
///   `false` 以提示调用方避免重复执行业务兜底。
/// - `child` 生成共享同一原子位的派生实例，便于在不同子系统传播取消信号。
///
/// # 契约说明（What）
/// - **前置条件**：构造时无需额外参数，默认处于“未取消”状态。
/// - **后置条件**：一旦调用 `cancel` 成功，`is_cancelled` 必须在全局可见；
///   编解码循环在每个元素边界检查该状态，中断只发生在元素之间，
///   不会撕裂单个元素的解析。
///
/// # 设计取舍与风险（Trade-offs）
/// - 未提供回调注册接口，避免在 `no_std` 下引入调度复杂度；需要通知机制
///   时可在上层使用轮询或自定义事件总线。
/// - 调用者需在关键热路径自行检查 `is_cancelled`，框架不会强制终止
///   正在执行的解码。
#[derive(Clone, Debug)]
pub struct Cancellation {
    inner: Arc<CancellationState>,
}

#[derive(Debug, Default)]
struct CancellationState {
    flag: AtomicBool,
}

impl Cancellation {
    /// 创建处于“未取消”状态的取消令牌。
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CancellationState {
                flag: AtomicBool::new(false),
            }),
        }
    }

    /// 查询当前是否已被标记取消。
    pub fn is_cancelled(&self) -> bool {
        self.inner.flag.load(Ordering::Acquire)
    }

    /// 将当前令牌标记为取消。
    ///
    /// 返回值为 `true` 表示本次调用首次触发取消；返回 `false` 表示之前已被取消。
    pub fn cancel(&self) -> bool {
        self.inner
            .flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// 派生共享同一原子位的子令牌，用于跨模块传播取消语义。
    pub fn child(&self) -> Self {
        self.clone()
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}
