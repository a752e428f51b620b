use alloc::collections::VecDeque;
use alloc::vec::Vec;

/// `PooledList` 是带回收队列的有序容器，为复用解码提供可重用的元素实例。
///
/// # 设计动机（Why）
/// - 复用解码把线缆数据写进既有对象图；容器层面需要一个地方安置
///   “上一轮解码留下、当前不再活跃”的元素实例，下一轮优先取用而不是
///   重新分配。
/// - 活跃序列与回收队列分离：`active` 是对外可见的解码结果，顺序即
///   线缆顺序；`recycled` 只是分配缓存，内容视为未定义。
///
/// # 结构与生命周期（How）
/// - 元素从 `active` 进入 `recycled` 的唯一通道是 [`Self::clear_to_pool`]；
///   反向的唯一通道是 [`Self::try_pop_recycled`]（FIFO）。
/// - 引用语义的池必须在入池前做线性成员扫描，防止同一实例被重复
///   入队；这里元素按值移动，所有权系统静态保证一个实例至多存在于
///   两个集合之一，扫描随之免除，可观察行为不变（无重复、清空幂等）。
///
/// # 契约说明（What）
/// - **不变量**：任一时刻一个元素实例只属于 `active` 与 `recycled`
///   中的一个；
/// - **后置条件**：[`Self::clear_to_pool`] 幂等——在没有新增元素的前提
///   下重复调用不会改变回收队列的长度与成员；
/// - **并发**：容器为单一所有者设计，跨线程共享同一实例须由调用方
///   串行化（单写者纪律）。
#[derive(Debug)]
pub struct PooledList<T> {
    active: Vec<T>,
    recycled: VecDeque<T>,
}

impl<T> PooledList<T> {
    /// 创建空容器。
    pub fn new() -> Self {
        Self {
            active: Vec::new(),
            recycled: VecDeque::new(),
        }
    }

    /// 以给定容量预分配活跃序列与回收队列。
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            active: Vec::with_capacity(capacity),
            recycled: VecDeque::with_capacity(capacity),
        }
    }

    /// 把所有活跃元素转入回收队列并清空活跃序列。
    ///
    /// 元素按活跃顺序入队，配合 FIFO 出队保证复用顺序与上一轮解码
    /// 顺序一致。重复调用幂等：第二次调用时活跃序列已空，回收队列
    /// 不发生任何变化。
    pub fn clear_to_pool(&mut self) {
        self.recycled.extend(self.active.drain(..));
    }

    /// 弹出最早入队的回收元素；队列为空时返回 `None`。
    ///
    /// 返回实例的内容是上一轮解码的残留，调用方必须在使用前完整覆写。
    pub fn try_pop_recycled(&mut self) -> Option<T> {
        self.recycled.pop_front()
    }

    /// 追加元素到活跃序列末尾。
    pub fn push(&mut self, item: T) {
        self.active.push(item);
    }

    /// 活跃元素的只读视图，顺序即线缆顺序。
    pub fn active(&self) -> &[T] {
        &self.active
    }

    /// 活跃元素个数。
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// 活跃序列是否为空。
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// 当前回收队列中的实例个数。
    pub fn recycled_len(&self) -> usize {
        self.recycled.len()
    }

    /// 遍历活跃元素。
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.active.iter()
    }
}

impl<T: Default> PooledList<T> {
    /// 取一个回收实例（或默认构造一个），原地填充后追加到活跃序列。
    pub fn add_with(&mut self, fill: impl FnOnce(&mut T)) {
        self.add_with_alloc(fill, T::default);
    }
}

impl<T> PooledList<T> {
    /// [`Self::add_with`] 的显式分配器变体，适合无 `Default` 或需要
    /// 定制初始状态的元素类型。
    pub fn add_with_alloc(&mut self, fill: impl FnOnce(&mut T), alloc: impl FnOnce() -> T) {
        let mut item = self.try_pop_recycled().unwrap_or_else(alloc);
        fill(&mut item);
        self.active.push(item);
    }
}

impl<T> Default for PooledList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for PooledList<T> {
    fn from(items: Vec<T>) -> Self {
        let capacity = items.len();
        Self {
            active: items,
            recycled: VecDeque::with_capacity(capacity),
        }
    }
}

impl<T> FromIterator<T> for PooledList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<T>>())
    }
}

impl<'a, T> IntoIterator for &'a PooledList<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.active.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;

    #[test]
    fn clear_to_pool_moves_elements_in_order() {
        let mut list: PooledList<String> =
            vec![String::from("a"), String::from("b")].into_iter().collect();
        list.clear_to_pool();
        assert!(list.is_empty());
        assert_eq!(list.recycled_len(), 2);
        assert_eq!(list.try_pop_recycled().as_deref(), Some("a"), "FIFO 顺序");
        assert_eq!(list.try_pop_recycled().as_deref(), Some("b"));
        assert!(list.try_pop_recycled().is_none());
    }

    #[test]
    fn clear_to_pool_is_idempotent() {
        let mut list: PooledList<String> = vec![String::from("x")].into_iter().collect();
        list.clear_to_pool();
        let snapshot = list.recycled_len();
        list.clear_to_pool();
        assert_eq!(list.recycled_len(), snapshot, "无新增元素时清空不得改变队列");
    }

    #[test]
    fn add_with_prefers_recycled_instance() {
        let mut list: PooledList<String> = PooledList::new();
        let mut seed = String::with_capacity(16);
        seed.push_str("seed");
        list.push(seed);
        let ptr = list.active()[0].as_ptr();
        list.clear_to_pool();

        list.add_with(|item| {
            item.clear();
            item.push_str("next");
        });
        assert_eq!(list.active()[0], "next");
        assert_eq!(list.active()[0].as_ptr(), ptr, "应复用回收实例的缓冲");
        assert_eq!(list.recycled_len(), 0);
    }

    #[test]
    fn add_with_alloc_falls_back_when_pool_is_dry() {
        let mut list: PooledList<String> = PooledList::new();
        list.add_with_alloc(
            |item| item.push_str("fresh"),
            || String::with_capacity(8),
        );
        assert_eq!(list.len(), 1);
        assert_eq!(list.active()[0], "fresh");
    }
}
