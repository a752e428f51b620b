use core::marker::PhantomData;

use repack_core::{
    Formatter, MessageReader, MessageWriter, PackError, ReuseFormatter, ReuseOutcome,
    SerializerOptions,
};

use crate::pooled_list::PooledList;

/// [`PooledList`] 的扩展解析器：序列化、全新解码与复用解码三条路径。
///
/// # 设计背景（Why）
/// - 序列容器是复用解码的核心战场：每个元素既可能从回收队列取得既有
///   实例原地覆写（元素解析器声明了复用能力时），也可能退回常规的
///   全新分配路径。两条路径的选择必须严格遵守“先确认能力、再出队”
///   的顺序——在能力检查之前出队会让回收实例被悄悄丢弃，从池中泄漏。
/// - 元素解析器一律经由注册中心解析，保持 schema 驱动的递归组合：
///   本解析器不关心 `T` 的线缆形状，只负责数组头、顺序与池的生命周期。
///
/// # 逻辑解析（How）
/// - `serialize`：数组头写出活跃元素个数，此后逐元素委派基础解析器，
///   每个元素边界检查取消信号；
/// - `deserialize`：读数组头，按元素个数预分配新容器，进入深度守卫后
///   逐元素全新解码；
/// - `deserialize_into`：nil 直接返回且不触碰既有容器；否则先
///   `clear_to_pool` 把上一轮活跃元素转入回收队列，再在深度守卫内
///   逐元素执行“能力确认 → 出队复用 / 全新分配”，按线缆顺序追加；
/// - 深度守卫在两条解码路径上都以“先保存循环结果、再离开层级、最后
///   上抛”的顺序收尾，错误路径同样归还层级。
///
/// # 契约说明（What）
/// - **后置条件（`deserialize_into` 成功）**：活跃序列与线缆顺序一致，
///   内容完全来自本次输入；回收队列只剩未被本轮取用的实例；
/// - **nil 边界**：既有容器的回收队列原样保留——连续的 nil 解码不会
///   回收此前的活跃元素（既定的边界行为）；
/// - 元素级 nil 在复用分支保留出队实例的既有内容、在全新分支退化为
///   `T::default()`，两者都按线缆顺序占位。
pub struct PooledListFormatter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> PooledListFormatter<T> {
    /// 创建无状态解析器实例。
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for PooledListFormatter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PooledListFormatter<T>
where
    T: Default + Send + Sync + 'static,
{
    /// 全新分配路径的元素循环，由调用方负责深度守卫的进入与离开。
    fn fill_fresh(
        reader: &mut MessageReader<'_>,
        list: &mut PooledList<T>,
        len: usize,
        formatter: &dyn Formatter<T>,
        options: &SerializerOptions,
    ) -> Result<(), PackError> {
        for _ in 0..len {
            options.check_cancelled()?;
            let element = formatter.deserialize(reader, options)?.unwrap_or_default();
            list.push(element);
        }
        Ok(())
    }

    /// 复用路径的元素循环。
    ///
    /// 能力查询在循环外完成一次:只有元素解析器确认支持复用解码时，
    /// 才允许从回收队列出队；能力缺失的序列自始至终不触碰回收队列。
    fn fill_reusing(
        reader: &mut MessageReader<'_>,
        list: &mut PooledList<T>,
        len: usize,
        formatter: &dyn Formatter<T>,
        options: &SerializerOptions,
    ) -> Result<(), PackError> {
        let reuse = options.resolver().reuse_formatter::<T>();
        for _ in 0..len {
            options.check_cancelled()?;
            let element = match reuse.as_deref() {
                Some(reuse_formatter) => match list.try_pop_recycled() {
                    Some(mut item) => {
                        // 元素级 nil 保留出队实例的既有内容并原样占位。
                        let _ = reuse_formatter.deserialize_into(reader, &mut item, options)?;
                        item
                    }
                    None => formatter.deserialize(reader, options)?.unwrap_or_default(),
                },
                None => formatter.deserialize(reader, options)?.unwrap_or_default(),
            };
            list.push(element);
        }
        Ok(())
    }
}

impl<T> Formatter<PooledList<T>> for PooledListFormatter<T>
where
    T: Default + Send + Sync + 'static,
{
    fn serialize(
        &self,
        value: &PooledList<T>,
        writer: &mut MessageWriter,
        options: &SerializerOptions,
    ) -> Result<(), PackError> {
        let formatter = options.resolver().formatter_with_verify::<T>()?;
        writer.write_array_header(value.len())?;
        for element in value.iter() {
            options.check_cancelled()?;
            formatter.serialize(element, writer, options)?;
        }
        Ok(())
    }

    fn deserialize(
        &self,
        reader: &mut MessageReader<'_>,
        options: &SerializerOptions,
    ) -> Result<Option<PooledList<T>>, PackError> {
        if reader.try_read_nil() {
            return Ok(None);
        }
        let formatter = options.resolver().formatter_with_verify::<T>()?;
        let len = reader.read_array_header()?;
        let mut list = PooledList::with_capacity(len);

        reader.enter_nesting(options.max_depth())?;
        let filled = Self::fill_fresh(reader, &mut list, len, formatter.as_ref(), options);
        reader.leave_nesting();
        filled?;

        Ok(Some(list))
    }
}

impl<T> ReuseFormatter<PooledList<T>> for PooledListFormatter<T>
where
    T: Default + Send + Sync + 'static,
{
    fn deserialize_into(
        &self,
        reader: &mut MessageReader<'_>,
        existing: &mut PooledList<T>,
        options: &SerializerOptions,
    ) -> Result<ReuseOutcome, PackError> {
        if reader.try_read_nil() {
            return Ok(ReuseOutcome::Nil);
        }
        let formatter = options.resolver().formatter_with_verify::<T>()?;
        let len = reader.read_array_header()?;
        existing.clear_to_pool();

        reader.enter_nesting(options.max_depth())?;
        let filled = Self::fill_reusing(reader, existing, len, formatter.as_ref(), options);
        reader.leave_nesting();
        filled?;

        Ok(ReuseOutcome::Decoded)
    }
}
