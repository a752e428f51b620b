use repack_core::{
    Formatter, MessageReader, MessageWriter, PackError, ReuseFormatter, ReuseOutcome,
    SerializerOptions,
};

use crate::pooled_string::PooledString;

/// [`PooledString`] 的扩展解析器。
///
/// # 设计背景（Why）
/// - 字符缓冲在线缆上表示为字节元素的数组：数组头的长度取逻辑长度，
///   零值字节之后的残留不进入线缆；
/// - 复用路径没有回收队列可言——收益在于保留的缓冲容量：全量清空后
///   原地追加，容量足够时不发生任何重新分配。
///
/// # 逻辑解析（How）
/// - 元素字节同样经注册中心解析 `u8` 的解析器写出/读回，保持与
///   序列容器一致的递归组合方式；
/// - 两条解码路径都在元素循环外侧进入/离开深度守卫，错误路径同样
///   归还层级；每个元素边界检查取消信号。
pub struct PooledStringFormatter;

impl PooledStringFormatter {
    /// 创建无状态解析器实例。
    pub const fn new() -> Self {
        Self
    }

    /// 元素循环：向目标缓冲追加 `len` 个新解码的字节。
    fn fill(
        reader: &mut MessageReader<'_>,
        target: &mut PooledString,
        len: usize,
        formatter: &dyn Formatter<u8>,
        options: &SerializerOptions,
    ) -> Result<(), PackError> {
        for _ in 0..len {
            options.check_cancelled()?;
            let byte = formatter.deserialize(reader, options)?.unwrap_or_default();
            target.push_byte(byte);
        }
        Ok(())
    }
}

impl Default for PooledStringFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter<PooledString> for PooledStringFormatter {
    fn serialize(
        &self,
        value: &PooledString,
        writer: &mut MessageWriter,
        options: &SerializerOptions,
    ) -> Result<(), PackError> {
        let formatter = options.resolver().formatter_with_verify::<u8>()?;
        let logical = value.logical_bytes();
        writer.write_array_header(logical.len())?;
        for byte in logical {
            options.check_cancelled()?;
            formatter.serialize(byte, writer, options)?;
        }
        Ok(())
    }

    fn deserialize(
        &self,
        reader: &mut MessageReader<'_>,
        options: &SerializerOptions,
    ) -> Result<Option<PooledString>, PackError> {
        if reader.try_read_nil() {
            return Ok(None);
        }
        let formatter = options.resolver().formatter_with_verify::<u8>()?;
        let len = reader.read_array_header()?;
        let mut value = PooledString::with_capacity(len);

        reader.enter_nesting(options.max_depth())?;
        let filled = Self::fill(reader, &mut value, len, formatter.as_ref(), options);
        reader.leave_nesting();
        filled?;

        Ok(Some(value))
    }
}

impl ReuseFormatter<PooledString> for PooledStringFormatter {
    fn deserialize_into(
        &self,
        reader: &mut MessageReader<'_>,
        existing: &mut PooledString,
        options: &SerializerOptions,
    ) -> Result<ReuseOutcome, PackError> {
        if reader.try_read_nil() {
            return Ok(ReuseOutcome::Nil);
        }
        let formatter = options.resolver().formatter_with_verify::<u8>()?;
        let len = reader.read_array_header()?;
        existing.clear();
        existing.ensure_capacity(len);

        reader.enter_nesting(options.max_depth())?;
        let filled = Self::fill(reader, existing, len, formatter.as_ref(), options);
        reader.leave_nesting();
        filled?;

        Ok(ReuseOutcome::Decoded)
    }
}
