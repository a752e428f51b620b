use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// `PooledString` 是以首个零值字节界定逻辑长度的可复用字符缓冲。
///
/// # 设计动机（Why）
/// - 字符串字段在高频消息中反复出现，常规解码每次都会分配新的堆
///   缓冲；本类型把“逻辑内容”与“已分配区域”分离，复用时原地覆写，
///   容量保留，不触发重新分配。
/// - 逻辑长度采用固定容量区域内 nul 终止的约定：首个零值字节之前的
///   内容即有效内容，没有零值字节时整个缓冲都有效。
///
/// # 契约说明（What）
/// - **不变量**：已分配容量不会隐式缩小；复用路径只覆写内容；
/// - 相等性、显示与序列化都只观察逻辑前缀，零值字节之后的残留
///   不参与任何对外行为；
/// - 本类型没有回收队列：复用收益在于保留容量，而非对象实例缓存。
#[derive(Clone, Debug, Default)]
pub struct PooledString {
    buf: Vec<u8>,
}

impl PooledString {
    /// 创建空缓冲。
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// 以给定容量创建空缓冲。
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// 直接接管既有字节缓冲。
    pub fn from_vec(buf: Vec<u8>) -> Self {
        Self { buf }
    }

    /// 逻辑长度：首个零值字节的下标；不存在零值字节时为缓冲全长。
    pub fn logical_length(&self) -> usize {
        self.buf
            .iter()
            .position(|&byte| byte == 0)
            .unwrap_or(self.buf.len())
    }

    /// 逻辑内容的只读视图（不含零值字节及其之后的残留）。
    pub fn logical_bytes(&self) -> &[u8] {
        &self.buf[..self.logical_length()]
    }

    /// 完整缓冲的只读视图，含逻辑长度之后的残留字节。
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// 深拷贝另一缓冲的完整内容，容量按需扩大、从不缩小。
    pub fn copy_from(&mut self, other: &PooledString) {
        self.buf.clear();
        self.buf.extend_from_slice(other.as_bytes());
    }

    /// 预留容量至至少 `capacity` 字节，不截断既有内容。
    pub fn ensure_capacity(&mut self, capacity: usize) {
        if self.buf.capacity() < capacity {
            self.buf.reserve(capacity - self.buf.len());
        }
    }

    /// 清空内容，保留已分配容量（复用路径的全量重置入口）。
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// 追加一个字节。
    pub fn push_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// 当前已分配容量。
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }
}

impl From<&str> for PooledString {
    fn from(value: &str) -> Self {
        Self {
            buf: Vec::from(value.as_bytes()),
        }
    }
}

impl From<String> for PooledString {
    fn from(value: String) -> Self {
        Self {
            buf: value.into_bytes(),
        }
    }
}

/// 相等性只比较逻辑内容，容量与残留字节不参与。
impl PartialEq for PooledString {
    fn eq(&self, other: &Self) -> bool {
        self.logical_bytes() == other.logical_bytes()
    }
}

impl Eq for PooledString {}

impl PartialEq<str> for PooledString {
    fn eq(&self, other: &str) -> bool {
        self.logical_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for PooledString {
    fn eq(&self, other: &&str) -> bool {
        self.logical_bytes() == other.as_bytes()
    }
}

/// 渲染恰好 `logical_length()` 个字节的内容；非 UTF-8 残片按替换字符显示。
impl fmt::Display for PooledString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&String::from_utf8_lossy(self.logical_bytes()), f)
    }
}
