//! MessagePack 兼容线缆子集。
//!
//! # 模块定位（Why）
//! - 池化复用解码并不定义新的线缆格式，只消费既有的 schema 驱动二进制
//!   编码：nil 哨兵、数组头与递归嵌套的元素编码。本模块提供解析器层
//!   实际会触达的最小子集，其余格式族（map、bin、ext、float）不在范围内。
//! - 递归深度计数器挂在读取器上：一次解码调用对应一个读取器，也就对应
//!   一份深度状态，天然满足“并发解码不得共享深度计数”的契约。
//!
//! # 设计概要（How）
//! - `writer` 模块基于 `bytes::BytesMut` 顺序写出标记与负载，整数一律
//!   选择最短编码；
//! - `reader` 模块以借用切片为输入做零拷贝读取，所有越界访问都会转化为
//!   `wire.truncated` 错误而不是 panic；
//! - `marker` 子模块集中列出双方共享的标记常量，避免魔法数字散落。

mod reader;
mod writer;

pub use reader::MessageReader;
pub use writer::MessageWriter;

/// 线缆标记常量，与 MessagePack 规范保持字面一致。
///
/// 区间型标记（fixint/fixstr/fixarray）只列出区间端点，解析逻辑据此
/// 判断归属；定长标记直接给出完整字节。
pub mod marker {
    /// nil 哨兵，表示线缆上的空值。
    pub const NIL: u8 = 0xc0;
    /// 布尔假。
    pub const FALSE: u8 = 0xc2;
    /// 布尔真。
    pub const TRUE: u8 = 0xc3;
    /// 正 fixint 上界（含），即 `0x00..=0x7f` 直接承载数值。
    pub const POS_FIXINT_MAX: u8 = 0x7f;
    /// 负 fixint 下界（含），`0xe0..=0xff` 承载 `-32..=-1`。
    pub const NEG_FIXINT_MIN: u8 = 0xe0;
    /// 无符号 8/16/32/64 位整数。
    pub const UINT8: u8 = 0xcc;
    pub const UINT16: u8 = 0xcd;
    pub const UINT32: u8 = 0xce;
    pub const UINT64: u8 = 0xcf;
    /// 有符号 8/16/32/64 位整数。
    pub const INT8: u8 = 0xd0;
    pub const INT16: u8 = 0xd1;
    pub const INT32: u8 = 0xd2;
    pub const INT64: u8 = 0xd3;
    /// fixarray 标记基址，低 4 位承载元素个数（0..=15）。
    pub const FIXARRAY_BASE: u8 = 0x90;
    /// fixarray 标记上界（含）。
    pub const FIXARRAY_MAX: u8 = 0x9f;
    /// array16 / array32，后随大端长度。
    pub const ARRAY16: u8 = 0xdc;
    pub const ARRAY32: u8 = 0xdd;
    /// fixstr 标记基址，低 5 位承载字节长度（0..=31）。
    pub const FIXSTR_BASE: u8 = 0xa0;
    /// fixstr 标记上界（含）。
    pub const FIXSTR_MAX: u8 = 0xbf;
    /// str8 / str16 / str32，后随大端长度与 UTF-8 负载。
    pub const STR8: u8 = 0xd9;
    pub const STR16: u8 = 0xda;
    pub const STR32: u8 = 0xdb;
}
