#![cfg_attr(not(feature = "std"), no_std)]

//! `repack-pool` 提供面向复用解码的池化容器与扩展解析器。
//!
//! # 模块定位（Why）
//! - `repack-core` 仅定义“复用解码”扩展能力的契约（[`repack_core::ReuseFormatter`]），
//!   不落地任何容器实体；本 crate 补足这一层：带回收队列的有序容器
//!   [`PooledList`]、保留容量的字符缓冲 [`PooledString`]，以及二者的
//!   扩展解析器。
//! - 高频消息场景下，每次解码都重新分配容器与元素会制造持续的分配
//!   压力；回收池让同一容器实例在多次解码之间复用既有子对象。
//!
//! # 设计概要（How）
//! - `pooled_list` 实现活跃序列 + FIFO 回收队列的双集合生命周期，
//!   所有权移动静态保证“一个实例至多存在于其中一个集合”；
//! - `pooled_string` 以首个零值字节界定逻辑长度，复用时原地覆写而非
//!   重新分配；
//! - `list_formatter` / `string_formatter` 实现序列化、全新解码与复用
//!   解码三条路径，嵌套解码通过读取器的深度计数对抗恶意输入。
//!
//! # 命名约定（Consistency）
//! - 延续 `repack-core` 的术语：解析器（formatter）、注册中心（resolver）、
//!   复用解码（deserialize_into），避免引入额外前缀。

extern crate alloc;

mod list_formatter;
mod pooled_list;
mod pooled_string;
mod string_formatter;

pub use list_formatter::PooledListFormatter;
pub use pooled_list::PooledList;
pub use pooled_string::PooledString;
pub use string_formatter::PooledStringFormatter;
