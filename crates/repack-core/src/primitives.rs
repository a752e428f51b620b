//! 标量类型的内建解析器。
//!
//! # 模块定位（Why）
//! - 复合类型（记录、池化容器）的解析器通过注册中心递归取得字段/元素
//!   解析器，因此任何真实 schema 都离不开一组标量解析器打底。
//! - 整数族在本线缆子集上不可为 nil：nil 哨兵只属于引用语义的类型
//!   （字符串、容器）。因此整数解析器在遇到 nil 时返回类型不匹配，
//!   而不是把 `None` 语义强加给调用方。
//!
//! # 使用方式（How）
//! - [`FormatterRegistry::with_primitives`] 一次性注册全部标量解析器；
//!   也可以按需单独注册某个解析器。
//! - 所有标量解析器都是无状态零尺寸类型，注册成本可忽略。

use alloc::string::{String, ToString};

use crate::error::PackError;
use crate::formatter::Formatter;
use crate::options::SerializerOptions;
use crate::registry::FormatterRegistry;
use crate::wire::{MessageReader, MessageWriter};

/// `bool` 解析器。
#[derive(Debug, Default)]
pub struct BoolFormatter;

impl Formatter<bool> for BoolFormatter {
    fn serialize(
        &self,
        value: &bool,
        writer: &mut MessageWriter,
        _options: &SerializerOptions,
    ) -> crate::Result<(), PackError> {
        writer.write_bool(*value);
        Ok(())
    }

    fn deserialize(
        &self,
        reader: &mut MessageReader<'_>,
        _options: &SerializerOptions,
    ) -> crate::Result<Option<bool>, PackError> {
        reader.read_bool().map(Some)
    }
}

macro_rules! unsigned_formatter {
    ($name:ident, $ty:ty) => {
        #[doc = concat!("`", stringify!($ty), "` 解析器。")]
        #[derive(Debug, Default)]
        pub struct $name;

        impl Formatter<$ty> for $name {
            fn serialize(
                &self,
                value: &$ty,
                writer: &mut MessageWriter,
                _options: &SerializerOptions,
            ) -> crate::Result<(), PackError> {
                writer.write_uint(u64::from(*value));
                Ok(())
            }

            fn deserialize(
                &self,
                reader: &mut MessageReader<'_>,
                _options: &SerializerOptions,
            ) -> crate::Result<Option<$ty>, PackError> {
                let raw = reader.read_uint()?;
                let value = <$ty>::try_from(raw).map_err(|_| {
                    PackError::new(
                        crate::error::codes::WIRE_TYPE_MISMATCH,
                        alloc::format!(
                            "value {raw} does not fit into {}",
                            core::any::type_name::<$ty>()
                        ),
                    )
                })?;
                Ok(Some(value))
            }
        }
    };
}

macro_rules! signed_formatter {
    ($name:ident, $ty:ty) => {
        #[doc = concat!("`", stringify!($ty), "` 解析器。")]
        #[derive(Debug, Default)]
        pub struct $name;

        impl Formatter<$ty> for $name {
            fn serialize(
                &self,
                value: &$ty,
                writer: &mut MessageWriter,
                _options: &SerializerOptions,
            ) -> crate::Result<(), PackError> {
                writer.write_int(i64::from(*value));
                Ok(())
            }

            fn deserialize(
                &self,
                reader: &mut MessageReader<'_>,
                _options: &SerializerOptions,
            ) -> crate::Result<Option<$ty>, PackError> {
                let raw = reader.read_int()?;
                let value = <$ty>::try_from(raw).map_err(|_| {
                    PackError::new(
                        crate::error::codes::WIRE_TYPE_MISMATCH,
                        alloc::format!(
                            "value {raw} does not fit into {}",
                            core::any::type_name::<$ty>()
                        ),
                    )
                })?;
                Ok(Some(value))
            }
        }
    };
}

unsigned_formatter!(U8Formatter, u8);
unsigned_formatter!(U16Formatter, u16);
unsigned_formatter!(U32Formatter, u32);
unsigned_formatter!(U64Formatter, u64);
signed_formatter!(I32Formatter, i32);
signed_formatter!(I64Formatter, i64);

/// `String` 解析器；nil 与 `None` 一一对应。
#[derive(Debug, Default)]
pub struct StringFormatter;

impl Formatter<String> for StringFormatter {
    fn serialize(
        &self,
        value: &String,
        writer: &mut MessageWriter,
        _options: &SerializerOptions,
    ) -> crate::Result<(), PackError> {
        writer.write_str(value)
    }

    fn deserialize(
        &self,
        reader: &mut MessageReader<'_>,
        _options: &SerializerOptions,
    ) -> crate::Result<Option<String>, PackError> {
        Ok(reader.read_str()?.map(ToString::to_string))
    }
}

impl FormatterRegistry {
    /// 创建预装全部标量解析器的注册中心。
    pub fn with_primitives() -> Self {
        let registry = Self::new();
        registry.register::<bool, _>(BoolFormatter);
        registry.register::<u8, _>(U8Formatter);
        registry.register::<u16, _>(U16Formatter);
        registry.register::<u32, _>(U32Formatter);
        registry.register::<u64, _>(U64Formatter);
        registry.register::<i32, _>(I32Formatter);
        registry.register::<i64, _>(I64Formatter);
        registry.register::<String, _>(StringFormatter);
        registry
    }
}
