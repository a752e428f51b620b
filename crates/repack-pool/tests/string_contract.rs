//! `string_contract` 集成测试：验证字符缓冲在解码路径下的容量复用契约。
//!
//! # 测试目标（Why）
//! - 字符缓冲的复用收益是“保留容量、原地覆写”；指针稳定性是
//!   无重新分配的直接证据；
//! - 线缆表示只携带逻辑前缀，零值字节之后的残留不得泄漏到编码。

use std::sync::Arc;

use repack_core::{
    FormatterRegistry, MessageReader, ReuseOutcome, SerializerOptions, deserialize,
    deserialize_into, deserialize_into_reader, serialize,
};
use repack_pool::{PooledString, PooledStringFormatter};

fn reuse_options() -> SerializerOptions {
    let registry = FormatterRegistry::with_primitives();
    registry.register_reuse::<PooledString, _>(PooledStringFormatter::new());
    SerializerOptions::new(Arc::new(registry))
}

#[test]
fn serialize_emits_only_the_logical_prefix() {
    let options = reuse_options();
    let value = PooledString::from_vec(vec![b'a', b'b', 0, b'c']);
    let encoded = serialize(&value, &options).expect("编码失败");
    // fixarray(2) + 两个 fixint 字节。
    assert_eq!(encoded.as_ref(), &[0x92, b'a', b'b']);
}

#[test]
fn reuse_overwrites_in_place_without_reallocating() {
    let options = reuse_options();
    let encoded = serialize(&PooledString::from("new!"), &options).expect("编码失败");

    let mut existing = PooledString::with_capacity(16);
    existing.push_byte(b'o');
    existing.push_byte(b'l');
    existing.push_byte(b'd');
    let ptr = existing.as_bytes().as_ptr();

    let outcome = deserialize_into(&encoded, &mut existing, &options).expect("复用解码失败");
    assert_eq!(outcome, ReuseOutcome::Decoded);
    assert_eq!(existing, "new!");
    assert_eq!(existing.as_bytes().as_ptr(), ptr, "容量充足时复用不得重新分配");
}

#[test]
fn nil_returns_empty_sentinel_and_keeps_existing() {
    let options = reuse_options();
    let mut existing = PooledString::from("untouched");
    let outcome = deserialize_into(&[0xc0], &mut existing, &options).expect("nil 解码失败");
    assert!(outcome.is_nil());
    assert_eq!(existing, "untouched");

    let fresh = deserialize::<PooledString>(&[0xc0], &options).expect("nil 解码失败");
    assert!(fresh.is_none());
}

#[test]
fn round_trip_preserves_logical_content() {
    let options = reuse_options();
    let source = PooledString::from("Lee");
    let encoded = serialize(&source, &options).expect("编码失败");

    let mut existing = PooledString::from("previous content");
    let _ = deserialize_into(&encoded, &mut existing, &options).expect("复用解码失败");
    assert_eq!(existing, source);

    let reencoded = serialize(&existing, &options).expect("重新编码失败");
    assert_eq!(reencoded, encoded);
}

#[test]
fn nesting_depth_is_balanced_for_buffers() {
    let options = reuse_options();
    let encoded = serialize(&PooledString::from("depth"), &options).expect("编码失败");

    let mut reader = MessageReader::new(&encoded);
    let mut existing = PooledString::new();
    let _ = deserialize_into_reader(&mut reader, &mut existing, &options).expect("复用解码失败");
    assert_eq!(reader.nesting_depth(), 0);
}
