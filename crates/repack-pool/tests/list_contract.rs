//! `list_contract` 集成测试：验证池化序列在真实解码路径下的复用契约。
//!
//! # 测试目标（Why）
//! - 回收池的生命周期（清空入池、FIFO 出队、能力确认先于出队）是本
//!   crate 的核心不变量，必须在公开 API 视角下有回归防护；
//! - 复用是否真的避免了分配，通过元素内部堆缓冲的指针稳定性观察。
//!
//! # 结构安排（How）
//! - 元素类型统一使用 [`PooledString`]：既有 `Default`，又声明复用能力，
//!   还自带可供指针断言的堆状态；
//! - 深度、取消与 nil 边界各自独立成组，避免互相掩盖失败原因。

use std::sync::Arc;

use repack_core::{
    Cancellation, Formatter, FormatterRegistry, MessageReader, ReuseFormatter, ReuseOutcome,
    SerializerOptions, codes, deserialize_into, deserialize_into_reader, serialize,
};
use repack_pool::{PooledList, PooledListFormatter, PooledString, PooledStringFormatter};

fn reuse_options() -> SerializerOptions {
    let registry = FormatterRegistry::with_primitives();
    registry.register_reuse::<PooledString, _>(PooledStringFormatter::new());
    registry.register_reuse::<PooledList<PooledString>, _>(PooledListFormatter::new());
    registry.register_reuse::<PooledList<u64>, _>(PooledListFormatter::new());
    SerializerOptions::new(Arc::new(registry))
}

fn string_list(values: &[&str]) -> PooledList<PooledString> {
    values.iter().map(|v| PooledString::from(*v)).collect()
}

fn buffer_ptrs(list: &PooledList<PooledString>) -> Vec<*const u8> {
    list.iter().map(|s| s.as_bytes().as_ptr()).collect()
}

#[test]
fn full_reuse_keeps_every_element_buffer() {
    let options = reuse_options();
    let encoded = serialize(&string_list(&["dddd", "eeee", "ffff"]), &options).expect("编码失败");

    let mut existing = string_list(&["aaaa", "bbbb", "cccc"]);
    let before = buffer_ptrs(&existing);
    existing.clear_to_pool();
    assert_eq!(existing.recycled_len(), 3);

    let outcome = deserialize_into(&encoded, &mut existing, &options).expect("复用解码失败");
    assert_eq!(outcome, ReuseOutcome::Decoded);
    assert_eq!(existing.len(), 3);
    assert_eq!(existing.recycled_len(), 0, "三个回收实例应全部被取用");
    let after = buffer_ptrs(&existing);
    assert_eq!(after, before, "FIFO 复用应让元素缓冲按原顺序回到活跃序列");
    assert_eq!(existing.active()[0], "dddd");
    assert_eq!(existing.active()[2], "ffff");
}

#[test]
fn partial_reuse_consumes_pool_then_allocates() {
    let options = reuse_options();
    let encoded = serialize(&string_list(&["x", "yy", "zzz"]), &options).expect("编码失败");

    let mut existing = string_list(&["seed"]);
    let seed_ptr = existing.active()[0].as_bytes().as_ptr();
    existing.clear_to_pool();

    let outcome = deserialize_into(&encoded, &mut existing, &options).expect("复用解码失败");
    assert_eq!(outcome, ReuseOutcome::Decoded);
    assert_eq!(existing.len(), 3);
    assert_eq!(existing.recycled_len(), 0);
    assert_eq!(
        existing.active()[0].as_bytes().as_ptr(),
        seed_ptr,
        "首个元素应复用唯一的回收实例"
    );
    assert_eq!(existing.active()[1], "yy");
    assert_eq!(existing.active()[2], "zzz");
}

#[test]
fn recycled_instances_survive_when_element_lacks_capability() {
    let options = reuse_options();
    // u64 只注册了基础解析器:复用能力缺失时，回收队列必须原封不动，
    // 不允许“先出队、能力检查失败后丢弃”的泄漏路径。
    let mut existing: PooledList<u64> = vec![11u64, 22].into();
    existing.clear_to_pool();
    assert_eq!(existing.recycled_len(), 2);

    let encoded = serialize(&PooledList::from(vec![1u64, 2, 3]), &options).expect("编码失败");
    let _ = deserialize_into(&encoded, &mut existing, &options).expect("解码失败");

    assert_eq!(existing.active(), &[1, 2, 3]);
    assert_eq!(existing.recycled_len(), 2, "无能力元素不得消费回收实例");
}

#[test]
fn nil_leaves_existing_container_untouched() {
    let options = reuse_options();
    let mut existing = string_list(&["live"]);
    existing.clear_to_pool();
    existing.push(PooledString::from("active"));
    let recycled_before = existing.recycled_len();

    for _ in 0..2 {
        let outcome = deserialize_into(&[0xc0], &mut existing, &options).expect("nil 解码失败");
        assert!(outcome.is_nil());
        assert_eq!(existing.len(), 1, "活跃序列不得被 nil 分支清理");
        assert_eq!(existing.active()[0], "active");
        assert_eq!(
            existing.recycled_len(),
            recycled_before,
            "连续 nil 解码不回收活跃元素"
        );
    }
}

#[test]
fn round_trip_reencodes_byte_identical() {
    let options = reuse_options();
    let source = string_list(&["Lee", "Kim", "Park"]);
    let encoded = serialize(&source, &options).expect("编码失败");

    let mut existing = string_list(&["one", "two", "three"]);
    existing.clear_to_pool();
    let _ = deserialize_into(&encoded, &mut existing, &options).expect("复用解码失败");

    let reencoded = serialize(&existing, &options).expect("重新编码失败");
    assert_eq!(reencoded, encoded, "逻辑内容一致时重新编码必须逐字节相等");
}

#[test]
fn nesting_depth_is_balanced_after_success() {
    let options = reuse_options();
    let encoded = serialize(&string_list(&["ok"]), &options).expect("编码失败");

    let mut reader = MessageReader::new(&encoded);
    let mut existing: PooledList<PooledString> = PooledList::new();
    let _ = deserialize_into_reader(&mut reader, &mut existing, &options).expect("复用解码失败");
    assert_eq!(reader.nesting_depth(), 0, "成功路径必须归还全部层级");
}

#[test]
fn nesting_depth_is_balanced_after_failure() {
    // 深度上限 1:外层序列占用唯一层级，元素字符缓冲触发超限。
    let options = reuse_options().with_max_depth(std::num::NonZeroU16::new(1).expect("非零上限"));
    let roomy = reuse_options();
    let encoded = serialize(&string_list(&["deep"]), &roomy).expect("编码失败");

    let mut reader = MessageReader::new(&encoded);
    let mut existing: PooledList<PooledString> = PooledList::new();
    let err = deserialize_into_reader(&mut reader, &mut existing, &options)
        .expect_err("超过深度上限必须失败");
    assert_eq!(err.code(), codes::CODEC_DECODE_FAILED);
    let cause = err.cause().expect("原始原因必须保留");
    assert!(cause.to_string().contains(codes::CODEC_DEPTH_EXCEEDED));
    assert_eq!(reader.nesting_depth(), 0, "失败路径同样必须归还全部层级");
}

#[test]
fn depth_limit_surfaces_directly_from_formatter() {
    let options = reuse_options().with_max_depth(std::num::NonZeroU16::new(1).expect("非零上限"));
    let roomy = reuse_options();
    let encoded = serialize(&string_list(&["deep"]), &roomy).expect("编码失败");

    let formatter = PooledListFormatter::<PooledString>::new();
    let mut reader = MessageReader::new(&encoded);
    let mut existing: PooledList<PooledString> = PooledList::new();
    let err = formatter
        .deserialize_into(&mut reader, &mut existing, &options)
        .expect_err("超限必须失败");
    assert_eq!(err.code(), codes::CODEC_DEPTH_EXCEEDED);
}

#[test]
fn cancellation_is_observed_at_element_boundary() {
    let token = Cancellation::new();
    let options = reuse_options().with_cancellation(token.child());
    let encoded = serialize(&string_list(&["a", "b"]), &options).expect("编码失败");

    token.cancel();

    let formatter = PooledListFormatter::<PooledString>::new();
    let mut reader = MessageReader::new(&encoded);
    let mut existing: PooledList<PooledString> = PooledList::new();
    let err = formatter
        .deserialize_into(&mut reader, &mut existing, &options)
        .expect_err("取消后解码必须中断");
    assert_eq!(err.code(), codes::CODEC_CANCELLED);
    assert_eq!(reader.nesting_depth(), 0, "取消路径也要归还层级");

    // 序列化循环同样尊重取消信号。
    let err = formatter
        .serialize(
            &string_list(&["a"]),
            &mut repack_core::MessageWriter::new(),
            &options,
        )
        .expect_err("取消后序列化必须中断");
    assert_eq!(err.code(), codes::CODEC_CANCELLED);
}

#[test]
fn fresh_deserialize_maps_nil_to_none() {
    let options = reuse_options();
    let decoded =
        repack_core::deserialize::<PooledList<PooledString>>(&[0xc0], &options).expect("解码失败");
    assert!(decoded.is_none());
}
