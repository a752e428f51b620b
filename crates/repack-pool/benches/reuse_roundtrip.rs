use criterion::{Criterion, black_box};
use std::{env, sync::Arc, time::Duration};

use repack_core::{FormatterRegistry, SerializerOptions, deserialize, deserialize_into, serialize};
use repack_pool::{PooledList, PooledListFormatter, PooledString, PooledStringFormatter};

/// 对比基准：同一负载下“全新分配解码”与“池化复用解码”的往返成本。
///
/// # 设计背景（Why）
/// - 复用解码的全部意义在于摊销分配成本；该基准持续跟踪两条路径的
///   差距，防止后续重构悄悄退化复用收益。
///
/// # 逻辑解析（How）
/// - 负载为 64 个短字符缓冲组成的序列，贴近高频业务消息的形态；
/// - 复用路径在循环外构造一次原型，循环内反复解码进同一实例；
///   全新路径每次迭代都完整分配。
fn bench_reuse_roundtrip(c: &mut Criterion) {
    let registry = FormatterRegistry::with_primitives();
    registry.register_reuse::<PooledString, _>(PooledStringFormatter::new());
    registry.register_reuse::<PooledList<PooledString>, _>(PooledListFormatter::new());
    let options = SerializerOptions::new(Arc::new(registry));

    let source: PooledList<PooledString> = (0..64)
        .map(|i| PooledString::from(format!("payload-{i:04}").as_str()))
        .collect();
    let encoded = serialize(&source, &options).expect("基准负载编码失败");

    c.bench_function("decode_fresh", |b| {
        b.iter(|| {
            let decoded = deserialize::<PooledList<PooledString>>(&encoded, &options)
                .expect("全新解码失败");
            black_box(decoded)
        });
    });

    c.bench_function("decode_into_pooled", |b| {
        let mut prototype: PooledList<PooledString> = PooledList::new();
        b.iter(|| {
            let _ = deserialize_into(&encoded, &mut prototype, &options).expect("复用解码失败");
            black_box(prototype.len())
        });
    });
}

fn main() {
    let mut quick_mode = false;
    for arg in env::args().skip(1) {
        if arg == "--quick" {
            quick_mode = true;
        }
    }

    let mut criterion = Criterion::default();
    if quick_mode {
        criterion = criterion
            .sample_size(10)
            .warm_up_time(Duration::from_millis(100))
            .measurement_time(Duration::from_millis(250));
    }

    bench_reuse_roundtrip(&mut criterion);
    criterion.final_summary();
}
