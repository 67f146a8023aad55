use std::time::{Duration, Instant};

use concurrent_chainmap::{ChainedHashTable, TableConfig};

const TARGET_LOAD_FACTOR: f64 = 0.75;

struct Latencies {
    total: Duration,
    p50: Duration,
    p99: Duration,
    max: Duration,
    final_capacity: u64,
}

fn measure(size: usize, step: impl Fn(&ChainedHashTable)) -> Latencies {
    let table = ChainedHashTable::with_config(TableConfig::new()).expect("failed to create table");
    let mut times = Vec::with_capacity(size);

    let start = Instant::now();
    for i in 0..size {
        let key = format!("request_{i:08}");
        let op_start = Instant::now();
        table.put(&key, i.to_le_bytes());
        step(&table);
        times.push(op_start.elapsed());
    }
    let total = start.elapsed();

    // finish whatever is still pending so the final capacity is comparable
    while !table.resize_partial(Duration::from_millis(10), TARGET_LOAD_FACTOR).unwrap() {}

    times.sort();
    let len = times.len();
    Latencies {
        total,
        p50: times[len / 2],
        p99: times[(len as f64 * 0.99) as usize],
        max: times[len - 1],
        final_capacity: table.capacity(),
    }
}

fn report(name: &str, l: &Latencies) {
    println!("{name}");
    println!("  Total time:     {:?}", l.total);
    println!("  P50 request:    {:?}", l.p50);
    println!("  P99 request:    {:?}", l.p99);
    println!("  Max request:    {:?}", l.max);
    println!("  Final capacity: {}", l.final_capacity);
}

fn main() {
    println!("=== Full vs incremental resize, one resize call per request ===");

    for size in [100_000, 1_000_000] {
        println!("\n--- {size} requests ---");

        let full = measure(size, |table| {
            table.resize_full(TARGET_LOAD_FACTOR).unwrap();
        });
        report("resize_full", &full);

        for budget in [Duration::from_micros(10), Duration::from_micros(100)] {
            let partial = measure(size, |table| {
                table.resize_partial(budget, TARGET_LOAD_FACTOR).unwrap();
            });
            report(&format!("resize_partial({budget:?})"), &partial);

            if partial.max.as_nanos() > 0 {
                println!(
                    "  Max request improvement over full: {:.2}x",
                    full.max.as_nanos() as f64 / partial.max.as_nanos() as f64
                );
            }
        }
    }
}
