//! Recursive divide-and-conquer sum on a small pool

use nestpool::{Config, ThreadPool};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn sum_range(pool: &Arc<ThreadPool>, lo: u64, hi: u64) -> u64 {
    if hi - lo <= 10_000 {
        return (lo..hi).sum();
    }
    let mid = lo + (hi - lo) / 2;
    let p = pool.clone();
    let left = pool.submit(move || sum_range(&p, lo, mid));
    let right = sum_range(pool, mid, hi);
    pool.wait(left).expect("left half failed") + right
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::builder()
        .num_threads(2)
        .max_recursion_depth(4)
        .build()
        .expect("invalid config");
    let pool = Arc::new(ThreadPool::with_config(config).expect("failed to start pool"));

    let start = Instant::now();
    let p = pool.clone();
    let total = pool.submit(move || sum_range(&p, 0, 10_000_000));
    let total = pool.wait(total).expect("sum failed");

    println!("sum = {} in {:?}", total, start.elapsed());
    println!("{:#?}", pool.metrics());
}
