//! Shows priority ordering on a single busy worker

use nestpool::ThreadPool;
use std::thread;
use std::time::Duration;

fn main() {
    let pool = ThreadPool::new(1, 5).expect("failed to start pool");

    // keep the only worker busy while the rest queue up
    let blocker = pool.submit_with_priority(100, || {
        thread::sleep(Duration::from_millis(50));
        println!("[blocker] done");
    });

    let handles: Vec<_> = [(0, "normal"), (-5, "background"), (10, "urgent"), (0, "normal again")]
        .into_iter()
        .map(|(priority, label)| {
            pool.submit_with_priority(priority, move || {
                println!("[{:>3}] {}", priority, label);
            })
        })
        .collect();

    blocker.join().expect("blocker failed");
    for handle in handles {
        handle.join().expect("task failed");
    }
}
