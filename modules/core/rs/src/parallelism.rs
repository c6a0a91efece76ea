use std::cmp::Ordering;
use std::thread::available_parallelism;

use eyre::Result;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Resolve the requested number of threads against the available ones:
/// * 0 runs everything on a single thread;
/// * positive values are capped by the number of available threads;
/// * negative values reserve |requested| - 1 threads, e.g. -1 means all available threads.
fn resolve(requested: isize, max: isize) -> usize {
    match requested.cmp(&0) {
        Ordering::Less => (max + requested + 1).max(1) as usize,
        Ordering::Equal => 1,
        Ordering::Greater => requested.min(max) as usize,
    }
}

pub fn available(requested: isize) -> Result<usize> {
    let max = available_parallelism()?.get() as isize;
    Ok(resolve(requested, max))
}

/// Build a thread pool with the requested number of threads (see [`available`]).
/// The calling thread participates in the pool.
pub fn pool(requested: isize) -> Result<ThreadPool> {
    let threads = available(requested)?;
    log::debug!("Building a thread pool with {threads} threads (requested: {requested})");

    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .use_current_thread()
        .build()?;
    Ok(pool)
}
