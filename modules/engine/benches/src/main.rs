use std::time::Instant;

use multiplacement_core_rs::parallelism;
use multiplacement_engine_rs::{Connector, Engine, Log2Table, Organism, Recognizer};
use rayon::ThreadPoolBuilder;

const THREADS: isize = -1;
const SEQUENCE_LENGTH: usize = 5_000;
const REPEATS: usize = 5;
const WIDTHS: &[usize] = &[12, 8, 10, 6, 14];

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

// Linear congruential generator, keeps runs comparable between builds
fn lcg(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state >> 33
}

fn organism(state: &mut u64, precomputed: bool, max_length: usize) -> Organism<f32> {
    let recognizers = WIDTHS
        .iter()
        .map(|width| {
            let scores = (0..width * 4)
                .map(|_| (lcg(state) % 400) as f32 / 100.0 - 2.0)
                .collect();
            Recognizer::new(*width, scores).unwrap()
        })
        .collect();

    let connectors = (1..WIDTHS.len())
        .map(|ind| {
            let mu = 25.0 * ind as f32;
            if precomputed {
                let probabilities = (0..max_length)
                    .map(|gap| (-((gap as f32 - mu) / 10.0).powi(2)).exp())
                    .collect();
                Connector::precomputed(probabilities).unwrap()
            } else {
                Connector::parametric(mu, 10.0).unwrap()
            }
        })
        .collect();

    Organism::new(recognizers, connectors).unwrap()
}

fn main() {
    let threads = parallelism::available(THREADS).unwrap();
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .use_current_thread()
        .build()
        .unwrap();
    let engine = Engine::builder().set_thread_pool(pool).build();

    let mut state = 42;
    let seq: Vec<u8> = (0..SEQUENCE_LENGTH)
        .map(|_| b"ACGT"[(lcg(&mut state) % 4) as usize])
        .collect();
    let table = Log2Table::new(SEQUENCE_LENGTH);

    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    for precomputed in [false, true] {
        let organism = organism(&mut state, precomputed, SEQUENCE_LENGTH);

        let started = Instant::now();
        let mut placement = engine.run(&seq, &organism, Some(&table)).unwrap();
        for _ in 1..REPEATS {
            placement = engine.run(&seq, &organism, Some(&table)).unwrap();
        }
        let elapsed = started.elapsed() / REPEATS as u32;

        println!("Precomputed: {precomputed}, threads: {threads}, time per run: {elapsed:?}");
        println!(
            "\tStart: {}, gaps: {:?}, score: {}",
            placement.start(),
            placement.gaps(),
            placement.score()
        );
    }
}
