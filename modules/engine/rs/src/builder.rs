use eyre::Result;
use rayon::ThreadPool;

use multiplacement_core_rs::parallelism;

use crate::engine::Engine;
use crate::gap::Floors;

#[derive(Default)]
pub struct EngineBuilder {
    floors: Floors,
    thread_pool: Option<ThreadPool>,
}

impl EngineBuilder {
    pub fn set_floors(mut self, floors: Floors) -> Self {
        self.floors = floors;
        self
    }

    pub fn set_thread_pool(mut self, pool: ThreadPool) -> Self {
        self.thread_pool = Some(pool);
        self
    }

    /// Run the DP on a dedicated pool with the given number of threads, see
    /// [`parallelism::available`] for the meaning of zero and negative values.
    pub fn set_threads(self, threads: isize) -> Result<Self> {
        Ok(self.set_thread_pool(parallelism::pool(threads)?))
    }

    pub fn build(self) -> Engine {
        Engine::new(self.thread_pool, self.floors)
    }
}
