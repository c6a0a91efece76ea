pub use builder::EngineBuilder;
pub use engine::Engine;
pub use gap::Floors;
pub use normalization::Log2Table;
pub use organism::{Base, Connector, Organism, Recognizer};
pub use placement::Placement;

use eyre::Result;
use multiplacement_core_rs::num::Float;

pub mod align;
mod builder;
mod engine;
pub mod gap;
pub mod geometry;
pub mod layout;
pub mod matrix;
mod normalization;
mod organism;
mod placement;
pub mod scan;
pub mod traceback;

/// Place the organism on the sequence with the default engine, see [`Engine::run`].
pub fn place<S: Float>(
    seq: &[u8],
    organism: &Organism<S>,
    table: Option<&Log2Table>,
) -> Result<Placement<S>> {
    Engine::default().run(seq, organism, table)
}
