pub mod math;
pub mod num;
pub mod parallelism;
