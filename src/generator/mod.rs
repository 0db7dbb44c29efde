mod generator;

pub use generator::{GenerationError, Generator};
