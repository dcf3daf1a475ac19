// mod.rs - Query module root

pub mod engine;
pub mod functions;
pub mod rewrite;

pub use engine::QueryEngine;
