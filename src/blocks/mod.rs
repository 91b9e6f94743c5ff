//! Content blocks: the table convention, the handler registry, the loader
//! and the block types decorated in-crate.

pub mod columns;
pub mod loader;
pub mod registry;
pub mod table;

pub use registry::{BlockDecorator, BlockName, BlockRegistry};
pub use table::BlockConfig;
