//! Domain layer: the question tree and its file format
//!
//! This layer is independent of external concerns (no prompting, no CLI, no config loading).

pub mod arena;
pub mod codec;
pub mod display;
pub mod error;
pub mod node;

pub use arena::{QuestionTree, TreeIterator, DEFAULT_ANSWER};
pub use display::TreeDisplay;
pub use error::{DomainError, DomainResult};
pub use node::{Node, NodeKind};
