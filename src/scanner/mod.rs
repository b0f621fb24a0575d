mod filter;
mod walk;

pub use filter::{ExclusionFilter, ItemFilter, dotted_extension};
pub use walk::{ItemCounter, TreeWalker, WalkEntry, WalkVisitor};
