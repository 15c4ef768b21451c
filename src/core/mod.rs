// Core modules implementing the node facade, conversion items, and error modeling.
pub mod error;
pub mod item;
pub mod node;
