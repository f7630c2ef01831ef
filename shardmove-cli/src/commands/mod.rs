mod move_node;
mod sync;

pub use move_node::*;
pub use sync::*;

#[cfg(test)]
mod tests;
