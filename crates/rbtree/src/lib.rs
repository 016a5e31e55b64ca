mod cmp;
mod error;
mod tree;

pub use cmp::{Comparator, NaturalOrder};
pub use error::EmptyStructureError;
pub use tree::{Iter, RbTree};
