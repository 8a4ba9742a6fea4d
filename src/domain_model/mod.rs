mod cast;
mod product;
mod query;
mod validation;

pub use cast::*;
pub use product::*;
pub use query::*;
pub use validation::*;
