mod product_repo_memory;

pub use product_repo_memory::*;
