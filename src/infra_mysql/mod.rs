mod product_repo_mysql;

pub use product_repo_mysql::*;

mod util;
