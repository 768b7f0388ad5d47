pub mod constants;
#[allow(clippy::module_inception)]
pub mod db_ops;

pub use crate::datalayer::db_ops::constants::DbConfig;
pub use db_ops::{DatabaseHealth, DbManager, initialize_database};
