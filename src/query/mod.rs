pub mod catalog;
pub mod error;
pub mod exec;
pub mod types;

pub use catalog::CatalogQuery;
pub use error::QueryError;
pub use types::{FilterField, Pagination, SortField, SortOrder, SqlResult};
