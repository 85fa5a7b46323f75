pub mod request;
pub mod spec;
pub mod sql;

pub use request::{ListQuery, ListRequest};
pub use spec::{PageMode, Predicate, QuerySpec, SortField, SortSpec};
