//! Convenient imports for typical `dmlkit` usage.
//!
//! ```ignore
//! use dmlkit::prelude::*;
//! ```

pub use crate::{
    ConnectionConfig, Connector, DbResult, DeleteBuilder, ErrorCode, InsertBuilder, QueryError,
    SelectBuilder, Session, SqlBuilder, Table, UpdateBuilder,
};
