//! # dmlkit
//!
//! Build, validate and run plain-text DML against a SQL database.
//!
//! ## Features
//!
//! - **Builders**: INSERT / DELETE / UPDATE / SELECT from (table, columns, values, condition)
//! - **Validation**: every statement is checked against the operation it is run under
//! - **NULL sentinel**: the text `%NULL%` stands for SQL `NULL` wherever a value goes
//! - **Tables**: results come back as header-first row tables, ready to feed an INSERT
//! - **Stable error codes**: every failure carries a numeric [`ErrorCode`]
//! - **Sessions**: open on demand, close again afterwards, report the last call
//!
//! ## Builders
//!
//! ```
//! use dmlkit::{DeleteBuilder, SqlBuilder, UpdateBuilder};
//!
//! let sql = dmlkit::build_insert("teste", &["string", "id"], &[vec!["Hello"]], 0)?;
//! assert_eq!(sql, "INSERT INTO teste(string, id) VALUES ('Hello', NULL)");
//!
//! let mut ub = UpdateBuilder::new("teste");
//! ub.set("string", "%NULL%").condition("WHERE id = 73");
//! assert_eq!(ub.build_sql()?, "UPDATE teste SET string = NULL WHERE id = 73");
//!
//! assert_eq!(DeleteBuilder::new("teste").build_sql()?, "DELETE FROM teste WHERE TRUE");
//! # Ok::<(), dmlkit::QueryError>(())
//! ```
//!
//! ## Sessions
//!
//! ```ignore
//! use dmlkit::{ConnectionConfig, SelectBuilder, Session};
//!
//! let mut session = Session::postgres(ConnectionConfig::new("test").user("Manager"));
//!
//! let mut count = SelectBuilder::new("teste");
//! count.columns(["COUNT(*)"]);
//! let selection = session.select(&count).await?;
//! println!("{} rows in {:?}", selection.table.cell(0, 0).unwrap_or("0"), selection.table_name);
//!
//! session.delete_raw("DELETE FROM teste WHERE id = 73").await?;
//! ```

pub mod builder;
pub mod condition;
pub mod connector;
pub mod error;
pub mod null;
pub mod postgres;
pub mod prelude;
pub mod session;
pub mod table;
pub mod validate;

pub use builder::{
    DeleteBuilder, InsertBuilder, SelectBuilder, SqlBuilder, UpdateBuilder,
    build_delete, build_insert, build_select, build_update,
};
pub use condition::normalize_condition;
pub use connector::{ConnectionConfig, Connector, connection_string};
pub use error::{DbResult, ErrorCode, QueryError};
pub use null::{NULL, substitute_null};
pub use postgres::PgConnector;
pub use session::{Execution, Selection, Session, SessionReport, accessed_table};
pub use table::{Columnar, Table, to_columnar, to_tabular};
pub use validate::{StatementKind, detect_statement_kind, validate};
