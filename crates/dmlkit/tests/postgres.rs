//! Round trips against a live PostgreSQL server.
//!
//! Skipped unless `DMLKIT_DATABASE` is set (see `ConnectionConfig::from_env`).

use dmlkit::{
    ConnectionConfig, Connector, DbResult, InsertBuilder, PgConnector, SelectBuilder, Session,
    UpdateBuilder,
};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

fn live_config(test: &str) -> Option<ConnectionConfig> {
    let _ = dotenvy::dotenv();
    match ConnectionConfig::from_env() {
        Ok(config) => Some(config),
        Err(_) => {
            eprintln!("DMLKIT_DATABASE is not set; skipping {test}");
            None
        }
    }
}

fn scratch_table() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before UNIX_EPOCH")
        .as_nanos();
    format!("dmlkit_test_{}_{}", std::process::id(), nanos)
}

#[tokio::test]
async fn crud_roundtrip() -> DbResult<()> {
    let Some(config) = live_config("crud_roundtrip") else {
        return Ok(());
    };
    let table = scratch_table();

    let mut session = Session::connect(config).await?;
    session
        .connector_mut()
        .execute(&format!("CREATE TABLE {table} (id INT PRIMARY KEY, string TEXT)"))
        .await?;

    let mut ib = InsertBuilder::new(&table);
    ib.columns(["id", "string"])
        .row(["73", "Hello"])
        .row(["75", "%NULL%"])
        .row(["76"]);
    assert_eq!(session.insert(&ib).await?.affected_rows, 3);

    let mut qb = SelectBuilder::new(&table);
    qb.columns(["id", "string"]).complement("ORDER BY id");
    let selection = session.select(&qb).await?;
    assert_eq!(selection.table.headers(), ["id", "string"]);
    assert_eq!(selection.row_count(), 3);
    assert_eq!(selection.table.cell(1, 1), Some("%NULL%"));
    assert_eq!(selection.table_name.as_deref(), Some(table.as_str()));

    let mut ub = UpdateBuilder::new(&table);
    ub.set("string", "TEST").condition("id = 73");
    assert_eq!(session.update(&ub).await?.affected_rows, 1);

    // Copy the selected rows into a second table.
    let copy = format!("{table}_copy");
    session
        .connector_mut()
        .execute(&format!("CREATE TABLE {copy} (id INT, string TEXT)"))
        .await?;
    let ib = InsertBuilder::from_table(&copy, &selection.table);
    assert_eq!(session.insert(&ib).await?.affected_rows, 3);

    let mut count = SelectBuilder::new(&copy);
    count.columns(["COUNT(*)"]).condition("string IS NULL");
    let selection = session.select(&count).await?;
    assert_eq!(selection.table.cell(0, 0), Some("2"));

    let done = session.delete_raw(&format!("DELETE FROM {table}")).await?;
    assert_eq!(done.affected_rows, 3);

    session
        .connector_mut()
        .execute(&format!("DROP TABLE {table}; DROP TABLE {copy}"))
        .await?;
    session.close().await?;
    Ok(())
}

#[tokio::test]
async fn empty_table_selects_headers_only() -> DbResult<()> {
    let Some(config) = live_config("empty_table_selects_headers_only") else {
        return Ok(());
    };
    let table = scratch_table();

    let mut session = Session::connect(config).await?;
    session
        .connector_mut()
        .execute(&format!("CREATE TABLE {table} (id INT, string TEXT)"))
        .await?;

    let selection = session
        .select_raw(&format!("SELECT * FROM {table}"))
        .await?;
    assert_eq!(selection.row_count(), 0);
    assert_eq!(selection.table.headers(), ["id", "string"]);

    session
        .connector_mut()
        .execute(&format!("DROP TABLE {table}"))
        .await?;
    Ok(())
}

#[tokio::test]
async fn unreachable_server_is_code_zero() {
    let config = ConnectionConfig::new("test")
        .server("127.0.0.1")
        .port(1)
        .connect_timeout(Duration::from_secs(2));
    let mut session = Session::new(PgConnector::new(config));

    let err = session
        .delete_raw("DELETE FROM teste WHERE id = 73")
        .await
        .unwrap_err();
    assert!(err.is_connection());
    assert_eq!(err.code(), 0);
    assert_eq!(err.native_code(), Some("08001"));
    assert!(!session.is_connected());
    assert_eq!(session.last_report().error.as_ref().map(|e| e.code()), Some(0));
}
