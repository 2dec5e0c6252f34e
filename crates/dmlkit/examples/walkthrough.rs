//! Walk through builders, validation and a live session.
//!
//! Run with:
//!   cargo run --example walkthrough -p dmlkit
//!
//! Optional (run the statements against a real DB):
//!   DMLKIT_DATABASE=test DMLKIT_USER=postgres DMLKIT_PASSWORD=postgres
//!
//! Set `RUST_LOG=dmlkit=debug` to see every statement as it is sent.

use colored::Colorize;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table as Grid, presets::UTF8_FULL};
use dmlkit::{
    ConnectionConfig, Connector, DbResult, DeleteBuilder, InsertBuilder, SelectBuilder, Session,
    SqlBuilder, StatementKind, Table, UpdateBuilder, validate,
};

const TESTE: &str = "dmlkit_teste";
const COLUMNS: [&str; 2] = ["id", "string"];

fn insert_teste() -> InsertBuilder {
    let mut ib = InsertBuilder::new(TESTE);
    ib.columns(COLUMNS);
    ib
}

fn select_teste() -> SelectBuilder {
    let mut qb = SelectBuilder::new(TESTE);
    qb.columns(COLUMNS);
    qb
}

fn print_header(title: &str) {
    println!();
    println!("{}", "─".repeat(70).bright_black());
    println!("{}", title.bold().cyan());
    println!("{}", "─".repeat(70).bright_black());
}

fn print_success(msg: &str) {
    println!("  {} {}", "✓".green().bold(), msg);
}

fn print_failure(msg: &str) {
    println!("  {} {}", "✗".red().bold(), msg);
}

fn print_table(table: &Table) {
    let mut grid = Grid::new();
    grid.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(table.headers().iter().map(|h| {
            Cell::new(h)
                .add_attribute(Attribute::Bold)
                .fg(Color::Cyan)
        }));
    for row in table.data_rows() {
        grid.add_row(row.iter().map(|cell| match cell.as_str() {
            dmlkit::NULL => Cell::new("NULL").fg(Color::DarkGrey),
            _ => Cell::new(cell),
        }));
    }
    println!("{grid}");
}

fn show_builders() -> DbResult<()> {
    print_header("Builders");

    let mut ib = insert_teste();
    ib.row(["73", "Hello"]).row(["75"]);
    print_success(&ib.build_sql()?);

    let mut ub = UpdateBuilder::new(TESTE);
    ub.set("string", "%NULL%").condition("id = 73");
    print_success(&ub.build_sql()?);

    print_success(&DeleteBuilder::new(TESTE).build_sql()?);

    let mut qb = select_teste();
    qb.condition("WHERE id < 77").complement("ORDER BY id DESC");
    print_success(&qb.build_sql()?);

    print_header("Validation");
    for (kind, sql) in [
        (StatementKind::Delete, "SELECT * FROM dmlkit_teste"),
        (StatementKind::Update, "   "),
        (StatementKind::Select, "SELECT id FROM dmlkit_teste"),
    ] {
        match validate(kind, sql) {
            Ok(query) => print_success(&format!("{kind}: {query}")),
            Err(e) => print_failure(&format!("{kind}: {e}")),
        }
    }
    Ok(())
}

async fn run_live(config: ConnectionConfig) -> DbResult<()> {
    print_header("Session");

    let mut session = Session::postgres(config);
    session.open().await?;
    session
        .connector_mut()
        .execute("CREATE TABLE IF NOT EXISTS dmlkit_teste (id INT PRIMARY KEY, string TEXT)")
        .await?;
    session.delete(&DeleteBuilder::new(TESTE)).await?;

    let mut count = SelectBuilder::new(TESTE);
    count.columns(["COUNT(*)"]);
    let count = session.select(&count).await?;
    print_success(&format!(
        "{} rows in {}",
        count.table.cell(0, 0).unwrap_or("?"),
        count.table_name.as_deref().unwrap_or("?")
    ));

    let mut ib = insert_teste();
    ib.row(["73", "Hello"]).row(["75", "World"]).row(["76"]);
    let done = session.insert(&ib).await?;
    print_success(&format!("inserted {} rows", done.affected_rows));

    let mut ub = UpdateBuilder::new(TESTE);
    ub.set("string", "TEST").condition("id = 73");
    session.update(&ub).await?;

    let mut qb = select_teste();
    qb.complement("ORDER BY id");
    let selection = session.select(&qb).await?;
    print_table(&selection.table);

    // Feed the selection back in as new rows.
    session.delete(&DeleteBuilder::new(TESTE)).await?;
    let copy = InsertBuilder::from_table(TESTE, &selection.table);
    let done = session.insert(&copy).await?;
    print_success(&format!("copied {} rows back", done.affected_rows));

    let mut only_nulls = SelectBuilder::new(TESTE);
    only_nulls.columns(["id"]).condition("string IS NULL");
    let selection = session.select(&only_nulls).await?;
    print_table(&selection.table);

    if let Err(e) = session.delete_raw("DELETE dmlkit_teste").await {
        print_failure(&format!("{e} (report code {:?})", session.last_report().error.as_ref().map(|e| e.code())));
    }

    session
        .connector_mut()
        .execute("DROP TABLE dmlkit_teste")
        .await?;
    session.close().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> DbResult<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    show_builders()?;

    match ConnectionConfig::from_env() {
        Ok(config) => run_live(config).await?,
        Err(_) => {
            println!();
            println!("{}", "DMLKIT_DATABASE is not set; skipping the live session.".yellow());
        }
    }
    Ok(())
}
