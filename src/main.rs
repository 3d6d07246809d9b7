//! Bootstrap entrypoint: prepares the database the request handlers run over.

use pantry_ledger::config;
use pantry_ledger::errors::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenvy::dotenv().ok();

    // 3. Load the category taxonomy (built-in defaults when config.toml is absent)
    let categories = config::categories::load_default_config();
    info!(
        categories = categories.categories.len(),
        fallback = %categories.fallback,
        "loaded category taxonomy"
    );

    // 4. Connect and create tables
    let db = config::database::create_connection().await?;
    config::database::create_tables(&db).await?;
    info!(url = %config::database::get_database_url(), "database ready");

    Ok(())
}
