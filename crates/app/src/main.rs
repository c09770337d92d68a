use migration::{Migrator, MigratorTrait};

mod settings;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("invalid settings: {0}")]
    Settings(#[from] config::ConfigError),
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("engine error: {0}")]
    Engine(#[from] engine::EngineError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "divvy={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = connect(&settings.server.database).await?;
    tracing::info!(
        strict_percentages = settings.engine.strict_percentages,
        "database ready"
    );

    let engine = engine::Engine::builder()
        .database(db)
        .strict_percentages(settings.engine.strict_percentages)
        .build()
        .await?;

    let bind = settings
        .server
        .bind
        .as_deref()
        .unwrap_or("127.0.0.1")
        .to_string();
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    server::run_with_listener(engine, listener).await?;

    Ok(())
}

async fn connect(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, StartupError> {
    let database = sea_orm::Database::connect(config.url()).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
