use bookshelf_api::config::Settings;
use bookshelf_api::{AppState, router, store};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let settings = Settings::load()?;
    let store = store::build_store(&settings).await?;

    let app = router(AppState { store });
    let listener = tokio::net::TcpListener::bind(settings.server.addr.as_str()).await?;
    tracing::info!("listening on {}", settings.server.addr);
    axum::serve(listener, app).await?;

    Ok(())
}
