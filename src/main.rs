use std::{process, sync::Arc};

use quaderno::{
    application::{error::AppError, posts::PostService, repos::PostsRepo},
    config,
    infra::{db::PostgresPosts, error::InfraError, http, mem::MemoryPosts, telemetry},
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (_cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    let db = init_primary_store(&settings).await?;
    let fallback: Arc<dyn PostsRepo> = Arc::new(MemoryPosts::seeded());
    let primary = db.clone().map(|store| store as Arc<dyn PostsRepo>);
    let posts = Arc::new(PostService::new(primary, fallback));

    serve_http(&settings, http::AppState { posts, db }).await
}

/// Build the Postgres tier when a URL is configured. The pool is lazy and
/// migrations are best-effort: a down database at startup still leaves
/// the server running on the fallback store.
async fn init_primary_store(
    settings: &config::Settings,
) -> Result<Option<Arc<PostgresPosts>>, AppError> {
    let Some(url) = settings.database.url.as_ref() else {
        info!(
            target = "quaderno::store",
            "no database url configured, serving from in-memory fallback"
        );
        return Ok(None);
    };

    let pool = PostgresPosts::connect_lazy(url, settings.database.max_connections.get())
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    if let Err(err) = PostgresPosts::run_migrations(&pool).await {
        warn!(
            target = "quaderno::store",
            error = %err,
            "migrations could not run, primary store will be retried per call"
        );
    }

    Ok(Some(Arc::new(PostgresPosts::new(pool))))
}

async fn serve_http(settings: &config::Settings, state: http::AppState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "quaderno::http",
        addr = %settings.server.addr,
        "listening"
    );

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}
