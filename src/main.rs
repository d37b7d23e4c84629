use std::process;
use std::sync::Arc;

use axum::routing::get;
use clap::Parser;
use kalem::application::categories::CategoryWorkspace;
use kalem::application::error::AppError;
use kalem::application::posts::PostWorkspace;
use kalem::application::uploads::MediaUploadService;
use kalem::config::{self, CliArgs, Command, ServeOverrides, Settings};
use kalem::infra::auth::HttpAuthProvider;
use kalem::infra::db::PostgresRepositories;
use kalem::infra::http::{self, AppState, db_health_response};
use kalem::infra::storage::HttpObjectStorage;
use kalem::infra::telemetry;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

mod seed;

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
    let args = CliArgs::parse();
    let config_file = args.config_file.as_deref();

    match args.command {
        None => serve(config_file, ServeOverrides::default()).await,
        Some(Command::Serve(serve_args)) => serve(config_file, serve_args.overrides).await,
        Some(Command::Seed(seed_args)) => seed::run(config_file, seed_args).await,
    }
}

async fn serve(
    config_file: Option<&std::path::Path>,
    overrides: ServeOverrides,
) -> Result<(), AppError> {
    let settings = config::load(config_file, &overrides)?;
    telemetry::init(&settings.logging)?;

    let repos = Arc::new(PostgresRepositories::connect(&settings.database).await?);
    let state = build_state(&settings, repos.clone());

    let health_repos = repos.clone();
    let router = http::build_router(state).route(
        "/healthz",
        get(move || {
            let repos = health_repos.clone();
            async move { db_health_response(repos.health_check().await) }
        }),
    );

    let address = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(kalem::infra::error::InfraError::Io)?;
    info!(%address, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(kalem::infra::error::InfraError::Io)?;

    Ok(())
}

fn build_state(settings: &Settings, repos: Arc<PostgresRepositories>) -> AppState {
    let client = reqwest::Client::new();

    let storage = Arc::new(HttpObjectStorage::new(
        client.clone(),
        settings.storage.endpoint.clone(),
        settings.storage.bucket.clone(),
        settings.storage.api_key.clone(),
    ));
    let auth = Arc::new(HttpAuthProvider::new(
        client,
        settings.auth.endpoint.clone(),
        settings.auth.api_key.clone(),
    ));

    AppState {
        posts_reader: repos.clone(),
        posts: Arc::new(PostWorkspace::new(repos.clone(), repos.clone())),
        categories: Arc::new(CategoryWorkspace::new(repos.clone(), repos)),
        uploads: Arc::new(MediaUploadService::new(storage)),
        auth,
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to install shutdown handler");
        return;
    }
    info!("shutdown signal received");
}
