use std::{future::IntoFuture, process, sync::Arc};

use itc_filter::{
    application::{
        error::AppError, repos::HealthRepo, search::SearchService, taxonomy::TaxonomyService,
    },
    config,
    form::{FetchStatus, FilterForm, HttpFilterApi, MemoryHistory},
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, HttpState},
        telemetry,
    },
};
use tokio::sync::oneshot;
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
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Browse(args) => run_browse(settings, args).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;

    let state = HttpState {
        search: Arc::new(SearchService::new(repositories.clone())),
        taxonomy: Arc::new(TaxonomyService::new(
            repositories.clone(),
            settings.filter.hidden_categories.clone(),
        )),
        health: repositories as Arc<dyn HealthRepo>,
    };

    serve_http(&settings, state).await
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::migration(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

async fn serve_http(settings: &config::Settings, state: HttpState) -> Result<(), AppError> {
    let router = http::build_router(state, &settings.filter.mount_path);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(
        addr = %settings.server.addr,
        mount_path = %settings.filter.mount_path,
        "listening"
    );

    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(());
        })
        .into_future();

    let grace = settings.server.graceful_shutdown;
    let deadline = async move {
        if signalled_rx.await.is_ok() {
            tokio::time::sleep(grace).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        () = deadline => {
            warn!(
                grace_seconds = grace.as_secs(),
                "graceful shutdown timed out; dropping open connections"
            );
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => {
            error!(error = %err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

async fn run_browse(settings: config::Settings, args: config::BrowseArgs) -> Result<(), AppError> {
    let site = settings
        .client
        .site_url
        .as_deref()
        .ok_or_else(|| AppError::validation("site URL is required (use --site or client.site_url)"))?;

    let api = HttpFilterApi::new(site, settings.client.request_timeout)?;
    let history = MemoryHistory::new(format!("/?{}", args.query.trim_start_matches('?')));
    let mut form = FilterForm::new(api, history);
    form.initialize().await;

    if let FetchStatus::Failed { message } = &form.state().status {
        return Err(AppError::unexpected(format!("failed to load posts: {message}")));
    }

    let output = if args.html {
        form.render()
            .map_err(|err| AppError::unexpected(format!("failed to render form: {err}")))?
    } else {
        serde_json::to_string_pretty(&form.state().results)
            .map_err(|err| AppError::unexpected(format!("failed to encode results: {err}")))?
    };
    println!("{output}");

    Ok(())
}
