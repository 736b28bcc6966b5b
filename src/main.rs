use std::{error::Error as StdError, path::Path, process, sync::Arc};

use folio::{
    application::{
        contact::ContactService,
        error::AppError,
        render::{
            RenderPipelineConfig, RenderRequest, RenderService, RenderTarget,
            configure_render_service, render_service,
        },
    },
    config,
    domain::contact::ContactPolicy,
    infra::{
        error::InfraError,
        http::{self, HttpState},
        memory::InMemoryContactInbox,
        telemetry::{self, LogStream},
    },
};
use tokio::sync::watch;
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
    let mut causes = Vec::new();
    let mut current = StdError::source(error);
    while let Some(cause) = current {
        causes.push(cause.to_string());
        current = cause.source();
    }

    if dispatcher::has_been_set() {
        error!(error = %error, causes = ?causes, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, causes = ?causes, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli().map_err(|err| {
        AppError::from(InfraError::configuration(format!(
            "failed to load configuration: {err}"
        )))
    })?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    let log_stream = match command {
        config::Command::Serve(_) => LogStream::Stdout,
        config::Command::Render(_) => LogStream::Stderr,
    };
    telemetry::init(&settings.logging, log_stream).map_err(AppError::from)?;
    configure_render_service(RenderPipelineConfig::from(&settings.render))
        .map_err(|err| AppError::unexpected(err.to_string()))?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Render(args) => run_render(args).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let inbox = Arc::new(InMemoryContactInbox::new(
        settings.contact.inbox_capacity.get() as usize,
    ));
    let contact = ContactService::new(
        inbox,
        ContactPolicy {
            message_max_chars: settings.contact.message_max_chars,
        },
    );
    let state = HttpState {
        renderer: render_service(),
        contact: Arc::new(contact),
    };

    let router = http::build_router(state, settings.server.max_body_bytes.get() as usize);
    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::bind(settings.server.addr, err)))?;

    info!(
        target = "folio::serve",
        addr = %settings.server.addr,
        "Listening"
    );

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, router.into_make_service()).with_graceful_shutdown(
        async move {
            let _ = shutdown_rx.changed().await;
        },
    );
    let mut server_task = tokio::spawn(async move { server.await });

    tokio::select! {
        joined = &mut server_task => return flatten_server_result(joined),
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(|err| AppError::from(InfraError::Signal(err)))?;
        }
    }

    info!(
        target = "folio::serve",
        grace_secs = settings.server.graceful_shutdown.as_secs(),
        "Shutdown requested, draining connections"
    );
    let _ = shutdown_tx.send(true);

    match tokio::time::timeout(settings.server.graceful_shutdown, &mut server_task).await {
        Ok(joined) => flatten_server_result(joined),
        Err(_) => {
            warn!(
                target = "folio::serve",
                "Graceful shutdown window elapsed with requests still in flight"
            );
            server_task.abort();
            Ok(())
        }
    }
}

fn flatten_server_result(
    joined: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<(), AppError> {
    match joined {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(AppError::unexpected(format!("server error: {err}"))),
        Err(err) => Err(AppError::unexpected(format!("server task failed: {err}"))),
    }
}

async fn run_render(args: config::RenderArgs) -> Result<(), AppError> {
    let contents = tokio::fs::read_to_string(&args.file)
        .await
        .map_err(|err| AppError::from(InfraError::read_document(&args.file, err)))?;
    let value: serde_json::Value = serde_json::from_str(&contents).map_err(|err| {
        AppError::validation(format!("{} is not valid JSON: {err}", args.file.display()))
    })?;

    let target = RenderTarget::Post {
        slug: file_slug(&args.file),
    };
    let request = RenderRequest::from_json(target, Some(&value));
    let renderer = render_service();

    info!(
        target = "folio::render",
        path = %args.file.display(),
        raw = args.raw,
        "Rendering document"
    );

    if args.raw {
        println!("{}", renderer.render_unsanitized(&request));
        return Ok(());
    }

    let output = renderer.render(&request)?;
    if args.json {
        let json = serde_json::to_string_pretty(&output)
            .map_err(|err| AppError::unexpected(format!("failed to encode output: {err}")))?;
        println!("{json}");
    } else {
        println!("{}", output.html);
    }
    Ok(())
}

fn file_slug(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("document")
        .to_owned()
}
