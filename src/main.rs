use std::{path::Path, process, sync::Arc};

use notion_html::{
    application::{
        error::AppError,
        render::{DocumentRenderer, FetchPolicy, RenderOptions},
    },
    config::{self, Command, RenderArgs, Settings},
    infra::{
        notion::{NotionClientConfig, NotionHttpClient},
        telemetry,
    },
};
use tokio::io::AsyncWriteExt;
use tracing::{Dispatch, Level, dispatcher, error, info};
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

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    telemetry::init(&settings.logging)?;

    match cli_args.command {
        Command::Render(args) => run_render(settings, *args).await,
    }
}

async fn run_render(settings: Settings, args: RenderArgs) -> Result<(), AppError> {
    let client = NotionHttpClient::new(NotionClientConfig::from_settings(&settings.notion)?)?;
    let head = load_head(&args).await?;

    let renderer = DocumentRenderer::new(
        Arc::new(client),
        FetchPolicy::from(&settings.fetch),
        RenderOptions::from(&settings.render),
    );
    let html = renderer.render_document(&args.page_id, &head).await?;

    match args.output.as_deref() {
        Some(path) => write_output(path, &html).await?,
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(html.as_bytes()).await?;
            stdout.flush().await?;
        }
    }

    Ok(())
}

async fn load_head(args: &RenderArgs) -> Result<String, AppError> {
    if let Some(head) = args.head.as_ref() {
        return Ok(head.clone());
    }

    match args.head_file.as_deref() {
        Some(path) => tokio::fs::read_to_string(path).await.map_err(|err| {
            AppError::validation(format!(
                "failed to read head file `{}`: {err}",
                path.display()
            ))
        }),
        None => Ok(String::new()),
    }
}

async fn write_output(path: &Path, html: &str) -> Result<(), AppError> {
    tokio::fs::write(path, html).await?;
    info!(
        target = "notion_html::cli",
        path = %path.display(),
        bytes = html.len(),
        "Wrote document"
    );
    Ok(())
}
