//! CLI entrypoint for draftsmith
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use colored::Colorize;
use draftsmith_application::{
    ChannelEventSink, ContentSource, ContentStore, EventSink, ModelInvoker, ModelPreferences,
    NoContentStore, NoEvents, OrchestrationRequest, RunOrchestrationUseCase,
};
use draftsmith_domain::{ExecutionResult, OrchestrationResponse};
use draftsmith_infrastructure::{
    ConfigLoader, FileConfig, FileOutputFormat, HeuristicTokenCounter, JsonContentStore,
    JsonlEventLogger, RoutingProvider, Severity, WtuCalculator, load_connections,
};
use draftsmith_presentation::{
    Cli, ConsoleFormatter, EventFilter, OutputFormat, ProgressReporter, RequestArgs,
    SimpleProgress, sse_stream,
};
use futures::StreamExt;
use std::io::{IsTerminal, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

type UseCase = RunOrchestrationUseCase<RoutingProvider>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("failed to load configuration: {e}"))?
    };

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        println!("\nEffective configuration:\n");
        println!("{}", ConfigLoader::render(&config)?);
        return Ok(());
    }
    for issue in config.validate() {
        let prefix = match issue.severity {
            Severity::Warning => "warning:".yellow().bold(),
            Severity::Error => "error:".red().bold(),
        };
        eprintln!("{} {}", prefix, issue.message);
    }
    if !config.output.color {
        colored::control::set_override(false);
    }

    let Some(command) = cli.command else {
        bail!("A command is required: `draftsmith ask` or `draftsmith draft` (see --help)");
    };
    let args = command.args();

    info!("Starting draftsmith {:?}", command.request_type());

    // === Dependency Injection ===
    let (content_store, contents) = content_source(args)?;
    let use_case = build_use_case(&config, content_store);

    let mut request = OrchestrationRequest::new(command.request_type(), args.prompt.clone())
        .with_contents(contents)
        .with_retrieval_mode(args.retrieval)
        .with_model_preferences(
            args.prefer
                .iter()
                .fold(ModelPreferences::new(), |prefs, (tier, model)| {
                    prefs.with(*tier, model.clone())
                }),
        );
    if let Some(path) = &args.connections {
        let connections = load_connections(path)
            .with_context(|| format!("failed to load connections from {}", path.display()))?;
        request = request.with_connections(connections);
    }

    if args.stream {
        let capacity = config.execution.to_execution_params().event_channel_capacity;
        return stream(&use_case, request, args, capacity).await;
    }

    let result = if args.quiet || !config.output.progress {
        execute(&use_case, request, NoEvents, args.event_log.as_deref()).await?
    } else if std::io::stderr().is_terminal() {
        execute(&use_case, request, ProgressReporter::new(), args.event_log.as_deref()).await?
    } else {
        execute(&use_case, request, SimpleProgress, args.event_log.as_deref()).await?
    };

    let response = OrchestrationResponse::from(&result);
    let format = args.output.unwrap_or(match config.output.format {
        FileOutputFormat::Markdown => OutputFormat::Markdown,
        FileOutputFormat::Json => OutputFormat::Json,
    });
    let output = match format {
        OutputFormat::Markdown => ConsoleFormatter::format(&response),
        OutputFormat::Json => ConsoleFormatter::format_json(&response),
    };
    println!("{}", output);

    Ok(())
}

fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    // Initialize logging based on verbosity level
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("invalid log file path: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

fn content_source(args: &RequestArgs) -> Result<(Arc<dyn ContentStore>, ContentSource)> {
    let Some(path) = &args.contents else {
        let store: Arc<dyn ContentStore> = Arc::new(NoContentStore);
        return Ok((store, ContentSource::Ids(args.ids.clone())));
    };

    let store = JsonContentStore::open(path)
        .with_context(|| format!("failed to load contents from {}", path.display()))?;
    let ids = if args.ids.is_empty() {
        store.ids()
    } else {
        args.ids.clone()
    };
    let store: Arc<dyn ContentStore> = Arc::new(store);
    Ok((store, ContentSource::Ids(ids)))
}

fn build_use_case(config: &FileConfig, content_store: Arc<dyn ContentStore>) -> UseCase {
    let (table, _) = config.tiers.to_fallback_table();
    let params = config.execution.to_execution_params();

    let invoker = ModelInvoker::new(
        Arc::new(RoutingProvider::from_config(&config.providers)),
        Arc::new(table),
        Arc::new(HeuristicTokenCounter),
    )
    .with_call_timeout(params.call_timeout);

    RunOrchestrationUseCase::new(
        Arc::new(invoker),
        Arc::new(WtuCalculator::new(&config.pricing)),
        content_store,
    )
}

/// Run the request, teeing events into a JSONL file when asked.
async fn execute<S: EventSink>(
    use_case: &UseCase,
    request: OrchestrationRequest,
    sink: S,
    event_log: Option<&Path>,
) -> Result<ExecutionResult> {
    let result = match event_log {
        Some(path) => {
            let logger = JsonlEventLogger::new(path, sink)
                .with_context(|| format!("failed to create event log {}", path.display()))?;
            use_case.execute(request, &logger).await?
        }
        None => use_case.execute(request, &sink).await?,
    };
    Ok(result)
}

/// Print SSE frames while the request runs.
async fn stream(
    use_case: &UseCase,
    request: OrchestrationRequest,
    args: &RequestArgs,
    capacity: usize,
) -> Result<()> {
    let (sink, receiver) = ChannelEventSink::channel(capacity);
    let frames = sse_stream(receiver, EventFilter::from_verbose(args.verbose_events));

    // The sink is moved into the producer so the stream ends with it.
    let producer = async move { execute(use_case, request, sink, args.event_log.as_deref()).await };
    let consumer = frames.for_each(|frame| async move {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = stdout.write_all(frame.as_bytes()).and_then(|_| stdout.flush()) {
            warn!("Could not write SSE frame: {}", e);
        }
    });

    let (result, ()) = tokio::join!(producer, consumer);
    result.map(|_| ())
}
