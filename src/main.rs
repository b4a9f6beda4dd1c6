use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use linguadoc::extract::DocumentExtractor;
use linguadoc::pipeline::{job_queue, Orchestrator, WorkerPool};
use linguadoc::recognize::TesseractRecognizer;
use linguadoc::server::{self, AppState};
use linguadoc::store::{InMemoryStore, JobStore, ResultStore};
use linguadoc::translate::{HttpTranslator, PassthroughTranslator, Translator};
use linguadoc::utils::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "linguadoc")]
#[command(about = "A bilingual document translation pipeline server")]
struct Args {
    /// Path to the configuration JSON file
    #[arg(long, short = 'c')]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linguadoc=info,tower_http=debug".into()),
        )
        .init();

    let config = match args.config {
        Some(path) => AppConfig::init_from(path)?,
        None => AppConfig::init().unwrap_or_else(|_| AppConfig::get()),
    };

    run_server(config).await?;

    Ok(())
}

async fn run_server(config: &'static AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(InMemoryStore::new());
    let jobs: Arc<dyn JobStore> = store.clone();
    let results: Arc<dyn ResultStore> = store.clone();

    let recognizer = Arc::new(TesseractRecognizer::new(
        config.ocr_engine.to_string(),
        config.ocr_language.to_string(),
    ));

    let translator: Arc<dyn Translator> = match &config.translation_endpoint {
        Some(endpoint) => {
            tracing::info!("Using translation endpoint {}", endpoint);
            Arc::new(HttpTranslator::new(
                endpoint.to_string(),
                config.translation_model.to_string(),
                config.source_language.to_string(),
                config.target_language.to_string(),
            ))
        }
        None => {
            tracing::warn!("No translation endpoint configured, blocks will pass through");
            Arc::new(PassthroughTranslator)
        }
    };

    let orchestrator = Arc::new(Orchestrator::new(
        jobs.clone(),
        results.clone(),
        Arc::new(DocumentExtractor::new()),
        recognizer,
        translator,
        config.translation_batch_size,
    ));

    let (queue, receiver) = job_queue();
    let _workers = WorkerPool::spawn(
        config.worker_count,
        receiver,
        orchestrator,
        jobs.clone(),
        Duration::from_secs(config.job_timeout_minutes * 60),
    );

    let addr: std::net::SocketAddr = config.host_url.parse()?;
    let state = AppState {
        jobs,
        results,
        queue,
    };

    server::start_server(addr, state).await?;

    Ok(())
}
