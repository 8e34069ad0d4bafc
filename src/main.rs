use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use recepta::application::services::{PrescriptionService, ResponseNormalizer};
use recepta::infrastructure::audio::TranscriptionEngineFactory;
use recepta::infrastructure::llm::LlmClientFactory;
use recepta::infrastructure::observability::{TracingConfig, init_tracing};
use recepta::infrastructure::storage::JsonFileRecordStore;
use recepta::presentation::config::StorageSettings;
use recepta::presentation::{AppState, Environment, ScaffoldConfig, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::new(
        environment.as_str(),
        settings.logging.enable_json,
    ));

    let scaffold = ScaffoldConfig::from_env();
    let llm_client = LlmClientFactory::create(&settings.llm, &scaffold)?;
    let transcription_engine = TranscriptionEngineFactory::create(&settings.transcription, &scaffold)?;

    let records_path = settings
        .storage
        .records_path_for(StorageSettings::on_platform());
    tracing::info!(path = %records_path.display(), "Prescription log location");
    let record_store = Arc::new(JsonFileRecordStore::new(records_path));

    let prescription_service = Arc::new(PrescriptionService::new(
        transcription_engine,
        llm_client,
        record_store,
        ResponseNormalizer::new(settings.normalizer.fill_partial_groups),
        settings.storage.scratch_dir.clone(),
    ));

    let state = AppState {
        prescription_service,
        max_upload_bytes: settings.max_upload_bytes(),
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server.host / server.port")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
