use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use labdesk_api::config::{AppConfig, LogFormat, StoreBackend};
use labdesk_api::state::{Adapters, AppState};
use labdesk_auth::password::Pbkdf2Hasher;
use labdesk_extract::entities::HttpEntityExtractor;
use labdesk_extract::ocr::BedrockOcr;
use labdesk_notify::mailer::{DisabledMailer, Mailer};
use labdesk_notify::ses::SesMailer;
use labdesk_storage::memory::MemoryStore;
use labdesk_storage::s3::S3DocumentStore;
use labdesk_storage::store::DocumentStore;

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        // Structured JSON logging for log aggregation
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn build_adapters(config: &AppConfig) -> Adapters {
    let store: Arc<dyn DocumentStore> = match config.store {
        StoreBackend::S3 => {
            let s3 = labdesk_storage::client::build_client_with_region(&config.region).await;
            Arc::new(S3DocumentStore::new(s3, config.bucket.clone()))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory document store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let bedrock = labdesk_extract::client::build_client_with_region(&config.region).await;
    let ocr =
        BedrockOcr::new(bedrock, config.ocr_model_id.clone()).with_timeout(config.ocr_timeout);

    if config.nlp_service_url.is_none() {
        tracing::warn!("NLP_SERVICE_URL not set; suggestions use the keyword table only");
    }
    let entities = HttpEntityExtractor::new(config.nlp_service_url.clone())
        .with_timeout(config.nlp_timeout);

    let mailer: Arc<dyn Mailer> = match &config.mail_from {
        Some(from) => {
            let ses = labdesk_notify::ses::build_client_with_region(&config.region).await;
            Arc::new(SesMailer::new(ses, from.clone()))
        }
        None => {
            tracing::warn!("MAIL_FROM not set; order confirmations are disabled");
            Arc::new(DisabledMailer)
        }
    };

    Adapters {
        store,
        hasher: Arc::new(Pbkdf2Hasher::default()),
        ocr: Arc::new(ocr),
        entities: Arc::new(entities),
        mailer,
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    let state = AppState::new(build_adapters(&config).await, &config);
    state.booking.intake().ensure_dir().await?;

    let app = labdesk_api::router(state, &config);

    if env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
        tracing::info!("starting Lambda runtime");
        return lambda_http::run(app).await.map_err(|e| eyre::eyre!(e));
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, upload_dir = %config.upload_dir.display(), "server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
