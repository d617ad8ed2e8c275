use std::sync::Arc;

use labdesk_auth::password::PasswordHasher;
use labdesk_extract::entities::EntityExtractor;
use labdesk_extract::ocr::TextExtractor;
use labdesk_notify::mailer::Mailer;
use labdesk_notify::notifier::Notifier;
use labdesk_storage::store::DocumentStore;

use crate::accounts::AccountService;
use crate::booking::BookingService;
use crate::config::AppConfig;
use crate::intake::FileIntake;

/// External capabilities the services are built from.
pub struct Adapters {
    pub store: Arc<dyn DocumentStore>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub ocr: Arc<dyn TextExtractor>,
    pub entities: Arc<dyn EntityExtractor>,
    pub mailer: Arc<dyn Mailer>,
}

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub booking: BookingService,
}

impl AppState {
    pub fn new(adapters: Adapters, config: &AppConfig) -> Self {
        let intake = FileIntake::new(config.upload_dir.clone(), config.max_upload_bytes);
        let notifier = Notifier::new(adapters.mailer).with_timeout(config.mail_timeout);

        Self {
            accounts: AccountService::new(adapters.store.clone(), adapters.hasher),
            booking: BookingService::new(
                adapters.store,
                intake,
                adapters.ocr,
                adapters.entities,
                notifier,
                config.public_base_url.clone(),
            ),
        }
    }
}
