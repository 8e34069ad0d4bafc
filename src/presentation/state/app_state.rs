use std::sync::Arc;

use crate::application::services::PrescriptionService;

#[derive(Clone)]
pub struct AppState {
    pub prescription_service: Arc<PrescriptionService>,
    pub max_upload_bytes: usize,
}
