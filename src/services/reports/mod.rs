pub mod feedback_count;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;
use crate::utils::ReportPeriod;

pub struct ReportService {
    storage: Option<Arc<dyn Storage>>,
}

impl ReportService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 指定月份各培养项目的反馈统计
    pub async fn feedback_count(
        &self,
        period: ReportPeriod,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        feedback_count::handle_feedback_count(self, period, request).await
    }
}
