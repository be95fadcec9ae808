//! 反馈服务
//!
//! 助教每月为每个分配提交一条反馈，课程负责教师审核本月待审核的反馈。

pub mod approval;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod mine;
pub mod permissions;
pub mod submit;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::feedbacks::entities::FeedbackPeriod;
use crate::models::feedbacks::requests::{
    CreateFeedbackRequest, FeedbackQueryParams, UpdateFeedbackRequest,
};
use crate::storage::Storage;

pub struct FeedbackService {
    storage: Option<Arc<dyn Storage>>,
}

impl FeedbackService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_feedbacks(
        &self,
        query: FeedbackQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_feedbacks(self, query, request).await
    }

    pub async fn get_feedback(
        &self,
        feedback_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_feedback(self, feedback_id, request).await
    }

    pub async fn create_feedback(
        &self,
        feedback_data: CreateFeedbackRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_feedback(self, feedback_data, request).await
    }

    pub async fn update_feedback(
        &self,
        feedback_id: i64,
        update_data: UpdateFeedbackRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_feedback(self, feedback_id, update_data, request).await
    }

    pub async fn delete_feedback(
        &self,
        feedback_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_feedback(self, feedback_id, request).await
    }

    // 本人本月的反馈
    pub async fn list_current(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        mine::list_own_feedbacks(self, FeedbackPeriod::Current, request).await
    }

    // 本人本月以外的反馈
    pub async fn list_past(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        mine::list_own_feedbacks(self, FeedbackPeriod::Past, request).await
    }

    // 本月仍可提交反馈的分配
    pub async fn list_submittable(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        submit::list_submittable(self, request).await
    }

    // 负责教师本月待审核的反馈
    pub async fn list_approval_current(
        &self,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        approval::list_approval_current(self, request).await
    }
}
