pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ta_profiles::requests::{
    CreateTaProfileRequest, TaProfileQueryParams, UpdateTaProfileRequest,
};
use crate::storage::Storage;

pub struct TaProfileService {
    storage: Option<Arc<dyn Storage>>,
}

impl TaProfileService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_profiles(
        &self,
        query: TaProfileQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_profiles(self, query, request).await
    }

    pub async fn get_profile(
        &self,
        profile_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_profile(self, profile_id, request).await
    }

    pub async fn create_profile(
        &self,
        profile_data: CreateTaProfileRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_profile(self, profile_data, request).await
    }

    pub async fn update_profile(
        &self,
        profile_id: i64,
        update_data: UpdateTaProfileRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_profile(self, profile_id, update_data, request).await
    }

    pub async fn delete_profile(
        &self,
        profile_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_profile(self, profile_id, request).await
    }
}
