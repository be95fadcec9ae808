use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TaProfileService;
use crate::models::{
    ApiResponse, ErrorCode,
    ta_profiles::{
        entities::Program,
        requests::{TaProfileListQuery, TaProfileQueryParams},
    },
};
use crate::services::{bad_request, storage_failure};

pub async fn list_profiles(
    service: &TaProfileService,
    query: TaProfileQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let program = match query.program {
        None => None,
        Some(code) => match i32::try_from(code).ok().and_then(Program::from_code) {
            Some(program) => Some(program),
            None => {
                return Ok(bad_request(
                    ErrorCode::BadRequest,
                    format!("Unknown programme code: {code}"),
                ));
            }
        },
    };

    let storage = service.get_storage(request)?;

    let list_query = TaProfileListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        program,
    };

    match storage.list_ta_profiles_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Teaching assistant profiles retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to retrieve teaching assistant profiles",
        )),
    }
}
