/*!
 * 速率限制中间件
 *
 * 固定窗口计数：同一限制键在一个窗口内的请求数超过上限时返回 429。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login))
 * ```
 *
 * 已认证请求按用户 ID 计数，匿名请求按客户端 IP 计数。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode, users::entities::User};

// 计数器存活时间需覆盖最长的窗口
const COUNTER_TTL_SECS: u64 = 3600;

static RATE_LIMIT_COUNTERS: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(COUNTER_TTL_SECS))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64, key_prefix: &str) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.clamp(1, COUNTER_TTL_SECS),
            key_prefix: key_prefix.to_string(),
        }
    }

    /// 登录：5 次/分钟
    pub fn login() -> Self {
        Self::new(5, 60, "login")
    }

    /// 刷新令牌：10 次/分钟
    pub fn refresh_token() -> Self {
        Self::new(10, 60, "refresh")
    }

    // 计数键：前缀 + 身份 + 窗口序号
    fn counter_key(&self, identity: &str, now_secs: u64) -> String {
        format!(
            "{}:{}:{}",
            self.key_prefix,
            identity,
            now_secs / self.window_secs
        )
    }

    // 当前窗口剩余秒数
    fn retry_after(&self, now_secs: u64) -> u64 {
        self.window_secs - now_secs % self.window_secs
    }
}

// 优先使用连接地址，其次是反向代理转发头
fn client_ip(req: &ServiceRequest) -> String {
    let from_headers = ["X-Forwarded-For", "X-Real-IP"].iter().find_map(|name| {
        req.headers()
            .get(*name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|ip| ip.parse::<IpAddr>().is_ok())
            .map(str::to_string)
    });

    let peer = req
        .connection_info()
        .peer_addr()
        .and_then(|addr| addr.parse::<std::net::SocketAddr>().ok().map(|s| s.ip().to_string())
            .or_else(|| addr.parse::<IpAddr>().ok().map(|ip| ip.to_string())));

    peer.or(from_headers)
        .unwrap_or_else(|| "unknown".to_string())
}

// 先释放 extensions 借用，connection_info 需要可变借用
fn identity(req: &ServiceRequest) -> String {
    let user_id = req.extensions().get::<User>().map(|user| user.id);
    match user_id {
        Some(id) => format!("user:{id}"),
        None => format!("ip:{}", client_ip(req)),
    }
}

/// 原子地递增计数并返回递增后的值
async fn hit(key: String) -> u32 {
    RATE_LIMIT_COUNTERS
        .entry(key)
        .and_upsert_with(|existing| {
            ready(
                existing
                    .map(|entry| entry.into_value().saturating_add(1))
                    .unwrap_or(1),
            )
        })
        .await
        .into_value()
}

fn too_many_requests(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .json(ApiResponse::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let now_secs = chrono::Utc::now().timestamp().max(0) as u64;
            let key = limit.counter_key(&identity(&req), now_secs);
            let count = hit(key.clone()).await;

            if count > limit.max_requests {
                warn!(
                    "Rate limit exceeded for {} ({}/{})",
                    key, count, limit.max_requests
                );
                return Ok(req.into_response(
                    too_many_requests(limit.retry_after(now_secs)).map_into_right_body(),
                ));
            }

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window_secs, 60);
        assert_eq!(login.key_prefix, "login");

        let refresh = RateLimit::refresh_token();
        assert_eq!(refresh.max_requests, 10);
        assert_eq!(refresh.key_prefix, "refresh");
    }

    #[test]
    fn test_counter_key_changes_per_window() {
        let limit = RateLimit::new(3, 60, "t");
        assert_eq!(limit.counter_key("ip:1.2.3.4", 120), "t:ip:1.2.3.4:2");
        assert_eq!(limit.counter_key("ip:1.2.3.4", 179), "t:ip:1.2.3.4:2");
        assert_eq!(limit.counter_key("ip:1.2.3.4", 180), "t:ip:1.2.3.4:3");
    }

    #[test]
    fn test_retry_after_and_window_clamp() {
        let limit = RateLimit::new(3, 60, "t");
        assert_eq!(limit.retry_after(125), 55);
        assert_eq!(RateLimit::new(1, 0, "z").window_secs, 1);
        assert_eq!(RateLimit::new(1, 86_400, "z").window_secs, COUNTER_TTL_SECS);
    }

    #[actix_web::test]
    async fn test_blocks_after_limit() {
        use actix_web::{App, HttpResponse, test, web};

        let app = test::init_service(
            App::new().service(
                web::resource("/limited")
                    .wrap(RateLimit::new(2, 3600, "unit-test-block"))
                    .route(web::post().to(HttpResponse::Ok)),
            ),
        )
        .await;

        let mut statuses = Vec::new();
        for _ in 0..3 {
            let req = test::TestRequest::post()
                .uri("/limited")
                .peer_addr("10.9.8.7:5000".parse().unwrap())
                .to_request();
            statuses.push(test::call_service(&app, req).await.status());
        }
        assert_eq!(
            statuses,
            vec![StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]
        );
    }

    #[actix_web::test]
    async fn test_anonymous_request_without_peer_is_counted_by_ip() {
        use actix_web::{App, HttpResponse, test, web};

        let app = test::init_service(
            App::new().service(
                web::resource("/api/v1/auth/login")
                    .wrap(RateLimit::login())
                    .route(web::post().to(HttpResponse::Ok)),
            ),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .insert_header(("X-Forwarded-For", "203.0.113.9"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_concurrent_hits_are_counted_once_each() {
        let key = "unit-test-concurrent:ip:198.51.100.1:0".to_string();
        let counts = futures_util::future::join_all((0..20).map(|_| hit(key.clone()))).await;

        let mut sorted = counts.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=20).collect::<Vec<u32>>());
    }
}
