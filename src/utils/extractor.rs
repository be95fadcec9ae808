//! 路径参数提取器
//!
//! 在进入处理函数前完成路径参数的解析与校验，失败时直接返回统一格式的 400 响应。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};
use crate::utils::month::MonthWindow;

fn bad_request(code: ErrorCode, message: String) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(code, &message));
    InternalError::from_response(message, response).into()
}

fn parse_positive_id(raw: Option<&str>, name: &str) -> Result<i64, actix_web::Error> {
    let raw = raw.ok_or_else(|| {
        bad_request(ErrorCode::BadRequest, format!("Missing path parameter '{name}'"))
    })?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(bad_request(
            ErrorCode::BadRequest,
            format!("Invalid {name}: '{raw}' is not a positive integer"),
        )),
    }
}

/// 路径中的 `{id}`，必须为正整数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_positive_id(req.match_info().get("id"), "id").map(SafeIDI64))
    }
}

/// 报表路径中的 `{month}/{year}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    pub month: u32,
    pub year: i32,
    pub window: MonthWindow,
}

impl ReportPeriod {
    pub fn parse(month: &str, year: &str) -> Result<Self, String> {
        let month_num = month
            .parse::<u32>()
            .map_err(|_| format!("Invalid month: '{month}'"))?;
        let year_num = year
            .parse::<i32>()
            .map_err(|_| format!("Invalid year: '{year}'"))?;
        let window = MonthWindow::new(year_num, month_num).ok_or_else(|| {
            format!("Invalid period {month}/{year}: month must be 1-12 and year 1-9999")
        })?;
        Ok(Self {
            month: month_num,
            year: year_num,
            window,
        })
    }
}

impl FromRequest for ReportPeriod {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let info = req.match_info();
        let result = match (info.get("month"), info.get("year")) {
            (Some(month), Some(year)) => ReportPeriod::parse(month, year)
                .map_err(|msg| bad_request(ErrorCode::ReportPeriodInvalid, msg)),
            _ => Err(bad_request(
                ErrorCode::ReportPeriodInvalid,
                "Missing month or year in path".to_string(),
            )),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_safe_id_accepts_positive() {
        let req = TestRequest::default().param("id", "15").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id, SafeIDI64(15));
    }

    #[actix_web::test]
    async fn test_safe_id_rejects_invalid() {
        for raw in ["0", "-3", "abc", "1.5"] {
            let req = TestRequest::default().param("id", raw).to_http_request();
            assert!(SafeIDI64::extract(&req).await.is_err(), "{raw} should fail");
        }
    }

    #[test]
    fn test_report_period_parse() {
        let period = ReportPeriod::parse("3", "2023").unwrap();
        assert_eq!(period.month, 3);
        assert_eq!(period.year, 2023);
        assert_eq!(period.window, MonthWindow::new(2023, 3).unwrap());

        assert!(ReportPeriod::parse("13", "2023").is_err());
        assert!(ReportPeriod::parse("0", "2023").is_err());
        assert!(ReportPeriod::parse("3", "0").is_err());
        assert!(ReportPeriod::parse("march", "2023").is_err());
    }

    #[actix_web::test]
    async fn test_report_period_extract() {
        let req = TestRequest::default()
            .param("month", "12")
            .param("year", "2024")
            .to_http_request();
        let period = ReportPeriod::extract(&req).await.unwrap();
        assert_eq!(period.window.end, chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }
}
