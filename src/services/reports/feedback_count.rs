use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};

use super::ReportService;
use crate::models::{
    ApiResponse, ErrorCode,
    feedbacks::entities::FeedbackStatus,
    reports::{entities::FeedbackCountRow, responses::ProgrammeFeedbackCount},
    ta_profiles::entities::Program,
};
use crate::services::storage_failure;
use crate::utils::ReportPeriod;

/// 按培养项目固定顺序汇总，每个项目恰好一条
pub fn build_programme_counts(
    rows: &[FeedbackCountRow],
    host: &str,
    month: u32,
    year: i32,
) -> Vec<ProgrammeFeedbackCount> {
    Program::ALL
        .iter()
        .map(|program| {
            let link = format!("{host}/pdf/{month}/{year}/{}/", program.code());
            rows.iter()
                .filter(|row| row.program == *program)
                .fold(ProgrammeFeedbackCount::empty(*program, link), |mut acc, row| {
                    acc.submitted += row.count;
                    match row.status {
                        FeedbackStatus::Approved => acc.approved += row.count,
                        FeedbackStatus::Rejected => acc.rejected += row.count,
                        FeedbackStatus::Pending => acc.pending += row.count,
                    }
                    acc
                })
        })
        .collect()
}

/// 链接使用请求的 Host 头，不读取 Forwarded / X-Forwarded-Host
fn request_host(request: &HttpRequest) -> String {
    request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| request.app_config().host().to_string())
}

pub async fn handle_feedback_count(
    service: &ReportService,
    period: ReportPeriod,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let rows = match storage
        .count_feedbacks_by_program_and_status(period.window)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            return Ok(storage_failure(
                e,
                ErrorCode::InternalServerError,
                "Failed to count feedback",
            ));
        }
    };

    let host = request_host(request);
    let items = build_programme_counts(&rows, &host, period.month, period.year);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        items,
        "Feedback count retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(program: Program, status: FeedbackStatus, count: u64) -> FeedbackCountRow {
        FeedbackCountRow {
            program,
            status,
            count,
        }
    }

    #[test]
    fn test_host_header_wins_over_forwarded_host() {
        let request = actix_web::test::TestRequest::get()
            .uri("/api/v1/feedback-count/3/2023")
            .insert_header((header::HOST, "reports.example.edu"))
            .insert_header(("X-Forwarded-Host", "attacker.example"))
            .insert_header((header::FORWARDED, "host=attacker.example"))
            .to_http_request();
        assert_eq!(request_host(&request), "reports.example.edu");

        let counts = build_programme_counts(&[], &request_host(&request), 3, 2023);
        assert_eq!(counts[0].link, "reports.example.edu/pdf/3/2023/1/");
    }

    #[test]
    fn test_empty_month_has_three_zero_entries() {
        let counts = build_programme_counts(&[], "localhost:8080", 3, 2023);
        assert_eq!(counts.len(), 3);

        let labels: Vec<_> = counts.iter().map(|c| c.programme.as_str()).collect();
        assert_eq!(labels, vec!["M.Tech", "Ph.D MHRD", "Ph.D VSS"]);

        for (count, program) in counts.iter().zip(Program::ALL) {
            assert_eq!(count.submitted, 0);
            assert_eq!(count.approved + count.rejected + count.pending, 0);
            assert_eq!(
                count.link,
                format!("localhost:8080/pdf/3/2023/{}/", program.code())
            );
        }
    }

    #[test]
    fn test_counts_partition_by_program_and_status() {
        let rows = vec![
            row(Program::MTech, FeedbackStatus::Pending, 2),
            row(Program::MTech, FeedbackStatus::Approved, 3),
            row(Program::PhdVss, FeedbackStatus::Rejected, 1),
            row(Program::PhdVss, FeedbackStatus::Approved, 4),
        ];
        let counts = build_programme_counts(&rows, "example.edu", 11, 2024);

        assert_eq!(counts[0].submitted, 5);
        assert_eq!(counts[0].pending, 2);
        assert_eq!(counts[0].approved, 3);
        assert_eq!(counts[1].submitted, 0);
        assert_eq!(counts[2].submitted, 5);
        assert_eq!(counts[2].rejected, 1);
        assert_eq!(counts[2].approved, 4);

        let total: u64 = rows.iter().map(|r| r.count).sum();
        assert_eq!(counts.iter().map(|c| c.submitted).sum::<u64>(), total);
        assert_eq!(counts[2].link, "example.edu/pdf/11/2024/3/");
    }
}
