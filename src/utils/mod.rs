pub mod extractor;
pub mod jwt;
pub mod month;
pub mod parameter_error_handler;
pub mod password;
pub mod sql;
pub mod validate;

pub use extractor::{ReportPeriod, SafeIDI64};
pub use month::MonthWindow;
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::escape_like_pattern;
