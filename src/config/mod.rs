//! 配置管理模块
//!
//! 配置来源（优先级从低到高）：`config.toml` → `config.{APP_ENV}.toml` →
//! `TAFEEDBACK_*` 环境变量 → 常用环境变量覆盖（`DATABASE_URL` 等）。

#[path = "impl.rs"]
mod loader;
mod structs;

pub use structs::*;
