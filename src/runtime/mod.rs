//! 运行时生命周期（启动准备与关闭）

pub mod lifetime;
