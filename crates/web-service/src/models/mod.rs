//! 接口请求/返回模型
pub mod common;
pub mod err;
pub mod projects;
