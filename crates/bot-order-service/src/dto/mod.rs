//! HTTP 请求与响应 DTO

pub mod request;
pub mod response;
