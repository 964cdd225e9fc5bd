pub mod forecast;
pub mod host;
pub mod subscription;
