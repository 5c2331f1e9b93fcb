pub mod config;
pub mod log_constants;

// 重新导出具体的类型
pub use config::{AppConfig, DatabaseConfig};
pub use log_constants::{EntityType, LogAction};
