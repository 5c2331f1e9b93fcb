use color_eyre::eyre::eyre;
use color_eyre::{Help, Result};
use std::sync::Arc;

/// 默认监听地址
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// 数据库连接池配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// postgresql数据库链接字符串
    pub postgresql_conn_str: String,

    /// 连接池最大连接数
    ///
    /// 生产环境配置30~40即可，可通过环境变量 `DB_MAX_CONNECTIONS` 来调整
    pub max_connections: u32,

    /// 连接池启动时预留的连接数
    ///
    /// 可通过环境变量 `DB_MIN_CONNECTIONS` 来调整
    pub min_connections: u32,
}

/// 程序配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Web服务监听地址，可通过环境变量 `BIND_ADDR` 来调整
    pub bind_addr: String,

    /// 数据库配置
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// 从环境变量中加载配置
    pub fn load() -> Result<Arc<AppConfig>> {
        // 加载.env文件中的数据注入到环境变量中，方便本地测试
        // 线上环境部署时会直接使用环境变量，不需要.env文件
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        Ok(Arc::new(config))
    }

    /// 根据传入的查找函数构建配置
    ///
    /// `load` 使用进程环境变量，测试时可以传入任意的键值来源。
    pub fn from_lookup<F>(lookup: F) -> Result<AppConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 读取数据库地址信息（仅支持postgresql）
        let db_url = lookup("DATABASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| eyre!("Can not load DATABASE_URL in environment"))
            .suggestion("设置 DATABASE_URL 环境变量")?;

        let max_connections = lookup("DB_MAX_CONNECTIONS").map_or(40, |s| s.parse().unwrap_or(40));
        // 预留连接数不能超过最大连接数，否则连接池无法创建
        let min_connections = lookup("DB_MIN_CONNECTIONS")
            .map_or(10, |s| s.parse().unwrap_or(10))
            .min(max_connections);

        Ok(AppConfig {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            database: DatabaseConfig {
                postgresql_conn_str: db_url,
                max_connections,
                min_connections,
            },
        })
    }
}
