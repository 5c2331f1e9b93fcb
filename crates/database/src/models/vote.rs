//! 投票数据库模型

use chrono::NaiveDateTime;
use sqlx::FromRow;

/// 投票类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteType {
    Up,
    Down,
}

impl VoteType {
    /// 数据库中存储的值
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Up => "up",
            VoteType::Down => "down",
        }
    }
}

/// 投票模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteMode {
    Normal,
    Anonymous,
}

impl VoteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteMode::Normal => "normal",
            VoteMode::Anonymous => "anonymous",
        }
    }
}

/// 投票人列表中的一条记录
///
/// 匿名投票的 `user_id`、`user_name`、`last_name` 一定为 `None`。
#[derive(Debug, Clone, FromRow)]
pub struct VoterRecord {
    pub id: i64,
    pub project_id: i64,
    pub user_id: Option<i64>,
    pub vote_type: String,
    pub vote_mode: String,
    /// 投票人的 first name
    pub user_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: NaiveDateTime,
}
