//! 项目数据库模型
//!
//! 定义待投票项目相关的数据库模型结构体

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::FromRow;

/// 项目状态
///
/// 数据库中以 `SMALLINT` 存储，`Rejected` 同时承担软删除的语义。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl ProjectStatus {
    /// 全部状态，按状态码排序
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Pending,
        ProjectStatus::Approved,
        ProjectStatus::Rejected,
        ProjectStatus::Completed,
    ];

    /// 根据数据库状态码解析状态，未知状态码返回 `None`
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Pending),
            1 => Some(Self::Approved),
            2 => Some(Self::Rejected),
            3 => Some(Self::Completed),
            _ => None,
        }
    }

    /// 数据库状态码
    pub fn code(&self) -> i16 {
        match self {
            Self::Pending => 0,
            Self::Approved => 1,
            Self::Rejected => 2,
            Self::Completed => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Completed => "Completed",
        }
    }

    /// 管理员可以执行的状态流转
    ///
    /// - `Pending` -> `Approved`
    /// - `Approved` -> `Rejected`
    ///
    /// `Rejected` 和 `Completed` 是终态，返回 `None`
    pub fn admin_transition(&self) -> Option<ProjectStatus> {
        match self {
            Self::Pending => Some(Self::Approved),
            Self::Approved => Some(Self::Rejected),
            Self::Rejected | Self::Completed => None,
        }
    }
}

/// 项目列表/详情查询结果
///
/// 包含项目本身、提交人、所属 backlog 以及实时统计出来的投票数。
/// 关联数据都来自 `LEFT JOIN`，因此全部是 [`Option`]。
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRecord {
    pub id: i64,
    pub title: String,
    /// 项目上记录的 backlog 外键
    pub backlog_id: Option<i64>,
    /// 实际关联到的 backlog ID，backlog 不存在时为 `None`
    pub backlog_ref_id: Option<i64>,
    pub backlog_title: Option<String>,
    pub user_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub git_url: String,
    /// 原始状态码，可能包含未知值
    pub status: i16,
    pub vote_deadline: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
    pub total_votes: i64,
    pub upvotes: i64,
    pub downvotes: i64,
}

impl ProjectRecord {
    /// 解析后的项目状态，未知状态码返回 `None`
    pub fn project_status(&self) -> Option<ProjectStatus> {
        ProjectStatus::from_code(self.status)
    }
}

/// 可排序的列
///
/// 排序列是白名单，直接映射到 SQL 表达式，不接受任何用户输入的 SQL 片段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    ProjectId,
    ProjectTitle,
    BacklogId,
    Status,
    UploadedBy,
    TotalVotes,
    Upvotes,
    Downvotes,
    GitUrl,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// 排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectSort {
    pub column: SortColumn,
    pub direction: SortDirection,
}

/// 项目列表查询参数
///
/// 所有可选参数为 `None` 时表示不做限制。
#[derive(Debug, Clone, Default)]
pub struct ProjectListQuery {
    /// 只查询某个 backlog 下的项目
    pub backlog_id: Option<i64>,

    /// `true` 只查询已拒绝的项目，`false` 查询除已拒绝外的全部项目
    pub include_rejected: bool,

    /// 模糊搜索关键字（不区分大小写）
    pub search_text: Option<String>,

    /// 精确匹配的状态
    pub status_filter: Option<ProjectStatus>,

    /// 创建时间下限（当天 00:00:00 起）
    pub created_from: Option<NaiveDate>,

    /// 创建时间上限（包含当天全天）
    pub created_to: Option<NaiveDate>,

    /// 排序方式，为 `None` 时按总票数倒序
    pub sort: Option<ProjectSort>,

    /// 页面大小，为 `None` 时返回全部数据
    pub limit: Option<i64>,

    /// 偏移量
    pub offset: i64,
}

/// 项目分页查询结果
#[derive(Debug, Clone)]
pub struct ProjectPage {
    pub projects: Vec<ProjectRecord>,
    /// 只应用 backlog 和状态分区过滤后的总数
    pub records_total: i64,
    /// 应用全部过滤条件后的总数
    pub records_filtered: i64,
}

/// 各状态项目计数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromRow)]
pub struct ProjectCounts {
    pub total_project: i64,
    pub pending_project: i64,
    pub approved_project: i64,
    pub rejected_project: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_round_trip() {
        for status in ProjectStatus::ALL {
            assert_eq!(ProjectStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(ProjectStatus::from_code(2), Some(ProjectStatus::Rejected));
    }

    #[test]
    fn test_unknown_status_code() {
        assert_eq!(ProjectStatus::from_code(-1), None);
        assert_eq!(ProjectStatus::from_code(4), None);
    }

    #[test]
    fn test_admin_transitions() {
        assert_eq!(ProjectStatus::Pending.admin_transition(), Some(ProjectStatus::Approved));
        assert_eq!(ProjectStatus::Approved.admin_transition(), Some(ProjectStatus::Rejected));
        assert_eq!(ProjectStatus::Rejected.admin_transition(), None);
        assert_eq!(ProjectStatus::Completed.admin_transition(), None);
    }
}
