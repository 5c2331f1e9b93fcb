//! 项目仓库 trait 定义
//!
//! 定义项目数据库操作的抽象接口

use crate::models::project::{ProjectCounts, ProjectListQuery, ProjectPage, ProjectRecord, ProjectStatus};
use crate::models::vote::{VoteType, VoterRecord};
use crate::DatabaseResult;
use chrono::NaiveDateTime;

/// 项目仓库trait定义
///
/// 定义了项目相关的数据库操作接口，支持：
/// - 项目列表（过滤、搜索、排序、分页）
/// - 各状态项目计数
/// - 项目详情
/// - 状态修改 / 审核通过
/// - 投票人列表
#[async_trait::async_trait]
pub trait ProjectRepositoryTrait: Send + Sync + 'static {
    /// 根据查询参数搜索项目
    ///
    /// # 参数
    /// - `query`: 过滤、排序、分页参数
    ///
    /// # 返回值
    /// 返回当前页数据以及过滤前后的总数 [`ProjectPage`]
    async fn find_projects(&self, query: &ProjectListQuery) -> DatabaseResult<ProjectPage>;

    /// 统计各状态的项目数量
    ///
    /// # 参数
    /// - `backlog_id`: 只统计某个 backlog 下的项目，`None` 表示全部
    async fn count_projects(&self, backlog_id: Option<i64>) -> DatabaseResult<ProjectCounts>;

    /// 根据 ID 获取项目信息（包含投票统计）
    ///
    /// 项目不存在时返回 [`crate::DatabaseError::NotFound`]
    async fn get_project_by_id(&self, id: i64) -> DatabaseResult<ProjectRecord>;

    /// 修改项目状态
    ///
    /// 项目不存在时返回 [`crate::DatabaseError::NotFound`]
    async fn update_status(&self, id: i64, status: ProjectStatus) -> DatabaseResult<()>;

    /// 审核通过项目并设置投票截止时间
    ///
    /// 项目不存在时返回 [`crate::DatabaseError::NotFound`]
    async fn approve_project(&self, id: i64, vote_deadline: NaiveDateTime) -> DatabaseResult<()>;

    /// 查询项目的投票人列表
    ///
    /// # 参数
    /// - `project_id`: 项目 ID
    /// - `vote_type`: 只查询某种投票，`None` 表示全部
    async fn find_voters(&self, project_id: i64, vote_type: Option<VoteType>) -> DatabaseResult<Vec<VoterRecord>>;
}
