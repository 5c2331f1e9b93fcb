//! 服务层 trait 定义
//!
//! 定义服务层的抽象接口，遵循六边形架构的端口适配器模式

use crate::models::err::AppError;
use crate::models::projects::{ProjectCountsInfo, ProjectDetail, ProjectListRow, StatusAction, VoterInfo};
use chrono::NaiveDateTime;
use database::{ProjectListQuery, ProjectStatus, VoteType};

/// 渲染后的一页项目列表
#[derive(Debug, Clone)]
pub struct ProjectTable {
    pub rows: Vec<ProjectListRow>,
    pub records_total: i64,
    pub records_filtered: i64,
}

/// 状态修改结果
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub project_id: i64,
    pub status: ProjectStatus,
    pub action: StatusAction,
    /// 修改后全部待审核项目数量
    pub pending_count: i64,
}

/// 项目服务 trait 定义
///
/// 定义了项目相关的业务逻辑接口，作为应用层的端口(Port)
///
/// 该 trait 作为业务逻辑的抽象接口，具体实现由 [`crate::services::ProjectService`] 提供。
/// 路由层通过 `Arc<dyn ProjectServiceTrait>` 使用，因此这里不能要求 `Clone`。
#[async_trait::async_trait]
pub trait ProjectServiceTrait: Send + Sync + 'static {
    /// 查询并渲染一页项目列表
    async fn list_projects(&self, query: ProjectListQuery) -> Result<ProjectTable, AppError>;

    /// 统计各状态项目数量
    ///
    /// # 参数
    /// - `backlog_id`: 只统计某个 backlog 下的项目，`None` 表示全部
    async fn project_counts(&self, backlog_id: Option<i64>) -> Result<ProjectCountsInfo, AppError>;

    /// 修改项目状态并记录审计日志
    async fn change_status(&self, id: i64, status: ProjectStatus) -> Result<StatusChange, AppError>;

    /// 审核通过项目，同时设置投票截止时间并记录审计日志
    async fn approve_project(&self, id: i64, vote_deadline: NaiveDateTime) -> Result<(), AppError>;

    /// 项目详情
    async fn get_project(&self, id: i64) -> Result<ProjectDetail, AppError>;

    /// 项目投票人列表
    async fn list_voters(&self, project_id: i64, vote_type: Option<VoteType>) -> Result<Vec<VoterInfo>, AppError>;
}
