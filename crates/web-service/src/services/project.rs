//! 项目服务
//!
//! 提供项目相关的业务逻辑操作：列表渲染、状态流转以及操作日志记录

use crate::models::err::AppError;
use crate::models::projects::{ProjectCountsInfo, ProjectDetail, StatusAction, VoterInfo};
use crate::services::table::render_row;
use crate::services::traits::{ProjectServiceTrait, ProjectTable, StatusChange};
use chrono::NaiveDateTime;
use database::{AuditLogEntry, AuditLogRepositoryTrait, ProjectListQuery, ProjectRepositoryTrait, ProjectStatus, VoteType};
use shared_lib::{EntityType, LogAction};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct ProjectService<PR: ProjectRepositoryTrait, AL: AuditLogRepositoryTrait> {
    project_repository: PR,
    audit_log: AL,
}

impl<PR: ProjectRepositoryTrait, AL: AuditLogRepositoryTrait> ProjectService<PR, AL> {
    pub fn new(project_repository: PR, audit_log: AL) -> Self {
        Self {
            project_repository,
            audit_log,
        }
    }

    /// 记录操作日志
    ///
    /// 状态修改已经提交，日志写入失败只记录告警，不影响请求结果。
    async fn record(&self, entry: AuditLogEntry) {
        let entity_id = entry.entity_id;
        if let Err(err) = self.audit_log.log(entry).await {
            warn!("⚠️ 项目 {entity_id} 操作日志写入失败: {err}");
        }
    }
}

fn status_message(id: i64, status: ProjectStatus) -> (LogAction, String) {
    match status {
        ProjectStatus::Rejected => (LogAction::Rejected, format!("Project id '{id}' was rejected by admin.")),
        other => (
            LogAction::StatusChanged,
            format!("Project id '{id}' status was changed to {} by admin.", other.label()),
        ),
    }
}

#[async_trait::async_trait]
impl<PR: ProjectRepositoryTrait, AL: AuditLogRepositoryTrait> ProjectServiceTrait for ProjectService<PR, AL> {
    #[instrument(skip(self))]
    async fn list_projects(&self, query: ProjectListQuery) -> Result<ProjectTable, AppError> {
        let page = self.project_repository.find_projects(&query).await?;
        let offset = query.offset;

        let rows = page
            .projects
            .into_iter()
            .zip(1..)
            .map(|(record, index)| render_row(record, offset + index))
            .collect();

        Ok(ProjectTable {
            rows,
            records_total: page.records_total,
            records_filtered: page.records_filtered,
        })
    }

    #[instrument(skip(self))]
    async fn project_counts(&self, backlog_id: Option<i64>) -> Result<ProjectCountsInfo, AppError> {
        let counts = self.project_repository.count_projects(backlog_id).await?;
        Ok(counts.into())
    }

    #[instrument(skip(self))]
    async fn change_status(&self, id: i64, status: ProjectStatus) -> Result<StatusChange, AppError> {
        self.project_repository.update_status(id, status).await?;
        info!("✅ 项目 {id} 状态修改为 {}", status.label());

        let (action, message) = status_message(id, status);
        self.record(AuditLogEntry::new(action, EntityType::Project, id, message)).await;

        let pending_count = self.project_repository.count_projects(None).await?.pending_project;

        Ok(StatusChange {
            project_id: id,
            status,
            action: if status == ProjectStatus::Rejected {
                StatusAction::Rejected
            } else {
                StatusAction::StatusChanged
            },
            pending_count,
        })
    }

    #[instrument(skip(self))]
    async fn approve_project(&self, id: i64, vote_deadline: NaiveDateTime) -> Result<(), AppError> {
        self.project_repository.approve_project(id, vote_deadline).await?;
        info!("✅ 项目 {id} 审核通过，投票截止时间 {vote_deadline}");

        self.record(AuditLogEntry::new(
            LogAction::Approved,
            EntityType::Project,
            id,
            format!("Project id '{id}' was approved by admin."),
        ))
        .await;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_project(&self, id: i64) -> Result<ProjectDetail, AppError> {
        let record = self.project_repository.get_project_by_id(id).await?;
        Ok(record.into())
    }

    #[instrument(skip(self))]
    async fn list_voters(&self, project_id: i64, vote_type: Option<VoteType>) -> Result<Vec<VoterInfo>, AppError> {
        let voters = self.project_repository.find_voters(project_id, vote_type).await?;
        debug!("🔍 项目 {project_id} 共 {} 条投票记录", voters.len());
        Ok(voters.into_iter().map(Into::into).collect())
    }
}
