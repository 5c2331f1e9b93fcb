//! 项目仓库
//!
//! 负责待投票项目相关的数据库操作

use crate::models::project::{ProjectCounts, ProjectListQuery, ProjectPage, ProjectRecord, ProjectStatus};
use crate::models::vote::{VoteType, VoterRecord};
use crate::repositories::query::{build_count_query, build_page_query, FilterScope, PROJECT_COLUMNS, PROJECT_JOINS};
use crate::repositories::traits::ProjectRepositoryTrait;
use crate::{DatabaseError, DatabaseResult};
use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool};
use tracing::debug;

/// 分页查询的一行数据，额外带有窗口函数计算的过滤后总数
#[derive(Debug, FromRow)]
struct ProjectPageRow {
    #[sqlx(flatten)]
    project: ProjectRecord,
    filtered_count: i64,
}

/// 项目仓库结构体
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    /// 创建新的项目仓库实例
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProjectRepositoryTrait for ProjectRepository {
    /// 根据查询参数搜索项目
    ///
    /// # SQL 查询说明
    ///
    /// SQL 由 [`crate::repositories::query`] 动态拼接，一共最多执行三条查询：
    /// 1. `records_total`：只应用 backlog 和状态分区过滤的计数
    /// 2. 分页数据：应用全部过滤条件，使用 `COUNT(*) OVER ()` 窗口函数同时拿到过滤后的总数
    /// 3. 当偏移量超出结果范围或每页大小为0时，分页数据为空，窗口函数拿不到总数，需要单独计数
    ///
    /// 投票数在子查询中按项目聚合后再关联，保证每个项目只出现一次。
    ///
    /// # 错误处理
    ///
    /// 如果数据库操作失败，会返回 [`DatabaseError`]
    async fn find_projects(&self, query: &ProjectListQuery) -> DatabaseResult<ProjectPage> {
        debug!("🔍 搜索项目 - 参数: {:?}", query);

        let mut total_builder = build_count_query(query, FilterScope::Base);
        let records_total: i64 = total_builder.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut page_builder = build_page_query(query);
        let rows: Vec<ProjectPageRow> = page_builder.build_query_as::<ProjectPageRow>().fetch_all(&self.pool).await?;

        let records_filtered = match rows.first() {
            Some(row) => row.filtered_count,
            // 偏移量超出范围或 LIMIT 0 时分页为空，但过滤结果不一定为空
            None if query.offset > 0 || query.limit == Some(0) => {
                let mut filtered_builder = build_count_query(query, FilterScope::Full);
                filtered_builder.build_query_scalar::<i64>().fetch_one(&self.pool).await?
            }
            None => 0,
        };

        let projects: Vec<ProjectRecord> = rows.into_iter().map(|r| r.project).collect();

        debug!(
            "✅ 搜索完成 - 当前页 {} 个项目，过滤后 {} 个，总计 {} 个",
            projects.len(),
            records_filtered,
            records_total
        );

        Ok(ProjectPage {
            projects,
            records_total,
            records_filtered,
        })
    }

    /// 统计各状态的项目数量
    ///
    /// 使用 `COUNT(*) FILTER (...)` 在一次扫描中得到全部计数，
    /// `$1` 为 `NULL` 时不限制 backlog。
    async fn count_projects(&self, backlog_id: Option<i64>) -> DatabaseResult<ProjectCounts> {
        debug!("🔢 统计项目数量 - backlog: {:?}", backlog_id);

        let counts = sqlx::query_as::<_, ProjectCounts>(
            r#"
            SELECT COUNT(*) AS total_project,
                   COUNT(*) FILTER (WHERE status = $2) AS pending_project,
                   COUNT(*) FILTER (WHERE status = $3) AS approved_project,
                   COUNT(*) FILTER (WHERE status = $4) AS rejected_project
            FROM backlog_projects
            WHERE ($1::BIGINT IS NULL OR backlog_id = $1)
            "#,
        )
        .bind(backlog_id)
        .bind(ProjectStatus::Pending.code())
        .bind(ProjectStatus::Approved.code())
        .bind(ProjectStatus::Rejected.code())
        .fetch_one(&self.pool)
        .await?;

        debug!("✅ 统计完成: {:?}", counts);
        Ok(counts)
    }

    /// 根据 ID 获取项目信息
    ///
    /// 与列表查询使用相同的列和关联，保证详情和列表中的投票数一致。
    async fn get_project_by_id(&self, id: i64) -> DatabaseResult<ProjectRecord> {
        debug!("🔍 根据 ID 获取项目: {}", id);

        let sql = format!("{PROJECT_COLUMNS}{PROJECT_JOINS}\n    WHERE p.id = $1");
        let project = sqlx::query_as::<_, ProjectRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found(format!("project {id}")))?;

        debug!("✅ 项目获取成功: {:#?}", project);
        Ok(project)
    }

    /// 修改项目状态
    ///
    /// 单行 `UPDATE`，依赖数据库本身的原子性，并发修改时以最后一次写入为准。
    async fn update_status(&self, id: i64, status: ProjectStatus) -> DatabaseResult<()> {
        debug!("🔄 修改项目 {} 状态为 {:?}", id, status);

        let result = sqlx::query(
            r#"
            UPDATE backlog_projects
            SET status = $2,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.code())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found(format!("project {id}")));
        }

        debug!("✅ 项目 {} 状态修改成功", id);
        Ok(())
    }

    /// 审核通过项目
    ///
    /// 同一条语句中修改状态和投票截止时间，不会出现只修改了一半的情况。
    async fn approve_project(&self, id: i64, vote_deadline: NaiveDateTime) -> DatabaseResult<()> {
        debug!("✅ 审核通过项目 {}，投票截止时间 {}", id, vote_deadline);

        let result = sqlx::query(
            r#"
            UPDATE backlog_projects
            SET status = $2,
                vote_deadline = $3,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(ProjectStatus::Approved.code())
        .bind(vote_deadline)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found(format!("project {id}")));
        }

        Ok(())
    }

    /// 查询项目的投票人列表
    ///
    /// 匿名投票只在 `JOIN` 条件中排除，投票记录本身仍然返回，
    /// 但是 `user_id` 和姓名一律为 `NULL`。
    async fn find_voters(&self, project_id: i64, vote_type: Option<VoteType>) -> DatabaseResult<Vec<VoterRecord>> {
        debug!("🔍 查询项目 {} 的投票人 - 类型: {:?}", project_id, vote_type);

        let voters = sqlx::query_as::<_, VoterRecord>(
            r#"
            SELECT v.id,
                   v.project_id,
                   CASE WHEN v.vote_mode = 'anonymous' THEN NULL ELSE v.user_id END AS user_id,
                   v.vote_type,
                   v.vote_mode,
                   u.first_name AS user_name,
                   u.last_name AS last_name,
                   v.created_at
            FROM votes v
            LEFT JOIN users u ON u.id = v.user_id AND v.vote_mode <> 'anonymous'
            WHERE v.project_id = $1
              AND ($2::TEXT IS NULL OR v.vote_type = $2)
            ORDER BY v.id
            "#,
        )
        .bind(project_id)
        .bind(vote_type.map(|t| t.as_str()))
        .fetch_all(&self.pool)
        .await?;

        debug!("✅ 查询完成 - {} 条投票记录", voters.len());
        Ok(voters)
    }
}
