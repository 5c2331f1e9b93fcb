//! 项目列表查询构建
//!
//! 项目列表的过滤条件都是可选的，而且排序列由调用方决定，无法写成一条静态 SQL，
//! 因此这里使用 [`QueryBuilder`] 动态拼接 SQL，所有用户输入都通过 `push_bind` 绑定，
//! 只有白名单里的排序表达式会被直接拼接。
//!
//! ## 查询结构
//!
//! ```sql
//! SELECT p.*, u.first_name, u.last_name, b.id, t.total_votes, t.upvotes, t.downvotes,
//!        COUNT(*) OVER () AS filtered_count
//! FROM backlog_projects p
//! LEFT JOIN users u ON ...
//! LEFT JOIN backlogs b ON ...
//! LEFT JOIN (SELECT project_id, COUNT(*) ... FROM votes GROUP BY project_id) t ON ...
//! WHERE <backlog> AND <状态分区> AND (<搜索 OR 组>) AND <状态> AND <日期范围>
//! ORDER BY <排序列>, p.id ASC
//! LIMIT .. OFFSET ..
//! ```
//!
//! 投票数先在子查询中按项目聚合，再关联到项目上，每个项目最多关联一行，
//! 不会因为投票数量导致项目行重复。

use crate::models::project::{ProjectListQuery, ProjectSort, ProjectStatus, SortColumn, SortDirection};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::{Postgres, QueryBuilder};

/// 项目列表/详情共用的查询列
pub(crate) const PROJECT_COLUMNS: &str = r#"
    SELECT p.id,
           p.title,
           p.backlog_id,
           b.id AS backlog_ref_id,
           b.title AS backlog_title,
           p.user_id,
           u.first_name,
           u.last_name,
           p.git_url,
           p.status,
           p.vote_deadline,
           p.created_at,
           COALESCE(t.total_votes, 0) AS total_votes,
           COALESCE(t.upvotes, 0) AS upvotes,
           COALESCE(t.downvotes, 0) AS downvotes"#;

/// 项目关联提交人、backlog 以及投票统计
pub(crate) const PROJECT_JOINS: &str = r#"
    FROM backlog_projects p
    LEFT JOIN users u ON u.id = p.user_id
    LEFT JOIN backlogs b ON b.id = p.backlog_id
    LEFT JOIN (
        SELECT project_id,
               COUNT(*) AS total_votes,
               COUNT(*) FILTER (WHERE vote_type = 'up') AS upvotes,
               COUNT(*) FILTER (WHERE vote_type = 'down') AS downvotes
        FROM votes
        GROUP BY project_id
    ) t ON t.project_id = p.id"#;

/// 计数查询只需要提交人信息（用于搜索）
const COUNT_FROM: &str = r#"
    SELECT COUNT(*)
    FROM backlog_projects p
    LEFT JOIN users u ON u.id = p.user_id"#;

/// 过滤条件的应用范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterScope {
    /// 只应用 backlog 和状态分区，用于计算 `records_total`
    Base,
    /// 应用全部过滤条件，用于计算 `records_filtered` 和分页数据
    Full,
}

/// 构建分页查询
///
/// 结果中额外带有 `filtered_count` 列（`COUNT(*) OVER ()`），
/// 窗口函数在 `LIMIT` 之前计算，因此是过滤后的总数。
pub fn build_page_query(query: &ProjectListQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(PROJECT_COLUMNS);
    builder.push(",\n           COUNT(*) OVER () AS filtered_count");
    builder.push(PROJECT_JOINS);
    builder.push("\n    WHERE 1=1");
    push_filters(&mut builder, query, FilterScope::Full);
    push_order(&mut builder, query.sort);

    if let Some(limit) = query.limit {
        builder.push(" LIMIT ");
        builder.push_bind(limit);
    }
    builder.push(" OFFSET ");
    builder.push_bind(query.offset.max(0));

    builder
}

/// 构建计数查询
pub fn build_count_query(query: &ProjectListQuery, scope: FilterScope) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(COUNT_FROM);
    builder.push("\n    WHERE 1=1");
    push_filters(&mut builder, query, scope);
    builder
}

/// 按顺序追加过滤条件，全部以 `AND` 连接
///
/// 1. backlog
/// 2. 状态分区（已拒绝 / 非拒绝，二选一）
/// 3. 关键字搜索（内部为 `OR` 组）
/// 4. 精确状态
/// 5. 创建日期范围
pub fn push_filters(builder: &mut QueryBuilder<'static, Postgres>, query: &ProjectListQuery, scope: FilterScope) {
    if let Some(backlog_id) = query.backlog_id {
        builder.push(" AND p.backlog_id = ");
        builder.push_bind(backlog_id);
    }

    if query.include_rejected {
        builder.push(" AND p.status = ");
    } else {
        builder.push(" AND p.status <> ");
    }
    builder.push_bind(ProjectStatus::Rejected.code());

    if scope == FilterScope::Base {
        return;
    }

    if let Some(search) = query.search_text.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(search));
        let columns = [
            "p.title",
            "p.id::text",
            "p.backlog_id::text",
            "p.git_url",
            "u.first_name",
            "u.last_name",
        ];

        builder.push(" AND (");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                builder.push(" OR ");
            }
            builder.push(*column);
            builder.push(" ILIKE ");
            builder.push_bind(pattern.clone());
        }
        builder.push(")");
    }

    if let Some(status) = query.status_filter {
        builder.push(" AND p.status = ");
        builder.push_bind(status.code());
    }

    if let Some(from) = query.created_from {
        builder.push(" AND p.created_at >= ");
        builder.push_bind(start_of_day(from));
    }

    // 上限包含当天全天，使用次日零点作为开区间
    // 日期已经是最大值时不存在更晚的时间，不需要上限
    if let Some(next_day) = query.created_to.and_then(|to| to.succ_opt()) {
        builder.push(" AND p.created_at < ");
        builder.push_bind(start_of_day(next_day));
    }
}

/// 追加排序
///
/// 未指定排序时按总票数倒序，任何排序最后都追加 `p.id ASC` 保证结果稳定。
pub fn push_order(builder: &mut QueryBuilder<'static, Postgres>, sort: Option<ProjectSort>) {
    let sort = sort.unwrap_or(ProjectSort {
        column: SortColumn::TotalVotes,
        direction: SortDirection::Desc,
    });

    builder.push("\n    ORDER BY ");
    builder.push(sort_expression(sort.column));
    builder.push(match sort.direction {
        SortDirection::Asc => " ASC",
        SortDirection::Desc => " DESC",
    });

    if sort.column != SortColumn::ProjectId {
        builder.push(", p.id ASC");
    }
}

fn sort_expression(column: SortColumn) -> &'static str {
    match column {
        SortColumn::ProjectId => "p.id",
        SortColumn::ProjectTitle => "p.title",
        SortColumn::BacklogId => "p.backlog_id",
        SortColumn::Status => "p.status",
        SortColumn::UploadedBy => "COALESCE(u.first_name, '') || ' ' || COALESCE(u.last_name, '')",
        SortColumn::TotalVotes => "COALESCE(t.total_votes, 0)",
        SortColumn::Upvotes => "COALESCE(t.upvotes, 0)",
        SortColumn::Downvotes => "COALESCE(t.downvotes, 0)",
        SortColumn::GitUrl => "p.git_url",
        SortColumn::CreatedAt => "p.created_at",
    }
}

/// 转义 `LIKE` 通配符，让搜索关键字按字面匹配
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}
