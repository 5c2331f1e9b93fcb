//! 项目列表行渲染
//!
//! 把数据库查询结果转换为后台列表中展示的一行，包括状态标签、可点击的投票数以及操作菜单。

use crate::models::projects::{
    ActionKind, ProjectAction, ProjectListRow, StatusBadge, VoteCounter, VoteTypeParam,
};
use chrono::NaiveDateTime;
use database::{ProjectRecord, ProjectStatus};

const NOT_AVAILABLE: &str = "N/A";

/// 渲染状态标签，未知状态码返回 `Unknown`
pub fn status_badge(status: Option<ProjectStatus>) -> StatusBadge {
    let (label, variant) = match status {
        Some(ProjectStatus::Pending) => ("Pending", "secondary"),
        Some(ProjectStatus::Approved) => ("Approved", "primary"),
        Some(ProjectStatus::Rejected) => ("Rejected", "danger"),
        Some(ProjectStatus::Completed) => ("Completed", "success"),
        None => ("Unknown", "dark"),
    };
    StatusBadge {
        label: label.to_string(),
        variant: variant.to_string(),
    }
}

/// 提交人姓名，缺失的部分按空字符串处理
pub fn uploaded_by(first_name: Option<&str>, last_name: Option<&str>) -> String {
    format!("{} {}", first_name.unwrap_or_default(), last_name.unwrap_or_default())
}

/// 创建时间，格式为 `05 Mar 2025`
pub fn format_created_at(created_at: Option<NaiveDateTime>) -> String {
    created_at.map_or_else(|| NOT_AVAILABLE.to_string(), |ts| ts.format("%d %b %Y").to_string())
}

fn vote_counter(count: i64, project_id: i64, vote_type: Option<VoteTypeParam>) -> VoteCounter {
    let title = match vote_type {
        None => "View Voters",
        Some(VoteTypeParam::Up) => "View Upvoters",
        Some(VoteTypeParam::Down) => "View Downvoters",
    };
    VoteCounter {
        count,
        project_id,
        vote_type,
        title: title.to_string(),
    }
}

/// 操作菜单
///
/// 只有存在管理员状态流转的项目才会出现 `Approve` / `Reject`，
/// `View` 和 `View Log` 对所有项目可见。
pub fn row_actions(record: &ProjectRecord) -> Vec<ProjectAction> {
    let mut actions = Vec::with_capacity(3);

    let transition = record.project_status().and_then(|status| status.admin_transition());
    match transition {
        Some(ProjectStatus::Approved) => actions.push(ProjectAction {
            kind: ActionKind::Approve,
            label: "Approve".to_string(),
            project_id: Some(record.id),
            target_status: Some(ProjectStatus::Approved.code()),
            backlog_id: None,
            submission: Some(uploaded_by(record.first_name.as_deref(), record.last_name.as_deref())),
            title: Some(record.title.clone()),
        }),
        Some(ProjectStatus::Rejected) => actions.push(ProjectAction {
            kind: ActionKind::Reject,
            label: "Reject".to_string(),
            project_id: Some(record.id),
            target_status: Some(ProjectStatus::Rejected.code()),
            backlog_id: None,
            submission: None,
            title: None,
        }),
        _ => {}
    }

    actions.push(ProjectAction {
        kind: ActionKind::View,
        label: "View".to_string(),
        project_id: Some(record.id),
        target_status: None,
        backlog_id: None,
        submission: None,
        title: None,
    });
    actions.push(ProjectAction {
        kind: ActionKind::ViewLog,
        label: "View Log".to_string(),
        project_id: None,
        target_status: None,
        backlog_id: record.backlog_id,
        submission: None,
        title: None,
    });

    actions
}

/// 渲染一行数据
///
/// `row_index` 是当前行在全部过滤结果中的序号，从1开始。
pub fn render_row(record: ProjectRecord, row_index: i64) -> ProjectListRow {
    let actions = row_actions(&record);

    ProjectListRow {
        row_index,
        project_id: record.id,
        backlog_id: record
            .backlog_ref_id
            .map_or_else(|| NOT_AVAILABLE.to_string(), |id| id.to_string()),
        status: record.status,
        status_badge: status_badge(record.project_status()),
        uploaded_by: uploaded_by(record.first_name.as_deref(), record.last_name.as_deref()),
        total_votes: record.total_votes,
        upvotes: record.upvotes,
        downvotes: record.downvotes,
        votes_clickable: vote_counter(record.total_votes, record.id, None),
        upvotes_clickable: vote_counter(record.upvotes, record.id, Some(VoteTypeParam::Up)),
        downvotes_clickable: vote_counter(record.downvotes, record.id, Some(VoteTypeParam::Down)),
        created_at_formatted: format_created_at(record.created_at),
        git_url: record.git_url,
        project_title: record.title,
        actions,
    }
}
