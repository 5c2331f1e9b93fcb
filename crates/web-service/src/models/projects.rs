//! 项目相关接口的请求和返回模型

use crate::models::common::empty_string_as_none;
use crate::models::err::AppError;
use chrono::{NaiveDate, NaiveDateTime};
use database::{
    ProjectCounts, ProjectListQuery, ProjectRecord, ProjectSort, ProjectStatus, SortColumn, SortDirection, VoteType,
    VoterRecord,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// 默认每页大小，和 DataTables 默认值一致
pub const DEFAULT_PAGE_LENGTH: i64 = 10;

/// 列表中可以排序的列
///
/// 名称和返回的 [`ProjectListRow`] 字段一致，前端可以直接把列名传回来。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ListColumn {
    ProjectId,
    ProjectTitle,
    BacklogId,
    StatusBadge,
    UploadedBy,
    VotesClickable,
    UpvotesClickable,
    DownvotesClickable,
    GitUrl,
    CreatedAtFormatted,
}

impl FromStr for ListColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let column = match s {
            "project_id" => Self::ProjectId,
            "project_title" => Self::ProjectTitle,
            "backlog_id" => Self::BacklogId,
            "status_badge" | "status" => Self::StatusBadge,
            "uploaded_by" => Self::UploadedBy,
            "votes_clickable" | "total_votes" => Self::VotesClickable,
            "upvotes_clickable" | "upvotes" => Self::UpvotesClickable,
            "downvotes_clickable" | "downvotes" => Self::DownvotesClickable,
            "git_url" => Self::GitUrl,
            "created_at_formatted" | "created_at" => Self::CreatedAtFormatted,
            other => return Err(format!("unknown sort column `{other}`")),
        };
        Ok(column)
    }
}

impl From<ListColumn> for SortColumn {
    fn from(column: ListColumn) -> Self {
        match column {
            ListColumn::ProjectId => SortColumn::ProjectId,
            ListColumn::ProjectTitle => SortColumn::ProjectTitle,
            ListColumn::BacklogId => SortColumn::BacklogId,
            ListColumn::StatusBadge => SortColumn::Status,
            ListColumn::UploadedBy => SortColumn::UploadedBy,
            ListColumn::VotesClickable => SortColumn::TotalVotes,
            ListColumn::UpvotesClickable => SortColumn::Upvotes,
            ListColumn::DownvotesClickable => SortColumn::Downvotes,
            ListColumn::GitUrl => SortColumn::GitUrl,
            ListColumn::CreatedAtFormatted => SortColumn::CreatedAt,
        }
    }
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderDir {
    Asc,
    Desc,
}

impl FromStr for OrderDir {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown order direction `{other}`")),
        }
    }
}

impl From<OrderDir> for SortDirection {
    fn from(dir: OrderDir) -> Self {
        match dir {
            OrderDir::Asc => SortDirection::Asc,
            OrderDir::Desc => SortDirection::Desc,
        }
    }
}

/// 投票类型过滤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VoteTypeParam {
    Up,
    Down,
}

impl FromStr for VoteTypeParam {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(format!("unknown vote type `{other}`")),
        }
    }
}

impl From<VoteTypeParam> for VoteType {
    fn from(param: VoteTypeParam) -> Self {
        match param {
            VoteTypeParam::Up => VoteType::Up,
            VoteTypeParam::Down => VoteType::Down,
        }
    }
}

/// 项目列表查询参数
///
/// 字段来自 DataTables 的服务端请求以及页面上的过滤控件，全部为可选参数，
/// 空字符串等同于未传递。
#[derive(Deserialize, Debug, Default, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct ProjectListParams {
    /// DataTables 请求计数器，原样返回
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<i64>, example = 1)]
    pub draw: Option<i64>,

    /// 分页偏移量
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<i64>, example = 0)]
    #[validate(range(min = 0))]
    pub start: Option<i64>,

    /// 每页大小，`-1` 表示返回全部
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<i64>, example = 10)]
    #[validate(range(min = -1, max = 500))]
    pub length: Option<i64>,

    /// 模糊搜索关键字
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<String>, example = "alpha")]
    #[validate(length(max = 200))]
    pub search: Option<String>,

    /// 排序列，不传时按总票数倒序
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<ListColumn>)]
    pub order_column: Option<ListColumn>,

    /// 排序方向，默认倒序
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<OrderDir>)]
    pub order_dir: Option<OrderDir>,

    /// 只查询某个 backlog 下的项目
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<i64>)]
    pub url_backlog_id: Option<i64>,

    /// `true` 只显示已拒绝（已删除）的项目
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<bool>)]
    pub show_deleted_backlogs: Option<bool>,

    /// 精确匹配状态码：0=Pending 1=Approved 2=Rejected 3=Completed
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<i16>, example = 0)]
    pub status_filter: Option<i16>,

    /// 创建日期下限（包含）
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<String>, example = "2025-01-01")]
    pub start_date: Option<NaiveDate>,

    /// 创建日期上限（包含）
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<String>, example = "2025-01-31")]
    pub end_date: Option<NaiveDate>,
}

impl ProjectListParams {
    /// 转换为仓库层的查询参数
    ///
    /// 未知的状态码会返回 [`AppError::BadRequest`]。
    pub fn to_query(&self) -> Result<ProjectListQuery, AppError> {
        let status_filter = match self.status_filter {
            Some(code) => Some(
                ProjectStatus::from_code(code).ok_or_else(|| AppError::bad_request(format!("unknown status {code}")))?,
            ),
            None => None,
        };

        let limit = match self.length.unwrap_or(DEFAULT_PAGE_LENGTH) {
            -1 => None,
            length => Some(length),
        };

        let sort = self.order_column.map(|column| ProjectSort {
            column: column.into(),
            direction: self.order_dir.map(Into::into).unwrap_or_default(),
        });

        Ok(ProjectListQuery {
            backlog_id: self.url_backlog_id,
            include_rejected: self.show_deleted_backlogs.unwrap_or(false),
            search_text: self.search.clone(),
            status_filter,
            created_from: self.start_date,
            created_to: self.end_date,
            sort,
            limit,
            offset: self.start.unwrap_or(0),
        })
    }
}

/// 计数接口参数
#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectCountsParams {
    /// 只统计某个 backlog 下的项目
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<i64>)]
    pub url_backlog_id: Option<i64>,
}

/// 投票人列表参数
#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VoterListParams {
    /// 只查询某种投票
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<VoteTypeParam>)]
    pub vote_type: Option<VoteTypeParam>,
}

/// 状态标签
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct StatusBadge {
    #[schema(example = "Pending")]
    pub label: String,
    /// 前端样式，例如 `secondary`、`primary`、`danger`、`success`
    #[schema(example = "secondary")]
    pub variant: String,
}

/// 可点击的投票数，点击后按项目和投票类型查看投票人
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct VoteCounter {
    #[schema(example = 4)]
    pub count: i64,
    #[schema(example = 15)]
    pub project_id: i64,
    /// 为空时查看全部投票
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_type: Option<VoteTypeParam>,
    #[schema(example = "View Upvoters")]
    pub title: String,
}

/// 操作菜单项类型
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Approve,
    Reject,
    View,
    ViewLog,
}

/// 操作菜单项
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct ProjectAction {
    pub kind: ActionKind,
    #[schema(example = "Approve")]
    pub label: String,
    /// 查看日志的菜单项按 backlog 查看，此时为空
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    /// 点击后要修改成的状态码
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_status: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backlog_id: Option<i64>,
    /// 审核确认框中展示的提交人
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<String>,
    /// 审核确认框中展示的项目名称
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// 项目列表中的一行
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ProjectListRow {
    /// 当前行在全部结果中的序号，从1开始
    #[serde(rename = "DT_RowIndex")]
    pub row_index: i64,
    pub project_id: i64,
    pub project_title: String,
    /// 所属 backlog ID，不存在时为 `N/A`
    #[schema(example = "3")]
    pub backlog_id: String,
    pub status: i16,
    pub status_badge: StatusBadge,
    #[schema(example = "Jane Doe")]
    pub uploaded_by: String,
    pub total_votes: i64,
    pub upvotes: i64,
    pub downvotes: i64,
    pub votes_clickable: VoteCounter,
    pub upvotes_clickable: VoteCounter,
    pub downvotes_clickable: VoteCounter,
    pub git_url: String,
    #[schema(example = "05 Mar 2025")]
    pub created_at_formatted: String,
    pub actions: Vec<ProjectAction>,
}

/// 各状态项目计数
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
pub struct ProjectCountsInfo {
    pub total_project: i64,
    pub pending_project: i64,
    pub approved_project: i64,
    pub rejected_project: i64,
}

impl From<ProjectCounts> for ProjectCountsInfo {
    fn from(counts: ProjectCounts) -> Self {
        Self {
            total_project: counts.total_project,
            pending_project: counts.pending_project,
            approved_project: counts.approved_project,
            rejected_project: counts.rejected_project,
        }
    }
}

/// 修改项目状态
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct StatusUpdateRequest {
    #[schema(example = 15)]
    pub id: i64,

    /// 新的状态码：0=Pending 1=Approved 2=Rejected 3=Completed
    #[schema(example = 2)]
    #[validate(range(min = 0, max = 3))]
    pub status: i16,
}

/// 修改状态后前端需要执行的动作
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatusAction {
    /// 项目被拒绝，前端需要从当前列表中移除
    Rejected,
    StatusChanged,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct StatusUpdateReply {
    #[schema(example = 200)]
    pub status: u16,
    #[schema(example = "Status Change Successfully")]
    pub message: String,
    /// 修改后全部待审核项目数量
    pub pending_count: i64,
    pub project_id: i64,
    pub project_status: i16,
    pub action: StatusAction,
}

/// 审核通过项目
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct ApproveRequest {
    #[schema(example = 15)]
    pub project_id: i64,

    /// 投票截止时间，支持 `2025-05-01`、`2025-05-01T18:00`、`2025-05-01 18:00:00` 等格式
    #[serde(rename = "approveVoteDeadline")]
    #[schema(example = "2025-05-01T18:00")]
    #[validate(required, length(min = 1))]
    pub approve_vote_deadline: Option<String>,
}

/// 可接受的投票截止时间格式
const DEADLINE_FORMATS: [&str; 4] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// 解析投票截止时间
///
/// 只有日期时按当天零点处理。
pub fn parse_vote_deadline(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    DEADLINE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// backlog 信息
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct BacklogInfo {
    pub id: i64,
    pub title: Option<String>,
}

/// 提交人信息
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct SubmitterInfo {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// 项目详情
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ProjectDetail {
    pub id: i64,
    pub title: String,
    pub backlog_id: Option<i64>,
    pub user_id: Option<i64>,
    pub git_url: String,
    pub status: i16,
    #[schema(example = "Pending")]
    pub status_label: String,
    pub vote_deadline: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
    pub total_votes: i64,
    pub upvotes: i64,
    pub downvotes: i64,
    pub backlog: Option<BacklogInfo>,
    pub user: Option<SubmitterInfo>,
}

impl From<ProjectRecord> for ProjectDetail {
    fn from(record: ProjectRecord) -> Self {
        let status_label = record.project_status().map_or("Unknown", |s| s.label()).to_string();
        let backlog = record.backlog_ref_id.map(|id| BacklogInfo {
            id,
            title: record.backlog_title.clone(),
        });
        // 提交人被删除时 first_name / last_name 都为空，不返回关联对象
        let user = record.user_id.filter(|_| record.first_name.is_some() || record.last_name.is_some()).map(|id| {
            SubmitterInfo {
                id,
                first_name: record.first_name.clone(),
                last_name: record.last_name.clone(),
            }
        });

        Self {
            id: record.id,
            title: record.title,
            backlog_id: record.backlog_id,
            user_id: record.user_id,
            git_url: record.git_url,
            status: record.status,
            status_label,
            vote_deadline: record.vote_deadline,
            created_at: record.created_at,
            total_votes: record.total_votes,
            upvotes: record.upvotes,
            downvotes: record.downvotes,
            backlog,
            user,
        }
    }
}

/// 投票人列表中的一条记录
///
/// 匿名投票不会返回任何投票人信息。
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct VoterInfo {
    pub id: i64,
    pub project_id: i64,
    pub user_id: Option<i64>,
    #[schema(example = "up")]
    pub vote_type: String,
    #[schema(example = "normal")]
    pub vote_mode: String,
    /// 投票人 first name
    pub user_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<VoterRecord> for VoterInfo {
    fn from(record: VoterRecord) -> Self {
        Self {
            id: record.id,
            project_id: record.project_id,
            user_id: record.user_id,
            vote_type: record.vote_type,
            vote_mode: record.vote_mode,
            user_name: record.user_name,
            last_name: record.last_name,
            created_at: record.created_at,
        }
    }
}
