//! 项目相关接口
//!

use crate::models::common::{DataTableReply, MessageReply, RecordsReply, StatusReply, STATUS_OK};
use crate::models::err::AppError;
use crate::models::projects::{
    parse_vote_deadline, ApproveRequest, ProjectCountsInfo, ProjectCountsParams, ProjectDetail, ProjectListParams,
    ProjectListRow, StatusUpdateReply, StatusUpdateRequest, VoterInfo, VoterListParams,
};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::ProjectStatus;
use tracing::debug;
use validator::Validate;

/// 前端 AJAX 请求携带的请求头
const REQUESTED_WITH: &str = "x-requested-with";

fn is_ajax(headers: &HeaderMap) -> bool {
    headers
        .get(REQUESTED_WITH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("XMLHttpRequest"))
}

/// 项目列表
///
/// 后台列表页面使用同一个地址完成两件事：
///
/// - 带 `X-Requested-With: XMLHttpRequest` 请求头时，按 DataTables 服务端模式返回一页数据，
///   支持 backlog、已拒绝/未拒绝、关键字、状态、创建日期过滤以及排序和分页。
/// - 普通请求只返回各状态的项目数量，用于渲染页面顶部的统计卡片。
///
/// 查询参数由 [`ProjectListParams`] 决定，全部为可选参数。
#[utoipa::path(get,
    path = "/projects",
    tag = "projects",
    params(ProjectListParams),
    responses(
        (status = 200, description = "AJAX 请求返回分页数据", body = DataTableReply<ProjectListRow>),
        (status = 200, description = "普通请求返回项目统计", body = StatusReply<ProjectCountsInfo>),
        (status = 400, description = "查询参数不合法"),
    ),
)]
pub async fn list_projects(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ProjectListParams>,
) -> Result<Response, AppError> {
    if !is_ajax(&headers) {
        let counts = state.project_service.project_counts(None).await?;
        return Ok(Json(StatusReply::ok(counts)).into_response());
    }

    debug!("🔍 查询项目列表 {:#?}", params);
    params.validate()?;
    let query = params.to_query()?;

    let table = state.project_service.list_projects(query).await?;

    Ok(Json(DataTableReply {
        draw: params.draw.unwrap_or_default(),
        records_total: table.records_total,
        records_filtered: table.records_filtered,
        data: table.rows,
    })
    .into_response())
}

/// 各状态项目数量
///
/// 可以通过 `url_backlog_id` 只统计某个 backlog 下的项目。
#[utoipa::path(get,
    path = "/projects/counts",
    tag = "projects",
    params(ProjectCountsParams),
    responses(
        (status = 200, description = "项目统计", body = StatusReply<ProjectCountsInfo>)
    ),
)]
pub async fn project_counts(
    State(state): State<AppState>,
    Query(params): Query<ProjectCountsParams>,
) -> Result<Json<StatusReply<ProjectCountsInfo>>, AppError> {
    let counts = state.project_service.project_counts(params.url_backlog_id).await?;
    Ok(Json(StatusReply::ok(counts)))
}

/// 修改项目状态
///
/// 修改成功后会记录操作日志，并返回最新的待审核数量。
/// 新状态为 `Rejected` 时 `action` 为 `rejected`，前端需要把该行从当前列表中移除。
#[utoipa::path(post,
    path = "/projects/status",
    tag = "projects",
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "修改成功", body = StatusUpdateReply),
        (status = 400, description = "状态码不合法"),
        (status = 404, description = "项目不存在"),
    ),
)]
pub async fn update_status(
    State(state): State<AppState>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<StatusUpdateReply>, AppError> {
    debug!("📝 修改项目状态 {:#?}", request);
    request.validate()?;

    let status = ProjectStatus::from_code(request.status)
        .ok_or_else(|| AppError::bad_request(format!("unknown status {}", request.status)))?;

    let change = state.project_service.change_status(request.id, status).await?;

    Ok(Json(StatusUpdateReply {
        status: STATUS_OK,
        message: "Status Change Successfully".to_string(),
        pending_count: change.pending_count,
        project_id: change.project_id,
        project_status: change.status.code(),
        action: change.action,
    }))
}

/// 审核通过项目
///
/// 必须同时提供投票截止时间 `approveVoteDeadline`，缺失或格式错误时返回400且不会修改任何数据。
#[utoipa::path(post,
    path = "/projects/approve",
    tag = "projects",
    request_body = ApproveRequest,
    responses(
        (status = 200, description = "审核通过", body = MessageReply),
        (status = 400, description = "缺少或无法解析投票截止时间"),
        (status = 404, description = "项目不存在"),
    ),
)]
pub async fn approve_project(
    State(state): State<AppState>,
    Json(request): Json<ApproveRequest>,
) -> Result<Json<MessageReply>, AppError> {
    debug!("📝 审核通过项目 {:#?}", request);
    request.validate()?;

    let deadline = request
        .approve_vote_deadline
        .as_deref()
        .and_then(parse_vote_deadline)
        .ok_or_else(|| AppError::bad_request("invalid approveVoteDeadline"))?;

    state.project_service.approve_project(request.project_id, deadline).await?;

    Ok(Json(MessageReply::ok("Project Approved Successfully")))
}

/// 查询指定项目信息
///
/// 返回项目本身、投票统计以及所属 backlog 和提交人信息。
#[utoipa::path(get,
    path = "/projects/{id}",
    tag = "projects",
    params(("id" = i64, Path, description = "项目 ID")),
    responses(
        (status = 200, description = "项目详情", body = StatusReply<ProjectDetail>),
        (status = 404, description = "项目不存在"),
    ),
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> Result<Json<StatusReply<ProjectDetail>>, AppError> {
    debug!("🔍 查询项目 {project_id}");

    let project = state.project_service.get_project(project_id).await?;
    Ok(Json(StatusReply::ok(project)))
}

/// 项目投票人列表
///
/// 匿名投票不会返回投票人信息。
#[utoipa::path(get,
    path = "/projects/{project_id}/voters",
    tag = "projects",
    params(("project_id" = i64, Path, description = "项目 ID"), VoterListParams),
    responses(
        (status = 200, description = "投票记录", body = RecordsReply<Vec<VoterInfo>>)
    ),
)]
pub async fn list_voters(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
    Query(params): Query<VoterListParams>,
) -> Result<Json<RecordsReply<Vec<VoterInfo>>>, AppError> {
    let voters = state
        .project_service
        .list_voters(project_id, params.vote_type.map(Into::into))
        .await?;
    Ok(Json(RecordsReply::ok(voters)))
}

/// 存活检查
#[utoipa::path(get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "服务正常", body = MessageReply)
    ),
)]
pub async fn health() -> Json<MessageReply> {
    Json(MessageReply::ok("ok"))
}
