//! 路由入口
//!
//! 提供 [`create_app_router`] 函数，导出当前App的所有路由。
//!
//! 导出路由时传入共享数据 shared_state，这样所有路由函数都可以访问。

use crate::routes::projects::__path_approve_project;
use crate::routes::projects::__path_get_project;
use crate::routes::projects::__path_health;
use crate::routes::projects::__path_list_projects;
use crate::routes::projects::__path_list_voters;
use crate::routes::projects::__path_project_counts;
use crate::routes::projects::__path_update_status;
use crate::routes::projects::{
    approve_project, get_project, health, list_projects, list_voters, project_counts, update_status,
};
use crate::AppState;
use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_scalar::{Scalar, Servable};

pub mod projects;

/// 导出当前App的所有路由
///
/// ## **❗️注意事项：**
///
/// 由于 [`routes!`] 宏限制，在同一个宏里面不能同时定义多个相同类型的http接口，
/// 例如 `routes!(get, get, post)` 会导致Panic，需要拆开成多个 `.routes(...)` 调用。
///
/// `/projects/counts`、`/projects/status`、`/projects/approve` 是静态路径，
/// 优先于 `/projects/{id}` 匹配。
fn routers(state: AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_projects))
        .routes(routes!(project_counts))
        .routes(routes!(update_status))
        .routes(routes!(approve_project))
        .routes(routes!(get_project))
        .routes(routes!(list_voters))
        .routes(routes!(health))
        .with_state(state)
}

/// 创建当前App的路由
///
/// 完成以下功能：
/// - 生成OpenAPI文档
/// - 生成App路由
/// - 使用Scalar作为最终在线文档格式
///
/// 由于使用了 `utoipa` 库来自动化生成`openapi`文档，因此我们没有使用原生的 [`Router`]，而是使用了
/// [`OpenApiRouter`] 。
pub fn create_app_router(shared_state: AppState) -> Router {
    #[derive(OpenApi)]
    #[openapi(
        tags(
            (name = "projects", description = r#"
Backlog 项目管理后台接口：

- 项目列表（过滤、搜索、排序、分页）
- 项目统计
- 审核通过 / 拒绝 / 修改状态
- 项目详情与投票人列表
            "#),
            (name = "health", description = "存活检查"),
        ),
    )]
    struct ApiDoc;

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api/v1", routers(shared_state))
        .split_for_parts();

    // 合并文档路由，用户可通过 /docs 访问文档网页地址
    router.merge(Scalar::with_url("/docs", api))
}
