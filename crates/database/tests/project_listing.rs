//! 项目列表查询的数据库集成测试
//!
//! 需要通过 `DATABASE_URL` 提供一个可用的 PostgreSQL，运行方式：
//!
//! ```text
//! DATABASE_URL=postgres://... cargo test -p database -- --ignored
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use database::{
    AuditLogEntry, AuditLogRepository, AuditLogRepositoryTrait, DatabaseError, ProjectListQuery, ProjectPage,
    ProjectRepository, ProjectRepositoryTrait, ProjectSort, ProjectStatus, SortColumn, SortDirection, VoteMode, VoteType,
};
use shared_lib::{EntityType, LogAction};
use sqlx::PgPool;

async fn insert_user(pool: &PgPool, first: Option<&str>, last: Option<&str>) -> i64 {
    sqlx::query_scalar("INSERT INTO users (first_name, last_name) VALUES ($1, $2) RETURNING id")
        .bind(first)
        .bind(last)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn insert_backlog(pool: &PgPool, title: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO backlogs (title) VALUES ($1) RETURNING id")
        .bind(title)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn insert_project(
    pool: &PgPool,
    title: &str,
    backlog_id: Option<i64>,
    user_id: Option<i64>,
    status: ProjectStatus,
    created_at: NaiveDateTime,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO backlog_projects (title, backlog_id, user_id, git_url, status, created_at)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(title)
    .bind(backlog_id)
    .bind(user_id)
    .bind(format!("https://git.example.com/{}", title.to_lowercase()))
    .bind(status.code())
    .bind(created_at)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn insert_vote(pool: &PgPool, project_id: i64, user_id: Option<i64>, vote_type: VoteType, mode: VoteMode) {
    sqlx::query("INSERT INTO votes (project_id, user_id, vote_type, vote_mode) VALUES ($1, $2, $3, $4)")
        .bind(project_id)
        .bind(user_id)
        .bind(vote_type.as_str())
        .bind(mode.as_str())
        .execute(pool)
        .await
        .unwrap();
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn noon(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(12, 0, 0).unwrap()
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_tallies_are_aggregated_without_duplicating_rows(pool: PgPool) {
    let repo = ProjectRepository::new(pool.clone());
    let jane = insert_user(&pool, Some("Jane"), Some("Doe")).await;
    let backlog = insert_backlog(&pool, "Q3").await;
    let alpha = insert_project(&pool, "Alpha", Some(backlog), Some(jane), ProjectStatus::Pending, noon(day(2025, 5, 1))).await;
    for _ in 0..3 {
        insert_vote(&pool, alpha, Some(jane), VoteType::Up, VoteMode::Normal).await;
    }
    insert_vote(&pool, alpha, None, VoteType::Down, VoteMode::Anonymous).await;

    let page = repo.find_projects(&ProjectListQuery::default()).await.unwrap();

    assert_eq!(page.projects.len(), 1);
    assert_eq!(page.records_total, 1);
    assert_eq!(page.records_filtered, 1);
    let row = &page.projects[0];
    assert_eq!(row.total_votes, 4);
    assert_eq!(row.upvotes, 3);
    assert_eq!(row.downvotes, 1);
    assert_eq!(row.upvotes + row.downvotes, row.total_votes);
    assert_eq!(row.first_name.as_deref(), Some("Jane"));
    assert_eq!(row.backlog_ref_id, Some(backlog));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_rejected_partition(pool: PgPool) {
    let repo = ProjectRepository::new(pool.clone());
    let created = noon(day(2025, 5, 1));
    for (i, status) in ProjectStatus::ALL.iter().enumerate() {
        insert_project(&pool, &format!("P{i}"), None, None, *status, created).await;
    }

    let active = repo.find_projects(&ProjectListQuery::default()).await.unwrap();
    let rejected = repo
        .find_projects(&ProjectListQuery {
            include_rejected: true,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(active.projects.len(), 3);
    assert!(active.projects.iter().all(|p| p.status != ProjectStatus::Rejected.code()));
    assert_eq!(rejected.projects.len(), 1);
    assert!(rejected.projects.iter().all(|p| p.status == ProjectStatus::Rejected.code()));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_search_by_title_and_last_name(pool: PgPool) {
    let repo = ProjectRepository::new(pool.clone());
    let jane = insert_user(&pool, Some("Jane"), Some("Doe")).await;
    let john = insert_user(&pool, Some("John"), Some("Smith")).await;
    let created = noon(day(2025, 5, 1));
    let alpha = insert_project(&pool, "Alpha", None, Some(jane), ProjectStatus::Pending, created).await;
    let beta = insert_project(&pool, "Beta", None, Some(jane), ProjectStatus::Approved, created).await;
    insert_project(&pool, "Gamma", None, Some(john), ProjectStatus::Pending, created).await;

    let by_title = repo
        .find_projects(&ProjectListQuery {
            search_text: Some("alpha".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_title.projects.iter().map(|p| p.id).collect::<Vec<_>>(), vec![alpha]);
    assert_eq!(by_title.records_total, 3);
    assert_eq!(by_title.records_filtered, 1);

    let by_last_name = repo
        .find_projects(&ProjectListQuery {
            search_text: Some("oe".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let mut ids: Vec<i64> = by_last_name.projects.iter().map(|p| p.id).collect();
    ids.sort();
    assert_eq!(ids, vec![alpha, beta]);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_date_range_is_inclusive_by_day(pool: PgPool) {
    let repo = ProjectRepository::new(pool.clone());
    let created = day(2025, 5, 1).and_hms_opt(23, 59, 59).unwrap();
    let id = insert_project(&pool, "Late", None, None, ProjectStatus::Pending, created).await;

    let same_day = repo
        .find_projects(&ProjectListQuery {
            created_from: Some(day(2025, 5, 1)),
            created_to: Some(day(2025, 5, 1)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(same_day.projects.iter().map(|p| p.id).collect::<Vec<_>>(), vec![id]);

    let next_day = repo
        .find_projects(&ProjectListQuery {
            created_from: Some(day(2025, 5, 2)),
            created_to: Some(day(2025, 5, 2)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(next_day.projects.is_empty());
    assert_eq!(next_day.records_filtered, 0);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_pagination_counts(pool: PgPool) {
    let repo = ProjectRepository::new(pool.clone());
    let created = noon(day(2025, 5, 1));
    for i in 0..25 {
        insert_project(&pool, &format!("Project {i:02}"), None, None, ProjectStatus::Pending, created).await;
    }

    let first = repo
        .find_projects(&ProjectListQuery {
            limit: Some(10),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(first.projects.len(), 10);
    assert_eq!(first.records_filtered, 25);
    // 票数相同时按 id 升序
    assert!(first.projects.windows(2).all(|w| w[0].id < w[1].id));

    let beyond = repo
        .find_projects(&ProjectListQuery {
            limit: Some(10),
            offset: 30,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(beyond.projects.is_empty());
    assert_eq!(beyond.records_filtered, 25);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_status_update_moves_project_between_partitions(pool: PgPool) {
    let repo = ProjectRepository::new(pool.clone());
    let id = insert_project(&pool, "Alpha", None, None, ProjectStatus::Pending, noon(day(2025, 5, 1))).await;

    repo.update_status(id, ProjectStatus::Rejected).await.unwrap();

    let rejected = repo
        .find_projects(&ProjectListQuery {
            include_rejected: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(rejected.projects.len(), 1);
    let active = repo.find_projects(&ProjectListQuery::default()).await.unwrap();
    assert!(active.projects.is_empty());

    let counts = repo.count_projects(None).await.unwrap();
    assert_eq!(counts.rejected_project, 1);
    assert_eq!(counts.pending_project, 0);

    assert!(repo.update_status(id + 1000, ProjectStatus::Approved).await.is_err());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_anonymous_voters_have_no_identity(pool: PgPool) {
    let repo = ProjectRepository::new(pool.clone());
    let jane = insert_user(&pool, Some("Jane"), Some("Doe")).await;
    let id = insert_project(&pool, "Alpha", None, None, ProjectStatus::Approved, noon(day(2025, 5, 1))).await;
    insert_vote(&pool, id, Some(jane), VoteType::Up, VoteMode::Normal).await;
    insert_vote(&pool, id, Some(jane), VoteType::Down, VoteMode::Anonymous).await;

    let voters = repo.find_voters(id, None).await.unwrap();
    assert_eq!(voters.len(), 2);
    for voter in &voters {
        if voter.vote_mode == VoteMode::Anonymous.as_str() {
            assert!(voter.user_id.is_none());
            assert!(voter.user_name.is_none());
            assert!(voter.last_name.is_none());
        } else {
            assert_eq!(voter.user_name.as_deref(), Some("Jane"));
        }
    }

    let downs = repo.find_voters(id, Some(VoteType::Down)).await.unwrap();
    assert_eq!(downs.len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_audit_log_is_written(pool: PgPool) {
    let audit = AuditLogRepository::new(pool.clone());

    audit
        .log(AuditLogEntry::new(LogAction::Approved, EntityType::Project, 42, "Project id '42' was approved by admin."))
        .await
        .unwrap();

    let (action, entity_type): (String, String) =
        sqlx::query_as("SELECT action, entity_type FROM activity_logs WHERE entity_id = 42")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(action, "approved");
    assert_eq!(entity_type, "project");
}

fn ids(page: &ProjectPage) -> Vec<i64> {
    page.projects.iter().map(|p| p.id).collect()
}

fn sorted_by(column: SortColumn, direction: SortDirection) -> ProjectListQuery {
    ProjectListQuery {
        sort: Some(ProjectSort { column, direction }),
        ..Default::default()
    }
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_zero_length_page_still_counts_filtered(pool: PgPool) {
    let repo = ProjectRepository::new(pool.clone());
    let created = noon(day(2025, 5, 1));
    for i in 0..3 {
        insert_project(&pool, &format!("P{i}"), None, None, ProjectStatus::Pending, created).await;
    }

    let page = repo
        .find_projects(&ProjectListQuery {
            limit: Some(0),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(page.projects.is_empty());
    assert_eq!(page.records_total, 3);
    assert_eq!(page.records_filtered, 3);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_default_order_is_total_votes_desc(pool: PgPool) {
    let repo = ProjectRepository::new(pool.clone());
    let created = noon(day(2025, 5, 1));
    let quiet = insert_project(&pool, "Quiet", None, None, ProjectStatus::Pending, created).await;
    let popular = insert_project(&pool, "Popular", None, None, ProjectStatus::Pending, created).await;
    insert_vote(&pool, quiet, None, VoteType::Up, VoteMode::Normal).await;
    for _ in 0..3 {
        insert_vote(&pool, popular, None, VoteType::Down, VoteMode::Normal).await;
    }

    let page = repo.find_projects(&ProjectListQuery::default()).await.unwrap();

    assert_eq!(ids(&page), vec![popular, quiet]);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_caller_supplied_sort(pool: PgPool) {
    let repo = ProjectRepository::new(pool.clone());
    let zed = insert_user(&pool, Some("Zed"), Some("Adams")).await;
    let amy = insert_user(&pool, Some("Amy"), Some("Young")).await;
    let created = noon(day(2025, 5, 1));
    let alpha = insert_project(&pool, "Alpha", None, Some(zed), ProjectStatus::Pending, created).await;
    let beta = insert_project(&pool, "Beta", None, Some(amy), ProjectStatus::Pending, created).await;
    insert_vote(&pool, alpha, None, VoteType::Up, VoteMode::Normal).await;
    insert_vote(&pool, alpha, None, VoteType::Up, VoteMode::Normal).await;
    insert_vote(&pool, beta, None, VoteType::Up, VoteMode::Normal).await;

    let by_title_desc = repo
        .find_projects(&sorted_by(SortColumn::ProjectTitle, SortDirection::Desc))
        .await
        .unwrap();
    assert_eq!(ids(&by_title_desc), vec![beta, alpha]);

    let by_uploader = repo
        .find_projects(&sorted_by(SortColumn::UploadedBy, SortDirection::Asc))
        .await
        .unwrap();
    assert_eq!(ids(&by_uploader), vec![beta, alpha]);

    let by_upvotes = repo
        .find_projects(&sorted_by(SortColumn::Upvotes, SortDirection::Asc))
        .await
        .unwrap();
    assert_eq!(ids(&by_upvotes), vec![beta, alpha]);

    let by_id_desc = repo
        .find_projects(&sorted_by(SortColumn::ProjectId, SortDirection::Desc))
        .await
        .unwrap();
    assert_eq!(ids(&by_id_desc), vec![beta, alpha]);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_backlog_and_status_filters(pool: PgPool) {
    let repo = ProjectRepository::new(pool.clone());
    let q3 = insert_backlog(&pool, "Q3").await;
    let q4 = insert_backlog(&pool, "Q4").await;
    let created = noon(day(2025, 5, 1));
    let pending = insert_project(&pool, "Pending", Some(q3), None, ProjectStatus::Pending, created).await;
    let approved = insert_project(&pool, "Approved", Some(q3), None, ProjectStatus::Approved, created).await;
    insert_project(&pool, "Other", Some(q4), None, ProjectStatus::Pending, created).await;

    let in_q3 = repo
        .find_projects(&ProjectListQuery {
            backlog_id: Some(q3),
            ..sorted_by(SortColumn::ProjectId, SortDirection::Asc)
        })
        .await
        .unwrap();
    assert_eq!(ids(&in_q3), vec![pending, approved]);
    assert_eq!(in_q3.records_total, 2);

    let approved_in_q3 = repo
        .find_projects(&ProjectListQuery {
            backlog_id: Some(q3),
            status_filter: Some(ProjectStatus::Approved),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(ids(&approved_in_q3), vec![approved]);
    assert_eq!(approved_in_q3.records_total, 2);
    assert_eq!(approved_in_q3.records_filtered, 1);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_get_project_by_id(pool: PgPool) {
    let repo = ProjectRepository::new(pool.clone());
    let jane = insert_user(&pool, Some("Jane"), Some("Doe")).await;
    let backlog = insert_backlog(&pool, "Q3").await;
    let id = insert_project(&pool, "Alpha", Some(backlog), Some(jane), ProjectStatus::Pending, noon(day(2025, 5, 1))).await;
    insert_vote(&pool, id, Some(jane), VoteType::Up, VoteMode::Normal).await;
    insert_vote(&pool, id, None, VoteType::Down, VoteMode::Anonymous).await;

    let project = repo.get_project_by_id(id).await.unwrap();

    assert_eq!(project.title, "Alpha");
    assert_eq!(project.backlog_title.as_deref(), Some("Q3"));
    assert_eq!(project.last_name.as_deref(), Some("Doe"));
    assert_eq!(project.total_votes, 2);
    assert_eq!(project.upvotes, 1);
    assert_eq!(project.downvotes, 1);

    let missing = repo.get_project_by_id(id + 1000).await;
    assert!(matches!(missing, Err(DatabaseError::NotFound(_))));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_approve_project_persists_deadline(pool: PgPool) {
    let repo = ProjectRepository::new(pool.clone());
    let id = insert_project(&pool, "Alpha", None, None, ProjectStatus::Pending, noon(day(2025, 5, 1))).await;
    let deadline = day(2025, 6, 1).and_hms_opt(18, 0, 0).unwrap();

    repo.approve_project(id, deadline).await.unwrap();

    let project = repo.get_project_by_id(id).await.unwrap();
    assert_eq!(project.project_status(), Some(ProjectStatus::Approved));
    assert_eq!(project.vote_deadline, Some(deadline));

    let missing = repo.approve_project(id + 1000, deadline).await;
    assert!(matches!(missing, Err(DatabaseError::NotFound(_))));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_count_projects_by_backlog(pool: PgPool) {
    let repo = ProjectRepository::new(pool.clone());
    let q3 = insert_backlog(&pool, "Q3").await;
    let q4 = insert_backlog(&pool, "Q4").await;
    let created = noon(day(2025, 5, 1));
    insert_project(&pool, "A", Some(q3), None, ProjectStatus::Pending, created).await;
    insert_project(&pool, "B", Some(q3), None, ProjectStatus::Approved, created).await;
    insert_project(&pool, "C", Some(q4), None, ProjectStatus::Rejected, created).await;

    let q3_counts = repo.count_projects(Some(q3)).await.unwrap();
    assert_eq!(q3_counts.total_project, 2);
    assert_eq!(q3_counts.pending_project, 1);
    assert_eq!(q3_counts.approved_project, 1);
    assert_eq!(q3_counts.rejected_project, 0);

    let all = repo.count_projects(None).await.unwrap();
    assert_eq!(all.total_project, 3);
    assert_eq!(all.rejected_project, 1);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_unknown_status_code_is_listed_with_active_projects(pool: PgPool) {
    let repo = ProjectRepository::new(pool.clone());
    let id: i64 = sqlx::query_scalar("INSERT INTO backlog_projects (title, status) VALUES ('Legacy', 9) RETURNING id")
        .fetch_one(&pool)
        .await
        .unwrap();

    let active = repo.find_projects(&ProjectListQuery::default()).await.unwrap();
    assert_eq!(ids(&active), vec![id]);
    assert_eq!(active.projects[0].project_status(), None);

    let rejected = repo
        .find_projects(&ProjectListQuery {
            include_rejected: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(rejected.projects.is_empty());
}
