use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{models::student::StudentPage, pagination::Paginator, AppState};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

pub async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Json<StudentPage> {
    let per_page = state.config.records_per_page;
    let (total, _) = state.registry.students(0, 0).await;
    let pager = Paginator::new(total, per_page, state.config.max_visible_pages)
        .at_query(query.page.as_deref());

    let (total, students) = state.registry.students(pager.offset(), per_page).await;
    Json(StudentPage {
        total,
        page: pager.current_page(),
        per_page,
        students,
    })
}
