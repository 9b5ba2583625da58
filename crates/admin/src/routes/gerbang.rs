//! Gate master data route handlers.
//!
//! Every mutation is "command then full reload": the handler sends one
//! backend call and redirects to the list, which fetches the collection
//! again. Validation failures never reach the backend.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use lalin_core::listing::{filter_items, paginate};
use lalin_core::{BranchId, GateDraft, GateId, GateKey, GateRecord};

use crate::components::data_table::{DataTableConfig, PaginationView, gerbang_table_config};
use crate::{filters, middleware::RequireSession, state::AppState};

use super::{LayoutView, ListQuery, Notice, NoticeQuery, redirect_with, render};

pub const MSG_CREATED: &str = "Gerbang created successfully!";
pub const MSG_UPDATED: &str = "Gerbang updated successfully!";
pub const MSG_DELETED: &str = "Gerbang deleted successfully!";
pub const MSG_INVALID_DELETE: &str = "Invalid Gerbang ID for deletion.";
pub const MSG_INVALID_ID: &str = "Invalid Gerbang ID.";

const LIST_PATH: &str = "/gerbang";

/// Gate row view for the list.
#[derive(Debug, Clone)]
pub struct GateRowView {
    pub id: String,
    pub gate_name: String,
    pub branch_name: String,
    pub edit_href: String,
    pub delete_href: String,
}

impl From<&GateRecord> for GateRowView {
    fn from(gate: &GateRecord) -> Self {
        Self {
            id: gate.id.to_string(),
            gate_name: gate.gate_name.clone(),
            branch_name: gate.branch_name.clone(),
            edit_href: format!("/gerbang/{}/edit", gate.id),
            delete_href: format!(
                "/gerbang/{}/delete?IdCabang={}&NamaGerbang={}",
                gate.id,
                gate.branch_id,
                urlencoding::encode(&gate.gate_name)
            ),
        }
    }
}

/// Gate list template.
#[derive(Template)]
#[template(path = "gerbang/index.html")]
pub struct GerbangIndexTemplate {
    pub layout: LayoutView,
    pub notices: Vec<Notice>,
    pub table: DataTableConfig,
    pub search: String,
    pub rows: Vec<GateRowView>,
    pub pagination: PaginationView,
}

/// Create/edit form template.
#[derive(Template)]
#[template(path = "gerbang/form.html")]
pub struct GerbangFormTemplate {
    pub layout: LayoutView,
    pub notices: Vec<Notice>,
    pub heading: &'static str,
    pub action: String,
    pub draft: GateDraft,
    /// The id cannot change on update.
    pub id_locked: bool,
}

/// Delete confirmation template.
#[derive(Template)]
#[template(path = "gerbang/delete.html")]
pub struct GerbangDeleteTemplate {
    pub layout: LayoutView,
    pub notices: Vec<Notice>,
    pub id: String,
    pub branch_id: String,
    pub gate_name: String,
}

/// Query of the delete confirmation, filled in by the list's delete link.
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(rename = "IdCabang")]
    pub branch_id: Option<String>,
    #[serde(rename = "NamaGerbang")]
    pub gate_name: Option<String>,
}

/// Body of the confirmed delete.
#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(rename = "IdCabang")]
    pub branch_id: Option<String>,
}

/// Build the gate router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/gerbang", get(index).post(create))
        .route("/gerbang/new", get(new_form))
        .route("/gerbang/{id}", post(update))
        .route("/gerbang/{id}/edit", get(edit_form))
        .route("/gerbang/{id}/delete", get(delete_page).post(delete))
}

// =============================================================================
// List
// =============================================================================

/// Gate list with search and paging.
///
/// GET /gerbang?q=&page=
#[instrument(skip_all)]
async fn index(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    Query(query): Query<ListQuery>,
    Query(notice_query): Query<NoticeQuery>,
) -> Response {
    let mut notices = notice_query.into_notices();

    let gates = state
        .api_for(&session)
        .list_gates()
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load gates");
            notices.push(Notice::error(e.user_message()));
            Vec::new()
        });

    let search = query.search();
    let page = paginate(filter_items(&gates, &search), query.page());
    let pagination = PaginationView::new(&page, LIST_PATH, &[("q", &search)]);

    render(&GerbangIndexTemplate {
        layout: LayoutView::new(&session.username, "Gerbang Master", LIST_PATH),
        notices,
        table: gerbang_table_config(),
        search,
        rows: page.items.iter().map(GateRowView::from).collect(),
        pagination,
    })
    .into_response()
}

// =============================================================================
// Create / Update
// =============================================================================

/// Empty create form.
///
/// GET /gerbang/new
async fn new_form(RequireSession(session): RequireSession) -> Response {
    render(&create_form(&session.username, GateDraft::default(), vec![])).into_response()
}

/// Create a gate.
///
/// POST /gerbang
#[instrument(skip_all)]
async fn create(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    Form(draft): Form<GateDraft>,
) -> Response {
    let record = match draft.validate() {
        Ok(record) => record,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected gate draft");
            let form = create_form(&session.username, draft, vec![Notice::error(e.to_string())]);
            return (StatusCode::UNPROCESSABLE_ENTITY, render(&form)).into_response();
        }
    };

    match state.api_for(&session).create_gate(&record).await {
        Ok(()) => redirect_with(LIST_PATH, &Notice::success(MSG_CREATED)).into_response(),
        Err(e) => {
            let form = create_form(&session.username, draft, vec![Notice::error(e.user_message())]);
            (StatusCode::BAD_GATEWAY, render(&form)).into_response()
        }
    }
}

/// Edit form prefilled from the backend.
///
/// GET /gerbang/{id}/edit
#[instrument(skip_all, fields(id = %raw_id))]
async fn edit_form(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    Path(raw_id): Path<String>,
) -> Response {
    let Ok(id) = raw_id.parse::<GateId>() else {
        return redirect_with(LIST_PATH, &Notice::error(MSG_INVALID_ID)).into_response();
    };

    match state.api_for(&session).list_gates().await {
        Ok(gates) => match gates.iter().find(|g| g.id == id) {
            Some(gate) => render(&edit_form_template(
                &session.username,
                id,
                GateDraft::from_record(gate),
                vec![],
            ))
            .into_response(),
            None => redirect_with(
                LIST_PATH,
                &Notice::error(format!("Gerbang {id} tidak ditemukan")),
            )
            .into_response(),
        },
        Err(e) => redirect_with(LIST_PATH, &Notice::error(e.user_message())).into_response(),
    }
}

/// Update a gate. The id in the URL wins over the form.
///
/// POST /gerbang/{id}
#[instrument(skip_all, fields(id = %raw_id))]
async fn update(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    Path(raw_id): Path<String>,
    Form(draft): Form<GateDraft>,
) -> Response {
    let Ok(id) = raw_id.parse::<GateId>() else {
        return redirect_with(LIST_PATH, &Notice::error(MSG_INVALID_ID)).into_response();
    };

    let record = match draft.validate_update(id) {
        Ok(record) => record,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected gate draft");
            let form =
                edit_form_template(&session.username, id, draft, vec![Notice::error(e.to_string())]);
            return (StatusCode::UNPROCESSABLE_ENTITY, render(&form)).into_response();
        }
    };

    match state.api_for(&session).update_gate(&record).await {
        Ok(()) => redirect_with(LIST_PATH, &Notice::success(MSG_UPDATED)).into_response(),
        Err(e) => {
            let form = edit_form_template(
                &session.username,
                id,
                draft,
                vec![Notice::error(e.user_message())],
            );
            (StatusCode::BAD_GATEWAY, render(&form)).into_response()
        }
    }
}

fn create_form(username: &str, draft: GateDraft, notices: Vec<Notice>) -> GerbangFormTemplate {
    GerbangFormTemplate {
        layout: LayoutView::new(username, "Gerbang Master", LIST_PATH),
        notices,
        heading: "Tambah Gerbang",
        action: LIST_PATH.to_string(),
        draft,
        id_locked: false,
    }
}

fn edit_form_template(
    username: &str,
    id: GateId,
    mut draft: GateDraft,
    notices: Vec<Notice>,
) -> GerbangFormTemplate {
    draft.id = id.to_string();
    GerbangFormTemplate {
        layout: LayoutView::new(username, "Gerbang Master", LIST_PATH),
        notices,
        heading: "Edit Gerbang",
        action: format!("/gerbang/{id}"),
        draft,
        id_locked: true,
    }
}

// =============================================================================
// Delete
// =============================================================================

/// Confirmation page. Cancelling is a plain link back and calls nothing.
///
/// GET /gerbang/{id}/delete?IdCabang=&NamaGerbang=
async fn delete_page(
    RequireSession(session): RequireSession,
    Path(raw_id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Response {
    let Some(key) = parse_key(&raw_id, query.branch_id.as_deref()) else {
        return redirect_with(LIST_PATH, &Notice::error(MSG_INVALID_DELETE)).into_response();
    };

    render(&GerbangDeleteTemplate {
        layout: LayoutView::new(&session.username, "Gerbang Master", LIST_PATH),
        notices: vec![],
        id: key.id.to_string(),
        branch_id: key.branch_id.to_string(),
        gate_name: query.gate_name.unwrap_or_default(),
    })
    .into_response()
}

/// Delete a gate after confirmation.
///
/// POST /gerbang/{id}/delete
#[instrument(skip_all, fields(id = %raw_id))]
async fn delete(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    Path(raw_id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Redirect {
    let Some(key) = parse_key(&raw_id, form.branch_id.as_deref()) else {
        return redirect_with(LIST_PATH, &Notice::error(MSG_INVALID_DELETE));
    };

    match state.api_for(&session).delete_gate(key).await {
        Ok(()) => redirect_with(LIST_PATH, &Notice::success(MSG_DELETED)),
        Err(e) => redirect_with(
            LIST_PATH,
            &Notice::error(format!("Delete failed: {}", e.user_message())),
        ),
    }
}

fn parse_key(raw_id: &str, raw_branch: Option<&str>) -> Option<GateKey> {
    let id = raw_id.parse::<GateId>().ok()?;
    let branch_id = raw_branch?.parse::<BranchId>().ok()?;
    Some(GateKey { id, branch_id })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key() {
        assert_eq!(
            parse_key("5", Some("2")),
            Some(GateKey {
                id: GateId::new(5),
                branch_id: BranchId::new(2),
            })
        );
        assert_eq!(parse_key("", Some("2")), None);
        assert_eq!(parse_key("abc", Some("2")), None);
        assert_eq!(parse_key("5", None), None);
        assert_eq!(parse_key("5", Some("x")), None);
    }

    #[test]
    fn test_row_links() {
        let row = GateRowView::from(&GateRecord {
            id: GateId::new(5),
            branch_id: BranchId::new(2),
            gate_name: "Kayu Agung".to_string(),
            branch_name: "Kapal Betung".to_string(),
        });
        assert_eq!(row.edit_href, "/gerbang/5/edit");
        assert_eq!(
            row.delete_href,
            "/gerbang/5/delete?IdCabang=2&NamaGerbang=Kayu%20Agung"
        );
    }

    #[test]
    fn test_edit_form_pins_id() {
        let draft = GateDraft {
            id: "99".to_string(),
            branch_id: "2".to_string(),
            gate_name: "A".to_string(),
            branch_name: "B".to_string(),
        };
        let form = edit_form_template("admin", GateId::new(5), draft, vec![]);
        assert_eq!(form.draft.id, "5");
        assert_eq!(form.action, "/gerbang/5");
        assert!(form.id_locked);

        let html = form.render().unwrap_or_default();
        assert!(html.contains("Edit Gerbang"));
        assert!(html.contains("readonly"));
    }
}
