use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::config;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{Board, BoardFilter, DocumentFilter};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub board: Option<String>,
    pub class: Option<String>,
    pub subject: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct BoardListQuery {
    pub class: Option<String>,
    pub subject: Option<String>,
    pub group: Option<String>,
    pub limit: Option<i64>,
}

/// GET /admin/documents - Metadata records matching all provided filters
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = DocumentFilter {
        board: query.board,
        class: query.class,
        subject: query.subject,
        limit: effective_limit(query.limit),
    };

    let docs = state.documents.list_documents(filter).await?;
    Ok(Json(docs))
}

/// GET /admin/stateboard/documents - Full records for the stateboard index
pub async fn stateboard_list(
    State(state): State<AppState>,
    Query(query): Query<BoardListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    board_list(state, Board::Stateboard, query).await
}

/// GET /admin/cbse/documents - Full records for the cbse index
pub async fn cbse_list(
    State(state): State<AppState>,
    Query(query): Query<BoardListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    board_list(state, Board::Cbse, query).await
}

async fn board_list(
    state: AppState,
    board: Board,
    query: BoardListQuery,
) -> Result<Json<Vec<crate::store::DocumentRecord>>, ApiError> {
    let filter = BoardFilter {
        class: query.class,
        subject: query.subject,
        group: query.group,
        limit: effective_limit(query.limit),
    };

    let docs = state.documents.list_board_documents(board, filter).await?;
    Ok(Json(docs))
}

fn effective_limit(requested: Option<i64>) -> i64 {
    requested
        .filter(|l| *l > 0)
        .unwrap_or(config::config().storage.default_list_limit)
}
