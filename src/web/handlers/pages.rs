// Page handlers for HTML rendering with Askama

use askama::Template;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use axum_htmx::HxRequest;
use serde::Deserialize;

use crate::api_server::{AppError, AppState};
use crate::service::{DetailSource, PlantDetails};
use crate::store::{PlantTable, NAME_COLUMN};
use crate::web::markdown::{markdown_to_html, records_to_markdown};

fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("Template error: {}", e)))
}

// ============================================================================
// Home Page
// ============================================================================

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub title: String,
}

pub async fn home_page() -> Result<Html<String>, AppError> {
    render(&HomeTemplate {
        title: "Welcome to the Plant Information App".to_string(),
    })
}

// ============================================================================
// Plant Details Page
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    pub name: Option<String>,
}

/// What the result panel shows after a lookup.
pub struct PlantResultView {
    pub cached: bool,
    pub display_name: String,
    pub found: bool,
    pub details_html: String,
}

impl From<PlantDetails> for PlantResultView {
    fn from(details: PlantDetails) -> Self {
        Self {
            cached: details.source == DetailSource::Cached,
            display_name: capitalize(&details.name),
            found: !details.records.is_empty(),
            details_html: markdown_to_html(&records_to_markdown(&details.records)),
        }
    }
}

#[derive(Template)]
#[template(path = "pages/plant_details.html")]
pub struct PlantDetailsTemplate {
    pub title: String,
    pub query: String,
    pub result: Option<PlantResultView>,
}

/// Fragment swapped in by htmx.
#[derive(Template)]
#[template(path = "partials/plant_result.html")]
pub struct PlantResultTemplate {
    pub result: PlantResultView,
}

pub async fn plant_details_page(
    State(state): State<AppState>,
    HxRequest(is_htmx): HxRequest,
    Query(params): Query<DetailsQuery>,
) -> Result<Response, AppError> {
    let query = params.name.unwrap_or_default();

    let result = if query.trim().is_empty() {
        None
    } else {
        match state.service.details(&query).await {
            Ok(details) => {
                tracing::debug!(plant = %details.name, source = ?details.source, "plant details served");
                Some(PlantResultView::from(details))
            }
            // htmx swaps the fragment into the result panel
            Err(e) if is_htmx => return Ok(AppError::from(e).into_fragment()),
            Err(e) => return Err(e.into()),
        }
    };

    if is_htmx {
        return match result {
            Some(result) => Ok(render(&PlantResultTemplate { result })?.into_response()),
            None => Ok(Html(String::new()).into_response()),
        };
    }

    Ok(render(&PlantDetailsTemplate {
        title: "Plant Details".to_string(),
        query: query.trim().to_string(),
        result,
    })?
    .into_response())
}

// ============================================================================
// Plant Database Page
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DatabaseQuery {
    #[serde(default)]
    pub show: bool,
}

pub struct DatabaseRow {
    pub href: String,
    pub cells: Vec<String>,
}

#[derive(Template)]
#[template(path = "pages/plant_database.html")]
pub struct PlantDatabaseTemplate {
    pub title: String,
    pub show: bool,
    pub columns: Vec<String>,
    pub rows: Vec<DatabaseRow>,
}

pub async fn plant_database_page(
    State(state): State<AppState>,
    Query(params): Query<DatabaseQuery>,
) -> Result<Html<String>, AppError> {
    let (columns, rows) = if params.show {
        let table = state.service.database().await?;
        (table.columns().to_vec(), database_rows(&table))
    } else {
        (Vec::new(), Vec::new())
    };

    render(&PlantDatabaseTemplate {
        title: "Plant Database".to_string(),
        show: params.show,
        columns,
        rows,
    })
}

fn database_rows(table: &PlantTable) -> Vec<DatabaseRow> {
    (0..table.len())
        .map(|row| DatabaseRow {
            href: format!(
                "/plants?name={}",
                urlencoding::encode(table.value(row, NAME_COLUMN).unwrap_or_default())
            ),
            cells: table
                .columns()
                .iter()
                .map(|label| table.value(row, label).unwrap_or_default().to_string())
                .collect(),
        })
        .collect()
}

// ============================================================================
// Error Page
// ============================================================================

#[derive(Template)]
#[template(path = "pages/error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub status: u16,
    pub message: String,
}

#[derive(Template)]
#[template(path = "partials/error.html")]
pub struct ErrorFragmentTemplate {
    pub status: u16,
    pub message: String,
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
