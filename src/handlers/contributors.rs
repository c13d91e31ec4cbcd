//! Contributor roster handlers
//!
//! HTTP surface of the aggregation pipeline.

use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::models::{
    ApiResponse, Contributor, ContributorsQuery, FetchOptions, FilterCriteria, Pagination, RepoRef,
};
use crate::services::filter;
use crate::services::roster::RosterService;
use crate::AppState;

/// GET /contributors
///
/// Fetch, enrich, aggregate, filter, sort and window the contributor roster
/// of a repository.
///
/// Query parameters: `owner` and `repo` (required), `page`, `per_page`,
/// `enhanced`, `fetch_all`, `max_pages`, `force_complete`,
/// `min_contributions`, `max_contributions`, `location`, `company`,
/// `sort_by`, `sort_order`.
pub async fn list_contributors(
    state: web::Data<AppState>,
    query: web::Query<ContributorsQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();

    let (owner, repo_name) = match (query.owner.as_deref(), query.repo.as_deref()) {
        (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => (owner, repo),
        _ => {
            return Err(AppError::Validation(
                "Missing required parameters: owner and repo".to_string(),
            ));
        }
    };

    // Reject bad criteria before any upstream call happens
    let criteria = FilterCriteria::from_query(&query).map_err(AppError::Validation)?;

    let source = state
        .source
        .clone()
        .ok_or_else(|| AppError::Configuration("GitHub token not configured".to_string()))?;

    let repo = RepoRef::new(owner, repo_name);
    let options = FetchOptions::from_query(&query);

    let service = RosterService::new(source, state.config.max_pages_ceiling);
    let outcome = service.fetch(&repo, &options).await?;
    let meta = outcome.meta;

    let filtered = filter::apply(outcome.contributors, &criteria);
    let windowed = filter::window(filtered, query.page(), query.per_page(), options.fetch_all);

    let response: ApiResponse<Vec<Contributor>> = ApiResponse::ok(windowed.items)
        .with_pagination(Pagination {
            page: windowed.page,
            per_page: windowed.per_page,
            total_count: windowed.total_count,
            has_next: windowed.has_next,
        })
        .with_meta(meta);

    Ok(HttpResponse::Ok().json(response))
}

/// Configure contributor routes
pub fn configure_contributor_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/contributors").route(web::get().to(list_contributors)));
}
