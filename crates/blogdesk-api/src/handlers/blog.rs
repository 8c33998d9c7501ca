//! Blog post handlers: listing, CRUD, publishing workflow, views, related.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::json;

use blogdesk_core::types::pagination::PageResponse;
use blogdesk_core::types::sorting::SortField;
use blogdesk_entity::blog::BlogStatus;
use blogdesk_service::blog::{BlogDetails, BlogQuery};

use crate::dto::request::{BlogListQuery, CreateBlogRequest, RelatedQuery, SearchQuery, UpdateBlogRequest};
use crate::dto::response::{ApiResponse, BlogResponse, IdResponse, ItemsResponse, ViewsResponse};
use crate::error::ApiResult;
use crate::extractors::{ApiQuery, AuthUser, PaginationParams, ValidatedJson};
use crate::state::AppState;

type BlogPage = Json<ApiResponse<PageResponse<BlogResponse>>>;

fn page_response(page: PageResponse<BlogDetails>, sort: SortField) -> BlogPage {
    Json(ApiResponse::with_meta(
        page.map(BlogResponse::from),
        json!({ "sort": sort.describe() }),
    ))
}

fn blog_query(query: BlogListQuery) -> ApiResult<BlogQuery> {
    Ok(BlogQuery {
        author: query.author_id()?,
        featured: query.featured_flag(),
        search: query.search,
        status: query.status,
        category: query.category,
        tag: query.tag,
        sort_by: query.sort_by,
        sort_order: query.sort_order,
    })
}

/// GET /api/blogs
pub async fn list_blogs(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    ApiQuery(paging): ApiQuery<PaginationParams>,
    ApiQuery(query): ApiQuery<BlogListQuery>,
) -> ApiResult<BlogPage> {
    let page = paging.into_page_request();
    let (items, sort) = state
        .blog_service
        .list(auth.as_ref().map(AuthUser::context), blog_query(query)?, &page)
        .await?;
    Ok(page_response(items, sort))
}

/// GET /api/blogs/search?q=
pub async fn search_blogs(
    State(state): State<AppState>,
    ApiQuery(paging): ApiQuery<PaginationParams>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<BlogPage> {
    let page = paging.into_page_request();
    let term = query.q.unwrap_or_default();
    let (items, sort) = state.blog_service.search(term.trim(), &page).await?;
    Ok(page_response(items, sort))
}

/// GET /api/blogs/my-blogs
pub async fn my_blogs(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(paging): ApiQuery<PaginationParams>,
    ApiQuery(query): ApiQuery<BlogListQuery>,
) -> ApiResult<BlogPage> {
    let page = paging.into_page_request();
    let (items, sort) = state
        .blog_service
        .mine(&auth, blog_query(query)?, &page)
        .await?;
    Ok(page_response(items, sort))
}

/// GET /api/blogs/{id}
pub async fn get_blog(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<BlogResponse>>> {
    let blog = state
        .blog_service
        .get(auth.as_ref().map(AuthUser::context), &id)
        .await?;
    Ok(Json(ApiResponse::ok(blog.into())))
}

/// POST /api/blogs
pub async fn create_blog(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateBlogRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<BlogResponse>>)> {
    let blog = state.blog_service.create(&auth, req.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(blog.into()))))
}

/// PUT /api/blogs/{id}
pub async fn update_blog(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateBlogRequest>,
) -> ApiResult<Json<ApiResponse<BlogResponse>>> {
    let blog = state
        .blog_service
        .update(&auth, &id, req.into_input()?)
        .await?;
    Ok(Json(ApiResponse::ok(blog.into())))
}

/// DELETE /api/blogs/{id}
pub async fn delete_blog(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<IdResponse>>> {
    let id = state.blog_service.delete(&auth, &id).await?;
    Ok(Json(ApiResponse::ok(IdResponse { id })))
}

async fn transition(
    state: &AppState,
    auth: &AuthUser,
    id: &str,
    target: BlogStatus,
) -> ApiResult<Json<ApiResponse<BlogResponse>>> {
    let blog = state.blog_service.transition(auth, id, target).await?;
    Ok(Json(ApiResponse::ok(blog.into())))
}

/// PATCH /api/blogs/{id}/publish
pub async fn publish_blog(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<BlogResponse>>> {
    transition(&state, &auth, &id, BlogStatus::Published).await
}

/// PATCH /api/blogs/{id}/unpublish
pub async fn unpublish_blog(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<BlogResponse>>> {
    transition(&state, &auth, &id, BlogStatus::Draft).await
}

/// PATCH /api/blogs/{id}/archive
pub async fn archive_blog(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<BlogResponse>>> {
    transition(&state, &auth, &id, BlogStatus::Archived).await
}

/// POST /api/blogs/{id}/views
pub async fn record_view(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ViewsResponse>>> {
    let views = state
        .blog_service
        .record_view(auth.as_ref().map(AuthUser::context), &id)
        .await?;
    Ok(Json(ApiResponse::ok(ViewsResponse { views })))
}

/// GET /api/blogs/{id}/related
pub async fn related_blogs(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<RelatedQuery>,
) -> ApiResult<Json<ApiResponse<ItemsResponse<BlogResponse>>>> {
    let (items, limit) = state
        .blog_service
        .related(auth.as_ref().map(AuthUser::context), &id, query.limit())
        .await?;
    let items: Vec<BlogResponse> = items.into_iter().map(BlogResponse::from).collect();
    let total = items.len();
    Ok(Json(ApiResponse::with_meta(
        ItemsResponse { items },
        json!({ "total": total, "limit": limit }),
    )))
}
