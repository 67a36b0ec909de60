//! Generic axum handlers, instantiated once per resource by
//! [`resource_routes`].
//!
//! Every handler answers with a [`Reply`]: an envelope on success or
//! failure, or an empty 204 where the resource's completion policy says so.

use axum::{
    Router,
    extract::State,
    http::{HeaderValue, StatusCode, header::LOCATION},
    routing::get,
};

use crate::context::{JsonBody, PathId, QueryParams, RequestContext};
use crate::envelope::Reply;
use crate::errors::ApiError;
use crate::i18n::keys;
use crate::models::{KeywordParams, PageParams};
use crate::operations;
use crate::pagination::calculate_content_range;
use crate::state::AppState;
use crate::traits::{Completion, Repository, SearchKeys};

/// `GET /{base}?pageNumber=&pageSize=`
pub async fn get_all<R: Repository>(
    State(state): State<AppState>,
    ctx: RequestContext,
    QueryParams(params): QueryParams<PageParams>,
) -> Reply<Vec<R>> {
    match operations::list::<R>(&state.db, &params).await {
        Ok(page) => {
            let returned = u64::try_from(page.items.len()).unwrap_or(u64::MAX);
            let headers = calculate_content_range(
                page.window.offset,
                returned,
                page.total,
                R::RESOURCE_NAME_PLURAL,
            );
            ctx.success(StatusCode::OK, R::MESSAGES.listed, page.items, page.total)
                .with_headers(headers)
        }
        Err(err) => ctx.reject(&err),
    }
}

/// `GET /{base}/{id}`
pub async fn get_one<R: Repository>(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathId(id): PathId,
) -> Reply<R> {
    match operations::get_one::<R>(&state.db, id).await {
        Ok(item) => ctx.success(StatusCode::OK, R::MESSAGES.retrieved, item, 0),
        Err(err) => ctx.reject(&err),
    }
}

/// `POST /{base}`
pub async fn create_one<R: Repository>(
    State(state): State<AppState>,
    ctx: RequestContext,
    JsonBody(payload): JsonBody<R::Payload>,
) -> Reply<R> {
    created::<R>(&ctx, operations::create::<R>(&state.db, payload, None).await)
}

/// `POST /{base}/{parentId}`
pub async fn create_under_parent<R: Repository>(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathId(parent): PathId,
    JsonBody(payload): JsonBody<R::Payload>,
) -> Reply<R> {
    created::<R>(
        &ctx,
        operations::create::<R>(&state.db, payload, Some(parent)).await,
    )
}

fn created<R: Repository>(
    ctx: &RequestContext,
    outcome: Result<R, ApiError>,
) -> Reply<R> {
    match outcome {
        Ok(item) => {
            let location = format!("{}/{}", R::BASE_PATH, item.id());
            let reply = ctx.success(StatusCode::CREATED, R::MESSAGES.created, item, 0);
            match HeaderValue::from_str(&location) {
                Ok(value) => reply.with_header(LOCATION, value),
                Err(_) => reply,
            }
        }
        Err(err) => ctx.reject(&err),
    }
}

/// `PUT /{base}/{id}`
pub async fn update_one<R: Repository>(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathId(id): PathId,
    JsonBody(payload): JsonBody<R::Payload>,
) -> Reply<R> {
    match operations::update::<R>(&state.db, id, payload).await {
        Ok(item) => match R::UPDATE_COMPLETION {
            Completion::Entity => ctx.success(StatusCode::OK, R::MESSAGES.updated, item, 0),
            Completion::NoContent => Reply::no_content(),
        },
        Err(err) => ctx.reject(&err),
    }
}

/// `DELETE /{base}/{id}`
pub async fn delete_one<R: Repository>(
    State(state): State<AppState>,
    ctx: RequestContext,
    PathId(id): PathId,
) -> Reply<R> {
    match operations::delete::<R>(&state.db, id).await {
        Ok(item) => match R::DELETE_COMPLETION {
            Completion::Entity => ctx.success(StatusCode::OK, R::MESSAGES.deleted, item, 0),
            Completion::NoContent => Reply::no_content(),
        },
        Err(err) => ctx.reject(&err),
    }
}

/// `GET /{base}/filter?...`
pub async fn filter_many<R: Repository>(
    filtered: &'static str,
    State(state): State<AppState>,
    ctx: RequestContext,
    QueryParams(params): QueryParams<R::FilterParams>,
) -> Reply<Vec<R>> {
    match operations::filter::<R>(&state.db, &params).await {
        Ok(matches) => {
            let total = matches.total();
            ctx.success(StatusCode::OK, filtered, matches.items, total)
        }
        Err(err) => ctx.reject(&err),
    }
}

/// `GET /{base}/search?keyword=`
pub async fn search_many<R: Repository>(
    keys: SearchKeys,
    State(state): State<AppState>,
    ctx: RequestContext,
    QueryParams(params): QueryParams<KeywordParams>,
) -> Reply<Vec<R>> {
    let keyword = params.keyword.as_deref();
    match operations::search::<R>(&state.db, keyword, keys.keyword_required).await {
        Ok(matches) => {
            let total = matches.total();
            ctx.success(StatusCode::OK, keys.searched, matches.items, total)
        }
        Err(err) => ctx.reject(&err),
    }
}

/// Fallback for paths no route matches.
pub async fn route_not_found(ctx: RequestContext) -> Reply<()> {
    ctx.reject(&ApiError::not_found(keys::ROUTE_NOT_FOUND))
}

/// Fallback for a known path hit with an unsupported method.
pub async fn method_not_allowed(ctx: RequestContext) -> Reply<()> {
    ctx.reject(&ApiError::MethodNotAllowed)
}

/// Registers a resource's endpoints under its base path.
pub fn resource_routes<R: Repository>(router: Router<AppState>) -> Router<AppState> {
    let base = R::BASE_PATH;

    let mut collection = get(get_all::<R>);
    let mut item = get(get_one::<R>)
        .put(update_one::<R>)
        .delete(delete_one::<R>);
    if R::ROUTES.create_under_parent {
        item = item.post(create_under_parent::<R>);
    } else {
        collection = collection.post(create_one::<R>);
    }

    let mut router = router
        .route(base, collection)
        .route(&format!("{base}/{{id}}"), item);
    if let Some(filtered) = R::ROUTES.filter {
        router = router.route(
            &format!("{base}/filter"),
            get(
                move |state: State<AppState>,
                      ctx: RequestContext,
                      query: QueryParams<R::FilterParams>| {
                    filter_many::<R>(filtered, state, ctx, query)
                },
            ),
        );
    }
    if let Some(keys) = R::ROUTES.search {
        router = router.route(
            &format!("{base}/search"),
            get(
                move |state: State<AppState>,
                      ctx: RequestContext,
                      query: QueryParams<KeywordParams>| {
                    search_many::<R>(keys, state, ctx, query)
                },
            ),
        );
    }
    router
}
