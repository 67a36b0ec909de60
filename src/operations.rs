//! # Generic CRUD operations
//!
//! One implementation of list, get, create, update, delete, filter and
//! search, parameterized over any [`Repository`]. Each operation returns
//! `Result<_, ApiError>`; rendering into the envelope happens in
//! [`crate::routes`].
//!
//! Ordering of checks matters to clients and is fixed here:
//!
//! - **create**: reference checks (404), then field validation (400), then insert
//! - **update**: lookup (404), then body/path id match (400), then
//!   validation (400), then write; a write conflict re-checks existence
//! - **delete**: lookup (404), then remove; the last known state is returned

use chrono::Utc;
use sea_orm::{Condition, DatabaseConnection, DbErr};

use crate::errors::ApiError;
use crate::filter::{keyword_condition, require_keyword};
use crate::models::PageParams;
use crate::pagination::{self, PageWindow};
use crate::traits::{ConflictPolicy, Repository};
use crate::validation::Validatable;

/// A fetched page together with the collection size.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub window: PageWindow,
}

/// A filter or search result: every match, unpaged.
#[derive(Debug, Clone)]
pub struct Matches<T> {
    pub items: Vec<T>,
}

impl<T> Matches<T> {
    #[must_use]
    pub fn total(&self) -> u64 {
        u64::try_from(self.items.len()).unwrap_or(u64::MAX)
    }
}

/// # Errors
/// `InvalidPageNumber` when the page is out of range, including every page
/// of an empty collection.
pub async fn list<R: Repository>(
    db: &DatabaseConnection,
    params: &PageParams,
) -> Result<Page<R>, ApiError> {
    let total = R::total_count(db, Condition::all()).await?;
    let window = pagination::guard(total, params.page_number, params.page_size)?;
    let items = R::fetch_page(db, window.offset, window.limit).await?;
    Ok(Page {
        items,
        total,
        window,
    })
}

/// # Errors
/// The resource's not-found key when no row has `id`.
pub async fn get_one<R: Repository>(db: &DatabaseConnection, id: i32) -> Result<R, ApiError> {
    R::find(db, id)
        .await?
        .ok_or(ApiError::not_found(R::MESSAGES.not_found))
}

/// # Errors
/// Whatever the reference checks raise, then every violated field rule.
pub async fn create<R: Repository>(
    db: &DatabaseConnection,
    mut payload: R::Payload,
    parent: Option<i32>,
) -> Result<R, ApiError> {
    R::check_references(db, &mut payload, parent).await?;
    payload.validate()?;

    let created = R::insert(db, R::new_active_model(&payload, Utc::now())).await?;
    tracing::info!(
        resource = R::RESOURCE_NAME_SINGULAR,
        id = created.id(),
        "Created"
    );
    Ok(created)
}

/// # Errors
/// Not found, id mismatch, validation failures, or the conflict outcome
/// dictated by the resource's [`ConflictPolicy`].
pub async fn update<R: Repository>(
    db: &DatabaseConnection,
    id: i32,
    payload: R::Payload,
) -> Result<R, ApiError> {
    let existing = get_one::<R>(db, id).await?;

    if let Some(body_id) = R::payload_id(&payload)
        && body_id != id
    {
        return Err(ApiError::bad_request(R::MESSAGES.id_mismatch));
    }
    payload.validate()?;

    let mut active = existing.into_active();
    R::overwrite(&mut active, &payload, Utc::now());

    match R::save(db, active).await {
        Ok(updated) => Ok(updated),
        Err(DbErr::RecordNotUpdated) => resolve_conflict::<R>(db, id, &payload).await,
        Err(err) => Err(err.into()),
    }
}

async fn resolve_conflict<R: Repository>(
    db: &DatabaseConnection,
    id: i32,
    payload: &R::Payload,
) -> Result<R, ApiError> {
    let Some(latest) = R::find(db, id).await? else {
        return Err(ApiError::not_found(R::MESSAGES.not_found));
    };

    match R::CONFLICT_POLICY {
        ConflictPolicy::Surface => Err(ApiError::conflict(DbErr::RecordNotUpdated)),
        ConflictPolicy::ReloadAndRetry => {
            tracing::warn!(
                resource = R::RESOURCE_NAME_SINGULAR,
                id,
                "Update conflicted, retrying against the latest row"
            );
            let mut active = latest.into_active();
            R::overwrite(&mut active, payload, Utc::now());
            R::save(db, active).await.map_err(ApiError::from)
        }
    }
}

/// Returns the row as it was before removal.
///
/// # Errors
/// The resource's not-found key when no row has `id`.
pub async fn delete<R: Repository>(db: &DatabaseConnection, id: i32) -> Result<R, ApiError> {
    let existing = get_one::<R>(db, id).await?;
    if R::remove(db, id).await? == 0 {
        // Removed by someone else between the lookup and the delete.
        return Err(ApiError::not_found(R::MESSAGES.not_found));
    }
    tracing::info!(resource = R::RESOURCE_NAME_SINGULAR, id, "Deleted");
    Ok(existing)
}

/// # Errors
/// Storage faults only; absent parameters simply match everything.
pub async fn filter<R: Repository>(
    db: &DatabaseConnection,
    params: &R::FilterParams,
) -> Result<Matches<R>, ApiError> {
    let items = R::fetch_matching(db, R::filter_condition(params)).await?;
    Ok(Matches { items })
}

/// # Errors
/// `keyword_required` for a blank keyword, checked before
/// any query runs.
pub async fn search<R: Repository>(
    db: &DatabaseConnection,
    keyword: Option<&str>,
    keyword_required: &'static str,
) -> Result<Matches<R>, ApiError> {
    let keyword = require_keyword(keyword, keyword_required)?;
    let condition = keyword_condition(&R::searchable_columns(), keyword);
    let items = R::fetch_matching(db, condition).await?;
    Ok(Matches { items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{category, customer};
    use axum::http::StatusCode;
    use chrono::TimeZone;
    use sea_orm::{DatabaseBackend, MockDatabase};

    // Postgres so that updates use RETURNING and an empty result set reads
    // as `RecordNotUpdated`.
    fn mock_db<M: sea_orm::IntoMockRow>(results: Vec<Vec<M>>) -> DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(results)
            .into_connection()
    }

    fn customer(first_name: &str) -> customer::Model {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        customer::Model {
            id: 1,
            first_name: first_name.to_string(),
            last_name: "Haddad".to_string(),
            email: "amina@example.com".to_string(),
            phone: "+1-555-0100".to_string(),
            description: String::new(),
            active_state: true,
            created_at: at,
            updated_at: at,
        }
    }

    fn customer_payload() -> customer::CustomerPayload {
        customer::CustomerPayload {
            id: Some(1),
            first_name: "Amina".to_string(),
            last_name: "Haddad".to_string(),
            email: "amina@example.com".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_customer_conflict_is_retried_once() {
        let db = mock_db(vec![
            vec![customer("Old")],
            vec![],
            vec![customer("Changed elsewhere")],
            vec![customer("Amina")],
        ]);

        let updated = update::<customer::Model>(&db, 1, customer_payload())
            .await
            .unwrap();

        assert_eq!(updated.first_name, "Amina");
        // lookup, failed write, reload, retried write
        assert_eq!(db.into_transaction_log().len(), 4);
    }

    #[tokio::test]
    async fn test_customer_conflict_after_retry_is_surfaced() {
        let db = mock_db(vec![
            vec![customer("Old")],
            vec![],
            vec![customer("Changed elsewhere")],
            vec![],
        ]);

        let err = update::<customer::Model>(&db, 1, customer_payload())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Conflict { .. }));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_category_conflict_is_surfaced() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let stored = category::Model {
            id: 7,
            name: "Home".to_string(),
            description: String::new(),
            active_state: true,
            created_at: at,
            updated_at: at,
        };
        let db = mock_db(vec![vec![stored.clone()], vec![], vec![stored]]);
        let payload = category::CategoryPayload {
            name: "Garden".to_string(),
            ..Default::default()
        };

        let err = update::<category::Model>(&db, 7, payload).await.unwrap_err();

        assert!(matches!(err, ApiError::Conflict { .. }));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message_key(), "ConcurrencyConflict");
        // No retry: lookup, failed write, existence re-check.
        assert_eq!(db.into_transaction_log().len(), 3);
    }

    #[tokio::test]
    async fn test_row_removed_during_update_is_not_found() {
        let db = mock_db(vec![vec![customer("Old")], vec![], vec![]]);

        let err = update::<customer::Model>(&db, 1, customer_payload())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.message_key(), "CustomerNotFound");
    }

    #[tokio::test]
    async fn test_id_mismatch_is_rejected_before_writing() {
        let db = mock_db(vec![vec![customer("Old")]]);
        let mut payload = customer_payload();
        payload.id = Some(2);

        let err = update::<customer::Model>(&db, 1, payload).await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message_key(), "InvalidCustomerId");
        assert_eq!(db.into_transaction_log().len(), 1);
    }
}
