use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, FromQueryResult, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    prelude::DateTimeUtc,
};
use serde::{Serialize, de::DeserializeOwned};
use utoipa::{IntoParams, ToSchema};

use crate::errors::ApiError;
use crate::validation::Validatable;

/// What a successful PUT or DELETE sends back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// 200 with the entity in the envelope
    Entity,
    /// 204, no body
    NoContent,
}

/// What an update does when the row changed under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Report the conflict as a 500
    Surface,
    /// Reload the latest row, reapply the payload once, then give up
    ReloadAndRetry,
}

/// Which optional endpoints a resource exposes.
///
/// The filter and search endpoints carry their own message keys, so a
/// resource without them has nothing to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Routes {
    /// `POST /{base}/{parentId}` instead of `POST /{base}`
    pub create_under_parent: bool,
    /// `GET /{base}/filter`, answered with this success key
    pub filter: Option<&'static str>,
    pub search: Option<SearchKeys>,
}

impl Routes {
    pub const CRUD: Self = Self {
        create_under_parent: false,
        filter: None,
        search: None,
    };
}

/// Message keys of `GET /{base}/search`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchKeys {
    pub searched: &'static str,
    /// Reported for a missing or blank keyword
    pub keyword_required: &'static str,
}

/// Localized message keys a resource reports through the envelope.
#[derive(Debug, Clone, Copy)]
pub struct MessageKeys {
    pub listed: &'static str,
    pub retrieved: &'static str,
    pub created: &'static str,
    pub updated: &'static str,
    pub deleted: &'static str,
    pub not_found: &'static str,
    pub id_mismatch: &'static str,
}

/// Describes one REST resource: its storage types, its wire payload and
/// the per-resource policies the generic operations consult.
///
/// Implemented on the sea-orm `Model` of each entity.
#[async_trait]
pub trait Resource: Clone + Serialize + ToSchema + Send + Sync + Sized + 'static {
    type EntityType: EntityTrait<Model = Self> + Sync;
    type ColumnType: ColumnTrait + Send + Sync;
    type ActiveModelType: ActiveModelTrait<Entity = Self::EntityType>
        + ActiveModelBehavior
        + Send
        + Sync;
    /// Request body for create and update
    type Payload: DeserializeOwned + Validatable + ToSchema + Send + Sync + 'static;
    /// Query string of the filter endpoint
    type FilterParams: DeserializeOwned + IntoParams + Send + Sync + 'static;

    const ID_COLUMN: Self::ColumnType;
    const RESOURCE_NAME_SINGULAR: &'static str;
    const RESOURCE_NAME_PLURAL: &'static str;
    /// Mount point, e.g. `/category`
    const BASE_PATH: &'static str;
    const MESSAGES: MessageKeys;
    const ROUTES: Routes = Routes::CRUD;
    const UPDATE_COMPLETION: Completion = Completion::Entity;
    const DELETE_COMPLETION: Completion = Completion::Entity;
    const CONFLICT_POLICY: ConflictPolicy = ConflictPolicy::Surface;

    fn id(&self) -> i32;

    /// The optional `id` carried in a request body.
    fn payload_id(payload: &Self::Payload) -> Option<i32>;

    /// Fresh row for an insert; the store assigns the id.
    fn new_active_model(payload: &Self::Payload, now: DateTimeUtc) -> Self::ActiveModelType;

    /// Full-field overwrite of a stored row.
    fn overwrite(active: &mut Self::ActiveModelType, payload: &Self::Payload, now: DateTimeUtc);

    /// Columns matched by keyword search.
    #[must_use]
    fn searchable_columns() -> Vec<Self::ColumnType> {
        Vec::new()
    }

    #[must_use]
    fn filter_condition(_params: &Self::FilterParams) -> Condition {
        Condition::all()
    }

    /// Reference checks run on create, before field validation.
    ///
    /// `parent` is the id captured from the path when the resource is
    /// created under a parent route.
    async fn check_references(
        _db: &DatabaseConnection,
        _payload: &mut Self::Payload,
        _parent: Option<i32>,
    ) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Storage operations for a [`Resource`], available for every model that
/// converts into its own active model.
#[async_trait]
pub trait Repository: Resource {
    async fn total_count(db: &DatabaseConnection, condition: Condition) -> Result<u64, DbErr>;

    /// One page in id order.
    async fn fetch_page(db: &DatabaseConnection, offset: u64, limit: u64)
    -> Result<Vec<Self>, DbErr>;

    /// Every matching row in id order.
    async fn fetch_matching(db: &DatabaseConnection, condition: Condition)
    -> Result<Vec<Self>, DbErr>;

    async fn find(db: &DatabaseConnection, id: i32) -> Result<Option<Self>, DbErr>;

    async fn insert(db: &DatabaseConnection, active: Self::ActiveModelType) -> Result<Self, DbErr>;

    /// `DbErr::RecordNotUpdated` when no row was written.
    async fn save(db: &DatabaseConnection, active: Self::ActiveModelType) -> Result<Self, DbErr>;

    /// Number of rows removed.
    async fn remove(db: &DatabaseConnection, id: i32) -> Result<u64, DbErr>;

    fn into_active(self) -> Self::ActiveModelType;
}

#[async_trait]
impl<R> Repository for R
where
    R: Resource + FromQueryResult + IntoActiveModel<R::ActiveModelType>,
{
    async fn total_count(db: &DatabaseConnection, condition: Condition) -> Result<u64, DbErr> {
        let query = R::EntityType::find().filter(condition);
        PaginatorTrait::count(query, db).await
    }

    async fn fetch_page(
        db: &DatabaseConnection,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Self>, DbErr> {
        R::EntityType::find()
            .order_by_asc(R::ID_COLUMN)
            .offset(offset)
            .limit(limit)
            .all(db)
            .await
    }

    async fn fetch_matching(
        db: &DatabaseConnection,
        condition: Condition,
    ) -> Result<Vec<Self>, DbErr> {
        R::EntityType::find()
            .filter(condition)
            .order_by_asc(R::ID_COLUMN)
            .all(db)
            .await
    }

    async fn find(db: &DatabaseConnection, id: i32) -> Result<Option<Self>, DbErr> {
        R::EntityType::find()
            .filter(R::ID_COLUMN.eq(id))
            .one(db)
            .await
    }

    async fn insert(db: &DatabaseConnection, active: Self::ActiveModelType) -> Result<Self, DbErr> {
        active.insert(db).await
    }

    async fn save(db: &DatabaseConnection, active: Self::ActiveModelType) -> Result<Self, DbErr> {
        active.update(db).await
    }

    async fn remove(db: &DatabaseConnection, id: i32) -> Result<u64, DbErr> {
        let res = R::EntityType::delete_many()
            .filter(R::ID_COLUMN.eq(id))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    fn into_active(self) -> Self::ActiveModelType {
        self.into_active_model()
    }
}
