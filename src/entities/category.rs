use chrono::{DateTime, Utc};
use sea_orm::{Condition, NotSet, Set, entity::prelude::*};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::filter::PredicateComposer;
use crate::models::{DateRangeParams, QueryDateTime};
use crate::traits::{MessageKeys, Resource, Routes, SearchKeys};
use crate::validation::Validatable;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize, ToSchema)]
#[sea_orm(table_name = "categories")]
#[serde(rename_all = "camelCase")]
#[schema(as = Category)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub active_state: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Body of `POST /category` and `PUT /category/{id}`.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryPayload {
    /// Must match the path id on update when present
    pub id: Option<i32>,
    pub name: String,
    pub description: String,
    pub active_state: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Validatable for CategoryPayload {}

impl Resource for Model {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type Payload = CategoryPayload;
    type FilterParams = DateRangeParams;

    const ID_COLUMN: Column = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "category";
    const RESOURCE_NAME_PLURAL: &'static str = "categories";
    const BASE_PATH: &'static str = "/category";
    const ROUTES: Routes = Routes {
        create_under_parent: false,
        filter: Some("CategoriesFilteredSuccessfully"),
        search: Some(SearchKeys {
            searched: "CategoriesSearchedSuccessfully",
            keyword_required: "KeywordRequiredForSearch",
        }),
    };
    const MESSAGES: MessageKeys = MessageKeys {
        listed: "CategoriesRetrievedSuccessfully",
        retrieved: "CategoryRetrievedSuccessfully",
        created: "CategoryCreatedSuccessfully",
        updated: "CategoryUpdatedSuccessfully",
        deleted: "CategoryDeletedSuccessfully",
        not_found: "CategoryNotFound",
        id_mismatch: "InvalidCategoryId",
    };

    fn id(&self) -> i32 {
        self.id
    }

    fn payload_id(payload: &CategoryPayload) -> Option<i32> {
        payload.id
    }

    fn new_active_model(payload: &CategoryPayload, now: DateTimeUtc) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            name: Set(payload.name.clone()),
            description: Set(payload.description.clone()),
            active_state: Set(payload.active_state),
            created_at: Set(payload.created_at.unwrap_or(now)),
            updated_at: Set(payload.updated_at.unwrap_or(now)),
        }
    }

    fn overwrite(active: &mut ActiveModel, payload: &CategoryPayload, now: DateTimeUtc) {
        active.name = Set(payload.name.clone());
        active.description = Set(payload.description.clone());
        active.active_state = Set(payload.active_state);
        if let Some(created_at) = payload.created_at {
            active.created_at = Set(created_at);
        }
        active.updated_at = Set(payload.updated_at.unwrap_or(now));
    }

    fn searchable_columns() -> Vec<Column> {
        vec![Column::Name, Column::Description]
    }

    fn filter_condition(params: &DateRangeParams) -> Condition {
        PredicateComposer::new()
            .between(
                Column::CreatedAt,
                params.start_date.map(QueryDateTime::into_inner),
                params.end_date.map(QueryDateTime::into_inner),
            )
            .build()
    }
}
