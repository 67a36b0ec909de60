use chrono::{DateTime, Utc};
use sea_orm::{Condition, NotSet, Set, entity::prelude::*};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::filter::PredicateComposer;
use crate::models::{DateRangeParams, QueryDateTime};
use crate::traits::{ConflictPolicy, MessageKeys, Resource, Routes, SearchKeys};
use crate::validation::Validatable;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize, ToSchema)]
#[sea_orm(table_name = "customers")]
#[serde(rename_all = "camelCase")]
#[schema(as = Customer)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub active_state: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerPayload {
    pub id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub description: String,
    pub active_state: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Validatable for CustomerPayload {}

impl Resource for Model {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type Payload = CustomerPayload;
    type FilterParams = DateRangeParams;

    const ID_COLUMN: Column = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "customer";
    const RESOURCE_NAME_PLURAL: &'static str = "customers";
    const BASE_PATH: &'static str = "/customer";
    const ROUTES: Routes = Routes {
        create_under_parent: false,
        filter: Some("CustomersFilteredSuccessfully"),
        search: Some(SearchKeys {
            searched: "CustomersSearchedSuccessfully",
            keyword_required: "SearchKeywordRequired",
        }),
    };
    const CONFLICT_POLICY: ConflictPolicy = ConflictPolicy::ReloadAndRetry;
    const MESSAGES: MessageKeys = MessageKeys {
        listed: "CustomersRetrievedSuccessfully",
        retrieved: "CustomerRetrievedSuccessfully",
        created: "CustomerCreatedSuccessfully",
        updated: "CustomerUpdatedSuccessfully",
        deleted: "CustomerDeletedSuccessfully",
        not_found: "CustomerNotFound",
        id_mismatch: "InvalidCustomerId",
    };

    fn id(&self) -> i32 {
        self.id
    }

    fn payload_id(payload: &CustomerPayload) -> Option<i32> {
        payload.id
    }

    fn new_active_model(payload: &CustomerPayload, now: DateTimeUtc) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            first_name: Set(payload.first_name.clone()),
            last_name: Set(payload.last_name.clone()),
            email: Set(payload.email.clone()),
            phone: Set(payload.phone.clone()),
            description: Set(payload.description.clone()),
            active_state: Set(payload.active_state),
            created_at: Set(payload.created_at.unwrap_or(now)),
            updated_at: Set(payload.updated_at.unwrap_or(now)),
        }
    }

    fn overwrite(active: &mut ActiveModel, payload: &CustomerPayload, now: DateTimeUtc) {
        active.first_name = Set(payload.first_name.clone());
        active.last_name = Set(payload.last_name.clone());
        active.email = Set(payload.email.clone());
        active.phone = Set(payload.phone.clone());
        active.description = Set(payload.description.clone());
        active.active_state = Set(payload.active_state);
        if let Some(created_at) = payload.created_at {
            active.created_at = Set(created_at);
        }
        active.updated_at = Set(payload.updated_at.unwrap_or(now));
    }

    fn searchable_columns() -> Vec<Column> {
        vec![
            Column::FirstName,
            Column::LastName,
            Column::Email,
            Column::Phone,
        ]
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
