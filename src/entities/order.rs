use chrono::{DateTime, Utc};
use sea_orm::{NotSet, Set, entity::prelude::*};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::NoFilter;
use crate::traits::{Completion, MessageKeys, Resource};
use crate::validation::Validatable;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize, ToSchema)]
#[sea_orm(table_name = "orders")]
#[serde(rename_all = "camelCase")]
#[schema(as = Order)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub order_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub active_state: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub customer_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderPayload {
    pub id: Option<i32>,
    /// Defaults to the time of the request
    pub order_date: Option<DateTime<Utc>>,
    pub total_amount: Decimal,
    pub active_state: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub customer_id: i32,
}

impl Validatable for OrderPayload {}

impl Resource for Model {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type Payload = OrderPayload;
    type FilterParams = NoFilter;

    const ID_COLUMN: Column = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "order";
    const RESOURCE_NAME_PLURAL: &'static str = "orders";
    const BASE_PATH: &'static str = "/order";
    const UPDATE_COMPLETION: Completion = Completion::NoContent;
    const DELETE_COMPLETION: Completion = Completion::NoContent;
    const MESSAGES: MessageKeys = MessageKeys {
        listed: "OrdersRetrievedSuccessfully",
        retrieved: "OrderRetrievedSuccessfully",
        created: "OrderCreatedSuccessfully",
        updated: "OrderUpdatedSuccessfully",
        deleted: "OrderDeletedSuccessfully",
        not_found: "OrderNotFound",
        id_mismatch: "OrderIDMismatch",
    };

    fn id(&self) -> i32 {
        self.id
    }

    fn payload_id(payload: &OrderPayload) -> Option<i32> {
        payload.id
    }

    fn new_active_model(payload: &OrderPayload, now: DateTimeUtc) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            order_date: Set(payload.order_date.unwrap_or(now)),
            total_amount: Set(payload.total_amount),
            active_state: Set(payload.active_state),
            created_at: Set(payload.created_at.unwrap_or(now)),
            updated_at: Set(payload.updated_at.unwrap_or(now)),
            customer_id: Set(payload.customer_id),
        }
    }

    fn overwrite(active: &mut ActiveModel, payload: &OrderPayload, now: DateTimeUtc) {
        if let Some(order_date) = payload.order_date {
            active.order_date = Set(order_date);
        }
        active.total_amount = Set(payload.total_amount);
        active.active_state = Set(payload.active_state);
        if let Some(created_at) = payload.created_at {
            active.created_at = Set(created_at);
        }
        active.updated_at = Set(payload.updated_at.unwrap_or(now));
        active.customer_id = Set(payload.customer_id);
    }
}
