use chrono::{DateTime, Utc};
use sea_orm::{NotSet, Set, entity::prelude::*};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::NoFilter;
use crate::traits::{Completion, MessageKeys, Resource};
use crate::validation::Validatable;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize, ToSchema)]
#[sea_orm(table_name = "order_items")]
#[serde(rename_all = "camelCase")]
#[schema(as = OrderItem)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub active_state: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderItemPayload {
    pub id: Option<i32>,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub active_state: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Validatable for OrderItemPayload {}

impl Resource for Model {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type Payload = OrderItemPayload;
    type FilterParams = NoFilter;

    const ID_COLUMN: Column = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "order item";
    const RESOURCE_NAME_PLURAL: &'static str = "orderitems";
    const BASE_PATH: &'static str = "/orderitems";
    const UPDATE_COMPLETION: Completion = Completion::NoContent;
    const DELETE_COMPLETION: Completion = Completion::NoContent;
    const MESSAGES: MessageKeys = MessageKeys {
        listed: "OrderItemsRetrievedSuccessfully",
        retrieved: "OrderItemRetrievedSuccessfully",
        created: "OrderItemCreatedSuccessfully",
        updated: "OrderItemUpdatedSuccessfully",
        deleted: "OrderItemDeletedSuccessfully",
        not_found: "OrderItemNotFound",
        id_mismatch: "OrderItemIDMismatch",
    };

    fn id(&self) -> i32 {
        self.id
    }

    fn payload_id(payload: &OrderItemPayload) -> Option<i32> {
        payload.id
    }

    fn new_active_model(payload: &OrderItemPayload, now: DateTimeUtc) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            order_id: Set(payload.order_id),
            product_id: Set(payload.product_id),
            quantity: Set(payload.quantity),
            unit_price: Set(payload.unit_price),
            active_state: Set(payload.active_state),
            created_at: Set(payload.created_at.unwrap_or(now)),
            updated_at: Set(payload.updated_at.unwrap_or(now)),
        }
    }

    fn overwrite(active: &mut ActiveModel, payload: &OrderItemPayload, now: DateTimeUtc) {
        active.order_id = Set(payload.order_id);
        active.product_id = Set(payload.product_id);
        active.quantity = Set(payload.quantity);
        active.unit_price = Set(payload.unit_price);
        active.active_state = Set(payload.active_state);
        if let Some(created_at) = payload.created_at {
            active.created_at = Set(created_at);
        }
        active.updated_at = Set(payload.updated_at.unwrap_or(now));
    }
}
