use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{Condition, NotSet, Set, entity::prelude::*};
use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};
use utoipa::{IntoParams, ToSchema};

use crate::errors::ApiError;
use crate::filter::PredicateComposer;
use crate::i18n::keys;
use crate::models::{QueryDateTime, flag_or_empty};
use crate::traits::{Completion, MessageKeys, Repository, Resource, Routes, SearchKeys};
use crate::validation::{
    Validatable, ValidationErrors,
    validators::{validate_max_chars, validate_present, validate_required, validate_required_min},
};

const NAME_MAX_CHARS: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize, ToSchema)]
#[sea_orm(table_name = "products")]
#[serde(rename_all = "camelCase")]
#[schema(as = Product)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub image_url: Option<String>,
    pub length: i32,
    pub width: i32,
    pub height: i32,
    pub weight: i32,
    pub color: String,
    pub material: String,
    pub manufacturer: String,
    pub warranty: String,
    pub active_state: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Body of `POST /products/{categoryId}` and `PUT /products/{id}`.
///
/// Required fields are optional here so that a missing value is reported
/// as a validation error rather than a malformed body.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPayload {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub description: String,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
    pub length: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub weight: Option<i32>,
    pub color: Option<String>,
    pub material: Option<String>,
    pub manufacturer: Option<String>,
    pub warranty: Option<String>,
    pub active_state: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Ignored on create, where the path supplies it
    pub category_id: Option<i32>,
}

impl Validatable for ProductPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(name) = errors.collect(validate_required(
            "name",
            self.name.as_deref(),
            "ProductNameRequired",
        )) {
            errors.collect(validate_max_chars(
                "name",
                name,
                NAME_MAX_CHARS,
                "ProductNameMaxLength",
            ));
        }
        errors.collect(validate_required_min(
            "price",
            self.price,
            Decimal::new(1, 2),
            "PriceRequired",
            "PriceRange",
        ));
        errors.collect(validate_required_min(
            "stock",
            self.stock,
            1,
            "ProductStockRequired",
            "StockMinLength",
        ));
        for (field, value, required, min) in [
            ("length", self.length, "LengthRequired", "LengthMinLength"),
            ("width", self.width, "WidthRequired", "WidthMinLength"),
            ("height", self.height, "HeightRequired", "HeightMinLength"),
            ("weight", self.weight, "WeightRequired", "WeightMinLength"),
        ] {
            errors.collect(validate_required_min(field, value, 1, required, min));
        }
        for (field, value, required) in [
            ("color", self.color.as_deref(), "ColorRequired"),
            ("material", self.material.as_deref(), "MaterialRequired"),
            ("manufacturer", self.manufacturer.as_deref(), "ManufacturerRequired"),
            ("warranty", self.warranty.as_deref(), "WarrantyRequired"),
        ] {
            errors.collect(validate_required(field, value, required));
        }
        errors.collect(validate_present(
            "categoryId",
            self.category_id,
            keys::CATEGORY_ID_REQUIRED,
        ));

        errors.result()
    }
}

fn active_only() -> Option<bool> {
    Some(true)
}

/// `GET /products/filter` query. Every bound is optional; `activeState`
/// defaults to `true` when omitted and is ignored when sent empty.
#[serde_as]
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductFilterParams {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub category_id: Option<i32>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub min_price: Option<Decimal>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub max_price: Option<Decimal>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[param(value_type = Option<String>, format = DateTime)]
    pub from_date: Option<QueryDateTime>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[param(value_type = Option<String>, format = DateTime)]
    pub to_date: Option<QueryDateTime>,
    #[serde(default = "active_only", deserialize_with = "flag_or_empty")]
    pub active_state: Option<bool>,
}

impl Default for ProductFilterParams {
    fn default() -> Self {
        Self {
            category_id: None,
            min_price: None,
            max_price: None,
            from_date: None,
            to_date: None,
            active_state: active_only(),
        }
    }
}

#[async_trait]
impl Resource for Model {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type Payload = ProductPayload;
    type FilterParams = ProductFilterParams;

    const ID_COLUMN: Column = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "product";
    const RESOURCE_NAME_PLURAL: &'static str = "products";
    const BASE_PATH: &'static str = "/products";
    const ROUTES: Routes = Routes {
        create_under_parent: true,
        filter: Some("ProductsFilteredSuccessfully"),
        search: Some(SearchKeys {
            searched: "ProductsSearchedSuccessfully",
            keyword_required: "KeywordRequired",
        }),
    };
    const UPDATE_COMPLETION: Completion = Completion::NoContent;
    const MESSAGES: MessageKeys = MessageKeys {
        listed: "ProductsRetrievedSuccessfully",
        retrieved: "ProductRetrievedSuccessfully",
        created: "ProductCreatedSuccessfully",
        updated: "ProductUpdatedSuccessfully",
        deleted: "ProductDeletedSuccessfully",
        not_found: "ProductNotFound",
        id_mismatch: "ProductIDMismatch",
    };

    fn id(&self) -> i32 {
        self.id
    }

    fn payload_id(payload: &ProductPayload) -> Option<i32> {
        payload.id
    }

    fn new_active_model(payload: &ProductPayload, now: DateTimeUtc) -> ActiveModel {
        let mut active = ActiveModel {
            id: NotSet,
            created_at: Set(payload.created_at.unwrap_or(now)),
            ..Default::default()
        };
        Self::overwrite(&mut active, payload, now);
        active
    }

    fn overwrite(active: &mut ActiveModel, payload: &ProductPayload, now: DateTimeUtc) {
        active.name = Set(payload.name.clone().unwrap_or_default());
        active.description = Set(payload.description.clone());
        active.price = Set(payload.price.unwrap_or_default());
        active.stock = Set(payload.stock.unwrap_or_default());
        active.image_url = Set(payload.image_url.clone());
        active.length = Set(payload.length.unwrap_or_default());
        active.width = Set(payload.width.unwrap_or_default());
        active.height = Set(payload.height.unwrap_or_default());
        active.weight = Set(payload.weight.unwrap_or_default());
        active.color = Set(payload.color.clone().unwrap_or_default());
        active.material = Set(payload.material.clone().unwrap_or_default());
        active.manufacturer = Set(payload.manufacturer.clone().unwrap_or_default());
        active.warranty = Set(payload.warranty.clone().unwrap_or_default());
        active.active_state = Set(payload.active_state);
        if let Some(created_at) = payload.created_at {
            active.created_at = Set(created_at);
        }
        active.updated_at = Set(payload.updated_at.unwrap_or(now));
        if let Some(category_id) = payload.category_id {
            active.category_id = Set(category_id);
        }
    }

    fn searchable_columns() -> Vec<Column> {
        vec![Column::Name, Column::Description]
    }

    fn filter_condition(params: &ProductFilterParams) -> Condition {
        PredicateComposer::new()
            .equals(Column::CategoryId, params.category_id)
            .between(Column::Price, params.min_price, params.max_price)
            .between(
                Column::CreatedAt,
                params.from_date.map(QueryDateTime::into_inner),
                params.to_date.map(QueryDateTime::into_inner),
            )
            .equals(Column::ActiveState, params.active_state)
            .build()
    }

    /// The category named in the path must exist before anything else is
    /// checked; it then replaces whatever `categoryId` the body carried.
    async fn check_references(
        db: &DatabaseConnection,
        payload: &mut ProductPayload,
        parent: Option<i32>,
    ) -> Result<(), ApiError> {
        let missing = || ApiError::not_found(keys::CATEGORY_ID_REQUIRED);
        let category_id = parent.or(payload.category_id).ok_or_else(missing)?;
        if <super::category::Model as Repository>::find(db, category_id)
            .await?
            .is_none()
        {
            return Err(missing());
        }
        payload.category_id = Some(category_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_payload() -> ProductPayload {
        ProductPayload {
            name: Some("Lamp".to_string()),
            description: "Desk lamp".to_string(),
            price: Some(Decimal::new(1999, 2)),
            stock: Some(4),
            length: Some(30),
            width: Some(15),
            height: Some(45),
            weight: Some(2),
            color: Some("black".to_string()),
            material: Some("steel".to_string()),
            manufacturer: Some("Lumen".to_string()),
            warranty: Some("1 year".to_string()),
            active_state: true,
            category_id: Some(1),
            ..ProductPayload::default()
        }
    }

    fn violations(payload: &ProductPayload) -> Vec<&'static str> {
        payload
            .validate()
            .err()
            .map(|errors| errors.keys())
            .unwrap_or_default()
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(valid_payload().validate().is_ok());
    }

    #[test]
    fn test_empty_payload_reports_every_field_in_order() {
        assert_eq!(
            violations(&ProductPayload::default()),
            vec![
                "ProductNameRequired",
                "PriceRequired",
                "ProductStockRequired",
                "LengthRequired",
                "WidthRequired",
                "HeightRequired",
                "WeightRequired",
                "ColorRequired",
                "MaterialRequired",
                "ManufacturerRequired",
                "WarrantyRequired",
                "CategoryIdRequired",
            ]
        );
    }

    #[test]
    fn test_range_violations() {
        let payload = ProductPayload {
            name: Some("Floor lamp".to_string()),
            price: Some(Decimal::ZERO),
            stock: Some(0),
            weight: Some(0),
            ..valid_payload()
        };
        assert_eq!(
            violations(&payload),
            vec![
                "ProductNameMaxLength",
                "PriceRange",
                "StockMinLength",
                "WeightMinLength"
            ]
        );
    }

    #[test]
    fn test_minimum_price_is_one_cent() {
        let payload = ProductPayload {
            price: Some(Decimal::new(1, 2)),
            ..valid_payload()
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_blank_text_is_missing() {
        let payload = ProductPayload {
            color: Some("  ".to_string()),
            ..valid_payload()
        };
        assert_eq!(violations(&payload), vec!["ColorRequired"]);
    }

    #[test]
    fn test_filter_params_default_to_active_only() {
        let params: ProductFilterParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.active_state, Some(true));
        assert_eq!(ProductFilterParams::default().active_state, Some(true));
    }
}
