//! Schema migrations, one per table.
//!
//! Foreign-key columns are indexed but not constrained; referential checks
//! live in the resources themselves.

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(CreateCategories),
            Box::new(CreateCustomers),
            Box::new(CreateProducts),
            Box::new(CreateOrders),
            Box::new(CreateOrderItems),
        ]
    }
}

fn id_column<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn money_column<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name).decimal_len(16, 2).not_null().to_owned()
}

fn timestamp_column<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

fn active_state_column<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .boolean()
        .not_null()
        .default(true)
        .to_owned()
}

pub struct CreateCategories;

impl MigrationName for CreateCategories {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_categories"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateCategories {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(id_column(Categories::Id))
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::Description).text().not_null())
                    .col(active_state_column(Categories::ActiveState))
                    .col(timestamp_column(Categories::CreatedAt))
                    .col(timestamp_column(Categories::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}

pub struct CreateCustomers;

impl MigrationName for CreateCustomers {
    fn name(&self) -> &'static str {
        "m20240101_000002_create_customers"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateCustomers {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(id_column(Customers::Id))
                    .col(ColumnDef::new(Customers::FirstName).string().not_null())
                    .col(ColumnDef::new(Customers::LastName).string().not_null())
                    .col(ColumnDef::new(Customers::Email).string().not_null())
                    .col(ColumnDef::new(Customers::Phone).string().not_null())
                    .col(ColumnDef::new(Customers::Description).text().not_null())
                    .col(active_state_column(Customers::ActiveState))
                    .col(timestamp_column(Customers::CreatedAt))
                    .col(timestamp_column(Customers::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

pub struct CreateProducts;

impl MigrationName for CreateProducts {
    fn name(&self) -> &'static str {
        "m20240101_000003_create_products"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateProducts {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(id_column(Products::Id))
                    .col(ColumnDef::new(Products::Name).string_len(5).not_null())
                    .col(ColumnDef::new(Products::Description).text().not_null())
                    .col(money_column(Products::Price))
                    .col(ColumnDef::new(Products::Stock).integer().not_null())
                    .col(ColumnDef::new(Products::ImageUrl).string().null())
                    .col(ColumnDef::new(Products::Length).integer().not_null())
                    .col(ColumnDef::new(Products::Width).integer().not_null())
                    .col(ColumnDef::new(Products::Height).integer().not_null())
                    .col(ColumnDef::new(Products::Weight).integer().not_null())
                    .col(ColumnDef::new(Products::Color).string().not_null())
                    .col(ColumnDef::new(Products::Material).string().not_null())
                    .col(ColumnDef::new(Products::Manufacturer).string().not_null())
                    .col(ColumnDef::new(Products::Warranty).string().not_null())
                    .col(active_state_column(Products::ActiveState))
                    .col(timestamp_column(Products::CreatedAt))
                    .col(timestamp_column(Products::UpdatedAt))
                    .col(ColumnDef::new(Products::CategoryId).integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_products_category_id")
                    .table(Products::Table)
                    .col(Products::CategoryId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

pub struct CreateOrders;

impl MigrationName for CreateOrders {
    fn name(&self) -> &'static str {
        "m20240101_000004_create_orders"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateOrders {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(id_column(Orders::Id))
                    .col(timestamp_column(Orders::OrderDate))
                    .col(money_column(Orders::TotalAmount))
                    .col(active_state_column(Orders::ActiveState))
                    .col(timestamp_column(Orders::CreatedAt))
                    .col(timestamp_column(Orders::UpdatedAt))
                    .col(ColumnDef::new(Orders::CustomerId).integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_customer_id")
                    .table(Orders::Table)
                    .col(Orders::CustomerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

pub struct CreateOrderItems;

impl MigrationName for CreateOrderItems {
    fn name(&self) -> &'static str {
        "m20240101_000005_create_order_items"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateOrderItems {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrderItems::Table)
                    .if_not_exists()
                    .col(id_column(OrderItems::Id))
                    .col(ColumnDef::new(OrderItems::OrderId).integer().not_null())
                    .col(ColumnDef::new(OrderItems::ProductId).integer().not_null())
                    .col(ColumnDef::new(OrderItems::Quantity).integer().not_null())
                    .col(money_column(OrderItems::UnitPrice))
                    .col(active_state_column(OrderItems::ActiveState))
                    .col(timestamp_column(OrderItems::CreatedAt))
                    .col(timestamp_column(OrderItems::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_order_items_order_id")
                    .table(OrderItems::Table)
                    .col(OrderItems::OrderId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrderItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    Description,
    ActiveState,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    Description,
    ActiveState,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Name,
    Description,
    Price,
    Stock,
    ImageUrl,
    Length,
    Width,
    Height,
    Weight,
    Color,
    Material,
    Manufacturer,
    Warranty,
    ActiveState,
    CreatedAt,
    UpdatedAt,
    CategoryId,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    OrderDate,
    TotalAmount,
    ActiveState,
    CreatedAt,
    UpdatedAt,
    CustomerId,
}

#[derive(DeriveIden)]
enum OrderItems {
    Table,
    Id,
    OrderId,
    ProductId,
    Quantity,
    UnitPrice,
    ActiveState,
    CreatedAt,
    UpdatedAt,
}
