use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    /// `["https://..."]`
    #[sea_orm(column_type = "JsonBinary")]
    pub images: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub sizes: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub colors: Json,
    /// `[{"label": "Embroidered logo", "surcharge": "12.50"}]`
    #[sea_orm(column_type = "JsonBinary")]
    pub customizations: Json,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
