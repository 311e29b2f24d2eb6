use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub phone: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub role: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::carts::Entity")]
    Carts,
    #[sea_orm(has_many = "super::quote_orders::Entity")]
    QuoteOrders,
}

impl Related<super::carts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Carts.def()
    }
}

impl Related<super::quote_orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuoteOrders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
