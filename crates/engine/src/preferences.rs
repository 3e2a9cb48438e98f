//! Per-user UI and notification preferences.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "preferences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub notifications_mobile: bool,
    pub notifications_email: bool,
    pub notifications_sound: bool,
    pub notifications_payment: bool,
    pub notifications_security: bool,
    pub notifications_promotions: bool,
    pub theme: String,
    pub font_size: String,
    pub language: String,
    pub date_format: String,
    pub currency: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
