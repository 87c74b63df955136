//! Generation log entity, one row per barcode / QR generation attempt

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "generation_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub ip_address: String,
    /// `barcode` or `qrcode`
    pub code_type: String,
    pub barcode_type: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub code_value: String,
    pub image_format: String,
    /// JSON encoded QR rendering options
    #[sea_orm(column_type = "Text", nullable)]
    pub qr_options: Option<String>,
    pub created_at: DateTimeUtc,
    #[sea_orm(column_type = "Text", nullable)]
    pub user_agent: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub debug_headers: Option<String>,
    pub success: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub error_message: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
