use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recommended_mixes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub mix_id: i32,
    pub priority: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::mixes::Entity",
        from = "Column::MixId",
        to = "super::mixes::Column::Id",
        on_delete = "Cascade"
    )]
    Mixes,
}

impl Related<super::mixes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mixes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
