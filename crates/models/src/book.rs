use sea_orm::{entity::prelude::*, sea_query::Expr, ActiveValue::NotSet, ConnectionTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// A persisted book. `id` is assigned by the database on insert.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "book")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub author: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub type Book = Model;

/// Book as received from a client or a fixture: `id` is absent before creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInput {
    #[serde(default)]
    pub id: Option<i32>,
    pub title: String,
    pub author: String,
}

impl BookInput {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self { id: None, title: title.into(), author: author.into() }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }
}

impl From<Model> for BookInput {
    fn from(m: Model) -> Self {
        Self { id: Some(m.id), title: m.title, author: m.author }
    }
}

impl From<&BookInput> for ActiveModel {
    fn from(input: &BookInput) -> Self {
        ActiveModel {
            id: input.id.map(Set).unwrap_or(NotSet),
            title: Set(input.title.clone()),
            author: Set(input.author.clone()),
        }
    }
}

/// Insert a row. Without an id the database assigns the next one.
pub async fn insert<C: ConnectionTrait>(db: &C, input: &BookInput) -> Result<Model, ModelError> {
    ActiveModel::from(input).insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

/// Replace title and author of an existing row.
pub async fn overwrite<C: ConnectionTrait>(db: &C, id: i32, input: &BookInput) -> Result<Model, ModelError> {
    let am = ActiveModel { id: Set(id), title: Set(input.title.clone()), author: Set(input.author.clone()) };
    am.update(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

/// Overwrite title and author only if the row exists; never inserts.
/// `None` when no row has that id.
pub async fn update_existing<C: ConnectionTrait>(db: &C, id: i32, input: &BookInput) -> Result<Option<Model>, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Title, Expr::value(input.title.clone()))
        .col_expr(Column::Author, Expr::value(input.author.clone()))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    if res.rows_affected == 0 {
        return Ok(None);
    }
    find_by_id(db, id).await
}

/// Insert when `id` is absent or unknown, otherwise overwrite the row in place.
pub async fn upsert<C: ConnectionTrait>(db: &C, input: &BookInput) -> Result<Model, ModelError> {
    match input.id {
        Some(id) if find_by_id(db, id).await?.is_some() => overwrite(db, id, input).await,
        _ => insert(db, input).await,
    }
}

/// All rows in primary-key order.
pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, ModelError> {
    Entity::find().order_by_asc(Column::Id).all(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, ModelError> {
    Entity::find_by_id(id).one(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

/// Returns whether a row was removed.
pub async fn delete_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await.map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}
