//! Expense categories.
//!
//! Category names are denormalized onto expenses as plain strings, so a
//! rename cascades to every expense in the same scope (see
//! [`crate::ops`]). Names are stored trimmed; uniqueness is enforced
//! case-insensitively at the service boundary, at most
//! [`CATEGORY_LIMIT`] per scope.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Scope};

/// Maximum number of categories a scope may hold.
pub const CATEGORY_LIMIT: usize = 10;

/// Default categories seeded into a fresh scope, `(english, burmese)`.
pub const DEFAULT_CATEGORIES: [(&str, &str); 5] = [
    ("Food", "အစားအသောက်"),
    ("Transportation", "သယ်ယူပို့ဆောင်ရေး"),
    ("Utilities", "အသုံးစရိတ်"),
    ("Entertainment", "ဖျော်ဖြေရေး"),
    ("Shopping", "စျေးဝယ်"),
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub scope: Scope,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub scope_kind: String,
    pub scope_id: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Category> for ActiveModel {
    fn from(category: &Category) -> Self {
        Self {
            id: ActiveValue::Set(category.id.to_string()),
            scope_kind: ActiveValue::Set(category.scope.kind().to_string()),
            scope_id: ActiveValue::Set(category.scope.id().to_string()),
            name: ActiveValue::Set(category.name.clone()),
        }
    }
}

impl TryFrom<Model> for Category {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("category not exists".to_string()))?,
            scope: Scope::from_parts(&model.scope_kind, &model.scope_id)?,
            name: model.name,
        })
    }
}
