use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::categories::{self, CATEGORY_LIMIT, Category, DEFAULT_CATEGORIES};
use crate::expenses;
use crate::feed::RecordKind;
use crate::{EngineError, ResultEngine, Scope};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    pub async fn list_categories(&self, uid: &str) -> ResultEngine<Vec<Category>> {
        let scope = self.resolve_scope(uid).await?;
        let models = categories::Entity::find()
            .filter(categories::Column::ScopeKind.eq(scope.kind()))
            .filter(categories::Column::ScopeId.eq(scope.id()))
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?;
        models.into_iter().map(Category::try_from).collect()
    }

    /// Adds a category: trimmed, unique case-insensitively within the
    /// scope, at most [`CATEGORY_LIMIT`] per scope.
    pub async fn add_category(&self, uid: &str, name: &str) -> ResultEngine<Category> {
        let name = normalize_required_text(name, "category name")?;
        let category = with_tx!(self, |db_tx| {
            async {
                let scope = self.scoped_profile_on(&db_tx, uid).await?.1;
                let existing = categories_in_scope(&db_tx, &scope).await?;
                if existing
                    .iter()
                    .any(|model| model.name.eq_ignore_ascii_case(&name))
                {
                    return Err(EngineError::DuplicateCategory(name.clone()));
                }
                if existing.len() >= CATEGORY_LIMIT {
                    return Err(EngineError::CategoryLimitExceeded(CATEGORY_LIMIT));
                }

                let category = Category {
                    id: Uuid::new_v4(),
                    scope,
                    name,
                };
                categories::ActiveModel::from(&category).insert(&db_tx).await?;
                Ok(category)
            }
            .await
        })?;
        self.feed.publish(category.scope.clone(), RecordKind::Category);
        Ok(category)
    }

    /// Renames a category and cascades the new name to every expense in
    /// the scope still carrying the old one, atomically. Zero matching
    /// expenses is a successful no-op for the cascade.
    pub async fn rename_category(
        &self,
        uid: &str,
        id: Uuid,
        new_name: &str,
    ) -> ResultEngine<Category> {
        let new_name = normalize_required_text(new_name, "category name")?;
        let category = with_tx!(self, |db_tx| {
            async {
                let scope = self.scoped_profile_on(&db_tx, uid).await?.1;
                let model = find_in_scope(&db_tx, &scope, id).await?;
                let old_name = model.name.clone();

                let existing = categories_in_scope(&db_tx, &scope).await?;
                if existing
                    .iter()
                    .any(|other| other.id != model.id && other.name.eq_ignore_ascii_case(&new_name))
                {
                    return Err(EngineError::DuplicateCategory(new_name.clone()));
                }

                let mut active: categories::ActiveModel = model.into();
                active.name = ActiveValue::Set(new_name.clone());
                let renamed = Category::try_from(active.update(&db_tx).await?)?;

                expenses::Entity::update_many()
                    .col_expr(expenses::Column::Category, Expr::value(new_name.clone()))
                    .filter(expenses::Column::ScopeKind.eq(scope.kind()))
                    .filter(expenses::Column::ScopeId.eq(scope.id()))
                    .filter(expenses::Column::Category.eq(old_name))
                    .exec(&db_tx)
                    .await?;

                Ok(renamed)
            }
            .await
        })?;
        self.feed.publish(category.scope.clone(), RecordKind::Category);
        Ok(category)
    }

    /// Deletes a category. Refused while any expense in the scope still
    /// references it.
    pub async fn remove_category(&self, uid: &str, id: Uuid) -> ResultEngine<()> {
        let scope = with_tx!(self, |db_tx| {
            async {
                let scope = self.scoped_profile_on(&db_tx, uid).await?.1;
                let model = find_in_scope(&db_tx, &scope, id).await?;

                let in_use = expenses::Entity::find()
                    .filter(expenses::Column::ScopeKind.eq(scope.kind()))
                    .filter(expenses::Column::ScopeId.eq(scope.id()))
                    .filter(expenses::Column::Category.eq(model.name.clone()))
                    .count(&db_tx)
                    .await?;
                if in_use > 0 {
                    return Err(EngineError::CategoryInUse(model.name));
                }

                categories::Entity::delete_by_id(model.id).exec(&db_tx).await?;
                Ok(scope)
            }
            .await
        })?;
        self.feed.publish(scope, RecordKind::Category);
        Ok(())
    }

    /// Seeds the language-dependent default categories into a fresh
    /// scope, skipping names already present.
    pub(super) async fn seed_default_categories(
        &self,
        db_tx: &DatabaseTransaction,
        scope: &Scope,
        language: &str,
    ) -> ResultEngine<()> {
        let existing = categories_in_scope(db_tx, scope).await?;
        for (english, burmese) in DEFAULT_CATEGORIES {
            let name = if language == "my" { burmese } else { english };
            if existing
                .iter()
                .any(|model| model.name.eq_ignore_ascii_case(name))
            {
                continue;
            }
            let category = Category {
                id: Uuid::new_v4(),
                scope: scope.clone(),
                name: name.to_string(),
            };
            categories::ActiveModel::from(&category).insert(db_tx).await?;
        }
        Ok(())
    }
}

async fn categories_in_scope<C: ConnectionTrait>(
    db: &C,
    scope: &Scope,
) -> ResultEngine<Vec<categories::Model>> {
    Ok(categories::Entity::find()
        .filter(categories::Column::ScopeKind.eq(scope.kind()))
        .filter(categories::Column::ScopeId.eq(scope.id()))
        .all(db)
        .await?)
}

async fn find_in_scope<C: ConnectionTrait>(
    db: &C,
    scope: &Scope,
    id: Uuid,
) -> ResultEngine<categories::Model> {
    categories::Entity::find_by_id(id.to_string())
        .filter(categories::Column::ScopeKind.eq(scope.kind()))
        .filter(categories::Column::ScopeId.eq(scope.id()))
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))
}
