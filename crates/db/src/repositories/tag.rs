//! Tag repository: tag hierarchy and entity associations.
//!
//! Association changes and the `usage_count` adjustment always run in the
//! same transaction; the counter is updated with SQL expressions rather than
//! read-modify-write.

use sea_orm::sea_query::{Expr, Func, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

use hearth_core::customization::{
    EntityType, TagError, TagNode, TagTreeNode, build_tag_tree, ensure_no_cycle, normalize_color,
    validate_tag_name,
};
use hearth_shared::AppError;

use super::is_unique_violation;
use crate::entities::{entity_tags, tags};

/// Error types for tag operations.
#[derive(Debug, thiserror::Error)]
pub enum TagRepositoryError {
    /// Tag not found (or inactive).
    #[error("Tag not found: {0}")]
    TagNotFound(Uuid),

    /// Parent tag not found (or inactive).
    #[error("Parent tag not found: {0}")]
    ParentNotFound(Uuid),

    /// An active tag already uses the name.
    #[error("Tag '{0}' already exists")]
    DuplicateName(String),

    /// Entity does not carry the tag.
    #[error("Entity is not tagged with {0}")]
    AssociationNotFound(Uuid),

    /// Name, color or hierarchy rule violated.
    #[error(transparent)]
    Invalid(#[from] TagError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<TagRepositoryError> for AppError {
    fn from(err: TagRepositoryError) -> Self {
        match err {
            TagRepositoryError::TagNotFound(_)
            | TagRepositoryError::ParentNotFound(_)
            | TagRepositoryError::AssociationNotFound(_) => Self::NotFound(err.to_string()),
            TagRepositoryError::DuplicateName(_) => Self::Conflict(err.to_string()),
            TagRepositoryError::Invalid(e) => e.into(),
            TagRepositoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a tag.
#[derive(Debug, Clone)]
pub struct CreateTagInput {
    /// Display name.
    pub name: String,
    /// `#RRGGBB` color.
    pub color: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Parent tag.
    pub parent_id: Option<Uuid>,
    /// Creating user.
    pub created_by: Uuid,
}

/// Input for updating a tag.
#[derive(Debug, Clone, Default)]
pub struct UpdateTagInput {
    /// Display name.
    pub name: Option<String>,
    /// Color.
    pub color: Option<Option<String>>,
    /// Description.
    pub description: Option<Option<String>>,
    /// Parent tag.
    pub parent_id: Option<Option<Uuid>>,
}

/// Tag repository.
#[derive(Debug, Clone)]
pub struct TagRepository {
    db: DatabaseConnection,
}

impl TagRepository {
    /// Creates a new tag repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a tag.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name or color is invalid
    /// - An active tag already has the name (case-insensitive)
    /// - The parent does not exist
    pub async fn create(&self, input: CreateTagInput) -> Result<tags::Model, TagRepositoryError> {
        let name = validate_tag_name(&input.name)?;
        let color = input.color.as_deref().map(normalize_color).transpose()?;

        self.ensure_name_free(&name, None).await?;
        if let Some(parent_id) = input.parent_id {
            self.find_active(parent_id)
                .await?
                .ok_or(TagRepositoryError::ParentNotFound(parent_id))?;
        }

        let name_for_conflict = name.clone();
        let now = chrono::Utc::now().into();
        let tag = tags::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            color: Set(color),
            description: Set(input.description),
            parent_id: Set(input.parent_id),
            usage_count: Set(0),
            is_active: Set(true),
            created_by: Set(Some(input.created_by)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = tag
            .insert(&self.db)
            .await
            .map_err(|e| duplicate_name(e, &name_for_conflict))?;
        tracing::info!(tag_id = %created.id, name = %created.name, "Tag created");
        Ok(created)
    }

    /// Lists active tags ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<tags::Model>, DbErr> {
        tags::Entity::find()
            .filter(tags::Column::IsActive.eq(true))
            .order_by_asc(tags::Column::Name)
            .all(&self.db)
            .await
    }

    /// Returns active tags as a forest.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn tree(&self) -> Result<Vec<TagTreeNode>, DbErr> {
        let nodes = self.list().await?.into_iter().map(to_node).collect();
        Ok(build_tag_tree(nodes))
    }

    /// Finds an active tag by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_active(&self, id: Uuid) -> Result<Option<tags::Model>, DbErr> {
        tags::Entity::find_by_id(id)
            .filter(tags::Column::IsActive.eq(true))
            .one(&self.db)
            .await
    }

    /// Updates a tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag is missing, the new name clashes, or the
    /// new parent would create a cycle.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateTagInput,
    ) -> Result<tags::Model, TagRepositoryError> {
        let tag = self
            .find_active(id)
            .await?
            .ok_or(TagRepositoryError::TagNotFound(id))?;

        let mut active: tags::ActiveModel = tag.into();

        let mut renamed_to = None;
        if let Some(name) = input.name {
            let name = validate_tag_name(&name)?;
            self.ensure_name_free(&name, Some(id)).await?;
            renamed_to = Some(name.clone());
            active.name = Set(name);
        }
        if let Some(color) = input.color {
            active.color = Set(color.as_deref().map(normalize_color).transpose()?);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(parent_id) = input.parent_id {
            if let Some(parent) = parent_id {
                self.find_active(parent)
                    .await?
                    .ok_or(TagRepositoryError::ParentNotFound(parent))?;
            }
            let parents = self.parent_map().await?;
            ensure_no_cycle(id, parent_id, &parents)?;
            active.parent_id = Set(parent_id);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active.update(&self.db).await.map_err(|e| match &renamed_to {
            Some(name) => duplicate_name(e, name),
            None => e.into(),
        })?;
        Ok(updated)
    }

    /// Soft-deletes a tag. Children are re-parented to the tag's parent.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag does not exist.
    pub async fn deactivate(&self, id: Uuid) -> Result<(), TagRepositoryError> {
        let tag = self
            .find_active(id)
            .await?
            .ok_or(TagRepositoryError::TagNotFound(id))?;

        let txn = self.db.begin().await?;
        let now = chrono::Utc::now();

        tags::Entity::update_many()
            .col_expr(tags::Column::ParentId, Expr::value(tag.parent_id))
            .col_expr(tags::Column::UpdatedAt, Expr::value(now))
            .filter(tags::Column::ParentId.eq(id))
            .exec(&txn)
            .await?;

        let mut active: tags::ActiveModel = tag.into();
        active.is_active = Set(false);
        active.updated_at = Set(now.into());
        active.update(&txn).await?;

        txn.commit().await?;
        tracing::info!(tag_id = %id, "Tag deactivated");
        Ok(())
    }

    // ========================================================================
    // Entity associations
    // ========================================================================

    /// Tags an entity. Re-tagging returns the existing link without touching
    /// the usage counter.
    ///
    /// Returns the association and whether it was newly created.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag does not exist or the write fails.
    pub async fn tag_entity(
        &self,
        tag_id: Uuid,
        entity_type: EntityType,
        entity_id: Uuid,
        tagged_by: Uuid,
    ) -> Result<(entity_tags::Model, bool), TagRepositoryError> {
        let txn = self.db.begin().await?;

        tags::Entity::find_by_id(tag_id)
            .filter(tags::Column::IsActive.eq(true))
            .one(&txn)
            .await?
            .ok_or(TagRepositoryError::TagNotFound(tag_id))?;

        let link = entity_tags::ActiveModel {
            id: Set(Uuid::new_v4()),
            tag_id: Set(tag_id),
            entity_type: Set(entity_type.as_str().to_string()),
            entity_id: Set(entity_id),
            tagged_by: Set(Some(tagged_by)),
            created_at: Set(chrono::Utc::now().into()),
        };

        let inserted = entity_tags::Entity::insert(link)
            .on_conflict(
                OnConflict::columns([
                    entity_tags::Column::TagId,
                    entity_tags::Column::EntityType,
                    entity_tags::Column::EntityId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

        if inserted > 0 {
            tags::Entity::update_many()
                .col_expr(
                    tags::Column::UsageCount,
                    Expr::col(tags::Column::UsageCount).add(1),
                )
                .filter(tags::Column::Id.eq(tag_id))
                .exec(&txn)
                .await?;
        }

        let stored = entity_tags::Entity::find()
            .filter(entity_tags::Column::TagId.eq(tag_id))
            .filter(entity_tags::Column::EntityType.eq(entity_type.as_str()))
            .filter(entity_tags::Column::EntityId.eq(entity_id))
            .one(&txn)
            .await?
            .ok_or(TagRepositoryError::AssociationNotFound(tag_id))?;

        txn.commit().await?;
        Ok((stored, inserted > 0))
    }

    /// Removes a tag from an entity and decrements the usage counter, floored at zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity does not carry the tag.
    pub async fn untag_entity(
        &self,
        tag_id: Uuid,
        entity_type: EntityType,
        entity_id: Uuid,
    ) -> Result<(), TagRepositoryError> {
        let txn = self.db.begin().await?;

        let deleted = entity_tags::Entity::delete_many()
            .filter(entity_tags::Column::TagId.eq(tag_id))
            .filter(entity_tags::Column::EntityType.eq(entity_type.as_str()))
            .filter(entity_tags::Column::EntityId.eq(entity_id))
            .exec(&txn)
            .await?;

        if deleted.rows_affected == 0 {
            return Err(TagRepositoryError::AssociationNotFound(tag_id));
        }

        tags::Entity::update_many()
            .col_expr(
                tags::Column::UsageCount,
                Expr::cust("GREATEST(usage_count - 1, 0)"),
            )
            .filter(tags::Column::Id.eq(tag_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(())
    }

    /// Lists active tags carried by an entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn tags_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
    ) -> Result<Vec<tags::Model>, DbErr> {
        tags::Entity::find()
            .join(JoinType::InnerJoin, tags::Relation::EntityTags.def())
            .filter(entity_tags::Column::EntityType.eq(entity_type.as_str()))
            .filter(entity_tags::Column::EntityId.eq(entity_id))
            .filter(tags::Column::IsActive.eq(true))
            .order_by_asc(tags::Column::Name)
            .all(&self.db)
            .await
    }

    async fn ensure_name_free(
        &self,
        name: &str,
        except: Option<Uuid>,
    ) -> Result<(), TagRepositoryError> {
        let mut query = tags::Entity::find()
            .filter(tags::Column::IsActive.eq(true))
            .filter(Expr::expr(Func::lower(Expr::col(tags::Column::Name))).eq(name.to_lowercase()));
        if let Some(id) = except {
            query = query.filter(tags::Column::Id.ne(id));
        }
        if query.one(&self.db).await?.is_some() {
            return Err(TagRepositoryError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    async fn parent_map(&self) -> Result<HashMap<Uuid, Option<Uuid>>, DbErr> {
        let rows: Vec<(Uuid, Option<Uuid>)> = tags::Entity::find()
            .select_only()
            .column(tags::Column::Id)
            .column(tags::Column::ParentId)
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().collect())
    }
}

fn duplicate_name(err: DbErr, name: &str) -> TagRepositoryError {
    if is_unique_violation(&err) {
        TagRepositoryError::DuplicateName(name.to_string())
    } else {
        err.into()
    }
}

fn to_node(tag: tags::Model) -> TagNode {
    TagNode {
        id: tag.id,
        parent_id: tag.parent_id,
        name: tag.name,
        color: tag.color,
        usage_count: tag.usage_count,
    }
}
