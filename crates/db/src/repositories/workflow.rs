//! Workflow repository for templates and running instances.
//!
//! State transitions are decided by `WorkflowService`; this repository only
//! loads the row under a lock, applies the returned `WorkflowAction`, and saves.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use hearth_core::customization::{CustomFieldError, EntityType};
use hearth_core::workflow::{
    StepCompletion, WorkflowAction, WorkflowError, WorkflowService, WorkflowStatus, WorkflowStep,
};
use hearth_shared::AppError;

use crate::entities::{
    sea_orm_active_enums::WorkflowStatus as DbWorkflowStatus, workflow_instances,
    workflow_templates,
};

/// Error types for workflow persistence.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowRepositoryError {
    /// Template not found.
    #[error("Workflow template not found: {0}")]
    TemplateNotFound(Uuid),

    /// Instance not found.
    #[error("Workflow instance not found: {0}")]
    InstanceNotFound(Uuid),

    /// Stored steps or completions could not be decoded.
    #[error("Corrupt workflow data: {0}")]
    Corrupt(String),

    /// Entity type not recognised.
    #[error(transparent)]
    EntityType(#[from] CustomFieldError),

    /// Rejected by the workflow rules.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<WorkflowRepositoryError> for AppError {
    fn from(err: WorkflowRepositoryError) -> Self {
        match err {
            WorkflowRepositoryError::TemplateNotFound(_)
            | WorkflowRepositoryError::InstanceNotFound(_) => Self::NotFound(err.to_string()),
            WorkflowRepositoryError::Corrupt(msg) => Self::Internal(msg),
            WorkflowRepositoryError::EntityType(e) => e.into(),
            WorkflowRepositoryError::Workflow(e) => e.into(),
            WorkflowRepositoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a workflow template.
#[derive(Debug, Clone)]
pub struct CreateTemplateInput {
    /// Template name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Entity type instances attach to.
    pub entity_type: EntityType,
    /// Ordered steps.
    pub steps: Vec<WorkflowStep>,
}

/// Input for updating a workflow template.
#[derive(Debug, Clone, Default)]
pub struct UpdateTemplateInput {
    /// New name.
    pub name: Option<String>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// Replacement steps. Running instances keep their step index.
    pub steps: Option<Vec<WorkflowStep>>,
}

/// Filter for listing instances.
#[derive(Debug, Clone, Default)]
pub struct InstanceFilter {
    /// Restrict to one template.
    pub template_id: Option<Uuid>,
    /// Restrict to one entity type.
    pub entity_type: Option<EntityType>,
    /// Restrict to one entity.
    pub entity_id: Option<Uuid>,
    /// Restrict to one status.
    pub status: Option<WorkflowStatus>,
}

/// Workflow repository.
#[derive(Debug, Clone)]
pub struct WorkflowRepository {
    db: DatabaseConnection,
}

impl WorkflowRepository {
    /// Creates a new workflow repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========================================================================
    // Templates
    // ========================================================================

    /// Creates a template after validating its steps.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is invalid or the insert fails.
    pub async fn create_template(
        &self,
        created_by: Uuid,
        input: CreateTemplateInput,
    ) -> Result<workflow_templates::Model, WorkflowRepositoryError> {
        WorkflowService::validate_template(&input.name, &input.steps)?;

        let now = Utc::now().into();
        let template = workflow_templates::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            description: Set(input.description),
            entity_type: Set(input.entity_type.as_str().to_string()),
            steps: Set(steps_to_json(&input.steps)?),
            is_active: Set(true),
            created_by: Set(Some(created_by)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = template.insert(&self.db).await?;
        tracing::info!(template_id = %created.id, steps = input.steps.len(), "Workflow template created");
        Ok(created)
    }

    /// Lists templates, active only unless `include_inactive`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_templates(
        &self,
        entity_type: Option<EntityType>,
        include_inactive: bool,
    ) -> Result<Vec<workflow_templates::Model>, DbErr> {
        let mut query = workflow_templates::Entity::find().order_by_asc(workflow_templates::Column::Name);
        if let Some(entity_type) = entity_type {
            query = query.filter(workflow_templates::Column::EntityType.eq(entity_type.as_str()));
        }
        if !include_inactive {
            query = query.filter(workflow_templates::Column::IsActive.eq(true));
        }
        query.all(&self.db).await
    }

    /// Finds a template by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_template(&self, id: Uuid) -> Result<Option<workflow_templates::Model>, DbErr> {
        workflow_templates::Entity::find_by_id(id).one(&self.db).await
    }

    /// Updates a template's name, description, or steps.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is missing or the update is invalid.
    pub async fn update_template(
        &self,
        id: Uuid,
        input: UpdateTemplateInput,
    ) -> Result<workflow_templates::Model, WorkflowRepositoryError> {
        let template = self
            .find_template(id)
            .await?
            .ok_or(WorkflowRepositoryError::TemplateNotFound(id))?;

        let name = input.name.unwrap_or_else(|| template.name.clone());
        let steps = match input.steps {
            Some(steps) => steps,
            None => steps_from_json(&template.steps)?,
        };
        WorkflowService::validate_template(&name, &steps)?;

        let mut active: workflow_templates::ActiveModel = template.into();
        active.name = Set(name.trim().to_string());
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        active.steps = Set(steps_to_json(&steps)?);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deactivates a template. Running instances are left as they are.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is missing or the update fails.
    pub async fn deactivate_template(
        &self,
        id: Uuid,
    ) -> Result<workflow_templates::Model, WorkflowRepositoryError> {
        let template = self
            .find_template(id)
            .await?
            .ok_or(WorkflowRepositoryError::TemplateNotFound(id))?;

        let mut active: workflow_templates::ActiveModel = template.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    // ========================================================================
    // Instances
    // ========================================================================

    /// Starts an instance of an active template against an entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is missing or inactive, or if the
    /// entity type does not match the template's.
    pub async fn start_instance(
        &self,
        template_id: Uuid,
        entity_id: Uuid,
        started_by: Uuid,
    ) -> Result<workflow_instances::Model, WorkflowRepositoryError> {
        let template = self
            .find_template(template_id)
            .await?
            .ok_or(WorkflowRepositoryError::TemplateNotFound(template_id))?;

        let steps = steps_from_json(&template.steps)?;
        WorkflowService::start(template.is_active, &steps)?;

        let now = Utc::now().into();
        let instance = workflow_instances::ActiveModel {
            id: Set(Uuid::new_v4()),
            template_id: Set(template.id),
            entity_type: Set(template.entity_type),
            entity_id: Set(entity_id),
            status: Set(DbWorkflowStatus::Active),
            current_step: Set(0),
            step_completions: Set(serde_json::Value::Array(Vec::new())),
            started_by: Set(Some(started_by)),
            completed_at: Set(None),
            cancelled_at: Set(None),
            cancelled_by: Set(None),
            cancel_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = instance.insert(&self.db).await?;
        tracing::info!(
            instance_id = %created.id,
            template_id = %template_id,
            entity_id = %entity_id,
            "Workflow instance started"
        );
        Ok(created)
    }

    /// Lists instances, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_instances(
        &self,
        filter: &InstanceFilter,
    ) -> Result<Vec<workflow_instances::Model>, DbErr> {
        let mut query =
            workflow_instances::Entity::find().order_by_desc(workflow_instances::Column::CreatedAt);
        if let Some(template_id) = filter.template_id {
            query = query.filter(workflow_instances::Column::TemplateId.eq(template_id));
        }
        if let Some(entity_type) = filter.entity_type {
            query = query.filter(workflow_instances::Column::EntityType.eq(entity_type.as_str()));
        }
        if let Some(entity_id) = filter.entity_id {
            query = query.filter(workflow_instances::Column::EntityId.eq(entity_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(workflow_instances::Column::Status.eq(DbWorkflowStatus::from(status)));
        }
        query.all(&self.db).await
    }

    /// Finds an instance by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_instance(&self, id: Uuid) -> Result<Option<workflow_instances::Model>, DbErr> {
        workflow_instances::Entity::find_by_id(id).one(&self.db).await
    }

    /// Completes the instance's current step.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance is missing or no longer active.
    pub async fn advance_instance(
        &self,
        id: Uuid,
        completed_by: Uuid,
        notes: Option<String>,
    ) -> Result<workflow_instances::Model, WorkflowRepositoryError> {
        let txn = self.db.begin().await?;

        let instance = workflow_instances::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(WorkflowRepositoryError::InstanceNotFound(id))?;
        let template = workflow_templates::Entity::find_by_id(instance.template_id)
            .one(&txn)
            .await?
            .ok_or(WorkflowRepositoryError::TemplateNotFound(instance.template_id))?;

        let steps = steps_from_json(&template.steps)?;
        let current_step = usize::try_from(instance.current_step)
            .map_err(|_| WorkflowRepositoryError::Corrupt("negative current_step".to_string()))?;
        let action = WorkflowService::advance(
            instance.status.into(),
            current_step,
            &steps,
            completed_by,
            notes,
        )?;

        let updated = apply_action(instance, action)?.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            instance_id = %id,
            status = %WorkflowStatus::from(updated.status),
            current_step = updated.current_step,
            "Workflow step completed"
        );
        Ok(updated)
    }

    /// Cancels an active instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance is missing or no longer active.
    pub async fn cancel_instance(
        &self,
        id: Uuid,
        cancelled_by: Uuid,
        reason: Option<String>,
    ) -> Result<workflow_instances::Model, WorkflowRepositoryError> {
        let txn = self.db.begin().await?;

        let instance = workflow_instances::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(WorkflowRepositoryError::InstanceNotFound(id))?;

        let action = WorkflowService::cancel(instance.status.into(), cancelled_by, reason)?;
        let updated = apply_action(instance, action)?.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(instance_id = %id, cancelled_by = %cancelled_by, "Workflow instance cancelled");
        Ok(updated)
    }
}

/// Decodes a template's stored steps.
pub fn steps_from_json(value: &serde_json::Value) -> Result<Vec<WorkflowStep>, WorkflowRepositoryError> {
    serde_json::from_value(value.clone()).map_err(|e| WorkflowRepositoryError::Corrupt(e.to_string()))
}

fn steps_to_json(steps: &[WorkflowStep]) -> Result<serde_json::Value, WorkflowRepositoryError> {
    serde_json::to_value(steps).map_err(|e| WorkflowRepositoryError::Corrupt(e.to_string()))
}

fn apply_action(
    instance: workflow_instances::Model,
    action: WorkflowAction,
) -> Result<workflow_instances::ActiveModel, WorkflowRepositoryError> {
    let now = Utc::now();
    let mut active: workflow_instances::ActiveModel = instance.clone().into();
    active.status = Set(action.new_status().into());
    active.updated_at = Set(now.into());

    match action {
        WorkflowAction::Advance {
            new_status,
            new_step,
            completion,
        } => {
            let mut completions: Vec<StepCompletion> =
                serde_json::from_value(instance.step_completions)
                    .map_err(|e| WorkflowRepositoryError::Corrupt(e.to_string()))?;
            completions.push(completion);

            active.step_completions = Set(serde_json::to_value(&completions)
                .map_err(|e| WorkflowRepositoryError::Corrupt(e.to_string()))?);
            active.current_step = Set(i32::try_from(new_step)
                .map_err(|_| WorkflowRepositoryError::Corrupt("step index overflow".to_string()))?);
            if new_status == WorkflowStatus::Completed {
                active.completed_at = Set(Some(now.into()));
            }
        }
        WorkflowAction::Cancel {
            cancelled_by,
            cancelled_at,
            reason,
            ..
        } => {
            active.cancelled_at = Set(Some(cancelled_at.into()));
            active.cancelled_by = Set(Some(cancelled_by));
            active.cancel_reason = Set(reason);
        }
    }

    Ok(active)
}
