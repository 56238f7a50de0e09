use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::ids::IdGenerator;
use crate::models::{Account, Todo, TodoInput, TodoStatus};
use crate::store::TodoStore;

/// Todo list operations for one authenticated account.
///
/// Every call takes the owning `Account`; todos of other accounts are reported as
/// not found rather than forbidden.
pub struct TodoService {
    store: Arc<dyn TodoStore>,
    ids: Arc<dyn IdGenerator>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, ids }
    }

    pub async fn list(&self, owner: &Account) -> Result<Vec<Todo>, AppError> {
        log::info!("fetching todos for email=`{}`", owner.email);
        Ok(self.store.list_by_owner(owner.id).await?)
    }

    pub async fn get(&self, owner: &Account, id: Uuid) -> Result<Todo, AppError> {
        self.store
            .find(owner.id, id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn add(&self, owner: &Account, input: TodoInput) -> Result<Todo, AppError> {
        input.validate()?;
        let todo = Todo::new(self.ids.generate(), input, owner.id);
        log::info!("adding todo id=`{}`", todo.id);
        Ok(self.store.insert(todo).await?)
    }

    pub async fn rename(&self, owner: &Account, id: Uuid, input: TodoInput) -> Result<Todo, AppError> {
        input.validate()?;
        log::info!("updating title for todo id=`{}`", id);
        self.store
            .update_title(owner.id, id, &input.title)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn set_status(
        &self,
        owner: &Account,
        id: Uuid,
        status: TodoStatus,
    ) -> Result<Todo, AppError> {
        log::info!("changing status for todo id=`{}`", id);
        self.store
            .update_status(owner.id, id, status)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, owner: &Account, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete(owner.id, id).await? {
            return Err(not_found(id));
        }
        log::info!("deleted todo id=`{}`", id);
        Ok(())
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Todo with id `{}` does not exist", id))
}
