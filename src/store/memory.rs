use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Account, Todo, TodoStatus};
use crate::store::{AccountStore, Result, StoreError, TodoStore};

#[derive(Default)]
struct StoreData {
    accounts: HashMap<String, Account>, // email -> account
    todos: HashMap<Uuid, Todo>,         // todo id -> todo
}

/// In-memory storage (useful for testing).
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<StoreData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts registered under `email`. Always 0 or 1.
    pub async fn count_accounts_with_email(&self, email: &str) -> usize {
        let data = self.data.read().await;
        data.accounts.values().filter(|a| a.email == email).count()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let data = self.data.read().await;
        Ok(data.accounts.get(email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        let data = self.data.read().await;
        Ok(data.accounts.values().find(|a| a.id == id).cloned())
    }

    async fn save(&self, account: Account) -> Result<Account> {
        // Check and insert under the same write lock.
        let mut data = self.data.write().await;
        if data.accounts.contains_key(&account.email) {
            return Err(StoreError::DuplicateEmail(account.email));
        }
        data.accounts.insert(account.email.clone(), account.clone());
        Ok(account)
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Todo>> {
        let data = self.data.read().await;
        let mut todos: Vec<Todo> = data
            .todos
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(todos)
    }

    async fn find(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Todo>> {
        let data = self.data.read().await;
        Ok(data
            .todos
            .get(&id)
            .filter(|t| t.owner_id == owner_id)
            .cloned())
    }

    async fn insert(&self, todo: Todo) -> Result<Todo> {
        let mut data = self.data.write().await;
        data.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn update_title(&self, owner_id: Uuid, id: Uuid, title: &str) -> Result<Option<Todo>> {
        let mut data = self.data.write().await;
        Ok(data
            .todos
            .get_mut(&id)
            .filter(|t| t.owner_id == owner_id)
            .map(|todo| {
                todo.title = title.to_string();
                todo.updated_at = Utc::now();
                todo.clone()
            }))
    }

    async fn update_status(
        &self,
        owner_id: Uuid,
        id: Uuid,
        status: TodoStatus,
    ) -> Result<Option<Todo>> {
        let mut data = self.data.write().await;
        Ok(data
            .todos
            .get_mut(&id)
            .filter(|t| t.owner_id == owner_id)
            .map(|todo| {
                todo.status = status;
                todo.updated_at = Utc::now();
                todo.clone()
            }))
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool> {
        let mut data = self.data.write().await;
        match data.todos.get(&id) {
            Some(todo) if todo.owner_id == owner_id => {
                data.todos.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TodoInput;
    use std::sync::Arc;

    fn todo(owner_id: Uuid, title: &str) -> Todo {
        Todo::new(
            Uuid::new_v4(),
            TodoInput {
                title: title.to_string(),
            },
            owner_id,
        )
    }

    #[actix_rt::test]
    async fn test_save_rejects_duplicate_email() {
        let store = MemoryStore::new();
        store
            .save(Account::new(Uuid::new_v4(), "jhondoe@test.in", "hash"))
            .await
            .unwrap();

        let err = store
            .save(Account::new(Uuid::new_v4(), "jhondoe@test.in", "other"))
            .await
            .unwrap_err();

        assert_eq!(err, StoreError::DuplicateEmail("jhondoe@test.in".into()));
        assert_eq!(store.count_accounts_with_email("jhondoe@test.in").await, 1);
    }

    #[actix_rt::test]
    async fn test_email_lookup_is_case_sensitive() {
        let store = MemoryStore::new();
        let account = Account::new(Uuid::new_v4(), "JhonDoe@test.in", "hash");
        store.save(account.clone()).await.unwrap();

        assert!(store.find_by_email("jhondoe@test.in").await.unwrap().is_none());
        assert_eq!(store.find_by_email("JhonDoe@test.in").await.unwrap(), Some(account.clone()));
        assert_eq!(store.find_by_id(account.id).await.unwrap(), Some(account));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_only_one_wins() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .save(Account::new(Uuid::new_v4(), "race@test.in", "hash"))
                        .await
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.count_accounts_with_email("race@test.in").await, 1);
    }

    #[actix_rt::test]
    async fn test_todos_are_scoped_to_owner() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let saved = store.insert(todo(owner, "mine")).await.unwrap();

        assert!(store.find(stranger, saved.id).await.unwrap().is_none());
        assert!(store.update_title(stranger, saved.id, "x").await.unwrap().is_none());
        assert!(!store.delete(stranger, saved.id).await.unwrap());
        assert!(store.list_by_owner(stranger).await.unwrap().is_empty());

        let renamed = store.update_title(owner, saved.id, "renamed").await.unwrap().unwrap();
        assert_eq!(renamed.title, "renamed");

        let done = store
            .update_status(owner, saved.id, TodoStatus::Completed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(done.status, TodoStatus::Completed);

        assert!(store.delete(owner, saved.id).await.unwrap());
        assert!(store.find(owner, saved.id).await.unwrap().is_none());
    }
}
