//! Storage seam behind [`TaskService`](crate::service::TaskService).

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Error;
use taskflow_core::id::TaskId;
use taskflow_core::task::Task;

/// Minimal storage abstraction required by the task service.
pub trait TaskStore {
    /// Error type bubbled up from the backing store.
    type Error: Into<Error>;

    /// Persist a new task.
    ///
    /// # Errors
    /// Returns a store-specific error when the write fails.
    fn insert(&self, task: Task) -> Result<(), Self::Error>;

    /// Load a task by identifier.
    ///
    /// # Errors
    /// Returns a store-specific error when the read fails.
    fn get(&self, id: TaskId) -> Result<Option<Task>, Self::Error>;

    /// Modify a stored task in place and return the result. Returns `None`
    /// when the task is unknown.
    ///
    /// No other write to the same store may interleave between reading the
    /// task and storing the modified copy.
    ///
    /// # Errors
    /// Returns a store-specific error when the write fails.
    fn update<F>(&self, id: TaskId, apply: F) -> Result<Option<Task>, Self::Error>
    where
        F: FnOnce(&mut Task);

    /// Remove a task. Returns `false` when the task is unknown.
    ///
    /// # Errors
    /// Returns a store-specific error when the write fails.
    fn remove(&self, id: TaskId) -> Result<bool, Self::Error>;

    /// Enumerate every stored task, in no particular order.
    ///
    /// # Errors
    /// Returns a store-specific error when listing fails.
    fn list(&self) -> Result<Vec<Task>, Self::Error>;
}

/// Process-local task storage. Contents vanish on restart.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: Mutex<BTreeMap<TaskId, Task>>,
}

impl MemoryTaskStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tasks(&self) -> MutexGuard<'_, BTreeMap<TaskId, Task>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TaskStore for MemoryTaskStore {
    type Error = Infallible;

    fn insert(&self, task: Task) -> Result<(), Self::Error> {
        self.tasks().insert(task.id, task);
        Ok(())
    }

    fn get(&self, id: TaskId) -> Result<Option<Task>, Self::Error> {
        Ok(self.tasks().get(&id).cloned())
    }

    fn update<F>(&self, id: TaskId, apply: F) -> Result<Option<Task>, Self::Error>
    where
        F: FnOnce(&mut Task),
    {
        let mut tasks = self.tasks();
        Ok(tasks.get_mut(&id).map(|task| {
            apply(task);
            task.clone()
        }))
    }

    fn remove(&self, id: TaskId) -> Result<bool, Self::Error> {
        Ok(self.tasks().remove(&id).is_some())
    }

    fn list(&self) -> Result<Vec<Task>, Self::Error> {
        Ok(self.tasks().values().cloned().collect())
    }
}

impl<S: TaskStore> TaskStore for std::sync::Arc<S> {
    type Error = S::Error;

    fn insert(&self, task: Task) -> Result<(), Self::Error> {
        (**self).insert(task)
    }

    fn get(&self, id: TaskId) -> Result<Option<Task>, Self::Error> {
        (**self).get(id)
    }

    fn update<F>(&self, id: TaskId, apply: F) -> Result<Option<Task>, Self::Error>
    where
        F: FnOnce(&mut Task),
    {
        (**self).update(id, apply)
    }

    fn remove(&self, id: TaskId) -> Result<bool, Self::Error> {
        (**self).remove(id)
    }

    fn list(&self) -> Result<Vec<Task>, Self::Error> {
        (**self).list()
    }
}
