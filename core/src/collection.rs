//! The client-side todo collection.
//!
//! Ordered, with unique ids. It is a cache of the remote store: replaced
//! wholesale by a successful load and patched in place after each
//! acknowledged mutation.

use std::str::FromStr;

use crate::types::{Todo, TodoId};

/// Where newly created todos land in display order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Insertion {
    Prepend,
    #[default]
    Append,
}

impl FromStr for Insertion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prepend" | "top" => Ok(Insertion::Prepend),
            "append" | "bottom" => Ok(Insertion::Append),
            other => Err(format!("unknown insertion order: {other} (expected append or prepend)")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TodoCollection {
    items: Vec<Todo>,
    insertion: Insertion,
}

impl TodoCollection {
    pub fn new(insertion: Insertion) -> Self {
        Self {
            items: Vec::new(),
            insertion,
        }
    }

    pub fn insertion(&self) -> Insertion {
        self.insertion
    }

    /// Replace every item. Later duplicates of an id are dropped.
    pub fn replace_all(&mut self, todos: Vec<Todo>) {
        self.items.clear();
        for todo in todos {
            if self.position(&todo.id).is_none() {
                self.items.push(todo);
            }
        }
    }

    /// Add a todo at the configured end. A todo whose id is already present
    /// replaces the existing entry in place; returns whether it was new.
    pub fn insert(&mut self, todo: Todo) -> bool {
        if let Some(idx) = self.position(&todo.id) {
            self.items[idx] = todo;
            return false;
        }
        match self.insertion {
            Insertion::Prepend => self.items.insert(0, todo),
            Insertion::Append => self.items.push(todo),
        }
        true
    }

    /// Flip the completed flag. Returns `false` if the id is unknown.
    pub fn mark_completed(&mut self, id: &TodoId) -> bool {
        match self.items.iter_mut().find(|t| &t.id == id) {
            Some(todo) => {
                todo.completed = true;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &TodoId) -> Option<Todo> {
        let idx = self.position(id)?;
        Some(self.items.remove(idx))
    }

    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.items.iter().find(|t| &t.id == id)
    }

    pub fn contains(&self, id: &TodoId) -> bool {
        self.position(id).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Todo> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Todo> {
        self.items.iter().filter(|t| !t.completed)
    }

    pub fn completed(&self) -> impl Iterator<Item = &Todo> {
        self.items.iter().filter(|t| t.completed)
    }

    pub fn counts(&self) -> Counts {
        let completed = self.completed().count();
        Counts {
            total: self.items.len(),
            completed,
            pending: self.items.len() - completed,
        }
    }

    fn position(&self, id: &TodoId) -> Option<usize> {
        self.items.iter().position(|t| &t.id == id)
    }
}
