//! Root shell: owns the collection and wires the form and the list together.

use std::time::Instant;

use crate::client::TodoClient;
use crate::collection::{Insertion, TodoCollection};
use crate::form::TodoForm;
use crate::http::Transport;
use crate::list::{ListView, TodoList};
use crate::row::RowEvent;
use crate::types::TodoId;

#[derive(Debug)]
pub struct TodoApp {
    client: TodoClient,
    todos: TodoCollection,
    list: TodoList,
    form: TodoForm,
}

impl TodoApp {
    pub fn new(client: TodoClient, insertion: Insertion) -> Self {
        Self {
            client,
            todos: TodoCollection::new(insertion),
            list: TodoList::new(),
            form: TodoForm::new(),
        }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub fn todos(&self) -> &TodoCollection {
        &self.todos
    }

    pub fn list(&self) -> &TodoList {
        &self.list
    }

    pub fn form(&self) -> &TodoForm {
        &self.form
    }

    pub fn view(&self) -> ListView<'_> {
        self.list.view(&self.todos)
    }

    /// Initial load.
    pub fn mount<T: Transport>(&mut self, transport: &T, now: Instant) -> bool {
        self.list
            .load(&self.client, transport, &mut self.todos, false, now)
    }

    pub fn refresh<T: Transport>(&mut self, transport: &T, now: Instant) -> bool {
        self.list
            .load(&self.client, transport, &mut self.todos, true, now)
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.form.set_input(text);
    }

    /// Submit the form. Returns the id of the created todo.
    pub fn submit<T: Transport>(&mut self, transport: &T, now: Instant) -> Option<TodoId> {
        let todo = self.form.submit(&self.client, transport, now)?;
        let id = todo.id.clone();
        self.todos.insert(todo);
        Some(id)
    }

    /// Complete the todo with `id`. Returns whether the collection changed.
    pub fn complete<T: Transport>(&mut self, transport: &T, id: &TodoId, now: Instant) -> bool {
        let Some(todo) = self.todos.get(id).cloned() else {
            tracing::warn!(%id, "complete requested for unknown todo");
            return false;
        };
        let event = self
            .list
            .row_mut(id)
            .complete(&self.client, transport, &todo, now);
        self.apply(event)
    }

    /// Delete the todo with `id`. Returns whether the collection changed.
    pub fn delete<T: Transport>(&mut self, transport: &T, id: &TodoId, now: Instant) -> bool {
        let Some(todo) = self.todos.get(id).cloned() else {
            tracing::warn!(%id, "delete requested for unknown todo");
            return false;
        };
        let event = self
            .list
            .row_mut(id)
            .delete(&self.client, transport, &todo, now);
        self.apply(event)
    }

    pub fn toggle_completed(&mut self) {
        self.list.toggle_completed();
    }

    /// Expire transient messages.
    pub fn tick(&mut self, now: Instant) {
        self.form.tick(now);
        self.list.tick(now);
    }

    fn apply(&mut self, event: Option<RowEvent>) -> bool {
        match event {
            Some(event) => self.list.apply(&mut self.todos, &event),
            None => false,
        }
    }
}
