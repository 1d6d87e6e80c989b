use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::domain::{Event, EventRepository, NewEvent};
use crate::shared::error::AppError;

#[derive(Default)]
pub struct InMemoryEventRepository {
    events: RwLock<HashMap<i64, Event>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AppError> {
        Ok(self.events.read().get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Event>, AppError> {
        let mut events: Vec<Event> = self
            .events
            .read()
            .values()
            .filter(|e| e.owner_id == owner_id)
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.created_at, e.id));
        Ok(events)
    }

    async fn create(&self, event: NewEvent) -> Result<Event, AppError> {
        let mut events = self.events.write();
        if events.contains_key(&event.id) {
            return Err(AppError::Persistence(format!("Event {} already exists", event.id)));
        }

        let event = event.into_event(Utc::now());
        events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        let mut events = self.events.write();
        let stored = events
            .get_mut(&event.id)
            .ok_or_else(|| AppError::NotFound(format!("Event {}", event.id)))?;

        stored.title = event.title.clone();
        stored.description = event.description.clone();
        stored.date = event.date;
        stored.image_url = event.image_url.clone();
        stored.updated_at = event.updated_at;

        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.events.write().remove(&id).is_some())
    }
}
