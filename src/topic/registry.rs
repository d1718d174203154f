//! C1: topic registry (spec.md S4.1). The registry's own `RwLock` is the
//! client level of the hierarchy (spec.md S5). Removing an entry only
//! drops the registry's handle; a topic whose messages are still in
//! flight, or that an application still holds a `Topic` for, survives
//! until the last `Arc` goes away -- `Arc` gives us the keep/destroy
//! semantics spec.md's refcounting model describes for free, so there's
//! no separate counter to maintain by hand.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::config::{validate_topic_name, TopicConfig};
use crate::errors::Result;
use crate::lock_order::{self, Level};

use super::state::{TopicInner, TopicRef};

#[derive(Default)]
pub struct TopicRegistry {
    topics: RwLock<HashMap<String, TopicRef>>,
}

impl TopicRegistry {
    pub fn new() -> Self {
        TopicRegistry::default()
    }

    pub fn find(&self, name: &str) -> Option<TopicRef> {
        let _t = lock_order::enter(Level::Client);
        self.topics.read().get(name).cloned()
    }

    pub fn find_or_create(&self, name: &str, config: TopicConfig) -> Result<TopicRef> {
        validate_topic_name(name)?;
        if let Some(existing) = self.find(name) {
            return Ok(existing);
        }
        let _t = lock_order::enter(Level::Client);
        let mut topics = self.topics.write();
        Ok(topics
            .entry(name.to_owned())
            .or_insert_with(|| TopicInner::new(name.to_owned(), config))
            .clone())
    }

    pub fn release(&self, name: &str) {
        let _t = lock_order::enter(Level::Client);
        self.topics.write().remove(name);
    }

    pub fn all(&self) -> Vec<TopicRef> {
        let _t = lock_order::enter(Level::Client);
        self.topics.read().values().cloned().collect()
    }
}
