use std::collections::{HashMap, VecDeque};

/// Model responses keyed by the exact prompt text.
///
/// With `max_entries == 0` nothing is ever evicted; otherwise the oldest
/// inserted prompt goes first once the bound is reached.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: HashMap<String, String>,
    order: VecDeque<String>,
    max_entries: usize,
    hits: u64,
    misses: u64,
}

impl ResponseCache {
    pub fn new(max_entries: usize) -> Self {
        ResponseCache {
            max_entries,
            ..Default::default()
        }
    }

    pub fn get(&mut self, prompt: &str) -> Option<&str> {
        match self.entries.get(prompt) {
            Some(response) => {
                self.hits += 1;
                Some(response.as_str())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, prompt: String, response: String) {
        if self.entries.contains_key(&prompt) {
            self.entries.insert(prompt, response);
            return;
        }

        if self.max_entries > 0 && self.entries.len() >= self.max_entries {
            if let Some(oldest) = self.order.pop_front() {
                log::debug!("Evicting cached response ({} prompt chars)", oldest.chars().count());
                self.entries.remove(&oldest);
            }
        }

        self.order.push_back(prompt.clone());
        self.entries.insert(prompt, response);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
