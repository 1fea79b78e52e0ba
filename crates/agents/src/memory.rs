use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tiptrip_core::Intent;

const MAX_TRACKED_USERS: usize = 4096;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub at: DateTime<Utc>,
    pub user_text: String,
    pub reply_text: String,
    pub intent: Option<Intent>,
}

/// Best-effort, in-process buffer of each user's most recent turns. Never persisted.
#[derive(Debug)]
pub struct ConversationMemory {
    turns: Mutex<HashMap<i64, VecDeque<ConversationTurn>>>,
    capacity: usize,
}

impl ConversationMemory {
    pub fn new(capacity: usize) -> Self {
        Self {
            turns: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    pub fn record(&self, user_id: i64, turn: ConversationTurn) {
        if self.capacity == 0 {
            return;
        }

        let mut guard = self.turns.lock();
        if !guard.contains_key(&user_id) && guard.len() >= MAX_TRACKED_USERS {
            evict_stalest(&mut guard);
        }

        let history = guard.entry(user_id).or_default();
        history.push_back(turn);
        while history.len() > self.capacity {
            history.pop_front();
        }
    }

    pub fn recent(&self, user_id: i64) -> Vec<ConversationTurn> {
        self.turns
            .lock()
            .get(&user_id)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Renders the user's recent turns for inclusion in a prompt.
    pub fn transcript(&self, user_id: i64) -> String {
        self.recent(user_id)
            .iter()
            .map(|turn| format!("Usuario: {}\nAsistente: {}", turn.user_text, turn.reply_text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn evict_stalest(turns: &mut HashMap<i64, VecDeque<ConversationTurn>>) {
    let stalest = turns
        .iter()
        .min_by_key(|(_, history)| history.back().map(|turn| turn.at))
        .map(|(user_id, _)| *user_id);

    if let Some(user_id) = stalest {
        turns.remove(&user_id);
    }
}
