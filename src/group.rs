// ===============================
// src/group.rs (group creation drafts)
// ===============================
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::MemberId;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Invitees by e-mail; the ledger resolves them to member ids.
    #[serde(default)]
    pub emails: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    #[error("Group name cannot be empty.")]
    NameRequired,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub create_time: DateTime<Utc>,
    pub creator_id: MemberId,
    pub member_ids: Vec<MemberId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCreatePayload { pub room_dto: RoomDto, pub emails: Vec<String> }

impl GroupDraft {
    /// Adds a trimmed address; blanks and duplicates are ignored.
    pub fn add_email(&mut self, raw: &str) -> bool {
        let email = raw.trim();
        if email.is_empty() || self.emails.iter().any(|e| e == email) {
            return false;
        }
        self.emails.push(email.to_string());
        true
    }

    pub fn remove_email(&mut self, email: &str) {
        self.emails.retain(|e| e != email);
    }

    pub fn validate(&self, creator_id: MemberId, created_at: DateTime<Utc>) -> Result<GroupCreatePayload, GroupError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(GroupError::NameRequired);
        }
        // Draft dari file bisa berisi duplikat, dedup lagi di sini
        let mut emails: Vec<String> = Vec::with_capacity(self.emails.len());
        for e in self.emails.iter().map(|e| e.trim()).filter(|e| !e.is_empty()) {
            if !emails.iter().any(|x| x == e) {
                emails.push(e.to_string());
            }
        }
        Ok(GroupCreatePayload {
            room_dto: RoomDto {
                id: None,
                name: name.to_string(),
                description: self.description.clone(),
                create_time: created_at,
                creator_id,
                member_ids: Vec::new(),
            },
            emails,
        })
    }
}
