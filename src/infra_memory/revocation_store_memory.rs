use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

#[derive(Default)]
pub struct MemoryRevocationStore {
    records: DashMap<String, RevocationRecord>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait::async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn revoke(&self, token: &str, user_id: UserId) -> Result<RevokeOutcome, AuthError> {
        match self.records.entry(token.to_string()) {
            Entry::Occupied(_) => Ok(RevokeOutcome::AlreadyRevoked),
            Entry::Vacant(slot) => {
                slot.insert(RevocationRecord {
                    token: token.to_string(),
                    user_id,
                    revoked_at: Utc::now(),
                });
                Ok(RevokeOutcome::Revoked)
            }
        }
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, AuthError> {
        Ok(self.records.contains_key(token))
    }

    async fn purge_revoked_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AuthError> {
        let mut purged = 0;
        self.records.retain(|_, record| {
            let keep = record.revoked_at >= cutoff;
            if !keep {
                purged += 1;
            }
            keep
        });
        Ok(purged)
    }
}
