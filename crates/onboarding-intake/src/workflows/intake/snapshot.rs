use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use super::domain::{ActorId, Clock, ProgramRef, SectionKey, TenantId};
use super::repository::{RepositoryError, SnapshotRepository};
use super::section::IntakeSection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(pub u64);

/// One append-only audit row holding a section's payload at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSnapshot {
    pub id: SnapshotId,
    pub tenant_id: TenantId,
    pub section: SectionKey,
    pub data: Value,
    pub actor: ActorId,
    pub program_ref: Option<ProgramRef>,
    pub recorded_at: DateTime<Utc>,
    /// Set when the row was produced by a rollback to this instant.
    pub rolled_back_to: Option<DateTime<Utc>>,
}

/// Snapshot row before the log assigns it an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSnapshot {
    pub tenant_id: TenantId,
    pub section: SectionKey,
    pub data: Value,
    pub actor: ActorId,
    pub program_ref: Option<ProgramRef>,
    pub recorded_at: DateTime<Utc>,
    pub rolled_back_to: Option<DateTime<Utc>>,
}

pub struct SnapshotRecorder<L> {
    log: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<L> SnapshotRecorder<L>
where
    L: SnapshotRepository,
{
    pub fn new(log: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self { log, clock }
    }

    pub fn record(
        &self,
        tenant_id: &TenantId,
        section: SectionKey,
        data: Value,
        actor: &ActorId,
        program_ref: Option<&ProgramRef>,
    ) -> Result<SectionSnapshot, RepositoryError> {
        self.log.append(NewSnapshot {
            tenant_id: tenant_id.clone(),
            section,
            data,
            actor: actor.clone(),
            program_ref: program_ref.cloned(),
            recorded_at: self.clock.now(),
            rolled_back_to: None,
        })
    }

    /// Most recent first, at most `limit` rows.
    pub fn history(
        &self,
        tenant_id: &TenantId,
        limit: usize,
    ) -> Result<Vec<SectionSnapshot>, RepositoryError> {
        let mut rows = self.log.for_tenant(tenant_id)?;
        rows.sort_by(|a, b| {
            b.recorded_at
                .cmp(&a.recorded_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        rows.truncate(limit);
        Ok(rows)
    }

    /// Re-append, for every section of the flow, the latest payload recorded at
    /// or before `target`. Existing rows are never touched.
    pub fn rollback_to<S: IntakeSection>(
        &self,
        tenant_id: &TenantId,
        target: DateTime<Utc>,
        actor: &ActorId,
        program_ref: Option<&ProgramRef>,
    ) -> Result<Vec<SectionSnapshot>, RepositoryError> {
        let mut latest: BTreeMap<SectionKey, SectionSnapshot> = BTreeMap::new();
        for row in self.log.for_tenant(tenant_id)? {
            if row.recorded_at > target {
                continue;
            }
            let newer = latest
                .get(&row.section)
                .map(|held| (row.recorded_at, row.id) > (held.recorded_at, held.id))
                .unwrap_or(true);
            if newer {
                latest.insert(row.section.clone(), row);
            }
        }

        let now = self.clock.now();
        let mut appended = Vec::new();
        for section in S::all() {
            let Some(source) = latest.remove(&section.key()) else {
                continue;
            };
            appended.push(self.log.append(NewSnapshot {
                tenant_id: tenant_id.clone(),
                section: source.section,
                data: source.data,
                actor: actor.clone(),
                program_ref: program_ref.cloned(),
                recorded_at: now,
                rolled_back_to: Some(target),
            })?);
        }

        info!(
            tenant = %tenant_id,
            target = %target,
            restored = appended.len(),
            "rolled back section snapshots"
        );
        Ok(appended)
    }
}
