use super::domain::{CompletionStatus, PhaseNumber, SectionKey, TenantRole};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Static description of one page of an intake form.
#[derive(Debug)]
pub struct SectionMeta<S: 'static> {
    pub id: S,
    pub title: &'static str,
    pub group: &'static str,
    pub min_phase: PhaseNumber,
    pub required_fields: &'static [&'static str],
}

/// Section identifier space for one intake flow.
///
/// Implementations back every method with compiled-in tables; nothing here
/// reads tenant state.
pub trait IntakeSection: Copy + Ord + fmt::Debug + Send + Sync + 'static {
    const ROLE: TenantRole;

    /// Every section in display order.
    fn all() -> &'static [Self];

    fn meta(self) -> &'static SectionMeta<Self>;

    /// Sections that must be complete before this one unlocks.
    fn prerequisites(self) -> &'static [Self];

    /// Sections the submission gate checks for `phase`.
    fn required_for_phase(phase: PhaseNumber) -> &'static [Self];

    fn key(self) -> SectionKey;

    fn parse_key(raw: &str) -> Option<Self>;

    fn title(self) -> &'static str {
        self.meta().title
    }
}

/// Completion status per section for one tenant, recomputed on every read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMap<S: IntakeSection> {
    statuses: BTreeMap<S, CompletionStatus>,
}

impl<S: IntakeSection> StatusMap<S> {
    pub fn get(&self, section: S) -> CompletionStatus {
        self.statuses
            .get(&section)
            .copied()
            .unwrap_or(CompletionStatus::NotStarted)
    }

    pub fn insert(&mut self, section: S, status: CompletionStatus) {
        self.statuses.insert(section, status);
    }

    pub fn iter(&self) -> impl Iterator<Item = (S, CompletionStatus)> + '_ {
        self.statuses
            .iter()
            .map(|(section, status)| (*section, *status))
    }

    pub fn all_complete(&self, sections: &[S]) -> bool {
        sections
            .iter()
            .all(|section| self.get(*section).is_complete())
    }

    pub fn incomplete<'a>(&'a self, sections: &'a [S]) -> impl Iterator<Item = S> + 'a {
        sections
            .iter()
            .copied()
            .filter(|section| !self.get(*section).is_complete())
    }
}

impl<S: IntakeSection> Default for StatusMap<S> {
    fn default() -> Self {
        Self {
            statuses: BTreeMap::new(),
        }
    }
}

impl<S: IntakeSection> FromIterator<(S, CompletionStatus)> for StatusMap<S> {
    fn from_iter<I: IntoIterator<Item = (S, CompletionStatus)>>(iter: I) -> Self {
        Self {
            statuses: iter.into_iter().collect(),
        }
    }
}

impl<S: IntakeSection> Serialize for StatusMap<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut map = serializer.serialize_map(Some(self.statuses.len()))?;
        for (section, status) in &self.statuses {
            map.serialize_entry(&section.key().0, status)?;
        }
        map.end()
    }
}
