//! Reduction patterns shared by the buyer and seller evaluators.
//!
//! Each function maps the presence or selection state of backing records to a
//! [`CompletionStatus`]. None of them can fail: absent data is `NotStarted`.

use super::domain::{CompletionStatus, FieldSource, PersistedRow, Selectable};

/// One-to-one record: none of the declared fields filled is `NotStarted`,
/// all of them is `Complete`, anything between is `InProgress`.
pub fn contact_block<R: FieldSource>(record: Option<&R>, fields: &[&str]) -> CompletionStatus {
    let Some(record) = record else {
        return CompletionStatus::NotStarted;
    };

    let filled = fields
        .iter()
        .filter(|field| record.has_field(field))
        .count();

    match filled {
        0 => CompletionStatus::NotStarted,
        count if count == fields.len() => CompletionStatus::Complete,
        _ => CompletionStatus::InProgress,
    }
}

/// Single acknowledgement flag. There is no partial state.
pub fn confirmation(confirmed: bool) -> CompletionStatus {
    if confirmed {
        CompletionStatus::Complete
    } else {
        CompletionStatus::NotStarted
    }
}

/// Selectable catalog: any selected row completes the section.
pub fn selection<T: Selectable>(rows: &[T]) -> CompletionStatus {
    if rows.is_empty() {
        CompletionStatus::NotStarted
    } else if rows.iter().any(Selectable::is_selected) {
        CompletionStatus::Complete
    } else {
        CompletionStatus::InProgress
    }
}

/// One-to-many collection where every persisted row must carry every
/// declared field. Unsaved rows are ignored entirely.
pub fn per_row<T: FieldSource + PersistedRow>(rows: &[T], fields: &[&str]) -> CompletionStatus {
    let persisted: Vec<&T> = rows.iter().filter(|row| row.is_persisted()).collect();
    if persisted.is_empty() {
        return CompletionStatus::NotStarted;
    }

    let complete = persisted
        .iter()
        .filter(|row| fields.iter().all(|field| row.has_field(field)))
        .count();

    if complete == persisted.len() {
        CompletionStatus::Complete
    } else {
        CompletionStatus::InProgress
    }
}
