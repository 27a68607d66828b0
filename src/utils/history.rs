use crate::application::models::word::{HistoryByDay, HistoryEntry};

/// Groups history entries by the day component of their timestamp,
/// preserving the order in which days first appear. Entries arrive from the
/// backend newest-first, so groups come out newest-first as well.
pub fn group_history_by_day(entries: &[HistoryEntry]) -> Vec<HistoryByDay> {
    let mut grouped: Vec<HistoryByDay> = Vec::new();

    for entry in entries {
        let day = entry
            .created_at
            .split(|c: char| c == ' ' || c == 'T')
            .next()
            .unwrap_or(&entry.created_at);

        match grouped.iter_mut().find(|g| g.title == day) {
            Some(group) => group.data.push(entry.clone()),
            None => grouped.push(HistoryByDay {
                title: day.to_string(),
                data: vec![entry.clone()],
            }),
        }
    }

    grouped
}
