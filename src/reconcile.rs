//! Remote catalog reconciliation.
//!
//! The work list is the set difference between the remote catalog and the
//! local archive, by id only. Remote order is preserved and duplicate remote
//! ids are neither merged nor dropped.

use std::collections::HashSet;

use tubevault_common::{RemoteEntry, Video};

/// Ids of the locally held videos.
pub fn local_ids(local: &[Video]) -> HashSet<&str> {
    local.iter().map(|v| v.id().as_str()).collect()
}

/// Remote entries whose id is not held locally, in remote order.
pub fn entries_to_fetch<I>(remote: I, local: &[Video]) -> Vec<RemoteEntry>
where
    I: IntoIterator<Item = RemoteEntry>,
{
    let held = local_ids(local);
    remote
        .into_iter()
        .filter(|entry| !held.contains(entry.id.as_str()))
        .collect()
}

/// Borrowing variant of [`entries_to_fetch`].
pub fn missing_ids<'a>(remote: &'a [RemoteEntry], local: &[Video]) -> Vec<&'a RemoteEntry> {
    let held = local_ids(local);
    remote
        .iter()
        .filter(|entry| !held.contains(entry.id.as_str()))
        .collect()
}
