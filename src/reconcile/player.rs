use gameday_api::PlayerMaster;
use std::collections::btree_map::Entry;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeCounts {
    pub added: usize,
    pub updated: usize,
}

/// Fold sightings into a master. Known players have only the sub-record
/// kinds present in the sighting replaced; new players are inserted whole.
pub fn merge_into(master: &mut PlayerMaster, sightings: PlayerMaster) -> MergeCounts {
    let mut counts = MergeCounts::default();
    for (code, sighting) in sightings {
        match master.entry(code) {
            Entry::Occupied(mut existing) => {
                existing.get_mut().absorb(sighting);
                counts.updated += 1;
            }
            Entry::Vacant(slot) => {
                slot.insert(sighting);
                counts.added += 1;
            }
        }
    }
    counts
}
