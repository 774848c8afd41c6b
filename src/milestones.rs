use std::collections::BTreeSet;

/// Completion-percentage thresholds; the threshold value doubles as the
/// milestone id carried on each badge.
pub const MILESTONES: [u32; 4] = [25, 50, 75, 100];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MilestoneSync {
    /// Every milestone currently achieved. Badges outside this set are
    /// cleared, so achievements can be lost again after a reset.
    pub achieved: Vec<u32>,
    /// Achieved now but absent from the persisted record; these trigger the
    /// one-shot celebration.
    pub newly_achieved: Vec<u32>,
}

/// Milestones a completion percentage has reached, in ascending order.
pub fn achieved_for(pct: f64) -> Vec<u32> {
    MILESTONES
        .iter()
        .copied()
        .filter(|&m| pct >= f64::from(m))
        .collect()
}

/// Recomputes the achieved set from `pct` and reconciles it against the
/// persisted record. The persisted set is the single authoritative signal
/// for "newly achieved", and the fresh set overwrites it wholesale
/// (last-write-wins, no merge).
pub fn sync(persisted: &mut BTreeSet<u32>, pct: f64) -> MilestoneSync {
    let achieved = achieved_for(pct);
    let newly_achieved: Vec<u32> = achieved
        .iter()
        .copied()
        .filter(|m| !persisted.contains(m))
        .collect();

    persisted.clear();
    persisted.extend(achieved.iter().copied());

    MilestoneSync {
        achieved,
        newly_achieved,
    }
}
