use std::collections::BTreeSet;

/// Long-ride distances that earn a one-shot celebration, ascending.
pub const MILESTONES: [u32; 6] = [30, 40, 50, 60, 70, 80];

/// Tracks which milestones have been celebrated. The set only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MilestoneDetector {
    celebrated: BTreeSet<u32>,
}

impl MilestoneDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores previously celebrated thresholds; unknown values are dropped.
    pub fn from_celebrated(celebrated: impl IntoIterator<Item = u32>) -> Self {
        Self {
            celebrated: celebrated
                .into_iter()
                .filter(|m| MILESTONES.contains(m))
                .collect(),
        }
    }

    pub fn celebrated(&self) -> &BTreeSet<u32> {
        &self.celebrated
    }

    pub fn is_celebrated(&self, milestone: u32) -> bool {
        self.celebrated.contains(&milestone)
    }

    /// Lowest uncelebrated threshold reached by `achieved_miles`, without recording it.
    ///
    /// A ride that clears several uncelebrated thresholds at once only yields the
    /// lowest; the rest wait for a later qualifying ride.
    pub fn evaluate(&self, achieved_miles: f64) -> Option<u32> {
        MILESTONES
            .iter()
            .copied()
            .find(|&m| f64::from(m) <= achieved_miles && !self.celebrated.contains(&m))
    }

    /// Evaluates and records the result. Returns the newly celebrated threshold.
    pub fn record(&mut self, achieved_miles: f64) -> Option<u32> {
        let milestone = self.evaluate(achieved_miles)?;
        self.celebrated.insert(milestone);
        Some(milestone)
    }
}
