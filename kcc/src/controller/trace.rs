use crate::collision::Vec3;

/// What a trace segment depicts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraceTag {
    /// Position at the previous tick to position now.
    Trajectory,
    /// Velocity arrow from above the top cap.
    Velocity,
    /// Normal of a floor-like contact.
    FloorContact,
    /// Normal of a wall contact.
    WallContact,
    /// Push-out applied by depenetration.
    Depenetration,
    /// Drop applied by the sticky-ground snap.
    StickyGround,
}

/// One diagnostic line segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceRecord {
    pub from: Vec3,
    pub to: Vec3,
    pub tag: TraceTag,
}

/// Collector for trace records. A disabled trace drops everything pushed to it.
#[derive(Clone, Debug, Default)]
pub struct Trace {
    enabled: bool,
    records: Vec<TraceRecord>,
}

impl Trace {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            records: Vec::new(),
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn push(&mut self, from: Vec3, to: Vec3, tag: TraceTag) {
        if self.enabled {
            self.records.push(TraceRecord { from, to, tag });
        }
    }

    pub fn into_records(self) -> Vec<TraceRecord> {
        self.records
    }
}
