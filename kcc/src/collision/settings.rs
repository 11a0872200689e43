/*!
Collision query tolerances.

These constants centralize the thresholds used by the static world backend when
it answers sweeps, ray casts and overlap tests. Keeping them together makes
tuning easier and keeps the controller's contact handling consistent.

Notes
- Distances are in meters.
- Favor practical world-space tolerances over machine epsilon for robust behavior.
*/

/// Practical small distance for comparisons (meters).
/// Use for dot-product guards, equality checks in world space, etc.
pub const DIST_EPS: f32 = 1.0e-6;

/// Penetration depth below which two shapes are considered touching, not overlapping.
/// A capsule placed flush against a surface lands within float error of zero depth.
pub const OVERLAP_TOLERANCE: f32 = 1.0e-3;

/// Sweep hits closer than this are treated as "already touching at the start".
/// Such hits only block the sweep when the motion points into the surface.
pub const TOUCH_DISTANCE: f32 = 1.0e-4;

/// Motion whose dot product with a touching surface normal exceeds `-GRAZING_DOT`
/// counts as sliding along or leaving that surface.
pub const GRAZING_DOT: f32 = 1.0e-3;

/// Minimum squared length for a contact normal to be trusted.
/// Shorter normals come from degenerate queries and are treated as no contact.
pub const MIN_NORMAL_SQ: f32 = 1.0e-8;

/// Margin added to query AABBs before pruning candidates (meters).
pub const BROAD_PHASE_MARGIN: f32 = 0.02;
