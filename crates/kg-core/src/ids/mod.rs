//! ID type wrappers for type safety.

mod id_macro;

use serde::{Deserialize, Serialize};

use id_macro::impl_id;

/// Stage identifier, unique within the static registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageId(String);

/// Treatment (glaze) identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreatmentId(String);

impl_id!(StageId, TreatmentId);

/// Monotonic token identifying one arming of a verification run.
///
/// Completions carrying an older token than the current run are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArmingId(pub u64);

impl ArmingId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for ArmingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "arming-{}", self.0)
    }
}

/// Ticket for one camera acquisition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CameraTicket(pub u64);

impl std::fmt::Display for CameraTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "camera-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_id_from_str_round_trips_display() {
        let id: StageId = "shape".into();
        assert_eq!(id.as_str(), "shape");
        assert_eq!(id.to_string(), "shape");
    }

    #[test]
    fn stage_id_serializes_as_plain_string() {
        let id = StageId::new("bisque");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"bisque\"");
    }

    #[test]
    fn arming_id_next_is_strictly_greater() {
        let first = ArmingId(0);
        assert!(first.next() > first);
    }
}
