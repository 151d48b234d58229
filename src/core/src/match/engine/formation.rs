use crate::r#match::engine::geometry::FieldGeometry;
use crate::r#match::engine::player::{PlayerRole, TeamSide};
use nalgebra::Vector3;

const DEFENDER_LINE: f32 = 0.25;
const MIDFIELDER_LINE: f32 = 0.42;
const FORWARD_LINE: f32 = 0.48;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormationSlot {
    pub role: PlayerRole,
    pub anchor: Vector3<f32>,
}

/// 4-4-2 slot layout: slot 0 is always the goalkeeper, slots 1-4 the
/// defensive line, 5-8 the midfield, 9-10 the forwards. Anchors double
/// as initial placement and as the return target after stoppages.
pub struct FormationLayout;

impl FormationLayout {
    pub fn role_for_slot(slot: usize) -> PlayerRole {
        match slot {
            0 => PlayerRole::Goalkeeper,
            1..=4 => PlayerRole::Defender,
            5..=8 => PlayerRole::Midfielder,
            _ => PlayerRole::Forward,
        }
    }

    /// Anchors for the first `count` slots of one team. `count` is
    /// normally 11 but short rosters produce a reduced layout.
    pub fn layout(geometry: &FieldGeometry, side: TeamSide, count: usize) -> Vec<FormationSlot> {
        (0..count.min(11))
            .map(|slot| FormationSlot {
                role: Self::role_for_slot(slot),
                anchor: Self::anchor_for_slot(geometry, side, slot),
            })
            .collect()
    }

    fn anchor_for_slot(geometry: &FieldGeometry, side: TeamSide, slot: usize) -> Vector3<f32> {
        let (line, band, band_count) = match slot {
            0 => {
                return Vector3::new(geometry.keeper_anchor_x(side), geometry.height / 2.0, 0.0);
            }
            1..=4 => (DEFENDER_LINE, slot - 1, 4),
            5..=8 => (MIDFIELDER_LINE, slot - 5, 4),
            _ => (FORWARD_LINE, slot - 9, 2),
        };

        // Home lines are measured from the left edge, away lines mirror
        // them from the right.
        let x = match side {
            TeamSide::Home => geometry.width * line,
            TeamSide::Away => geometry.width * (1.0 - line),
        };

        // Split the field height into one band per player in the role
        // group and center each player inside its band.
        let y = geometry.height * (2.0 * band as f32 + 1.0) / (2.0 * band_count as f32);

        Vector3::new(x, y, 0.0)
    }
}
