use crate::r#match::engine::ball::Ball;
use crate::r#match::engine::formation::FormationLayout;
use crate::r#match::engine::geometry::FieldGeometry;
use crate::r#match::engine::player::{MatchPlayer, TeamSide};
use crate::r#match::squad::MatchSquad;
use nalgebra::Vector3;

/// The simulated entities: both line-ups and the ball. The engine step
/// owns this exclusively; the presentation layer only ever reads
/// snapshots taken between steps.
pub struct MatchField {
    pub players: Vec<MatchPlayer>,
    pub ball: Ball,
}

impl MatchField {
    pub fn new(geometry: &FieldGeometry, home: &MatchSquad, away: &MatchSquad) -> Self {
        let mut players = Vec::with_capacity(22);
        Self::place_squad(&mut players, geometry, home, TeamSide::Home);
        Self::place_squad(&mut players, geometry, away, TeamSide::Away);

        MatchField {
            players,
            ball: Ball::at_center(geometry),
        }
    }

    fn place_squad(
        players: &mut Vec<MatchPlayer>,
        geometry: &FieldGeometry,
        squad: &MatchSquad,
        side: TeamSide,
    ) {
        let layout = FormationLayout::layout(geometry, side, squad.players.len());

        for (slot, (squad_player, formation_slot)) in
            squad.players.iter().zip(layout).enumerate()
        {
            players.push(MatchPlayer::new(
                squad_player.id,
                squad_player.display_name.clone(),
                side,
                formation_slot.role,
                squad_player.overall,
                slot,
                formation_slot.anchor,
            ));
        }
    }

    /// Re-runs the formation layout for both sides and lines everyone
    /// up: positions snap to the (possibly re-derived) anchors, the ball
    /// returns to the center spot unowned. Used at every kickoff and
    /// whenever the field is resized.
    pub fn reset_positions(&mut self, geometry: &FieldGeometry) {
        for side in [TeamSide::Home, TeamSide::Away] {
            let count = self.players.iter().filter(|p| p.side == side).count();
            let layout = FormationLayout::layout(geometry, side, count);

            for player in self.players.iter_mut().filter(|p| p.side == side) {
                if let Some(slot) = layout.get(player.slot) {
                    player.anchor = slot.anchor;
                    player.position = slot.anchor;
                }
                player.velocity = Vector3::zeros();
            }
        }

        self.ball.reset(geometry);
    }

    pub fn player(&self, id: u32) -> Option<&MatchPlayer> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: u32) -> Option<&mut MatchPlayer> {
        self.players.iter_mut().find(|p| p.id == id)
    }
}
