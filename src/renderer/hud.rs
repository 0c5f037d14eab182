//! Heads-up display text

use crate::sim::FrameView;

pub const PAUSED_BANNER: &str = "PAUSED - press P to continue";
pub const GAME_OVER_BANNER: &str = "GAME OVER - press R to restart";

/// Status lines, top left first
pub fn status_lines(frame: &FrameView) -> [String; 3] {
    [
        format!("Score: {}", frame.score),
        format!("Lives: {}", frame.lives),
        format!("Level: {}", frame.level),
    ]
}

/// Centre banner lines, empty while playing
pub fn banner_lines(frame: &FrameView) -> Vec<String> {
    if frame.game_over {
        vec![
            GAME_OVER_BANNER.to_string(),
            format!("Final score: {}", frame.score),
        ]
    } else if frame.paused {
        vec![PAUSED_BANNER.to_string()]
    } else {
        Vec::new()
    }
}

/// Everything the HUD shows, status first
pub fn hud_lines(frame: &FrameView) -> Vec<String> {
    let mut lines: Vec<String> = status_lines(frame).into();
    lines.extend(banner_lines(frame));
    lines
}
