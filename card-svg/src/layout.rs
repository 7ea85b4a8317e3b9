/// Fixed card geometry. Heights grow in row increments; everything else
/// is constant so identical inputs produce identical documents.
pub const CARD_WIDTH: u32 = 480;
pub const BASE_HEIGHT: u32 = 160;
pub const ROW_HEIGHT: u32 = 30;
pub const BADGES_PER_ROW: usize = 10;
pub const BADGE_INSET: u32 = 24;
pub const BADGE_ICON_SIZE: u32 = 24;
pub const BADGE_TOP: u32 = 150;
pub const AVATAR_SIZE: u32 = 64;
pub const EDGE_MARGIN: u32 = 24;

/// Horizontal arrangement of the header. `Right` swaps the avatar and the
/// name block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconPosition {
    #[default]
    Left,
    Right,
}

impl IconPosition {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "right" => Self::Right,
            _ => Self::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Computed geometry for one card, fixed before serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLayout {
    pub width: u32,
    pub height: u32,
    pub rows: u32,
    pub avatar_x: u32,
    pub text_x: u32,
}

impl CardLayout {
    pub fn new(badge_count: usize, icon: IconPosition) -> Self {
        let rows = badge_count.div_ceil(BADGES_PER_ROW) as u32;
        let (avatar_x, text_x) = match icon {
            IconPosition::Left => (EDGE_MARGIN, EDGE_MARGIN + AVATAR_SIZE + 16),
            IconPosition::Right => (CARD_WIDTH - EDGE_MARGIN - AVATAR_SIZE, EDGE_MARGIN),
        };
        Self {
            width: CARD_WIDTH,
            height: BASE_HEIGHT + ROW_HEIGHT * rows,
            rows,
            avatar_x,
            text_x,
        }
    }

    /// Top-left corner of badge `index`: column `index % 10`, row
    /// `index / 10`, left-aligned at the fixed inset.
    pub fn badge_position(index: usize) -> (u32, u32) {
        let column = (index % BADGES_PER_ROW) as u32;
        let row = (index / BADGES_PER_ROW) as u32;
        (
            BADGE_INSET + column * ROW_HEIGHT,
            BADGE_TOP + row * ROW_HEIGHT,
        )
    }
}
