mod column;
mod regional;
mod team;

pub use column::{column_views, draw_column, draw_tab_strip};
pub use regional::{draw_regional_modal, RegionalModal};
pub use team::{draw_team_panel, TeamPanelView};
