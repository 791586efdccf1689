pub mod crop_screen;
pub mod fonts;
pub mod layout;
pub mod theme;
pub mod widgets;
