pub mod category;
pub mod menu;
pub mod menu_item;
pub mod navigation;
