pub mod category;
pub mod course;
pub mod menu;
pub mod menu_item;
