//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod course_repo;
pub mod menu_item_repo;
pub mod menu_repo;

pub use category_repo::CategoryRepo;
pub use course_repo::CourseRepo;
pub use menu_item_repo::MenuItemRepo;
pub use menu_repo::MenuRepo;
