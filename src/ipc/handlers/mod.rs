pub mod announcements;
pub mod classes;
pub mod core;
pub mod grades;
pub mod resources;
pub mod views;
