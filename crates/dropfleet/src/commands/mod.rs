pub mod create_fleet;
pub mod delete_all;
pub mod list;
pub mod size_regions;
pub mod sizes;
