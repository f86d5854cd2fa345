pub mod current;
pub mod projects;
