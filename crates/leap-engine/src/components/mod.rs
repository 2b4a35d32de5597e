pub mod camera;
pub mod capability;
pub mod entity;
pub mod sprite;
