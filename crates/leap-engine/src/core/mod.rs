pub mod collision;
pub mod events;
pub mod geometry;
pub mod group;
pub mod loading;
pub mod physics;
pub mod registry;
pub mod scheduler;
pub mod time;
