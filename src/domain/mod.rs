pub mod camera;
pub mod entity;
pub mod geom;
pub mod input;
pub mod physics;
pub mod tile;
