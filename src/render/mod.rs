pub mod coords;
pub mod interaction;
pub mod scene;
pub mod timing;
