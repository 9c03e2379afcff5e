pub mod logging;
pub mod scene;
