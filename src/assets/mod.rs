pub mod handle;
pub mod server;
pub mod storage;

pub use handle::{GeometryHandle, MaterialHandle};
pub use server::AssetServer;
pub use storage::{Asset, AssetStorage};
