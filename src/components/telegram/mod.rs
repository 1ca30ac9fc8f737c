mod actor;
mod handle;
pub mod listener;
pub mod models;

pub use handle::TelegramHandle;
pub use models::Update;
