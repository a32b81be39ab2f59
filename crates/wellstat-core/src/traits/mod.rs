pub mod level;
pub mod scheduler;

pub use level::{DefaultLevels, LevelResolver, LevelTable};
pub use scheduler::{CloseScheduler, WindowCloser};
