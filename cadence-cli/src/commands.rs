pub mod build;
pub mod encode;
pub mod rhymes;
pub mod stats;
