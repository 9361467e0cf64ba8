pub mod catalog;
pub mod common;
pub mod document;
pub mod report;
pub mod settings;

pub use catalog::*;
pub use common::*;
pub use document::*;
pub use report::*;
pub use settings::*;
