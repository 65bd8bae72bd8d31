pub mod history;
pub mod snapshot;
pub mod summary;

pub use history::*;
pub use snapshot::*;
pub use summary::*;
