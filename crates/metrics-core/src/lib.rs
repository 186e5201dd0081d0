pub mod error;
pub mod format;
pub mod num;
pub mod periods;
pub mod traits;
pub mod types;

pub use error::*;
pub use num::*;
pub use periods::*;
pub use traits::*;
pub use types::*;
