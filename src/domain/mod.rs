mod account;
mod clock;
mod money;
mod transaction;

pub use account::*;
pub use clock::*;
pub use money::*;
pub use transaction::*;
