mod category;
mod classifier;
mod expense;
mod ledger;
mod money;

pub use category::*;
pub use classifier::*;
pub use expense::*;
pub use ledger::*;
pub use money::*;
