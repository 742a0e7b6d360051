pub mod diff;
pub mod execute;
pub mod reconcile;
pub mod resolver;

pub use execute::{RenameReport, execute};
pub use reconcile::{Decision, Reconciler};
pub use resolver::NameResolver;
