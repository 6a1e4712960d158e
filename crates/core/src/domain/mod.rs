mod evaluation;
mod fileset;
mod publish;
mod task;

pub use evaluation::*;
pub use fileset::*;
pub use publish::*;
pub use task::*;
