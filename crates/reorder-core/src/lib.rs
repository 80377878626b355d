mod autoscroll;
mod layout;
mod publisher;
mod session;
mod state;
mod swap;
mod viewport;

pub use crate::autoscroll::*;
pub use crate::layout::*;
pub use crate::publisher::*;
pub use crate::session::*;
pub use crate::state::*;
pub use crate::swap::*;
pub use crate::viewport::*;
