/*!
 * Command Channel Module
 * Synchronous call gate across the system-call boundary
 */

mod gate;
mod marshal;
mod traits;
mod types;

pub use gate::CommandChannel;
pub use marshal::{ArgList, ArgValue};
pub use traits::ModemTransport;
pub use types::{CommandReply, CommandRequest};
