/*!
 * API Module
 * Typed operation shims over the command channel and dispatcher core
 */

mod ops;
pub mod validate;

pub use ops::ModemApi;
