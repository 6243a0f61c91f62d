/*!
 * Argument Marshaling
 * Ordered typed argument lists for one command request
 */

use crate::core::data::{ApnSettings, EdrxSettings, PsmSettings};
use crate::core::types::CommandId;
use serde::{Deserialize, Serialize};

/// One tagged input argument in a command descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArgValue {
    Bool(bool),
    U8(u8),
    U32(u32),
    I32(i32),
    /// Report selector commands carry their own identifier as an argument
    CommandTag(CommandId),
    /// Report period, seconds
    Period(u32),
    Apn(ApnSettings),
    Edrx(EdrxSettings),
    Psm(PsmSettings),
    /// Placeholder for the callback pointer slot in the original descriptor
    /// layout: records only whether a callback is being armed or cleared
    Callback { armed: bool },
}

/// Ordered list of input arguments for one command.
///
/// A pure, stateless builder; every public operation constructs one of these
/// and hands it to the command channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArgList(Vec<ArgValue>);

impl ArgList {
    pub fn new() -> Self {
        ArgList(Vec::new())
    }

    pub fn push(mut self, value: ArgValue) -> Self {
        self.0.push(value);
        self
    }

    /// Append the callback marker slot
    pub fn with_callback(self, armed: bool) -> Self {
        self.push(ArgValue::Callback { armed })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[ArgValue] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArgValue> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arglist_preserves_order() {
        let args = ArgList::new()
            .push(ArgValue::U32(7))
            .with_callback(true)
            .push(ArgValue::Period(30));

        assert_eq!(args.len(), 3);
        assert_eq!(args.as_slice()[0], ArgValue::U32(7));
        assert_eq!(args.as_slice()[1], ArgValue::Callback { armed: true });
        assert_eq!(args.as_slice()[2], ArgValue::Period(30));
    }
}
