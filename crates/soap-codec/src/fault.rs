//! Protocol-level fault record.

use thiserror::Error;

use crate::model::Element;

/// A fault reported by the remote side in place of a reply body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("SOAP fault: {code}: {string}: {actor}: {detail}")]
pub struct Fault {
    pub code: String,
    pub string: String,
    pub actor: String,
    pub detail: String,
}

impl Fault {
    /// Reads a fault-shaped element.
    ///
    /// Children are matched by local name (`faultcode`, `faultstring`,
    /// `faultactor`, `detail`); absent ones stay empty. Only the text of each
    /// child is kept.
    pub fn from_element(element: &Element) -> Fault {
        let mut fault = Fault::default();
        for child in &element.children {
            let slot = match child.local_name() {
                "faultcode" => &mut fault.code,
                "faultstring" => &mut fault.string,
                "faultactor" => &mut fault.actor,
                "detail" => &mut fault.detail,
                _ => continue,
            };
            *slot = child.text.trim().to_string();
        }
        fault
    }

    /// Returns true if `element` is named `Fault`, whatever its prefix.
    pub fn is_fault(element: &Element) -> bool {
        element.local_name() == "Fault"
    }
}
