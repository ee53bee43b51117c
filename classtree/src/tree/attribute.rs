use java_string::JavaString;

/// An attribute the tree model has no dedicated representation for. Carried through
/// verbatim; nothing in this crate or in `remap` ever looks inside its `bytes`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
	pub name: JavaString,
	pub bytes: Vec<u8>,
}
