use java_string::{JavaStr, JavaString};
use classtree::tree::class::ClassName;

/// A `(owner, name, descriptor)` triple naming a field or method.
///
/// `desc[0] == '('` iff this refers to a method; anything else refers to a field. No validation
/// is performed here: callers are expected to pass well-formed JVM strings, the same contract
/// `classtree`'s own `FieldRef`/`MethodRef` carry.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct MemberRef {
	owner: ClassName,
	name: JavaString,
	desc: JavaString,
}

impl MemberRef {
	pub fn new(owner: ClassName, name: impl Into<JavaString>, desc: impl Into<JavaString>) -> MemberRef {
		MemberRef { owner, name: name.into(), desc: desc.into() }
	}

	pub fn owner(&self) -> &ClassName {
		&self.owner
	}

	pub fn name(&self) -> &JavaStr {
		&self.name
	}

	pub fn desc(&self) -> &JavaStr {
		&self.desc
	}

	/// Whether this is a method reference, as opposed to a field reference.
	pub fn is_method(&self) -> bool {
		self.desc.starts_with('(')
	}

	pub fn with_owner(&self, owner: ClassName) -> MemberRef {
		MemberRef { owner, name: self.name.clone(), desc: self.desc.clone() }
	}
}

#[cfg(test)]
mod testing {
	use std::convert::TryFrom;
	use super::*;

	#[test]
	fn method_vs_field_kind() {
		let owner = ClassName::try_from("p/Foo").unwrap();
		assert!(MemberRef::new(owner.clone(), "m", "()V").is_method());
		assert!(!MemberRef::new(owner, "bar", "I").is_method());
	}

	#[test]
	fn equality_is_structural() {
		let owner = ClassName::try_from("p/Foo").unwrap();
		let a = MemberRef::new(owner.clone(), "m", "()V");
		let b = MemberRef::new(owner, "m", "()V");
		assert_eq!(a, b);
	}
}
