use java_string::{JavaStr, JavaString};
use classtree::tree::class::ClassName;
use indexmap::IndexMap;
use crate::error::{RemapError, Result};
use crate::member_ref::MemberRef;

/// Read-only half of a name dictionary, in the source-to-destination direction.
///
/// Every operation is pure and must be non-blocking: a missing entry always yields the source
/// name back, never an error.
pub trait MappingLookup {
	/// The destination internal name for `src`, or `src` itself when unmapped.
	fn remapped_class(&self, src: &ClassName) -> ClassName {
		self.remapped_class_fast(src).unwrap_or_else(|| src.clone())
	}

	/// The destination internal name for `src`, or `None` when unmapped.
	///
	/// Lets hot paths skip building a new string when no rewrite is needed.
	fn remapped_class_fast(&self, src: &ClassName) -> Option<ClassName>;

	/// The destination simple name for field `(owner, name, desc)`, or `name` when unmapped.
	fn remapped_field(&self, owner: &ClassName, name: &JavaStr, desc: &JavaStr) -> JavaString;

	/// The destination simple name for method `(owner, name, desc)`, or `name` when unmapped.
	fn remapped_method(&self, owner: &ClassName, name: &JavaStr, desc: &JavaStr) -> JavaString;
}

/// Write half of a name dictionary.
pub trait MappingSink {
	fn remap_class(&mut self, src: &ClassName, dst: ClassName) -> &mut Self;

	/// Records a member rename, enforcing the `<init>`/`<clinit>` restrictions JVMS §4.B
	/// describes: renaming the destination name to a constructor/initializer name is only
	/// legal as a no-op, and renaming *away from* `<init>`/`<clinit>` is always rejected, even
	/// as a no-op — the two checks are applied in sequence, not merged, so the second
	/// unconditionally supersedes the first's escape hatch whenever the source name already is
	/// `<init>`/`<clinit>`.
	fn remap_member(&mut self, src: &MemberRef, dst: JavaString) -> Result<&mut Self>;
}

/// The data behind a [`MappingLookup`]/[`MappingSink`] pair: two logical maps with unique keys,
/// a class map and a member map, built during a mutable phase and then treated as read-only.
#[derive(Debug, Default, Clone)]
pub struct MappingDictionary {
	classes: IndexMap<ClassName, ClassName>,
	members: IndexMap<MemberRef, JavaString>,
}

impl MappingDictionary {
	pub fn new() -> MappingDictionary {
		MappingDictionary::default()
	}
}

fn is_ctor_or_clinit(name: &JavaStr) -> bool {
	name == "<init>" || name == "<clinit>"
}

impl MappingLookup for MappingDictionary {
	fn remapped_class_fast(&self, src: &ClassName) -> Option<ClassName> {
		self.classes.get(src).cloned()
	}

	fn remapped_field(&self, owner: &ClassName, name: &JavaStr, desc: &JavaStr) -> JavaString {
		let key = MemberRef::new(owner.clone(), name.to_owned(), desc.to_owned());
		self.members.get(&key).cloned().unwrap_or_else(|| name.to_owned())
	}

	fn remapped_method(&self, owner: &ClassName, name: &JavaStr, desc: &JavaStr) -> JavaString {
		let key = MemberRef::new(owner.clone(), name.to_owned(), desc.to_owned());
		self.members.get(&key).cloned().unwrap_or_else(|| name.to_owned())
	}
}

impl MappingSink for MappingDictionary {
	fn remap_class(&mut self, src: &ClassName, dst: ClassName) -> &mut Self {
		self.classes.insert(src.clone(), dst);
		self
	}

	fn remap_member(&mut self, src: &MemberRef, dst: JavaString) -> Result<&mut Self> {
		if src.is_method() {
			if is_ctor_or_clinit(dst.as_java_str()) && dst.as_java_str() != src.name() {
				return Err(RemapError::invalid_rename(
					src.owner(),
					src.name(),
					src.desc(),
					"destination name is <init>/<clinit> but source name differs",
				));
			}
			if is_ctor_or_clinit(src.name()) {
				return Err(RemapError::invalid_rename(
					src.owner(),
					src.name(),
					src.desc(),
					"source name is <init>/<clinit>: renaming away from it is forbidden",
				));
			}
		}
		self.members.insert(src.clone(), dst);
		Ok(self)
	}
}

#[cfg(test)]
mod testing {
	use std::convert::TryFrom;
	use super::*;

	fn cn(s: &str) -> ClassName {
		ClassName::try_from(s).unwrap()
	}

	#[test]
	fn absent_class_is_identity() {
		let d = MappingDictionary::new();
		assert_eq!(d.remapped_class(&cn("p/Foo")), cn("p/Foo"));
		assert!(d.remapped_class_fast(&cn("p/Foo")).is_none());
	}

	#[test]
	fn class_rename_round_trips() {
		let mut d = MappingDictionary::new();
		d.remap_class(&cn("p/Foo"), cn("q/Foo"));
		assert_eq!(d.remapped_class(&cn("p/Foo")), cn("q/Foo"));
		assert_eq!(d.remapped_class_fast(&cn("p/Foo")), Some(cn("q/Foo")));
	}

	#[test]
	fn member_rename_round_trips() {
		let mut d = MappingDictionary::new();
		let src = MemberRef::new(cn("p/Foo"), "bar", "I");
		d.remap_member(&src, "baz".into()).unwrap();
		assert_eq!(d.remapped_field(&cn("p/Foo"), JavaStr::from_str("bar"), JavaStr::from_str("I")), "baz");
	}

	#[test]
	fn renaming_to_init_is_rejected_unless_noop() {
		let mut d = MappingDictionary::new();
		let src = MemberRef::new(cn("p/Foo"), "m", "()V");
		assert!(d.remap_member(&src, "<init>".into()).is_err());
	}

	#[test]
	fn renaming_away_from_init_is_always_rejected() {
		let mut d = MappingDictionary::new();
		let src = MemberRef::new(cn("p/Foo"), "<init>", "()V");
		assert!(d.remap_member(&src, "<init>".into()).is_err());
		assert!(d.remap_member(&src, "x".into()).is_err());
	}

	#[test]
	fn field_rename_has_no_name_restriction() {
		let mut d = MappingDictionary::new();
		let src = MemberRef::new(cn("p/Foo"), "bar", "Lp/Baz;");
		assert!(d.remap_member(&src, "whatever".into()).is_ok());
	}
}
