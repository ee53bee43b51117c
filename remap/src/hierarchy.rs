//! Computes member realms over a closed world of classes (a single build's worth of
//! application code, with library/JDK classes omitted by convention) and wraps a simpler
//! [`MappingLookup`]/[`MappingSink`] pair so that every participant of a realm shares one
//! rename decision.
//!
//! A realm exists because Java's override and access-widening rules mean a rename of one
//! method can legally (or must, to stay verifiable) apply to several classes at once: renaming
//! `A.foo()` without also renaming every override in `A`'s subclasses produces a classfile that
//! no longer overrides anything, silently changing program behavior.

use std::rc::Rc;
use indexmap::{IndexMap, IndexSet};
use java_string::JavaStr;
use log::{debug, trace};
use classtree::tree::class::{ClassFile, ClassName};
use crate::error::{RemapError, Result};
use crate::mapping::{MappingLookup, MappingSink};
use crate::member_ref::MemberRef;

/// The equivalence class of `(owner, name, desc)` triples that must share a rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRealm {
	root_definition: MemberRef,
	realm_members: IndexSet<ClassName>,
}

impl MemberRealm {
	/// The canonical member reference every participant's rename is looked up under.
	pub fn root_definition(&self) -> &MemberRef {
		&self.root_definition
	}

	/// The owners to which this realm's renaming applies.
	pub fn realm_members(&self) -> &IndexSet<ClassName> {
		&self.realm_members
	}
}

/// An immutable `MemberRef → MemberRealm` table (see [`HierarchyAnalyzer::build`]).
///
/// Safe to share across concurrently running rewrites: nothing here is mutated after
/// construction.
#[derive(Debug, Default, Clone)]
pub struct RealmTable {
	realms: IndexMap<MemberRef, Rc<MemberRealm>>,
}

impl RealmTable {
	pub fn get(&self, key: &MemberRef) -> Option<&Rc<MemberRealm>> {
		self.realms.get(key)
	}

	pub fn len(&self) -> usize {
		self.realms.len()
	}

	pub fn is_empty(&self) -> bool {
		self.realms.is_empty()
	}
}

/// Resolves a member reference to the canonical definition that owns its realm.
///
/// Backed in practice by a [`RealmTable`]; kept as a trait so `HierarchyAwareDelegator` can be
/// tested against a fake without building a whole class hierarchy.
pub trait TopLevelMemberLookup {
	/// `realm.root_definition()` if `src` belongs to a realm, else `src` unchanged.
	fn top_level(&self, src: &MemberRef) -> MemberRef;
}

impl TopLevelMemberLookup for RealmTable {
	fn top_level(&self, src: &MemberRef) -> MemberRef {
		self.get(src).map(|realm| realm.root_definition.clone()).unwrap_or_else(|| src.clone())
	}
}

/// Builds [`RealmTable`]s from a closed world of parsed class trees.
pub struct HierarchyAnalyzer;

impl HierarchyAnalyzer {
	/// Builds the realm table for `classes` (spec-equivalent of §4.E.1's algorithm).
	///
	/// `classes` must be the entire set a rename decision can depend on; a class referenced
	/// only by name (e.g. a JDK supertype) and not present in `classes` is treated as a leaf
	/// with no declared members and no descendants.
	pub fn build(classes: &[ClassFile]) -> Result<RealmTable> {
		let node_by_name: IndexMap<ClassName, &ClassFile> =
			classes.iter().map(|c| (c.name.clone(), c)).collect();

		let mut immediate_children: IndexMap<ClassName, IndexSet<ClassName>> = IndexMap::new();
		for class in classes {
			if let Some(super_name) = &class.super_name {
				immediate_children.entry(super_name.clone()).or_default().insert(class.name.clone());
			}
			for interface in &class.interfaces {
				immediate_children.entry(interface.clone()).or_default().insert(class.name.clone());
			}
		}

		let mut descendants_cache: IndexMap<ClassName, IndexSet<ClassName>> = IndexMap::new();
		for class in classes {
			compute_descendants(&class.name, &immediate_children, &mut descendants_cache);
		}

		let mut order: Vec<&ClassFile> = classes.iter().collect();
		order.sort_by(|a, b| {
			let a_count = descendants_cache.get(&a.name).map_or(0, IndexSet::len);
			let b_count = descendants_cache.get(&b.name).map_or(0, IndexSet::len);
			b_count.cmp(&a_count).then_with(|| b.name.cmp(&a.name))
		});

		let empty = IndexSet::new();
		let mut realms: IndexMap<MemberRef, Rc<MemberRealm>> = IndexMap::new();

		for class in order {
			let descendants = descendants_cache.get(&class.name).unwrap_or(&empty);
			debug!("assembling realms declared on {} ({} descendants)", class.name, descendants.len());

			for field in &class.fields {
				let self_ref = MemberRef::new(class.name.clone(), field.name.as_str().to_owned(), field.descriptor.as_str().to_owned());
				if realms.contains_key(&self_ref) {
					continue;
				}

				let access = &field.access;
				let members = if access.is_static || access.is_private {
					singleton(&class.name)
				} else if access.is_public || access.is_protected {
					widen_to_all_descendants(&class.name, descendants)
				} else {
					assemble_package_private_realm(
						&class.name, descendants, &node_by_name, &descendants_cache,
						field.name.as_str(), field.descriptor.as_str(), true,
					)
				};

				publish_realm(&mut realms, self_ref, members, field.name.as_str(), field.descriptor.as_str());
			}

			for method in &class.methods {
				let self_ref = MemberRef::new(class.name.clone(), method.name.as_str().to_owned(), method.descriptor.as_str().to_owned());
				if realms.contains_key(&self_ref) {
					continue;
				}

				let access = &method.access;
				let members = if access.is_static || access.is_private {
					singleton(&class.name)
				} else if access.is_public || access.is_protected {
					widen_to_all_descendants(&class.name, descendants)
				} else {
					assemble_package_private_realm(
						&class.name, descendants, &node_by_name, &descendants_cache,
						method.name.as_str(), method.descriptor.as_str(), false,
					)
				};

				publish_realm(&mut realms, self_ref, members, method.name.as_str(), method.descriptor.as_str());
			}
		}

		let table = RealmTable { realms };
		verify_realm_symmetry(&table)?;
		Ok(table)
	}
}

fn singleton(class_name: &ClassName) -> IndexSet<ClassName> {
	let mut set = IndexSet::new();
	set.insert(class_name.clone());
	set
}

fn widen_to_all_descendants(class_name: &ClassName, descendants: &IndexSet<ClassName>) -> IndexSet<ClassName> {
	let mut members = IndexSet::with_capacity(descendants.len() + 1);
	members.insert(class_name.clone());
	members.extend(descendants.iter().cloned());
	members
}

/// Package-private realm assembly (spec §4.E.1 step 3, third bullet).
///
/// Starts from `class_name` alone, widens to every same-package descendant, and further widens
/// to a same-package descendant `d`'s own descendants whenever `d` redeclares the same
/// `(name, desc)` with PUBLIC or PROTECTED access (access-widening in a subclass). A
/// different-package descendant redeclaring `(name, desc)` is an unrelated member, not an
/// override of this one, and is never added to the realm.
fn assemble_package_private_realm(
	class_name: &ClassName,
	descendants: &IndexSet<ClassName>,
	node_by_name: &IndexMap<ClassName, &ClassFile>,
	descendants_cache: &IndexMap<ClassName, IndexSet<ClassName>>,
	name: &JavaStr,
	desc: &JavaStr,
	is_field: bool,
) -> IndexSet<ClassName> {
	let mut members = IndexSet::new();
	members.insert(class_name.clone());
	let package = class_name.package();

	for d in descendants {
		if d.package() != package {
			continue;
		}

		members.insert(d.clone());

		let Some(d_class) = node_by_name.get(d) else { continue };
		let widened = if is_field {
			d_class.fields.iter().any(|f| {
				f.name.as_str() == name && f.descriptor.as_str() == desc
					&& (f.access.is_public || f.access.is_protected)
			})
		} else {
			d_class.methods.iter().any(|m| {
				m.name.as_str() == name && m.descriptor.as_str() == desc
					&& (m.access.is_public || m.access.is_protected)
			})
		};

		if widened {
			if let Some(d_descendants) = descendants_cache.get(d) {
				members.extend(d_descendants.iter().cloned());
			}
		}
	}

	members
}

fn publish_realm(
	realms: &mut IndexMap<MemberRef, Rc<MemberRealm>>,
	root_definition: MemberRef,
	realm_members: IndexSet<ClassName>,
	name: &JavaStr,
	desc: &JavaStr,
) {
	trace!("realm for {}.{name}{desc} has {} member(s)", root_definition.owner(), realm_members.len());
	let realm = Rc::new(MemberRealm { root_definition, realm_members });
	for owner in &realm.realm_members {
		let key = MemberRef::new(owner.clone(), name.to_owned(), desc.to_owned());
		realms.insert(key, realm.clone());
	}
}

fn compute_descendants(
	name: &ClassName,
	immediate_children: &IndexMap<ClassName, IndexSet<ClassName>>,
	cache: &mut IndexMap<ClassName, IndexSet<ClassName>>,
) -> IndexSet<ClassName> {
	if let Some(cached) = cache.get(name) {
		return cached.clone();
	}

	let mut result = IndexSet::new();
	if let Some(children) = immediate_children.get(name) {
		for child in children {
			if result.insert(child.clone()) {
				let grandchildren = compute_descendants(child, immediate_children, cache);
				result.extend(grandchildren);
			}
		}
	}

	cache.insert(name.clone(), result.clone());
	result
}

/// Checks the table's own post-condition invariant (spec §4.E.1): every realm member's
/// `MemberRef` must map back to the same realm.
fn verify_realm_symmetry(table: &RealmTable) -> Result<()> {
	for realm in table.realms.values() {
		for owner in &realm.realm_members {
			let key = MemberRef::new(owner.clone(), realm.root_definition.name().to_owned(), realm.root_definition.desc().to_owned());
			match table.get(&key) {
				Some(found) if Rc::ptr_eq(found, realm) => {}
				_ => return Err(RemapError::MissingRealmAssertion(owner.clone().into_inner())),
			}
		}
	}
	Ok(())
}

/// Wraps a simpler `MappingLookup`/`MappingSink` delegate with a [`TopLevelMemberLookup`],
/// canonicalizing every member operation to its realm root before delegating (spec §4.E.2).
///
/// Consequence: a single `remap_member` call against any participant of a realm effectively
/// renames every participant, since every member query canonicalizes to the same root before
/// reaching the delegate.
pub struct HierarchyAwareDelegator<D, T = RealmTable> {
	delegate: D,
	realms: T,
}

impl<D, T: TopLevelMemberLookup> HierarchyAwareDelegator<D, T> {
	pub fn new(delegate: D, realms: T) -> HierarchyAwareDelegator<D, T> {
		HierarchyAwareDelegator { delegate, realms }
	}

	pub fn into_delegate(self) -> D {
		self.delegate
	}

	pub fn delegate(&self) -> &D {
		&self.delegate
	}
}

impl<D: MappingLookup, T: TopLevelMemberLookup> MappingLookup for HierarchyAwareDelegator<D, T> {
	fn remapped_class_fast(&self, src: &ClassName) -> Option<ClassName> {
		self.delegate.remapped_class_fast(src)
	}

	fn remapped_field(&self, owner: &ClassName, name: &JavaStr, desc: &JavaStr) -> java_string::JavaString {
		let query = MemberRef::new(owner.clone(), name.to_owned(), desc.to_owned());
		let top = self.realms.top_level(&query);
		assert!(!top.is_method(), "hierarchy realm lookup returned a method definition for a field query: {top:?}");
		self.delegate.remapped_field(top.owner(), top.name(), top.desc())
	}

	fn remapped_method(&self, owner: &ClassName, name: &JavaStr, desc: &JavaStr) -> java_string::JavaString {
		let query = MemberRef::new(owner.clone(), name.to_owned(), desc.to_owned());
		let top = self.realms.top_level(&query);
		assert!(top.is_method(), "hierarchy realm lookup returned a field definition for a method query: {top:?}");
		self.delegate.remapped_method(top.owner(), top.name(), top.desc())
	}
}

impl<D: MappingSink, T: TopLevelMemberLookup> MappingSink for HierarchyAwareDelegator<D, T> {
	fn remap_class(&mut self, src: &ClassName, dst: ClassName) -> &mut Self {
		self.delegate.remap_class(src, dst);
		self
	}

	/// Canonicalizes `src` only far enough to check the kind invariant; the delegate is fed
	/// `src` itself, unchanged. This is an observed asymmetry with the query side (which
	/// canonicalizes fully) rather than a deliberate design choice here, and is preserved
	/// rather than "fixed" since it affects which ref renames get stored under.
	fn remap_member(&mut self, src: &MemberRef, dst: java_string::JavaString) -> Result<&mut Self> {
		let top = self.realms.top_level(src);
		if top.is_method() != src.is_method() {
			return Err(RemapError::RealmKindMismatch {
				owner: src.owner().clone(),
				name: src.name().to_owned(),
				desc: src.desc().to_owned(),
			});
		}

		self.delegate.remap_member(src, dst)?;
		Ok(self)
	}
}

#[cfg(test)]
mod testing {
	use std::convert::TryFrom;
	use classtree::tree::class::{ClassAccess, ClassFile};
	use classtree::tree::method::{Method, MethodAccess, MethodName, MethodDescriptor};
	use crate::mapping::MappingDictionary;
	use super::*;

	fn cn(s: &str) -> ClassName {
		ClassName::try_from(s).unwrap()
	}

	fn class(name: &str, super_name: Option<&str>) -> ClassFile {
		ClassFile::new(ClassAccess::default(), cn(name), super_name.map(cn), Vec::new())
	}

	fn add_public_method(class: &mut ClassFile, name: &str, desc: &str) {
		let mut access = MethodAccess::default();
		access.is_public = true;
		class.methods.push(Method::new(access, MethodName::try_from(name).unwrap(), MethodDescriptor::try_from(desc).unwrap()));
	}

	fn add_package_private_method(class: &mut ClassFile, name: &str, desc: &str) {
		class.methods.push(Method::new(MethodAccess::default(), MethodName::try_from(name).unwrap(), MethodDescriptor::try_from(desc).unwrap()));
	}

	#[test]
	fn transitive_realm_discovery() {
		// A <- B <- C <- D, A declares public a()V.
		let mut a = class("p/A", None);
		add_public_method(&mut a, "a", "()V");
		let b = class("p/B", Some("p/A"));
		let c = class("p/C", Some("p/B"));
		let d = class("p/D", Some("p/C"));

		let classes = vec![a, b, c, d];
		let table = HierarchyAnalyzer::build(&classes).unwrap();

		assert_eq!(table.len(), 4);
		let root = MemberRef::new(cn("p/A"), "a", "()V");
		for owner in ["p/A", "p/B", "p/C", "p/D"] {
			let key = MemberRef::new(cn(owner), "a", "()V");
			let realm = table.get(&key).unwrap();
			assert_eq!(realm.root_definition(), &root);
			assert_eq!(realm.realm_members().len(), 4);
		}
	}

	#[test]
	fn package_private_widening_excludes_unrelated_package_subclass() {
		let mut a = class("p/A", None);
		add_package_private_method(&mut a, "m", "()V");
		let mut b = class("q/B", Some("p/A"));
		add_public_method(&mut b, "m", "()V");

		let classes = vec![a, b];
		let table = HierarchyAnalyzer::build(&classes).unwrap();

		let a_realm = table.get(&MemberRef::new(cn("p/A"), "m", "()V")).unwrap();
		assert!(!a_realm.realm_members().contains(&cn("q/B")));

		let b_realm = table.get(&MemberRef::new(cn("q/B"), "m", "()V")).unwrap();
		assert!(b_realm.realm_members().contains(&cn("q/B")));
		assert_ne!(a_realm.root_definition(), b_realm.root_definition());
	}

	#[test]
	fn static_and_private_members_form_singleton_realms() {
		let mut a = class("p/A", None);
		let mut access = MethodAccess::default();
		access.is_private = true;
		a.methods.push(Method::new(access, MethodName::try_from("helper").unwrap(), MethodDescriptor::try_from("()V").unwrap()));
		let b = class("p/B", Some("p/A"));

		let classes = vec![a, b];
		let table = HierarchyAnalyzer::build(&classes).unwrap();
		let realm = table.get(&MemberRef::new(cn("p/A"), "helper", "()V")).unwrap();
		assert_eq!(realm.realm_members().len(), 1);
		assert!(table.get(&MemberRef::new(cn("p/B"), "helper", "()V")).is_none());
	}

	#[test]
	fn hierarchy_aware_single_renaming_propagates_to_descendants() {
		let mut a = class("p/A", None);
		add_public_method(&mut a, "a", "()V");
		let b = class("p/B", Some("p/A"));
		let c = class("p/C", Some("p/B"));

		let classes = vec![a, b, c];
		let table = HierarchyAnalyzer::build(&classes).unwrap();

		let mut delegator = HierarchyAwareDelegator::new(MappingDictionary::new(), table);
		let src = MemberRef::new(cn("p/A"), "a", "()V");
		delegator.remap_member(&src, "x".into()).unwrap();

		assert_eq!(delegator.remapped_method(&cn("p/C"), JavaStr::from_str("a"), JavaStr::from_str("()V")), "x");
		assert_eq!(delegator.remapped_method(&cn("p/A"), JavaStr::from_str("a"), JavaStr::from_str("()V")), "x");
	}

	/// A realm table built correctly can never produce a kind mismatch (every stored key
	/// shares its root's descriptor family by construction); this exercises the delegator's
	/// defensive check directly against a `TopLevelMemberLookup` that misbehaves.
	struct MismatchedKindLookup;

	impl TopLevelMemberLookup for MismatchedKindLookup {
		fn top_level(&self, src: &MemberRef) -> MemberRef {
			MemberRef::new(src.owner().clone(), src.name().to_owned(), "I")
		}
	}

	#[test]
	fn realm_kind_mismatch_is_rejected_at_the_sink() {
		let mut delegator = HierarchyAwareDelegator::new(MappingDictionary::new(), MismatchedKindLookup);
		let query = MemberRef::new(cn("p/A"), "a", "()V");
		assert!(delegator.remap_member(&query, "x".into()).is_err());
	}
}
