//! A rewriting engine for parsed JVM classfile trees (see `classtree`).
//!
//! Given a source-to-destination name mapping, [`rewrite::ClassRewriter`] rewrites every
//! renameable site of a class tree in place: the class header, member declarations,
//! instruction operands, descriptors, generic signatures, annotations, stack map frames, and
//! the auxiliary attribute tables (inner classes, nest mates, records, modules).
//!
//! [`hierarchy::HierarchyAnalyzer`] computes member realms over a closed world of classes so
//! that renaming one member of an override chain renames every participant consistently.

pub mod error;
pub mod member_ref;
pub mod mapping;
pub mod signature;
pub mod rewrite;
pub mod hierarchy;

pub use error::RemapError;
pub use member_ref::MemberRef;
pub use mapping::{MappingDictionary, MappingLookup, MappingSink};
pub use rewrite::ClassRewriter;
pub use hierarchy::{HierarchyAnalyzer, HierarchyAwareDelegator, MemberRealm, RealmTable, TopLevelMemberLookup};
