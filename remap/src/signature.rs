//! Rewrites descriptors and generic signatures (JVMS §4.3, §4.7.9.1) given a [`MappingLookup`].
//!
//! [`rewrite_field_descriptor`] only ever substitutes a single class name and never sees `(`,
//! `)`, or `<...>`; [`rewrite_signature`] is the general grammar-directed transducer that also
//! handles method descriptors, type variables, and generic argument lists, and is used
//! everywhere a generic signature can appear.

use std::iter::Peekable;
use java_string::{Chars, JavaStr, JavaString};
use classtree::tree::class::ClassName;
use classtree::tree::field::FieldDescriptor;
use crate::error::{RemapError, Result};
use crate::mapping::MappingLookup;

/// Rewrites a field descriptor (`B C D F I J S Z V`, `L<name>;`, or `[` + one of those).
///
/// Finds the first `L`; if there is none the descriptor names a primitive (possibly an array of
/// one) and is returned unchanged. Otherwise the internal name between `L` and the trailing `;`
/// is looked up; an unmapped name returns the input unchanged, identity-preserved.
pub fn rewrite_field_descriptor(lookup: &impl MappingLookup, desc: &FieldDescriptor) -> FieldDescriptor {
	let mut chars = desc.as_str().chars();
	let mut prefix = JavaString::new();

	loop {
		match chars.next() {
			Some(ch) if ch == '[' => prefix.push('['),
			Some(ch) if ch == 'L' => {
				let mut name = JavaString::new();
				let mut terminated = false;
				for ch in chars.by_ref() {
					if ch == ';' {
						terminated = true;
						break;
					}
					name.push_java(ch);
				}
				if !terminated {
					return desc.clone();
				}

				// SAFETY: `name` was scanned out of an already-valid field descriptor, so it
				// satisfies `ClassName`'s validity invariant (non-empty, `/`-separated parts).
				let class_name = unsafe { ClassName::new_unchecked(name) };
				return match lookup.remapped_class_fast(&class_name) {
					None => desc.clone(),
					Some(new_name) => {
						let mut out = prefix;
						out.push('L');
						out.push_java_str(new_name.as_str());
						out.push(';');
						// SAFETY: `out` is `[`* + `L` + a valid internal name + `;`, which is a
						// well-formed field descriptor.
						unsafe { FieldDescriptor::new_unchecked(out) }
					}
				};
			}
			_ => return desc.clone(),
		}
	}
}

/// If `name` begins with `[`, treats it as a field descriptor (array class name); otherwise
/// looks it up directly as an internal name. Matches the "internal name or array descriptor"
/// shape used by stack map frames and several classfile attributes.
pub fn rewrite_internal_name(lookup: &impl MappingLookup, name: &ClassName) -> ClassName {
	if name.as_str().starts_with('[') {
		// SAFETY: `name` is already a valid `ClassName`, and every valid array class name is
		// also a valid field descriptor.
		let desc = unsafe { FieldDescriptor::new_unchecked(name.as_str().to_owned()) };
		let rewritten = rewrite_field_descriptor(lookup, &desc);
		// SAFETY: `rewrite_field_descriptor` preserves the descriptor grammar, and an array
		// field descriptor is itself a valid class name.
		unsafe { ClassName::new_unchecked(rewritten.into_inner()) }
	} else {
		lookup.remapped_class(name)
	}
}

/// Rewrites a generic signature or descriptor string (JVMS §4.7.9.1), reconstructing it
/// token-by-token while substituting every class name a [`MappingLookup`] maps.
///
/// This one routine is correct for field descriptors, method descriptors, field signatures,
/// method signatures, and class signatures alike: the caller need not distinguish between
/// them. Returns whether anything changed, and the (possibly identical) rewritten string.
pub fn rewrite_signature(lookup: &impl MappingLookup, sig: &JavaStr) -> Result<(bool, JavaString)> {
	let mut chars = sig.chars().peekable();
	rewrite_seq(lookup, &mut chars, false, sig)
}

fn malformed(sig: &JavaStr, reason: &'static str) -> RemapError {
	RemapError::MalformedSignature { signature: sig.to_owned(), reason }
}

/// Consumes and rewrites a sequence of back-to-back type tokens from `chars`.
///
/// When `stop_at_close_angle` is set (we're inside a `<...>` argument list), stops without
/// consuming as soon as the next character is `>`, leaving it for the caller to consume; at the
/// top level it instead runs until `chars` is exhausted.
fn rewrite_seq(lookup: &impl MappingLookup, chars: &mut Peekable<Chars>, stop_at_close_angle: bool, sig: &JavaStr) -> Result<(bool, JavaString)> {
	if stop_at_close_angle && chars.peek().is_some_and(|ch| *ch == '>') {
		return Ok((false, JavaString::new()));
	}

	match chars.next() {
		None if stop_at_close_angle => Err(malformed(sig, "unterminated generic argument list")),
		None => Ok((false, JavaString::new())),
		Some(token) if token == 'L' || token == 'T' => {
			rewrite_class_or_type_var(lookup, chars, token, stop_at_close_angle, sig)
		}
		Some(ch) => {
			let mut out = JavaString::new();
			out.push_java(ch);
			let (changed, rest) = rewrite_seq(lookup, chars, stop_at_close_angle, sig)?;
			out.push_java_str(&rest);
			Ok((changed, out))
		}
	}
}

fn rewrite_class_or_type_var(
	lookup: &impl MappingLookup,
	chars: &mut Peekable<Chars>,
	token: java_string::JavaCodePoint,
	stop_at_close_angle: bool,
	sig: &JavaStr,
) -> Result<(bool, JavaString)> {
	let mut name = JavaString::new();
	loop {
		match chars.next() {
			None => return Err(malformed(sig, "unterminated class type or type variable reference")),
			Some(ch) if ch == ';' => {
				// SAFETY: `name` was scanned out of a well-formed `L...;`/`T...;` token.
				let class_name = unsafe { ClassName::new_unchecked(name) };
				let (new_name, this_changed) = match lookup.remapped_class_fast(&class_name) {
					Some(n) => (n.into_inner(), true),
					None => (class_name.into_inner(), false),
				};

				let mut out = JavaString::new();
				out.push_java(token);
				out.push_java_str(&new_name);
				out.push(';');

				let (rest_changed, rest) = rewrite_seq(lookup, chars, stop_at_close_angle, sig)?;
				out.push_java_str(&rest);
				return Ok((this_changed || rest_changed, out));
			}
			Some(ch) if ch == '<' => {
				// SAFETY: see above.
				let class_name = unsafe { ClassName::new_unchecked(name) };
				let (new_name, this_changed) = match lookup.remapped_class_fast(&class_name) {
					Some(n) => (n.into_inner(), true),
					None => (class_name.into_inner(), false),
				};

				let mut out = JavaString::new();
				out.push_java(token);
				out.push_java_str(&new_name);
				out.push('<');

				let (interior_changed, interior) = rewrite_seq(lookup, chars, true, sig)?;
				out.push_java_str(&interior);

				match chars.next() {
					Some(ch) if ch == '>' => out.push('>'),
					_ => return Err(malformed(sig, "unterminated generic argument list")),
				}

				// The byte right after the closing `>` is typically `;`, but rarely `.` for an
				// inner-class generic separator (e.g. `Lp/Outer<TT;>.Inner;`); pass it through
				// unmodified.
				if let Some(ch) = chars.next() {
					out.push_java(ch);
				}

				let (rest_changed, rest) = rewrite_seq(lookup, chars, stop_at_close_angle, sig)?;
				out.push_java_str(&rest);
				return Ok((this_changed || interior_changed || rest_changed, out));
			}
			Some(ch) => name.push_java(ch),
		}
	}
}

#[cfg(test)]
mod testing {
	use std::convert::TryFrom;
	use indexmap::IndexMap;
	use super::*;

	struct FakeLookup(IndexMap<ClassName, ClassName>);

	impl MappingLookup for FakeLookup {
		fn remapped_class_fast(&self, src: &ClassName) -> Option<ClassName> {
			self.0.get(src).cloned()
		}
		fn remapped_field(&self, _owner: &ClassName, name: &JavaStr, _desc: &JavaStr) -> JavaString {
			name.to_owned()
		}
		fn remapped_method(&self, _owner: &ClassName, name: &JavaStr, _desc: &JavaStr) -> JavaString {
			name.to_owned()
		}
	}

	fn cn(s: &str) -> ClassName {
		ClassName::try_from(s).unwrap()
	}

	fn fd(s: &str) -> FieldDescriptor {
		FieldDescriptor::try_from(s).unwrap()
	}

	#[test]
	fn field_descriptor_primitive_is_identity() {
		let lookup = FakeLookup(IndexMap::new());
		assert_eq!(rewrite_field_descriptor(&lookup, &fd("I")), fd("I"));
	}

	#[test]
	fn field_descriptor_object_rewrite() {
		let mut m = IndexMap::new();
		m.insert(cn("p/Bar"), cn("q/Bar"));
		let lookup = FakeLookup(m);
		assert_eq!(rewrite_field_descriptor(&lookup, &fd("Lp/Bar;")), fd("Lq/Bar;"));
		assert_eq!(rewrite_field_descriptor(&lookup, &fd("[[Lp/Bar;")), fd("[[Lq/Bar;"));
	}

	#[test]
	fn method_descriptor_identity_under_empty_mapping() {
		let lookup = FakeLookup(IndexMap::new());
		let sig = JavaStr::from_str("(Ljava/lang/String;I)V");
		let (changed, out) = rewrite_signature(&lookup, sig).unwrap();
		assert!(!changed);
		assert_eq!(out.as_java_str(), sig);
	}

	#[test]
	fn generic_signature_rewrite() {
		let mut m = IndexMap::new();
		m.insert(cn("a/X"), cn("b/Y"));
		let lookup = FakeLookup(m);
		let sig = JavaStr::from_str("La/X<La/X;>;");
		let (changed, out) = rewrite_signature(&lookup, sig).unwrap();
		assert!(changed);
		assert_eq!(out.as_java_str(), JavaStr::from_str("Lb/Y<Lb/Y;>;"));
	}

	#[test]
	fn truncated_generic_argument_list_is_an_error() {
		let lookup = FakeLookup(IndexMap::new());
		let sig = JavaStr::from_str("La/X<La/X;");
		assert!(rewrite_signature(&lookup, sig).is_err());
	}
}
