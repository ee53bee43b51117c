use std::fmt::{Debug, Formatter};
use java_string::JavaString;
use crate::macros::make_jvm_string;
use crate::tree::annotation::Annotation;
use crate::tree::attribute::Attribute;
use crate::tree::class::ClassName;
use crate::tree::type_annotation::{TargetInfoField, TypeAnnotation};

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
	pub access: FieldAccess,
	pub name: FieldName,
	pub descriptor: FieldDescriptor,

	pub constant_value: Option<ConstantValue>,
	pub signature: Option<FieldSignature>,

	pub runtime_visible_annotations: Vec<Annotation>,
	pub runtime_invisible_annotations: Vec<Annotation>,
	pub runtime_visible_type_annotations: Vec<TypeAnnotation<TargetInfoField>>,
	pub runtime_invisible_type_annotations: Vec<TypeAnnotation<TargetInfoField>>,

	pub attributes: Vec<Attribute>,
}

impl Field {
	pub fn new(access: FieldAccess, name: FieldName, descriptor: FieldDescriptor) -> Field {
		Field {
			access,
			name,
			descriptor,
			constant_value: None,
			signature: None,
			runtime_visible_annotations: Vec::new(),
			runtime_invisible_annotations: Vec::new(),
			runtime_visible_type_annotations: Vec::new(),
			runtime_invisible_type_annotations: Vec::new(),
			attributes: Vec::new(),
		}
	}
}

#[derive(Copy, Clone, Default, PartialEq)]
pub struct FieldAccess {
	pub is_public: bool,
	pub is_private: bool,
	pub is_protected: bool,
	pub is_static: bool,
	pub is_final: bool,
	pub is_volatile: bool,
	pub is_transient: bool,
	pub is_synthetic: bool,
	pub is_enum: bool,
}

impl Debug for FieldAccess {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("FieldAccess { ")?;
		if self.is_public     { f.write_str("public ")?; }
		if self.is_private    { f.write_str("private ")?; }
		if self.is_protected  { f.write_str("protected ")?; }
		if self.is_static     { f.write_str("static ")?; }
		if self.is_final      { f.write_str("final ")?; }
		if self.is_volatile   { f.write_str("volatile ")?; }
		if self.is_transient  { f.write_str("transient ")?; }
		if self.is_synthetic  { f.write_str("synthetic ")?; }
		if self.is_enum       { f.write_str("enum ")?; }
		f.write_str("}")
	}
}

/// A `(owner, name, desc)` reference to a field, as it appears in a `getfield`/`putfield`/
/// `getstatic`/`putstatic` instruction or a constant-pool `Fieldref`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct FieldRef {
	pub class: ClassName,
	pub name: FieldName,
	pub desc: FieldDescriptor,
}

make_jvm_string!(
	pub FieldName;
	is_valid(s) = {
		if crate::tree::names::is_valid_unqualified_name(s) {
			Ok(())
		} else {
			anyhow::bail!("invalid field name {s:?}: must be non-empty and not contain `.`, `;`, `[`, `/`");
		}
	};
);

make_jvm_string!(
	pub FieldDescriptor;
	is_valid(_s) = Ok(());
);

impl FieldDescriptor {
	/// Whether this descriptor begins with `[` or `L`, i.e. whether it names an array or
	/// object type rather than a primitive.
	pub fn is_reference(&self) -> bool {
		matches!(self.as_str().chars().next(), Some('[') | Some('L'))
	}
}

make_jvm_string!(
	pub FieldSignature;
	is_valid(_s) = Ok(());
);

#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
	/// Also the representation for a field of type `byte`, `char`, `short`, `boolean`.
	Integer(i32),
	Float(f32),
	Long(i64),
	Double(f64),
	String(JavaString),
}
