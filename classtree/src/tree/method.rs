pub mod code;

use std::fmt::{Debug, Formatter};
use crate::macros::make_jvm_string;
use crate::tree::annotation::{Annotation, ElementValue};
use crate::tree::attribute::Attribute;
use crate::tree::class::ClassName;
use crate::tree::method::code::Code;
use crate::tree::type_annotation::{TargetInfoMethod, TypeAnnotation};

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
	pub access: MethodAccess,
	pub name: MethodName,
	pub descriptor: MethodDescriptor,

	pub code: Option<Code>,
	pub exceptions: Option<Vec<ClassName>>,
	pub signature: Option<MethodSignature>,

	pub runtime_visible_annotations: Vec<Annotation>,
	pub runtime_invisible_annotations: Vec<Annotation>,
	pub runtime_visible_type_annotations: Vec<TypeAnnotation<TargetInfoMethod>>,
	pub runtime_invisible_type_annotations: Vec<TypeAnnotation<TargetInfoMethod>>,

	/// One annotation list per formal parameter. Indices line up with the method descriptor's
	/// parameter list, not with any count carried elsewhere.
	pub runtime_visible_parameter_annotations: Vec<Vec<Annotation>>,
	pub runtime_invisible_parameter_annotations: Vec<Vec<Annotation>>,

	pub annotation_default: Option<ElementValue>,

	/// Display names/flags from a `MethodParameters` attribute. Never renamed: it carries no
	/// class or member reference, just formal-parameter display names (an explicit non-goal).
	pub method_parameters: Option<Vec<MethodParameter>>,

	pub attributes: Vec<Attribute>,
}

impl Method {
	pub fn new(access: MethodAccess, name: MethodName, descriptor: MethodDescriptor) -> Method {
		Method {
			access,
			name,
			descriptor,
			code: None,
			exceptions: None,
			signature: None,
			runtime_visible_annotations: Vec::new(),
			runtime_invisible_annotations: Vec::new(),
			runtime_visible_type_annotations: Vec::new(),
			runtime_invisible_type_annotations: Vec::new(),
			runtime_visible_parameter_annotations: Vec::new(),
			runtime_invisible_parameter_annotations: Vec::new(),
			annotation_default: None,
			method_parameters: None,
			attributes: Vec::new(),
		}
	}

	pub fn is_constructor(&self) -> bool {
		self.name.as_str() == "<init>"
	}

	pub fn is_static_initializer(&self) -> bool {
		self.name.as_str() == "<clinit>"
	}
}

#[derive(Copy, Clone, Default, PartialEq)]
pub struct MethodAccess {
	pub is_public: bool,
	pub is_private: bool,
	pub is_protected: bool,
	pub is_static: bool,
	pub is_final: bool,
	pub is_synchronized: bool,
	pub is_bridge: bool,
	pub is_varargs: bool,
	pub is_native: bool,
	pub is_abstract: bool,
	pub is_strict: bool,
	pub is_synthetic: bool,
}

impl Debug for MethodAccess {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("MethodAccess { ")?;
		if self.is_public       { f.write_str("public ")?; }
		if self.is_private      { f.write_str("private ")?; }
		if self.is_protected    { f.write_str("protected ")?; }
		if self.is_static       { f.write_str("static ")?; }
		if self.is_final        { f.write_str("final ")?; }
		if self.is_synchronized { f.write_str("synchronized ")?; }
		if self.is_bridge       { f.write_str("bridge ")?; }
		if self.is_varargs      { f.write_str("varargs ")?; }
		if self.is_native       { f.write_str("native ")?; }
		if self.is_abstract     { f.write_str("abstract ")?; }
		if self.is_strict       { f.write_str("strict ")?; }
		if self.is_synthetic    { f.write_str("synthetic ")?; }
		f.write_str("}")
	}
}

/// A `(owner, name, desc)` reference to a method. `owner` may be an array class name (e.g.
/// `[Ljava/lang/String;`), since arrays inherit methods like `clone` from `Object`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct MethodRef {
	pub class: ClassName,
	pub name: MethodName,
	pub desc: MethodDescriptor,
}

make_jvm_string!(
	pub MethodName;
	is_valid(s) = {
		if crate::tree::names::is_valid_method_name(s) {
			Ok(())
		} else {
			anyhow::bail!("invalid method name {s:?}: must be `<init>`, `<clinit>`, or non-empty without `.`, `;`, `[`, `/`, `<`, `>`");
		}
	};
);

impl MethodName {
	pub const INIT: &'static str = "<init>";
	pub const CLINIT: &'static str = "<clinit>";

	pub fn is_init_or_clinit(&self) -> bool {
		self.as_str() == Self::INIT || self.as_str() == Self::CLINIT
	}
}

make_jvm_string!(
	pub MethodDescriptor;
	is_valid(_s) = Ok(());
);

make_jvm_string!(
	pub MethodSignature;
	is_valid(_s) = Ok(());
);

#[derive(Debug, Clone, PartialEq)]
pub struct MethodParameter {
	pub name: Option<java_string::JavaString>,
	pub flags: ParameterFlags,
}

#[derive(Copy, Clone, Default, PartialEq)]
pub struct ParameterFlags {
	pub is_final: bool,
	pub is_synthetic: bool,
	pub is_mandated: bool,
}

impl Debug for ParameterFlags {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("ParameterFlags { ")?;
		if self.is_final     { f.write_str("final ")?; }
		if self.is_synthetic { f.write_str("synthetic ")?; }
		if self.is_mandated  { f.write_str("mandated ")?; }
		f.write_str("}")
	}
}
