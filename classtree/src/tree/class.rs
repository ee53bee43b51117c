use std::fmt::{Debug, Formatter};
use java_string::JavaString;
use crate::macros::make_jvm_string;
use crate::tree::annotation::Annotation;
use crate::tree::attribute::Attribute;
use crate::tree::field::Field;
use crate::tree::method::{Method, MethodDescriptor, MethodName};
use crate::tree::module::Module;
use crate::tree::record::RecordComponent;
use crate::tree::type_annotation::{TargetInfoClass, TypeAnnotation};

/// A single parsed classfile, as defined by the `ClassFile` structure of JVMS §4.1.
///
/// This is the root of the Parsed Classfile Model a `remap::ClassRewriter` traverses and
/// mutates in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
	pub access: ClassAccess,
	pub name: ClassName,
	pub super_name: Option<ClassName>,
	pub interfaces: Vec<ClassName>,
	pub signature: Option<ClassSignature>,

	pub fields: Vec<Field>,
	pub methods: Vec<Method>,

	pub inner_classes: Vec<InnerClass>,

	pub outer_class: Option<ClassName>,
	pub outer_method: Option<MethodName>,
	pub outer_method_desc: Option<MethodDescriptor>,

	pub nest_host_class: Option<ClassName>,
	pub nest_members: Option<Vec<ClassName>>,
	pub permitted_subclasses: Option<Vec<ClassName>>,

	pub record_components: Vec<RecordComponent>,

	pub module: Option<Module>,

	pub runtime_visible_annotations: Vec<Annotation>,
	pub runtime_invisible_annotations: Vec<Annotation>,
	pub runtime_visible_type_annotations: Vec<TypeAnnotation<TargetInfoClass>>,
	pub runtime_invisible_type_annotations: Vec<TypeAnnotation<TargetInfoClass>>,

	pub attributes: Vec<Attribute>,
}

impl ClassFile {
	pub fn new(access: ClassAccess, name: ClassName, super_name: Option<ClassName>, interfaces: Vec<ClassName>) -> ClassFile {
		ClassFile {
			access,
			name,
			super_name,
			interfaces,
			signature: None,

			fields: Vec::new(),
			methods: Vec::new(),

			inner_classes: Vec::new(),

			outer_class: None,
			outer_method: None,
			outer_method_desc: None,

			nest_host_class: None,
			nest_members: None,
			permitted_subclasses: None,

			record_components: Vec::new(),

			module: None,

			runtime_visible_annotations: Vec::new(),
			runtime_invisible_annotations: Vec::new(),
			runtime_visible_type_annotations: Vec::new(),
			runtime_invisible_type_annotations: Vec::new(),

			attributes: Vec::new(),
		}
	}
}

/// The `access_flags` item of the `ClassFile` structure (JVMS §4.1).
#[derive(Copy, Clone, Default, PartialEq)]
pub struct ClassAccess {
	pub is_public: bool,
	pub is_final: bool,
	pub is_super: bool,
	pub is_interface: bool,
	pub is_abstract: bool,
	pub is_synthetic: bool,
	pub is_annotation: bool,
	pub is_enum: bool,
	pub is_module: bool,
}

impl Debug for ClassAccess {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("ClassAccess { ")?;
		if self.is_public     { f.write_str("public ")?; }
		if self.is_final      { f.write_str("final ")?; }
		if self.is_super      { f.write_str("super ")?; }
		if self.is_interface  { f.write_str("interface ")?; }
		if self.is_abstract   { f.write_str("abstract ")?; }
		if self.is_synthetic  { f.write_str("synthetic ")?; }
		if self.is_annotation { f.write_str("annotation ")?; }
		if self.is_enum       { f.write_str("enum ")?; }
		if self.is_module     { f.write_str("module ")?; }
		f.write_str("}")
	}
}

make_jvm_string!(
	/// An internal name (JVMS §4.2.1): `/`-separated, no leading `L`, no trailing `;`, and
	/// possibly prefixed with `[` for an array class.
	pub ClassName;
	is_valid(s) = {
		if crate::tree::names::is_valid_class_name(s) {
			Ok(())
		} else {
			anyhow::bail!("invalid class name {s:?}: must be `/`-separated non-empty parts (or an array descriptor), without `.`, `;`");
		}
	};
);

impl ClassName {
	pub const JAVA_LANG_OBJECT: &'static str = "java/lang/Object";

	pub fn is_array(&self) -> bool {
		self.as_str().starts_with('[')
	}

	/// The part after the last `/`, or the whole name if there is none.
	pub fn simple_name(&self) -> &java_string::JavaStr {
		let s = self.as_str();
		s.rsplit_once('/').map_or(s, |(_, simple)| simple)
	}

	/// The part before the last `/`, or empty if the class is in the default package.
	pub fn package(&self) -> &java_string::JavaStr {
		let s = self.as_str();
		s.rsplit_once('/').map_or(java_string::JavaStr::from_str(""), |(pkg, _)| pkg)
	}
}

make_jvm_string!(
	/// A class or method generic signature (JVMS §4.7.9.1), e.g. `Foo<TT;>;`.
	pub ClassSignature;
	is_valid(_s) = Ok(());
);

#[derive(Debug, Clone, PartialEq)]
pub struct InnerClass {
	pub inner_class: ClassName,
	pub outer_class: Option<ClassName>,
	/// The short display name. Renaming this is an explicit non-goal of the remapper.
	pub inner_name: Option<JavaString>,
	pub flags: InnerClassFlags,
}

#[derive(Copy, Clone, Default, PartialEq)]
pub struct InnerClassFlags {
	pub is_public: bool,
	pub is_private: bool,
	pub is_protected: bool,
	pub is_static: bool,
	pub is_final: bool,
	pub is_interface: bool,
	pub is_abstract: bool,
	pub is_synthetic: bool,
	pub is_annotation: bool,
	pub is_enum: bool,
}

impl Debug for InnerClassFlags {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("InnerClassFlags { ")?;
		if self.is_public     { f.write_str("public ")?; }
		if self.is_private    { f.write_str("private ")?; }
		if self.is_protected  { f.write_str("protected ")?; }
		if self.is_static     { f.write_str("static ")?; }
		if self.is_final      { f.write_str("final ")?; }
		if self.is_interface  { f.write_str("interface ")?; }
		if self.is_abstract   { f.write_str("abstract ")?; }
		if self.is_synthetic  { f.write_str("synthetic ")?; }
		if self.is_annotation { f.write_str("annotation ")?; }
		if self.is_enum       { f.write_str("enum ")?; }
		f.write_str("}")
	}
}
