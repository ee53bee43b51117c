use crate::macros::make_jvm_string;
use crate::tree::annotation::Annotation;
use crate::tree::attribute::Attribute;
use crate::tree::field::{FieldDescriptor, FieldSignature};
use crate::tree::type_annotation::{TargetInfoField, TypeAnnotation};

/// One component of a `record` class's `Record` attribute (JVMS §4.7.30).
#[derive(Debug, Clone, PartialEq)]
pub struct RecordComponent {
	pub name: RecordName,
	pub descriptor: FieldDescriptor,
	pub signature: Option<FieldSignature>,

	pub runtime_visible_annotations: Vec<Annotation>,
	pub runtime_invisible_annotations: Vec<Annotation>,
	pub runtime_visible_type_annotations: Vec<TypeAnnotation<TargetInfoField>>,
	pub runtime_invisible_type_annotations: Vec<TypeAnnotation<TargetInfoField>>,

	pub attributes: Vec<Attribute>,
}

impl RecordComponent {
	pub fn new(name: RecordName, descriptor: FieldDescriptor) -> RecordComponent {
		RecordComponent {
			name,
			descriptor,
			signature: None,
			runtime_visible_annotations: Vec::new(),
			runtime_invisible_annotations: Vec::new(),
			runtime_visible_type_annotations: Vec::new(),
			runtime_invisible_type_annotations: Vec::new(),
			attributes: Vec::new(),
		}
	}
}

make_jvm_string!(
	pub RecordName;
	is_valid(s) = {
		if crate::tree::names::is_valid_unqualified_name(s) {
			Ok(())
		} else {
			anyhow::bail!("invalid record component name {s:?}");
		}
	};
);
