use java_string::JavaString;
use crate::tree::field::{FieldDescriptor, FieldName};

/// A runtime-(in)visible annotation, as attached to a class, field, method, or nested inside
/// another annotation/array value.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
	/// The annotation interface's type, in descriptor form (`Lcom/example/Foo;`).
	pub annotation_type: FieldDescriptor,
	pub element_value_pairs: Vec<ElementValuePair>,
}

impl Annotation {
	pub fn new(annotation_type: FieldDescriptor) -> Annotation {
		Annotation { annotation_type, element_value_pairs: Vec::new() }
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementValuePair {
	pub name: JavaString,
	pub value: ElementValue,
}

/// The value half of an annotation element-value pair, or an entry of an `ArrayType` value
/// (JVMS §4.7.16.1).
#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
	/// A primitive box or a `String` constant. Never renamed.
	Const(ConstValue),
	/// An enum constant: the enum's type (descriptor form) paired with the constant's name.
	Enum { type_name: FieldDescriptor, const_name: FieldName },
	/// A `.class` literal, in return-descriptor form (so it can hold `V`-less primitive,
	/// array, or object class literals).
	Class(FieldDescriptor),
	Annotation(Annotation),
	Array(Vec<ElementValue>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
	Byte(i8),
	Char(u16),
	Double(f64),
	Float(f32),
	Integer(i32),
	Long(i64),
	Short(i16),
	Boolean(bool),
	String(JavaString),
}
