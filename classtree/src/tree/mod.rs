pub mod class;
pub mod field;
pub mod method;
pub mod annotation;
pub mod type_annotation;
pub mod module;
pub mod record;
pub mod attribute;

pub(crate) mod names {
	use java_string::JavaStr;

	/// Checks if a class name is valid according to JVMS 4.2.1 (also accepting array class names).
	pub(crate) fn is_valid_class_name(x: &JavaStr) -> bool {
		if x.starts_with('[') {
			true
		} else {
			!x.is_empty() && x.split('/').all(is_valid_unqualified_name)
		}
	}

	/// Checks if a name is an unqualified name according to JVMS 4.2.2.
	///
	/// Used for field names, formal parameter names, local variable names.
	pub(crate) fn is_valid_unqualified_name(x: &JavaStr) -> bool {
		!x.is_empty() && x.chars().all(|c| !matches!(c, '.' | ';' | '[' | '/'))
	}

	/// Checks if a method name is valid according to JVMS 4.2.2.
	pub(crate) fn is_valid_method_name(x: &JavaStr) -> bool {
		x == "<init>" || x == "<clinit>" || (
			!x.is_empty() && x.chars().all(|c| !matches!(c, '.' | ';' | '[' | '/' | '<' | '>'))
		)
	}

	#[cfg(test)]
	mod testing {
		use java_string::JavaStr;
		use super::*;

		#[test]
		fn class_names() {
			assert!(is_valid_class_name(JavaStr::from_str("java/lang/Object")));
			assert!(is_valid_class_name(JavaStr::from_str("[[[D")));
			assert!(is_valid_class_name(JavaStr::from_str("An$Inner$Class")));

			assert!(!is_valid_class_name(JavaStr::from_str("")));
			assert!(!is_valid_class_name(JavaStr::from_str("a.b")));
			assert!(!is_valid_class_name(JavaStr::from_str("a;b")));
		}

		#[test]
		fn method_names() {
			assert!(is_valid_method_name(JavaStr::from_str("foo")));
			assert!(is_valid_method_name(JavaStr::from_str("<init>")));
			assert!(is_valid_method_name(JavaStr::from_str("<clinit>")));
			assert!(!is_valid_method_name(JavaStr::from_str("<NotClinit>")));
			assert!(!is_valid_method_name(JavaStr::from_str("")));
		}
	}
}
