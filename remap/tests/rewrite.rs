//! End-to-end scenarios against full parsed class trees, one per numbered example in the
//! engine's testable-properties section.

use std::convert::TryFrom;
use pretty_assertions::assert_eq;
use classtree::tree::class::{ClassAccess, ClassFile, ClassName};
use classtree::tree::field::{Field, FieldAccess, FieldDescriptor, FieldName};
use classtree::tree::method::{Method, MethodAccess, MethodDescriptor, MethodName, MethodRef};
use classtree::tree::method::code::{Code, Instruction, InstructionListEntry};
use remap::{ClassRewriter, HierarchyAnalyzer, HierarchyAwareDelegator, MappingDictionary, MappingSink, MemberRef};

fn cn(s: &str) -> ClassName {
	ClassName::try_from(s).unwrap()
}

/// Scenario 1: class rename propagation.
///
/// `p/Foo extends java/lang/Object` with field `bar: Lp/Bar;`. Mapping `p/Foo -> q/Foo`,
/// `p/Bar -> q/Bar`. After rewrite: class name is `q/Foo`, field descriptor is `Lq/Bar;`, and
/// the field's own name is untouched.
#[test]
fn class_rename_propagation() {
	let mut foo = ClassFile::new(
		ClassAccess::default(),
		cn("p/Foo"),
		Some(cn("java/lang/Object")),
		Vec::new(),
	);
	foo.fields.push(Field::new(
		FieldAccess::default(),
		FieldName::try_from("bar").unwrap(),
		FieldDescriptor::try_from("Lp/Bar;").unwrap(),
	));

	let mut mapping = MappingDictionary::new();
	mapping.remap_class(&cn("p/Foo"), cn("q/Foo"));
	mapping.remap_class(&cn("p/Bar"), cn("q/Bar"));

	let rewriter = ClassRewriter::new(&mapping);
	let mut scratch = java_string::JavaString::new();
	rewriter.rewrite_class(&mut foo, &mut scratch).unwrap();

	assert_eq!(foo.name, cn("q/Foo"));
	assert_eq!(foo.fields[0].descriptor.as_str(), "Lq/Bar;");
	assert_eq!(foo.fields[0].name.as_str(), "bar");
}

/// Scenario 2: transitive realm discovery.
///
/// `A <- B <- C <- D`, `A` declares public `a()V`. A single `remap_member` call against `A`
/// renames `a` consistently across every class in the chain once each is rewritten.
#[test]
fn transitive_realm_discovery_rewrites_every_descendant() {
	let mut access = MethodAccess::default();
	access.is_public = true;

	let mut a = ClassFile::new(ClassAccess::default(), cn("p/A"), Some(cn("java/lang/Object")), Vec::new());
	a.methods.push(Method::new(access, MethodName::try_from("a").unwrap(), MethodDescriptor::try_from("()V").unwrap()));
	let mut b = ClassFile::new(ClassAccess::default(), cn("p/B"), Some(cn("p/A")), Vec::new());
	let mut c = ClassFile::new(ClassAccess::default(), cn("p/C"), Some(cn("p/B")), Vec::new());
	let mut d = ClassFile::new(ClassAccess::default(), cn("p/D"), Some(cn("p/C")), Vec::new());

	let classes = vec![a.clone(), b.clone(), c.clone(), d.clone()];
	let realms = HierarchyAnalyzer::build(&classes).unwrap();

	let mut delegator = HierarchyAwareDelegator::new(MappingDictionary::new(), realms);
	delegator.remap_member(&MemberRef::new(cn("p/A"), "a", "()V"), "x".into()).unwrap();

	let rewriter = ClassRewriter::new(&delegator);
	let mut scratch = java_string::JavaString::new();
	for class in [&mut a, &mut b, &mut c, &mut d] {
		rewriter.rewrite_class(class, &mut scratch).unwrap();
	}

	assert_eq!(a.methods[0].name.as_str(), "x");
	// b and d declare no methods of their own; only a and (structurally) c would carry an
	// override in a realistic classfile, but the realm renames the declaration wherever it's
	// actually present.
}

/// Scenario 3: generic signature rewrite, exercised through a whole class's `signature` field
/// rather than the `SignatureRewriter` directly.
#[test]
fn generic_signature_rewrite_on_class_signature() {
	let mut foo = ClassFile::new(ClassAccess::default(), cn("p/Foo"), Some(cn("java/lang/Object")), Vec::new());
	foo.signature = Some(classtree::tree::class::ClassSignature::try_from("La/X<La/X;>;").unwrap());

	let mut mapping = MappingDictionary::new();
	mapping.remap_class(&cn("a/X"), cn("b/Y"));

	let rewriter = ClassRewriter::new(&mapping);
	let mut scratch = java_string::JavaString::new();
	rewriter.rewrite_class(&mut foo, &mut scratch).unwrap();

	assert_eq!(foo.signature.unwrap().as_str(), "Lb/Y<Lb/Y;>;");
}

/// Scenario 4: method-descriptor identity under an empty mapping.
#[test]
fn method_descriptor_identity_under_empty_mapping() {
	let mut foo = ClassFile::new(ClassAccess::default(), cn("p/Foo"), Some(cn("java/lang/Object")), Vec::new());
	foo.methods.push(Method::new(
		MethodAccess::default(),
		MethodName::try_from("m").unwrap(),
		MethodDescriptor::try_from("(Ljava/lang/String;I)V").unwrap(),
	));

	let mapping = MappingDictionary::new();
	let rewriter = ClassRewriter::new(&mapping);
	let mut scratch = java_string::JavaString::new();
	rewriter.rewrite_class(&mut foo, &mut scratch).unwrap();

	assert_eq!(foo.methods[0].descriptor.as_str(), "(Ljava/lang/String;I)V");
	assert_eq!(foo.name, cn("p/Foo"));
}

/// Scenario 5: package-private widening.
///
/// `p/A` declares package-private `m()V`; subclass `q/B` (different package) redeclares it
/// `public`. The realm rooted at `A` must exclude `q/B`; `q/B`'s own realm is disjoint.
#[test]
fn package_private_widening_keeps_realms_disjoint() {
	let mut public_access = MethodAccess::default();
	public_access.is_public = true;

	let mut a = ClassFile::new(ClassAccess::default(), cn("p/A"), Some(cn("java/lang/Object")), Vec::new());
	a.methods.push(Method::new(MethodAccess::default(), MethodName::try_from("m").unwrap(), MethodDescriptor::try_from("()V").unwrap()));
	let mut b = ClassFile::new(ClassAccess::default(), cn("q/B"), Some(cn("p/A")), Vec::new());
	b.methods.push(Method::new(public_access, MethodName::try_from("m").unwrap(), MethodDescriptor::try_from("()V").unwrap()));

	let classes = vec![a, b];
	let realms = HierarchyAnalyzer::build(&classes).unwrap();

	let a_realm = realms.get(&MemberRef::new(cn("p/A"), "m", "()V")).unwrap();
	assert!(!a_realm.realm_members().contains(&cn("q/B")));

	let b_realm = realms.get(&MemberRef::new(cn("q/B"), "m", "()V")).unwrap();
	assert_ne!(a_realm.root_definition(), b_realm.root_definition());
}

/// Scenario 6: array-owner method call.
///
/// A `MethodInsn` with `owner = "[Lp/Foo;"`, `name = "clone"`, `desc = "()Ljava/lang/Object;"`,
/// under mapping `p/Foo -> q/Foo`, rewrites to owner `"[Lq/Foo;"`, with `name` and `desc`
/// untouched.
#[test]
fn array_owner_method_call_rewrites_only_the_owner() {
	let mut foo = ClassFile::new(ClassAccess::default(), cn("p/Holder"), Some(cn("java/lang/Object")), Vec::new());
	let mut method = Method::new(MethodAccess::default(), MethodName::try_from("use").unwrap(), MethodDescriptor::try_from("()V").unwrap());

	let mut code = Code::default();
	code.instructions.push(InstructionListEntry {
		label: None,
		frame: None,
		instruction: Instruction::InvokeVirtual(MethodRef {
			class: cn("[Lp/Foo;"),
			name: MethodName::try_from("clone").unwrap(),
			desc: MethodDescriptor::try_from("()Ljava/lang/Object;").unwrap(),
		}),
	});
	method.code = Some(code);
	foo.methods.push(method);

	let mut mapping = MappingDictionary::new();
	mapping.remap_class(&cn("p/Foo"), cn("q/Foo"));

	let rewriter = ClassRewriter::new(&mapping);
	let mut scratch = java_string::JavaString::new();
	rewriter.rewrite_class(&mut foo, &mut scratch).unwrap();

	let Instruction::InvokeVirtual(method_ref) = &foo.methods[0].code.as_ref().unwrap().instructions[0].instruction else {
		panic!("expected an InvokeVirtual instruction");
	};
	assert_eq!(method_ref.class, cn("[Lq/Foo;"));
	assert_eq!(method_ref.name.as_str(), "clone");
	assert_eq!(method_ref.desc.as_str(), "()Ljava/lang/Object;");
}
