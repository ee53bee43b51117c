//! Traverses a parsed class tree, renaming every site that can textually name a class or
//! member, in place.

use java_string::{JavaStr, JavaString};
use log::trace;
use classtree::tree::annotation::{Annotation, ElementValue};
use classtree::tree::class::ClassFile;
use classtree::tree::field::{Field, FieldDescriptor, FieldSignature};
use classtree::tree::method::code::{
	BsmArgument, BsmType, Code, Constant, FrameEntry, Handle, Instruction, InvokeDynamic,
};
use classtree::tree::method::{Method, MethodDescriptor};

use crate::error::{RemapError, Result};
use crate::mapping::MappingLookup;
use crate::signature::{rewrite_field_descriptor, rewrite_internal_name, rewrite_signature};

/// Rewrites parsed class trees in place against a [`MappingLookup`].
///
/// A rewrite of one class is a sequential, single-threaded traversal; see the crate's ordering
/// note on [`ClassRewriter::rewrite_class`] for why the class's own name is renamed last.
pub struct ClassRewriter<'a, L> {
	lookup: &'a L,
}

impl<'a, L: MappingLookup> ClassRewriter<'a, L> {
	pub fn new(lookup: &'a L) -> ClassRewriter<'a, L> {
		ClassRewriter { lookup }
	}

	/// Rewrites every renameable site of `class` in place.
	///
	/// `scratch` is a caller-owned buffer this call may clear and reuse; its prior contents are
	/// ignored and its contents on return are unspecified.
	///
	/// Order matters only where a later step reads a field an earlier step would otherwise have
	/// already overwritten: member lookups are keyed on the class's *original* (unmapped) name,
	/// so the class's own name must be renamed last (step 15 of the declared order).
	pub fn rewrite_class(&self, class: &mut ClassFile, scratch: &mut JavaString) -> Result<()> {
		scratch.clear();

		let owner = class.name.clone();

		for field in &mut class.fields {
			self.rewrite_field(&owner, field)?;
		}

		for inner in &mut class.inner_classes {
			inner.inner_class = self.lookup.remapped_class(&inner.inner_class);
			if let Some(outer) = &inner.outer_class {
				inner.outer_class = Some(self.lookup.remapped_class(outer));
			}
			// inner.inner_name (the short display name) is left alone: an explicit non-goal.
		}

		for interface in &mut class.interfaces {
			*interface = self.lookup.remapped_class(interface);
		}

		for annotation in class.runtime_invisible_type_annotations.iter_mut().map(|a| &mut a.annotation)
			.chain(class.runtime_invisible_annotations.iter_mut())
			.chain(class.runtime_visible_type_annotations.iter_mut().map(|a| &mut a.annotation))
			.chain(class.runtime_visible_annotations.iter_mut())
		{
			self.rewrite_annotation(annotation)?;
		}

		for method in &mut class.methods {
			self.rewrite_method(&owner, method)?;
		}

		if let Some(module) = &mut class.module {
			if let Some(main_class) = &module.main_class {
				module.main_class = Some(self.lookup.remapped_class(main_class));
			}
			for used in &mut module.uses {
				*used = rewrite_internal_name(self.lookup, used);
			}
		}

		if let Some(nest_host) = &class.nest_host_class {
			class.nest_host_class = Some(self.lookup.remapped_class(nest_host));
		}

		if let Some(members) = &mut class.nest_members {
			for member in members {
				*member = self.lookup.remapped_class(member);
			}
		}

		if let Some(outer_class) = &class.outer_class {
			if let (Some(outer_method), Some(outer_method_desc)) = (&class.outer_method, &class.outer_method_desc) {
				let new_name = self.lookup.remapped_method(outer_class, outer_method.as_str(), outer_method_desc.as_str());
				class.outer_method = Some(classtree::tree::method::MethodName::new(new_name)
					.map_err(|_| RemapError::InvalidRenameRequest {
						owner: outer_class.clone(),
						name: outer_method.as_str().to_owned(),
						desc: outer_method_desc.as_str().to_owned(),
						reason: "remapped_method produced an invalid method name",
					})?);
			}
			class.outer_class = Some(self.lookup.remapped_class(outer_class));
		}

		if let Some(outer_method_desc) = &class.outer_method_desc {
			let (_, new_desc) = rewrite_signature(self.lookup, outer_method_desc.as_str())?;
			// SAFETY: `rewrite_signature` preserves the method descriptor grammar.
			class.outer_method_desc = Some(unsafe { MethodDescriptor::new_unchecked(new_desc) });
		}

		if let Some(permitted) = &mut class.permitted_subclasses {
			for subclass in permitted {
				*subclass = self.lookup.remapped_class(subclass);
			}
		}

		for record in &mut class.record_components {
			let (_, new_desc) = rewrite_signature(self.lookup, record.descriptor.as_str())?;
			// SAFETY: `rewrite_signature` preserves the field descriptor grammar.
			record.descriptor = unsafe { FieldDescriptor::new_unchecked(new_desc) };

			for annotation in record.runtime_invisible_type_annotations.iter_mut().map(|a| &mut a.annotation)
				.chain(record.runtime_invisible_annotations.iter_mut())
				.chain(record.runtime_visible_type_annotations.iter_mut().map(|a| &mut a.annotation))
				.chain(record.runtime_visible_annotations.iter_mut())
			{
				self.rewrite_annotation(annotation)?;
			}

			if let Some(signature) = &record.signature {
				let (_, new_sig) = rewrite_signature(self.lookup, signature.as_str())?;
				// SAFETY: see above.
				record.signature = Some(unsafe { FieldSignature::new_unchecked(new_sig) });
			}
		}

		if let Some(signature) = &class.signature {
			let (_, new_sig) = rewrite_signature(self.lookup, signature.as_str())?;
			class.signature = Some(unsafe { classtree::tree::class::ClassSignature::new_unchecked(new_sig) });
		}

		if let Some(super_name) = &class.super_name {
			class.super_name = Some(self.lookup.remapped_class(super_name));
		}

		// Must run last: steps above feed `owner` (the unmapped name) to every member lookup.
		class.name = self.lookup.remapped_class(&class.name);

		Ok(())
	}

	/// Rewrites a single field declaration. `owner` is the *unmapped* name of the class the
	/// field is declared in.
	pub fn rewrite_field(&self, owner: &classtree::tree::class::ClassName, field: &mut Field) -> Result<()> {
		let new_name = self.lookup.remapped_field(owner, field.name.as_str(), field.descriptor.as_str());
		field.name = classtree::tree::field::FieldName::new(new_name)
			.map_err(|_| RemapError::InvalidRenameRequest {
				owner: owner.clone(),
				name: field.name.as_str().to_owned(),
				desc: field.descriptor.as_str().to_owned(),
				reason: "remapped_field produced an invalid field name",
			})?;

		if field.descriptor.is_reference() {
			field.descriptor = rewrite_field_descriptor(self.lookup, &field.descriptor);
			if let Some(signature) = &field.signature {
				let (_, new_sig) = rewrite_signature(self.lookup, signature.as_str())?;
				field.signature = Some(unsafe { FieldSignature::new_unchecked(new_sig) });
			}
		}

		for annotation in field.runtime_invisible_type_annotations.iter_mut().map(|a| &mut a.annotation)
			.chain(field.runtime_invisible_annotations.iter_mut())
			.chain(field.runtime_visible_type_annotations.iter_mut().map(|a| &mut a.annotation))
			.chain(field.runtime_visible_annotations.iter_mut())
		{
			self.rewrite_annotation(annotation)?;
		}

		Ok(())
	}

	/// Rewrites a single method declaration. `owner` is the *unmapped* name of the class the
	/// method is declared in.
	pub fn rewrite_method(&self, owner: &classtree::tree::class::ClassName, method: &mut Method) -> Result<()> {
		let new_name = self.lookup.remapped_method(owner, method.name.as_str(), method.descriptor.as_str());
		method.name = classtree::tree::method::MethodName::new(new_name)
			.map_err(|_| RemapError::InvalidRenameRequest {
				owner: owner.clone(),
				name: method.name.as_str().to_owned(),
				desc: method.descriptor.as_str().to_owned(),
				reason: "remapped_method produced an invalid method name",
			})?;

		if let Some(exceptions) = &mut method.exceptions {
			for exception in exceptions {
				*exception = self.lookup.remapped_class(exception);
			}
		}

		for annotation in method.runtime_invisible_type_annotations.iter_mut().map(|a| &mut a.annotation)
			.chain(method.runtime_invisible_annotations.iter_mut())
			.chain(method.runtime_visible_type_annotations.iter_mut().map(|a| &mut a.annotation))
			.chain(method.runtime_visible_annotations.iter_mut())
		{
			self.rewrite_annotation(annotation)?;
		}

		for parameter_list in method.runtime_invisible_parameter_annotations.iter_mut()
			.chain(method.runtime_visible_parameter_annotations.iter_mut())
		{
			for annotation in parameter_list {
				self.rewrite_annotation(annotation)?;
			}
		}

		if let Some(code) = &mut method.code {
			self.rewrite_code(code)?;
		}

		let (_, new_desc) = rewrite_signature(self.lookup, method.descriptor.as_str())?;
		// SAFETY: `rewrite_signature` preserves the method descriptor grammar.
		method.descriptor = unsafe { MethodDescriptor::new_unchecked(new_desc) };

		if let Some(signature) = &method.signature {
			let (_, new_sig) = rewrite_signature(self.lookup, signature.as_str())?;
			method.signature = Some(unsafe { classtree::tree::method::MethodSignature::new_unchecked(new_sig) });
		}

		if let Some(default_value) = &mut method.annotation_default {
			// Const values are a no-op inside `rewrite_annotation_value` itself, so the "not a
			// numeric constant" guard falls out of the dispatch for free.
			self.rewrite_annotation_value(default_value)?;
		}

		Ok(())
	}

	/// Walks a `Code` attribute's instruction list, local variables, and type-annotations.
	///
	/// Try/catch type-annotations (`TargetInfoCode::ExceptionParameter`) live in this same
	/// `Code`-level type-annotation list in this tree model rather than on each `Exception`
	/// entry, so they're covered once here rather than per try/catch block.
	fn rewrite_code(&self, code: &mut Code) -> Result<()> {
		for exception in &mut code.exception_table {
			if let Some(catch) = &exception.catch {
				exception.catch = Some(self.lookup.remapped_class(catch));
			}
		}

		for lv in &mut code.local_variables {
			lv.descriptor = lv.descriptor.take().map(|desc| rewrite_field_descriptor(self.lookup, &desc));
			if let Some(signature) = &lv.signature {
				let (_, new_sig) = rewrite_signature(self.lookup, signature.as_str())?;
				lv.signature = Some(unsafe { FieldSignature::new_unchecked(new_sig) });
			}
		}

		for type_annotation in code.runtime_invisible_type_annotations.iter_mut()
			.chain(code.runtime_visible_type_annotations.iter_mut())
		{
			self.rewrite_annotation(&mut type_annotation.annotation)?;
		}

		for entry in &mut code.instructions {
			if let Some(frame) = &mut entry.frame {
				for slot in frame.locals.iter_mut().chain(frame.stack.iter_mut()) {
					if let FrameEntry::Object(name) = slot {
						*name = rewrite_internal_name(self.lookup, name);
					}
				}
			}

			self.rewrite_instruction(&mut entry.instruction)?;
		}

		Ok(())
	}

	fn rewrite_instruction(&self, instruction: &mut Instruction) -> Result<()> {
		match instruction {
			Instruction::GetStatic(field_ref) | Instruction::PutStatic(field_ref)
			| Instruction::GetField(field_ref) | Instruction::PutField(field_ref) => {
				let new_name = self.lookup.remapped_field(&field_ref.class, field_ref.name.as_str(), field_ref.desc.as_str());
				field_ref.name = unsafe { classtree::tree::field::FieldName::new_unchecked(new_name) };
				field_ref.desc = rewrite_field_descriptor(self.lookup, &field_ref.desc);
				field_ref.class = self.lookup.remapped_class(&field_ref.class);
			}

			Instruction::InvokeDynamic(invoke) => {
				self.rewrite_invoke_dynamic(invoke)?;
			}

			Instruction::Ldc(constant) => {
				self.rewrite_constant(constant)?;
			}

			Instruction::InvokeVirtual(method_ref) | Instruction::InvokeInterface(method_ref) => {
				self.rewrite_method_ref(method_ref)?;
			}
			Instruction::InvokeSpecial(method_ref, _) | Instruction::InvokeStatic(method_ref, _) => {
				self.rewrite_method_ref(method_ref)?;
			}

			Instruction::MultiANewArray(desc, _) => {
				*desc = rewrite_field_descriptor(self.lookup, desc);
			}

			Instruction::New(class_name) | Instruction::ANewArray(class_name)
			| Instruction::CheckCast(class_name) | Instruction::InstanceOf(class_name) => {
				*class_name = rewrite_internal_name(self.lookup, class_name);
			}

			_ => {}
		}
		Ok(())
	}

	/// Rewrites a method-referencing instruction's owner/name/descriptor.
	///
	/// An owner beginning with `[` is an array-target call (e.g. `clone()` on an array type):
	/// only the owner is rewritten, and as a field descriptor, since array class names follow
	/// that grammar; the method name is never looked up for these (arrays never declare their
	/// own methods).
	fn rewrite_method_ref(&self, method_ref: &mut classtree::tree::method::MethodRef) -> Result<()> {
		if method_ref.class.is_array() {
			method_ref.class = rewrite_internal_name(self.lookup, &method_ref.class);
		} else {
			let new_name = self.lookup.remapped_method(&method_ref.class, method_ref.name.as_str(), method_ref.desc.as_str());
			method_ref.name = unsafe { classtree::tree::method::MethodName::new_unchecked(new_name) };
			method_ref.class = self.lookup.remapped_class(&method_ref.class);
		}

		let (_, new_desc) = rewrite_signature(self.lookup, method_ref.desc.as_str())?;
		method_ref.desc = unsafe { MethodDescriptor::new_unchecked(new_desc) };
		Ok(())
	}

	fn rewrite_invoke_dynamic(&self, invoke: &mut InvokeDynamic) -> Result<()> {
		let sam_owner = extract_return_class(&invoke.descriptor);

		if let (Some(sam_owner), Some(BsmArgument::Type(BsmType::Method(sam_desc)))) = (&sam_owner, invoke.arguments.first()) {
			let new_name = self.lookup.remapped_method(sam_owner, invoke.name.as_str(), sam_desc.as_str());
			invoke.name = unsafe { classtree::tree::method::MethodName::new_unchecked(new_name) };
		} else {
			// Not every bootstrap has a method-sort `Type` first argument to borrow a SAM owner
			// from, e.g. `StringConcatFactory.makeConcatWithConstants`'s first argument is the
			// recipe `String`. That's valid bytecode, not a malformed classfile; there's no name
			// to remap here, so it's left unmapped and traversal continues.
			trace!("invokedynamic {} has no method-sort first bootstrap argument, leaving its name unmapped", invoke.name);
		}

		for argument in &mut invoke.arguments {
			self.rewrite_bsm_argument(argument)?;
		}

		let (_, new_desc) = rewrite_signature(self.lookup, invoke.descriptor.as_str())?;
		invoke.descriptor = unsafe { MethodDescriptor::new_unchecked(new_desc) };

		Ok(())
	}

	fn rewrite_bsm_argument(&self, argument: &mut BsmArgument) -> Result<()> {
		match argument {
			BsmArgument::Type(BsmType::Method(desc)) => {
				let (_, new_desc) = rewrite_signature(self.lookup, desc.as_str())?;
				*desc = unsafe { MethodDescriptor::new_unchecked(new_desc) };
			}
			BsmArgument::Type(BsmType::Object(class_name)) => {
				*class_name = rewrite_internal_name(self.lookup, class_name);
			}
			BsmArgument::MethodHandle(handle) => {
				self.rewrite_handle(handle)?;
			}
			BsmArgument::String(_) => {}
		}
		Ok(())
	}

	fn rewrite_handle(&self, handle: &mut Handle) -> Result<()> {
		match handle {
			Handle::GetField(field_ref) | Handle::GetStatic(field_ref)
			| Handle::PutField(field_ref) | Handle::PutStatic(field_ref) => {
				let new_name = self.lookup.remapped_field(&field_ref.class, field_ref.name.as_str(), field_ref.desc.as_str());
				field_ref.name = unsafe { classtree::tree::field::FieldName::new_unchecked(new_name) };
				field_ref.desc = rewrite_field_descriptor(self.lookup, &field_ref.desc);
				field_ref.class = self.lookup.remapped_class(&field_ref.class);
			}
			Handle::InvokeVirtual(method_ref) | Handle::NewInvokeSpecial(method_ref)
			| Handle::InvokeInterface(method_ref) => {
				self.rewrite_handle_method_ref(method_ref)?;
			}
			Handle::InvokeStatic(method_ref, _) | Handle::InvokeSpecial(method_ref, _) => {
				self.rewrite_handle_method_ref(method_ref)?;
			}
		}
		Ok(())
	}

	fn rewrite_handle_method_ref(&self, method_ref: &mut classtree::tree::method::MethodRef) -> Result<()> {
		let new_name = self.lookup.remapped_method(&method_ref.class, method_ref.name.as_str(), method_ref.desc.as_str());
		method_ref.name = unsafe { classtree::tree::method::MethodName::new_unchecked(new_name) };
		let (_, new_desc) = rewrite_signature(self.lookup, method_ref.desc.as_str())?;
		method_ref.desc = unsafe { MethodDescriptor::new_unchecked(new_desc) };
		method_ref.class = self.lookup.remapped_class(&method_ref.class);
		Ok(())
	}

	fn rewrite_constant(&self, constant: &mut Constant) -> Result<()> {
		match constant {
			Constant::Class(desc) => {
				*desc = rewrite_field_descriptor(self.lookup, desc);
			}
			Constant::MethodHandle(handle) => {
				self.rewrite_handle(handle)?;
			}
			Constant::MethodType(desc) => {
				let (_, new_desc) = rewrite_signature(self.lookup, desc.as_str())?;
				*desc = unsafe { MethodDescriptor::new_unchecked(new_desc) };
			}
			Constant::Dynamic(condy) => {
				// There's no owner to derive a rename for a dynamic constant's own
				// `name`/`descriptor` from (unlike invokedynamic, there's no SAM-interface
				// convention to borrow one from), so they're left alone; its handle and
				// bootstrap arguments follow the same rule as a bootstrap method's.
				self.rewrite_handle(&mut condy.handle)?;
				for argument in &mut condy.arguments {
					self.rewrite_bsm_argument(argument)?;
				}
			}
			Constant::Integer(_) | Constant::Float(_) | Constant::Long(_)
			| Constant::Double(_) | Constant::String(_) => {}
		}
		Ok(())
	}

	fn rewrite_annotation(&self, annotation: &mut Annotation) -> Result<()> {
		annotation.annotation_type = rewrite_field_descriptor(self.lookup, &annotation.annotation_type);
		for pair in &mut annotation.element_value_pairs {
			// `pair.name` is the annotation interface's element (method) name; it is never
			// renamed here — there is no owner context at this point to resolve it against.
			self.rewrite_annotation_value(&mut pair.value)?;
		}
		Ok(())
	}

	fn rewrite_annotation_value(&self, value: &mut ElementValue) -> Result<()> {
		match value {
			ElementValue::Class(desc) => {
				let (_, new_desc) = rewrite_signature(self.lookup, desc.as_str())?;
				// SAFETY: `rewrite_signature` preserves the field descriptor grammar.
				*desc = unsafe { FieldDescriptor::new_unchecked(new_desc) };
			}
			ElementValue::Enum { type_name, const_name } => {
				let owner = extract_owner_from_descriptor(type_name);
				if let Some(owner) = owner {
					let new_const_name = self.lookup.remapped_field(&owner, const_name.as_str(), type_name.as_str());
					*const_name = unsafe { classtree::tree::field::FieldName::new_unchecked(new_const_name) };
				}
				*type_name = rewrite_field_descriptor(self.lookup, type_name);
			}
			ElementValue::Annotation(nested) => {
				self.rewrite_annotation(nested)?;
			}
			ElementValue::Array(values) => {
				for inner in values {
					self.rewrite_annotation_value(inner)?;
				}
			}
			ElementValue::Const(_) => {}
		}
		Ok(())
	}
}

/// Extracts the internal name of an `L...;`-shaped field descriptor without rewriting it.
fn extract_owner_from_descriptor(desc: &FieldDescriptor) -> Option<classtree::tree::class::ClassName> {
	let s = desc.as_str();
	let rest = s.strip_prefix('L')?;
	let inner = rest.strip_suffix(';')?;
	// SAFETY: this is the internal-name portion of an already-valid field descriptor.
	Some(unsafe { classtree::tree::class::ClassName::new_unchecked(inner.to_owned()) })
}

/// Extracts the (unmapped) internal name of an invokedynamic call site descriptor's return
/// type — the "SAM interface" a `LambdaMetafactory`-shaped bootstrap implements.
fn extract_return_class(desc: &MethodDescriptor) -> Option<classtree::tree::class::ClassName> {
	let s = desc.as_str();
	let close_paren = s.rfind(')')?;
	let (_, return_type) = s.split_at(close_paren + 1);
	let rest = return_type.strip_prefix('L')?;
	let inner = rest.strip_suffix(';')?;
	Some(unsafe { classtree::tree::class::ClassName::new_unchecked(inner.to_owned()) })
}
