use java_string::JavaString;
use crate::macros::make_jvm_string;
use crate::tree::class::ClassName;

/// The `Module` attribute (JVMS §4.7.25). Only `uses` and `main_class` name classes directly;
/// the rest of this structure (requires/exports/opens/provides) is carried verbatim by the
/// remapper.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
	pub name: ModuleName,
	pub flags: ModuleFlags,
	pub version: Option<JavaString>,
	pub requires: Vec<ModuleRequires>,
	pub exports: Vec<ModuleExports>,
	pub opens: Vec<ModuleOpens>,
	pub uses: Vec<ClassName>,
	pub provides: Vec<ModuleProvides>,
	/// The `ModuleMainClass` attribute (JVMS §4.7.27), folded into this node the way an
	/// ASM-equivalent tree bundles it with the `Module` attribute proper.
	pub main_class: Option<ClassName>,
}

make_jvm_string!(
	pub ModuleName;
	is_valid(_s) = Ok(());
);

make_jvm_string!(
	pub PackageName;
	is_valid(_s) = Ok(());
);

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ModuleFlags {
	pub is_open: bool,
	pub is_synthetic: bool,
	pub is_mandated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleRequires {
	pub module: ModuleName,
	pub is_transitive: bool,
	pub is_static_phase: bool,
	pub is_synthetic: bool,
	pub is_mandated: bool,
	pub version: Option<JavaString>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleExports {
	pub package: PackageName,
	pub is_synthetic: bool,
	pub is_mandated: bool,
	pub to: Vec<ModuleName>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleOpens {
	pub package: PackageName,
	pub is_synthetic: bool,
	pub is_mandated: bool,
	pub to: Vec<ModuleName>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleProvides {
	pub service: ClassName,
	pub with: Vec<ClassName>,
}
