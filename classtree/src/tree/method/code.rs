use java_string::JavaString;
use crate::tree::attribute::Attribute;
use crate::tree::class::ClassName;
use crate::tree::field::{FieldDescriptor, FieldName, FieldRef, FieldSignature};
use crate::tree::method::{MethodDescriptor, MethodName, MethodRef};
use crate::tree::type_annotation::{TargetInfoCode, TypeAnnotation};

/// A single entry of the `Code` attribute's virtual instruction stream: the (optional) label
/// at this position, the (optional) stack-map frame recorded for it, and the instruction
/// itself.
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionListEntry {
	pub label: Option<Label>,
	pub frame: Option<Frame>,
	pub instruction: Instruction,
}

/// The body of a method, i.e. the `Code` attribute (JVMS §4.7.3).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Code {
	pub max_stack: u16,
	pub max_locals: u16,

	pub instructions: Vec<InstructionListEntry>,
	pub exception_table: Vec<Exception>,

	pub line_numbers: Vec<(Label, u16)>,
	pub local_variables: Vec<Lv>,

	pub runtime_visible_type_annotations: Vec<TypeAnnotation<TargetInfoCode>>,
	pub runtime_invisible_type_annotations: Vec<TypeAnnotation<TargetInfoCode>>,

	pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exception {
	pub start: Label,
	pub end: Label,
	pub handler: Label,
	pub catch: Option<ClassName>,
}

/// The index of a local variable slot. A `double`/`long` also occupies `index + 1`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LvIndex {
	pub index: u16,
}

/// A bytecode-offset range, as a pair of method-local label ids: `start` inclusive, `end`
/// exclusive.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LabelRange {
	pub start: Label,
	pub end: Label,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lv {
	pub range: LabelRange,
	pub name: JavaString,
	pub descriptor: Option<FieldDescriptor>,
	pub signature: Option<FieldSignature>,
	pub index: LvIndex,
}

/// A method-local, opaque id for a bytecode offset.
///
/// This does not correspond to a bytecode offset directly; it is only meaningful for
/// identifying the same offset from multiple places (jump targets, exception ranges, line
/// numbers) within one `Code` attribute.
#[derive(Debug, Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct Label {
	pub id: u16,
}

/// A single verification-type-info entry of a stack map frame (JVMS §4.7.4).
#[derive(Debug, Clone, PartialEq)]
pub enum FrameEntry {
	Top,
	Integer,
	Float,
	Long,
	Double,
	Null,
	UninitializedThis,
	/// Holds the internal name (or, rarely, an array descriptor) of the verification type.
	Object(ClassName),
	Uninitialized(Label),
}

/// An explicit (non-computed) stack map frame, as the engine sees it attached to an
/// instruction-list entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
	pub locals: Vec<FrameEntry>,
	pub stack: Vec<FrameEntry>,
}

/// A JVM bytecode instruction.
///
/// Operand-free and immediate-value opcodes are grouped together for brevity; opcodes that
/// can textually name a class or member get their own variant so the remapper can pattern
/// match on exactly the shape it needs to rewrite.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
	Nop,
	AConstNull,
	IConst(i32),
	LConst(i64),
	FConst(f32),
	DConst(f64),
	BiPush(i8),
	SiPush(i16),
	Ldc(Constant),
	ILoad(LvIndex), LLoad(LvIndex), FLoad(LvIndex), DLoad(LvIndex), ALoad(LvIndex),
	IALoad, LALoad, FALoad, DALoad, AALoad, BALoad, CALoad, SALoad,
	IStore(LvIndex), LStore(LvIndex), FStore(LvIndex), DStore(LvIndex), AStore(LvIndex),
	IAStore, LAStore, FAStore, DAStore, AAStore, BAStore, CAStore, SAStore,
	Pop, Pop2,
	Dup, DupX1, DupX2, Dup2, Dup2X1, Dup2X2,
	Swap,
	IAdd, LAdd, FAdd, DAdd,
	ISub, LSub, FSub, DSub,
	IMul, LMul, FMul, DMul,
	IDiv, LDiv, FDiv, DDiv,
	IRem, LRem, FRem, DRem,
	INeg, LNeg, FNeg, DNeg,
	IShl, LShl, IShr, LShr, IUShr, LUShr,
	IAnd, LAnd, IOr, LOr, IXor, LXor,
	IInc(LvIndex, i16),
	I2L, I2F, I2D, L2I, L2F, L2D, F2I, F2L, F2D, D2I, D2L, D2F, I2B, I2C, I2S,
	LCmp, FCmpL, FCmpG, DCmpL, DCmpG,
	IfEq(Label), IfNe(Label), IfLt(Label), IfGe(Label), IfGt(Label), IfLe(Label),
	IfICmpEq(Label), IfICmpNe(Label), IfICmpLt(Label), IfICmpGe(Label), IfICmpGt(Label), IfICmpLe(Label),
	IfACmpEq(Label), IfACmpNe(Label),
	Goto(Label),
	Jsr(Label),
	Ret(LvIndex),
	TableSwitch { default: Label, low: i32, high: i32, table: Vec<Label> },
	LookupSwitch { default: Label, pairs: Vec<(i32, Label)> },
	IReturn, LReturn, FReturn, DReturn, AReturn, Return,

	GetStatic(FieldRef),
	PutStatic(FieldRef),
	GetField(FieldRef),
	PutField(FieldRef),

	InvokeVirtual(MethodRef),
	/// `true` iff resolved through an `InterfaceMethodref` constant-pool entry.
	InvokeSpecial(MethodRef, bool),
	/// `true` iff resolved through an `InterfaceMethodref` constant-pool entry.
	InvokeStatic(MethodRef, bool),
	InvokeInterface(MethodRef),
	InvokeDynamic(InvokeDynamic),

	New(ClassName),
	NewArray(PrimitiveArrayType),
	ANewArray(ClassName),
	ArrayLength,
	AThrow,
	CheckCast(ClassName),
	InstanceOf(ClassName),
	MonitorEnter, MonitorExit,
	/// Holds the full array descriptor (e.g. `[[Ljava/lang/String;`) and the dimension count
	/// actually built at runtime.
	MultiANewArray(FieldDescriptor, u8),
	IfNull(Label), IfNonNull(Label),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrimitiveArrayType {
	Boolean, Char, Float, Double, Byte, Short, Int, Long,
}

/// A constant-pool entry loadable by `ldc`/`ldc_w`/`ldc2_w`.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
	Integer(i32),
	Float(f32),
	Long(i64),
	Double(f64),
	String(JavaString),
	/// A `.class` literal. Holds the descriptor form so it covers primitive, array, and
	/// object class literals uniformly.
	Class(FieldDescriptor),
	MethodHandle(Handle),
	MethodType(MethodDescriptor),
	Dynamic(ConstantDynamic),
}

/// A `MethodHandle` constant-pool entry (JVMS §4.4.8), referencing a field or method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Handle {
	GetField(FieldRef),
	GetStatic(FieldRef),
	PutField(FieldRef),
	PutStatic(FieldRef),
	InvokeVirtual(MethodRef),
	InvokeStatic(MethodRef, bool),
	InvokeSpecial(MethodRef, bool),
	NewInvokeSpecial(MethodRef),
	InvokeInterface(MethodRef),
}

/// An argument to a bootstrap method, as stored in the `BootstrapMethods` attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum BsmArgument {
	Type(BsmType),
	MethodHandle(Handle),
	String(JavaString),
}

/// The two "sorts" of `Type` constant a bootstrap argument can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum BsmType {
	/// A method-type constant, e.g. the erased SAM signature passed to a
	/// `LambdaMetafactory` bootstrap.
	Method(MethodDescriptor),
	/// An object (or array) type constant.
	Object(ClassName),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDynamic {
	pub name: FieldName,
	pub descriptor: FieldDescriptor,
	pub handle: Handle,
	pub arguments: Vec<BsmArgument>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvokeDynamic {
	pub name: MethodName,
	/// The call site descriptor. Its return type names the functional interface ("SAM
	/// interface") the call site implements.
	pub descriptor: MethodDescriptor,
	pub handle: Handle,
	pub arguments: Vec<BsmArgument>,
}
