use java_string::{JavaStr, JavaString};
use classtree::tree::class::ClassName;

/// The enumerable failure surface of this engine (see `mapping`, `hierarchy`, `signature`).
///
/// Missing mappings are never an error: a lookup miss returns the source name unchanged.
/// These variants cover only the cases where the caller (or the classfile itself) violated an
/// invariant the engine depends on.
#[derive(Debug, thiserror::Error)]
pub enum RemapError {
	#[error("cannot rename {owner}.{name}{desc}: {reason}")]
	InvalidRenameRequest {
		owner: ClassName,
		name: JavaString,
		desc: JavaString,
		reason: &'static str,
	},

	#[error("realm lookup for {owner}.{name}{desc} returned a definition of a different kind (field vs method)")]
	RealmKindMismatch {
		owner: ClassName,
		name: JavaString,
		desc: JavaString,
	},

	#[error("bootstrap method argument has an unsupported shape: {shape}")]
	UnexpectedBsmArgument { shape: &'static str },

	#[error("internal invariant violated: {0} is missing from the realm table after its supertype was processed")]
	MissingRealmAssertion(JavaString),

	#[error("malformed generic signature {signature:?}: {reason}")]
	MalformedSignature { signature: JavaString, reason: &'static str },
}

pub type Result<T> = std::result::Result<T, RemapError>;

impl RemapError {
	pub(crate) fn invalid_rename(owner: &ClassName, name: &JavaStr, desc: &JavaStr, reason: &'static str) -> RemapError {
		RemapError::InvalidRenameRequest {
			owner: owner.clone(),
			name: name.to_owned(),
			desc: desc.to_owned(),
			reason,
		}
	}
}
