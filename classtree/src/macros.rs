/// Declares a newtype wrapping a [`java_string::JavaString`], with an associated validity
/// check run by every fallible constructor.
///
/// Unlike generators that also produce a borrowed, unsized slice type for zero-copy access
/// during byte-level parsing, this crate never parses bytes, so only the owned half is worth
/// the ceremony.
macro_rules! make_jvm_string {
	($(#[$meta:meta])* $vis:vis $name:ident; is_valid($s:ident) = $check:expr;) => {
		$(#[$meta])*
		#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
		$vis struct $name(java_string::JavaString);

		impl $name {
			/// Validates and wraps `inner`.
			pub fn new(inner: java_string::JavaString) -> anyhow::Result<Self> {
				Self::check_valid(&inner)?;
				Ok(Self(inner))
			}

			/// Wraps `inner` without validating it.
			///
			/// # Safety
			/// Callers must ensure `inner` satisfies this type's validity invariant.
			pub unsafe fn new_unchecked(inner: java_string::JavaString) -> Self {
				Self(inner)
			}

			fn check_valid($s: &java_string::JavaStr) -> anyhow::Result<()> {
				$check
			}

			pub fn as_str(&self) -> &java_string::JavaStr {
				&self.0
			}

			pub fn into_inner(self) -> java_string::JavaString {
				self.0
			}
		}

		impl std::convert::TryFrom<&str> for $name {
			type Error = anyhow::Error;
			fn try_from(value: &str) -> anyhow::Result<Self> {
				Self::new(java_string::JavaString::from(value))
			}
		}

		impl std::fmt::Debug for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				std::fmt::Debug::fmt(&self.0, f)
			}
		}

		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				std::fmt::Display::fmt(self.as_str(), f)
			}
		}

		impl std::borrow::Borrow<java_string::JavaStr> for $name {
			fn borrow(&self) -> &java_string::JavaStr {
				self.as_str()
			}
		}
	};
}

pub(crate) use make_jvm_string;
