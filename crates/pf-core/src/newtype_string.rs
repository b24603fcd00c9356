//! Macro for defining strongly-typed string newtypes.
//!
//! Every name-like type in Pennyflow shares one invariant (non-empty string)
//! and one set of trait impls. The macro generates all of it from a single
//! invocation so the wrappers cannot drift apart.

/// Define a strongly-typed, non-empty string newtype.
///
/// Generates:
/// - The struct with `Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize`
/// - Custom `Deserialize` that rejects empty strings
/// - `new()` (panics on empty), `try_new()` (returns Option), `as_str()`, `into_inner()`
/// - `Display`, `AsRef<str>`, `Deref<Target=str>`, `Borrow<str>`
/// - `From<&str>` / `From<String>` (panic on empty, like `new`)
/// - `PartialEq<str>`, `PartialEq<&str>`, `PartialEq<String>`
macro_rules! define_newtype_string {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        $vis struct $Name(String);

        impl<'de> serde::Deserialize<'de> for $Name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $Name::try_new(s).ok_or_else(|| {
                    serde::de::Error::custom(concat!(stringify!($Name), " must not be empty"))
                })
            }
        }

        impl $Name {
            /// Create a new instance, panicking if the name is empty.
            ///
            /// Prefer [`try_new`](Self::try_new) when handling untrusted input.
            pub fn new(name: impl Into<String>) -> Self {
                let s = name.into();
                assert!(!s.is_empty(), concat!(stringify!($Name), " must not be empty"));
                Self(s)
            }

            /// Try to create a new instance, returning `None` if the name is empty.
            pub fn try_new(name: impl Into<String>) -> Option<Self> {
                let s = name.into();
                if s.is_empty() {
                    None
                } else {
                    Some(Self(s))
                }
            }

            /// Return the underlying name as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $Name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $Name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $Name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $Name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl PartialEq<str> for $Name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $Name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<String> for $Name {
            fn eq(&self, other: &String) -> bool {
                self.0 == *other
            }
        }
    };
}

pub(crate) use define_newtype_string;
