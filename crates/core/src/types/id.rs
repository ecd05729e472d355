//! Typed identifiers for API entities.
//!
//! Products and categories are numbered by the API's SQL store; users and
//! orders get opaque strings (UUIDs and Mongo document ids). Wrapping both
//! keeps a `ProductId` from being passed where a `CategoryId` is expected.

/// Declare an identifier newtype.
///
/// `define_id!(Name: i32)` gives a `Copy` integer id with `new` and
/// `as_i32`; `define_id!(Name: String)` gives an owned string id with `new`
/// and `as_str`. Both serialize as the bare value.
///
/// ```rust
/// # use devburger_core::define_id;
/// define_id!(TableId: i32);
/// define_id!(TicketId: String);
///
/// assert_eq!(TableId::new(4).to_string(), "4");
/// assert_eq!(TicketId::new("a-1").as_str(), "a-1");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident: i32) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        $crate::define_id!(@display $name);
    };

    ($name:ident: String) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        $crate::define_id!(@display $name);
    };

    (@display $name:ident) => {
        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

define_id!(ProductId: i32);
define_id!(CategoryId: i32);
define_id!(UserId: String);
define_id!(OrderId: String);
