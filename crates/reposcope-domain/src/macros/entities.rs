/// Define a strong-typed UUID identifier for a domain entity.
///
/// Generates a newtype struct wrapping `uuid::Uuid` with `Display`,
/// `FromStr`, `Serialize`/`Deserialize`. The `v4` form generates random
/// identifiers; the `v7` form generates time-ordered identifiers so that
/// lexicographic/natural ordering approximates creation order.
#[macro_export]
macro_rules! define_id {
    ($name:ident, v4, $doc:expr) => {
        $crate::define_id!(@body $name, $doc, uuid::Uuid::new_v4);
    };
    ($name:ident, v7, $doc:expr) => {
        $crate::define_id!(@body $name, $doc, uuid::Uuid::now_v7);
    };
    (@body $name:ident, $doc:expr, $gen:expr) => {
        #[doc = $doc]
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            derive_more::Display,
            derive_more::From,
            derive_more::Into,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[display("{_0}")]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Generate a new identifier.
            #[must_use]
            pub fn new() -> Self {
                Self($gen())
            }

            /// Wrap an existing [`uuid::Uuid`].
            #[must_use]
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Hyphenated UUID string (allocates).
            #[must_use]
            pub fn as_str(&self) -> String {
                self.0.to_string()
            }

            /// Access the inner [`uuid::Uuid`].
            #[must_use]
            pub fn inner(&self) -> uuid::Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }

        impl AsRef<uuid::Uuid> for $name {
            fn as_ref(&self) -> &uuid::Uuid {
                &self.0
            }
        }
    };
}
