//! Shared `sqlx` glue for string-backed domain types.

/// Implements `sqlx` `Type`, `Encode` and `Decode` for a type stored in a
/// `VARCHAR`/`TEXT` column (with the `postgres` feature).
///
/// The type must expose `as_str(&self) -> &str`. The decode body receives
/// the raw column value as a `String` bound to the given identifier.
macro_rules! impl_pg_text {
    ($name:ty, |$raw:ident| $decode:expr) => {
        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let $raw = <String as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                $decode
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::core::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <&str as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

pub(crate) use impl_pg_text;
