//! `define_port_error!`: declares a driven-port error enum together with
//! snake_case constructors, so adapters write
//! `PostRepositoryError::connection(msg)` instead of building variants by
//! hand.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),* },
            )*
        }

        impl $name {
            $(
                define_port_error!(@constructor $variant [] [] $($field : $ty,)*);
            )*
        }
    };

    (@constructor $variant:ident [$($params:tt)*] [$($inits:tt)*]) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@constructor $variant:ident [$($params:tt)*] [$($inits:tt)*] $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @constructor
            $variant
            [$($params)* $field: impl Into<$ty>,]
            [$($inits)* $field: $field.into(),]
            $($rest)*
        );
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum LookupError {
            Unavailable { message: String } => "unavailable: {message}",
            Overloaded { retry_after_secs: u64 } => "overloaded for {retry_after_secs}s",
            Partial { message: String, missing: usize } => "partial: {message} ({missing} missing)",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = LookupError::unavailable("timeout");
        assert_eq!(err.to_string(), "unavailable: timeout");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = LookupError::overloaded(30_u64);
        assert_eq!(err.to_string(), "overloaded for 30s");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = LookupError::partial("authors", 2_usize);
        assert_eq!(
            err,
            LookupError::Partial {
                message: "authors".to_owned(),
                missing: 2,
            }
        );
    }
}
