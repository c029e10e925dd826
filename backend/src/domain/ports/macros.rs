//! Helper macro for declaring port error enums.
//!
//! Each variant becomes a `thiserror` variant plus a snake_case constructor
//! whose `String` fields accept anything `Into<String>`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SampleError {
            Missing { id: String } => "missing {id}",
            Busy { attempts: u32 } => "busy after {attempts} attempts",
            Closed => "closed",
        }
    }

    #[test]
    fn string_fields_accept_borrowed_input() {
        let err = SampleError::missing("abc");
        assert_eq!(err, SampleError::Missing { id: "abc".to_owned() });
        assert_eq!(err.to_string(), "missing abc");
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        assert_eq!(SampleError::busy(3_u32).to_string(), "busy after 3 attempts");
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(SampleError::closed().to_string(), "closed");
    }
}
