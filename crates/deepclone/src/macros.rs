// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Struct reflection macro.

/// Declare a struct and implement [`Reflect`](crate::Reflect) for it.
///
/// Fields with a visibility qualifier (`pub`, `pub(crate)`, ...) are
/// exported. Fields without one are private: generic copying leaves them at
/// their zero value unless a custom copier is registered for the type.
///
/// Field types may refer to the struct itself through `Option<Box<Self>>`,
/// `Vec<Self>` or a map value.
///
/// ```rust
/// deepclone::reflect_struct! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct Session {
///         pub user: String,
///         pub roles: Vec<String>,
///         token: u64,
///     }
/// }
///
/// let cloner = deepclone::Cloner::new();
/// let session = Session { user: "ada".into(), roles: vec!["admin".into()], token: 7 };
/// let copy = cloner.deep_clone(&session).unwrap();
/// assert_eq!(copy.user, "ada");
/// assert_eq!(copy.token, 0);
/// ```
#[macro_export]
macro_rules! reflect_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $field_ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $field_ty,
            )*
        }

        impl $crate::Reflect for $name {
            fn type_descriptor() -> ::std::sync::Arc<$crate::TypeDescriptor> {
                static DESCRIPTOR: ::std::sync::OnceLock<::std::sync::Arc<$crate::TypeDescriptor>> =
                    ::std::sync::OnceLock::new();
                // Fields resolve lazily so a field type may refer back to this struct.
                DESCRIPTOR
                    .get_or_init(|| {
                        ::std::sync::Arc::new($crate::TypeDescriptor::lazy_struct(
                            concat!(module_path!(), "::", stringify!($name)),
                            || {
                                vec![
                                    $(
                                        $crate::FieldDescriptor::new(
                                            stringify!($field),
                                            <$field_ty as $crate::Reflect>::type_descriptor(),
                                        )
                                        .exported(!stringify!($field_vis).is_empty()),
                                    )*
                                ]
                            },
                        ))
                    })
                    .clone()
            }

            fn to_value(&self) -> $crate::Value {
                $crate::Value::Struct($crate::StructValue::new(
                    <Self as $crate::Reflect>::type_descriptor(),
                    vec![$($crate::Reflect::to_value(&self.$field)),*],
                ))
            }

            fn from_value(value: &$crate::Value) -> ::std::result::Result<Self, $crate::ValueError> {
                let descriptor = <Self as $crate::Reflect>::type_descriptor();
                let mut fields = $crate::expect_struct_fields(value, &descriptor)?.iter();
                let _ = &mut fields;
                ::std::result::Result::Ok(Self {
                    $(
                        $field: $crate::next_field(&mut fields, stringify!($field))?,
                    )*
                })
            }
        }
    };
}
