/// Defines a strongly typed configuration struct backed by a
/// [`ConfigInstance`](crate::ConfigInstance).
///
/// Each attribute is written as `getter / setter: type`, optionally followed
/// by a `["description"]` and a `{ option: value, .. }` block. Types are
/// `string`, `integer`, `float` and `symbol`; options are `required` and
/// `default`. Raw identifiers such as `r#type` declare the attribute `type`.
///
/// The generated struct gets:
/// - `config_schema()`, the shared [`Schema`](crate::Schema), built on first use
/// - `config_loader()`, a [`Loader`](crate::Loader) for that schema
/// - `load_from_string` and `load_from_file`
/// - one getter returning the converted value and one setter storing a raw value per attribute
/// - `Deref` to the underlying instance for `errors()`, `is_valid()` and friends
///
/// ```
/// configit::define_config! {
///     /// Settings for the frontend service.
///     pub struct ServiceConfig {
///         name / set_name: string ["The name of the service"] { required: true },
///         port / set_port: integer { required: true, default: 80 },
///         log_level / set_log_level: symbol { default: "debug" },
///     }
/// }
///
/// let mut config = ServiceConfig::load_from_string("name = \"svc\"\nlog_level = \"warn\"")?;
/// assert!(config.is_valid());
/// assert_eq!(config.log_level()?, "warn");
///
/// config.set_port("8080")?;
/// assert_eq!(config.port()?, 8080);
/// # Ok::<(), configit::ConfigError>(())
/// ```
#[macro_export]
macro_rules! define_config {
    (@rust string) => { ::std::string::String };
    (@rust integer) => { i64 };
    (@rust float) => { f64 };
    (@rust symbol) => { $crate::Symbol };

    (@name $field:ident) => {{
        let name: &'static str = stringify!($field);
        match name.strip_prefix("r#") {
            ::std::option::Option::Some(bare) => bare,
            ::std::option::Option::None => name,
        }
    }};

    (@tag string) => { $crate::TypeTag::STRING };
    (@tag integer) => { $crate::TypeTag::INTEGER };
    (@tag float) => { $crate::TypeTag::FLOAT };
    (@tag symbol) => { $crate::TypeTag::SYMBOL };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident / $setter:ident : $ty:ident
                $( [ $desc:literal ] )?
                $( { $( $key:ident : $val:expr ),* $(,)? } )?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            inner: $crate::ConfigInstance,
        }

        impl $name {
            /// The schema shared by every instance of this config.
            pub fn config_schema() -> ::std::sync::Arc<$crate::Schema> {
                static SCHEMA: ::std::sync::OnceLock<::std::sync::Arc<$crate::Schema>> =
                    ::std::sync::OnceLock::new();
                SCHEMA
                    .get_or_init(|| {
                        let mut builder = $crate::Schema::builder();
                        $(
                            #[allow(unused_mut)]
                            let mut options = $crate::AttributeOptions::new()
                                .of_type($crate::define_config!(@tag $ty));
                            $( $( options = options.$key($val); )* )?
                            let description: ::std::option::Option<&str> =
                                ::std::option::Option::None $( .or(::std::option::Option::Some($desc)) )?;
                            // Fields are Rust identifiers, and duplicates fail to compile
                            // as duplicate methods.
                            builder
                                .attribute(
                                    $crate::define_config!(@name $field),
                                    $crate::Declaration::new(description, options),
                                )
                                .expect("field names are unique identifiers");
                        )*
                        builder.build()
                    })
                    .clone()
            }

            pub fn config_loader() -> $crate::Loader {
                $crate::Loader::new(Self::config_schema())
            }

            pub fn load_from_string(text: &str) -> ::std::result::Result<Self, $crate::ConfigError> {
                Self::config_loader().load_from_string(text).map(Self::from)
            }

            pub fn load_from_file(
                path: impl ::std::convert::AsRef<::std::path::Path>,
            ) -> ::std::result::Result<Self, $crate::ConfigError> {
                Self::config_loader().load_from_file(path).map(Self::from)
            }

            pub fn into_inner(self) -> $crate::ConfigInstance {
                self.inner
            }

            $(
                $(#[$field_meta])*
                pub fn $field(
                    &self,
                ) -> ::std::result::Result<$crate::define_config!(@rust $ty), $crate::ConfigError> {
                    self.inner.get_as($crate::define_config!(@name $field))
                }

                pub fn $setter(
                    &mut self,
                    value: impl ::std::convert::Into<$crate::RawValue>,
                ) -> ::std::result::Result<(), $crate::ConfigError> {
                    self.inner.set($crate::define_config!(@name $field), value)
                }
            )*
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                Self {
                    inner: $crate::ConfigInstance::new(Self::config_schema()),
                }
            }
        }

        impl ::std::convert::From<$crate::ConfigInstance> for $name {
            fn from(inner: $crate::ConfigInstance) -> Self {
                Self { inner }
            }
        }

        impl ::std::ops::Deref for $name {
            type Target = $crate::ConfigInstance;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }

        impl ::std::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.inner
            }
        }
    };
}
