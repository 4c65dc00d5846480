//! Type-erased component and store handles
//!
//! A registry has no idea what a component or a store is; it only hands back
//! whatever was registered. Handles are cheap to clone and compare by
//! identity, and the concrete value is recovered with a typed downcast.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

macro_rules! shared_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            value: Arc<dyn Any + Send + Sync>,
            type_name: &'static str,
        }

        impl $name {
            pub fn new<T: Any + Send + Sync>(value: T) -> Self {
                Self::from_arc(Arc::new(value))
            }

            pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
                Self {
                    value,
                    type_name: type_name::<T>(),
                }
            }

            pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
                self.value.downcast_ref::<T>()
            }

            pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
                self.value.clone().downcast::<T>().ok()
            }

            pub fn is<T: Any>(&self) -> bool {
                self.value.is::<T>()
            }

            /// Name of the concrete type this handle was created from
            pub fn type_name(&self) -> &'static str {
                self.type_name
            }

            /// True if both handles point at the same registered value
            pub fn ptr_eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.value, &other.value)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("type", &self.type_name)
                    .finish()
            }
        }
    };
}

shared_handle!(
    /// A renderable or callable unit registered under a component name
    ComponentHandle
);
shared_handle!(
    /// A plugin store registered under a store name
    StoreHandle
);

impl StoreHandle {
    /// Store for plugins that have no state to expose
    pub fn empty() -> Self {
        Self::new(())
    }
}
