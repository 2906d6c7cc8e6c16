//! Types and physical layout for Ember.
//!
//! A language-level [`Type`] is a scalar, a struct, a fixed-size array, or
//! an `Alt` over structs declared together. Each struct gets one [`Layout`]
//! per [`Target`], chosen once at declaration: the most compact [`Repr`]
//! the backend supports plus the accessors and constructor that go with it.
//!
//! Nothing here emits code; `ember_emit` turns layouts into text.

mod constant;
mod ids;
mod layout;
mod repr;
mod scalar;
mod target;
mod ty;

pub use constant::Constant;
pub use ids::IdGenerator;
pub use layout::{compute_layout, Accessor, Ctor, Layout, LayoutPath};
pub use repr::Repr;
pub use scalar::ScalarKind;
pub use target::Target;
pub use ty::{AltType, ArrayType, Field, StructType, Type};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{Type, Target, ScalarKind};
    ember_ir::static_assert_size!(Type, 16);
    ember_ir::static_assert_size!(Target, 1);
    ember_ir::static_assert_size!(ScalarKind, 1);
}
