//! Constant-folding emitter for Ember.
//!
//! Every expression lowers to one [`Value`]: a compile-time [`Constant`]
//! or the backend text of a runtime expression. Operators and calls go
//! through overload sets in [`Declarations`]; each [`Function`] decides per
//! call whether to fold or to emit. The same declarations drive both
//! targets, JavaScript and GLSL, whose outputs accumulate in a [`Program`].
//!
//! [`Constant`]: ember_types::Constant

mod block;
pub mod broadcast;
mod declarations;
mod deriv;
mod emitter;
mod function;
mod output;
pub mod prelude;
mod program;
mod value;

pub use block::Block;
pub use broadcast::{Reduce, ScalarOp};
pub use declarations::Declarations;
pub use deriv::differentiate;
pub use emitter::{Emitter, Scalars};
pub use function::{resolve, CallArgs, Candidate, Function, Param, ParamTy};
pub use output::{Output, GLSL_HEADER};
pub use prelude::Builtins;
pub use program::Program;
pub use value::{Payload, Value};
