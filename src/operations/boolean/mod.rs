pub mod arrangement;
mod assemble;
mod classify;
mod engine;
mod intersect_op;
mod merge;
pub mod noding;
mod options;
mod select;
pub mod snap;
mod subtract;
mod union;
mod xor;

pub use assemble::assemble_result;
pub use classify::classify_faces;
pub use engine::{boolean_execute, boolean_op, BooleanOperation};
pub use intersect_op::Intersect;
pub use merge::{merge_regions, Regions};
pub use options::BooleanOptions;
pub use select::{select_faces, Operation};
pub use subtract::Subtract;
pub use union::{union_components, Union};
pub use xor::Xor;
