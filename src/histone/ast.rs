//! Abstract syntax tree
//!
//!     The parser produces a sequence of [Item]s. Text between blocks is kept verbatim,
//!     everything inside blocks becomes a [Node]. Downstream tools exchange the tree in
//!     its tagged-array wire form, see [wire]; the integer tags are listed in [tags].
//!
//!     The typed tree and the wire form carry the same information: encoding a parsed
//!     template and decoding it again yields the same tree.

pub mod decimal;
pub mod error;
pub mod node;
pub mod tags;
pub mod template;
pub mod wire;

pub use decimal::Decimal;
pub use error::AstError;
pub use node::{BinaryOp, IfArm, Item, MapEntry, Node, Segment, UnaryOp};
pub use tags::Tag;
pub use template::Template;
