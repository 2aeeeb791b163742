/// Owned XML tree used for the parts this tool rewrites.
///
/// The main document part and the comments part are parsed into a tree of
/// owned nodes, mutated structurally, and serialized back. Parts the tool
/// does not touch never pass through this module; they round-trip as raw
/// bytes inside the package.
///
/// # Architecture
///
/// - `XmlElement` / `XmlNode`: the owned tree
/// - `parser`: quick-xml event stream -> tree, entities decoded, whitespace kept
/// - `writer`: tree -> bytes, minimal escaping, stable attribute order
pub mod node;
pub mod parser;
pub mod writer;

pub use node::{XmlElement, XmlNode};
pub use parser::parse_document;
pub use writer::serialize_document;
