//! Argument composition for simc command lines.
//!
//! Callers build a tree of [`Arg`] nodes and flatten it into the ordered
//! token list handed to the simc process:
//!
//! ```text
//! Arguments ─┬─ Literal          "iterations=1000"
//!            ├─ Profile          "myprofile.simc"
//!            ├─ Export           "json2=out/result.json"
//!            └─ ProfileSet ───── "profileset.crit=..." / "profileset.crit+=..."
//! ```
//!
//! Rendering is pure apart from exports, which create their target directory
//! once when they are built.

mod composite;
mod error;
mod file;
mod loose;
mod node;
mod owner;
mod profileset;
mod value;

pub use composite::Arguments;
pub use error::ArgError;
pub use file::{normalize_path, ExportKind, FileExport, Profile, PROFILE_EXTENSION};
pub use loose::flatten_loose;
pub use node::Arg;
pub use owner::ArgumentOwner;
pub use profileset::ProfileSet;
pub use value::{KeyValue, Value};
