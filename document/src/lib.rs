//! Declarative spec documents for `argdecl-core`.
//!
//! A [`SpecDocument`] describes a program's arguments in YAML or JSON and
//! converts into a [`Specification`](argdecl_core::Specification):
//!
//! ```
//! use argdecl_document::from_json_str;
//!
//! let doc = from_json_str(r#"{
//!     "name": "greet",
//!     "args": [
//!         {"name": "loud", "variants": ["-l", "--loud"], "kind": "count"},
//!         {"name": "who", "variants": ["<who>"], "optional": true, "default": "world"}
//!     ]
//! }"#).unwrap();
//!
//! let mut spec = doc.to_specification().unwrap();
//! spec.parse(&["-l"], &doc.name).unwrap();
//! assert!(spec.get("loud").unwrap().seen());
//! assert_eq!(spec.get("who").unwrap().value::<String>().unwrap(), "world");
//! ```

mod convert;
mod document;
mod error;
mod loader;

pub use document::{
    AlternativesDocument, ArgAction, ArgDocument, EntryDocument, SpecDocument, ValueType,
};
pub use error::{DocumentError, Result};
pub use loader::{Format, from_json_str, from_yaml_str, load};
