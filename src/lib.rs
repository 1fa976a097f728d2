//! # Tenken - Procedure Builder Engine
//!
//! **Tenken** is the editing engine behind an inspection procedure builder. A
//! procedure is an ordered tree of fields, headings and sections in which a
//! field can gate further content behind conditions on its answer ("if the
//! pump is *not OK*, ask for a photo"). Tenken keeps that tree consistent while
//! it is edited, evaluates conditions for a live preview, and converts it to and
//! from the backend's flat JSON storage format.
//!
//! ## Core Workflow
//!
//! 1.  **Load**: Fetch a stored procedure and rebuild it with `Procedure::load`
//!     (or open it through a `Session`). Any payload type can take part by
//!     implementing `IntoProcedure`.
//! 2.  **Edit**: Insert, update, duplicate, delete, move and retype nodes, and
//!     attach condition groups to logic-enabled fields. Every operation keeps the
//!     structural rules intact: sections never nest, conditions only hang off
//!     fields whose type supports them.
//! 3.  **Preview**: Resolve which nodes a respondent would see for a set of
//!     answers with `resolve_visibility`.
//! 4.  **Save**: Serialize the tree into a `SaveRequest` and hand it to a
//!     `ProcedureService`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tenken::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     let mut procedure = Procedure::empty(IdGenerator::random());
//!     procedure.meta.title = "Daily pump check".to_string();
//!
//!     // A checkbox that reveals a photo field once it is ticked.
//!     let leak = procedure
//!         .insert(Container::Root, NodeDraft::field("Leak found", FieldType::Checkbox))
//!         .ok_or("insert failed")?;
//!     let group = procedure
//!         .add_condition(leak, Condition::checked())
//!         .ok_or("condition rejected")?;
//!     procedure.insert(
//!         Container::Condition(group),
//!         NodeDraft::field("Photo of the leak", FieldType::File).required(),
//!     );
//!
//!     // Which fields does a respondent see after ticking the box?
//!     let mut answers = Answers::new();
//!     answers.insert(leak, json!(true));
//!     for id in visible_nodes(&procedure, &answers) {
//!         if let Some(node) = procedure.find(id) {
//!             println!("-> {}", node.label());
//!         }
//!     }
//!
//!     // Persist through any backend implementation.
//!     let mut backend = MemoryBackend::new();
//!     let id = backend.create(&procedure.to_save_request("org-1"))?;
//!     println!("Saved as {}", id);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod prelude;
pub mod service;
pub mod session;
pub mod snapshot;
pub mod trace;
pub mod tree;
pub mod wire;
