//! # Yoshiki - Schema-Driven Form Engine
//!
//! **Yoshiki** turns declarative form schemas into render instructions. It decides
//! which fields are visible from the current answers, keeps dependent option
//! lists (e.g. states for a selected country) in step with the fields they
//! depend on, and drives a form session through editing and submission.
//!
//! ## Core Workflow
//!
//! 1.  **Load a Schema**: Parse the wire format with `parse_forms`, or implement
//!     `IntoSchema` for your own structs to convert them into `Form`s.
//! 2.  **Open a Session**: Create a `FormSession` from the forms. It owns the
//!     answers, the option cache and the submit lifecycle.
//! 3.  **Edit**: Every `set_answer` returns the option fetches the edit made
//!     necessary. Fetched lists are applied with `apply_options` and are only
//!     accepted while the value they were fetched for is still current.
//! 4.  **Render**: `render` walks the forms depth-first and yields one instruction
//!     per visible node. Hidden groups take their whole subtree with them.
//!
//! `FormController` wraps all of this behind async collaborators
//! (`SchemaSource`, `OptionSource`, `SubmitSink`). With the default `http`
//! feature, `HttpBackend` implements all three over HTTP.
//!
//! ## Quick Start
//!
//! ```rust
//! use yoshiki::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let forms = parse_forms(
//!         r#"[{
//!             "formId": "travel",
//!             "title": "Travel Insurance",
//!             "fields": [
//!                 { "id": "country", "type": "select", "label": "Country", "options": ["US", "IN"] },
//!                 { "id": "state", "type": "select", "label": "State",
//!                   "dynamicOptions": { "dependsOn": "country", "endpoint": "/states", "method": "get" } }
//!             ]
//!         }]"#,
//!     )?;
//!
//!     let mut session = FormSession::new(forms);
//!
//!     // Choosing a country asks for the state list of that country.
//!     let requests = session.set_answer("country", "US")?;
//!     assert_eq!(requests.len(), 1);
//!     assert_eq!(requests[0].value, "US");
//!
//!     // Until the lookup resolves, only the placeholder is offered.
//!     let options = session.options_for("state").unwrap_or_default();
//!     assert_eq!(options, vec![SelectOption::sentinel()]);
//!
//!     session.apply_options(&requests[0], vec!["CA".to_string(), "NY".to_string()]);
//!
//!     let instructions = session.render();
//!     println!("{}", RenderTree::new(&instructions));
//!     Ok(())
//! }
//! ```

pub mod answers;
pub mod condition;
pub mod config;
pub mod error;
pub mod options;
pub mod prelude;
pub mod render;
pub mod schema;
pub mod session;
pub mod source;
pub mod tracker;
