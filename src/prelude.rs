//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the yoshiki crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use yoshiki::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let forms = load_forms(Path::new("path/to/forms.json"))?;
//! let answers = Answers::from_file("path/to/answers.json")?;
//!
//! let instructions = render(&forms, &answers, &OptionCache::new());
//! println!("{}", RenderTree::new(&instructions));
//! # Ok(())
//! # }
//! ```

// Schema model and loading
pub use crate::schema::{
    Choices, Condition, DynamicOptions, Field, FieldBody, FieldKind, Form, IntoSchema, Rule,
    load_forms, parse_forms,
};

// Evaluation and rendering
pub use crate::answers::Answers;
pub use crate::condition::{ConditionTrace, TraceFormatter, evaluate, explain, is_visible};
pub use crate::options::{OptionCache, SelectOption, resolve_options};
pub use crate::render::{FieldInstruction, RenderInstruction, RenderTree, SchemaWalker, render};
pub use crate::tracker::{DependencyChanges, DependencyTracker, FetchRequest};

// Session and collaborators
pub use crate::config::EngineConfig;
pub use crate::session::{FormController, FormSession, SessionState};
pub use crate::source::{OptionSource, SchemaSource, SubmitSink};

// Error types
pub use crate::error::{ConfigError, SchemaError, SessionError, SourceError};

// Standard library re-exports commonly used with this crate
pub use std::path::Path;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
