pub mod calendar;
pub mod compiler;
pub mod error;
pub mod knowledge;
pub mod schema;
pub mod state;
pub mod store;
pub mod types;

pub use calendar::{export_calendar, ExportOptions};
pub use compiler::{CompiledRequest, ModelSelection, RequestCompiler, RequestKind};
pub use error::{EngineError, Result};
pub use knowledge::{search_knowledge, select_facts, RelevancePolicy};
pub use schema::SchemaNode;
pub use state::{Action, AppState};
pub use store::StateStore;
pub use types::*;
