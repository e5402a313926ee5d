pub mod error;
pub mod query;
pub mod result;
pub mod standings;
pub mod utils;

pub use error::{ErrorKind, PaddockError, Result};
pub use query::{QueryHints, QueryOptions};
pub use result::{AgentResult, FallbackHandler, QueryResult, RouteMode};
pub use standings::StandingEntry;
pub use utils::{json_number_or, json_path, json_string, json_string_or, with_fallback};
