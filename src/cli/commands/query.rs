//! Query Command
//!
//! Answer a free-text question through the smart router.
//!
//! Usage:
//!   paddock query "Compare Max Verstappen and Lewis Hamilton" [--year 2024] [-f json]

use crate::cli::{CommandContext, Output};
use crate::types::{QueryOptions, Result};

pub async fn run(ctx: &CommandContext, query: &str, options: QueryOptions, out: &Output) -> Result<()> {
    let router = ctx.router();
    let result = router.smart_query(query, &options).await;
    out.query_result(&result)
}
