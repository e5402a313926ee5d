//! Dashboard Command
//!
//! Overview of service health, season, next race and championship leaders.

use crate::cli::{CommandContext, Output};
use crate::dashboard::Dashboard;
use crate::types::Result;

pub async fn run(ctx: &CommandContext, out: &Output) -> Result<()> {
    let dashboard = Dashboard::load(ctx.agent.as_ref(), ctx.stats.as_ref()).await;
    out.dashboard(&dashboard)
}
