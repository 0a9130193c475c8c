//! root command - Print the repository's top-level directory

use anyhow::Result;

use crate::cli::{Context, Session};

pub async fn root(ctx: &Context) -> Result<()> {
    let session = Session::open(ctx).await?;
    println!("{}", session.repo_root.display());
    Ok(())
}
