use super::Context;
use crate::cli::TokenCommand;

/// Handle `token` subcommands
pub(super) async fn run(ctx: &Context, command: TokenCommand) -> anyhow::Result<()> {
    let api = ctx.api()?;
    match command {
        TokenCommand::List => ctx.render_stream(api.tokens()).await,
        TokenCommand::Create { label } => {
            let created = api.create_token(&label).await?;
            ctx.status(&format!("Issued token '{label}'"));
            ctx.render(&created)
        }
        TokenCommand::Revoke { token } => {
            api.revoke_token(&token).await?;
            ctx.status(&format!("Revoked {token}"));
            Ok(())
        }
    }
}
