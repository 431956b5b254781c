use super::Context;
use crate::api::HookDraft;
use crate::cli::{HookArgs, HookCommand};
use crate::error::CliError;
use reqwest::Url;

/// Handle `hook` subcommands
pub(super) async fn run(ctx: &Context, command: HookCommand) -> anyhow::Result<()> {
    let api = ctx.api()?;
    match command {
        HookCommand::List => ctx.render_stream(api.hooks()).await,
        HookCommand::Get { name } => ctx.render(&api.hook(&name).await?),
        HookCommand::Create(args) => {
            let draft = hook_draft(args)?;
            let created = api.create_hook(&draft).await?;
            ctx.status(&format!("Registered hook '{}'", draft.name));
            ctx.render(&created)
        }
        HookCommand::Edit(args) => {
            let draft = hook_draft(args)?;
            let edited = api.edit_hook(&draft.name, &draft).await?;
            ctx.status(&format!("Updated hook '{}'", draft.name));
            ctx.render(&edited)
        }
        HookCommand::Delete { name } => {
            api.delete_hook(&name).await?;
            ctx.status(&format!("Deleted hook '{name}'"));
            Ok(())
        }
    }
}

fn hook_draft(args: HookArgs) -> Result<HookDraft, CliError> {
    let url = Url::parse(&args.url).map_err(|e| CliError::InvalidUrl {
        url: args.url.clone(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CliError::InvalidArgument(format!(
            "--url must use http or https, got '{}'",
            url.scheme()
        )));
    }
    Ok(HookDraft {
        name: args.name,
        event_type: args.event_type,
        url: args.url,
    })
}
