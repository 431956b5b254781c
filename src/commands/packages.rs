use super::{read_json_file, Context};
use crate::api::{PackageDraft, VersionUpload};
use crate::cli::{DeploymentPlanCommand, PackageCommand, VersionCommand};
use anyhow::Context as _;
use serde_json::Value;
use std::path::Path;

/// Handle `package` subcommands
pub(super) async fn run_package(ctx: &Context, command: PackageCommand) -> anyhow::Result<()> {
    let api = ctx.api()?;
    match command {
        PackageCommand::List => ctx.render_stream(api.packages()).await,
        PackageCommand::Get { reference } => ctx.render(&api.package(&reference).await?),
        PackageCommand::Create {
            reference,
            name,
            description,
        } => {
            let draft = PackageDraft {
                name: name.unwrap_or_else(|| reference.clone()),
                reference,
                description,
            };
            let created = api.create_package(&draft).await?;
            ctx.status(&format!("Created package {}", draft.reference));
            ctx.render(&created)
        }
    }
}

/// Handle `version` subcommands
pub(super) async fn run_version(ctx: &Context, command: VersionCommand) -> anyhow::Result<()> {
    let api = ctx.api()?;
    match command {
        VersionCommand::List { reference } => ctx.render_stream(api.versions(&reference)).await,
        VersionCommand::Get { reference, version } => {
            ctx.render(&api.version(&reference, &version).await?)
        }
        VersionCommand::Create {
            reference,
            id,
            name,
            description,
            metadata,
            file,
        } => {
            let metadata = match metadata {
                Some(path) => read_json_file(&path)?,
                None => Value::Null,
            };
            let upload = VersionUpload {
                name: name.unwrap_or_else(|| id.clone()),
                id,
                description,
                metadata,
                file_name: file_name(&file),
                bytes: std::fs::read(&file)
                    .with_context(|| format!("Failed to read {}", file.display()))?,
            };
            tracing::info!(
                package = %reference,
                version = %upload.id,
                size = upload.bytes.len(),
                "uploading version"
            );
            let created = api.create_version(&reference, &upload).await?;
            ctx.status(&format!("Uploaded {reference} {}", upload.id));
            ctx.render(&created)
        }
    }
}

/// Handle `deployment-plan` subcommands
pub(super) async fn run_deployment_plan(
    ctx: &Context,
    command: DeploymentPlanCommand,
) -> anyhow::Result<()> {
    let api = ctx.api()?;
    match command {
        DeploymentPlanCommand::Get { reference } => {
            ctx.render(&api.deployment_plan(&reference).await?)
        }
        DeploymentPlanCommand::Publish { reference, file } => {
            let plan = read_json_file(&file)?;
            let published = api.publish_deployment_plan(&reference, plan).await?;
            ctx.status(&format!("Published deployment plan of {reference}"));
            ctx.render(&published)
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| "upload.bin".to_string(), |name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_uses_last_component() {
        assert_eq!(file_name(Path::new("build/firmware.bin")), "firmware.bin");
        assert_eq!(file_name(Path::new("/")), "upload.bin");
    }
}
