use super::{parse_json_arg, read_json_file, Context};
use crate::api::UpdateDraft;
use crate::cli::{UpdateCommand, UpdateDraftArgs};
use crate::error::CliError;
use anyhow::Context as _;
use serde_json::Value;

/// Handle `update` subcommands
pub(super) async fn run(ctx: &Context, command: UpdateCommand) -> anyhow::Result<()> {
    let api = ctx.api()?;
    match command {
        UpdateCommand::List { until: None } => ctx.render_stream(api.updates()).await,
        UpdateCommand::List { until: Some(uuid) } => {
            ctx.render_stream(api.updates_until_uuid(&uuid)).await
        }
        UpdateCommand::Get { uuid } => ctx.render(&api.update(&uuid).await?),
        UpdateCommand::Create(args) => {
            let draft = draft_from_args(&args)?;
            let created = api.create_update(&draft).await?;
            ctx.status(&format!("Created update '{}'", draft.name));
            ctx.render(&created)
        }
        UpdateCommand::Edit { uuid, draft } => {
            let draft = draft_from_args(&draft)?;
            let edited = api.edit_update(&uuid, &draft).await?;
            ctx.status(&format!("Updated {uuid}"));
            ctx.render(&edited)
        }
        UpdateCommand::Publish { uuid } => {
            let published = api.publish_update(&uuid).await?;
            ctx.status(&format!("Published {uuid}"));
            ctx.render(&published)
        }
        UpdateCommand::Archive { uuid } => {
            let archived = api.archive_update(&uuid).await?;
            ctx.status(&format!("Archived {uuid}"));
            ctx.render(&archived)
        }
        UpdateCommand::Schedule { uuid, at } => {
            validate_timestamp(&at)?;
            let scheduled = api.schedule_update(&uuid, &at).await?;
            ctx.status(&format!("Scheduled {uuid} for {at}"));
            ctx.render(&scheduled)
        }
    }
}

/// Build the update body from `--file` or the individual flags
fn draft_from_args(args: &UpdateDraftArgs) -> anyhow::Result<UpdateDraft> {
    if let Some(path) = &args.file {
        let value = read_json_file(path)?;
        return serde_json::from_value(value)
            .with_context(|| format!("{} is not a valid update", path.display()));
    }

    let name = args
        .name
        .clone()
        .ok_or_else(|| CliError::MissingArgument("--name (or --file)".to_string()))?;
    let package_id = args
        .package_id
        .clone()
        .ok_or_else(|| CliError::MissingArgument("--package-id (or --file)".to_string()))?;
    let additional_properties = match &args.properties {
        Some(text) => parse_json_arg("properties", text)?,
        None => Value::Null,
    };

    Ok(UpdateDraft {
        name,
        description: args.description.clone(),
        package_id,
        segment_id: args.segment_id.clone(),
        additional_properties,
    })
}

/// Loose RFC 3339 check: `YYYY-MM-DDTHH:MM:SS` followed by `Z` or an offset
fn validate_timestamp(text: &str) -> Result<(), CliError> {
    let bytes = text.as_bytes();
    let digits_at = |positions: &[usize]| {
        positions
            .iter()
            .all(|&i| bytes.get(i).is_some_and(u8::is_ascii_digit))
    };
    let shape_ok = bytes.len() >= 20
        && digits_at(&[0, 1, 2, 3, 5, 6, 8, 9, 11, 12, 14, 15, 17, 18])
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && matches!(bytes[10], b'T' | b't')
        && bytes[13] == b':'
        && bytes[16] == b':'
        && (text.ends_with('Z') || text.ends_with('z') || text[19..].contains(['+', '-']));

    if shape_ok {
        Ok(())
    } else {
        Err(CliError::InvalidArgument(format!(
            "--at '{text}' is not an RFC 3339 timestamp (e.g. 2026-11-01T10:00:00Z)"
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn draft_from_flags() {
        let args = UpdateDraftArgs {
            name: Some("Spring rollout".into()),
            package_id: Some("app".into()),
            properties: Some(r#"{"channel":"beta"}"#.into()),
            ..UpdateDraftArgs::default()
        };
        let draft = draft_from_args(&args).unwrap();
        assert_eq!(draft.name, "Spring rollout");
        assert_eq!(draft.package_id, "app");
        assert_eq!(draft.additional_properties, json!({"channel": "beta"}));
        assert_eq!(draft.segment_id, None);
    }

    #[test]
    fn draft_requires_name_and_package() {
        let err = draft_from_args(&UpdateDraftArgs {
            name: Some("x".into()),
            ..UpdateDraftArgs::default()
        })
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::MissingArgument(flag)) if flag.starts_with("--package-id")
        ));
    }

    #[test]
    fn draft_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("update.json");
        std::fs::write(
            &path,
            r#"{"name": "Hotfix", "packageId": "app", "segmentId": "eu"}"#,
        )
        .unwrap();
        let draft = draft_from_args(&UpdateDraftArgs {
            file: Some(path),
            ..UpdateDraftArgs::default()
        })
        .unwrap();
        assert_eq!(draft.name, "Hotfix");
        assert_eq!(draft.segment_id.as_deref(), Some("eu"));
    }

    #[test]
    fn timestamps_are_checked() {
        assert!(validate_timestamp("2026-11-01T10:00:00Z").is_ok());
        assert!(validate_timestamp("2026-11-01T10:00:00.250+02:00").is_ok());
        assert!(validate_timestamp("2026-11-01 10:00").is_err());
        assert!(validate_timestamp("tomorrow").is_err());
        assert!(validate_timestamp("2026-11-01T10:00:00").is_err());
    }
}
