use super::{parse_json_arg, read_json_file, Context};
use crate::cli::{DeviceCommand, FilterCommand, QueryArgs, SegmentCommand};
use crate::error::CliError;
use serde_json::Value;

/// Handle `segment` subcommands
pub(super) async fn run_segment(ctx: &Context, command: SegmentCommand) -> anyhow::Result<()> {
    let api = ctx.api()?;
    match command {
        SegmentCommand::List => ctx.render_stream(api.segments()).await,
        SegmentCommand::Create { name, query } => {
            let query = resolve_query(&query)?;
            let created = api.create_segment(&name, &query).await?;
            ctx.status(&format!("Created segment '{name}'"));
            ctx.render(&created)
        }
        SegmentCommand::Order { ids } => {
            let ordered = api.update_segment_order(&ids).await?;
            ctx.status(&format!("Reordered {} segments", ids.len()));
            ctx.render(&ordered)
        }
        SegmentCommand::Devices { segment_id } => {
            ctx.render_stream(api.segment_devices(&segment_id)).await
        }
    }
}

/// Handle `filter` subcommands
pub(super) async fn run_filter(ctx: &Context, command: FilterCommand) -> anyhow::Result<()> {
    let api = ctx.api()?;
    match command {
        FilterCommand::List => ctx.render_stream(api.filters()).await,
        FilterCommand::Get { name } => ctx.render(&api.filter(&name).await?),
        FilterCommand::Create { name, query } => {
            let query = resolve_query(&query)?;
            let created = api.create_filter(&name, &query).await?;
            ctx.status(&format!("Saved filter '{name}'"));
            ctx.render(&created)
        }
        FilterCommand::Delete { name } => {
            api.delete_filter(&name).await?;
            ctx.status(&format!("Deleted filter '{name}'"));
            Ok(())
        }
    }
}

/// Handle `device` subcommands
pub(super) async fn run_device(ctx: &Context, command: DeviceCommand) -> anyhow::Result<()> {
    let api = ctx.api()?;
    match command {
        DeviceCommand::List { query: None } => ctx.render_stream(api.devices()).await,
        DeviceCommand::List { query: Some(text) } => {
            let query = parse_json_arg("query", &text)?;
            ctx.render_stream(api.devices_matching(&query)).await
        }
        DeviceCommand::Get { unit_id } => ctx.render(&api.device(&unit_id).await?),
        DeviceCommand::Events { unit_id, limit } => {
            if limit == Some(0) {
                return Err(CliError::InvalidArgument("--limit must be at least 1".into()).into());
            }
            ctx.render_stream(api.device_events(&unit_id, limit)).await
        }
    }
}

/// The device query from `--query` or `--query-file`
fn resolve_query(args: &QueryArgs) -> anyhow::Result<Value> {
    match (&args.query, &args.query_file) {
        (Some(text), _) => parse_json_arg("query", text),
        (None, Some(path)) => read_json_file(path),
        (None, None) => Err(CliError::MissingArgument("--query or --query-file".into()).into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_comes_from_flag_or_file() {
        let inline = QueryArgs {
            query: Some(r#"{"eq": {"versionId": "1.0"}}"#.into()),
            query_file: None,
        };
        assert_eq!(
            resolve_query(&inline).unwrap(),
            json!({"eq": {"versionId": "1.0"}})
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query.json");
        std::fs::write(&path, r#"{"regex": {"unitId": "^eu-"}}"#).unwrap();
        let from_file = QueryArgs {
            query: None,
            query_file: Some(path),
        };
        assert_eq!(
            resolve_query(&from_file).unwrap(),
            json!({"regex": {"unitId": "^eu-"}})
        );

        let err = resolve_query(&QueryArgs::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::MissingArgument(_))
        ));
    }
}
