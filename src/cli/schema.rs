use crate::config::Config;
use crate::snapshot::BoardSnapshot;
use schemars::schema_for;

use super::SchemaArgs;

pub fn execute(args: SchemaArgs) -> anyhow::Result<()> {
    let schema = if args.config {
        schema_for!(Config)
    } else {
        schema_for!(BoardSnapshot)
    };
    let json = serde_json::to_string_pretty(&schema)?;
    println!("{}", json);
    Ok(())
}
