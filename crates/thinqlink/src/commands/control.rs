//! `thinqlink get` / `thinqlink set` -- one-shot capability access.
//!
//! Both spawn a short-lived worker, wait for its first snapshot so the
//! committed cache is populated (and redundant sets get skipped), run the
//! request, and tear the worker down.

use owo_colors::OwoColorize;

use thinqlink_config::BridgeConfig;

use crate::cli::{GetArgs, SetArgs};
use crate::error::CliError;

use super::{find_device, parse_capability, parse_value, spawn_and_sync};

pub async fn get(config: &BridgeConfig, args: &GetArgs) -> Result<(), CliError> {
    let capability = parse_capability(&args.capability)?;
    let client = config.client()?;
    let device = find_device(&client, &args.device).await?;

    let (handle, _rx) = spawn_and_sync(config, device).await?;
    let value = handle.get(capability).await?;
    handle.shutdown();

    match value {
        Some(v) => println!("{capability} = {v}"),
        None => println!("{capability} = {}", "unknown".dimmed()),
    }
    Ok(())
}

pub async fn set(config: &BridgeConfig, args: &SetArgs) -> Result<(), CliError> {
    let capability = parse_capability(&args.capability)?;
    let value = parse_value(&args.value)?;
    let client = config.client()?;
    let device = find_device(&client, &args.device).await?;

    let (handle, _rx) = spawn_and_sync(config, device).await?;
    let result = handle.set(capability, value).await;
    handle.shutdown();

    let committed = result?;
    println!("{capability} = {committed} {}", "(committed)".green());
    Ok(())
}
