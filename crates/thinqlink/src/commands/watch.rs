//! `thinqlink watch` -- stream capability updates as workers sync.

use std::collections::HashMap;
use std::sync::Arc;

use owo_colors::OwoColorize;
use tokio::sync::mpsc;

use thinqlink_config::BridgeConfig;
use thinqlink_core::{DeviceApi, DeviceInfo};

use crate::cli::WatchArgs;
use crate::error::CliError;

pub async fn handle(config: &BridgeConfig, args: &WatchArgs) -> Result<(), CliError> {
    let client = config.client()?;

    let devices: Vec<DeviceInfo> = client
        .list_devices()
        .await?
        .iter()
        .filter(|d| match args.device {
            Some(ref id) => d.device_id == *id,
            None => d.is_air_conditioner(),
        })
        .map(DeviceInfo::from)
        .collect();

    if devices.is_empty() {
        return Err(match args.device {
            Some(ref id) => CliError::NoSuchDevice { device: id.clone() },
            None => CliError::NoSuchDevice {
                device: "<any air conditioner>".into(),
            },
        });
    }

    let api = Arc::new(client) as Arc<dyn DeviceApi>;
    let sync_config = config.sync_config()?;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let aliases: HashMap<_, _> = devices
        .iter()
        .map(|d| (d.id.clone(), d.alias.clone().unwrap_or_else(|| d.id.to_string())))
        .collect();

    let handles: Vec<_> = devices
        .into_iter()
        .map(|device| thinqlink_core::worker::spawn(device, Arc::clone(&api), sync_config, tx.clone()))
        .collect();
    drop(tx);

    println!(
        "Watching {} device(s); press Ctrl-C to stop.",
        handles.len()
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            update = rx.recv() => {
                let Some(update) = update else { break };
                let name = aliases
                    .get(&update.device)
                    .map_or_else(|| update.device.to_string(), Clone::clone);
                println!(
                    "{} {} = {}",
                    name.dimmed(),
                    update.capability,
                    update.value.bold()
                );
            }
        }
    }

    for handle in &handles {
        handle.shutdown();
    }
    Ok(())
}
