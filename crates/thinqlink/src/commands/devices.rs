//! `thinqlink devices` -- account dashboard listing.

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use thinqlink_api::DashboardDevice;
use thinqlink_config::BridgeConfig;

use crate::error::CliError;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Alias")]
    alias: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Bridged")]
    bridged: String,
}

impl From<&DashboardDevice> for DeviceRow {
    fn from(d: &DashboardDevice) -> Self {
        Self {
            id: d.device_id.clone(),
            alias: d.alias.clone().unwrap_or_default(),
            model: d.model_name.clone().unwrap_or_default(),
            bridged: if d.is_air_conditioner() {
                "yes".green().to_string()
            } else {
                "no".dimmed().to_string()
            },
        }
    }
}

pub async fn handle(config: &BridgeConfig) -> Result<(), CliError> {
    let client = config.client()?;
    let devices = client.list_devices().await?;

    if devices.is_empty() {
        println!("No appliances registered to this account.");
        return Ok(());
    }

    let rows: Vec<DeviceRow> = devices.iter().map(DeviceRow::from).collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}
