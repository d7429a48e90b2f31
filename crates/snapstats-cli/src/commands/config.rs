use crate::OutputFormat;
use crate::paths;
use crate::settings::Settings;
use anyhow::Result;
use clap::Subcommand;
use snapstats_browser::{DeviceType, NetworkThrottle};
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the current collection settings
    Show,

    /// Change one or more collection settings
    Set {
        /// Emulated device (desktop, mobile)
        #[arg(long, value_parser = crate::settings::parse_device)]
        device: Option<DeviceType>,

        /// Network throttle hint (none, fast3g, slow3g, 2g)
        #[arg(long, value_parser = crate::settings::parse_network)]
        network: Option<NetworkThrottle>,

        /// CPU slowdown hint (1, 4, 6)
        #[arg(long, value_parser = crate::settings::parse_cpu)]
        cpu: Option<u32>,
    },

    /// Restore the default settings
    Reset,
}

pub fn execute(
    action: ConfigAction,
    settings_file: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let path = paths::settings_file(settings_file)?;

    match action {
        ConfigAction::Show => show(&Settings::load(&path), &path, format),
        ConfigAction::Set {
            device,
            network,
            cpu,
        } => {
            let mut settings = Settings::load(&path);
            if let Some(device) = device {
                settings.device_type = device;
            }
            if let Some(network) = network {
                settings.network_throttle = network;
            }
            if let Some(cpu) = cpu {
                settings.cpu_throttle = cpu;
            }

            settings.save(&path)?;
            tracing::info!("Settings saved to {}", path.display());
            show(&settings, &path, format)
        }
        ConfigAction::Reset => {
            if Settings::reset(&path)? {
                println!("Settings reset to defaults");
            } else {
                println!("Settings already at defaults");
            }
            Ok(())
        }
    }
}

fn show(settings: &Settings, path: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(settings)?);
        }
        OutputFormat::Table => {
            println!("Setting,Value");
            println!("Device,{}", settings.device_type.as_str());
            println!("Network,{}", settings.network_throttle.as_str());
            println!("CPU,{}x", settings.cpu_throttle);
        }
        OutputFormat::Pretty => {
            use console::style;

            let profile = settings.network_throttle.profile();

            println!("\n{}", style("Collection Settings").bold().cyan());
            println!("{}", style("===================").cyan());
            println!("  Device:   {}", style(settings.device_type.as_str()).green());
            println!(
                "  Network:  {}",
                style(settings.network_throttle.as_str()).green()
            );
            if profile.latency_ms > 0 {
                println!(
                    "            {} B/s down, {} B/s up, {}ms latency",
                    profile.download, profile.upload, profile.latency_ms
                );
            }
            println!("  CPU:      {}", style(format!("{}x", settings.cpu_throttle)).green());
            println!("\n  {}", style(format!("Stored in {}", path.display())).dim());
            println!();
        }
    }
    Ok(())
}
