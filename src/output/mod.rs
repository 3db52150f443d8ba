use crate::detect::acpi::AcpiDevice;
use crate::device::DeviceContext;
use crate::dialect::ToggleKind;
use crate::error::ToggleError;
use crate::toggle::{SupportedFeatures, ToggleState};
use crate::vendor::VendorDialect;
use colored::Colorize;
use serde::Serialize;

const LABEL_W: usize = 14;

/// Everything `armoury info` shows about an attached device.
#[derive(Debug, Clone, Serialize)]
pub struct InfoReport {
    pub device: String,
    pub vendor: Option<String>,
    pub product: Option<String>,
    pub dialect: VendorDialect,
    pub features: SupportedFeatures,
    pub toggles: Vec<ToggleReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToggleReport {
    pub toggle: ToggleKind,
    #[serde(flatten)]
    pub state: ToggleState,
}

impl InfoReport {
    pub fn collect(device: &DeviceContext) -> Result<Self, ToggleError> {
        let toggles = ToggleKind::ALL
            .into_iter()
            .map(|toggle| {
                device
                    .state(toggle)
                    .map(|state| ToggleReport { toggle, state })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            device: device.id().to_string(),
            vendor: device.identity().vendor.clone(),
            product: device.identity().product.clone(),
            dialect: device.dialect(),
            features: device.supported_features()?,
            toggles,
        })
    }
}

pub fn print_devices(devices: &[AcpiDevice]) {
    if devices.is_empty() {
        println!("{}", "  No supported ACPI devices found.".yellow());
        return;
    }

    println!("{}", " ACPI Devices".bold());
    println!();
    for dev in devices {
        let present = if dev.is_present() {
            "present".green().to_string()
        } else {
            "absent".dimmed().to_string()
        };
        let path = if dev.path.is_empty() {
            "N/A"
        } else {
            dev.path.as_str()
        };
        println!(
            "  {} {:<9} {}  {}",
            format!("{:<12}", dev.name).bold(),
            dev.hid,
            present,
            path.dimmed()
        );
    }
    println!();
}

pub fn print_devices_json(devices: &[AcpiDevice]) {
    let output = serde_json::json!({ "devices": devices });
    println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
}

pub fn print_info(report: &InfoReport) {
    let rows: Vec<(&str, String)> = vec![
        ("Device", report.device.clone()),
        ("Vendor", report.vendor.clone().unwrap_or_else(|| "Unknown".to_string())),
        ("Product", report.product.clone().unwrap_or_else(|| "Unknown".to_string())),
        ("Dialect", report.dialect.to_string()),
    ];

    let inner_w = rows
        .iter()
        .map(|(l, v)| l.len().max(LABEL_W) + 2 + v.len())
        .max()
        .unwrap_or(40)
        .max(40);

    let title = "Laptop";
    let fill = inner_w.saturating_sub(1 + title.len());
    println!("╭─ {} {}╮", title.bold(), "─".repeat(fill));
    for (label, value) in &rows {
        let padded = format!("{:<w$}", label, w = LABEL_W);
        let pad = inner_w.saturating_sub(LABEL_W + 2 + value.len());
        println!("│ {}  {}{} │", padded.dimmed(), value, " ".repeat(pad));
    }
    println!("╰{}╯", "─".repeat(inner_w + 2));

    println!("── {} {}", "Toggles".bold(), "─".repeat(40));
    for t in &report.toggles {
        let name = format!("{:<w$}", t.toggle.name(), w = LABEL_W);
        if t.state.supported() {
            let value = t
                .state
                .cached_value()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "?".to_string());
            let methods = format!(
                "{} / {}",
                t.state.get_method().unwrap_or("-"),
                t.state.set_method().unwrap_or("-")
            );
            println!("  {} {}  {}", name, value.green().bold(), methods.dimmed());
        } else {
            println!("  {} {}", name, "unsupported".dimmed());
        }
    }
    println!();
}

pub fn print_info_json(report: &InfoReport) {
    println!("{}", serde_json::to_string_pretty(report).unwrap_or_default());
}
