use armoury::config::{ArmouryConfig, BackendKind};
use armoury::detect::SystemInfo;
use armoury::registry::DeviceRegistry;
use armoury::surface::{Attribute, Surface};
use armoury::sysfs::SysfsRoot;
use armoury::vendor::VendorDialect;
use armoury::{Error, SurfaceError, ToggleError};
use nix::errno::Errno;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Lay out DMI identity and one ACPI device node under `root`.
fn create_fixture(root: &Path, vendor: &str, product: &str, hid: &str, acpi_path: &str) {
    let dmi = root.join("sys/class/dmi/id");
    fs::create_dir_all(&dmi).unwrap();
    fs::write(dmi.join("sys_vendor"), format!("{}\n", vendor)).unwrap();
    fs::write(dmi.join("product_name"), format!("{}\n", product)).unwrap();

    let dev = root.join(format!("sys/bus/acpi/devices/{}:00", hid));
    fs::create_dir_all(&dev).unwrap();
    fs::write(dev.join("hid"), format!("{}\n", hid)).unwrap();
    fs::write(dev.join("path"), format!("{}\n", acpi_path)).unwrap();
    fs::write(dev.join("status"), "15\n").unwrap();
}

/// Write a firmware method table and return a config that uses it.
fn table_config(root: &Path, methods: &str) -> ArmouryConfig {
    let table: PathBuf = root.join("firmware.toml");
    fs::write(&table, format!("[methods]\n{}", methods)).unwrap();

    let mut config = ArmouryConfig::default();
    config.backend.kind = BackendKind::Table;
    config.backend.table = Some(table);
    config
}

fn attach(tmp: &TempDir, config: &ArmouryConfig) -> (DeviceRegistry, Surface) {
    let sysfs = SysfsRoot::new(tmp.path());
    let system = SystemInfo::detect(&sysfs);
    let registry = DeviceRegistry::new();
    let device = registry.attach_detected(&sysfs, &system, config).unwrap();
    (registry, Surface::new(device))
}

const ASUS_FIRMWARE: &str = r#"
MXDS = { value = 1 }
MXDM = { store = "MXDS" }
DGPU = { value = 0 }
SDGP = { store = "DGPU" }
"#;

#[test]
fn test_asus_mux_read_write() {
    let tmp = TempDir::new().unwrap();
    create_fixture(
        tmp.path(),
        "ASUSTeK COMPUTER INC.",
        "ROG Zephyrus G14",
        "ATK4001",
        "\\_SB_.ATKD",
    );
    let config = table_config(tmp.path(), ASUS_FIRMWARE);
    let (_registry, surface) = attach(&tmp, &config);

    assert_eq!(surface.device().dialect(), VendorDialect::Asus);
    assert_eq!(surface.device().id(), "ATK4001:00");
    assert_eq!(
        surface.show(Attribute::SupportedFeatures).unwrap(),
        "gpu_mux:1 dgpu_disable:1 egpu_enable:0\n"
    );
    assert_eq!(surface.show(Attribute::Vendor).unwrap(), "ASUSTeK COMPUTER INC.\n");
    assert_eq!(surface.show(Attribute::Product).unwrap(), "ROG Zephyrus G14\n");

    assert_eq!(surface.show(Attribute::GpuMux).unwrap(), "1\n");
    assert_eq!(surface.store(Attribute::GpuMux, "0\n").unwrap(), 2);
    assert_eq!(surface.show(Attribute::GpuMux).unwrap(), "0\n");
}

#[test]
fn test_out_of_range_keeps_cache() {
    let tmp = TempDir::new().unwrap();
    create_fixture(tmp.path(), "ASUSTeK COMPUTER INC.", "TUF Gaming F15", "ATK4001", "\\_SB_.ATKD");
    let config = table_config(tmp.path(), ASUS_FIRMWARE);
    let (_registry, surface) = attach(&tmp, &config);

    let err = surface.store(Attribute::DgpuDisable, "2").unwrap_err();
    assert_eq!(
        err,
        SurfaceError::Toggle {
            attribute: "dgpu_disable",
            source: ToggleError::OutOfRange(2),
        }
    );
    assert_eq!(err.errno(), Errno::EINVAL);

    let state = surface
        .device()
        .state(armoury::dialect::ToggleKind::DgpuDisable)
        .unwrap();
    assert_eq!(state.cached_value(), Some(0));
}

#[test]
fn test_unknown_vendor_supports_nothing() {
    let tmp = TempDir::new().unwrap();
    create_fixture(
        tmp.path(),
        "Unknown Corp",
        "Business Laptop",
        "PNP0C02",
        "\\_SB_.PCI0.LPCB.LDRC",
    );
    let config = table_config(tmp.path(), "");
    let (_registry, surface) = attach(&tmp, &config);

    assert_eq!(surface.device().dialect(), VendorDialect::Unknown);
    assert_eq!(
        surface.show(Attribute::SupportedFeatures).unwrap(),
        "gpu_mux:0 dgpu_disable:0 egpu_enable:0\n"
    );

    let err = surface.store(Attribute::GpuMux, "1").unwrap_err();
    assert_eq!(err.errno(), Errno::ENODEV);
    assert!(matches!(
        err,
        SurfaceError::Toggle {
            source: ToggleError::Unsupported,
            ..
        }
    ));
}

#[test]
fn test_fallback_stops_at_first_hit() {
    let tmp = TempDir::new().unwrap();
    create_fixture(
        tmp.path(),
        "Micro-Star International Co., Ltd.",
        "Katana GF66",
        "MSI0001",
        "\\_SB_.MSIV",
    );
    // MSI's own GMUX and GDIS both miss, so `_GPU` is found by fallback.
    let config = table_config(
        tmp.path(),
        r#"
"_GPU" = { value = 1 }
GDIS = { fail = "AE_AML_NO_RETURN_VALUE" }
"#,
    );
    let (_registry, surface) = attach(&tmp, &config);

    assert_eq!(
        surface.show(Attribute::SupportedFeatures).unwrap(),
        "gpu_mux:0 dgpu_disable:1 egpu_enable:0\n"
    );
    assert_eq!(surface.show(Attribute::DgpuDisable).unwrap(), "1\n");
}

#[test]
fn test_fallback_prefers_gmux_over_gpu() {
    let tmp = TempDir::new().unwrap();
    create_fixture(tmp.path(), "LENOVO", "Legion 5 15ACH6H", "LEN0001", "\\_SB_.GZFD");
    // Lenovo's LGPU and LDGP are missing; both fallback candidates answer.
    let config = table_config(
        tmp.path(),
        r#"
GMUX = { value = 1 }
"_GPU" = { value = 1 }
"#,
    );
    let (_registry, surface) = attach(&tmp, &config);

    assert_eq!(surface.device().dialect(), VendorDialect::Lenovo);
    assert_eq!(
        surface.show(Attribute::SupportedFeatures).unwrap(),
        "gpu_mux:1 dgpu_disable:0 egpu_enable:0\n"
    );
    let state = surface
        .device()
        .state(armoury::dialect::ToggleKind::GpuMux)
        .unwrap();
    assert_eq!(state.get_method(), Some("GMUX"));
    assert_eq!(state.set_method(), Some("SLGP"));
}

#[test]
fn test_long_product_classified_before_truncation() {
    let tmp = TempDir::new().unwrap();
    let product = format!("{} ROG Flow", "Z".repeat(64));
    create_fixture(tmp.path(), "Notebook", &product, "PNP0C02", "\\_SB_.PCI0.LPCB.LDRC");
    let config = table_config(tmp.path(), "GMUX = { value = 0 }\n");
    let (_registry, surface) = attach(&tmp, &config);

    assert_eq!(surface.device().dialect(), VendorDialect::GenericGaming);
    assert_eq!(
        surface.show(Attribute::Product).unwrap(),
        format!("{}\n", "Z".repeat(63))
    );
}

#[test]
fn test_malformed_and_read_only_input() {
    let tmp = TempDir::new().unwrap();
    create_fixture(tmp.path(), "ASUSTeK COMPUTER INC.", "ROG Strix G15", "ATK4001", "\\_SB_.ATKD");
    let config = table_config(tmp.path(), ASUS_FIRMWARE);
    let (_registry, surface) = attach(&tmp, &config);

    let err = surface.store(Attribute::GpuMux, "on").unwrap_err();
    assert_eq!(err.errno(), Errno::EINVAL);
    assert!(matches!(err, SurfaceError::MalformedInput { .. }));

    let err = surface.store(Attribute::Vendor, "x").unwrap_err();
    assert_eq!(err, SurfaceError::ReadOnly("vendor"));
    assert_eq!(err.errno(), Errno::EACCES);

    let err = surface.show_named("brightness").unwrap_err();
    assert_eq!(err.errno(), Errno::ENOENT);
}

#[test]
fn test_registry_detach_and_reattach() {
    let tmp = TempDir::new().unwrap();
    create_fixture(
        tmp.path(),
        "ASUSTeK COMPUTER INC.",
        "ROG Zephyrus G14",
        "ATK4001",
        "\\_SB_.ATKD",
    );
    let config = table_config(tmp.path(), ASUS_FIRMWARE);
    let sysfs = SysfsRoot::new(tmp.path());
    let system = SystemInfo::detect(&sysfs);
    let registry = DeviceRegistry::new();

    let device = registry.attach_detected(&sysfs, &system, &config).unwrap();
    assert!(matches!(
        registry.attach_detected(&sysfs, &system, &config),
        Err(Error::AlreadyAttached(_))
    ));
    assert_eq!(registry.ids(), vec!["ATK4001:00".to_string()]);

    let surface = Surface::new(device);
    assert!(registry.detach("ATK4001:00"));
    assert!(!registry.detach("ATK4001:00"));
    assert!(registry.get("ATK4001:00").is_none());

    let err = surface.show(Attribute::GpuMux).unwrap_err();
    assert_eq!(err.errno(), Errno::ENODEV);
    assert!(surface.show(Attribute::Vendor).is_err());

    let again = registry.attach_detected(&sysfs, &system, &config).unwrap();
    assert_eq!(
        again.supported_features().unwrap().to_string(),
        "gpu_mux:1 dgpu_disable:1 egpu_enable:0"
    );
}

#[test]
fn test_missing_device_node() {
    let tmp = TempDir::new().unwrap();
    let dmi = tmp.path().join("sys/class/dmi/id");
    fs::create_dir_all(&dmi).unwrap();
    fs::write(dmi.join("sys_vendor"), "ASUSTeK COMPUTER INC.\n").unwrap();
    let config = table_config(tmp.path(), ASUS_FIRMWARE);

    let sysfs = SysfsRoot::new(tmp.path());
    let system = SystemInfo::detect(&sysfs);
    let registry = DeviceRegistry::new();
    assert!(matches!(
        registry.attach_detected(&sysfs, &system, &config),
        Err(Error::DeviceNotFound(None))
    ));
}
