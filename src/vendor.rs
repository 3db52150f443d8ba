use serde::Serialize;
use std::fmt;

/// The naming scheme a machine's firmware uses for its GPU control methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorDialect {
    Unknown,
    Asus,
    Msi,
    DellAlienware,
    Lenovo,
    Hp,
    Acer,
    /// Gaming-line product on an unrecognised vendor string. These are
    /// mostly ODM builds sharing the generic method names.
    GenericGaming,
}

/// Vendor-string fragments, checked in order; first hit wins.
const VENDOR_FRAGMENTS: &[(&str, VendorDialect)] = &[
    ("ASUS", VendorDialect::Asus),
    ("ASUSTeK", VendorDialect::Asus),
    ("MSI", VendorDialect::Msi),
    ("Micro-Star", VendorDialect::Msi),
    ("Dell", VendorDialect::DellAlienware),
    ("Alienware", VendorDialect::DellAlienware),
    ("LENOVO", VendorDialect::Lenovo),
    ("Lenovo", VendorDialect::Lenovo),
    ("HP", VendorDialect::Hp),
    ("Hewlett-Packard", VendorDialect::Hp),
    ("Acer", VendorDialect::Acer),
];

/// Product-string fragments naming gaming lines.
const GAMING_FRAGMENTS: &[&str] = &["ROG", "TUF", "Legion", "Gaming", "Predator", "Nitro"];

impl VendorDialect {
    /// Human-readable name used in logs and `info` output.
    pub fn label(self) -> &'static str {
        match self {
            VendorDialect::Unknown => "Unknown",
            VendorDialect::Asus => "ASUS",
            VendorDialect::Msi => "MSI",
            VendorDialect::DellAlienware => "Dell/Alienware",
            VendorDialect::Lenovo => "Lenovo",
            VendorDialect::Hp => "HP",
            VendorDialect::Acer => "Acer",
            VendorDialect::GenericGaming => "Generic Gaming Laptop",
        }
    }
}

impl fmt::Display for VendorDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a machine from its DMI vendor and product strings.
///
/// Matching is case-sensitive substring search.
pub fn classify(vendor: Option<&str>, product: Option<&str>) -> VendorDialect {
    if let Some(vendor) = vendor {
        if let Some((_, dialect)) = VENDOR_FRAGMENTS
            .iter()
            .find(|(fragment, _)| vendor.contains(fragment))
        {
            return *dialect;
        }
    }

    if product.is_some_and(|p| GAMING_FRAGMENTS.iter().any(|f| p.contains(f))) {
        return VendorDialect::GenericGaming;
    }

    VendorDialect::Unknown
}
