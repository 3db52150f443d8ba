use super::{AcpiObject, MethodTransport};
use crate::sysfs::SysfsRoot;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// Location of the acpi_call interface below the sysfs root.
pub const DEFAULT_CALL_PATH: &str = "proc/acpi/call";

/// Evaluates methods through the `acpi_call` kernel module.
///
/// A call is a write of `<namespace path>.<METHOD> <arg>` followed by a
/// read of the reply. The module keeps one reply buffer for the whole
/// system, so calls through one transport never overlap.
#[derive(Debug)]
pub struct AcpiCallTransport {
    sysfs: SysfsRoot,
    call_path: PathBuf,
    device_path: String,
    io_lock: Mutex<()>,
}

impl AcpiCallTransport {
    /// `device_path` is the ACPI namespace path of the device the methods
    /// hang off, e.g. `\_SB_.ATKD`.
    pub fn new(sysfs: SysfsRoot, device_path: impl Into<String>) -> Self {
        Self {
            sysfs,
            call_path: PathBuf::from(DEFAULT_CALL_PATH),
            device_path: device_path.into(),
            io_lock: Mutex::new(()),
        }
    }

    pub fn with_call_path(mut self, call_path: impl Into<PathBuf>) -> Self {
        self.call_path = call_path.into();
        self
    }

    fn method_path(&self, method: &str) -> String {
        format!("{}.{}", self.device_path.trim_end_matches('.'), method)
    }
}

impl MethodTransport for AcpiCallTransport {
    fn is_bound(&self) -> bool {
        !self.device_path.is_empty()
    }

    fn evaluate(&self, method: &str, arg: u32) -> Result<Option<AcpiObject>, String> {
        let request = format!("{} {:#x}", self.method_path(method), arg);
        let _guard = self.io_lock.lock().unwrap_or_else(PoisonError::into_inner);

        self.sysfs
            .write(&self.call_path, &request)
            .map_err(|e| e.to_string())?;
        let reply = self.sysfs.read(&self.call_path).map_err(|e| e.to_string())?;
        parse_reply(&reply)
    }
}

/// Decode an acpi_call reply.
pub fn parse_reply(reply: &str) -> Result<Option<AcpiObject>, String> {
    let reply = reply.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    if reply.is_empty() || reply == "not called" {
        return Ok(None);
    }
    if let Some(status) = reply.strip_prefix("Error:") {
        return Err(status.trim().to_string());
    }

    match parse_object(reply) {
        Some((object, rest)) if rest.trim().is_empty() => Ok(Some(object)),
        _ => Err(format!("unrecognized reply '{}'", reply)),
    }
}

fn parse_object(input: &str) -> Option<(AcpiObject, &str)> {
    let input = input.trim_start();

    if let Some(rest) = input.strip_prefix('"') {
        let end = rest.find('"')?;
        return Some((AcpiObject::String(rest[..end].to_string()), &rest[end + 1..]));
    }

    if let Some(rest) = input.strip_prefix('{') {
        let end = rest.find('}')?;
        let bytes = rest[..end]
            .split(',')
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(|b| parse_int(b).and_then(|v| u8::try_from(v).ok()))
            .collect::<Option<Vec<u8>>>()?;
        return Some((AcpiObject::Buffer(bytes), &rest[end + 1..]));
    }

    if let Some(mut rest) = input.strip_prefix('[') {
        let mut items = Vec::new();
        loop {
            rest = rest.trim_start();
            if let Some(after) = rest.strip_prefix(']') {
                return Some((AcpiObject::Package(items), after));
            }
            let (item, after) = parse_object(rest)?;
            items.push(item);
            rest = after.trim_start();
            if let Some(after) = rest.strip_prefix(',') {
                rest = after;
            }
        }
    }

    let end = input
        .find(|c: char| !(c.is_ascii_hexdigit() || c == 'x' || c == 'X'))
        .unwrap_or(input.len());
    let value = parse_int(&input[..end])?;
    Some((AcpiObject::Integer(value), &input[end..]))
}

fn parse_int(token: &str) -> Option<u64> {
    match token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => token.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_reply("0x1"), Ok(Some(AcpiObject::Integer(1))));
        assert_eq!(parse_reply("0x0\0"), Ok(Some(AcpiObject::Integer(0))));
        assert_eq!(
            parse_reply("0xffffffffffffffff"),
            Ok(Some(AcpiObject::Integer(u64::MAX)))
        );
    }

    #[test]
    fn test_parse_error_and_empty() {
        assert_eq!(parse_reply("Error: AE_NOT_FOUND"), Err("AE_NOT_FOUND".to_string()));
        assert_eq!(parse_reply("not called"), Ok(None));
        assert_eq!(parse_reply(""), Ok(None));
    }

    #[test]
    fn test_parse_non_integer_objects() {
        assert_eq!(
            parse_reply("\"Hybrid\""),
            Ok(Some(AcpiObject::String("Hybrid".to_string())))
        );
        assert_eq!(
            parse_reply("{0x01, 0x02, 0xff}"),
            Ok(Some(AcpiObject::Buffer(vec![1, 2, 0xff])))
        );
        assert_eq!(
            parse_reply("[0x1, \"a\", [0x2]]"),
            Ok(Some(AcpiObject::Package(vec![
                AcpiObject::Integer(1),
                AcpiObject::String("a".to_string()),
                AcpiObject::Package(vec![AcpiObject::Integer(2)]),
            ])))
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_reply("[0x1, 0x2").is_err());
        assert!(parse_reply("0x1 trailing").is_err());
        assert!(parse_reply("{0x100}").is_err());
    }

    #[test]
    fn test_evaluate_writes_request() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("proc/acpi")).unwrap();
        fs::write(tmp.path().join("proc/acpi/call"), "").unwrap();

        let transport = AcpiCallTransport::new(SysfsRoot::new(tmp.path()), "\\_SB_.ATKD");
        // A plain file echoes the request back, which is not a valid reply.
        assert!(transport.evaluate("MXDM", 1).is_err());

        let written = fs::read_to_string(tmp.path().join("proc/acpi/call")).unwrap();
        assert_eq!(written, "\\_SB_.ATKD.MXDM 0x1");
    }

    #[test]
    fn test_evaluate_without_module() {
        let tmp = tempfile::tempdir().unwrap();
        let transport = AcpiCallTransport::new(SysfsRoot::new(tmp.path()), "\\_SB_.ATKD");
        let err = transport.evaluate("MXDS", 0).unwrap_err();
        assert!(err.contains("proc/acpi/call"));
    }

    #[test]
    fn test_custom_call_path() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("call"), "").unwrap();
        let transport = AcpiCallTransport::new(SysfsRoot::new(tmp.path()), "\\_SB_.AMW0.")
            .with_call_path("call");
        let _ = transport.evaluate("GMUX", 0);
        let written = fs::read_to_string(tmp.path().join("call")).unwrap();
        assert_eq!(written, "\\_SB_.AMW0.GMUX 0x0");
    }
}
