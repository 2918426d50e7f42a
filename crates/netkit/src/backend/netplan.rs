//! Netplan backend: edit the declarative document, then `netplan apply`.
//!
//! The document is parsed into a YAML tree and only the
//! `network.ethernets.<iface>.addresses` path is touched; every other key
//! keeps its value and position. Comments do not survive the round trip.

use serde_yaml::{Mapping, Number, Value};
use std::path::{Path, PathBuf};

use super::{IpBackend, cidr, netplan_files};
use crate::error::{Error, Result};
use crate::exec::{HostProbe, PrivilegedExecutor};
use crate::rewrite::log_diff;
use crate::types::NetworkInterface;

/// File created when the netplan directory holds no document yet
pub const DEFAULT_DOCUMENT: &str = "01-netcfg.yaml";

pub struct NetplanBackend<'a> {
    probe: &'a dyn HostProbe,
    exec: &'a dyn PrivilegedExecutor,
    dir: &'a Path,
}

impl<'a> NetplanBackend<'a> {
    pub fn new(
        probe: &'a dyn HostProbe,
        exec: &'a dyn PrivilegedExecutor,
        dir: &'a Path,
    ) -> Self {
        Self { probe, exec, dir }
    }

    fn create_document(&self, iface: &NetworkInterface, address: &str) -> Result<()> {
        let path = self.dir.join(DEFAULT_DOCUMENT);
        let mut doc = Value::Null;
        set_interface_address(&mut doc, &iface.name, address).map_err(|reason| {
            Error::InvalidNetplan {
                path: path.clone(),
                reason,
            }
        })?;

        let text = serde_yaml::to_string(&doc)?;
        log_diff(&path, "", &text);
        self.exec.write_file(&path, &text)?;
        // netplan warns about documents readable by others
        self.exec.set_mode(&path, "600")?;
        log::info!("Created {}", path.display());
        Ok(())
    }

    fn edit_document(&self, path: &Path, iface: &NetworkInterface, address: &str) -> Result<()> {
        // Documents are often root-only, so read with the same rights used to write
        let before = self.exec.read_privileged(path)?;
        let invalid = |reason: String| Error::InvalidNetplan {
            path: path.to_path_buf(),
            reason,
        };

        let mut doc: Value = if before.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(&before).map_err(|e| invalid(e.to_string()))?
        };
        set_interface_address(&mut doc, &iface.name, address).map_err(invalid)?;
        let after = serde_yaml::to_string(&doc)?;

        self.exec.copy_file(path, &backup_path(path))?;

        if after == before {
            log::debug!("{} already declares {address} on {iface}", path.display());
            return Ok(());
        }
        log_diff(path, &before, &after);
        self.exec.write_file(path, &after)?;
        log::info!("Updated {}", path.display());
        Ok(())
    }
}

impl IpBackend for NetplanBackend<'_> {
    fn name(&self) -> &'static str {
        "netplan"
    }

    fn apply(&self, iface: &NetworkInterface, ip: &str) -> Result<()> {
        let address = cidr(ip);
        match netplan_files(self.probe, self.dir)?.first() {
            Some(path) => self.edit_document(path, iface, &address)?,
            None => self.create_document(iface, &address)?,
        }

        self.exec.run_checked(&["netplan", "apply"])?;
        log::info!("netplan applied {address} on {iface}");
        Ok(())
    }
}

/// `<file>.bak` next to the document
fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Set `network.ethernets.<iface>.addresses` to `[address]`, creating any
/// missing level. A new `ethernets` key goes right after `version`.
fn set_interface_address(
    doc: &mut Value,
    iface: &str,
    address: &str,
) -> std::result::Result<(), String> {
    if doc.is_null() {
        *doc = Value::Mapping(Mapping::new());
    }
    let root = doc
        .as_mapping_mut()
        .ok_or_else(|| "top level is not a mapping".to_string())?;

    let network = child_mapping(root, "network", || {
        let mut network = Mapping::new();
        network.insert(Value::from("version"), Value::Number(Number::from(2)));
        network
    })?;

    if !network.contains_key("ethernets") {
        insert_after(
            network,
            "version",
            "ethernets",
            Value::Mapping(Mapping::new()),
        );
    }
    let ethernets = child_mapping(network, "ethernets", Mapping::new)?;
    let entry = child_mapping(ethernets, iface, Mapping::new)?;
    entry.insert(
        Value::from("addresses"),
        Value::Sequence(vec![Value::from(address)]),
    );
    Ok(())
}

/// The mapping under `key`, created with `init` when absent or empty
fn child_mapping<'m>(
    map: &'m mut Mapping,
    key: &str,
    init: impl FnOnce() -> Mapping,
) -> std::result::Result<&'m mut Mapping, String> {
    match map.get(key) {
        None | Some(Value::Null) => {
            map.insert(Value::from(key), Value::Mapping(init()));
        }
        Some(Value::Mapping(_)) => {}
        Some(_) => return Err(format!("`{key}` is not a mapping")),
    }
    map.get_mut(key)
        .and_then(Value::as_mapping_mut)
        .ok_or_else(|| format!("`{key}` is not a mapping"))
}

/// Insert `key: value` right after `anchor`, or at the end without one
fn insert_after(map: &mut Mapping, anchor: &str, key: &str, value: Value) {
    let original = std::mem::take(map);
    let mut pending = Some(value);
    for (k, v) in original {
        let is_anchor = k.as_str() == Some(anchor);
        map.insert(k, v);
        if is_anchor && let Some(value) = pending.take() {
            map.insert(Value::from(key), value);
        }
    }
    if let Some(value) = pending {
        map.insert(Value::from(key), value);
    }
}
