//! In-memory host for tests
//!
//! [`FakeHost`] answers the probes the reconcilers issue (`hostname`,
//! `ip route`, `ip link`, `ip addr`) from its own state and interprets the
//! mutating commands they run, so scenarios can be asserted on end state
//! as well as on the exact commands issued.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::exec::{CommandOutput, HostProbe, PrivilegedExecutor};

#[derive(Debug, Default)]
struct State {
    hostname: String,
    default_route: Option<String>,
    links: Vec<String>,
    addresses: BTreeMap<String, Vec<String>>,
    up: BTreeSet<String>,
    files: BTreeMap<PathBuf, String>,
    modes: BTreeMap<PathBuf, String>,
    unreadable: BTreeSet<PathBuf>,
    dirs: BTreeSet<PathBuf>,
    commands: BTreeSet<String>,
    failing: Vec<String>,
    mutations: Vec<String>,
}

/// Host whose whole network identity lives in memory
#[derive(Debug)]
pub struct FakeHost {
    state: RefCell<State>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHost {
    /// A host named `localhost` with only the loopback link
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State {
                hostname: "localhost".to_string(),
                links: vec!["lo".to_string()],
                ..Default::default()
            }),
        }
    }

    pub fn with_hostname(self, name: &str) -> Self {
        self.state.borrow_mut().hostname = name.to_string();
        self
    }

    pub fn with_link(self, name: &str) -> Self {
        {
            let mut state = self.state.borrow_mut();
            if !state.links.iter().any(|l| l == name) {
                state.links.push(name.to_string());
            }
        }
        self
    }

    /// Route the default gateway through `name` (adding the link)
    pub fn with_default_route(self, name: &str) -> Self {
        let host = self.with_link(name);
        host.state.borrow_mut().default_route = Some(name.to_string());
        host
    }

    /// Bind `cidr` to `name` (adding the link)
    pub fn with_address(self, name: &str, cidr: &str) -> Self {
        let host = self.with_link(name);
        host.state
            .borrow_mut()
            .addresses
            .entry(name.to_string())
            .or_default()
            .push(cidr.to_string());
        host
    }

    /// Create a file (and its parent directory)
    pub fn with_file(self, path: &str, content: &str) -> Self {
        {
            let mut state = self.state.borrow_mut();
            let path = PathBuf::from(path);
            if let Some(parent) = path.parent() {
                state.dirs.insert(parent.to_path_buf());
            }
            state.files.insert(path, content.to_string());
        }
        self
    }

    pub fn with_dir(self, path: &str) -> Self {
        self.state.borrow_mut().dirs.insert(PathBuf::from(path));
        self
    }

    /// Deny unprivileged reads of `path`, as for a root-only file
    pub fn with_unreadable(self, path: &str) -> Self {
        self.state.borrow_mut().unreadable.insert(PathBuf::from(path));
        self
    }

    /// Make `program` visible to `command_exists`
    pub fn with_command(self, program: &str) -> Self {
        self.state.borrow_mut().commands.insert(program.to_string());
        self
    }

    /// Fail every privileged command whose argv starts with `prefix`
    pub fn failing(self, prefix: &str) -> Self {
        self.state.borrow_mut().failing.push(prefix.to_string());
        self
    }

    pub fn hostname(&self) -> String {
        self.state.borrow().hostname.clone()
    }

    pub fn file(&self, path: &str) -> Option<String> {
        self.state.borrow().files.get(Path::new(path)).cloned()
    }

    /// Mode last set with `chmod`
    pub fn mode(&self, path: &str) -> Option<String> {
        self.state.borrow().modes.get(Path::new(path)).cloned()
    }

    pub fn addresses(&self, iface: &str) -> Vec<String> {
        self.state
            .borrow()
            .addresses
            .get(iface)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_up(&self, iface: &str) -> bool {
        self.state.borrow().up.contains(iface)
    }

    /// Every privileged command issued so far except `cat`, argv joined by spaces
    pub fn mutations(&self) -> Vec<String> {
        self.state.borrow().mutations.clone()
    }

    fn execute(&self, argv: &[&str], input: Option<&str>) -> CommandOutput {
        let mut state = self.state.borrow_mut();
        let line = argv.join(" ");
        if argv.first() != Some(&"cat") {
            state.mutations.push(line.clone());
        }

        if state.failing.iter().any(|p| line.starts_with(p.as_str())) {
            return CommandOutput::failure(1, format!("simulated failure: {line}"));
        }

        match argv {
            ["cat", path] => {
                return match state.files.get(Path::new(path)) {
                    Some(content) => CommandOutput::success_with(content.clone()),
                    None => CommandOutput::failure(
                        1,
                        format!("cat: {path}: No such file or directory"),
                    ),
                };
            }
            ["chmod", mode, path] => {
                if !state.files.contains_key(Path::new(path)) {
                    return CommandOutput::failure(
                        1,
                        format!("chmod: cannot access '{path}': No such file or directory"),
                    );
                }
                state.modes.insert(PathBuf::from(path), (*mode).to_string());
            }
            ["hostname", name] => state.hostname = (*name).to_string(),
            ["tee", path] => {
                let path = PathBuf::from(path);
                match path.parent() {
                    Some(parent) if state.dirs.contains(parent) || parent == Path::new("/etc") => {
                        state.dirs.insert(parent.to_path_buf());
                    }
                    _ => {
                        return CommandOutput::failure(
                            1,
                            format!("tee: {}: No such file or directory", path.display()),
                        );
                    }
                }
                state.files.insert(path, input.unwrap_or_default().to_string());
            }
            ["cp", "-f", from, to] => {
                let Some(content) = state.files.get(Path::new(from)).cloned() else {
                    return CommandOutput::failure(1, format!("cp: cannot stat '{from}'"));
                };
                state.files.insert(PathBuf::from(to), content);
            }
            ["ip", "addr", "flush", "dev", dev] => {
                state.addresses.remove(*dev);
            }
            ["ip", "addr", "add", cidr, "dev", dev] => {
                if !state.links.iter().any(|l| l == dev) {
                    return CommandOutput::failure(1, format!("Cannot find device \"{dev}\""));
                }
                state
                    .addresses
                    .entry((*dev).to_string())
                    .or_default()
                    .push((*cidr).to_string());
            }
            ["ip", "link", "set", dev, "up"] => {
                state.up.insert((*dev).to_string());
            }
            _ => {}
        }
        CommandOutput::success_with(input.unwrap_or_default())
    }
}

impl HostProbe for FakeHost {
    fn capture(&self, argv: &[&str]) -> Result<CommandOutput> {
        let state = self.state.borrow();
        let output = match argv {
            ["hostname"] => CommandOutput::success_with(format!("{}\n", state.hostname)),
            ["ip", "route", "show", "default"] => CommandOutput::success_with(
                state
                    .default_route
                    .as_ref()
                    .map(|dev| format!("default via 10.0.0.1 dev {dev} proto dhcp metric 100\n"))
                    .unwrap_or_default(),
            ),
            ["ip", "-o", "link", "show"] => CommandOutput::success_with(
                state
                    .links
                    .iter()
                    .enumerate()
                    .map(|(i, l)| format!("{}: {l}: <BROADCAST,MULTICAST,UP> mtu 1500\n", i + 1))
                    .collect::<String>(),
            ),
            ["ip", "-4", "-o", "addr", "show", "dev", dev] => {
                if !state.links.iter().any(|l| l == dev) {
                    CommandOutput::failure(1, format!("Device \"{dev}\" does not exist."))
                } else {
                    CommandOutput::success_with(
                        state
                            .addresses
                            .get(*dev)
                            .into_iter()
                            .flatten()
                            .map(|cidr| format!("2: {dev}    inet {cidr} scope global {dev}\n"))
                            .collect::<String>(),
                    )
                }
            }
            _ => CommandOutput::failure(127, format!("{}: command not found", argv.join(" "))),
        };
        Ok(output)
    }

    fn read_file(&self, path: &Path) -> Result<Option<String>> {
        let state = self.state.borrow();
        if state.unreadable.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{}: Permission denied", path.display()),
            )
            .into());
        }
        Ok(state.files.get(path).cloned())
    }

    fn list_dir(&self, dir: &Path) -> Result<Option<Vec<PathBuf>>> {
        let state = self.state.borrow();
        if !state.dirs.contains(dir) {
            return Ok(None);
        }
        Ok(Some(
            state
                .files
                .keys()
                .filter(|p| p.parent() == Some(dir))
                .cloned()
                .collect(),
        ))
    }

    fn command_exists(&self, program: &str) -> bool {
        self.state.borrow().commands.contains(program)
    }
}

impl PrivilegedExecutor for FakeHost {
    fn run(&self, argv: &[&str]) -> Result<CommandOutput> {
        Ok(self.execute(argv, None))
    }

    fn run_with_input(&self, argv: &[&str], input: &str) -> Result<CommandOutput> {
        Ok(self.execute(argv, Some(input)))
    }
}
