use crate::commands::{CommandSender, PermissionCheck};
use crate::config::SettingsHandle;
use rustc_hash::FxHashMap;
use std::sync::{PoisonError, RwLock};
use tracing::info;

const CONSOLE_GROUP: &str = "console";
const DEFAULT_GROUP: &str = "default";

#[derive(Debug)]
enum PathSegment {
    WildCard,
    Named(String),
}

#[derive(Debug)]
struct PermissionNode {
    path: Vec<PathSegment>,
    value: bool,
}

impl PermissionNode {
    /// `-a.b` denies `a.b`. A `*` segment matches everything below it.
    fn parse(node: &str) -> Self {
        let (name, value) = match node.strip_prefix('-') {
            Some(name) => (name, false),
            None => (node, true),
        };
        let path = name
            .split('.')
            .map(|s| match s {
                "*" => PathSegment::WildCard,
                s => PathSegment::Named(s.to_lowercase()),
            })
            .collect();
        PermissionNode { path, value }
    }

    fn matches(&self, name: &str) -> bool {
        let mut segments = name.split('.');
        for part in &self.path {
            match part {
                PathSegment::WildCard => return true,
                PathSegment::Named(expected) => match segments.next() {
                    Some(segment) if segment.eq_ignore_ascii_case(expected) => {}
                    _ => return false,
                },
            }
        }
        segments.next().is_none()
    }
}

#[derive(Debug, Default)]
pub struct PlayerPermissionsCache {
    nodes: Vec<PermissionNode>,
}

impl PlayerPermissionsCache {
    /// The value of the first node matching `name`.
    pub fn get_node_val(&self, name: &str) -> Option<bool> {
        self.nodes
            .iter()
            .find(|node| node.matches(name))
            .map(|node| node.value)
    }

    fn insert(&mut self, node: &str) {
        self.nodes.push(PermissionNode::parse(node));
    }
}

#[derive(Default)]
struct PermissionState {
    caches: FxHashMap<String, PlayerPermissionsCache>,
    granted: FxHashMap<String, Vec<String>>,
}

impl PermissionState {
    fn rebuild(&mut self, settings: &SettingsHandle) {
        let config = settings.current();
        self.caches.clear();

        let names = config.permissions.keys().chain(self.granted.keys());
        for name in names.map(|name| name.to_lowercase()).collect::<Vec<_>>() {
            let mut cache = PlayerPermissionsCache::default();
            // Runtime grants come first so they win over configured nodes
            let granted = self.granted.get(&name).into_iter().flatten();
            let configured = config
                .permissions
                .iter()
                .filter(|(key, _)| key.to_lowercase() == name)
                .flat_map(|(_, nodes)| nodes);
            for node in granted.chain(configured) {
                cache.insert(node);
            }
            self.caches.insert(name, cache);
        }
    }
}

/// Permission nodes per player name, read from the `permissions` table of
/// the configuration. Players fall back to the `default` entry and the
/// console uses the `console` entry.
pub struct Permissions {
    settings: SettingsHandle,
    state: RwLock<PermissionState>,
}

impl Permissions {
    pub fn new(settings: SettingsHandle) -> Self {
        let mut state = PermissionState::default();
        state.rebuild(&settings);
        Self {
            settings,
            state: RwLock::new(state),
        }
    }

    /// Re-reads the configured nodes, keeping runtime grants.
    pub fn reload(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.rebuild(&self.settings);
        info!("Reloaded permissions for {} groups", state.caches.len());
    }

    /// Grants `node` to `name` until the process exits. Prefix the node with
    /// `-` to deny it instead.
    pub fn grant(&self, name: &str, node: impl Into<String>) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state
            .granted
            .entry(name.to_lowercase())
            .or_default()
            .push(node.into());
        state.rebuild(&self.settings);
    }

    pub fn get_node_val(&self, group: &str, permission: &str) -> Option<bool> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .caches
            .get(&group.to_lowercase())
            .and_then(|cache| cache.get_node_val(permission))
    }
}

impl PermissionCheck for Permissions {
    fn has_permission(&self, sender: &CommandSender, permission: &str) -> bool {
        let group = match sender {
            CommandSender::Player(handle) => handle.name.as_str(),
            CommandSender::Console => CONSOLE_GROUP,
        };
        self.get_node_val(group, permission)
            .or_else(|| self.get_node_val(DEFAULT_GROUP, permission))
            .unwrap_or(false)
    }
}
